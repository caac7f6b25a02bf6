//! Standings Core - league table and Monte Carlo season simulation engine.
//!
//! Given a set of teams with season-to-date counters and a list of remaining
//! fixtures, this library computes a deterministic standings table from the
//! decided results and projects final standings by repeatedly completing the
//! season with randomized outcomes.
//!
//! The engine is pure data-in/data-out: it never persists anything, never
//! mutates its inputs, and degrades silently on malformed input (coerce,
//! clamp, skip) per the tabular data contract it shares with its callers.

pub mod constants;
pub mod csv_io;
pub mod game;
pub mod league;
pub mod simulation;
pub mod standings;
pub mod team;
pub mod zones;

pub use constants::{clamp_prob, coerce};
pub use csv_io::{
    export_games, export_teams, games_template, import_games, import_teams, teams_template,
    CsvError, GamesImport,
};
pub use game::{Game, GameId, Outcome};
pub use league::League;
pub use simulation::{
    simulate, simulate_standings, FocusSummary, RankBucket, SimSettings, SimulationSummary,
    TeamExpectation,
};
pub use standings::{compute_standings, Standing, TiebreakRule};
pub use team::{Team, TeamId};
pub use zones::{Zone, ZoneConfig};
