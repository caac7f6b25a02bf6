use serde::{Deserialize, Serialize};

use crate::csv_io::{self, CsvError};
use crate::game::Game;
use crate::simulation::{self, SimSettings, SimulationSummary};
use crate::standings::{compute_standings, Standing, TiebreakRule};
use crate::team::{Team, TeamId};

/// A league snapshot: the teams and their remaining games.
///
/// This is the unit the persistence layer loads and saves; its serde form
/// (`{ "teams": [...], "games": [...] }`) is the storage contract. The
/// engine itself has no opinion on where snapshots live.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct League {
    #[serde(default)]
    pub teams: Vec<Team>,
    #[serde(default)]
    pub games: Vec<Game>,
}

impl League {
    pub fn new(teams: Vec<Team>, games: Vec<Game>) -> Self {
        League { teams, games }
    }

    /// Fresh league with the default placeholder roster and no games.
    pub fn placeholder() -> Self {
        League {
            teams: Team::default_roster(),
            games: Vec::new(),
        }
    }

    pub fn team(&self, id: &TeamId) -> Option<&Team> {
        self.teams.iter().find(|team| &team.id == id)
    }

    /// Remove a team and every game referencing it.
    pub fn remove_team(&mut self, id: &TeamId) {
        self.teams.retain(|team| &team.id != id);
        self.games
            .retain(|game| &game.home_id != id && &game.away_id != id);
    }

    /// Deterministic standings from the decided games only.
    pub fn standings(&self, rule: TiebreakRule) -> Vec<Standing> {
        compute_standings(&self.teams, &self.games, rule)
    }

    /// Monte Carlo season projection. See [`simulation::simulate`].
    pub fn simulate(
        &self,
        settings: &SimSettings,
        rule: TiebreakRule,
        focus: Option<&TeamId>,
        iterations: usize,
        seed: Option<u64>,
    ) -> SimulationSummary {
        simulation::simulate(
            &self.teams,
            &self.games,
            settings,
            rule,
            focus,
            iterations,
            seed,
        )
    }

    /// Replace the roster from a teams CSV document. Existing games are
    /// cleared since their team references no longer apply.
    pub fn import_teams(&mut self, data: &str) -> Result<(), CsvError> {
        self.teams = csv_io::import_teams(data)?;
        self.games.clear();
        Ok(())
    }

    /// Replace the games from a games CSV document, appending any teams the
    /// document references that are not yet on the roster.
    pub fn import_games(&mut self, data: &str) -> Result<(), CsvError> {
        let imported = csv_io::import_games(data, &self.teams)?;
        self.teams.extend(imported.created_teams);
        self.games = imported.games;
        Ok(())
    }

    pub fn export_teams(&self) -> Result<String, CsvError> {
        csv_io::export_teams(&self.teams)
    }

    pub fn export_games(&self) -> Result<String, CsvError> {
        csv_io::export_games(&self.games, &self.teams)
    }

    /// Serialize the snapshot for the persistence layer.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Restore a snapshot handed back by the persistence layer.
    pub fn from_json(data: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(data)
    }
}
