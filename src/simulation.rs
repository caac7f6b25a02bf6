use std::collections::BTreeMap;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::{
    clamp_prob, coerce, DEFAULT_HOME_ADV, DEFAULT_OT_SHARE, MAX_HOME_ADV, MAX_ITERATIONS,
    MIN_ITERATIONS,
};
use crate::game::{Game, Outcome};
use crate::standings::{apply_result, build_table, rank_table, Standing, TiebreakRule};
use crate::team::{Team, TeamId};

/// Global knobs applied to every undecided game during simulation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimSettings {
    /// Share of wins decided in overtime or shootout, clamped to [0, 1].
    pub ot_share: f64,
    /// Probability shift added to every home side, clamped to [-0.2, 0.2].
    pub home_adv: f64,
}

impl Default for SimSettings {
    fn default() -> Self {
        SimSettings {
            ot_share: DEFAULT_OT_SHARE,
            home_adv: DEFAULT_HOME_ADV,
        }
    }
}

impl SimSettings {
    fn clamped(&self) -> SimSettings {
        SimSettings {
            ot_share: coerce(self.ot_share).clamp(0.0, 1.0),
            home_adv: coerce(self.home_adv).clamp(-MAX_HOME_ADV, MAX_HOME_ADV),
        }
    }
}

/// Per-team run averages over all iterations.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamExpectation {
    pub id: TeamId,
    pub name: String,
    pub avg_rank: f64,
    pub avg_points: f64,
}

/// One bucket of the focus team's final-rank histogram.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankBucket {
    pub rank: usize,
    pub count: u64,
    /// count / iterations, as a percentage.
    pub pct: f64,
}

/// Focus-team highlights across all iterations.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusSummary {
    /// Best (minimum) observed rank.
    pub best: usize,
    /// Worst (maximum) observed rank.
    pub worst: usize,
    pub avg_rank: f64,
    pub avg_points: f64,
}

/// Aggregate result of a simulation run.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationSummary {
    /// Iterations actually run, after clamping.
    pub iterations: usize,
    /// Per-team averages, sorted ascending by average rank. Ties keep team
    /// input order.
    pub expected: Vec<TeamExpectation>,
    /// Focus-team rank histogram, ascending by rank. Empty when the focus
    /// team does not resolve.
    pub rank_counts: Vec<RankBucket>,
    /// Absent when the focus team id does not exist in the team set.
    pub focus: Option<FocusSummary>,
}

/// Complete one season: apply decided games as-is and draw outcomes for the
/// undecided ones, then sort and rank.
///
/// Each TBD game consumes exactly two uniform draws, in order: home-win
/// versus the clamped, home-advantage-adjusted probability, then
/// overtime versus `ot_share`. Games with unresolvable team ids still
/// consume their draws before the application no-ops, so the draw sequence
/// depends only on the game list.
///
/// The random source is injected so tests can supply a fixed sequence.
pub fn simulate_standings<R: Rng>(
    teams: &[Team],
    games: &[Game],
    settings: &SimSettings,
    rule: TiebreakRule,
    rng: &mut R,
) -> Vec<Standing> {
    let settings = settings.clamped();
    let (mut rows, index) = build_table(teams);

    for game in games {
        let outcome = if game.outcome.is_decided() {
            game.outcome
        } else {
            let adjusted = clamp_prob(clamp_prob(game.prob_home) + settings.home_adv);
            let home_wins = rng.gen::<f64>() < adjusted;
            let goes_ot = rng.gen::<f64>() < settings.ot_share;
            match (home_wins, goes_ot) {
                (true, false) => Outcome::HomeRegWin,
                (true, true) => Outcome::HomeOtWin,
                (false, false) => Outcome::AwayRegWin,
                (false, true) => Outcome::AwayOtWin,
            }
        };
        apply_result(&mut rows, &index, &game.home_id, &game.away_id, outcome);
    }

    rank_table(&mut rows, rule);
    rows
}

/// Running sums for one batch of iterations. Merging is plain addition, so
/// batches can be combined in any order.
struct Totals {
    rank_sum: Vec<u64>,
    points_sum: Vec<u64>,
    focus_ranks: BTreeMap<usize, u64>,
}

impl Totals {
    fn new(team_count: usize) -> Self {
        Totals {
            rank_sum: vec![0; team_count],
            points_sum: vec![0; team_count],
            focus_ranks: BTreeMap::new(),
        }
    }

    fn absorb(
        &mut self,
        standings: &[Standing],
        index: &std::collections::HashMap<TeamId, usize>,
        focus_idx: Option<usize>,
    ) {
        for line in standings {
            let Some(&i) = index.get(&line.id) else {
                continue;
            };
            self.rank_sum[i] += line.rank as u64;
            self.points_sum[i] += u64::from(line.pts);
            if focus_idx == Some(i) {
                *self.focus_ranks.entry(line.rank).or_insert(0) += 1;
            }
        }
    }

    fn merge(mut self, other: Totals) -> Totals {
        for (a, b) in self.rank_sum.iter_mut().zip(other.rank_sum) {
            *a += b;
        }
        for (a, b) in self.points_sum.iter_mut().zip(other.points_sum) {
            *a += b;
        }
        for (rank, count) in other.focus_ranks {
            *self.focus_ranks.entry(rank).or_insert(0) += count;
        }
        self
    }
}

/// Run the Monte Carlo season simulation.
///
/// `iterations` is clamped to [100, 20000]. With `seed` set the result is
/// fully reproducible: a master ChaCha8 stream derives one seed per
/// iteration, and iterations run in parallel but aggregate through
/// order-independent sums. `focus` selects the team whose rank distribution
/// is tracked; an unresolvable focus id yields absent focus statistics, not
/// an error.
pub fn simulate(
    teams: &[Team],
    games: &[Game],
    settings: &SimSettings,
    rule: TiebreakRule,
    focus: Option<&TeamId>,
    iterations: usize,
    seed: Option<u64>,
) -> SimulationSummary {
    let iterations = iterations.clamp(MIN_ITERATIONS, MAX_ITERATIONS);
    let settings = settings.clamped();

    let mut master = match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    };
    let seeds: Vec<u64> = (0..iterations).map(|_| master.gen()).collect();

    let (_, index) = build_table(teams);
    let focus_idx = focus.and_then(|id| index.get(id).copied());

    debug!(
        iterations,
        teams = teams.len(),
        games = games.len(),
        "running season simulation"
    );

    let totals = seeds
        .par_iter()
        .fold(
            || Totals::new(teams.len()),
            |mut acc, &iteration_seed| {
                let mut rng = ChaCha8Rng::seed_from_u64(iteration_seed);
                let standings = simulate_standings(teams, games, &settings, rule, &mut rng);
                acc.absorb(&standings, &index, focus_idx);
                acc
            },
        )
        .reduce(|| Totals::new(teams.len()), Totals::merge);

    let n = iterations as f64;
    let mut expected: Vec<TeamExpectation> = teams
        .iter()
        .enumerate()
        .map(|(i, team)| TeamExpectation {
            id: team.id.clone(),
            name: team.name.clone(),
            avg_rank: totals.rank_sum[i] as f64 / n,
            avg_points: totals.points_sum[i] as f64 / n,
        })
        .collect();
    // Stable sort: average-rank ties keep team input order.
    expected.sort_by(|a, b| a.avg_rank.total_cmp(&b.avg_rank));

    let rank_counts: Vec<RankBucket> = totals
        .focus_ranks
        .iter()
        .map(|(&rank, &count)| RankBucket {
            rank,
            count,
            pct: count as f64 / n * 100.0,
        })
        .collect();

    let focus_summary = focus_idx.and_then(|i| {
        let best = *totals.focus_ranks.keys().next()?;
        let worst = *totals.focus_ranks.keys().next_back()?;
        Some(FocusSummary {
            best,
            worst,
            avg_rank: totals.rank_sum[i] as f64 / n,
            avg_points: totals.points_sum[i] as f64 / n,
        })
    });

    SimulationSummary {
        iterations,
        expected,
        rank_counts,
        focus: focus_summary,
    }
}
