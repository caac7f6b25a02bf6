use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::game::{Game, Outcome};
use crate::team::{Team, TeamId};

/// Tiebreak rule selecting the comparison keys used to order the table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TiebreakRule {
    /// PTS, then ROW, then RW, then goal difference, then GF, then name.
    #[default]
    #[serde(rename = "league")]
    League,
    /// PTS, then goal difference, then GF, then name.
    #[serde(rename = "pointsGd")]
    PointsGd,
}

/// A team's working table line for one computation: counters after applying
/// a sequence of games, plus the 1-based rank assigned after sorting.
///
/// Ephemeral; rebuilt on every calculator invocation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Standing {
    pub id: TeamId,
    pub name: String,
    pub gp: u32,
    pub pts: u32,
    pub rw: u32,
    pub row: u32,
    pub gf: u32,
    pub ga: u32,
    pub rank: usize,
}

impl Standing {
    fn from_team(team: &Team) -> Self {
        Standing {
            id: team.id.clone(),
            name: team.name.clone(),
            gp: team.gp,
            pts: team.pts,
            rw: team.rw,
            row: team.row,
            gf: team.gf,
            ga: team.ga,
            rank: 0,
        }
    }

    /// Goal difference. Reflects only the caller-provided season-to-date
    /// totals; result application never touches GF/GA.
    pub fn goal_diff(&self) -> i64 {
        i64::from(self.gf) - i64::from(self.ga)
    }
}

/// Build working lines in team input order plus an id -> index lookup.
///
/// Input order matters: it is the final fallback when two lines compare
/// equal under the tiebreak rule (duplicate names included), since the sort
/// is stable.
pub(crate) fn build_table(teams: &[Team]) -> (Vec<Standing>, HashMap<TeamId, usize>) {
    let rows: Vec<Standing> = teams.iter().map(Standing::from_team).collect();
    let index = rows
        .iter()
        .enumerate()
        .map(|(i, row)| (row.id.clone(), i))
        .collect();
    (rows, index)
}

/// Apply a decided game result to the working table in place.
///
/// Both ids must resolve to distinct existing lines; otherwise the game is
/// silently skipped and contributes nothing. Both teams' GP increment, then
/// points and win counters per the scoring table: regulation win 3-0 (RW and
/// ROW for the winner), overtime win 2-1 (ROW only for the winner). GF/GA
/// are deliberately untouched.
pub(crate) fn apply_result(
    rows: &mut [Standing],
    index: &HashMap<TeamId, usize>,
    home_id: &TeamId,
    away_id: &TeamId,
    outcome: Outcome,
) {
    debug_assert!(outcome.is_decided(), "apply_result called with TBD");
    if !outcome.is_decided() {
        return;
    }
    let (Some(&home), Some(&away)) = (index.get(home_id), index.get(away_id)) else {
        return;
    };
    if home == away {
        return;
    }

    rows[home].gp += 1;
    rows[away].gp += 1;

    match outcome {
        Outcome::HomeRegWin => {
            rows[home].pts += 3;
            rows[home].rw += 1;
            rows[home].row += 1;
        }
        Outcome::AwayRegWin => {
            rows[away].pts += 3;
            rows[away].rw += 1;
            rows[away].row += 1;
        }
        Outcome::HomeOtWin => {
            rows[home].pts += 2;
            rows[away].pts += 1;
            rows[home].row += 1;
        }
        Outcome::AwayOtWin => {
            rows[away].pts += 2;
            rows[home].pts += 1;
            rows[away].row += 1;
        }
        Outcome::Tbd => unreachable!(),
    }
}

fn compare(rule: TiebreakRule, a: &Standing, b: &Standing) -> Ordering {
    let by_points = b.pts.cmp(&a.pts);
    let ordering = match rule {
        TiebreakRule::League => by_points
            .then(b.row.cmp(&a.row))
            .then(b.rw.cmp(&a.rw))
            .then(b.goal_diff().cmp(&a.goal_diff()))
            .then(b.gf.cmp(&a.gf)),
        TiebreakRule::PointsGd => by_points
            .then(b.goal_diff().cmp(&a.goal_diff()))
            .then(b.gf.cmp(&a.gf)),
    };
    ordering.then_with(|| a.name.cmp(&b.name))
}

/// Sort the working table under `rule` and assign 1-based ranks.
pub(crate) fn rank_table(rows: &mut [Standing], rule: TiebreakRule) {
    rows.sort_by(|a, b| compare(rule, a, b));
    for (position, row) in rows.iter_mut().enumerate() {
        row.rank = position + 1;
    }
}

/// Compute the deterministic standings table.
///
/// Builds one working line per team, applies every decided game, sorts under
/// `rule` and assigns ranks 1..T. Pure: identical input yields identical
/// output order.
pub fn compute_standings(teams: &[Team], games: &[Game], rule: TiebreakRule) -> Vec<Standing> {
    let (mut rows, index) = build_table(teams);
    for game in games {
        if game.outcome.is_decided() {
            apply_result(&mut rows, &index, &game.home_id, &game.away_id, game.outcome);
        }
    }
    rank_table(&mut rows, rule);
    rows
}
