use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_TEAM_COUNT;

/// Opaque unique team identifier.
///
/// Ids are short random alphanumeric strings; equality and hashing are the
/// only operations the engine relies on.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamId(String);

impl TeamId {
    pub fn new(id: impl Into<String>) -> Self {
        TeamId(id.into())
    }

    /// Generate a fresh random id (7 lowercase alphanumeric characters).
    pub fn random() -> Self {
        let id: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(7)
            .map(char::from)
            .collect();
        TeamId(id.to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TeamId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A team with its season-to-date counters.
///
/// All counters default to zero and are only ever set by the caller (manual
/// entry or import). The engine never mutates a stored `Team`; standings
/// computations work on per-call copies.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: TeamId,
    /// Display name. May be empty or duplicate another team's name.
    #[serde(default)]
    pub name: String,
    /// Games played.
    #[serde(default)]
    pub gp: u32,
    /// Points.
    #[serde(default)]
    pub pts: u32,
    /// Regulation wins.
    #[serde(default)]
    pub rw: u32,
    /// Regulation-or-overtime wins (superset of `rw`).
    #[serde(default)]
    pub row: u32,
    /// Goals for.
    #[serde(default)]
    pub gf: u32,
    /// Goals against.
    #[serde(default)]
    pub ga: u32,
}

impl Team {
    /// Create a team with zeroed counters.
    pub fn new(name: impl Into<String>) -> Self {
        Team {
            id: TeamId::random(),
            name: name.into(),
            gp: 0,
            pts: 0,
            rw: 0,
            row: 0,
            gf: 0,
            ga: 0,
        }
    }

    /// Goal difference. Derived, never stored.
    pub fn goal_diff(&self) -> i64 {
        i64::from(self.gf) - i64::from(self.ga)
    }

    /// Build a roster of `count` placeholder teams named "Team 1".."Team n".
    pub fn placeholders(count: usize) -> Vec<Team> {
        (1..=count).map(|n| Team::new(format!("Team {n}"))).collect()
    }

    /// Default placeholder roster.
    pub fn default_roster() -> Vec<Team> {
        Team::placeholders(DEFAULT_TEAM_COUNT)
    }
}
