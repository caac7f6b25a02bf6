use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_PROB_HOME;
use crate::team::TeamId;

/// Fixture outcome tag.
///
/// `Tbd` fixtures are the only ones the simulator resolves; the engine never
/// writes an outcome back, it only reads them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Outcome {
    #[default]
    #[serde(rename = "TBD")]
    Tbd,
    #[serde(rename = "HOME_REG_WIN", alias = "H_REG")]
    HomeRegWin,
    #[serde(rename = "AWAY_REG_WIN", alias = "A_REG")]
    AwayRegWin,
    #[serde(rename = "HOME_OT_WIN", alias = "H_OT")]
    HomeOtWin,
    #[serde(rename = "AWAY_OT_WIN", alias = "A_OT")]
    AwayOtWin,
}

impl Outcome {
    /// Parse an outcome tag, defaulting to `Tbd` for blank or unrecognized
    /// input. Accepts both the canonical tags and the short forms used by
    /// the tabular export format.
    pub fn parse_or_tbd(text: &str) -> Self {
        match text.trim().to_ascii_uppercase().as_str() {
            "HOME_REG_WIN" | "H_REG" => Outcome::HomeRegWin,
            "AWAY_REG_WIN" | "A_REG" => Outcome::AwayRegWin,
            "HOME_OT_WIN" | "H_OT" => Outcome::HomeOtWin,
            "AWAY_OT_WIN" | "A_OT" => Outcome::AwayOtWin,
            _ => Outcome::Tbd,
        }
    }

    /// Canonical tag string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Tbd => "TBD",
            Outcome::HomeRegWin => "HOME_REG_WIN",
            Outcome::AwayRegWin => "AWAY_REG_WIN",
            Outcome::HomeOtWin => "HOME_OT_WIN",
            Outcome::AwayOtWin => "AWAY_OT_WIN",
        }
    }

    pub fn is_decided(&self) -> bool {
        *self != Outcome::Tbd
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque unique game identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameId(String);

impl GameId {
    pub fn new(id: impl Into<String>) -> Self {
        GameId(id.into())
    }

    pub fn random() -> Self {
        GameId(TeamId::random().as_str().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A fixture between two teams.
///
/// `prob_home` is only consulted when `outcome` is `Tbd`, and is clamped to
/// the probability bounds before every use regardless of the stored value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub id: GameId,
    pub home_id: TeamId,
    pub away_id: TeamId,
    #[serde(default)]
    pub outcome: Outcome,
    #[serde(default = "default_prob_home")]
    pub prob_home: f64,
}

fn default_prob_home() -> f64 {
    DEFAULT_PROB_HOME
}

impl Game {
    /// Create an undecided fixture with an even home-win probability.
    pub fn new(home_id: TeamId, away_id: TeamId) -> Self {
        Game {
            id: GameId::random(),
            home_id,
            away_id,
            outcome: Outcome::Tbd,
            prob_home: DEFAULT_PROB_HOME,
        }
    }

    pub fn with_outcome(mut self, outcome: Outcome) -> Self {
        self.outcome = outcome;
        self
    }

    pub fn with_prob_home(mut self, prob_home: f64) -> Self {
        self.prob_home = prob_home;
        self
    }
}
