use serde::{Deserialize, Serialize};

/// Qualification zone a table position falls into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Zone {
    /// Straight to the quarter finals.
    DirectQualifier,
    /// Play-in round.
    PlayIn,
    /// Relegation zone.
    Relegation,
}

/// Cutline configuration for classifying table positions.
///
/// All values are 1-based ranks. Checks run top-down: direct qualification,
/// then the play-in window, then relegation; anything else is mid-table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneConfig {
    /// Last rank qualifying directly.
    pub direct_cut: usize,
    /// First rank of the play-in window.
    pub play_in_start: usize,
    /// Last rank of the play-in window.
    pub play_in_end: usize,
    /// First rank in the relegation zone.
    pub relegation_start: usize,
}

impl Default for ZoneConfig {
    fn default() -> Self {
        ZoneConfig {
            direct_cut: 6,
            play_in_start: 7,
            play_in_end: 10,
            relegation_start: 13,
        }
    }
}

impl ZoneConfig {
    /// Classify a 1-based rank, or `None` for mid-table positions.
    pub fn classify(&self, rank: usize) -> Option<Zone> {
        if rank <= self.direct_cut {
            Some(Zone::DirectQualifier)
        } else if rank >= self.play_in_start && rank <= self.play_in_end {
            Some(Zone::PlayIn)
        } else if rank >= self.relegation_start {
            Some(Zone::Relegation)
        } else {
            None
        }
    }
}
