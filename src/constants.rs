/// Lower clamp bound for any win probability before use.
pub const PROB_MIN: f64 = 0.05;

/// Upper clamp bound for any win probability before use.
pub const PROB_MAX: f64 = 0.95;

/// Default home-win probability for games created or imported without one.
pub const DEFAULT_PROB_HOME: f64 = 0.5;

/// Minimum number of simulation iterations.
pub const MIN_ITERATIONS: usize = 100;

/// Maximum number of simulation iterations.
pub const MAX_ITERATIONS: usize = 20_000;

/// Largest absolute home-advantage probability shift.
pub const MAX_HOME_ADV: f64 = 0.2;

/// Default share of wins decided in overtime or shootout.
pub const DEFAULT_OT_SHARE: f64 = 0.25;

/// Default home-advantage probability shift.
pub const DEFAULT_HOME_ADV: f64 = 0.05;

/// Number of placeholder teams in a fresh league.
pub const DEFAULT_TEAM_COUNT: usize = 14;

/// Collapse malformed numeric input to zero.
///
/// Counters and probabilities arrive from free-text surfaces; anything
/// non-finite is treated as 0 rather than rejected.
pub fn coerce(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Coerce and clamp a probability into [`PROB_MIN`, `PROB_MAX`].
pub fn clamp_prob(prob: f64) -> f64 {
    coerce(prob).clamp(PROB_MIN, PROB_MAX)
}
