use thiserror::Error;

/// Reasons a note sequence cannot be turned into a [`Chart`].
///
/// [`Chart`]: crate::Chart
#[derive(Copy, Clone, Debug, Error, PartialEq)]
pub enum ChartError {
    #[error("no hittable notes")]
    Empty,
    #[error("count {count} exceeds the {len} provided events")]
    CountMismatch { count: usize, len: usize },
    #[error("event {index} has a non-finite time")]
    NonFiniteTime { index: usize },
    #[error("event {index} has negative time {time}")]
    NegativeTime { index: usize, time: f64 },
    #[error("event {index} at {time}s is too late to be rated at every supported rate")]
    TimeOutOfRange { index: usize, time: f64 },
    #[error("event {index} has no columns")]
    NoColumns { index: usize },
    #[error("event {index} uses a column outside of {key_count}K")]
    ColumnOutOfRange { index: usize, key_count: usize },
    #[error("unsupported key count {0}")]
    UnsupportedKeyCount(usize),
}

/// Errors returned by rating queries.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum RatingError {
    #[error("invalid chart: {0}")]
    InvalidChart(#[from] ChartError),
    #[error("invalid music rate {0} (must be finite and within the supported range)")]
    InvalidRate(f64),
    #[error("invalid score goal {0} (must be within (0, 100])")]
    InvalidScoreGoal(f64),
    #[error("calibration did not converge after {iterations} iterations (residual {residual})")]
    CalibrationNonConvergence { iterations: u32, residual: f64 },
    #[error("session was used after being closed")]
    HandleMisuse,
}
