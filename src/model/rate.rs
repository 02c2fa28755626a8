use rosu_mods::GameModsLegacy;

use crate::error::RatingError;

/// Amount of entries in [`RATE_LADDER`].
pub const LADDER_LEN: usize = 14;

/// The fixed music rates rated in batch mode, from 0.7x to 2.0x in steps
/// of 0.1.
pub const RATE_LADDER: [f64; LADDER_LEN] = [
    0.7, 0.8, 0.9, 1.0, 1.1, 1.2, 1.3, 1.4, 1.5, 1.6, 1.7, 1.8, 1.9, 2.0,
];

/// Index of 1.0x within [`RATE_LADDER`].
pub const NATIVE_RATE_INDEX: usize = 3;

/// Lowest music rate accepted for single-rate queries.
pub const MIN_RATE: f64 = 0.05;

/// Highest music rate accepted for single-rate queries.
pub const MAX_RATE: f64 = 10.0;

const LADDER_TOLERANCE: f64 = 0.0005;

/// Ensures `rate` is finite and within [`MIN_RATE`]..=[`MAX_RATE`].
pub fn validate_rate(rate: f64) -> Result<f64, RatingError> {
    if rate.is_finite() && (MIN_RATE..=MAX_RATE).contains(&rate) {
        Ok(rate)
    } else {
        Err(RatingError::InvalidRate(rate))
    }
}

/// Index of `rate` within [`RATE_LADDER`], if it is one of its entries.
pub fn ladder_index(rate: f64) -> Option<usize> {
    RATE_LADDER
        .iter()
        .position(|ladder_rate| (ladder_rate - rate).abs() < LADDER_TOLERANCE)
}

/// The clock rate of legacy osu! mods, i.e. 1.5 for DT/NC, 0.75 for HT,
/// and 1.0 otherwise.
pub fn rate_from_mods(mods: GameModsLegacy) -> f64 {
    mods.clock_rate()
}
