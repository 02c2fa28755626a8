use crate::difficulty::window::{DEFAULT_WINDOW_ROWS, MIN_WINDOW_ROWS};

/// Settings shared by every query of a [`Calc`](crate::Calc).
///
/// # Example
///
/// ```
/// use msd_calc::CalcConfig;
///
/// let config = CalcConfig::new()
///     .window_rows(24)
///     .max_iterations(48)
///     .cache_capacity(0);
///
/// assert_eq!(config.get_window_rows(), 24);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[must_use]
pub struct CalcConfig {
    window_rows: usize,
    max_iterations: u32,
    tolerance: f64,
    cache_capacity: usize,
    parallel: bool,
}

impl CalcConfig {
    pub const DEFAULT_MAX_ITERATIONS: u32 = 32;
    pub const DEFAULT_TOLERANCE: f64 = 0.005;
    pub const DEFAULT_CACHE_CAPACITY: usize = 64;

    pub const fn new() -> Self {
        Self {
            window_rows: DEFAULT_WINDOW_ROWS,
            max_iterations: Self::DEFAULT_MAX_ITERATIONS,
            tolerance: Self::DEFAULT_TOLERANCE,
            cache_capacity: Self::DEFAULT_CACHE_CAPACITY,
            parallel: true,
        }
    }

    /// Amount of rows per pattern window.
    ///
    /// Values below 2 are raised to 2.
    pub const fn window_rows(mut self, window_rows: usize) -> Self {
        self.window_rows = if window_rows < MIN_WINDOW_ROWS {
            MIN_WINDOW_ROWS
        } else {
            window_rows
        };

        self
    }

    /// Iteration budget of the score goal calibration per skillset.
    pub const fn max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;

        self
    }

    /// Width of the search interval at which the score goal calibration
    /// counts as converged.
    pub const fn tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;

        self
    }

    /// Amount of results a session keeps around. `0` disables caching.
    pub const fn cache_capacity(mut self, cache_capacity: usize) -> Self {
        self.cache_capacity = cache_capacity;

        self
    }

    /// Whether batch queries rate the ladder entries in parallel.
    ///
    /// Only has an effect with the `parallel` feature.
    pub const fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;

        self
    }

    pub const fn get_window_rows(&self) -> usize {
        self.window_rows
    }

    pub const fn get_max_iterations(&self) -> u32 {
        self.max_iterations
    }

    pub const fn get_tolerance(&self) -> f64 {
        self.tolerance
    }

    pub const fn get_cache_capacity(&self) -> usize {
        self.cache_capacity
    }

    pub const fn get_parallel(&self) -> bool {
        self.parallel
    }
}

impl Default for CalcConfig {
    fn default() -> Self {
        Self::new()
    }
}
