use crate::{
    difficulty::window::{PatternFeatures, PatternWindow},
    util::difficulty::apply_decay,
};

/// A [`PatternWindow`] whose features account for accumulated fatigue.
#[derive(Clone, Debug, PartialEq)]
pub struct StaminaAdjustedWindow {
    pub window: PatternWindow,
    /// Fatigue after playing this window.
    pub fatigue: f64,
    /// Factor applied to the raw features.
    pub multiplier: f64,
    pub features: PatternFeatures,
}

/// Fatigue accumulator across the windows of a chart.
///
/// Fatigue grows with every second spent above [`Stamina::FATIGUE_FLOOR`]
/// notes per second and only recovers in windows below
/// [`Stamina::FATIGUE_REFERENCE`]. Windows at or above the reference never
/// lower fatigue, so adding dense sections earlier in a chart can only make
/// later sections harder.
#[derive(Clone, Debug, Default)]
pub struct Stamina {
    fatigue: f64,
    peak_fatigue: f64,
}

impl Stamina {
    /// Notes per second from which fatigue builds up.
    pub const FATIGUE_FLOOR: f64 = 2.5;
    /// Notes per second from which fatigue no longer recovers.
    pub const FATIGUE_REFERENCE: f64 = 6.0;
    /// Fatigue retained per second of full rest.
    pub const RECOVERY_BASE: f64 = 0.85;
    /// Fatigue at which half of the stamina bonus is reached.
    pub const FATIGUE_HALF: f64 = 400.0;
    /// Largest relative increase of a window's features.
    pub const STAMINA_WEIGHT: f64 = 0.25;

    pub fn new() -> Self {
        Self::default()
    }

    pub const fn fatigue(&self) -> f64 {
        self.fatigue
    }

    pub const fn peak_fatigue(&self) -> f64 {
        self.peak_fatigue
    }

    /// Fatigue mapped into `[0, 1)`.
    pub fn fatigue_ratio(fatigue: f64) -> f64 {
        if fatigue > 0.0 {
            fatigue / (fatigue + Self::FATIGUE_HALF)
        } else {
            0.0
        }
    }

    pub fn multiplier(fatigue: f64) -> f64 {
        1.0 + Self::STAMINA_WEIGHT * Self::fatigue_ratio(fatigue)
    }

    /// Advances fatigue over `window` and returns the new fatigue.
    ///
    /// A window that would make fatigue non-finite leaves it unchanged.
    pub fn process(&mut self, window: &PatternWindow) -> f64 {
        let intensity = window.features.intensity;
        let seconds = window.stats.span / 1000.0;

        let slack = (1.0 - intensity / Self::FATIGUE_REFERENCE).max(0.0);
        let decayed = apply_decay(self.fatigue, seconds * slack, Self::RECOVERY_BASE);
        let fatigue = decayed + (intensity - Self::FATIGUE_FLOOR).max(0.0) * seconds;

        if fatigue.is_finite() {
            self.fatigue = fatigue;
        } else {
            tracing::error!(
                window = window.idx,
                intensity,
                seconds,
                "non-finite fatigue, keeping the previous value"
            );
        }

        self.peak_fatigue = self.peak_fatigue.max(self.fatigue);

        self.fatigue
    }

    pub fn adjust(&mut self, window: PatternWindow) -> StaminaAdjustedWindow {
        let fatigue = self.process(&window);
        let multiplier = Self::multiplier(fatigue);
        let features = window.features.scaled(multiplier);

        StaminaAdjustedWindow {
            window,
            fatigue,
            multiplier,
            features,
        }
    }
}
