use crate::difficulty::window::WindowStats;

pub struct TechnicalEvaluator;

impl TechnicalEvaluator {
    const VARIATION_WEIGHT: f64 = 0.6;
    const MIXING_WEIGHT: f64 = 0.4;

    /// Row density scaled by how irregular the rhythm is and by how much
    /// singles, jumps, and hands are mixed.
    pub fn evaluate_diff_of(stats: &WindowStats) -> f64 {
        if stats.interval_rows == 0 {
            return 0.0;
        }

        let dominant_share = stats
            .fraction(stats.singles)
            .max(stats.fraction(stats.jumps))
            .max(stats.fraction(stats.hands));

        let irregularity = Self::VARIATION_WEIGHT * stats.interval_variation.min(1.0)
            + Self::MIXING_WEIGHT * (1.0 - dominant_share);

        stats.rows_per_second() * irregularity
    }
}
