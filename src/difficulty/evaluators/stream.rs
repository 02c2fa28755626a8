use crate::difficulty::window::WindowStats;

pub struct StreamEvaluator;

impl StreamEvaluator {
    const JUMP_WEIGHT: f64 = 0.5;
    const REPEAT_PENALTY: f64 = 0.25;

    /// Row density, weighted towards single notes and away from
    /// single notes that repeat the previous column.
    pub fn evaluate_diff_of(stats: &WindowStats) -> f64 {
        if stats.interval_rows == 0 {
            return 0.0;
        }

        let single_share = stats.fraction(stats.singles);
        let jump_share = stats.fraction(stats.jumps);

        let repeat_share = if stats.singles > 0 {
            f64::from(stats.repeated_singles) / f64::from(stats.singles)
        } else {
            0.0
        };

        stats.rows_per_second()
            * (single_share + Self::JUMP_WEIGHT * jump_share)
            * (1.0 - Self::REPEAT_PENALTY * repeat_share)
    }
}
