use crate::difficulty::window::WindowStats;

pub struct JackEvaluator;

impl JackEvaluator {
    pub fn evaluate_jackspeed_of(stats: &WindowStats) -> f64 {
        stats.fastest_column_rate
    }

    pub fn evaluate_chordjack_of(stats: &WindowStats) -> f64 {
        stats.notes_per_second() * stats.fraction(stats.chord_jacks)
    }
}
