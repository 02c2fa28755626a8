use crate::difficulty::window::WindowStats;

pub struct ChordEvaluator;

impl ChordEvaluator {
    // * Chords that jack into each other are rated by chordjack instead
    const CHORDJACK_PENALTY: f64 = 0.5;

    pub fn evaluate_jumpstream_of(stats: &WindowStats) -> f64 {
        Self::chord_density(stats, stats.jumps)
    }

    pub fn evaluate_handstream_of(stats: &WindowStats) -> f64 {
        Self::chord_density(stats, stats.hands)
    }

    fn chord_density(stats: &WindowStats, chords: u32) -> f64 {
        if chords == 0 {
            return 0.0;
        }

        let chordjack_share = stats.fraction(stats.chord_jacks);

        stats.notes_per_second()
            * stats.fraction(chords).sqrt()
            * (1.0 - Self::CHORDJACK_PENALTY * chordjack_share)
    }
}
