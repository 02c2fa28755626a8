#![allow(unused)]

use msd_calc::{Chart, NoteEvent, SkillsetScores};

/// Single notes cycling through four columns.
pub fn roll(rows: usize, spacing: f64) -> Chart {
    let events: Vec<_> = (0..rows)
        .map(|i| NoteEvent::tap(i as f64 * spacing, (i % 4) as u32))
        .collect();

    Chart::new(&events).unwrap()
}

/// Single notes on one column.
pub fn jacks(rows: usize, spacing: f64) -> Chart {
    let events: Vec<_> = (0..rows)
        .map(|i| NoteEvent::tap(i as f64 * spacing, 0))
        .collect();

    Chart::new(&events).unwrap()
}

/// Rows alternating between the given column masks.
pub fn chords(rows: usize, spacing: f64, masks: &[u32]) -> Chart {
    let events: Vec<_> = (0..rows)
        .map(|i| NoteEvent::row(i as f64 * spacing, masks[i % masks.len()]))
        .collect();

    Chart::new(&events).unwrap()
}

/// Dense roll followed by a slower roll.
pub fn burst_then_rest(burst_rows: usize, rest_rows: usize) -> Chart {
    let burst = (0..burst_rows).map(|i| NoteEvent::tap(i as f64 * 0.08, (i % 4) as u32));

    let offset = burst_rows as f64 * 0.08;
    let rest = (0..rest_rows).map(|i| NoteEvent::tap(offset + i as f64 * 0.4, (i % 4) as u32));

    let events: Vec<_> = burst.chain(rest).collect();

    Chart::new(&events).unwrap()
}

/// One continuous roll through consecutive `(rows, spacing)` sections.
///
/// The first row of each section follows the previous row after the
/// section's own spacing.
pub fn sections(parts: &[(usize, f64)]) -> Chart {
    let mut events = Vec::new();
    let mut time = 0.0;

    for &(rows, spacing) in parts {
        for _ in 0..rows {
            if !events.is_empty() {
                time += spacing;
            }

            events.push(NoteEvent::tap(time, (events.len() % 4) as u32));
        }
    }

    Chart::new(&events).unwrap()
}

pub fn assert_valid(scores: &SkillsetScores) {
    assert!(scores.is_valid(), "invalid scores: {scores:?}");
}

pub fn assert_close(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected}, got {actual} (tolerance {tolerance})"
    );
}
