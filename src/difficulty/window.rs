use std::iter::FusedIterator;

use crate::{
    difficulty::{
        evaluators::{ChordEvaluator, JackEvaluator, StreamEvaluator, TechnicalEvaluator},
        object::RowDifficultyObject,
    },
    util::difficulty::coefficient_of_variation,
};

/// Default amount of rows per [`PatternWindow`].
pub const DEFAULT_WINDOW_ROWS: usize = 16;

/// Smallest accepted amount of rows per [`PatternWindow`].
pub const MIN_WINDOW_ROWS: usize = 2;

/// Counts gathered over the rows of one window.
///
/// Only rows that have a previous row contribute since the first row of a
/// chart has no interval to measure.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WindowStats {
    pub interval_rows: u32,
    pub notes: u32,
    /// Sum of all row intervals in milliseconds.
    pub span: f64,
    pub singles: u32,
    pub jumps: u32,
    pub hands: u32,
    /// Single-note rows that hit a column of the previous row.
    pub repeated_singles: u32,
    /// Chords that share a column with the previous row.
    pub chord_jacks: u32,
    /// Hits per second on the most repeated column.
    pub fastest_column_rate: f64,
    pub interval_variation: f64,
}

impl WindowStats {
    fn new(objects: &[RowDifficultyObject], key_count: usize) -> Self {
        let mut stats = Self::default();
        let mut column_hits = vec![(0_u32, 0.0_f64); key_count];

        for obj in objects {
            let Some(delta_time) = obj.delta_time else {
                continue;
            };

            let n_notes = obj.note_count();

            stats.interval_rows += 1;
            stats.notes += n_notes;
            stats.span += delta_time;

            match n_notes {
                1 => {
                    stats.singles += 1;
                    stats.repeated_singles += u32::from(obj.repeats_column);
                }
                2 => stats.jumps += 1,
                _ => stats.hands += 1,
            }

            if n_notes >= 2 && obj.repeats_column {
                stats.chord_jacks += 1;
            }

            let strain_times = obj.column_strain_times.iter().zip(column_hits.iter_mut());

            for (strain_time, (hits, sum)) in strain_times {
                if let Some(strain_time) = strain_time {
                    *hits += 1;
                    *sum += strain_time;
                }
            }
        }

        if !stats.span.is_finite() {
            tracing::error!(
                rows = objects.len(),
                "non-finite window span, window treated as empty"
            );

            return Self::default();
        }

        stats.fastest_column_rate = column_hits
            .iter()
            .filter(|(hits, sum)| *hits > 0 && *sum > 0.0)
            .map(|(hits, sum)| f64::from(*hits) * 1000.0 / sum)
            .fold(0.0, f64::max);

        let deltas: Vec<f64> = objects.iter().filter_map(|obj| obj.delta_time).collect();
        stats.interval_variation = coefficient_of_variation(deltas.iter().copied());

        stats
    }

    pub fn rows_per_second(&self) -> f64 {
        if self.span > 0.0 {
            f64::from(self.interval_rows) * 1000.0 / self.span
        } else {
            0.0
        }
    }

    pub fn notes_per_second(&self) -> f64 {
        if self.span > 0.0 {
            f64::from(self.notes) * 1000.0 / self.span
        } else {
            0.0
        }
    }

    /// Share of interval rows that `count` makes up.
    pub fn fraction(&self, count: u32) -> f64 {
        if self.interval_rows == 0 {
            0.0
        } else {
            f64::from(count) / f64::from(self.interval_rows)
        }
    }
}

/// Per-category pattern difficulty of a window, in rate-scaled per-second
/// units.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PatternFeatures {
    pub stream: f64,
    pub jumpstream: f64,
    pub handstream: f64,
    pub jackspeed: f64,
    pub chordjack: f64,
    pub technical: f64,
    /// Raw note density that drives fatigue.
    pub intensity: f64,
}

impl PatternFeatures {
    pub fn new(stats: &WindowStats) -> Self {
        Self {
            stream: StreamEvaluator::evaluate_diff_of(stats),
            jumpstream: ChordEvaluator::evaluate_jumpstream_of(stats),
            handstream: ChordEvaluator::evaluate_handstream_of(stats),
            jackspeed: JackEvaluator::evaluate_jackspeed_of(stats),
            chordjack: JackEvaluator::evaluate_chordjack_of(stats),
            technical: TechnicalEvaluator::evaluate_diff_of(stats),
            intensity: stats.notes_per_second(),
        }
    }

    /// Multiplies every feature with `factor`.
    #[must_use]
    pub fn scaled(self, factor: f64) -> Self {
        Self {
            stream: self.stream * factor,
            jumpstream: self.jumpstream * factor,
            handstream: self.handstream * factor,
            jackspeed: self.jackspeed * factor,
            chordjack: self.chordjack * factor,
            technical: self.technical * factor,
            intensity: self.intensity * factor,
        }
    }
}

/// A contiguous group of rows and its pattern features.
#[derive(Clone, Debug, PartialEq)]
pub struct PatternWindow {
    pub idx: usize,
    /// Start time of the first row in milliseconds.
    pub start_time: f64,
    /// Start time of the last row in milliseconds.
    pub end_time: f64,
    pub rows: usize,
    pub stats: WindowStats,
    pub features: PatternFeatures,
}

/// Lazily yields the [`PatternWindow`]s of rate-scaled rows.
///
/// Windows hold `window_rows` rows each. A trailing remainder of less than
/// half a window is merged into the last window so that no window is
/// dominated by a handful of rows. Cloning the iterator restarts it from
/// the current position.
#[derive(Clone, Debug)]
pub struct PatternWindows<'a> {
    objects: &'a [RowDifficultyObject],
    key_count: usize,
    window_rows: usize,
    next_row: usize,
    next_idx: usize,
}

impl<'a> PatternWindows<'a> {
    pub fn new(objects: &'a [RowDifficultyObject], key_count: usize, window_rows: usize) -> Self {
        Self {
            objects,
            key_count,
            window_rows: window_rows.max(MIN_WINDOW_ROWS),
            next_row: 0,
            next_idx: 0,
        }
    }

    fn window_end(&self, start: usize) -> usize {
        let len = self.objects.len();
        let end = (start + self.window_rows).min(len);

        if (len - end) * 2 < self.window_rows {
            len
        } else {
            end
        }
    }
}

impl Iterator for PatternWindows<'_> {
    type Item = PatternWindow;

    fn next(&mut self) -> Option<Self::Item> {
        let start = self.next_row;

        if start >= self.objects.len() {
            return None;
        }

        let end = self.window_end(start);
        let rows = &self.objects[start..end];

        let stats = WindowStats::new(rows, self.key_count);
        let features = PatternFeatures::new(&stats);

        let window = PatternWindow {
            idx: self.next_idx,
            start_time: rows[0].start_time,
            end_time: rows[rows.len() - 1].start_time,
            rows: rows.len(),
            stats,
            features,
        };

        self.next_row = end;
        self.next_idx += 1;

        Some(window)
    }
}

impl FusedIterator for PatternWindows<'_> {}
