use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};

use crate::{
    error::ChartError,
    model::{note::NoteEvent, rate::MIN_RATE},
};

/// Highest supported amount of columns.
pub const MAX_KEY_COUNT: usize = 10;

/// Events closer than this many seconds to the start of a row are merged
/// into that row.
pub const ROW_MERGE_EPSILON: f64 = 0.0005;

const DEFAULT_KEY_COUNT: usize = 4;

/// All notes that are hit at the same time.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Row {
    /// Time in seconds.
    pub time: f64,
    /// Column bitmask.
    pub notes: u32,
}

impl Row {
    pub const fn note_count(&self) -> u32 {
        self.notes.count_ones()
    }

    pub const fn has_column(&self, column: usize) -> bool {
        self.notes & (1 << column) != 0
    }
}

/// A validated, time-ordered sequence of [`Row`]s.
///
/// Charts are immutable once created; every query borrows them.
#[derive(Clone, Debug, PartialEq)]
pub struct Chart {
    rows: Box<[Row]>,
    key_count: usize,
    fingerprint: u64,
}

impl Chart {
    /// Normalize all given events, inferring the key count.
    ///
    /// The key count is the highest used column plus one but at least 4.
    pub fn new(events: &[NoteEvent]) -> Result<Self, ChartError> {
        Self::normalize(events, events.len(), None)
    }

    /// Normalize all given events for a fixed key count.
    pub fn with_key_count(events: &[NoteEvent], key_count: usize) -> Result<Self, ChartError> {
        Self::normalize(events, events.len(), Some(key_count))
    }

    /// Normalize the first `count` events.
    ///
    /// Fails if `count` exceeds the length of `events`.
    pub fn from_raw_parts(events: &[NoteEvent], count: usize) -> Result<Self, ChartError> {
        Self::normalize(events, count, None)
    }

    fn normalize(
        events: &[NoteEvent],
        count: usize,
        key_count: Option<usize>,
    ) -> Result<Self, ChartError> {
        let Some(events) = events.get(..count) else {
            return Err(ChartError::CountMismatch {
                count,
                len: events.len(),
            });
        };

        if let Some(key_count) = key_count {
            if key_count == 0 || key_count > MAX_KEY_COUNT {
                return Err(ChartError::UnsupportedKeyCount(key_count));
            }
        }

        let allowed_columns = column_mask(key_count.unwrap_or(MAX_KEY_COUNT));
        let mut hittable = Vec::with_capacity(events.len());

        for (index, event) in events.iter().enumerate() {
            if !event.time.is_finite() {
                return Err(ChartError::NonFiniteTime { index });
            }

            if event.time < 0.0 {
                return Err(ChartError::NegativeTime {
                    index,
                    time: event.time,
                });
            }

            // Later times overflow once scaled to milliseconds at the slowest rate
            if !(event.time * 1000.0 / MIN_RATE).is_finite() {
                return Err(ChartError::TimeOutOfRange {
                    index,
                    time: event.time,
                });
            }

            if event.columns == 0 {
                return Err(ChartError::NoColumns { index });
            }

            if event.columns & !allowed_columns != 0 {
                return Err(ChartError::ColumnOutOfRange {
                    index,
                    key_count: key_count.unwrap_or(MAX_KEY_COUNT),
                });
            }

            if event.is_hittable() {
                hittable.push(Row {
                    time: event.time,
                    notes: event.columns,
                });
            }
        }

        // Stable so that equal times keep their input order
        hittable.sort_by(|a, b| a.time.total_cmp(&b.time));

        let mut rows: Vec<Row> = Vec::with_capacity(hittable.len());

        for note in hittable {
            match rows.last_mut() {
                Some(row) if note.time - row.time < ROW_MERGE_EPSILON => row.notes |= note.notes,
                _ => rows.push(note),
            }
        }

        if rows.is_empty() {
            return Err(ChartError::Empty);
        }

        let key_count = key_count.unwrap_or_else(|| infer_key_count(&rows));
        let fingerprint = fingerprint(&rows, key_count);

        Ok(Self {
            rows: rows.into_boxed_slice(),
            key_count,
            fingerprint,
        })
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Amount of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Always `false`; empty charts are rejected.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub const fn key_count(&self) -> usize {
        self.key_count
    }

    /// Total amount of notes across all rows.
    pub fn note_count(&self) -> u32 {
        self.rows.iter().map(Row::note_count).sum()
    }

    /// Seconds between the first and the last row.
    pub fn duration(&self) -> f64 {
        match (self.rows.first(), self.rows.last()) {
            (Some(first), Some(last)) => last.time - first.time,
            _ => 0.0,
        }
    }

    /// Hash of the rows and key count.
    ///
    /// Equal charts share a fingerprint within one process. The value is
    /// not stable across builds or processes and must not be persisted.
    pub const fn fingerprint(&self) -> u64 {
        self.fingerprint
    }
}

const fn column_mask(key_count: usize) -> u32 {
    (1 << key_count) - 1
}

fn infer_key_count(rows: &[Row]) -> usize {
    let used = rows.iter().fold(0, |used, row| used | row.notes);
    let highest = (u32::BITS - used.leading_zeros()) as usize;

    highest.max(DEFAULT_KEY_COUNT)
}

fn fingerprint(rows: &[Row], key_count: usize) -> u64 {
    let mut hasher = DefaultHasher::new();
    key_count.hash(&mut hasher);

    for row in rows {
        row.time.to_bits().hash(&mut hasher);
        row.notes.hash(&mut hasher);
    }

    hasher.finish()
}
