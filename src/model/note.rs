/// A single raw input event.
///
/// Columns are a bitmask where bit `i` stands for column `i`, so one event
/// may describe a whole chord.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NoteEvent {
    /// Time of the event in seconds.
    pub time: f64,
    pub columns: u32,
    pub kind: NoteKind,
}

impl NoteEvent {
    pub const fn new(time: f64, columns: u32, kind: NoteKind) -> Self {
        Self {
            time,
            columns,
            kind,
        }
    }

    /// A single tap on `column`.
    ///
    /// Columns from 32 on cannot be represented and yield an event without
    /// columns, which charts reject.
    pub const fn tap(time: f64, column: u32) -> Self {
        let columns = match 1_u32.checked_shl(column) {
            Some(mask) => mask,
            None => 0,
        };

        Self::new(time, columns, NoteKind::Tap)
    }

    /// Taps on every column of the `columns` bitmask.
    pub const fn row(time: f64, columns: u32) -> Self {
        Self::new(time, columns, NoteKind::Tap)
    }

    /// Whether the event has to be hit by the player.
    pub const fn is_hittable(&self) -> bool {
        self.kind.is_hittable()
    }

    /// Amount of columns used by the event.
    pub const fn note_count(&self) -> u32 {
        self.columns.count_ones()
    }
}

/// Kind of a [`NoteEvent`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NoteKind {
    #[default]
    Tap,
    HoldStart,
    HoldEnd,
    Mine,
}

impl NoteKind {
    /// Hold releases and mines are not rated.
    pub const fn is_hittable(self) -> bool {
        matches!(self, Self::Tap | Self::HoldStart)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tap_sets_single_bit() {
        let note = NoteEvent::tap(1.5, 2);

        assert_eq!(note.columns, 0b0100);
        assert_eq!(note.note_count(), 1);
        assert!(note.is_hittable());
    }

    #[test]
    fn tap_beyond_mask_has_no_columns() {
        assert_eq!(NoteEvent::tap(0.0, 31).columns, 1 << 31);
        assert_eq!(NoteEvent::tap(0.0, 32).columns, 0);
        assert_eq!(NoteEvent::tap(0.0, 40).note_count(), 0);
    }

    #[test]
    fn hold_ends_and_mines_are_skipped() {
        assert!(NoteKind::HoldStart.is_hittable());
        assert!(!NoteKind::HoldEnd.is_hittable());
        assert!(!NoteKind::Mine.is_hittable());
    }
}
