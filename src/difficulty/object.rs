use crate::model::chart::{Chart, Row};

/// Smallest interval between rows in milliseconds.
pub const MIN_DELTA_TIME: f64 = 1.0;

/// A [`Row`] after applying the music rate.
///
/// All times are in milliseconds of playback time.
#[derive(Clone, Debug, PartialEq)]
pub struct RowDifficultyObject {
    pub idx: usize,
    pub start_time: f64,
    /// Time since the previous row; `None` for the first row.
    pub delta_time: Option<f64>,
    pub notes: u32,
    /// Time since each column of this row was last hit, indexed by column.
    pub column_strain_times: Box<[Option<f64>]>,
    /// Whether this row shares a column with the previous row.
    pub repeats_column: bool,
}

impl RowDifficultyObject {
    fn new(
        base: &Row,
        last_row: Option<&Row>,
        clock_rate: f64,
        idx: usize,
        last_hit_per_column: &mut [Option<f64>],
    ) -> Self {
        let start_time = base.time * 1000.0 / clock_rate;

        let delta_time = last_row
            .map(|last| ((base.time - last.time) * 1000.0 / clock_rate).max(MIN_DELTA_TIME));

        let column_strain_times = last_hit_per_column
            .iter_mut()
            .enumerate()
            .map(|(column, last_hit)| {
                if !base.has_column(column) {
                    return None;
                }

                let strain_time = last_hit.map(|prev| (start_time - prev).max(MIN_DELTA_TIME));
                *last_hit = Some(start_time);

                strain_time
            })
            .collect();

        let repeats_column = last_row.is_some_and(|last| last.notes & base.notes != 0);

        Self {
            idx,
            start_time,
            delta_time,
            notes: base.notes,
            column_strain_times,
            repeats_column,
        }
    }

    pub const fn note_count(&self) -> u32 {
        self.notes.count_ones()
    }
}

/// Applies `clock_rate` to every row of the chart.
///
/// The rate must already be validated.
pub fn create_difficulty_objects(chart: &Chart, clock_rate: f64) -> Box<[RowDifficultyObject]> {
    let mut last_hit_per_column = vec![None; chart.key_count()].into_boxed_slice();
    let mut last_row = None;

    chart
        .rows()
        .iter()
        .enumerate()
        .map(|(idx, row)| {
            let obj =
                RowDifficultyObject::new(row, last_row, clock_rate, idx, &mut last_hit_per_column);
            last_row = Some(row);

            obj
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use crate::model::note::NoteEvent;

    use super::*;

    fn chart() -> Chart {
        Chart::new(&[
            NoteEvent::tap(0.0, 0),
            NoteEvent::tap(0.5, 1),
            NoteEvent::row(1.0, 0b0011),
        ])
        .unwrap()
    }

    #[test]
    fn applies_clock_rate() {
        let objects = create_difficulty_objects(&chart(), 2.0);

        assert_eq!(objects.len(), 3);
        assert!(objects[0].delta_time.is_none());
        assert!((objects[1].start_time - 250.0).abs() < 1e-9);
        assert_eq!(objects[1].delta_time, Some(250.0));
        assert_eq!(objects[2].delta_time, Some(250.0));
    }

    #[test]
    fn tracks_column_repetition() {
        let objects = create_difficulty_objects(&chart(), 1.0);

        assert_eq!(objects[0].column_strain_times[0], None);
        assert_eq!(objects[2].column_strain_times[0], Some(1000.0));
        assert_eq!(objects[2].column_strain_times[1], Some(500.0));
        assert_eq!(objects[2].column_strain_times[2], None);
        assert!(objects[2].repeats_column);
        assert!(!objects[1].repeats_column);
    }
}
