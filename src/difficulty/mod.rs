use crate::{
    attributes::{
        MsdForAllRates, RatingBreakdown, Skillset, SkillsetScores, SsrRating, WindowRating,
    },
    config::CalcConfig,
    difficulty::{
        calibrate::{validate_score_goal, GoalCalibrator},
        object::{create_difficulty_objects, RowDifficultyObject},
        skills::{
            skillset::{aggregate, window_difficulty},
            stamina::{Stamina, StaminaAdjustedWindow},
        },
        window::PatternWindows,
    },
    error::RatingError,
    model::{
        chart::Chart,
        rate::{validate_rate, LADDER_LEN, RATE_LADDER},
    },
};

pub mod calibrate;
pub mod evaluators;
pub mod object;
pub mod skills;
pub mod window;

/// A [`Chart`] played at a specific music rate.
pub struct RateView<'a> {
    chart: &'a Chart,
    rate: f64,
    objects: Box<[RowDifficultyObject]>,
}

impl<'a> RateView<'a> {
    /// Fails with [`RatingError::InvalidRate`] if `rate` is not finite or
    /// outside of the supported range.
    pub fn new(chart: &'a Chart, rate: f64) -> Result<Self, RatingError> {
        let rate = validate_rate(rate)?;

        Ok(Self::new_unchecked(chart, rate))
    }

    fn new_unchecked(chart: &'a Chart, rate: f64) -> Self {
        Self {
            chart,
            rate,
            objects: create_difficulty_objects(chart, rate),
        }
    }

    pub const fn chart(&self) -> &Chart {
        self.chart
    }

    pub const fn rate(&self) -> f64 {
        self.rate
    }

    pub fn objects(&self) -> &[RowDifficultyObject] {
        &self.objects
    }

    pub fn windows(&self, window_rows: usize) -> PatternWindows<'_> {
        PatternWindows::new(&self.objects, self.chart.key_count(), window_rows)
    }
}

/// Stamina-adjusted windows of a [`RateView`].
pub struct DifficultyValues {
    pub windows: Vec<StaminaAdjustedWindow>,
    pub peak_fatigue: f64,
}

impl DifficultyValues {
    pub fn calculate(view: &RateView<'_>, window_rows: usize) -> Self {
        let mut stamina = Stamina::new();

        let windows: Vec<_> = view
            .windows(window_rows)
            .map(|window| stamina.adjust(window))
            .collect();

        tracing::debug!(
            rate = view.rate(),
            rows = view.objects().len(),
            windows = windows.len(),
            peak_fatigue = stamina.peak_fatigue(),
            "processed chart"
        );

        Self {
            windows,
            peak_fatigue: stamina.peak_fatigue(),
        }
    }

    pub fn scores(&self) -> SkillsetScores {
        aggregate(&self.windows, self.peak_fatigue)
    }
}

fn scores_at(chart: &Chart, rate: f64, window_rows: usize) -> SkillsetScores {
    let view = RateView::new_unchecked(chart, rate);

    DifficultyValues::calculate(&view, window_rows).scores()
}

#[cfg(feature = "parallel")]
fn ladder_scores(chart: &Chart, config: &CalcConfig) -> [SkillsetScores; LADDER_LEN] {
    use rayon::prelude::*;

    let window_rows = config.get_window_rows();

    if !config.get_parallel() {
        return RATE_LADDER.map(|rate| scores_at(chart, rate, window_rows));
    }

    let scores: Vec<_> = RATE_LADDER
        .par_iter()
        .map(|&rate| scores_at(chart, rate, window_rows))
        .collect();

    std::array::from_fn(|i| scores[i])
}

#[cfg(not(feature = "parallel"))]
fn ladder_scores(chart: &Chart, config: &CalcConfig) -> [SkillsetScores; LADDER_LEN] {
    let window_rows = config.get_window_rows();

    RATE_LADDER.map(|rate| scores_at(chart, rate, window_rows))
}

/// Rates `chart` at every entry of [`RATE_LADDER`].
///
/// Entries are independent of each other and rated in parallel if the
/// `parallel` feature is enabled and [`CalcConfig::parallel`] is set.
pub fn rate_all(chart: &Chart, config: &CalcConfig) -> Result<MsdForAllRates, RatingError> {
    Ok(MsdForAllRates {
        msds: ladder_scores(chart, config),
    })
}

/// Rates `chart` at `rate` and calibrates the scores to `score_goal`
/// percent.
///
/// Running out of calibration iterations is not an error; the returned
/// [`SsrRating::convergence`] reports it instead.
pub fn rate_at(
    chart: &Chart,
    rate: f64,
    score_goal: f64,
    config: &CalcConfig,
) -> Result<SsrRating, RatingError> {
    let view = RateView::new(chart, rate)?;
    let score_goal = validate_score_goal(score_goal)?;

    let values = DifficultyValues::calculate(&view, config.get_window_rows());

    let calibrator =
        GoalCalibrator::new(score_goal, config.get_max_iterations(), config.get_tolerance());

    let (skillsets, convergence) = calibrator.rate(&values.windows);

    Ok(SsrRating {
        skillsets,
        rate: view.rate(),
        score_goal,
        convergence,
    })
}

/// Rates `chart` at `rate` and keeps the per-window values.
pub fn inspect(
    chart: &Chart,
    rate: f64,
    config: &CalcConfig,
) -> Result<RatingBreakdown, RatingError> {
    let view = RateView::new(chart, rate)?;
    let values = DifficultyValues::calculate(&view, config.get_window_rows());
    let skillsets = values.scores();

    let windows = values
        .windows
        .iter()
        .map(|adjusted| WindowRating {
            start_time: adjusted.window.start_time,
            end_time: adjusted.window.end_time,
            rows: adjusted.window.rows,
            notes: adjusted.window.stats.notes,
            raw: adjusted.window.features,
            adjusted: adjusted.features,
            fatigue: adjusted.fatigue,
            stamina: window_difficulty(Skillset::Stamina, adjusted),
        })
        .collect();

    Ok(RatingBreakdown {
        rate: view.rate(),
        windows,
        peak_fatigue: values.peak_fatigue,
        skillsets,
    })
}

#[cfg(test)]
mod tests {
    use crate::model::note::NoteEvent;

    use super::*;

    fn roll(rows: usize, spacing: f64) -> Chart {
        let events: Vec<_> = (0..rows)
            .map(|i| NoteEvent::tap(i as f64 * spacing, (i % 4) as u32))
            .collect();

        Chart::new(&events).unwrap()
    }

    #[test]
    fn rate_view_rejects_invalid_rates() {
        let chart = roll(10, 0.1);

        assert!(matches!(
            RateView::new(&chart, 0.0),
            Err(RatingError::InvalidRate(_))
        ));
        assert!(RateView::new(&chart, -1.0).is_err());
        assert!(RateView::new(&chart, 1.0).is_ok());
    }

    #[test]
    fn sequential_and_parallel_agree() {
        let chart = roll(120, 0.1);
        let config = CalcConfig::new();

        let parallel = rate_all(&chart, &config.clone().parallel(true)).unwrap();
        let sequential = rate_all(&chart, &config.parallel(false)).unwrap();

        assert_eq!(parallel, sequential);
    }

    #[test]
    fn ladder_entry_matches_single_run() {
        let chart = roll(80, 0.11);
        let config = CalcConfig::new();
        let all = rate_all(&chart, &config).unwrap();

        let view = RateView::new(&chart, 1.3).unwrap();
        let single = DifficultyValues::calculate(&view, config.get_window_rows()).scores();

        assert_eq!(all.get_rate(1.3), Some(&single));
    }

    #[test]
    fn inspect_matches_scores() {
        let chart = roll(64, 0.125);
        let config = CalcConfig::new();
        let breakdown = inspect(&chart, 1.0, &config).unwrap();
        let all = rate_all(&chart, &config).unwrap();

        assert_eq!(&breakdown.skillsets, all.native());
        assert_eq!(breakdown.windows.len(), 4);
        assert!(breakdown
            .windows
            .iter()
            .all(|window| window.adjusted.stream >= window.raw.stream));
    }

    #[test]
    fn rate_at_validates_goal() {
        let chart = roll(32, 0.1);
        let config = CalcConfig::new();

        assert_eq!(
            rate_at(&chart, 1.0, 0.0, &config),
            Err(RatingError::InvalidScoreGoal(0.0))
        );
        assert_eq!(
            rate_at(&chart, 0.0, 93.0, &config),
            Err(RatingError::InvalidRate(0.0))
        );
    }
}
