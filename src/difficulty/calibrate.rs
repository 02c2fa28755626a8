use crate::{
    attributes::{Convergence, Skillset, SkillsetScores},
    difficulty::skills::{
        skillset::{finalize, sanitize, window_difficulty},
        stamina::StaminaAdjustedWindow,
    },
    error::RatingError,
};

/// Exponent of the accuracy drop-off once a window is harder than the
/// player's skill.
pub const ACCURACY_FALLOFF: f64 = 2.0;

/// Highest accepted score goal in percent.
pub const MAX_SCORE_GOAL: f64 = 100.0;

/// Checks that `score_goal` is a percentage in `(0, 100]`.
pub fn validate_score_goal(score_goal: f64) -> Result<f64, RatingError> {
    if score_goal.is_finite() && score_goal > 0.0 && score_goal <= MAX_SCORE_GOAL {
        Ok(score_goal)
    } else {
        Err(RatingError::InvalidScoreGoal(score_goal))
    }
}

/// Expected accuracy of a player with `skill` on a section of difficulty
/// `difficulty`.
pub fn section_accuracy(difficulty: f64, skill: f64) -> f64 {
    if difficulty <= skill {
        1.0
    } else if skill <= 0.0 {
        0.0
    } else {
        (skill / difficulty).powf(ACCURACY_FALLOFF)
    }
}

/// A section's difficulty and the amount of notes it contributes.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Section {
    pub difficulty: f64,
    pub notes: f64,
}

/// Note-weighted expected accuracy over all sections, in `[0, 1]`.
pub fn expected_accuracy(sections: &[Section], skill: f64) -> f64 {
    let total: f64 = sections.iter().map(|section| section.notes).sum();

    if total <= 0.0 {
        return 1.0;
    }

    let hit: f64 = sections
        .iter()
        .map(|section| section.notes * section_accuracy(section.difficulty, skill))
        .sum();

    hit / total
}

/// Finds the lowest skill whose expected accuracy reaches a score goal.
///
/// Expected accuracy only grows with skill so a bisection between zero and
/// the hardest section always closes in on the answer. The search stops
/// once the interval is narrower than the tolerance or the iteration budget
/// runs out; in both cases the upper bound is returned since it is known to
/// reach the goal.
#[derive(Clone, Debug, PartialEq)]
pub struct GoalCalibrator {
    target: f64,
    max_iterations: u32,
    tolerance: f64,
}

impl GoalCalibrator {
    /// `score_goal` must already be validated through
    /// [`validate_score_goal`].
    pub fn new(score_goal: f64, max_iterations: u32, tolerance: f64) -> Self {
        Self {
            target: score_goal / MAX_SCORE_GOAL,
            max_iterations,
            tolerance,
        }
    }

    pub fn calibrate(&self, sections: &[Section]) -> (f64, Convergence) {
        let mut lo = 0.0;
        let mut hi = sections
            .iter()
            .map(|section| section.difficulty)
            .fold(0.0, f64::max);

        let mut iterations = 0;

        while iterations < self.max_iterations && hi - lo > self.tolerance {
            let mid = (lo + hi) / 2.0;

            if expected_accuracy(sections, mid) >= self.target {
                hi = mid;
            } else {
                lo = mid;
            }

            iterations += 1;
        }

        let residual = hi - lo;

        let convergence = if residual <= self.tolerance {
            Convergence::Converged { iterations }
        } else {
            Convergence::NonConvergence {
                iterations,
                residual,
            }
        };

        (hi, convergence)
    }

    /// Calibrates every named skillset over the given windows.
    pub fn rate(&self, windows: &[StaminaAdjustedWindow]) -> (SkillsetScores, Convergence) {
        let mut convergence = Convergence::Converged { iterations: 0 };
        let mut named = [0.0; 7];

        for (value, skillset) in named.iter_mut().zip(Skillset::NAMED) {
            let sections: Vec<_> = windows
                .iter()
                .map(|window| Section {
                    difficulty: window_difficulty(skillset, window),
                    notes: f64::from(window.window.stats.notes),
                })
                .collect();

            let (skill, outcome) = self.calibrate(&sections);

            if let Convergence::NonConvergence {
                iterations,
                residual,
            } = outcome
            {
                tracing::warn!(
                    %skillset,
                    iterations,
                    residual,
                    "score goal calibration did not converge"
                );
            }

            *value = sanitize(skillset, skill);
            convergence = convergence.merge(outcome);
        }

        let [stream, jumpstream, handstream, stamina, jackspeed, chordjack, technical] = named;

        let scores = finalize(
            stream, jumpstream, handstream, stamina, jackspeed, chordjack, technical,
        );

        (scores, convergence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sections(values: &[(f64, f64)]) -> Vec<Section> {
        values
            .iter()
            .map(|&(difficulty, notes)| Section { difficulty, notes })
            .collect()
    }

    #[test]
    fn score_goal_range() {
        assert!(validate_score_goal(93.0).is_ok());
        assert!(validate_score_goal(100.0).is_ok());
        assert_eq!(
            validate_score_goal(0.0),
            Err(RatingError::InvalidScoreGoal(0.0))
        );
        assert!(validate_score_goal(100.5).is_err());
        assert!(validate_score_goal(f64::NAN).is_err());
    }

    #[test]
    fn accuracy_grows_with_skill() {
        let sections = sections(&[(10.0, 20.0), (5.0, 40.0), (20.0, 5.0)]);

        let low = expected_accuracy(&sections, 4.0);
        let mid = expected_accuracy(&sections, 10.0);
        let high = expected_accuracy(&sections, 20.0);

        assert!(low < mid);
        assert!(mid < high);
        assert!((high - 1.0).abs() < 1e-12);
    }

    #[test]
    fn full_goal_needs_hardest_section() {
        let calibrator = GoalCalibrator::new(100.0, 64, 1e-6);
        let (skill, convergence) = calibrator.calibrate(&sections(&[(3.0, 10.0), (8.0, 10.0)]));

        assert!(convergence.is_converged());
        assert!((skill - 8.0).abs() < 1e-5);
    }

    #[test]
    fn reaches_goal() {
        let calibrator = GoalCalibrator::new(93.0, 32, 0.005);
        let sections = sections(&[(6.0, 30.0), (9.0, 20.0), (12.0, 10.0)]);
        let (skill, convergence) = calibrator.calibrate(&sections);

        assert!(convergence.is_converged());
        assert!(expected_accuracy(&sections, skill) >= 0.93);
        assert!(expected_accuracy(&sections, skill - 0.01) < 0.93);
    }

    #[test]
    fn higher_goal_never_lowers_skill() {
        let sections = sections(&[(6.0, 30.0), (9.0, 20.0), (12.0, 10.0)]);

        let skills: Vec<_> = [50.0, 80.0, 93.0, 96.0, 99.0, 100.0]
            .into_iter()
            .map(|goal| GoalCalibrator::new(goal, 32, 0.005).calibrate(&sections).0)
            .collect();

        assert!(skills.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn budget_exhaustion_is_reported() {
        let calibrator = GoalCalibrator::new(93.0, 1, 0.005);
        let (skill, convergence) = calibrator.calibrate(&sections(&[(10.0, 1.0)]));

        assert_eq!(
            convergence,
            Convergence::NonConvergence {
                iterations: 1,
                residual: 5.0
            }
        );
        assert!((skill - 10.0).abs() < 1e-12);
    }

    #[test]
    fn no_sections() {
        let calibrator = GoalCalibrator::new(93.0, 32, 0.005);
        let (skill, convergence) = calibrator.calibrate(&[]);

        assert_eq!(skill, 0.0);
        assert_eq!(convergence, Convergence::Converged { iterations: 0 });
    }
}
