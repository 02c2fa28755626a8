use std::{collections::BTreeMap, fmt};

use crate::{
    difficulty::window::PatternFeatures,
    error::RatingError,
    model::rate::{ladder_index, LADDER_LEN, NATIVE_RATE_INDEX, RATE_LADDER},
};

/// The eight difficulty axes, in the order consumers index them.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Skillset {
    Overall,
    Stream,
    Jumpstream,
    Handstream,
    Stamina,
    JackSpeed,
    Chordjack,
    Technical,
}

impl Skillset {
    pub const ALL: [Self; 8] = [
        Self::Overall,
        Self::Stream,
        Self::Jumpstream,
        Self::Handstream,
        Self::Stamina,
        Self::JackSpeed,
        Self::Chordjack,
        Self::Technical,
    ];

    /// All skillsets except [`Skillset::Overall`].
    pub const NAMED: [Self; 7] = [
        Self::Stream,
        Self::Jumpstream,
        Self::Handstream,
        Self::Stamina,
        Self::JackSpeed,
        Self::Chordjack,
        Self::Technical,
    ];

    /// Position within [`SkillsetScores::to_array`].
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Overall => "overall",
            Self::Stream => "stream",
            Self::Jumpstream => "jumpstream",
            Self::Handstream => "handstream",
            Self::Stamina => "stamina",
            Self::JackSpeed => "jackspeed",
            Self::Chordjack => "chordjack",
            Self::Technical => "technical",
        }
    }
}

impl fmt::Display for Skillset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Difficulty scores for every [`Skillset`].
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillsetScores {
    pub overall: f64,
    pub stream: f64,
    pub jumpstream: f64,
    pub handstream: f64,
    pub stamina: f64,
    pub jackspeed: f64,
    pub chordjack: f64,
    pub technical: f64,
}

impl SkillsetScores {
    /// All scores in [`Skillset::ALL`] order.
    pub const fn to_array(&self) -> [f64; 8] {
        [
            self.overall,
            self.stream,
            self.jumpstream,
            self.handstream,
            self.stamina,
            self.jackspeed,
            self.chordjack,
            self.technical,
        ]
    }

    pub const fn from_array(values: [f64; 8]) -> Self {
        let [overall, stream, jumpstream, handstream, stamina, jackspeed, chordjack, technical] =
            values;

        Self {
            overall,
            stream,
            jumpstream,
            handstream,
            stamina,
            jackspeed,
            chordjack,
            technical,
        }
    }

    pub const fn get(&self, skillset: Skillset) -> f64 {
        self.to_array()[skillset.index()]
    }

    /// The seven scores that make up the overall score.
    pub const fn named(&self) -> [f64; 7] {
        [
            self.stream,
            self.jumpstream,
            self.handstream,
            self.stamina,
            self.jackspeed,
            self.chordjack,
            self.technical,
        ]
    }

    /// Whether every score is finite and non-negative.
    pub fn is_valid(&self) -> bool {
        self.to_array()
            .into_iter()
            .all(|value| value.is_finite() && value >= 0.0)
    }

    /// The highest scoring skillset other than overall.
    ///
    /// Ties resolve to the skillset that comes first.
    pub fn dominant_skillset(&self) -> Skillset {
        self.highest_patterns(1)
            .first()
            .copied()
            .unwrap_or(Skillset::Stream)
    }

    /// The `n` highest scoring skillsets other than overall, highest first.
    pub fn highest_patterns(&self, n: usize) -> Vec<Skillset> {
        let mut patterns: Vec<_> = Skillset::NAMED
            .into_iter()
            .map(|skillset| (skillset, self.get(skillset)))
            .collect();

        // Stable sort so ties keep skillset order
        patterns.sort_by(|(_, a), (_, b)| b.total_cmp(a));

        patterns
            .into_iter()
            .take(n)
            .map(|(skillset, _)| skillset)
            .collect()
    }

    /// Alias for `jumpstream` on 6K and 7K charts.
    pub const fn chordstream(&self) -> f64 {
        self.jumpstream
    }

    /// Alias for `handstream` on 6K and 7K charts.
    pub const fn bracketing(&self) -> f64 {
        self.handstream
    }
}

impl From<[f64; 8]> for SkillsetScores {
    fn from(values: [f64; 8]) -> Self {
        Self::from_array(values)
    }
}

impl From<SkillsetScores> for [f64; 8] {
    fn from(scores: SkillsetScores) -> Self {
        scores.to_array()
    }
}

/// Scores for every entry of [`RATE_LADDER`], index-aligned.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MsdForAllRates {
    pub msds: [SkillsetScores; LADDER_LEN],
}

impl MsdForAllRates {
    /// Scores at 1.0x.
    pub const fn native(&self) -> &SkillsetScores {
        &self.msds[NATIVE_RATE_INDEX]
    }

    /// Scores for one of the ladder rates.
    ///
    /// Returns `None` for rates that are not part of [`RATE_LADDER`].
    pub fn get_rate(&self, rate: f64) -> Option<&SkillsetScores> {
        ladder_index(rate).map(|idx| &self.msds[idx])
    }

    pub fn available_rates(&self) -> [f64; LADDER_LEN] {
        RATE_LADDER
    }

    /// Iterates over `(rate, scores)` pairs in ladder order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (f64, &SkillsetScores)> {
        RATE_LADDER.into_iter().zip(self.msds.iter())
    }

    /// Scores keyed by the rate formatted with one decimal, e.g. `"1.0"`.
    pub fn as_map(&self) -> BTreeMap<String, SkillsetScores> {
        self.iter()
            .map(|(rate, scores)| (format!("{rate:.1}"), *scores))
            .collect()
    }

    /// Whether every score of every rate is finite and non-negative.
    pub fn is_valid(&self) -> bool {
        self.msds.iter().all(SkillsetScores::is_valid)
    }
}

/// Outcome of the score goal calibration.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Convergence {
    Converged { iterations: u32 },
    /// The iteration budget ran out; `residual` is the width of the
    /// remaining search interval.
    NonConvergence { iterations: u32, residual: f64 },
}

impl Convergence {
    pub const fn is_converged(&self) -> bool {
        matches!(self, Self::Converged { .. })
    }

    pub const fn iterations(&self) -> u32 {
        match self {
            Self::Converged { iterations } | Self::NonConvergence { iterations, .. } => {
                *iterations
            }
        }
    }

    /// Combines the outcomes of two searches, keeping the worse one.
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        let iterations = self.iterations().max(other.iterations());

        match (self, other) {
            (Self::Converged { .. }, Self::Converged { .. }) => Self::Converged { iterations },
            (Self::NonConvergence { residual, .. }, Self::Converged { .. })
            | (Self::Converged { .. }, Self::NonConvergence { residual, .. }) => {
                Self::NonConvergence {
                    iterations,
                    residual,
                }
            }
            (
                Self::NonConvergence { residual: a, .. },
                Self::NonConvergence { residual: b, .. },
            ) => Self::NonConvergence {
                iterations,
                residual: a.max(b),
            },
        }
    }
}

/// Scores at one music rate, calibrated to a score goal.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SsrRating {
    pub skillsets: SkillsetScores,
    pub rate: f64,
    /// Score goal in percent.
    pub score_goal: f64,
    pub convergence: Convergence,
}

impl SsrRating {
    /// Turns a calibration that ran out of iterations into an error.
    pub fn require_converged(self) -> Result<Self, RatingError> {
        match self.convergence {
            Convergence::Converged { .. } => Ok(self),
            Convergence::NonConvergence {
                iterations,
                residual,
            } => Err(RatingError::CalibrationNonConvergence {
                iterations,
                residual,
            }),
        }
    }
}

/// Per-window values of a rating, for inspecting how a chart was rated.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RatingBreakdown {
    pub rate: f64,
    pub windows: Vec<WindowRating>,
    pub peak_fatigue: f64,
    pub skillsets: SkillsetScores,
}

impl RatingBreakdown {
    /// Per-window stamina difficulty in chart order.
    pub fn stamina_curve(&self) -> Vec<f64> {
        self.windows.iter().map(|window| window.stamina).collect()
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WindowRating {
    /// Rate-scaled milliseconds.
    pub start_time: f64,
    pub end_time: f64,
    pub rows: usize,
    pub notes: u32,
    pub raw: PatternFeatures,
    pub adjusted: PatternFeatures,
    pub fatigue: f64,
    pub stamina: f64,
}
