use crate::{
    attributes::{Skillset, SkillsetScores},
    difficulty::skills::stamina::{Stamina, StaminaAdjustedWindow},
    util::{
        difficulty::{lerp, norm},
        float_ext::FloatExt,
    },
};

const STREAM_MULTIPLIER: f64 = 2.1;
const JUMPSTREAM_MULTIPLIER: f64 = 1.35;
const HANDSTREAM_MULTIPLIER: f64 = 1.15;
const STAMINA_MULTIPLIER: f64 = 2.0;
const JACKSPEED_MULTIPLIER: f64 = 2.0;
const CHORDJACK_MULTIPLIER: f64 = 1.1;
const TECHNICAL_MULTIPLIER: f64 = 2.3;

const REDUCED_SECTION_COUNT: usize = 4;
const REDUCED_STRAIN_BASELINE: f64 = 0.8;

/// Weight of each window relative to the next harder one.
///
/// A window spans a couple of seconds so the weights saturate within a
/// handful of windows; the hardest windows decide the score rather than the
/// length of the chart.
const DECAY_WEIGHT: f64 = 0.5;

/// Exponent of the norm that combines the named skillsets into overall.
///
/// Overall lies within `[max, 7^(1/8) * max]` of the named skillsets.
pub const OVERALL_NORM_EXPONENT: f64 = 8.0;

/// Difficulty of a single window for a named skillset.
///
/// The stamina value additionally scales with the fatigue reached at the
/// end of the window. [`Skillset::Overall`] has no per-window value.
pub fn window_difficulty(skillset: Skillset, window: &StaminaAdjustedWindow) -> f64 {
    let features = &window.features;

    match skillset {
        Skillset::Overall => 0.0,
        Skillset::Stream => features.stream * STREAM_MULTIPLIER,
        Skillset::Jumpstream => features.jumpstream * JUMPSTREAM_MULTIPLIER,
        Skillset::Handstream => features.handstream * HANDSTREAM_MULTIPLIER,
        Skillset::Stamina => {
            features.intensity
                * STAMINA_MULTIPLIER
                * Stamina::fatigue_ratio(window.fatigue).sqrt()
        }
        Skillset::JackSpeed => features.jackspeed * JACKSPEED_MULTIPLIER,
        Skillset::Chordjack => features.chordjack * CHORDJACK_MULTIPLIER,
        Skillset::Technical => features.technical * TECHNICAL_MULTIPLIER,
    }
}

/// Reduces per-window values into one score.
///
/// The hardest sections are softened slightly so a single outlier does not
/// decide the score, then all values are summed in descending order with
/// geometrically decaying weights. A constant series converges to its value
/// after a few entries. Raising any value or adding values never lowers the
/// result.
pub fn difficulty_value(values: impl IntoIterator<Item = f64>) -> f64 {
    let mut peaks: Vec<f64> = values.into_iter().filter(|value| *value > 0.0).collect();
    peaks.sort_by(|a, b| b.total_cmp(a));

    for (i, strain) in peaks.iter_mut().take(REDUCED_SECTION_COUNT).enumerate() {
        let clamped = (i as f64 / REDUCED_SECTION_COUNT as f64).clamp(0.0, 1.0);
        let scale = f64::log10(lerp(1.0, 10.0, clamped));
        *strain *= lerp(REDUCED_STRAIN_BASELINE, 1.0, scale);
    }

    peaks.sort_by(|a, b| b.total_cmp(a));

    let mut difficulty = 0.0;
    let mut weight = 1.0;

    for strain in peaks {
        difficulty += strain * weight;
        weight *= DECAY_WEIGHT;
    }

    difficulty * (1.0 - DECAY_WEIGHT)
}

/// Combines the seven named skillsets.
///
/// Zero if and only if all of them are zero.
pub fn overall(named: [f64; 7]) -> f64 {
    let max = named.into_iter().fold(0.0, f64::max);

    if max <= 0.0 {
        return 0.0;
    }

    // Scaled by the maximum so tiny values neither underflow to zero nor
    // large ones overflow
    max * norm(OVERALL_NORM_EXPONENT, named.map(|value| value / max))
}

/// Reduces stamina-adjusted windows into the final scores.
pub fn aggregate(windows: &[StaminaAdjustedWindow], peak_fatigue: f64) -> SkillsetScores {
    let series = |skillset| {
        let values = windows
            .iter()
            .map(|window| window_difficulty(skillset, window));

        sanitize(skillset, difficulty_value(values))
    };

    let stamina = difficulty_value(
        windows
            .iter()
            .map(|window| window.features.intensity * STAMINA_MULTIPLIER),
    ) * Stamina::fatigue_ratio(peak_fatigue).sqrt();

    finalize(
        series(Skillset::Stream),
        series(Skillset::Jumpstream),
        series(Skillset::Handstream),
        sanitize(Skillset::Stamina, stamina),
        series(Skillset::JackSpeed),
        series(Skillset::Chordjack),
        series(Skillset::Technical),
    )
}

/// Builds the scores from the named skillsets in contract order and
/// derives overall.
pub fn finalize(
    stream: f64,
    jumpstream: f64,
    handstream: f64,
    stamina: f64,
    jackspeed: f64,
    chordjack: f64,
    technical: f64,
) -> SkillsetScores {
    let named = [
        stream, jumpstream, handstream, stamina, jackspeed, chordjack, technical,
    ];

    let overall = sanitize(Skillset::Overall, overall(named));

    SkillsetScores {
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

/// Clamps a computed score to a finite, non-negative value.
///
/// Non-finite values indicate a defect and are reported.
pub fn sanitize(skillset: Skillset, value: f64) -> f64 {
    if !value.is_finite() {
        tracing::error!(%skillset, value, "non-finite skillset value clamped to zero");
    }

    value.finite_non_neg()
}
