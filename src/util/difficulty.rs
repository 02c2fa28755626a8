pub fn lerp(start: f64, end: f64, amount: f64) -> f64 {
    start + (end - start) * amount
}

pub fn norm<const N: usize>(p: f64, values: [f64; N]) -> f64 {
    values
        .into_iter()
        .map(|x| f64::powf(x, p))
        .sum::<f64>()
        .powf(p.recip())
}

/// Exponential decay of `value` over `seconds` with the given per-second base.
pub fn apply_decay(value: f64, seconds: f64, decay_base: f64) -> f64 {
    value * f64::powf(decay_base, seconds)
}

/// Coefficient of variation of a sample; `0.0` for fewer than two values.
///
/// Values are divided by the sample size before summing and deviations are
/// taken relative to the mean so that large finite values cannot overflow.
pub fn coefficient_of_variation(values: impl ExactSizeIterator<Item = f64> + Clone) -> f64 {
    let n = values.len() as f64;

    if n < 2.0 {
        return 0.0;
    }

    let mean = values.clone().map(|x| x / n).sum::<f64>();

    if !mean.is_finite() {
        tracing::error!(mean, "non-finite mean interval, variation treated as zero");

        return 0.0;
    }

    if mean <= 0.0 {
        return 0.0;
    }

    let variance = values
        .map(|x| {
            let deviation = (x - mean) / mean;

            deviation * deviation
        })
        .sum::<f64>()
        / n;

    let variation = variance.sqrt();

    if !variation.is_finite() {
        tracing::error!(mean, "non-finite interval variation treated as zero");

        return 0.0;
    }

    variation
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn norm_of_single_value_is_identity() {
        assert!((norm(8.0, [3.0, 0.0, 0.0]) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn norm_is_bounded_by_count() {
        let n = norm(8.0, [2.0; 7]);

        assert!(n >= 2.0);
        assert!(n <= 2.0 * 7.0_f64.powf(1.0 / 8.0) + 1e-12);
    }

    #[test]
    fn decay() {
        assert!((apply_decay(10.0, 1.0, 0.5) - 5.0).abs() < 1e-12);
        assert!((apply_decay(10.0, 0.0, 0.5) - 10.0).abs() < 1e-12);
    }

    #[test]
    fn cv_of_even_intervals_is_zero() {
        let values = [125.0, 125.0, 125.0];

        assert!(coefficient_of_variation(values.iter().copied()) < 1e-12);
        assert!(coefficient_of_variation([100.0, 300.0].into_iter()) > 0.4);
        assert_eq!(coefficient_of_variation([1.0].into_iter()), 0.0);
    }

    #[test]
    fn cv_of_huge_intervals_stays_finite() {
        let cv = coefficient_of_variation([1e300, 3e300].into_iter());

        assert!((cv - 0.5).abs() < 1e-12);
        assert!((coefficient_of_variation([f64::MAX, f64::MAX].into_iter())).abs() < 1e-12);
    }

    #[test]
    fn cv_of_non_finite_intervals_is_zero() {
        assert_eq!(coefficient_of_variation([f64::INFINITY, 1.0].into_iter()), 0.0);
        assert_eq!(coefficient_of_variation([f64::NAN, 1.0].into_iter()), 0.0);
    }
}
