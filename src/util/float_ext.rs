pub trait FloatExt: Sized {
    /// Replaces NaN, infinities and negative values with `0.0`.
    fn finite_non_neg(self) -> Self;
}

impl FloatExt for f64 {
    fn finite_non_neg(self) -> Self {
        if self.is_finite() && self > 0.0 {
            self
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::FloatExt;

    #[test]
    fn finite_non_neg_clamps() {
        assert_eq!(f64::NAN.finite_non_neg(), 0.0);
        assert_eq!(f64::INFINITY.finite_non_neg(), 0.0);
        assert_eq!((-3.0_f64).finite_non_neg(), 0.0);
        assert_eq!(2.5_f64.finite_non_neg(), 2.5);
    }
}
