//! Small numeric helpers shared by the builder and the resampler.

/// Rounds to the nearest integer, halves away from zero (`f64::round`).
pub(crate) fn round_i32(value: f64) -> i32 {
    value.round() as i32
}

/// Scales `base` by `num / den` and rounds to the nearest integer.
pub(crate) fn scale_rounded(base: u32, num: u32, den: u32) -> u32 {
    debug_assert!(den > 0);
    round_i32(f64::from(base) * f64::from(num) / f64::from(den)).max(0) as u32
}

/// Raises `base` to `exp`, saturating instead of overflowing.
pub(crate) fn saturating_pow(base: u32, exp: u32) -> u32 {
    base.checked_pow(exp).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::{round_i32, saturating_pow, scale_rounded};

    #[test]
    fn round_i32_rounds_halves_away_from_zero() {
        assert_eq!(round_i32(1.5), 2);
        assert_eq!(round_i32(-1.5), -2);
        assert_eq!(round_i32(0.49), 0);
        assert_eq!(round_i32(-0.51), -1);
    }

    #[test]
    fn scale_rounded_is_linear() {
        assert_eq!(scale_rounded(8, 80, 80), 8);
        assert_eq!(scale_rounded(8, 40, 80), 4);
        assert_eq!(scale_rounded(8, 160, 80), 16);
        assert_eq!(scale_rounded(8, 50, 80), 5);
    }

    #[test]
    fn saturating_pow_caps_at_max() {
        assert_eq!(saturating_pow(2, 3), 8);
        assert_eq!(saturating_pow(2, 40), u32::MAX);
    }
}
