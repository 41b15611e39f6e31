pub struct StatsHelper;

impl StatsHelper {
    /// Converts a `[0, 100]` percentage into a `[0, 1]` fraction, clamping
    /// anything outside the range and mapping NaN to zero.
    pub fn percent_to_unit(percent: f64) -> f64 {
        Self::clamp_unit(percent / 100.0)
    }

    pub fn clamp_unit(value: f64) -> f64 {
        if value.is_nan() {
            return 0.0;
        }
        value.clamp(0.0, 1.0)
    }

    /// `numerator / denominator`, or zero when the denominator is not positive.
    pub fn ratio_or_zero(numerator: f64, denominator: f64) -> f64 {
        if denominator > 0.0 {
            numerator / denominator
        } else {
            0.0
        }
    }

    pub fn sum(values: &[f64]) -> f64 {
        values.iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratio_with_zero_denominator_yields_zero() {
        assert_eq!(StatsHelper::ratio_or_zero(10.0, 0.0), 0.0);
        assert_eq!(StatsHelper::ratio_or_zero(10.0, -2.0), 0.0);
        assert_eq!(StatsHelper::ratio_or_zero(10.0, 4.0), 2.5);
    }

    #[test]
    fn percent_conversion_clamps() {
        assert_eq!(StatsHelper::percent_to_unit(30.0), 0.3);
        assert_eq!(StatsHelper::percent_to_unit(150.0), 1.0);
        assert_eq!(StatsHelper::percent_to_unit(-5.0), 0.0);
        assert_eq!(StatsHelper::percent_to_unit(f64::NAN), 0.0);
    }

    #[test]
    fn sum_of_empty_slice_is_zero() {
        assert_eq!(StatsHelper::sum(&[]), 0.0);
        assert_eq!(StatsHelper::sum(&[1.5, 2.5]), 4.0);
    }
}
