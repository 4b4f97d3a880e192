use crate::constants::NEUTRAL_SCORE;
use crate::profile::PercentileBand;

/// Position a metric within an admitted-class band on a 0-100 scale.
///
/// The band's p25, median and p75 map to 25, 50 and 75. Inside the band the
/// mapping is piecewise linear with a slope change at the median, so resolution
/// is concentrated where most admitted students sit. Outside the band the
/// position is extrapolated over the remaining range of the metric
/// (`extra_min`/`extra_max`) and clamped to [0, 100].
///
/// A missing value or band yields the neutral position 50.
pub fn position(
    value: Option<f64>,
    band: Option<&PercentileBand>,
    extra_min: f64,
    extra_max: f64,
) -> f64 {
    let (value, band) = match (value, band) {
        (Some(v), Some(b)) => (v, b),
        _ => return NEUTRAL_SCORE,
    };

    let (p25, p75) = (band.p25, band.p75);

    if value > p75 {
        let extra_range = extra_max - p75;
        if extra_range <= 0.0 {
            return 100.0;
        }
        return (75.0 + 25.0 * (value - p75) / extra_range).min(100.0);
    }

    if value < p25 {
        let extra_range = p25 - extra_min;
        if extra_range <= 0.0 {
            return 0.0;
        }
        return (25.0 - 25.0 * (p25 - value) / extra_range).max(0.0);
    }

    // Degenerate band: p25 == p75 == value
    if p75 <= p25 {
        return NEUTRAL_SCORE;
    }

    let median = band.median();
    if value <= median {
        25.0 + 25.0 * (value - p25) / (median - p25)
    } else {
        50.0 + 25.0 * (value - median) / (p75 - median)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const SAT: PercentileBand = PercentileBand { p25: 1400.0, p75: 1500.0 };

    #[test]
    fn test_missing_is_neutral() {
        assert_eq!(position(None, Some(&SAT), 400.0, 1600.0), 50.0);
        assert_eq!(position(Some(1450.0), None, 400.0, 1600.0), 50.0);
    }

    #[test]
    fn test_band_anchors() {
        assert!((position(Some(1400.0), Some(&SAT), 400.0, 1600.0) - 25.0).abs() < 1e-10);
        assert!((position(Some(1450.0), Some(&SAT), 400.0, 1600.0) - 50.0).abs() < 1e-10);
        assert!((position(Some(1500.0), Some(&SAT), 400.0, 1600.0) - 75.0).abs() < 1e-10);
    }

    #[test]
    fn test_extrapolation() {
        // Halfway between p75 and the top of the scale
        assert!((position(Some(1550.0), Some(&SAT), 400.0, 1600.0) - 87.5).abs() < 1e-10);
        assert_eq!(position(Some(1600.0), Some(&SAT), 400.0, 1600.0), 100.0);
        assert_eq!(position(Some(400.0), Some(&SAT), 400.0, 1600.0), 0.0);
        // Values beyond the declared range stay clamped
        assert_eq!(position(Some(1700.0), Some(&SAT), 400.0, 1600.0), 100.0);
    }

    #[test]
    fn test_interpolation_within_band() {
        let band = PercentileBand::new(1400.0, 1560.0);
        let skewed = PercentileBand::new(30.0, 34.0);
        assert!((position(Some(31.0), Some(&skewed), 1.0, 36.0) - 37.5).abs() < 1e-10);
        assert!((position(Some(1520.0), Some(&band), 400.0, 1600.0) - 62.5).abs() < 1e-10);
    }

    #[test]
    fn test_degenerate_band() {
        let band = PercentileBand::new(3.9, 3.9);
        assert_eq!(position(Some(3.9), Some(&band), 0.0, 4.0), 50.0);
        assert!(position(Some(4.0), Some(&band), 0.0, 4.0) > 75.0);
        assert!(position(Some(3.5), Some(&band), 0.0, 4.0) < 25.0);
    }

    proptest! {
        #[test]
        fn prop_monotonic_and_bounded(
            a in 400.0f64..1600.0,
            b in 400.0f64..1600.0,
            p25 in 900.0f64..1400.0,
            width in 0.0f64..200.0,
        ) {
            let band = PercentileBand::new(p25, p25 + width);
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let pos_lo = position(Some(lo), Some(&band), 400.0, 1600.0);
            let pos_hi = position(Some(hi), Some(&band), 400.0, 1600.0);
            prop_assert!(pos_lo <= pos_hi + 1e-9);
            prop_assert!((0.0..=100.0).contains(&pos_lo));
            prop_assert!((0.0..=100.0).contains(&pos_hi));
        }
    }
}
