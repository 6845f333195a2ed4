//! Average, minimum and maximum temperature for a day.
use super::extremes::temperature_modifier;
use super::{DayContext, gaussian};
use crate::climate::ClimateType;
use crate::units::Celsius;
use rand::Rng;
use std::f64::consts::PI;

/// Standard deviation of the day-to-day temperature variation
const DAILY_VARIATION_STD_DEV: f64 = 3.0;

/// Standard deviation of the noise on the minimum and maximum temperature
const MIN_MAX_STD_DEV: f64 = 1.5;

/// Metres of elevation per degree of cooling
const LAPSE_RATE_METRES_PER_DEGREE: f64 = 154.0;

/// The day's temperatures
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct Temperatures {
    /// Average temperature
    pub average: Celsius,
    /// Minimum temperature
    pub min: Celsius,
    /// Maximum temperature
    pub max: Celsius,
}

/// The expected temperature for the day, before any random variation
pub fn base_temperature(ctx: &DayContext) -> Celsius {
    let region = ctx.region;
    let range = region.temp_range.value();

    let seasonal_cycle = ((f64::from(ctx.day_of_year) - 80.0) * 2.0 * PI / 365.0).sin() * range / 2.0;
    let latitude_effect = 2.0 * region.latitude.to_radians().cos();
    let elevation_effect = -region.elevation.value() / LAPSE_RATE_METRES_PER_DEGREE;
    let season_effect = ctx.season.profile().temp_modifier * range;
    let coastal_effect = if region.coastal { -2.0 } else { 0.0 };

    region.temp_base
        + Celsius(seasonal_cycle + latitude_effect + elevation_effect + season_effect + coastal_effect)
        + ctx.climate.temperature
        + ctx.calibration.temperature_anomaly(&region.id)
}

/// Difference between the day's minimum and maximum temperature, before noise
fn diurnal_range<R: Rng>(climate_type: ClimateType, rng: &mut R) -> f64 {
    rng.random_range(6.0..18.0) * climate_type.diurnal_range_factor()
}

/// Sample the day's average, minimum and maximum temperature.
///
/// The minimum never exceeds the average and the maximum is never below it.
pub fn sample_temperatures<R: Rng>(ctx: &DayContext, rng: &mut R) -> Temperatures {
    let mut variation = gaussian(rng, DAILY_VARIATION_STD_DEV);
    let modifier = temperature_modifier(ctx, rng);
    if modifier > 1.2 {
        variation *= modifier;
    }
    let average = base_temperature(ctx).value() + variation;

    let half_range = diurnal_range(ctx.region.climate_type, rng) / 2.0;
    let mut min = average - half_range + gaussian(rng, MIN_MAX_STD_DEV);
    let max = average + half_range + gaussian(rng, MIN_MAX_STD_DEV);
    if min >= max {
        min = max - 3.0;
    }

    Temperatures {
        average: Celsius(average),
        min: Celsius(min.min(average)),
        max: Celsius(max.max(average)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::Calibration;
    use crate::fixture::{SEED, calibration, region_profile, regions};
    use crate::region::{RegionMap, RegionProfile};
    use crate::units::Metres;
    use chrono::NaiveDate;
    use float_cmp::assert_approx_eq;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use rstest::rstest;

    fn date(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, month, day).unwrap()
    }

    #[rstest]
    fn test_base_temperature_generic(region_profile: RegionProfile, calibration: Calibration) {
        // Day 80 of the year, so the seasonal cycle is at zero
        let ctx = DayContext::new(&region_profile, &calibration, date(3, 20));
        assert_eq!(ctx.day_of_year, 80);

        // 25 + 2 (latitude) + 5.5 (summer) + 2 (default anomaly)
        assert_approx_eq!(f64, base_temperature(&ctx).value(), 34.5, epsilon = 1e-9);
    }

    #[rstest]
    fn test_base_temperature_elevation(region_profile: RegionProfile, calibration: Calibration) {
        let high = RegionProfile {
            elevation: Metres(1540.0),
            coastal: true,
            ..region_profile.clone()
        };
        let low_ctx = DayContext::new(&region_profile, &calibration, date(3, 20));
        let high_ctx = DayContext::new(&high, &calibration, date(3, 20));
        assert_approx_eq!(
            f64,
            base_temperature(&low_ctx).value() - base_temperature(&high_ctx).value(),
            12.0,
            epsilon = 1e-9
        );
    }

    #[rstest]
    #[case("Rajasthan", date(5, 15), 55.852)]
    #[case("Kerala", date(8, 1), 31.504)]
    fn test_base_temperature_regions(
        regions: RegionMap,
        calibration: Calibration,
        #[case] region: &str,
        #[case] date: NaiveDate,
        #[case] expected: f64,
    ) {
        let ctx = DayContext::new(&regions[region], &calibration, date);
        assert_approx_eq!(f64, base_temperature(&ctx).value(), expected, epsilon = 1e-3);
    }

    #[rstest]
    fn test_sample_temperatures_ordered(regions: RegionMap, calibration: Calibration) {
        let mut rng = ChaCha8Rng::seed_from_u64(SEED);
        for region in regions.values() {
            for day in [date(1, 10), date(5, 20), date(8, 5), date(11, 30)] {
                let ctx = DayContext::new(region, &calibration, day);
                for _ in 0..20 {
                    let temperatures = sample_temperatures(&ctx, &mut rng);
                    assert!(temperatures.min <= temperatures.average);
                    assert!(temperatures.average <= temperatures.max);
                }
            }
        }
    }

    #[rstest]
    fn test_desert_diurnal_range_wider(regions: RegionMap, calibration: Calibration) {
        let mut rng = ChaCha8Rng::seed_from_u64(SEED);
        let mut mean_range = |region: &str| {
            let ctx = DayContext::new(&regions[region], &calibration, date(12, 1));
            (0..500)
                .map(|_| {
                    let temperatures = sample_temperatures(&ctx, &mut rng);
                    (temperatures.max - temperatures.min).value()
                })
                .sum::<f64>()
                / 500.0
        };

        assert!(mean_range("Rajasthan") > mean_range("Lakshadweep"));
    }
}
