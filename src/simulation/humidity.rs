//! Relative humidity.
use super::{DayContext, gaussian};
use crate::season::Season;
use crate::units::{Celsius, Percent};
use rand::Rng;

/// The lowest humidity generated
pub const MIN_HUMIDITY: f64 = 15.0;

/// The highest humidity generated
pub const MAX_HUMIDITY: f64 = 98.0;

/// The mean humidity for a given average temperature, before noise and clipping
pub fn mean_humidity(ctx: &DayContext, temperature: Celsius) -> Percent {
    let region = ctx.region;
    let seasonal = ctx.season.profile().humidity_modifier * 35.0;
    let temperature_effect = -0.8 * (temperature.value() - 25.0);
    let monsoon_effect = if ctx.season == Season::Monsoon {
        20.0 * region.monsoon_strength.value()
    } else {
        0.0
    };
    let coastal_effect = if region.coastal { 5.0 } else { 0.0 };

    region.climate_type.base_humidity()
        + ctx.climate.humidity
        + Percent(seasonal + temperature_effect + monsoon_effect + coastal_effect)
}

/// Sample the day's humidity, which is always between [`MIN_HUMIDITY`] and [`MAX_HUMIDITY`]
pub fn humidity<R: Rng>(ctx: &DayContext, temperature: Celsius, rng: &mut R) -> Percent {
    (mean_humidity(ctx, temperature) + Percent(gaussian(rng, 8.0))).clamp(MIN_HUMIDITY, MAX_HUMIDITY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::Calibration;
    use crate::fixture::{SEED, calibration, region_profile};
    use crate::region::RegionProfile;
    use chrono::NaiveDate;
    use float_cmp::assert_approx_eq;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use rstest::rstest;

    fn date(month: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, month, 1).unwrap()
    }

    #[rstest]
    #[case(1, 70.0 - 8.75)]
    #[case(5, 70.0 - 12.25)]
    #[case(8, 70.0 + 19.25 + 10.0)]
    #[case(10, 70.0 + 8.75)]
    fn test_mean_humidity_seasons(
        region_profile: RegionProfile,
        calibration: Calibration,
        #[case] month: u32,
        #[case] expected: f64,
    ) {
        let ctx = DayContext::new(&region_profile, &calibration, date(month));
        assert_approx_eq!(
            f64,
            mean_humidity(&ctx, Celsius(25.0)).value(),
            expected,
            epsilon = 1e-9
        );
    }

    #[rstest]
    fn test_mean_humidity_temperature(region_profile: RegionProfile, calibration: Calibration) {
        let ctx = DayContext::new(&region_profile, &calibration, date(1));
        let cool = mean_humidity(&ctx, Celsius(20.0));
        let hot = mean_humidity(&ctx, Celsius(35.0));
        assert_approx_eq!(f64, (cool - hot).value(), 12.0, epsilon = 1e-9);
    }

    #[rstest]
    fn test_coastal_more_humid(region_profile: RegionProfile, calibration: Calibration) {
        let coastal = RegionProfile {
            coastal: true,
            ..region_profile.clone()
        };
        for month in 1..=12 {
            let inland = mean_humidity(
                &DayContext::new(&region_profile, &calibration, date(month)),
                Celsius(28.0),
            );
            let coast = mean_humidity(
                &DayContext::new(&coastal, &calibration, date(month)),
                Celsius(28.0),
            );
            assert!(coast > inland);
        }
    }

    #[rstest]
    #[case(Celsius(60.0))]
    #[case(Celsius(-30.0))]
    fn test_humidity_clipped(
        region_profile: RegionProfile,
        calibration: Calibration,
        #[case] temperature: Celsius,
    ) {
        let ctx = DayContext::new(&region_profile, &calibration, date(8));
        let mut rng = ChaCha8Rng::seed_from_u64(SEED);
        for _ in 0..200 {
            let humidity = humidity(&ctx, temperature, &mut rng).value();
            assert!((MIN_HUMIDITY..=MAX_HUMIDITY).contains(&humidity));
        }
    }
}
