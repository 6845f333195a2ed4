//! Extreme-weather adjustments calibrated to the weather year.
use super::DayContext;
use rand::Rng;

/// Multiplier for the day-to-day temperature variation.
///
/// Heat-wave regions see the strongest amplification during April to June; elsewhere the
/// pre-monsoon months are amplified more mildly.
pub fn temperature_modifier<R: Rng>(ctx: &DayContext, rng: &mut R) -> f64 {
    match ctx.month {
        4..=6 if ctx.in_group(&ctx.calibration.heat_wave_regions) => rng.random_range(1.2..1.8),
        3..=5 => rng.random_range(1.1..1.4),
        _ => 1.0,
    }
}

/// Multiplier for the wind speed, covering hot summer winds and post-monsoon cyclones
pub fn wind_modifier<R: Rng>(ctx: &DayContext, rng: &mut R) -> f64 {
    match ctx.month {
        4..=6 => rng.random_range(1.1..1.5),
        10 | 11 if ctx.in_group(&ctx.calibration.cyclone_regions) => rng.random_range(1.0..2.0),
        _ => 1.0,
    }
}

/// Whether the day is an extreme-weather day
pub fn is_extreme_weather_day<R: Rng>(ctx: &DayContext, rng: &mut R) -> bool {
    let probability =
        ctx.calibration
            .extreme_weather_probability(&ctx.region.id, ctx.month, ctx.day_of_year);
    rng.random::<f64>() < probability
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::Calibration;
    use crate::fixture::{SEED, calibration, regions};
    use crate::region::RegionMap;
    use chrono::NaiveDate;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use rstest::rstest;

    fn sample_range(
        modifier: fn(&DayContext, &mut ChaCha8Rng) -> f64,
        ctx: &DayContext,
    ) -> (f64, f64) {
        let mut rng = ChaCha8Rng::seed_from_u64(SEED);
        (0..1000)
            .map(|_| modifier(ctx, &mut rng))
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), x| {
                (lo.min(x), hi.max(x))
            })
    }

    #[rstest]
    #[case("Rajasthan", 5, 1.2, 1.8)]
    #[case("Kerala", 5, 1.1, 1.4)]
    #[case("Rajasthan", 3, 1.1, 1.4)]
    #[case("Kerala", 6, 1.0, 1.0)]
    #[case("Rajasthan", 12, 1.0, 1.0)]
    fn test_temperature_modifier(
        regions: RegionMap,
        calibration: Calibration,
        #[case] region: &str,
        #[case] month: u32,
        #[case] lower: f64,
        #[case] upper: f64,
    ) {
        let date = NaiveDate::from_ymd_opt(2024, month, 15).unwrap();
        let ctx = DayContext::new(&regions[region], &calibration, date);
        let (lo, hi) = sample_range(temperature_modifier, &ctx);
        assert!(lo >= lower && hi <= upper);
    }

    #[rstest]
    #[case("Delhi", 5, 1.1, 1.5)]
    #[case("Odisha", 10, 1.0, 2.0)]
    #[case("Delhi", 10, 1.0, 1.0)]
    #[case("Odisha", 1, 1.0, 1.0)]
    fn test_wind_modifier(
        regions: RegionMap,
        calibration: Calibration,
        #[case] region: &str,
        #[case] month: u32,
        #[case] lower: f64,
        #[case] upper: f64,
    ) {
        let date = NaiveDate::from_ymd_opt(2024, month, 15).unwrap();
        let ctx = DayContext::new(&regions[region], &calibration, date);
        let (lo, hi) = sample_range(wind_modifier, &ctx);
        assert!(lo >= lower && hi <= upper);
    }

    #[rstest]
    fn test_is_extreme_weather_day(regions: RegionMap, mut calibration: Calibration) {
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(SEED);

        calibration.extreme_weather_probability[0] = 0.0;
        let ctx = DayContext::new(&regions["Goa"], &calibration, date);
        assert!(!(0..100).any(|_| is_extreme_weather_day(&ctx, &mut rng)));

        calibration.extreme_weather_probability[0] = 1.0;
        let ctx = DayContext::new(&regions["Goa"], &calibration, date);
        assert!((0..100).all(|_| is_extreme_weather_day(&ctx, &mut rng)));
    }
}
