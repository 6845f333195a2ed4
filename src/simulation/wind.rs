//! Wind speed.
use super::extremes::wind_modifier;
use super::{DayContext, gaussian};
use crate::climate::ClimateType;
use crate::season::Season;
use crate::units::KilometresPerHour;
use rand::Rng;

/// Chance of cyclonic weather on a monsoon or post-monsoon day in a cyclone-prone region
const CYCLONE_PROBABILITY: f64 = 0.05;

/// Typical wind speed for the region and day, before seasonal and random effects.
///
/// # Arguments
///
/// * `ctx` - The region and day
/// * `extreme_modifier` - The day's extreme-weather wind multiplier
pub fn base_wind_speed(ctx: &DayContext, extreme_modifier: f64) -> f64 {
    let region = ctx.region;

    let mut speed = 8.0;
    if ctx.season == Season::Summer
        && (4..=6).contains(&ctx.month)
        && ctx.in_group(&ctx.calibration.hot_wind_regions)
    {
        speed += 8.0;
        if extreme_modifier > 1.3 {
            speed += 10.0;
        }
    }

    // Local wind regimes take precedence
    if region.coastal {
        speed = 12.0;
    }
    match region.climate_type {
        ClimateType::Alpine => speed = 15.0,
        ClimateType::Arid | ClimateType::ColdDesert => speed = 10.0,
        ClimateType::TropicalIsland => speed = 14.0,
        _ => {}
    }

    speed
}

/// Multiplier for the wind speed due to the season
pub fn seasonal_factor(ctx: &DayContext) -> f64 {
    match ctx.season {
        Season::Monsoon => 2.0,
        Season::Summer => 1.4,
        Season::Winter if ctx.region.climate_type == ClimateType::Alpine => 1.6,
        _ => 1.0,
    }
}

/// Sample the day's wind speed, which is never negative
pub fn wind_speed<R: Rng>(ctx: &DayContext, rng: &mut R) -> KilometresPerHour {
    let extreme_modifier = wind_modifier(ctx, rng);
    let base = base_wind_speed(ctx, extreme_modifier);

    let mut cyclone_factor = 1.0;
    if matches!(ctx.season, Season::Monsoon | Season::PostMonsoon)
        && ctx.in_group(&ctx.calibration.cyclone_regions)
        && rng.random::<f64>() < CYCLONE_PROBABILITY
    {
        cyclone_factor = rng.random_range(2.0..4.0);
    }

    let speed = base
        * seasonal_factor(ctx)
        * ctx.climate.wind.value()
        * cyclone_factor
        * extreme_modifier
        + gaussian(rng, 4.0);
    KilometresPerHour(speed.max(0.0))
}
