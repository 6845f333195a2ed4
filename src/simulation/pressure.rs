//! Atmospheric pressure.
use super::extremes::is_extreme_weather_day;
use super::{DayContext, gaussian};
use crate::season::Season;
use crate::units::{Celsius, Hectopascals, Millimetres, Percent};
use rand::Rng;

/// Standard atmospheric pressure at sea level
pub const SEA_LEVEL_PRESSURE: Hectopascals = Hectopascals(1013.25);

/// Pressure drop per metre of elevation
const PRESSURE_LAPSE_PER_METRE: f64 = 0.12;

/// Pressure change due to elevation
pub fn elevation_effect(ctx: &DayContext) -> Hectopascals {
    Hectopascals(-PRESSURE_LAPSE_PER_METRE * ctx.region.elevation.value())
}

/// Pressure change due to the passing weather system.
///
/// Extreme heat and extreme rain deepen low pressure on extreme-weather days. On top of that,
/// rainy days bring low pressure and dry days high pressure.
fn weather_system_effect<R: Rng>(
    ctx: &DayContext,
    temperature: Celsius,
    humidity: Percent,
    precipitation: Millimetres,
    rng: &mut R,
) -> f64 {
    let mut effect = 0.0;
    if is_extreme_weather_day(ctx, rng) {
        if temperature > Celsius(45.0) {
            effect -= rng.random_range(5.0..12.0);
        } else if precipitation > Millimetres(50.0) {
            effect -= rng.random_range(10.0..25.0);
        }
    }

    effect
        + if precipitation > Millimetres(15.0) {
            -rng.random_range(8.0..20.0)
        } else if precipitation <= Millimetres(0.0) && humidity < Percent(35.0) {
            rng.random_range(3.0..12.0)
        } else {
            gaussian(rng, 6.0)
        }
}

/// Pressure change due to the season
fn seasonal_effect<R: Rng>(season: Season, rng: &mut R) -> f64 {
    match season {
        Season::Winter => rng.random_range(2.0..8.0),
        Season::Monsoon => -rng.random_range(2.0..10.0),
        _ => gaussian(rng, 3.0),
    }
}

/// Sample the day's atmospheric pressure
pub fn pressure<R: Rng>(
    ctx: &DayContext,
    temperature: Celsius,
    humidity: Percent,
    precipitation: Millimetres,
    rng: &mut R,
) -> Hectopascals {
    let weather = weather_system_effect(ctx, temperature, humidity, precipitation, rng);
    let seasonal = seasonal_effect(ctx.season, rng);

    SEA_LEVEL_PRESSURE + elevation_effect(ctx) + Hectopascals(weather + seasonal) + ctx.climate.pressure
}
