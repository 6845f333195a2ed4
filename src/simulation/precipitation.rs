//! Daily precipitation.
use super::{DayContext, exponential, gaussian};
use crate::season::Season;
use crate::units::Millimetres;
use rand::Rng;

/// Chance that a monsoon rain day is a heavy-rain event
const HEAVY_RAIN_PROBABILITY: f64 = 0.15;

/// The probability that it rains on the day
pub fn rain_probability(ctx: &DayContext) -> f64 {
    let calibration = ctx.calibration;
    let probability = match ctx.season {
        Season::Monsoon if ctx.in_group(&calibration.heavy_monsoon_regions) => 0.5,
        Season::Monsoon => 0.35 * ctx.region.monsoon_strength.value(),
        Season::PostMonsoon if ctx.in_group(&calibration.northeast_monsoon_regions) => 0.25,
        Season::PostMonsoon => 0.12,
        Season::Winter if ctx.in_group(&calibration.winter_rain_regions) => 0.15,
        Season::Winter => 0.05,
        Season::Summer if ctx.region.climate_type.is_maritime() => 0.15,
        Season::Summer => 0.08,
    };

    // Late onset in June, above-normal rain for the rest of the monsoon
    match ctx.month {
        6 => probability * 0.6,
        7..=9 => probability * 1.4,
        _ => probability,
    }
}

/// Sample the day's precipitation, which is never negative
pub fn precipitation<R: Rng>(ctx: &DayContext, rng: &mut R) -> Millimetres {
    let mut amount = 0.0;
    if rng.random::<f64>() < rain_probability(ctx) {
        amount = if ctx.season == Season::Monsoon {
            let amount = exponential(rng, 12.0) * ctx.region.monsoon_strength.value();
            if rng.random::<f64>() < HEAVY_RAIN_PROBABILITY {
                amount * 4.0
            } else {
                amount
            }
        } else {
            exponential(rng, 8.0)
        };
    }

    let amount = amount * ctx.climate.precipitation.value() + gaussian(rng, 1.0);
    Millimetres(amount.max(0.0))
}
