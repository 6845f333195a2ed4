//! The heat index, or apparent temperature.
use crate::units::{Celsius, Percent};

/// Below this temperature the heat index is the air temperature
const MIN_TEMPERATURE: Celsius = Celsius(27.0);

/// Below this humidity the heat index is the air temperature
const MIN_HUMIDITY: Percent = Percent(40.0);

/// The Rothfusz regression, in degrees Fahrenheit
fn rothfusz(t: f64, rh: f64) -> f64 {
    -42.379 + 2.049_015_23 * t + 10.143_331_27 * rh
        - 0.224_755_41 * t * rh
        - 6.837_83e-3 * t.powi(2)
        - 5.481_717e-2 * rh.powi(2)
        + 1.228_74e-3 * t.powi(2) * rh
        + 8.528_2e-4 * t * rh.powi(2)
        - 1.99e-6 * t.powi(2) * rh.powi(2)
}

/// Calculate the heat index for a given temperature and humidity.
///
/// The result is never below the air temperature.
pub fn heat_index(temperature: Celsius, humidity: Percent) -> Celsius {
    if temperature < MIN_TEMPERATURE || humidity < MIN_HUMIDITY {
        return temperature;
    }

    let t = temperature.to_fahrenheit();
    let rh = humidity.value();
    let mut index = rothfusz(t, rh);
    if rh < 13.0 && (80.0..=112.0).contains(&t) {
        index -= (13.0 - rh) / 4.0 * ((17.0 - (t - 95.0).abs()) / 17.0).sqrt();
    } else if rh > 85.0 && (80.0..=87.0).contains(&t) {
        index += (rh - 85.0) / 10.0 * ((87.0 - t) / 5.0);
    }

    Celsius(Celsius::from_fahrenheit(index).value().max(temperature.value()))
}
