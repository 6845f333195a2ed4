//! The daily weather record, one per region and date.
use crate::region::RegionID;
use crate::units::{Celsius, Hectopascals, KilometresPerHour, Millimetres, Percent};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The weather for one region on one day.
///
/// Field names are serialised as the column names of the weather CSV file.
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct DailyWeatherRecord {
    /// The region the weather applies to
    #[serde(rename = "Region")]
    pub region: RegionID,
    /// The calendar date
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    /// Average temperature
    #[serde(rename = "Temperature_C")]
    pub temperature: Celsius,
    /// Total precipitation
    #[serde(rename = "Precipitation_mm")]
    pub precipitation: Millimetres,
    /// Relative humidity
    #[serde(rename = "Humidity_percent")]
    pub humidity: Percent,
    /// Minimum temperature
    #[serde(rename = "Min_Temperature_C")]
    pub min_temperature: Celsius,
    /// Maximum temperature
    #[serde(rename = "Max_Temperature_C")]
    pub max_temperature: Celsius,
    /// Wind speed
    #[serde(rename = "Wind_Speed_kmh")]
    pub wind_speed: KilometresPerHour,
    /// Atmospheric pressure
    #[serde(rename = "Atmospheric_Pressure_hPa")]
    pub pressure: Hectopascals,
    /// Apparent temperature accounting for humidity
    #[serde(rename = "Heat_Index_C")]
    pub heat_index: Celsius,
}

impl DailyWeatherRecord {
    /// Whether the minimum, average and maximum temperature are in order
    pub fn temperatures_ordered(&self) -> bool {
        self.min_temperature <= self.temperature && self.temperature <= self.max_temperature
    }
}
