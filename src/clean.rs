//! Cleaning of weather CSV files which may contain missing, malformed or out-of-range values.
//!
//! Cleaning never invents rows: rows without a region or a valid date are dropped, as are repeated
//! (region, date) pairs. Missing numbers are filled in from the median for the same region.
use crate::input::{input_err_msg, read_csv_from_reader};
use crate::record::DailyWeatherRecord;
use crate::region::RegionID;
use crate::season::Season;
use crate::units::{Celsius, Hectopascals, KilometresPerHour, Millimetres, Percent};
use anyhow::{Context, Result, ensure};
use chrono::{Datelike, NaiveDate};
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::path::Path;
use strum::{Display, EnumCount, EnumIter, IntoEnumIterator};

/// A row of a weather CSV file, in which any value may be missing or malformed
#[derive(PartialEq, Debug, Clone, Default, Deserialize)]
pub struct RawRecord {
    #[serde(rename = "Region", default)]
    region: Option<String>,
    #[serde(rename = "Date", default, deserialize_with = "csv::invalid_option")]
    date: Option<NaiveDate>,
    #[serde(rename = "Temperature_C", default, deserialize_with = "csv::invalid_option")]
    temperature: Option<f64>,
    #[serde(rename = "Precipitation_mm", default, deserialize_with = "csv::invalid_option")]
    precipitation: Option<f64>,
    #[serde(rename = "Humidity_percent", default, deserialize_with = "csv::invalid_option")]
    humidity: Option<f64>,
    #[serde(rename = "Min_Temperature_C", default, deserialize_with = "csv::invalid_option")]
    min_temperature: Option<f64>,
    #[serde(rename = "Max_Temperature_C", default, deserialize_with = "csv::invalid_option")]
    max_temperature: Option<f64>,
    #[serde(rename = "Wind_Speed_kmh", default, deserialize_with = "csv::invalid_option")]
    wind_speed: Option<f64>,
    #[serde(rename = "Atmospheric_Pressure_hPa", default, deserialize_with = "csv::invalid_option")]
    pressure: Option<f64>,
    #[serde(rename = "Heat_Index_C", default, deserialize_with = "csv::invalid_option")]
    heat_index: Option<f64>,
}

impl RawRecord {
    /// The numeric values, in [`Field`] order, with non-finite values treated as missing
    fn values(&self) -> [Option<f64>; Field::COUNT] {
        [
            self.temperature,
            self.precipitation,
            self.humidity,
            self.min_temperature,
            self.max_temperature,
            self.wind_speed,
            self.pressure,
            self.heat_index,
        ]
        .map(|value| value.filter(|value| value.is_finite()))
    }
}

/// The numeric columns of a weather CSV file
#[derive(PartialEq, Eq, Copy, Clone, Debug, Display, EnumCount, EnumIter)]
pub enum Field {
    /// Average temperature
    #[strum(serialize = "Temperature_C")]
    Temperature,
    /// Precipitation
    #[strum(serialize = "Precipitation_mm")]
    Precipitation,
    /// Humidity
    #[strum(serialize = "Humidity_percent")]
    Humidity,
    /// Minimum temperature
    #[strum(serialize = "Min_Temperature_C")]
    MinTemperature,
    /// Maximum temperature
    #[strum(serialize = "Max_Temperature_C")]
    MaxTemperature,
    /// Wind speed
    #[strum(serialize = "Wind_Speed_kmh")]
    WindSpeed,
    /// Atmospheric pressure
    #[strum(serialize = "Atmospheric_Pressure_hPa")]
    Pressure,
    /// Heat index
    #[strum(serialize = "Heat_Index_C")]
    HeatIndex,
}

impl Field {
    /// The range of physically plausible values for this field
    pub fn valid_range(self) -> (f64, f64) {
        match self {
            Self::Temperature | Self::MinTemperature | Self::MaxTemperature => (-20.0, 60.0),
            Self::Precipitation => (0.0, 1000.0),
            Self::Humidity => (0.0, 100.0),
            Self::WindSpeed => (0.0, 150.0),
            Self::Pressure => (500.0, 1100.0),
            Self::HeatIndex => (-20.0, 80.0),
        }
    }
}

/// How windy a day was
#[derive(PartialEq, Eq, Copy, Clone, Debug, Display, Serialize)]
pub enum WindCategory {
    /// Up to 10 km/h
    Calm,
    /// Up to 25 km/h
    Breezy,
    /// Up to 50 km/h
    Windy,
    /// Over 50 km/h
    Stormy,
}

impl WindCategory {
    /// Categorise a wind speed
    pub fn from_speed(speed: KilometresPerHour) -> Self {
        match speed.value() {
            x if x <= 10.0 => Self::Calm,
            x if x <= 25.0 => Self::Breezy,
            x if x <= 50.0 => Self::Windy,
            _ => Self::Stormy,
        }
    }
}

/// Whether pressure was low, normal or high
#[derive(PartialEq, Eq, Copy, Clone, Debug, Display, Serialize)]
pub enum PressureCategory {
    /// Below 1000 hPa
    Low,
    /// Between 1000 and 1020 hPa
    Normal,
    /// Above 1020 hPa
    High,
}

impl PressureCategory {
    /// Categorise an atmospheric pressure
    pub fn from_pressure(pressure: Hectopascals) -> Self {
        match pressure.value() {
            x if x < 1000.0 => Self::Low,
            x if x > 1020.0 => Self::High,
            _ => Self::Normal,
        }
    }
}

/// Features derived from a day's weather
#[derive(PartialEq, Debug, Clone, Serialize)]
pub struct DerivedFeatures {
    /// The season the date falls in
    #[serde(rename = "Season")]
    pub season: Season,
    /// Month of the year (1-12)
    #[serde(rename = "Month")]
    pub month: u32,
    /// How windy it was
    #[serde(rename = "Wind_Category")]
    pub wind_category: WindCategory,
    /// Whether the average temperature was above 35°C
    #[serde(rename = "Is_Heatwave")]
    pub is_heatwave: bool,
    /// Whether temperature, humidity and wind were all within comfortable bounds
    #[serde(rename = "Is_Comfortable")]
    pub is_comfortable: bool,
    /// How many severe conditions (heat, heavy rain, strong wind) occurred, from 0 to 3
    #[serde(rename = "Severity_Index")]
    pub severity_index: u8,
    /// Whether pressure was low, normal or high
    #[serde(rename = "Pressure_Category")]
    pub pressure_category: PressureCategory,
}

impl DerivedFeatures {
    /// Derive features from a day's weather
    pub fn new(record: &DailyWeatherRecord) -> Self {
        let temperature = record.temperature.value();
        let humidity = record.humidity.value();
        let wind_speed = record.wind_speed.value();

        let severe_conditions = [
            record.max_temperature > Celsius(40.0),
            record.precipitation > Millimetres(50.0),
            record.wind_speed > KilometresPerHour(30.0),
        ];

        Self {
            season: Season::from_month(record.date.month()),
            month: record.date.month(),
            wind_category: WindCategory::from_speed(record.wind_speed),
            is_heatwave: temperature > 35.0,
            is_comfortable: (18.0..=28.0).contains(&temperature)
                && (40.0..=70.0).contains(&humidity)
                && (5.0..=20.0).contains(&wind_speed),
            severity_index: severe_conditions.into_iter().map(u8::from).sum(),
            pressure_category: PressureCategory::from_pressure(record.pressure),
        }
    }
}

/// A weather record which has been cleaned, with derived features
#[derive(PartialEq, Debug, Clone)]
pub struct CleanedRecord {
    /// The cleaned weather
    pub record: DailyWeatherRecord,
    /// Features derived from the weather
    pub features: DerivedFeatures,
}

/// A summary of the changes made while cleaning
#[derive(PartialEq, Eq, Debug, Clone, Default)]
pub struct CleaningReport {
    /// The number of rows read
    pub rows_read: usize,
    /// Rows dropped for having no region or an invalid date
    pub invalid_rows_dropped: usize,
    /// Rows dropped for repeating an earlier (region, date) pair
    pub duplicates_dropped: usize,
    /// Missing values which were filled in
    pub values_imputed: usize,
    /// Values which were outside their valid range
    pub values_clipped: usize,
    /// Rows whose minimum and maximum temperature had to be corrected
    pub temperature_fixes: usize,
}

impl CleaningReport {
    /// Log the contents of the report
    pub fn log(&self) {
        info!("Rows read: {}", self.rows_read);
        info!(
            "Rows dropped: {} invalid, {} duplicate",
            self.invalid_rows_dropped, self.duplicates_dropped
        );
        info!("Missing values filled in: {}", self.values_imputed);
        info!("Out-of-range values clipped: {}", self.values_clipped);
        info!("Min/max temperatures corrected: {}", self.temperature_fixes);
    }
}

/// A row with a valid region and date but possibly missing values
struct PartialRecord {
    region: RegionID,
    date: NaiveDate,
    values: [Option<f64>; Field::COUNT],
}

/// The median of some values, or `None` if there are none
fn median(mut values: Vec<f64>) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}

/// Median values for one column, used to fill in missing values
struct ColumnMedians {
    overall: f64,
    by_region: HashMap<RegionID, f64>,
}

impl ColumnMedians {
    fn new(field: Field, rows: &[PartialRecord]) -> Result<Self> {
        let index = field as usize;
        let mut by_region: HashMap<RegionID, Vec<f64>> = HashMap::new();
        for row in rows {
            if let Some(value) = row.values[index] {
                by_region.entry(row.region.clone()).or_default().push(value);
            }
        }

        let overall = median(by_region.values().flatten().copied().collect())
            .with_context(|| format!("Column {field} has no values"))?;
        let by_region = by_region
            .into_iter()
            .filter_map(|(region, values)| Some((region, median(values)?)))
            .collect();

        Ok(Self { overall, by_region })
    }

    fn get(&self, region: &RegionID) -> f64 {
        self.by_region.get(region).copied().unwrap_or(self.overall)
    }
}

/// Drop rows without a region or valid date and rows which repeat a (region, date) pair
fn drop_invalid_rows(raw: Vec<RawRecord>, report: &mut CleaningReport) -> Vec<PartialRecord> {
    let mut seen = HashSet::new();
    let mut rows = Vec::with_capacity(raw.len());
    for record in raw {
        let values = record.values();
        let region = record
            .region
            .as_deref()
            .map(str::trim)
            .filter(|region| !region.is_empty());
        let (Some(region), Some(date)) = (region, record.date) else {
            report.invalid_rows_dropped += 1;
            continue;
        };

        let region = RegionID::from(region);
        if !seen.insert((region.clone(), date)) {
            report.duplicates_dropped += 1;
            continue;
        }

        rows.push(PartialRecord {
            region,
            date,
            values,
        });
    }

    rows
}

/// Clip a value to the valid range for its field, returning whether it was changed
fn clip(field: Field, value: &mut f64) -> bool {
    let (low, high) = field.valid_range();
    if (low..=high).contains(value) {
        return false;
    }

    *value = value.clamp(low, high);
    true
}

/// Put the minimum, average and maximum temperature in order, returning whether any changed
fn fix_temperature_order(average: f64, min: &mut f64, max: &mut f64) -> bool {
    let mut fixed = false;
    if *min > *max {
        std::mem::swap(min, max);
        fixed = true;
    }
    if *min > average || *max < average {
        *min = min.min(average);
        *max = max.max(average);
        fixed = true;
    }

    fixed
}

/// Clean raw weather rows.
///
/// Rows are kept in their original order.
///
/// # Returns
///
/// The cleaned records and a report of the changes made, or an error if no usable rows remain or
/// a column has no values at all.
pub fn clean_records(raw: Vec<RawRecord>) -> Result<(Vec<CleanedRecord>, CleaningReport)> {
    let mut report = CleaningReport {
        rows_read: raw.len(),
        ..Default::default()
    };

    let rows = drop_invalid_rows(raw, &mut report);
    ensure!(!rows.is_empty(), "No rows with a valid region and date");

    let medians = Field::iter()
        .map(|field| ColumnMedians::new(field, &rows))
        .collect::<Result<Vec<_>>>()?;

    let mut cleaned = Vec::with_capacity(rows.len());
    for row in rows {
        let mut values = [0.0; Field::COUNT];
        for (index, field) in Field::iter().enumerate() {
            let value = row.values[index].unwrap_or_else(|| {
                report.values_imputed += 1;
                medians[index].get(&row.region)
            });
            values[index] = value;
            if clip(field, &mut values[index]) {
                report.values_clipped += 1;
            }
        }

        let [
            temperature,
            precipitation,
            humidity,
            mut min_temperature,
            mut max_temperature,
            wind_speed,
            pressure,
            heat_index,
        ] = values;
        if fix_temperature_order(temperature, &mut min_temperature, &mut max_temperature) {
            report.temperature_fixes += 1;
        }

        let record = DailyWeatherRecord {
            region: row.region,
            date: row.date,
            temperature: Celsius(temperature),
            precipitation: Millimetres(precipitation),
            humidity: Percent(humidity),
            min_temperature: Celsius(min_temperature),
            max_temperature: Celsius(max_temperature),
            wind_speed: KilometresPerHour(wind_speed),
            pressure: Hectopascals(pressure),
            heat_index: Celsius(heat_index),
        };
        let features = DerivedFeatures::new(&record);
        cleaned.push(CleanedRecord { record, features });
    }

    Ok((cleaned, report))
}

/// Read a weather CSV file, tolerating missing and malformed values
pub fn read_raw_records(file_path: &Path) -> Result<Vec<RawRecord>> {
    let file = File::open(file_path).with_context(|| input_err_msg(file_path))?;
    read_csv_from_reader(file).with_context(|| input_err_msg(file_path))
}
