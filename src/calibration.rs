//! Calibration constants which tune the simulator to a particular weather year.
//!
//! The built-in calibration reproduces the conditions of 2024: a year of record heat in the
//! north, a late but above-normal monsoon and frequent extreme-weather days.
use crate::id::IDCollection;
use crate::input::read_toml;
use crate::region::{RegionID, RegionMap};
use crate::units::Celsius;
use anyhow::{Context, Result, ensure};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// The built-in calibration
const DEFAULT_CALIBRATION: &str = include_str!("../data/calibration.toml");

/// Calibration constants for a weather year
#[derive(PartialEq, Debug, Clone, Deserialize)]
pub struct Calibration {
    /// The year these constants were derived from
    pub year: i32,
    /// Temperature anomaly for regions missing from `temperature_anomalies`
    pub default_temperature_anomaly: Celsius,
    /// Temperature anomaly per region
    pub temperature_anomalies: HashMap<RegionID, Celsius>,
    /// Base probability of an extreme-weather day for each month, January first
    pub extreme_weather_probability: [f64; 12],
    /// First and last day of the year of the peak heat-wave period
    pub heat_wave_days: (u32, u32),
    /// Probability of an extreme-weather day in heat-wave regions during the peak period
    pub heat_wave_probability: f64,
    /// Scales the extreme-weather probability during the monsoon months
    pub monsoon_probability_factor: f64,
    /// Upper limit for the extreme-weather probability during the monsoon months
    pub monsoon_probability_cap: f64,
    /// Regions affected by pre-monsoon heat waves
    pub heat_wave_regions: HashSet<RegionID>,
    /// Regions affected by hot summer winds (loo)
    pub hot_wind_regions: HashSet<RegionID>,
    /// Regions prone to cyclones
    pub cyclone_regions: HashSet<RegionID>,
    /// Regions which receive especially heavy monsoon rain
    pub heavy_monsoon_regions: HashSet<RegionID>,
    /// Regions which receive rain from the north-east monsoon after the main monsoon
    pub northeast_monsoon_regions: HashSet<RegionID>,
    /// Regions which receive winter rain
    pub winter_rain_regions: HashSet<RegionID>,
}

/// Check that a value is a valid probability
fn check_probability(value: f64, name: &str) -> Result<()> {
    ensure!(
        (0.0..=1.0).contains(&value),
        "{name} must be between 0 and 1"
    );

    Ok(())
}

impl Calibration {
    /// The built-in calibration for 2024
    pub fn default_2024() -> Result<Self> {
        toml::from_str(DEFAULT_CALIBRATION).context("Failed to read built-in calibration")
    }

    /// Read calibration constants from a TOML file
    pub fn from_path(file_path: &Path) -> Result<Self> {
        read_toml(file_path)
    }

    /// Check the calibration is internally consistent and only refers to known regions
    pub fn validate(&self, regions: &RegionMap) -> Result<()> {
        for (month, probability) in self.extreme_weather_probability.iter().enumerate() {
            check_probability(
                *probability,
                &format!("Extreme weather probability for month {}", month + 1),
            )?;
        }
        check_probability(self.heat_wave_probability, "heat_wave_probability")?;
        check_probability(self.monsoon_probability_cap, "monsoon_probability_cap")?;
        ensure!(
            self.monsoon_probability_factor.is_finite() && self.monsoon_probability_factor >= 0.0,
            "monsoon_probability_factor must be a finite, non-negative number"
        );

        let (first, last) = self.heat_wave_days;
        ensure!(
            (1..=366).contains(&first) && (1..=366).contains(&last) && first <= last,
            "heat_wave_days must be an ordered pair of days of the year"
        );

        for (id, anomaly) in &self.temperature_anomalies {
            regions
                .get_id(id)
                .context("Temperature anomaly given for unknown region")?;
            ensure!(
                anomaly.is_finite(),
                "Temperature anomaly for {id} must be a finite number"
            );
        }

        for (name, group) in [
            ("heat_wave_regions", &self.heat_wave_regions),
            ("hot_wind_regions", &self.hot_wind_regions),
            ("cyclone_regions", &self.cyclone_regions),
            ("heavy_monsoon_regions", &self.heavy_monsoon_regions),
            ("northeast_monsoon_regions", &self.northeast_monsoon_regions),
            ("winter_rain_regions", &self.winter_rain_regions),
        ] {
            for id in group {
                regions
                    .get_id(id)
                    .with_context(|| format!("Invalid region in {name}"))?;
            }
        }

        Ok(())
    }

    /// The temperature anomaly for a region
    pub fn temperature_anomaly(&self, region_id: &RegionID) -> Celsius {
        self.temperature_anomalies
            .get(region_id)
            .copied()
            .unwrap_or(self.default_temperature_anomaly)
    }

    /// The probability that a day is an extreme-weather day.
    ///
    /// # Arguments
    ///
    /// * `region_id` - The region
    /// * `month` - Month of the year (1-12)
    /// * `day_of_year` - Day of the year (1-366)
    pub fn extreme_weather_probability(&self, region_id: &RegionID, month: u32, day_of_year: u32) -> f64 {
        let mut probability = self.extreme_weather_probability[(month as usize - 1) % 12];

        let (first, last) = self.heat_wave_days;
        if (4..=6).contains(&month)
            && self.heat_wave_regions.contains(region_id)
            && (first..=last).contains(&day_of_year)
        {
            probability = self.heat_wave_probability;
        }

        if (7..=9).contains(&month) {
            probability = self
                .monsoon_probability_cap
                .min(probability * self.monsoon_probability_factor);
        }

        probability
    }
}
