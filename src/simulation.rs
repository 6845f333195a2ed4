//! Functionality for running the weather simulation.
//!
//! Each (region, date) pair gets its own random number stream derived from the simulator's seed,
//! so a record depends only on the seed and its inputs, never on the order in which records are
//! generated.
use crate::calibration::Calibration;
use crate::climate::ClimateModifiers;
use crate::record::DailyWeatherRecord;
use crate::region::{RegionID, RegionMap, RegionProfile};
use crate::season::Season;
use anyhow::{Context, Result, ensure};
use chrono::{Datelike, NaiveDate};
use indexmap::IndexSet;
use log::{info, warn};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Exp1, StandardNormal};
use std::collections::HashSet;
use std::error::Error;
use std::fmt;

pub mod extremes;
pub mod heat_index;
use heat_index::heat_index;
pub mod humidity;
use humidity::humidity;
pub mod precipitation;
use precipitation::precipitation;
pub mod pressure;
use pressure::pressure;
pub mod temperature;
use temperature::sample_temperatures;
pub mod wind;
use wind::wind_speed;

/// Progress is logged after this many days have been generated
const PROGRESS_INTERVAL: u32 = 50;

/// Indicates that weather was requested for a region which is not in the region table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRegionError {
    region: String,
}

impl UnknownRegionError {
    /// Create a new error for the given region name
    pub fn new(region: &str) -> Self {
        Self {
            region: region.to_string(),
        }
    }

    /// The name of the region which was not found
    pub fn region(&self) -> &str {
        &self.region
    }
}

impl fmt::Display for UnknownRegionError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Unknown region: {}", self.region)
    }
}

impl Error for UnknownRegionError {}

/// Everything about a region and date which the weather calculations depend on
#[derive(Debug, Clone)]
pub struct DayContext<'a> {
    /// The region being simulated
    pub region: &'a RegionProfile,
    /// Calibration constants for the weather year
    pub calibration: &'a Calibration,
    /// The date being simulated
    pub date: NaiveDate,
    /// Month of the year (1-12)
    pub month: u32,
    /// Day of the year (1-366)
    pub day_of_year: u32,
    /// The season the date falls in
    pub season: Season,
    /// Adjustments for the region's climate type
    pub climate: ClimateModifiers,
}

impl<'a> DayContext<'a> {
    /// Create the context for simulating a region on a given date
    pub fn new(region: &'a RegionProfile, calibration: &'a Calibration, date: NaiveDate) -> Self {
        let month = date.month();
        Self {
            region,
            calibration,
            date,
            month,
            day_of_year: date.ordinal(),
            season: Season::from_month(month),
            climate: region.climate_type.modifiers(),
        }
    }

    /// Whether the region belongs to one of the calibration's region groups
    pub fn in_group(&self, group: &HashSet<RegionID>) -> bool {
        group.contains(&self.region.id)
    }
}

/// Draw from a normal distribution with mean zero and the given standard deviation
pub fn gaussian<R: Rng>(rng: &mut R, std_dev: f64) -> f64 {
    let z: f64 = rng.sample(StandardNormal);
    z * std_dev
}

/// Draw from an exponential distribution with the given mean
pub fn exponential<R: Rng>(rng: &mut R, mean: f64) -> f64 {
    let x: f64 = rng.sample(Exp1);
    x * mean
}

/// Simulate the weather for a single day.
///
/// All outputs are rounded to one decimal place.
pub fn simulate_day<R: Rng>(ctx: &DayContext, rng: &mut R) -> DailyWeatherRecord {
    let temperatures = sample_temperatures(ctx, rng);
    let humidity = humidity(ctx, temperatures.average, rng);
    let precipitation = precipitation(ctx, rng);
    let wind_speed = wind_speed(ctx, rng);
    let pressure = pressure(
        ctx,
        temperatures.average,
        humidity,
        precipitation,
        rng,
    );
    let heat_index = heat_index(temperatures.average, humidity);

    DailyWeatherRecord {
        region: ctx.region.id.clone(),
        date: ctx.date,
        temperature: temperatures.average.round_to_tenth(),
        precipitation: precipitation.round_to_tenth(),
        humidity: humidity.round_to_tenth(),
        min_temperature: temperatures.min.round_to_tenth(),
        max_temperature: temperatures.max.round_to_tenth(),
        wind_speed: wind_speed.round_to_tenth(),
        pressure: pressure.round_to_tenth(),
        heat_index: heat_index.round_to_tenth(),
    }
}

/// Generates synthetic daily weather for a fixed table of regions
#[derive(Debug, Clone)]
pub struct WeatherSimulator {
    regions: RegionMap,
    calibration: Calibration,
    seed: u64,
}

impl WeatherSimulator {
    /// Create a new simulator.
    ///
    /// # Arguments
    ///
    /// * `regions` - The region table
    /// * `calibration` - Calibration constants, which must only refer to regions in `regions`
    /// * `seed` - Seed for the random number generator
    pub fn new(regions: RegionMap, calibration: Calibration, seed: u64) -> Result<Self> {
        ensure!(
            u32::try_from(regions.len()).is_ok(),
            "Too many regions: {}",
            regions.len()
        );
        calibration
            .validate(&regions)
            .context("Invalid calibration")?;

        Ok(Self {
            regions,
            calibration,
            seed,
        })
    }

    /// Create a new simulator with a randomly chosen seed, which is logged
    pub fn with_random_seed(regions: RegionMap, calibration: Calibration) -> Result<Self> {
        let seed: u64 = rand::rng().random();
        info!("No seed given; using seed {seed}");
        Self::new(regions, calibration, seed)
    }

    /// The seed for the random number generator
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// The region table
    pub fn regions(&self) -> &RegionMap {
        &self.regions
    }

    /// The calibration constants
    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    /// The random number stream for a given date and region.
    ///
    /// The upper 32 bits of the stream ID hold the day number, reinterpreted as unsigned, and the
    /// lower 32 bits the region's position in the table.
    fn day_rng(&self, date: NaiveDate, region_index: u32) -> ChaCha8Rng {
        let day_bits = u32::from_ne_bytes(date.num_days_from_ce().to_ne_bytes());
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        rng.set_stream((u64::from(day_bits) << 32) | u64::from(region_index));
        rng
    }

    /// Generate the weather for one region on one date.
    ///
    /// # Arguments
    ///
    /// * `region` - The name of the region, which must be in the region table
    /// * `date` - The date
    ///
    /// # Returns
    ///
    /// The day's weather or an [`UnknownRegionError`] if the region is not known.
    pub fn generate_daily_weather(&self, region: &str, date: NaiveDate) -> Result<DailyWeatherRecord> {
        let Some((index, _, profile)) = self.regions.get_full(region) else {
            return Err(UnknownRegionError::new(region).into());
        };

        let ctx = DayContext::new(profile, &self.calibration, date);
        // The region count is checked against `u32` when the simulator is created
        let index = u32::try_from(index).context("Region index out of range")?;
        let mut rng = self.day_rng(date, index);
        Ok(simulate_day(&ctx, &mut rng))
    }

    /// Generate the weather for every region on every day of a year.
    ///
    /// Records are ordered by date, then by region in region-table order.
    pub fn generate_annual_data(&self, year: i32) -> Result<Vec<DailyWeatherRecord>> {
        let all_regions: IndexSet<RegionID> = self.regions.keys().cloned().collect();
        self.generate_annual_data_for_regions(year, &all_regions)
    }

    /// Generate the weather for the given regions on every day of a year
    pub fn generate_annual_data_for_regions(
        &self,
        year: i32,
        regions: &IndexSet<RegionID>,
    ) -> Result<Vec<DailyWeatherRecord>> {
        let first_day = NaiveDate::from_ymd_opt(year, 1, 1)
            .with_context(|| format!("Year {year} is out of range"))?;
        if year != self.calibration.year {
            warn!(
                "Generating weather for {year} using calibration for {}",
                self.calibration.year
            );
        }

        let days_in_year: u32 = if first_day.leap_year() { 366 } else { 365 };
        info!(
            "Generating weather for {} regions over {days_in_year} days",
            regions.len()
        );

        let mut records = Vec::with_capacity(regions.len() * days_in_year as usize);
        for (day_count, date) in (1..=days_in_year).zip(first_day.iter_days()) {
            for region in regions {
                records.push(self.generate_daily_weather(&region.0, date)?);
            }

            if day_count % PROGRESS_INTERVAL == 0 {
                info!(
                    "Progress: {day_count}/{days_in_year} days completed ({:.1}%)",
                    100.0 * f64::from(day_count) / f64::from(days_in_year)
                );
            }
        }

        info!("Generated {} records", records.len());
        Ok(records)
    }
}
