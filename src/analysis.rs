//! Exploratory analysis of a weather dataset: trends, event counts, summaries and data quality.
use crate::input::{input_err_msg, read_csv_from_reader};
use crate::record::DailyWeatherRecord;
use crate::region::RegionID;
use crate::season::Season;
use crate::units::{Celsius, KilometresPerHour, Millimetres, Percent};
use anyhow::{Context, Result, ensure};
use chrono::{Datelike, NaiveDate};
use indexmap::IndexMap;
use itertools::Itertools;
use log::{info, warn};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::fs::File;
use std::path::Path;

/// Days with a maximum temperature above this are hot
pub const HOT_DAY_THRESHOLD: Celsius = Celsius(35.0);

/// Days with a minimum temperature below this are cold
pub const COLD_DAY_THRESHOLD: Celsius = Celsius(5.0);

/// Days with more precipitation than this are rainy
pub const RAINY_DAY_THRESHOLD: Millimetres = Millimetres(2.5);

/// The number of regions listed in each ranking
pub const RANKING_LENGTH: usize = 5;

/// The mean of some values, or NaN if there are none
fn mean<I: IntoIterator<Item = f64>>(values: I) -> f64 {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0.0), |(sum, count), value| (sum + value, count + 1.0));
    sum / count
}

/// Whether a record counts as an extreme-weather day
pub fn is_extreme_day(record: &DailyWeatherRecord) -> bool {
    record.max_temperature > Celsius(40.0)
        || record.precipitation > Millimetres(50.0)
        || record.wind_speed > KilometresPerHour(30.0)
}

/// Temperature and precipitation alongside their trailing rolling averages
#[derive(PartialEq, Debug, Clone, Serialize)]
pub struct RollingAverage {
    /// The region
    #[serde(rename = "Region")]
    pub region: RegionID,
    /// The date
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    /// Average temperature on the day
    #[serde(rename = "Temperature_C")]
    pub temperature: Celsius,
    /// Rolling average of the average temperature
    #[serde(rename = "Temperature_Rolling_Avg_C")]
    pub temperature_rolling: Celsius,
    /// Precipitation on the day
    #[serde(rename = "Precipitation_mm")]
    pub precipitation: Millimetres,
    /// Rolling average of the precipitation
    #[serde(rename = "Precipitation_Rolling_Avg_mm")]
    pub precipitation_rolling: Millimetres,
}

/// Counts of notable days
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub struct EventCounts {
    /// The number of records
    pub total: usize,
    /// Days with a maximum above [`HOT_DAY_THRESHOLD`]
    pub hot_days: usize,
    /// Days with a minimum below [`COLD_DAY_THRESHOLD`]
    pub cold_days: usize,
    /// Days with more precipitation than [`RAINY_DAY_THRESHOLD`]
    pub rainy_days: usize,
    /// Days with extreme heat, rain or wind
    pub extreme_days: usize,
}

impl EventCounts {
    /// The percentage of records which were extreme-weather days
    #[allow(clippy::cast_precision_loss)]
    pub fn extreme_percentage(&self) -> f64 {
        100.0 * self.extreme_days as f64 / self.total as f64
    }
}

/// Summary statistics for a region
#[derive(PartialEq, Debug, Clone, Serialize)]
pub struct RegionalSummary {
    /// The region
    #[serde(rename = "Region")]
    pub region: RegionID,
    /// Mean of the average temperature
    #[serde(rename = "Mean_Temperature_C")]
    pub mean_temperature: Celsius,
    /// Highest maximum temperature
    #[serde(rename = "Max_Temperature_C")]
    pub max_temperature: Celsius,
    /// Lowest minimum temperature
    #[serde(rename = "Min_Temperature_C")]
    pub min_temperature: Celsius,
    /// Total precipitation
    #[serde(rename = "Total_Precipitation_mm")]
    pub total_precipitation: Millimetres,
    /// Mean humidity
    #[serde(rename = "Mean_Humidity_percent")]
    pub mean_humidity: Percent,
    /// Mean wind speed
    #[serde(rename = "Mean_Wind_Speed_kmh")]
    pub mean_wind_speed: KilometresPerHour,
}

impl RegionalSummary {
    fn new(region: RegionID, records: &[&DailyWeatherRecord]) -> Self {
        Self {
            region,
            mean_temperature: Celsius(mean(records.iter().map(|r| r.temperature.value()))),
            max_temperature: Celsius(
                records
                    .iter()
                    .map(|r| r.max_temperature.value())
                    .fold(f64::NEG_INFINITY, f64::max),
            ),
            min_temperature: Celsius(
                records
                    .iter()
                    .map(|r| r.min_temperature.value())
                    .fold(f64::INFINITY, f64::min),
            ),
            total_precipitation: Millimetres(records.iter().map(|r| r.precipitation.value()).sum()),
            mean_humidity: Percent(mean(records.iter().map(|r| r.humidity.value()))),
            mean_wind_speed: KilometresPerHour(mean(records.iter().map(|r| r.wind_speed.value()))),
        }
    }
}

/// Summary statistics for a calendar month
#[derive(PartialEq, Debug, Clone, Serialize)]
pub struct MonthlySummary {
    /// The month, formatted as `YYYY-MM`
    #[serde(rename = "Month")]
    pub month: String,
    /// Mean of the average temperature
    #[serde(rename = "Mean_Temperature_C")]
    pub mean_temperature: Celsius,
    /// Total precipitation
    #[serde(rename = "Total_Precipitation_mm")]
    pub total_precipitation: Millimetres,
}

/// Summary statistics for a season
#[derive(PartialEq, Debug, Clone, Serialize)]
pub struct SeasonalSummary {
    /// The season
    #[serde(rename = "Season")]
    pub season: Season,
    /// Mean of the average temperature
    #[serde(rename = "Mean_Temperature_C")]
    pub mean_temperature: Celsius,
    /// Total precipitation
    #[serde(rename = "Total_Precipitation_mm")]
    pub total_precipitation: Millimetres,
    /// Mean humidity
    #[serde(rename = "Mean_Humidity_percent")]
    pub mean_humidity: Percent,
}

/// The most extreme individual records in a dataset
#[derive(PartialEq, Debug, Clone)]
pub struct Extremes<'a> {
    /// Highest maximum temperature
    pub hottest: &'a DailyWeatherRecord,
    /// Lowest minimum temperature
    pub coldest: &'a DailyWeatherRecord,
    /// Most precipitation
    pub wettest: &'a DailyWeatherRecord,
    /// Lowest humidity
    pub least_humid: &'a DailyWeatherRecord,
    /// Highest wind speed
    pub windiest: &'a DailyWeatherRecord,
}

/// Counts of physically implausible records
#[derive(PartialEq, Eq, Debug, Clone, Copy, Default)]
pub struct QualityReport {
    /// Records whose minimum temperature exceeds the maximum
    pub temperature_order_errors: usize,
    /// Records with an average temperature below -20°C or above 55°C
    pub unrealistic_temperatures: usize,
    /// Records with humidity below 0% or above 100%
    pub unrealistic_humidity: usize,
    /// Records with pressure below 900 hPa or above 1100 hPa
    pub unrealistic_pressure: usize,
}

impl QualityReport {
    /// Whether no problems were found
    pub fn is_clean(&self) -> bool {
        *self == Self::default()
    }
}

/// Whether a ranking lists the largest or smallest values first
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum Order {
    /// Largest first
    Largest,
    /// Smallest first
    Smallest,
}

/// The first `n` regions ranked by some statistic
pub fn rank_regions<F>(
    summaries: &[RegionalSummary],
    n: usize,
    order: Order,
    key: F,
) -> Vec<&RegionalSummary>
where
    F: Fn(&RegionalSummary) -> f64,
{
    summaries
        .iter()
        .sorted_by(|a, b| match order {
            Order::Largest => key(b).total_cmp(&key(a)),
            Order::Smallest => key(a).total_cmp(&key(b)),
        })
        .take(n)
        .collect()
}

/// A loaded weather dataset.
///
/// A dataset always contains at least one record and no repeated (region, date) pairs.
#[derive(PartialEq, Debug, Clone)]
pub struct Dataset {
    records: Vec<DailyWeatherRecord>,
}

impl Dataset {
    /// Create a dataset, dropping records which repeat an earlier (region, date) pair
    pub fn new(records: Vec<DailyWeatherRecord>) -> Result<Self> {
        let total = records.len();
        let mut seen = HashSet::new();
        let records: Vec<_> = records
            .into_iter()
            .filter(|record| seen.insert((record.region.clone(), record.date)))
            .collect();
        ensure!(!records.is_empty(), "Dataset contains no records");

        let duplicates = total - records.len();
        if duplicates > 0 {
            warn!("Dropped {duplicates} duplicate records");
        }

        Ok(Self { records })
    }

    /// Read a dataset from a weather CSV file
    pub fn from_path(file_path: &Path) -> Result<Self> {
        let file = File::open(file_path).with_context(|| input_err_msg(file_path))?;
        let records = read_csv_from_reader(file).with_context(|| input_err_msg(file_path))?;
        Self::new(records)
    }

    /// The records in the dataset
    pub fn records(&self) -> &[DailyWeatherRecord] {
        &self.records
    }

    /// Records grouped by region, in order of first appearance, each sorted by date
    fn by_region(&self) -> IndexMap<RegionID, Vec<&DailyWeatherRecord>> {
        let mut groups: IndexMap<RegionID, Vec<&DailyWeatherRecord>> = IndexMap::new();
        for record in &self.records {
            groups.entry(record.region.clone()).or_default().push(record);
        }
        for records in groups.values_mut() {
            records.sort_by_key(|record| record.date);
        }

        groups
    }

    /// Trailing rolling averages of temperature and precipitation for each region.
    ///
    /// Each average covers up to `window` consecutive records for the region, so the first few
    /// averages use fewer records.
    pub fn rolling_averages(&self, window: usize) -> Result<Vec<RollingAverage>> {
        ensure!(window > 0, "Rolling window must be at least one day");

        let mut averages = Vec::with_capacity(self.records.len());
        for (region, records) in self.by_region() {
            let temperatures: Vec<f64> = records.iter().map(|r| r.temperature.value()).collect();
            let precipitation: Vec<f64> =
                records.iter().map(|r| r.precipitation.value()).collect();

            for (end, record) in (1_usize..).zip(&records) {
                let start = end.saturating_sub(window);
                averages.push(RollingAverage {
                    region: region.clone(),
                    date: record.date,
                    temperature: record.temperature,
                    temperature_rolling: Celsius(mean(temperatures[start..end].iter().copied())),
                    precipitation: record.precipitation,
                    precipitation_rolling: Millimetres(mean(
                        precipitation[start..end].iter().copied(),
                    )),
                });
            }
        }

        Ok(averages)
    }

    /// Count hot, cold, rainy and extreme-weather days
    pub fn event_counts(&self) -> EventCounts {
        let count = |predicate: fn(&DailyWeatherRecord) -> bool| {
            self.records.iter().filter(|record| predicate(record)).count()
        };

        EventCounts {
            total: self.records.len(),
            hot_days: count(|r| r.max_temperature > HOT_DAY_THRESHOLD),
            cold_days: count(|r| r.min_temperature < COLD_DAY_THRESHOLD),
            rainy_days: count(|r| r.precipitation > RAINY_DAY_THRESHOLD),
            extreme_days: count(is_extreme_day),
        }
    }

    /// Summary statistics for each region, in order of first appearance
    pub fn regional_summary(&self) -> Vec<RegionalSummary> {
        self.by_region()
            .into_iter()
            .map(|(region, records)| RegionalSummary::new(region, &records))
            .collect()
    }

    /// Summary statistics for each calendar month, in date order
    pub fn monthly_summary(&self) -> Vec<MonthlySummary> {
        let mut groups: BTreeMap<(i32, u32), Vec<&DailyWeatherRecord>> = BTreeMap::new();
        for record in &self.records {
            groups
                .entry((record.date.year(), record.date.month()))
                .or_default()
                .push(record);
        }

        groups
            .into_iter()
            .map(|((year, month), records)| MonthlySummary {
                month: format!("{year:04}-{month:02}"),
                mean_temperature: Celsius(mean(records.iter().map(|r| r.temperature.value()))),
                total_precipitation: Millimetres(
                    records.iter().map(|r| r.precipitation.value()).sum(),
                ),
            })
            .collect()
    }

    /// Summary statistics for each season present in the dataset
    pub fn seasonal_summary(&self) -> Vec<SeasonalSummary> {
        let mut groups: BTreeMap<Season, Vec<&DailyWeatherRecord>> = BTreeMap::new();
        for record in &self.records {
            groups
                .entry(Season::from_month(record.date.month()))
                .or_default()
                .push(record);
        }

        groups
            .into_iter()
            .map(|(season, records)| SeasonalSummary {
                season,
                mean_temperature: Celsius(mean(records.iter().map(|r| r.temperature.value()))),
                total_precipitation: Millimetres(
                    records.iter().map(|r| r.precipitation.value()).sum(),
                ),
                mean_humidity: Percent(mean(records.iter().map(|r| r.humidity.value()))),
            })
            .collect()
    }

    /// Mean total monsoon (July to September) precipitation per region
    pub fn mean_monsoon_precipitation(&self) -> Option<Millimetres> {
        let mut totals: IndexMap<&RegionID, f64> = IndexMap::new();
        for record in &self.records {
            if Season::from_month(record.date.month()) == Season::Monsoon {
                *totals.entry(&record.region).or_default() += record.precipitation.value();
            }
        }

        (!totals.is_empty()).then(|| Millimetres(mean(totals.into_values())))
    }

    /// The most extreme individual records
    pub fn extremes(&self) -> Extremes<'_> {
        let by = |value: fn(&DailyWeatherRecord) -> f64, order: Order| {
            // Datasets are never empty
            self.records[1..]
                .iter()
                .fold(&self.records[0], |best, record| {
                    let better = match order {
                        Order::Largest => value(record) > value(best),
                        Order::Smallest => value(record) < value(best),
                    };
                    if better { record } else { best }
                })
        };

        Extremes {
            hottest: by(|r| r.max_temperature.value(), Order::Largest),
            coldest: by(|r| r.min_temperature.value(), Order::Smallest),
            wettest: by(|r| r.precipitation.value(), Order::Largest),
            least_humid: by(|r| r.humidity.value(), Order::Smallest),
            windiest: by(|r| r.wind_speed.value(), Order::Largest),
        }
    }

    /// Count physically implausible records
    pub fn quality_report(&self) -> QualityReport {
        let mut report = QualityReport::default();
        for record in &self.records {
            if record.min_temperature > record.max_temperature {
                report.temperature_order_errors += 1;
            }
            if !(-20.0..=55.0).contains(&record.temperature.value()) {
                report.unrealistic_temperatures += 1;
            }
            if !(0.0..=100.0).contains(&record.humidity.value()) {
                report.unrealistic_humidity += 1;
            }
            if !(900.0..=1100.0).contains(&record.pressure.value()) {
                report.unrealistic_pressure += 1;
            }
        }

        report
    }
}

/// The results of analysing a dataset
#[derive(PartialEq, Debug, Clone)]
pub struct AnalysisReport {
    /// Temperature and precipitation with rolling averages
    pub rolling_averages: Vec<RollingAverage>,
    /// Counts of notable days
    pub event_counts: EventCounts,
    /// Per-region statistics
    pub regional_summary: Vec<RegionalSummary>,
    /// Per-month statistics
    pub monthly_summary: Vec<MonthlySummary>,
    /// Per-season statistics
    pub seasonal_summary: Vec<SeasonalSummary>,
    /// Mean total monsoon precipitation per region, if the dataset covers the monsoon
    pub mean_monsoon_precipitation: Option<Millimetres>,
    /// Data-quality counts
    pub quality: QualityReport,
}

impl AnalysisReport {
    /// Analyse a dataset.
    ///
    /// # Arguments
    ///
    /// * `dataset` - The dataset to analyse
    /// * `window` - The number of days covered by rolling averages
    pub fn new(dataset: &Dataset, window: usize) -> Result<Self> {
        Ok(Self {
            rolling_averages: dataset.rolling_averages(window)?,
            event_counts: dataset.event_counts(),
            regional_summary: dataset.regional_summary(),
            monthly_summary: dataset.monthly_summary(),
            seasonal_summary: dataset.seasonal_summary(),
            mean_monsoon_precipitation: dataset.mean_monsoon_precipitation(),
            quality: dataset.quality_report(),
        })
    }

    /// Log a single ranking of regions
    fn log_ranking<F>(&self, title: &str, order: Order, unit: &str, key: F)
    where
        F: Fn(&RegionalSummary) -> f64,
    {
        info!("{title}:");
        for (rank, summary) in (1..).zip(rank_regions(
            &self.regional_summary,
            RANKING_LENGTH,
            order,
            &key,
        )) {
            info!("  {rank}. {}: {:.1}{unit}", summary.region, key(summary));
        }
    }

    /// Log the headline figures
    pub fn log(&self, extremes: &Extremes) {
        let events = &self.event_counts;
        info!("Records analysed: {}", events.total);
        info!(
            "Hot days: {}, cold days: {}, rainy days: {}",
            events.hot_days, events.cold_days, events.rainy_days
        );
        info!(
            "Extreme weather days: {} ({:.1}%)",
            events.extreme_days,
            events.extreme_percentage()
        );

        for (label, record, value) in [
            ("Hottest day", extremes.hottest, extremes.hottest.max_temperature.to_string() + "°C"),
            ("Coldest day", extremes.coldest, extremes.coldest.min_temperature.to_string() + "°C"),
            ("Wettest day", extremes.wettest, extremes.wettest.precipitation.to_string() + "mm"),
            (
                "Least humid day",
                extremes.least_humid,
                extremes.least_humid.humidity.to_string() + "%",
            ),
            ("Windiest day", extremes.windiest, extremes.windiest.wind_speed.to_string() + " km/h"),
        ] {
            info!("{label}: {value} in {} on {}", record.region, record.date);
        }

        self.log_ranking("Hottest regions", Order::Largest, "°C", |s| {
            s.mean_temperature.value()
        });
        self.log_ranking("Coldest regions", Order::Smallest, "°C", |s| {
            s.mean_temperature.value()
        });
        self.log_ranking("Wettest regions", Order::Largest, "mm", |s| {
            s.total_precipitation.value()
        });
        self.log_ranking("Driest regions", Order::Smallest, "mm", |s| {
            s.total_precipitation.value()
        });

        for season in &self.seasonal_summary {
            info!(
                "{}: mean temperature {:.1}°C, total rainfall {:.0}mm, mean humidity {:.1}%",
                season.season,
                season.mean_temperature.value(),
                season.total_precipitation.value(),
                season.mean_humidity.value()
            );
        }
        if let Some(monsoon) = self.mean_monsoon_precipitation {
            info!("Mean monsoon rainfall per region: {:.0}mm", monsoon.value());
        }

        let quality = &self.quality;
        if quality.is_clean() {
            info!("No data quality problems found");
        } else {
            warn!(
                "Data quality: {} min/max temperature errors, {} unrealistic temperatures, \
                {} unrealistic humidity values, {} unrealistic pressure values",
                quality.temperature_order_errors,
                quality.unrealistic_temperatures,
                quality.unrealistic_humidity,
                quality.unrealistic_pressure
            );
        }
    }
}
