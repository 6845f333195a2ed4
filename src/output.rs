//! The module responsible for writing output data to disk.
use crate::analysis::AnalysisReport;
use crate::clean::CleanedRecord;
use crate::record::DailyWeatherRecord;
use anyhow::{Context, Result, ensure};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

pub mod metadata;

/// The root folder in which year-specific output folders will be created
const OUTPUT_DIRECTORY_ROOT: &str = "weathergen_results";

/// The output file name for cleaned weather data
pub const CLEANED_FILE_NAME: &str = "cleaned_weather.csv";

/// The output file name for regional summary statistics
const REGIONAL_SUMMARY_FILE_NAME: &str = "regional_summary.csv";

/// The output file name for monthly summary statistics
const MONTHLY_SUMMARY_FILE_NAME: &str = "monthly_summary.csv";

/// The output file name for seasonal summary statistics
const SEASONAL_SUMMARY_FILE_NAME: &str = "seasonal_summary.csv";

/// The output file name for rolling averages
const ROLLING_AVERAGES_FILE_NAME: &str = "rolling_averages.csv";

/// The output file name for generated weather data for the given year
pub fn weather_file_name(year: i32) -> String {
    format!("weather_{year}.csv")
}

/// Get the default output directory for a given weather year
pub fn get_output_dir(year: i32) -> PathBuf {
    [OUTPUT_DIRECTORY_ROOT, &year.to_string()].iter().collect()
}

/// Get the default output directory for a command which processes an existing weather file
pub fn get_command_output_dir(command: &str) -> PathBuf {
    [OUTPUT_DIRECTORY_ROOT, command].iter().collect()
}

/// Create a new output directory.
///
/// An existing, empty directory is used as-is. An existing directory with contents is an error
/// unless `allow_overwrite` is set, in which case it is emptied.
///
/// # Returns
///
/// Whether existing output was overwritten.
pub fn create_output_directory(output_dir: &Path, allow_overwrite: bool) -> Result<bool> {
    let mut overwrite = false;
    if let Ok(mut entries) = fs::read_dir(output_dir) {
        if entries.next().is_none() {
            // already exists and is empty
            return Ok(false);
        }

        ensure!(
            allow_overwrite,
            "Output folder already exists and is not empty. \
            Please specify a different folder or use the --overwrite option."
        );

        fs::remove_dir_all(output_dir)?;
        overwrite = true;
    }

    // Try to create the directory, with parents
    fs::create_dir_all(output_dir)?;

    Ok(overwrite)
}

/// Write rows of serialisable data to a CSV file, with a header row
pub fn write_csv<'a, T, I>(file_path: &Path, rows: I) -> Result<()>
where
    T: Serialize + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut writer = csv::Writer::from_path(file_path)
        .with_context(|| format!("Could not create {}", file_path.display()))?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(())
}

/// Write generated weather records to the output folder.
///
/// # Returns
///
/// The path to the file which was written.
pub fn write_weather_records(
    output_path: &Path,
    year: i32,
    records: &[DailyWeatherRecord],
) -> Result<PathBuf> {
    let file_path = output_path.join(weather_file_name(year));
    write_csv(&file_path, records)?;

    Ok(file_path)
}

/// Write cleaned weather records, with their derived features, to the output folder.
///
/// # Returns
///
/// The path to the file which was written.
pub fn write_cleaned_records(output_path: &Path, records: &[CleanedRecord]) -> Result<PathBuf> {
    let file_path = output_path.join(CLEANED_FILE_NAME);
    let mut writer = csv::Writer::from_path(&file_path)
        .with_context(|| format!("Could not create {}", file_path.display()))?;
    for cleaned in records {
        writer.serialize((&cleaned.record, &cleaned.features))?;
    }
    writer.flush()?;

    Ok(file_path)
}

/// Write the results of an analysis to the output folder
pub fn write_analysis(output_path: &Path, report: &AnalysisReport) -> Result<()> {
    write_csv(
        &output_path.join(REGIONAL_SUMMARY_FILE_NAME),
        &report.regional_summary,
    )?;
    write_csv(
        &output_path.join(MONTHLY_SUMMARY_FILE_NAME),
        &report.monthly_summary,
    )?;
    write_csv(
        &output_path.join(SEASONAL_SUMMARY_FILE_NAME),
        &report.seasonal_summary,
    )?;
    write_csv(
        &output_path.join(ROLLING_AVERAGES_FILE_NAME),
        &report.rolling_averages,
    )?;

    Ok(())
}
