//! Integration tests for the `analyse` command.
use std::fs;
use weathergen::calibration::Calibration;
use weathergen::cli::{OutputOpts, handle_analyse_command};
use weathergen::output::write_weather_records;
use weathergen::region::{default_regions, parse_region_str};
use weathergen::settings::Settings;
use weathergen::simulation::WeatherSimulator;
use tempfile::tempdir;

/// An integration test for the `analyse` command.
#[test]
fn test_handle_analyse_command() {
    unsafe { std::env::set_var("WEATHERGEN_LOG_LEVEL", "off") };

    let tempdir = tempdir().unwrap();
    let regions = default_regions().unwrap();
    let selected = parse_region_str("Rajasthan;Meghalaya;Delhi", &regions).unwrap();
    let simulator =
        WeatherSimulator::new(regions, Calibration::default_2024().unwrap(), 2024).unwrap();
    let records = simulator
        .generate_annual_data_for_regions(2024, &selected)
        .unwrap();
    let input_path = write_weather_records(tempdir.path(), 2024, &records).unwrap();

    let output_dir = tempdir.path().join("analysis");
    let opts = OutputOpts {
        output_dir: Some(output_dir.clone()),
        overwrite: false,
    };
    handle_analyse_command(&input_path, Some(14), &opts, Some(Settings::default())).unwrap();

    let line_count = |name: &str| {
        fs::read_to_string(output_dir.join(name))
            .unwrap()
            .lines()
            .count()
    };
    assert_eq!(line_count("regional_summary.csv"), 4);
    assert_eq!(line_count("monthly_summary.csv"), 13);
    assert_eq!(line_count("seasonal_summary.csv"), 5);
    assert_eq!(line_count("rolling_averages.csv"), 3 * 366 + 1);

    let metadata = fs::read_to_string(output_dir.join("metadata.toml")).unwrap();
    assert!(metadata.contains("command = \"analyse\""));
}
