//! Integration tests for the `generate` command.
use std::fs;
use weathergen::cli::{GenerateOpts, OutputOpts, handle_generate_command};
use weathergen::log::is_logger_initialised;
use weathergen::settings::Settings;
use tempfile::tempdir;

/// An integration test for the `generate` command.
///
/// We also check that the logger is initialised after it is run.
#[test]
fn test_handle_generate_command() {
    unsafe { std::env::set_var("WEATHERGEN_LOG_LEVEL", "off") };

    assert!(!is_logger_initialised());

    // Save results to non-existent directory to check that directory creation works
    let tempdir = tempdir().unwrap();
    let output_dir = tempdir.path().join("results");
    let opts = GenerateOpts {
        year: 2023,
        seed: Some(7),
        regions: "Kerala;Ladakh".into(),
        output: OutputOpts {
            output_dir: Some(output_dir.clone()),
            overwrite: false,
        },
        ..Default::default()
    };
    handle_generate_command(&opts, Some(Settings::default())).unwrap();

    assert!(is_logger_initialised());

    let contents = fs::read_to_string(output_dir.join("weather_2023.csv")).unwrap();
    let mut lines = contents.lines();
    assert!(lines.next().unwrap().starts_with("Region,Date,"));
    assert!(lines.next().unwrap().starts_with("Kerala,2023-01-01,"));
    assert!(lines.next().unwrap().starts_with("Ladakh,2023-01-01,"));
    assert_eq!(lines.count(), 2 * 365 - 2);

    let metadata = fs::read_to_string(output_dir.join("metadata.toml")).unwrap();
    assert!(metadata.contains("seed = \"7\""));
    assert!(output_dir.join("weathergen_info.log").is_file());
}
