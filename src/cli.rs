//! The command line interface for the weather generator.
use crate::analysis::{AnalysisReport, Dataset};
use crate::calibration::Calibration;
use crate::clean::{clean_records, read_raw_records};
use crate::log;
use crate::output::metadata::{RunMetadata, write_metadata};
use crate::output::{
    create_output_directory, get_command_output_dir, get_output_dir, write_analysis,
    write_cleaned_records, write_weather_records,
};
use crate::region::{RegionKind, RegionMap, default_regions, parse_region_str, read_regions};
use crate::settings::Settings;
use crate::simulation::WeatherSimulator;
use ::log::{info, warn};
use anyhow::{Context, Result, ensure};
use clap::{Args, CommandFactory, Parser, Subcommand};
use std::path::{Path, PathBuf};

pub mod settings;
use settings::SettingsSubcommands;

/// The default weather year
const DEFAULT_YEAR: i32 = 2024;

/// The command line interface for the weather generator.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// The available commands.
    #[command(subcommand)]
    command: Option<Commands>,
    /// Flag to provide the CLI docs as markdown
    #[arg(long, hide = true)]
    markdown_help: bool,
}

/// Options controlling where output is written
#[derive(Args, Default)]
pub struct OutputOpts {
    /// Directory for output files
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
    /// Whether to overwrite the output directory if it already exists
    #[arg(long)]
    pub overwrite: bool,
}

/// Options for the generate command
#[derive(Args)]
pub struct GenerateOpts {
    /// The year to generate weather for
    #[arg(default_value_t = DEFAULT_YEAR)]
    pub year: i32,
    /// Seed for the random number generator (random if not given)
    #[arg(long)]
    pub seed: Option<u64>,
    /// Regions to generate weather for: "all" or a semicolon-separated list
    #[arg(long, default_value = "all")]
    pub regions: String,
    /// Path to a CSV file of region profiles to use instead of the built-in table
    #[arg(long)]
    pub regions_file: Option<PathBuf>,
    /// Path to a TOML file of calibration constants to use instead of the built-in ones
    #[arg(long)]
    pub calibration_file: Option<PathBuf>,
    /// Output options
    #[command(flatten)]
    pub output: OutputOpts,
}

impl Default for GenerateOpts {
    fn default() -> Self {
        Self {
            year: DEFAULT_YEAR,
            seed: None,
            regions: "all".into(),
            regions_file: None,
            calibration_file: None,
            output: OutputOpts::default(),
        }
    }
}

/// The available commands.
#[derive(Subcommand)]
enum Commands {
    /// Generate a year of synthetic daily weather.
    Generate {
        /// Generation options
        #[command(flatten)]
        opts: GenerateOpts,
    },
    /// Clean a weather CSV file and add derived features.
    Clean {
        /// Path to the weather CSV file.
        input_file: PathBuf,
        /// Output options
        #[command(flatten)]
        opts: OutputOpts,
    },
    /// Analyse a weather CSV file.
    Analyse {
        /// Path to the weather CSV file.
        input_file: PathBuf,
        /// Number of days covered by rolling averages (defaults to the program settings)
        #[arg(long)]
        window: Option<usize>,
        /// Output options
        #[command(flatten)]
        opts: OutputOpts,
    },
    /// List the regions weather can be generated for.
    Regions {
        /// Path to a CSV file of region profiles to use instead of the built-in table
        #[arg(long)]
        regions_file: Option<PathBuf>,
    },
    /// Manage program settings.
    Settings {
        /// The available subcommands for managing settings.
        #[command(subcommand)]
        subcommand: SettingsSubcommands,
    },
}

impl Commands {
    /// Execute the supplied CLI command
    fn execute(self) -> Result<()> {
        match self {
            Self::Generate { opts } => handle_generate_command(&opts, None),
            Self::Clean { input_file, opts } => handle_clean_command(&input_file, &opts, None),
            Self::Analyse {
                input_file,
                window,
                opts,
            } => handle_analyse_command(&input_file, window, &opts, None),
            Self::Regions { regions_file } => handle_regions_command(regions_file.as_deref()),
            Self::Settings { subcommand } => subcommand.execute(),
        }
    }
}

/// Parse CLI arguments and start weathergen
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    // Invoked as: `$ weathergen --markdown-help`
    if cli.markdown_help {
        clap_markdown::print_help_markdown::<Cli>();
        return Ok(());
    }

    let Some(command) = cli.command else {
        let help_str = Cli::command().render_long_help().to_string();
        println!("{help_str}");
        return Ok(());
    };

    command.execute()
}

/// Load program settings, if not provided
fn load_settings(settings: Option<Settings>) -> Result<Settings> {
    if let Some(settings) = settings {
        Ok(settings)
    } else {
        Settings::load().context("Failed to load settings.")
    }
}

/// Create the output folder and start logging to it.
///
/// # Returns
///
/// The path to the output folder.
fn prepare_output(opts: &OutputOpts, default_dir: PathBuf, settings: &Settings) -> Result<PathBuf> {
    let output_path = opts.output_dir.clone().unwrap_or(default_dir);
    let overwrite = create_output_directory(&output_path, opts.overwrite || settings.overwrite)
        .with_context(|| {
            format!(
                "Failed to create output directory: {}",
                output_path.display()
            )
        })?;

    // Initialise program logger
    log::init(&settings.log_level, Some(&output_path))
        .context("Failed to initialise logging.")?;
    info!("Output folder: {}", output_path.display());

    // NB: We have to wait until the logger is initialised to display this warning
    if overwrite {
        warn!("Output folder will be overwritten");
    }

    Ok(output_path)
}

/// Load the region table, from a file if one is given
fn load_regions(regions_file: Option<&Path>) -> Result<RegionMap> {
    match regions_file {
        Some(path) => read_regions(path),
        None => default_regions(),
    }
}

/// Handle the `generate` command.
pub fn handle_generate_command(opts: &GenerateOpts, settings: Option<Settings>) -> Result<()> {
    let settings = load_settings(settings)?;
    let output_path = prepare_output(&opts.output, get_output_dir(opts.year), &settings)?;

    let regions = load_regions(opts.regions_file.as_deref()).context("Failed to load regions.")?;
    let calibration = match opts.calibration_file.as_deref() {
        Some(path) => Calibration::from_path(path),
        None => Calibration::default_2024(),
    }
    .context("Failed to load calibration.")?;
    let selected = parse_region_str(&opts.regions, &regions).context("Invalid region list.")?;

    let simulator = match opts.seed {
        Some(seed) => WeatherSimulator::new(regions, calibration, seed),
        None => WeatherSimulator::with_random_seed(regions, calibration),
    }?;
    let records = simulator.generate_annual_data_for_regions(opts.year, &selected)?;

    let file_path = write_weather_records(&output_path, opts.year, &records)
        .context("Failed to write weather data.")?;
    write_metadata(
        &output_path,
        RunMetadata::for_generate(opts.year, simulator.seed(), selected.len()),
    )?;
    info!("Weather data written to {}", file_path.display());

    Ok(())
}

/// Handle the `clean` command.
pub fn handle_clean_command(
    input_path: &Path,
    opts: &OutputOpts,
    settings: Option<Settings>,
) -> Result<()> {
    let settings = load_settings(settings)?;
    let output_path = prepare_output(opts, get_command_output_dir("clean"), &settings)?;

    let raw = read_raw_records(input_path)?;
    info!("Loaded {} rows from {}", raw.len(), input_path.display());
    let (cleaned, report) = clean_records(raw).context("Failed to clean weather data.")?;
    report.log();

    let file_path = write_cleaned_records(&output_path, &cleaned)
        .context("Failed to write cleaned data.")?;
    write_metadata(&output_path, RunMetadata::for_input("clean", input_path))?;
    info!("Cleaned data written to {}", file_path.display());

    Ok(())
}

/// Handle the `analyse` command.
pub fn handle_analyse_command(
    input_path: &Path,
    window: Option<usize>,
    opts: &OutputOpts,
    settings: Option<Settings>,
) -> Result<()> {
    let settings = load_settings(settings)?;
    let window = window.unwrap_or(settings.rolling_window);
    ensure!(window > 0, "Rolling window must be at least one day");
    let output_path = prepare_output(opts, get_command_output_dir("analysis"), &settings)?;

    let dataset = Dataset::from_path(input_path)?;
    info!(
        "Loaded {} records from {}",
        dataset.records().len(),
        input_path.display()
    );
    let report = AnalysisReport::new(&dataset, window)?;
    report.log(&dataset.extremes());

    write_analysis(&output_path, &report).context("Failed to write analysis results.")?;
    write_metadata(&output_path, RunMetadata::for_input("analyse", input_path))?;
    info!("Analysis complete!");

    Ok(())
}

/// Format the region table, listing states and union territories separately
fn region_table(regions: &RegionMap) -> String {
    let mut out = String::new();
    for (kind, title) in [
        (RegionKind::State, "States"),
        (RegionKind::UnionTerritory, "Union territories"),
    ] {
        let members: Vec<_> = regions.values().filter(|region| region.kind == kind).collect();
        if members.is_empty() {
            continue;
        }

        out.push_str(&format!("{title} ({}):\n", members.len()));
        out.push_str(&format!(
            "  {:<28} {:<18} {:>9} {:>9}  Coastal\n",
            "Region", "Climate", "Elevation", "Base temp"
        ));
        for region in members {
            out.push_str(&format!(
                "  {:<28} {:<18} {:>8}m {:>8}°C  {}\n",
                region.id.to_string(),
                region.climate_type.to_string(),
                region.elevation.value(),
                region.temp_base.value(),
                if region.coastal { "yes" } else { "no" }
            ));
        }
    }

    out
}

/// Handle the `regions` command.
pub fn handle_regions_command(regions_file: Option<&Path>) -> Result<()> {
    let regions = load_regions(regions_file)?;
    print!("{}", region_table(&regions));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::regions;
    use rstest::rstest;

    #[rstest]
    fn test_region_table(regions: RegionMap) {
        let table = region_table(&regions);
        let lines: Vec<_> = table.lines().collect();
        assert_eq!(lines.len(), 2 + 28 + 2 + 8);
        assert_eq!(lines[0], "States (28):");
        assert_eq!(lines[30], "Union territories (8):");
        assert!(lines[2..30].iter().all(|line| !line.contains("Ladakh")));
        assert!(lines[32..].iter().any(|line| line.trim_start().starts_with("Ladakh ")));
        assert!(table.contains("Kerala"));
    }
}
