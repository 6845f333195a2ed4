//! Code for writing metadata to file
use anyhow::{Result, anyhow};
use chrono::prelude::*;
use platform_info::{PlatformInfo, PlatformInfoAPI, UNameAPI};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// The output file name for metadata
const METADATA_FILE_NAME: &str = "metadata.toml";

/// Information about the program build via `built` crate
mod built_info {
    // The file has been placed there by the build script.
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

/// Get information about program version from git
fn get_git_hash() -> String {
    let Some(hash) = built_info::GIT_COMMIT_HASH_SHORT else {
        return "unknown".into();
    };

    if built_info::GIT_DIRTY == Some(true) {
        format!("{hash}-dirty")
    } else {
        hash.into()
    }
}

#[derive(Serialize)]
struct Metadata<'a> {
    run: RunMetadata<'a>,
    program: ProgramMetadata<'a>,
    platform: PlatformMetadata,
}

/// Information about the command which produced the output
#[derive(Serialize)]
pub struct RunMetadata<'a> {
    /// The command which was run (e.g. "generate")
    command: &'a str,
    /// The weather year, for generated data
    #[serde(skip_serializing_if = "Option::is_none")]
    year: Option<i32>,
    /// The seed for the random number generator, for generated data.
    ///
    /// Stored as a string as TOML integers cannot hold every `u64`.
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<String>,
    /// The number of regions covered, for generated data
    #[serde(skip_serializing_if = "Option::is_none")]
    region_count: Option<usize>,
    /// The input file, for commands which process existing data
    #[serde(skip_serializing_if = "Option::is_none")]
    input_path: Option<&'a Path>,
    /// The date and time on which the run started
    datetime: String,
}

impl<'a> RunMetadata<'a> {
    /// Metadata for a run of the `generate` command
    pub fn for_generate(year: i32, seed: u64, region_count: usize) -> Self {
        Self {
            command: "generate",
            year: Some(year),
            seed: Some(seed.to_string()),
            region_count: Some(region_count),
            input_path: None,
            datetime: Local::now().to_rfc2822(),
        }
    }

    /// Metadata for a command which processes an existing weather file
    pub fn for_input(command: &'a str, input_path: &'a Path) -> Self {
        Self {
            command,
            year: None,
            seed: None,
            region_count: None,
            input_path: Some(input_path),
            datetime: Local::now().to_rfc2822(),
        }
    }
}

#[derive(Serialize)]
struct ProgramMetadata<'a> {
    /// The program name
    name: &'a str,
    /// The program version as specified in Cargo.toml
    version: &'a str,
    /// The target architecture for the build (e.g. x86_64-unknown-linux-gnu)
    target: &'a str,
    /// Whether it is a debug build
    is_debug: bool,
    /// The version of rustc used to compile the program
    rustc_version: &'a str,
    /// When the program was built
    build_time_utc: &'a str,
    /// The git commit hash for the version of the program (if known)
    git_commit_hash: String,
}

impl Default for ProgramMetadata<'_> {
    fn default() -> Self {
        Self {
            name: built_info::PKG_NAME,
            version: built_info::PKG_VERSION,
            target: built_info::TARGET,
            is_debug: built_info::DEBUG,
            rustc_version: built_info::RUSTC_VERSION,
            build_time_utc: built_info::BUILT_TIME_UTC,
            git_commit_hash: get_git_hash(),
        }
    }
}

/// Information about the platform on which the program is running.
///
/// The fields correspond to different data available from the [`PlatformInfo`] struct.
#[derive(Serialize)]
struct PlatformMetadata {
    sysname: String,
    nodename: String,
    release: String,
    version: String,
    machine: String,
    osname: String,
}

impl PlatformMetadata {
    fn new() -> Result<Self> {
        let info = PlatformInfo::new()
            .map_err(|err| anyhow!("Unable to determine platform info: {err}"))?;

        Ok(Self {
            sysname: info.sysname().to_string_lossy().into(),
            nodename: info.nodename().to_string_lossy().into(),
            release: info.release().to_string_lossy().into(),
            version: info.version().to_string_lossy().into(),
            machine: info.machine().to_string_lossy().into(),
            osname: info.osname().to_string_lossy().into(),
        })
    }
}

/// Write metadata to the specified output path in TOML format
pub fn write_metadata(output_path: &Path, run: RunMetadata) -> Result<()> {
    let metadata = Metadata {
        run,
        program: ProgramMetadata::default(),
        platform: PlatformMetadata::new()?,
    };
    let file_path = output_path.join(METADATA_FILE_NAME);
    fs::write(&file_path, toml::to_string(&metadata)?)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_write_metadata_generate() {
        let dir = tempdir().unwrap();
        write_metadata(dir.path(), RunMetadata::for_generate(2024, 42, 36)).unwrap();

        let contents = fs::read_to_string(dir.path().join(METADATA_FILE_NAME)).unwrap();
        let table: toml::Table = toml::from_str(&contents).unwrap();
        let run = table["run"].as_table().unwrap();
        assert_eq!(run["command"].as_str(), Some("generate"));
        assert_eq!(run["year"].as_integer(), Some(2024));
        assert_eq!(run["seed"].as_str(), Some("42"));
        assert_eq!(run["region_count"].as_integer(), Some(36));
        assert!(!run.contains_key("input_path"));
        assert_eq!(table["program"]["name"].as_str(), Some("weathergen"));
        assert!(table.contains_key("platform"));
    }

    #[test]
    fn test_write_metadata_input() {
        let dir = tempdir().unwrap();
        let input_path = dir.path().join("weather_2024.csv");
        write_metadata(dir.path(), RunMetadata::for_input("clean", &input_path)).unwrap();

        let contents = fs::read_to_string(dir.path().join(METADATA_FILE_NAME)).unwrap();
        let table: toml::Table = toml::from_str(&contents).unwrap();
        let run = table["run"].as_table().unwrap();
        assert_eq!(run["command"].as_str(), Some("clean"));
        assert!(run.contains_key("input_path"));
        assert!(!run.contains_key("seed"));
    }
}
