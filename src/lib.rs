//! Common functionality for weathergen.
#![warn(missing_docs)]
use std::path::PathBuf;

pub mod analysis;
pub mod calibration;
pub mod clean;
pub mod cli;
pub mod climate;
pub mod id;
pub mod input;
pub mod log;
pub mod output;
pub mod record;
pub mod region;
pub mod season;
pub mod settings;
pub mod simulation;
pub mod units;

#[cfg(test)]
mod fixture;

/// Get the config dir for the program.
///
/// This is the `weathergen` subfolder of the platform's standard config directory, falling back
/// on the current directory if the platform does not define one.
pub fn get_weathergen_config_dir() -> PathBuf {
    let Some(mut config_dir) = dirs::config_dir() else {
        return PathBuf::default();
    };

    config_dir.push("weathergen");
    config_dir
}
