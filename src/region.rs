//! Regions are the states and union territories for which weather is generated.
use crate::climate::ClimateType;
use crate::id::{IDCollection, define_id_getter, define_id_type};
use crate::input::{deserialise_proportion, read_csv_id_file_from_reader};
use crate::units::{Celsius, Dimensionless, Metres};
use anyhow::{Context, Result, ensure};
use indexmap::{IndexMap, IndexSet};
use serde::Deserialize;
use serde_string_enum::DeserializeLabeledStringEnum;
use std::fs::File;
use std::path::Path;

define_id_type! {RegionID}

/// A map of [`RegionProfile`]s, keyed by region ID.
///
/// Iteration order follows the order of the regions file.
pub type RegionMap = IndexMap<RegionID, RegionProfile>;

/// The built-in region table
const DEFAULT_REGIONS: &str = include_str!("../data/regions.csv");

/// The kind of administrative unit a region is
#[derive(PartialEq, Eq, Copy, Clone, Debug, DeserializeLabeledStringEnum)]
pub enum RegionKind {
    /// A state
    #[string = "state"]
    State,
    /// A union territory
    #[string = "union_territory"]
    UnionTerritory,
}

/// The static climate profile of a region
#[derive(PartialEq, Debug, Clone, Deserialize)]
pub struct RegionProfile {
    /// The region's name, which is also its identifier (e.g. "Kerala")
    pub id: RegionID,
    /// Whether the region is a state or union territory
    pub kind: RegionKind,
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
    /// Broad climate classification
    pub climate_type: ClimateType,
    /// Representative elevation above sea level
    pub elevation: Metres,
    /// Baseline annual temperature
    pub temp_base: Celsius,
    /// Typical spread of temperatures over the year
    pub temp_range: Celsius,
    /// How strongly the monsoon affects the region, between 0 and 1
    #[serde(deserialize_with = "deserialise_proportion")]
    pub monsoon_strength: Dimensionless,
    /// Whether the region has a coastline
    pub coastal: bool,
}
define_id_getter! {RegionProfile, RegionID}

impl RegionProfile {
    /// Check that the profile's values are physically meaningful
    fn validate(&self) -> Result<()> {
        ensure!(
            (-90.0..=90.0).contains(&self.latitude),
            "Latitude must be between -90 and 90"
        );
        ensure!(
            (-180.0..=180.0).contains(&self.longitude),
            "Longitude must be between -180 and 180"
        );
        ensure!(
            self.elevation.is_finite(),
            "Elevation must be a finite number"
        );
        ensure!(
            self.temp_base.is_finite(),
            "Baseline temperature must be a finite number"
        );
        ensure!(
            self.temp_range.is_finite() && self.temp_range >= Celsius(0.0),
            "Temperature range must be a finite, non-negative number"
        );

        Ok(())
    }
}

/// Read region profiles from something implementing [`std::io::Read`]
fn read_regions_from_reader<R: std::io::Read>(reader: R) -> Result<RegionMap> {
    let regions: RegionMap = read_csv_id_file_from_reader(reader)?;
    for region in regions.values() {
        region
            .validate()
            .with_context(|| format!("Invalid profile for region {}", region.id))?;
    }

    Ok(regions)
}

/// The built-in table of all Indian states and union territories
pub fn default_regions() -> Result<RegionMap> {
    read_regions_from_reader(DEFAULT_REGIONS.as_bytes())
        .context("Failed to read built-in region table")
}

/// Read region profiles from a CSV file.
///
/// # Arguments
///
/// * `file_path` - Path to the regions CSV file
///
/// # Returns
///
/// A [`RegionMap`] with the parsed profiles or an error
pub fn read_regions(file_path: &Path) -> Result<RegionMap> {
    let file = File::open(file_path)
        .with_context(|| format!("Could not open {}", file_path.display()))?;
    read_regions_from_reader(file)
        .with_context(|| format!("Error reading {}", file_path.display()))
}

/// Parse a string of regions separated by semicolons into a list of [`RegionID`]s.
///
/// The string can be either "all" (case-insensitive), a single region, or a semicolon-separated
/// list of regions (e.g. "Kerala;Goa" or "Kerala; Goa"). Regions are returned in the order they
/// appear in `regions`.
pub fn parse_region_str(s: &str, regions: &RegionMap) -> Result<IndexSet<RegionID>> {
    let s = s.trim();
    ensure!(!s.is_empty(), "No regions provided");

    if s.eq_ignore_ascii_case("all") {
        return Ok(regions.keys().cloned().collect());
    }

    let selected: Vec<RegionID> = s
        .split(';')
        .map(|id| regions.get_id_by_str(id.trim()))
        .collect::<Result<_>>()?;

    Ok(regions
        .keys()
        .filter(|id| selected.contains(id))
        .cloned()
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{assert_error, region_profile};
    use rstest::rstest;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_default_regions() {
        let regions = default_regions().unwrap();
        assert_eq!(regions.len(), 36);

        let kinds = regions.values().map(|region| region.kind);
        assert_eq!(kinds.clone().filter(|kind| *kind == RegionKind::State).count(), 28);
        assert_eq!(
            kinds.filter(|kind| *kind == RegionKind::UnionTerritory).count(),
            8
        );

        let ladakh = &regions["Ladakh"];
        assert_eq!(ladakh.climate_type, ClimateType::ColdDesert);
        assert_eq!(ladakh.elevation, Metres(3500.0));
        assert!(!ladakh.coastal);
    }

    #[test]
    fn test_read_regions() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("regions.csv");
        {
            let mut file = File::create(&file_path).unwrap();
            writeln!(
                file,
                "id,kind,latitude,longitude,climate_type,elevation,temp_base,temp_range,monsoon_strength,coastal
Goa,state,15.2993,74.1240,tropical_coastal,20,27,8,0.9,true"
            )
            .unwrap();
        }

        let regions = read_regions(&file_path).unwrap();
        assert_eq!(regions.len(), 1);
        assert_eq!(regions["Goa"].climate_type, ClimateType::TropicalCoastal);
        assert_eq!(regions["Goa"].monsoon_strength, Dimensionless(0.9));
    }

    #[rstest]
    #[case("Goa,state,15.3,74.1,tropical_coastal,20,27,8,1.5,true")] // monsoon strength > 1
    #[case("Goa,state,95.0,74.1,tropical_coastal,20,27,8,0.9,true")] // bad latitude
    #[case("Goa,state,15.3,74.1,tropical_coastal,20,27,-8,0.9,true")] // negative range
    #[case("Goa,state,15.3,74.1,savanna,20,27,8,0.9,true")] // unknown climate
    #[case("Goa,province,15.3,74.1,tropical_coastal,20,27,8,0.9,true")] // unknown kind
    fn test_read_regions_invalid(#[case] row: &str) {
        let data = format!(
            "id,kind,latitude,longitude,climate_type,elevation,temp_base,temp_range,monsoon_strength,coastal\n{row}\n"
        );
        assert!(read_regions_from_reader(data.as_bytes()).is_err());
    }

    #[test]
    fn test_read_regions_duplicate() {
        let data = "id,kind,latitude,longitude,climate_type,elevation,temp_base,temp_range,monsoon_strength,coastal
Goa,state,15.3,74.1,tropical_coastal,20,27,8,0.9,true
Goa,state,15.3,74.1,tropical_coastal,20,27,8,0.9,true
";
        assert_error!(read_regions_from_reader(data.as_bytes()), "Duplicate ID found: Goa");
    }

    #[test]
    fn test_validate_profile() {
        assert!(region_profile().validate().is_ok());
    }

    #[rstest]
    #[case("all", &["Kerala", "Goa", "Delhi"])]
    #[case(" ALL ", &["Kerala", "Goa", "Delhi"])]
    #[case("Goa", &["Goa"])]
    #[case("Delhi; Kerala", &["Kerala", "Delhi"])] // file order is kept
    fn test_parse_region_str(#[case] input: &str, #[case] expected: &[&str]) {
        let regions: RegionMap = ["Kerala", "Goa", "Delhi"]
            .into_iter()
            .map(|id| {
                let profile = RegionProfile {
                    id: id.into(),
                    ..region_profile()
                };
                (profile.id.clone(), profile)
            })
            .collect();

        let selected = parse_region_str(input, &regions).unwrap();
        let selected: Vec<&str> = selected.iter().map(|id| &*id.0).collect();
        assert_eq!(selected, expected);
    }

    #[rstest]
    #[case("", "No regions provided")]
    #[case("Atlantis", "Unknown ID Atlantis found")]
    fn test_parse_region_str_invalid(#[case] input: &str, #[case] msg: &str) {
        let regions = default_regions().unwrap();
        assert_error!(parse_region_str(input, &regions), msg);
    }
}
