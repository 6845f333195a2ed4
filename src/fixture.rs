//! Fixtures for tests
use crate::calibration::Calibration;
use crate::climate::ClimateType;
use crate::region::{RegionKind, RegionMap, RegionProfile, default_regions};
use crate::simulation::WeatherSimulator;
use crate::units::{Celsius, Dimensionless, Metres};
use rstest::fixture;

/// Assert that an error with the given message occurs
macro_rules! assert_error {
    ($result:expr, $msg:expr) => {
        assert_eq!(
            $result.unwrap_err().chain().next().unwrap().to_string(),
            $msg
        );
    };
}
pub(crate) use assert_error;

/// The seed used by simulator fixtures
pub const SEED: u64 = 42;

/// A plain inland tropical region on the equator at sea level
#[fixture]
pub fn region_profile() -> RegionProfile {
    RegionProfile {
        id: "Testland".into(),
        kind: RegionKind::State,
        latitude: 0.0,
        longitude: 80.0,
        climate_type: ClimateType::Tropical,
        elevation: Metres(0.0),
        temp_base: Celsius(25.0),
        temp_range: Celsius(10.0),
        monsoon_strength: Dimensionless(0.5),
        coastal: false,
    }
}

#[fixture]
pub fn regions() -> RegionMap {
    default_regions().unwrap()
}

#[fixture]
pub fn calibration() -> Calibration {
    Calibration::default_2024().unwrap()
}

#[fixture]
pub fn simulator(regions: RegionMap, calibration: Calibration) -> WeatherSimulator {
    WeatherSimulator::new(regions, calibration, SEED).unwrap()
}
