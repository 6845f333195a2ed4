//! Climate classifications and the adjustments each one applies to the weather.
use crate::units::{Celsius, Dimensionless, Hectopascals, Percent};
use serde_string_enum::DeserializeLabeledStringEnum;
use strum::{Display, EnumIter};

/// The broad climate classification of a region
#[derive(
    PartialEq,
    Eq,
    Hash,
    Copy,
    Clone,
    Debug,
    Display,
    EnumIter,
    DeserializeLabeledStringEnum,
)]
#[strum(serialize_all = "snake_case")]
pub enum ClimateType {
    /// Hot and wet, inland
    #[string = "tropical"]
    Tropical,
    /// Tropical with strong maritime influence
    #[string = "tropical_coastal"]
    TropicalCoastal,
    /// Small tropical islands
    #[string = "tropical_island"]
    TropicalIsland,
    /// Tropical uplands
    #[string = "tropical_plateau"]
    TropicalPlateau,
    /// Hot summers with heavy monsoon rain
    #[string = "humid_subtropical"]
    HumidSubtropical,
    /// Hot summers, mild winters
    #[string = "subtropical"]
    Subtropical,
    /// Dry with a short rainy season
    #[string = "semi_arid"]
    SemiArid,
    /// Hot desert
    #[string = "arid"]
    Arid,
    /// High-altitude desert
    #[string = "cold_desert"]
    ColdDesert,
    /// Mountainous
    #[string = "alpine"]
    Alpine,
    /// Large seasonal swings, far from the sea
    #[string = "continental"]
    Continental,
}

/// Adjustments a climate type applies on top of a region's own profile
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct ClimateModifiers {
    /// Added to the base temperature
    pub temperature: Celsius,
    /// Added to the humidity
    pub humidity: Percent,
    /// Multiplies the wind speed
    pub wind: Dimensionless,
    /// Added to the atmospheric pressure
    pub pressure: Hectopascals,
    /// Multiplies the precipitation
    pub precipitation: Dimensionless,
}

impl Default for ClimateModifiers {
    /// No adjustment at all
    fn default() -> Self {
        Self {
            temperature: Celsius(0.0),
            humidity: Percent(0.0),
            wind: Dimensionless(1.0),
            pressure: Hectopascals(0.0),
            precipitation: Dimensionless(1.0),
        }
    }
}

impl ClimateType {
    /// The adjustments this climate type applies
    pub fn modifiers(self) -> ClimateModifiers {
        let neutral = ClimateModifiers::default();
        match self {
            Self::TropicalIsland => ClimateModifiers {
                temperature: Celsius(-2.0),
                humidity: Percent(15.0),
                wind: Dimensionless(1.3),
                ..neutral
            },
            Self::ColdDesert => ClimateModifiers {
                humidity: Percent(-30.0),
                wind: Dimensionless(1.5),
                precipitation: Dimensionless(0.1),
                ..neutral
            },
            Self::TropicalCoastal => ClimateModifiers {
                humidity: Percent(10.0),
                wind: Dimensionless(1.2),
                ..neutral
            },
            Self::Arid => ClimateModifiers {
                humidity: Percent(-20.0),
                wind: Dimensionless(1.1),
                precipitation: Dimensionless(0.3),
                ..neutral
            },
            Self::Alpine => ClimateModifiers {
                temperature: Celsius(-5.0),
                wind: Dimensionless(1.4),
                pressure: Hectopascals(-10.0),
                ..neutral
            },
            _ => neutral,
        }
    }

    /// The typical relative humidity before any seasonal or local adjustment
    pub fn base_humidity(self) -> Percent {
        let humidity = match self {
            Self::TropicalCoastal => 85.0,
            Self::TropicalIsland => 88.0,
            Self::HumidSubtropical => 75.0,
            Self::Tropical => 70.0,
            Self::SemiArid => 45.0,
            Self::Arid => 35.0,
            Self::Alpine | Self::Continental => 55.0,
            Self::ColdDesert => 25.0,
            Self::Subtropical | Self::TropicalPlateau => 60.0,
        };

        Percent(humidity)
    }

    /// Scale factor for the difference between the day's minimum and maximum temperature
    pub fn diurnal_range_factor(self) -> f64 {
        match self {
            Self::Arid | Self::ColdDesert => 1.8,
            Self::TropicalCoastal | Self::TropicalIsland => 0.6,
            Self::Alpine => 1.2,
            _ => 1.0,
        }
    }

    /// Whether this is a desert climate
    pub fn is_desert(self) -> bool {
        matches!(self, Self::Arid | Self::ColdDesert)
    }

    /// Whether this climate is dominated by the sea
    pub fn is_maritime(self) -> bool {
        matches!(self, Self::TropicalCoastal | Self::TropicalIsland)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use strum::IntoEnumIterator;

    #[test]
    fn test_neutral_modifiers() {
        for climate_type in [
            ClimateType::Tropical,
            ClimateType::TropicalPlateau,
            ClimateType::HumidSubtropical,
            ClimateType::Subtropical,
            ClimateType::SemiArid,
            ClimateType::Continental,
        ] {
            assert_eq!(climate_type.modifiers(), ClimateModifiers::default());
        }
    }

    #[test]
    fn test_alpine_modifiers() {
        assert_eq!(
            ClimateType::Alpine.modifiers(),
            ClimateModifiers {
                temperature: Celsius(-5.0),
                humidity: Percent(0.0),
                wind: Dimensionless(1.4),
                pressure: Hectopascals(-10.0),
                precipitation: Dimensionless(1.0),
            }
        );
    }

    #[test]
    fn test_dry_climates_reduce_rain() {
        assert!(ClimateType::Arid.modifiers().precipitation < Dimensionless(1.0));
        assert!(ClimateType::ColdDesert.modifiers().precipitation < Dimensionless(1.0));
    }

    #[rstest]
    #[case(ClimateType::TropicalIsland, 88.0)]
    #[case(ClimateType::TropicalPlateau, 60.0)]
    #[case(ClimateType::ColdDesert, 25.0)]
    fn test_base_humidity(#[case] climate_type: ClimateType, #[case] expected: f64) {
        assert_eq!(climate_type.base_humidity(), Percent(expected));
    }

    #[test]
    fn test_base_humidity_in_range() {
        for climate_type in ClimateType::iter() {
            let humidity = climate_type.base_humidity();
            assert!(humidity > Percent(0.0) && humidity < Percent(100.0));
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(ClimateType::HumidSubtropical.to_string(), "humid_subtropical");
        assert_eq!(ClimateType::ColdDesert.to_string(), "cold_desert");
    }
}
