//! The seasons of the Indian weather year.
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// One of the four seasons the year is divided into
#[derive(
    PartialEq, Eq, Hash, PartialOrd, Ord, Copy, Clone, Debug, Display, EnumIter, Serialize, Deserialize,
)]
pub enum Season {
    /// December to February
    #[strum(serialize = "Winter")]
    Winter,
    /// March to June
    #[strum(serialize = "Summer")]
    Summer,
    /// July to September
    #[strum(serialize = "Monsoon")]
    Monsoon,
    /// October and November
    #[strum(serialize = "Post-Monsoon")]
    #[serde(rename = "Post-Monsoon")]
    PostMonsoon,
}

/// Seasonal adjustments to temperature and humidity
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct SeasonProfile {
    /// Fraction of a region's temperature range added to its base temperature
    pub temp_modifier: f64,
    /// Fraction of 35 percentage points added to the humidity
    pub humidity_modifier: f64,
    /// Kinds of extreme event typical of the season.
    ///
    /// These are informational only.
    pub extreme_events: &'static [&'static str],
}

impl Season {
    /// The season a month (1-12) falls in
    pub fn from_month(month: u32) -> Self {
        match month {
            3..=6 => Self::Summer,
            7..=9 => Self::Monsoon,
            10 | 11 => Self::PostMonsoon,
            _ => Self::Winter,
        }
    }


    /// The season's weather adjustments
    pub fn profile(self) -> SeasonProfile {
        match self {
            Self::Winter => SeasonProfile {
                temp_modifier: -0.25,
                humidity_modifier: -0.25,
                extreme_events: &["cold_wave", "fog"],
            },
            Self::Summer => SeasonProfile {
                temp_modifier: 0.55,
                humidity_modifier: -0.35,
                extreme_events: &["severe_heat_wave", "hot_winds"],
            },
            Self::Monsoon => SeasonProfile {
                temp_modifier: -0.05,
                humidity_modifier: 0.55,
                extreme_events: &["heavy_rainfall", "floods", "landslides"],
            },
            Self::PostMonsoon => SeasonProfile {
                temp_modifier: 0.15,
                humidity_modifier: 0.25,
                extreme_events: &["cyclones", "thunderstorms"],
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashSet;
    use strum::IntoEnumIterator;

    #[rstest]
    #[case(1, Season::Winter)]
    #[case(2, Season::Winter)]
    #[case(3, Season::Summer)]
    #[case(6, Season::Summer)]
    #[case(7, Season::Monsoon)]
    #[case(9, Season::Monsoon)]
    #[case(10, Season::PostMonsoon)]
    #[case(11, Season::PostMonsoon)]
    #[case(12, Season::Winter)]
    fn test_from_month(#[case] month: u32, #[case] expected: Season) {
        assert_eq!(Season::from_month(month), expected);
    }

    #[test]
    fn test_every_season_has_months() {
        let seasons: HashSet<Season> = (1..=12).map(Season::from_month).collect();
        assert_eq!(seasons, Season::iter().collect());
    }

    #[test]
    fn test_display() {
        assert_eq!(Season::PostMonsoon.to_string(), "Post-Monsoon");
        assert_eq!(Season::Monsoon.to_string(), "Monsoon");
    }
}
