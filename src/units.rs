//! This module defines the unit types used for weather quantities.

/// Round a value to one decimal place.
///
/// Small negative values round to positive zero, never `-0.0`.
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0 + 0.0
}

macro_rules! unit_struct {
    ($name:ident) => {
        /// Represents a type of quantity.
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            PartialOrd,
            Default,
            derive_more::Add,
            derive_more::Sub,
            derive_more::Display,
            serde::Serialize,
            serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub f64);

        impl $name {
            /// Creates a new instance of the unit type from a f64 value.
            pub fn new(val: f64) -> Self {
                Self(val)
            }

            /// Returns the value of the unit type as a f64.
            pub fn value(self) -> f64 {
                self.0
            }

            /// The value rounded to one decimal place
            pub fn round_to_tenth(self) -> Self {
                Self(round_to_tenth(self.0))
            }

            /// Clamp the value to the given range
            pub fn clamp(self, min: f64, max: f64) -> Self {
                Self(self.0.clamp(min, max))
            }

            /// Whether the value is finite
            pub fn is_finite(self) -> bool {
                self.0.is_finite()
            }
        }

        impl std::ops::Mul<f64> for $name {
            type Output = $name;
            fn mul(self, rhs: f64) -> $name {
                $name(self.0 * rhs)
            }
        }

        impl std::ops::Mul<Dimensionless> for $name {
            type Output = $name;
            fn mul(self, rhs: Dimensionless) -> $name {
                $name(self.0 * rhs.0)
            }
        }

        impl std::ops::Div<f64> for $name {
            type Output = $name;
            fn div(self, rhs: f64) -> $name {
                $name(self.0 / rhs)
            }
        }
    };
}

unit_struct!(Dimensionless);
unit_struct!(Celsius);
unit_struct!(Millimetres);
unit_struct!(Percent);
unit_struct!(KilometresPerHour);
unit_struct!(Hectopascals);
unit_struct!(Metres);

impl Celsius {
    /// Convert to degrees Fahrenheit
    pub fn to_fahrenheit(self) -> f64 {
        self.0 * 9.0 / 5.0 + 32.0
    }

    /// Convert from degrees Fahrenheit
    pub fn from_fahrenheit(fahrenheit: f64) -> Self {
        Self((fahrenheit - 32.0) * 5.0 / 9.0)
    }
}
