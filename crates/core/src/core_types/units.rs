//! Semantic unit types for fire behavior quantities
//!
//! Newtype wrappers keep US customary fire-behavior units (chains per hour,
//! feet per minute, BTU/ft/s) from being mixed up with each other or with
//! plain numbers.
//!
//! # Design Philosophy
//! - All quantities are f32; raster-scale precision is adequate
//! - Total ordering via `Ord` (NaN handled as greater than all values)
//! - `Deref` to the raw value for arithmetic-heavy model code
//! - Explicit conversion methods between related types
//! - Serde support for serialization
//!
//! # Usage
//! ```
//! use fire_spread_core::core_types::units::{ChainsPerHour, FeetPerMinute};
//!
//! let ros = ChainsPerHour::new(10.0);
//! let fpm: FeetPerMinute = ros.into();
//! assert!((*fpm - 11.0).abs() < 1e-4);
//! ```

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Deref, Div, Mul, Sub};

/// Feet in one surveyor's chain
pub const FEET_PER_CHAIN: f32 = 66.0;

/// Square feet in one acre
pub const SQUARE_FEET_PER_ACRE: f32 = 43_560.0;

macro_rules! scalar_unit {
    ($(#[$meta:meta])* $name:ident, $suffix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
        #[repr(transparent)]
        pub struct $name(f32);

        impl Eq for $name {}

        impl PartialOrd for $name {
            fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                Some(self.cmp(other))
            }
        }

        impl Ord for $name {
            fn cmp(&self, other: &Self) -> Ordering {
                self.0.total_cmp(&other.0)
            }
        }

        impl Deref for $name {
            type Target = f32;
            #[inline]
            fn deref(&self) -> &f32 {
                &self.0
            }
        }

        impl $name {
            /// Zero value
            pub const ZERO: $name = $name(0.0);

            #[doc = concat!("Create a new `", stringify!($name), "` value.")]
            #[inline]
            #[must_use]
            pub const fn new(value: f32) -> Self {
                $name(value)
            }

            /// Get the raw f32 value
            #[inline]
            #[must_use]
            pub fn value(self) -> f32 {
                self.0
            }
        }

        impl From<f32> for $name {
            fn from(v: f32) -> Self {
                $name(v)
            }
        }

        impl From<$name> for f32 {
            fn from(v: $name) -> f32 {
                v.0
            }
        }

        impl Add for $name {
            type Output = $name;
            fn add(self, rhs: $name) -> $name {
                $name(self.0 + rhs.0)
            }
        }

        impl Sub for $name {
            type Output = $name;
            fn sub(self, rhs: $name) -> $name {
                $name(self.0 - rhs.0)
            }
        }

        impl Mul<f32> for $name {
            type Output = $name;
            fn mul(self, rhs: f32) -> $name {
                $name(self.0 * rhs)
            }
        }

        impl Div<f32> for $name {
            type Output = $name;
            fn div(self, rhs: f32) -> $name {
                $name(self.0 / rhs)
            }
        }

        impl PartialEq<f32> for $name {
            fn eq(&self, other: &f32) -> bool {
                self.0 == *other
            }
        }

        impl PartialOrd<f32> for $name {
            fn partial_cmp(&self, other: &f32) -> Option<Ordering> {
                self.0.partial_cmp(other)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{:.2} {}", self.0, $suffix)
            }
        }
    };
}

// ============================================================================
// WEATHER
// ============================================================================

scalar_unit!(
    /// Wind speed in miles per hour (midflame height)
    MilesPerHour,
    "mph"
);

scalar_unit!(
    /// Air temperature in degrees Fahrenheit
    Fahrenheit,
    "°F"
);

scalar_unit!(
    /// Percentage (moisture content, relative humidity, slope rise over run)
    Percent,
    "%"
);

scalar_unit!(
    /// Angle in degrees (compass bearing or slope angle)
    Degrees,
    "°"
);

impl Degrees {
    /// Interpret as a slope angle and convert to percent rise (tan θ × 100)
    #[must_use]
    pub fn slope_to_percent(self) -> Percent {
        Percent::new(self.0.to_radians().tan() * 100.0)
    }
}

// ============================================================================
// SPREAD RATES
// ============================================================================

scalar_unit!(
    /// Rate of spread in chains per hour
    ChainsPerHour,
    "ch/h"
);

scalar_unit!(
    /// Rate of spread in feet per minute
    FeetPerMinute,
    "ft/min"
);

impl ChainsPerHour {
    /// Convert to feet per minute (× 66 / 60)
    #[must_use]
    pub fn to_feet_per_minute(self) -> FeetPerMinute {
        FeetPerMinute::new(self.0 * FEET_PER_CHAIN / 60.0)
    }
}

impl FeetPerMinute {
    /// Convert to chains per hour (× 60 / 66)
    #[must_use]
    pub fn to_chains_per_hour(self) -> ChainsPerHour {
        ChainsPerHour::new(self.0 * 60.0 / FEET_PER_CHAIN)
    }
}

impl From<ChainsPerHour> for FeetPerMinute {
    fn from(v: ChainsPerHour) -> FeetPerMinute {
        v.to_feet_per_minute()
    }
}

impl From<FeetPerMinute> for ChainsPerHour {
    fn from(v: FeetPerMinute) -> ChainsPerHour {
        v.to_chains_per_hour()
    }
}

// ============================================================================
// FIRE BEHAVIOR OUTPUTS
// ============================================================================

scalar_unit!(
    /// Length in feet (flame length, cell size)
    Feet,
    "ft"
);

scalar_unit!(
    /// Fireline intensity in BTU per foot of front per second
    BtuPerFootSecond,
    "BTU/ft/s"
);

scalar_unit!(
    /// Elapsed time in hours
    Hours,
    "h"
);

scalar_unit!(
    /// Area in acres
    Acres,
    "ac"
);

impl Feet {
    /// Time in hours to cross this distance at the given rate
    #[must_use]
    pub fn travel_time(self, rate: FeetPerMinute) -> Hours {
        Hours::new(self.0 / rate.0 / 60.0)
    }

    /// Area of a square cell with this side length
    #[must_use]
    pub fn square_acres(self) -> Acres {
        Acres::new(self.0 * self.0 / SQUARE_FEET_PER_ACRE)
    }
}

impl Hours {
    /// Convert to minutes
    #[must_use]
    pub fn to_minutes(self) -> f32 {
        self.0 * 60.0
    }
}
