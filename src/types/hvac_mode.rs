// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Thermostat operating modes.
//!
//! Thermostat modes are published as integer codes. The table is fixed: it
//! mirrors the Home Assistant `hvac_mode` values this driver can command and
//! is not configurable per registry. Code 1 is intentionally unassigned.

use std::fmt;
use std::str::FromStr;

use crate::error::ValueError;

/// HVAC mode of a climate entity.
///
/// # Examples
///
/// ```
/// use hass_points::types::HvacMode;
///
/// let mode: HvacMode = "cool".parse().unwrap();
/// assert_eq!(mode.code(), 3);
/// assert_eq!(HvacMode::from_code(2).unwrap(), HvacMode::Heat);
/// assert_eq!(HvacMode::Auto.as_str(), "auto");
///
/// assert!(HvacMode::from_code(1).is_err());
/// assert!("dry".parse::<HvacMode>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HvacMode {
    /// The thermostat is off.
    Off,
    /// Heating.
    Heat,
    /// Cooling.
    Cool,
    /// Automatic heating or cooling.
    Auto,
}

impl HvacMode {
    /// All supported modes, in code order.
    pub const ALL: [Self; 4] = [Self::Off, Self::Heat, Self::Cool, Self::Auto];

    /// Returns the Home Assistant `hvac_mode` string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Heat => "heat",
            Self::Cool => "cool",
            Self::Auto => "auto",
        }
    }

    /// Returns the integer code published for this mode.
    #[must_use]
    pub const fn code(&self) -> i64 {
        match self {
            Self::Off => 0,
            Self::Heat => 2,
            Self::Cool => 3,
            Self::Auto => 4,
        }
    }

    /// Looks up a mode by its integer code.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::UnknownModeCode` for codes outside {0, 2, 3, 4}.
    pub fn from_code(code: i64) -> Result<Self, ValueError> {
        match code {
            0 => Ok(Self::Off),
            2 => Ok(Self::Heat),
            3 => Ok(Self::Cool),
            4 => Ok(Self::Auto),
            _ => Err(ValueError::UnknownModeCode(code)),
        }
    }
}

impl fmt::Display for HvacMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HvacMode {
    type Err = ValueError;

    // Exact match: Home Assistant always reports lowercase mode names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "off" => Ok(Self::Off),
            "heat" => Ok(Self::Heat),
            "cool" => Ok(Self::Cool),
            "auto" => Ok(Self::Auto),
            _ => Err(ValueError::UnknownMode(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_table_is_a_bijection() {
        for mode in HvacMode::ALL {
            assert_eq!(HvacMode::from_code(mode.code()).unwrap(), mode);
            assert_eq!(mode.as_str().parse::<HvacMode>().unwrap(), mode);
        }
    }

    #[test]
    fn unassigned_codes_are_rejected() {
        for code in [-1, 1, 5, 42, i64::MAX] {
            assert_eq!(
                HvacMode::from_code(code),
                Err(ValueError::UnknownModeCode(code))
            );
        }
    }

    #[test]
    fn unsupported_mode_names_are_rejected() {
        for name in ["heat_cool", "dry", "fan_only", "HEAT", ""] {
            assert!(name.parse::<HvacMode>().is_err(), "{name} should fail");
        }
    }

    #[test]
    fn display_uses_remote_name() {
        assert_eq!(HvacMode::Cool.to_string(), "cool");
    }
}
