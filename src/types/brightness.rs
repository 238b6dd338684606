// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Brightness type for light control.
//!
//! Home Assistant expresses light brightness on a 0-255 scale, unlike the
//! percentage scale used by fans and covers.

use std::fmt;

use crate::error::ValueError;

/// Light brightness level (0-255).
///
/// # Examples
///
/// ```
/// use hass_points::types::Brightness;
///
/// let half = Brightness::new(128).unwrap();
/// assert_eq!(half.value(), 128);
///
/// assert_eq!(Brightness::MIN.value(), 0);
/// assert_eq!(Brightness::MAX.value(), 255);
///
/// // Invalid values return error
/// assert!(Brightness::new(300).is_err());
/// assert!(Brightness::new(-1).is_err());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct Brightness(u8);

impl Brightness {
    /// Lowest brightness (0).
    pub const MIN: Self = Self(0);

    /// Highest brightness (255).
    pub const MAX: Self = Self(255);

    /// Creates a new brightness value.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if value is outside [0, 255].
    pub fn new(value: i64) -> Result<Self, ValueError> {
        u8::try_from(value)
            .map(Self)
            .map_err(|_| ValueError::OutOfRange {
                min: 0,
                max: 255,
                actual: value,
            })
    }

    /// Creates a brightness value, saturating at the bounds of the range.
    ///
    /// # Examples
    ///
    /// ```
    /// use hass_points::types::Brightness;
    ///
    /// assert_eq!(Brightness::clamped(300).value(), 255);
    /// assert_eq!(Brightness::clamped(-20).value(), 0);
    /// ```
    #[must_use]
    pub fn clamped(value: i64) -> Self {
        Self(u8::try_from(value.clamp(0, 255)).unwrap_or(u8::MAX))
    }

    /// Returns the raw brightness value.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for Brightness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i64> for Brightness {
    type Error = ValueError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
