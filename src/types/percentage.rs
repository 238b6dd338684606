// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Percentage type for fan speed and cover position.

use std::fmt;

use crate::error::ValueError;

/// A level expressed as a percentage (0-100).
///
/// Fans use it for their speed and covers for their position, where 0 is
/// fully closed and 100 fully open.
///
/// # Examples
///
/// ```
/// use hass_points::types::Percentage;
///
/// let pct = Percentage::new(57).unwrap();
/// assert_eq!(pct.value(), 57);
///
/// // Writes are clamped rather than rejected
/// assert_eq!(Percentage::clamped(150).value(), 100);
///
/// assert!(Percentage::new(101).is_err());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct Percentage(u8);

impl Percentage {
    /// 0%.
    pub const MIN: Self = Self(0);

    /// 100%.
    pub const MAX: Self = Self(100);

    /// Creates a new percentage.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if value is outside [0, 100].
    pub fn new(value: i64) -> Result<Self, ValueError> {
        if !(0..=100).contains(&value) {
            return Err(ValueError::OutOfRange {
                min: 0,
                max: 100,
                actual: value,
            });
        }
        Ok(Self::clamped(value))
    }

    /// Creates a percentage, saturating at 0 and 100.
    #[must_use]
    pub fn clamped(value: i64) -> Self {
        Self(u8::try_from(value.clamp(0, 100)).unwrap_or(100))
    }

    /// Returns the percentage value.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

impl TryFrom<i64> for Percentage {
    type Error = ValueError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
