// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for point decoding and encoding.
//!
//! Constrained types ensure values are within their valid ranges at
//! construction time, so the adapters never emit an out-of-range command.
//!
//! # Types
//!
//! - [`PointValue`] - A typed local point value
//! - [`PointType`] - The type a registry declares for a point
//! - [`Brightness`] - Light brightness (0-255)
//! - [`Percentage`] - Fan speed or cover position (0-100)
//! - [`HvacMode`] - Thermostat mode with its fixed integer code

mod brightness;
mod hvac_mode;
mod percentage;
mod value;

pub use brightness::Brightness;
pub use hvac_mode::HvacMode;
pub use percentage::Percentage;
pub use value::{PointType, PointValue};
