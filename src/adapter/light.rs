// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Light adapter.

use serde_json::Value;

use super::{ServiceCall, binary_command, integer, level, state_str};
use crate::entity::Domain;
use crate::error::{DecodeError, EncodeError};
use crate::types::{Brightness, PointValue};

/// Attributes of a `light.*` entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LightPoint {
    /// On/off state, published as a boolean.
    State,
    /// Brightness on the 0-255 scale.
    Brightness,
}

impl LightPoint {
    pub(super) fn from_name(name: &str) -> Option<Self> {
        match name {
            "state" => Some(Self::State),
            "brightness" => Some(Self::Brightness),
            _ => None,
        }
    }

    /// Returns the canonical attribute name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::State => "state",
            Self::Brightness => "brightness",
        }
    }

    pub(super) fn decode(self, raw: Option<&Value>) -> Result<PointValue, DecodeError> {
        match self {
            Self::State => match state_str(raw)? {
                "on" => Ok(PointValue::Bool(true)),
                "off" => Ok(PointValue::Bool(false)),
                other => Err(DecodeError::UnrecognizedState(other.to_string())),
            },
            Self::Brightness => {
                let brightness = Brightness::new(level(raw)?)?;
                Ok(PointValue::Int(i64::from(brightness.value())))
            }
        }
    }

    pub(super) fn encode(self, value: &PointValue) -> Result<ServiceCall, EncodeError> {
        match self {
            Self::State => {
                let service = if binary_command(value, &["on"], &["off"])? {
                    "turn_on"
                } else {
                    "turn_off"
                };
                Ok(ServiceCall::new(Domain::Light, service))
            }
            // Out-of-range brightness is rejected, not clamped.
            Self::Brightness => {
                let brightness = Brightness::new(integer(value)?)?;
                Ok(ServiceCall::new(Domain::Light, "turn_on")
                    .with_field("brightness", brightness.value()))
            }
        }
    }
}
