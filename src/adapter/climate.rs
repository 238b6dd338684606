// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Thermostat (climate) adapter.
//!
//! The HVAC mode is published as the integer code of [`HvacMode`]; both
//! directions go through the same fixed table.

use serde_json::Value;

use super::{ServiceCall, decimal, integer, number, state_str};
use crate::entity::Domain;
use crate::error::{DecodeError, EncodeError};
use crate::types::{HvacMode, PointValue};

/// Attributes of a `climate.*` entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClimatePoint {
    /// HVAC mode code.
    State,
    /// Target temperature setpoint.
    Temperature,
    /// Measured temperature. Read-only.
    CurrentTemperature,
}

impl ClimatePoint {
    pub(super) fn from_name(name: &str) -> Option<Self> {
        match name {
            "state" => Some(Self::State),
            "temperature" => Some(Self::Temperature),
            "current_temperature" => Some(Self::CurrentTemperature),
            _ => None,
        }
    }

    /// Returns the canonical attribute name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::State => "state",
            Self::Temperature => "temperature",
            Self::CurrentTemperature => "current_temperature",
        }
    }

    pub(super) fn decode(self, raw: Option<&Value>) -> Result<PointValue, DecodeError> {
        match self {
            Self::State => {
                let mode: HvacMode = state_str(raw)?.parse()?;
                Ok(PointValue::Int(mode.code()))
            }
            Self::Temperature | Self::CurrentTemperature => {
                number(raw, self.as_str()).map(PointValue::Float)
            }
        }
    }

    pub(super) fn encode(self, value: &PointValue) -> Result<ServiceCall, EncodeError> {
        match self {
            Self::State => {
                let mode = HvacMode::from_code(integer(value)?)?;
                Ok(ServiceCall::new(Domain::Climate, "set_hvac_mode")
                    .with_field("hvac_mode", mode.as_str()))
            }
            Self::Temperature => Ok(ServiceCall::new(Domain::Climate, "set_temperature")
                .with_field("temperature", decimal(value)?)),
            Self::CurrentTemperature => Err(EncodeError::ReadOnly(self.as_str())),
        }
    }
}
