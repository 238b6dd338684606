// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fan adapter.

use serde_json::Value;

use super::{ServiceCall, binary_command, integer, level, state_str};
use crate::entity::Domain;
use crate::error::{DecodeError, EncodeError};
use crate::types::{Percentage, PointValue};

/// Attributes of a `fan.*` entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FanPoint {
    /// On (1) or off (0).
    State,
    /// Speed as a percentage. Also bound from `speed` and `level`.
    Percentage,
}

impl FanPoint {
    pub(super) fn from_name(name: &str) -> Option<Self> {
        match name {
            "state" => Some(Self::State),
            "percentage" | "speed" | "level" => Some(Self::Percentage),
            _ => None,
        }
    }

    /// Returns the canonical attribute name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::State => "state",
            Self::Percentage => "percentage",
        }
    }

    pub(super) fn decode(self, raw: Option<&Value>) -> Result<PointValue, DecodeError> {
        match self {
            Self::State => match state_str(raw)? {
                "on" => Ok(PointValue::Int(1)),
                "off" => Ok(PointValue::Int(0)),
                other => Err(DecodeError::UnrecognizedState(other.to_string())),
            },
            Self::Percentage => {
                let speed = Percentage::new(level(raw)?)?;
                Ok(PointValue::Int(i64::from(speed.value())))
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
                Ok(ServiceCall::new(Domain::Fan, service))
            }
            Self::Percentage => {
                let speed = Percentage::clamped(integer(value)?);
                Ok(ServiceCall::new(Domain::Fan, "set_percentage")
                    .with_field("percentage", speed.value()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn aliases_bind_to_percentage() {
        for name in ["percentage", "speed", "level"] {
            assert_eq!(FanPoint::from_name(name), Some(FanPoint::Percentage));
        }
        assert_eq!(FanPoint::from_name("oscillating"), None);
    }

    #[test]
    fn decode_state() {
        assert_eq!(FanPoint::State.decode(Some(&json!("on"))), Ok(PointValue::Int(1)));
        assert_eq!(FanPoint::State.decode(Some(&json!("off"))), Ok(PointValue::Int(0)));
        assert!(FanPoint::State.decode(Some(&json!("unknown"))).is_err());
    }

    #[test]
    fn decode_percentage() {
        assert_eq!(
            FanPoint::Percentage.decode(Some(&json!(33))),
            Ok(PointValue::Int(33))
        );
        assert_eq!(FanPoint::Percentage.decode(None), Ok(PointValue::Int(0)));
        assert!(FanPoint::Percentage.decode(Some(&json!(101))).is_err());
    }

    #[test]
    fn encode_state() {
        assert_eq!(
            FanPoint::State.encode(&PointValue::Int(1)),
            Ok(ServiceCall::new(Domain::Fan, "turn_on"))
        );
        assert_eq!(
            FanPoint::State.encode(&PointValue::from("off")),
            Ok(ServiceCall::new(Domain::Fan, "turn_off"))
        );
        assert!(FanPoint::State.encode(&PointValue::Int(3)).is_err());
    }

    #[test]
    fn encode_percentage_clamps() {
        for (input, sent) in [(-10, 0), (0, 0), (45, 45), (100, 100), (250, 100)] {
            let call = FanPoint::Percentage.encode(&PointValue::Int(input)).unwrap();
            assert_eq!(call.service(), "set_percentage");
            assert_eq!(call.field("percentage"), Some(&json!(sent)), "{input}");
        }
    }

    #[test]
    fn encode_percentage_requires_integer() {
        assert!(FanPoint::Percentage.encode(&PointValue::Float(50.5)).is_err());
        assert!(FanPoint::Percentage.encode(&PointValue::from("fast")).is_err());
    }

    #[test]
    fn round_trip() {
        for v in 0..=100 {
            let call = FanPoint::Percentage.encode(&PointValue::Int(v)).unwrap();
            let raw = call.field("percentage").cloned().unwrap();
            assert_eq!(FanPoint::Percentage.decode(Some(&raw)), Ok(PointValue::Int(v)));
        }
        for v in [0, 1] {
            let call = FanPoint::State.encode(&PointValue::Int(v)).unwrap();
            let raw = if call.service() == "turn_on" {
                json!("on")
            } else {
                json!("off")
            };
            assert_eq!(FanPoint::State.decode(Some(&raw)), Ok(PointValue::Int(v)));
        }
    }
}
