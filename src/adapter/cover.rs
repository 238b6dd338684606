// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Cover adapter for motorized curtains and blinds.

use serde_json::Value;

use super::{ServiceCall, binary_command, integer, level, state_str};
use crate::entity::Domain;
use crate::error::{DecodeError, EncodeError};
use crate::types::{Percentage, PointValue};

const OPEN_KEYWORDS: [&str; 2] = ["open", "opened"];
const CLOSE_KEYWORDS: [&str; 2] = ["close", "closed"];

/// Attributes of a `cover.*` entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoverPoint {
    /// Open (1) or closed (0).
    State,
    /// Position as a percentage, 100 being fully open. Also bound from
    /// `current_position` and `percentage`.
    Position,
}

impl CoverPoint {
    pub(super) fn from_name(name: &str) -> Option<Self> {
        match name {
            "state" => Some(Self::State),
            "position" | "current_position" | "percentage" => Some(Self::Position),
            _ => None,
        }
    }

    /// Returns the canonical attribute name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::State => "state",
            Self::Position => "position",
        }
    }

    /// `opening` and `closing` are neither 0 nor 1 and fail to decode.
    pub(super) fn decode(self, raw: Option<&Value>) -> Result<PointValue, DecodeError> {
        match self {
            Self::State => match state_str(raw)? {
                "open" => Ok(PointValue::Int(1)),
                "closed" => Ok(PointValue::Int(0)),
                other => Err(DecodeError::UnrecognizedState(other.to_string())),
            },
            Self::Position => {
                let position = Percentage::new(level(raw)?)?;
                Ok(PointValue::Int(i64::from(position.value())))
            }
        }
    }

    pub(super) fn encode(self, value: &PointValue) -> Result<ServiceCall, EncodeError> {
        match self {
            Self::State => {
                let service = if binary_command(value, &OPEN_KEYWORDS, &CLOSE_KEYWORDS)? {
                    "open_cover"
                } else {
                    "close_cover"
                };
                Ok(ServiceCall::new(Domain::Cover, service))
            }
            Self::Position => {
                let position = Percentage::clamped(integer(value)?);
                Ok(ServiceCall::new(Domain::Cover, "set_cover_position")
                    .with_field("position", position.value()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decode_state() {
        assert_eq!(CoverPoint::State.decode(Some(&json!("open"))), Ok(PointValue::Int(1)));
        assert_eq!(
            CoverPoint::State.decode(Some(&json!("closed"))),
            Ok(PointValue::Int(0))
        );
        for moving in ["opening", "closing"] {
            assert_eq!(
                CoverPoint::State.decode(Some(&json!(moving))),
                Err(DecodeError::UnrecognizedState(moving.to_string()))
            );
        }
    }

    #[test]
    fn decode_position() {
        assert_eq!(
            CoverPoint::Position.decode(Some(&json!(57))),
            Ok(PointValue::Int(57))
        );
        assert!(CoverPoint::Position.decode(Some(&json!(-1))).is_err());
    }

    #[test]
    fn encode_state() {
        assert_eq!(
            CoverPoint::State.encode(&PointValue::Int(1)).unwrap().service(),
            "open_cover"
        );
        assert_eq!(
            CoverPoint::State.encode(&PointValue::from("Closed")).unwrap().service(),
            "close_cover"
        );
        assert!(CoverPoint::State.encode(&PointValue::Int(5)).is_err());
        assert!(CoverPoint::State.encode(&PointValue::from("on")).is_err());
    }

    #[test]
    fn position_write_is_clamped() {
        let call = CoverPoint::Position.encode(&PointValue::Int(150)).unwrap();
        assert_eq!(call.path(), "/api/services/cover/set_cover_position");
        assert_eq!(call.field("position"), Some(&json!(100)));

        let call = CoverPoint::Position.encode(&PointValue::Int(-20)).unwrap();
        assert_eq!(call.field("position"), Some(&json!(0)));
    }

    #[test]
    fn round_trip() {
        for v in 0..=100 {
            let call = CoverPoint::Position.encode(&PointValue::Int(v)).unwrap();
            let raw = call.field("position").cloned().unwrap();
            assert_eq!(CoverPoint::Position.decode(Some(&raw)), Ok(PointValue::Int(v)));
        }
        for v in [0, 1] {
            let call = CoverPoint::State.encode(&PointValue::Int(v)).unwrap();
            let raw = if call.service() == "open_cover" {
                json!("open")
            } else {
                json!("closed")
            };
            assert_eq!(CoverPoint::State.decode(Some(&raw)), Ok(PointValue::Int(v)));
        }
    }
}
