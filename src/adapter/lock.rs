// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Lock adapter.

use serde_json::Value;

use super::{ServiceCall, binary_command, state_str};
use crate::entity::Domain;
use crate::error::{DecodeError, EncodeError};
use crate::types::PointValue;

const LOCK_KEYWORDS: [&str; 2] = ["lock", "locked"];
const UNLOCK_KEYWORDS: [&str; 2] = ["unlock", "unlocked"];

/// Attributes of a `lock.*` entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LockPoint {
    /// Locked (1) or unlocked (0).
    State,
}

impl LockPoint {
    pub(super) fn from_name(name: &str) -> Option<Self> {
        (name == "state").then_some(Self::State)
    }

    /// Returns the canonical attribute name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::State => "state",
        }
    }

    /// Transitional states such as `locking` or `jammed` are not 0 or 1 and
    /// therefore fail to decode.
    pub(super) fn decode(self, raw: Option<&Value>) -> Result<PointValue, DecodeError> {
        match state_str(raw)? {
            "locked" => Ok(PointValue::Int(1)),
            "unlocked" => Ok(PointValue::Int(0)),
            other => Err(DecodeError::UnrecognizedState(other.to_string())),
        }
    }

    pub(super) fn encode(self, value: &PointValue) -> Result<ServiceCall, EncodeError> {
        let service = if binary_command(value, &LOCK_KEYWORDS, &UNLOCK_KEYWORDS)? {
            "lock"
        } else {
            "unlock"
        };
        Ok(ServiceCall::new(Domain::Lock, service))
    }
}
