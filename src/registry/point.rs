// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Validated point definitions.

use crate::entity::EntityId;
use crate::types::{PointType, PointValue};

/// An immutable, validated registry record.
#[derive(Debug, Clone, PartialEq)]
pub struct PointDefinition {
    pub(super) entity_id: EntityId,
    pub(super) entity_attribute: String,
    pub(super) point_name: String,
    pub(super) writable: bool,
    pub(super) point_type: PointType,
    pub(super) starting_value: Option<PointValue>,
    pub(super) units: Option<String>,
    pub(super) notes: Option<String>,
}

impl PointDefinition {
    /// Returns the remote entity id.
    #[must_use]
    pub fn entity_id(&self) -> &EntityId {
        &self.entity_id
    }

    /// Returns the remote attribute name, exactly as configured.
    #[must_use]
    pub fn entity_attribute(&self) -> &str {
        &self.entity_attribute
    }

    /// Returns the local point name.
    #[must_use]
    pub fn point_name(&self) -> &str {
        &self.point_name
    }

    /// Returns `true` if the point accepts writes.
    #[must_use]
    pub fn writable(&self) -> bool {
        self.writable
    }

    /// Returns the declared type.
    #[must_use]
    pub fn point_type(&self) -> PointType {
        self.point_type
    }

    /// Returns the starting value, already converted to the declared type.
    #[must_use]
    pub fn starting_value(&self) -> Option<&PointValue> {
        self.starting_value.as_ref()
    }

    /// Returns the configured units.
    #[must_use]
    pub fn units(&self) -> Option<&str> {
        self.units.as_deref()
    }

    /// Returns the configured notes.
    #[must_use]
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }
}
