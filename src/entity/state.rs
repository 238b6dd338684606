// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Entity state snapshots as returned by `GET /api/states/<entity_id>`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The attribute name that refers to the entity's primary state string
/// rather than to an entry of its attribute map.
const STATE_ATTRIBUTE: &str = "state";

/// Snapshot of one remote entity.
///
/// Home Assistant returns states in JSON format like:
///
/// ```json
/// {
///   "entity_id": "light.kitchen",
///   "state": "on",
///   "attributes": {"brightness": 128, "friendly_name": "Kitchen"},
///   "last_changed": "2024-05-01T12:00:00.000000+00:00",
///   "last_updated": "2024-05-01T12:00:00.000000+00:00"
/// }
/// ```
///
/// A snapshot is only valid for the scrape that fetched it.
///
/// # Examples
///
/// ```
/// use hass_points::entity::EntityState;
///
/// let json = r#"{"entity_id": "light.kitchen", "state": "on", "attributes": {"brightness": 128}}"#;
/// let state: EntityState = serde_json::from_str(json).unwrap();
/// assert_eq!(state.state(), "on");
/// assert_eq!(state.attribute("brightness"), Some(serde_json::json!(128)));
/// assert_eq!(state.attribute("state"), Some(serde_json::json!("on")));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityState {
    entity_id: String,
    state: String,
    #[serde(default)]
    attributes: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    last_changed: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    last_updated: Option<DateTime<Utc>>,
}

impl EntityState {
    /// Creates a snapshot with the given primary state and no attributes.
    #[must_use]
    pub fn new(entity_id: impl Into<String>, state: impl Into<String>) -> Self {
        Self {
            entity_id: entity_id.into(),
            state: state.into(),
            attributes: Map::new(),
            last_changed: None,
            last_updated: None,
        }
    }

    /// Adds an attribute to the snapshot.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Returns the entity id.
    #[must_use]
    pub fn entity_id(&self) -> &str {
        &self.entity_id
    }

    /// Returns the primary state string (e.g. `"on"`, `"locked"`, `"heat"`).
    #[must_use]
    pub fn state(&self) -> &str {
        &self.state
    }

    /// Returns the attribute map.
    #[must_use]
    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    /// Returns the raw value of a named entity point.
    ///
    /// `"state"` resolves to the primary state string; every other name is
    /// looked up in the attribute map.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<Value> {
        if name == STATE_ATTRIBUTE {
            Some(Value::String(self.state.clone()))
        } else {
            self.attributes.get(name).cloned()
        }
    }

    /// Returns when the entity state was last updated, if reported.
    #[must_use]
    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.last_updated
    }

    /// Returns when the primary state last changed, if reported.
    #[must_use]
    pub fn last_changed(&self) -> Option<DateTime<Utc>> {
        self.last_changed
    }
}
