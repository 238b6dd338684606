// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Raw registry records as stored in the registry JSON file.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One record of a registry file.
///
/// Registry files are JSON arrays of objects like:
///
/// ```json
/// {
///   "Entity ID": "light.kitchen",
///   "Entity Point": "brightness",
///   "Volttron Point Name": "light_brightness",
///   "Units": "int",
///   "Units Details": "light level",
///   "Writable": true,
///   "Starting Value": 0,
///   "Type": "int",
///   "Notes": "brightness control, 0 - 255"
/// }
/// ```
///
/// Unknown keys are ignored. Validation happens when the entries are
/// loaded into a [`Registry`](super::Registry).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegistryEntry {
    /// Remote entity id, `<domain>.<object_id>`.
    #[serde(rename = "Entity ID", default)]
    pub entity_id: String,

    /// Entity attribute, or `state` for the primary state.
    #[serde(rename = "Entity Point", default)]
    pub entity_point: String,

    /// Local point name.
    #[serde(rename = "Volttron Point Name", default)]
    pub point_name: String,

    /// Whether the point accepts writes. Accepts booleans and
    /// `"TRUE"`/`"FALSE"` strings; anything else means read-only.
    #[serde(rename = "Writable", default, deserialize_with = "lenient_bool")]
    pub writable: bool,

    /// Declared type name. Absent means the type the attribute decodes to.
    #[serde(rename = "Type", default)]
    pub type_name: Option<String>,

    /// Engineering units, informational.
    #[serde(rename = "Units", default)]
    pub units: Option<String>,

    /// Value reported before the first successful scrape.
    #[serde(rename = "Starting Value", default)]
    pub starting_value: Option<Value>,

    /// Free-form notes.
    #[serde(rename = "Notes", default)]
    pub notes: Option<String>,
}

impl RegistryEntry {
    /// Creates an entry for a read-only point without a declared type.
    #[must_use]
    pub fn new(
        entity_id: impl Into<String>,
        entity_point: impl Into<String>,
        point_name: impl Into<String>,
    ) -> Self {
        Self {
            entity_id: entity_id.into(),
            entity_point: entity_point.into(),
            point_name: point_name.into(),
            ..Self::default()
        }
    }

    /// Marks the point writable.
    #[must_use]
    pub fn writable(mut self) -> Self {
        self.writable = true;
        self
    }

    /// Sets the declared type name.
    #[must_use]
    pub fn with_type(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = Some(type_name.into());
        self
    }

    /// Sets the starting value.
    #[must_use]
    pub fn with_starting_value(mut self, value: impl Into<Value>) -> Self {
        self.starting_value = Some(value.into());
        self
    }
}

fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
        Other(serde::de::IgnoredAny),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => b,
        Flag::Text(s) => s.trim().eq_ignore_ascii_case("true"),
        Flag::Other(_) => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_entry() {
        let json = r#"{
            "Entity ID": "climate.hallway",
            "Entity Point": "temperature",
            "Volttron Point Name": "thermostat_setpoint",
            "Units": "F",
            "Writable": true,
            "Starting Value": 70,
            "Type": "float",
            "Notes": "target temperature"
        }"#;

        let entry: RegistryEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.entity_id, "climate.hallway");
        assert_eq!(entry.entity_point, "temperature");
        assert_eq!(entry.point_name, "thermostat_setpoint");
        assert!(entry.writable);
        assert_eq!(entry.type_name.as_deref(), Some("float"));
        assert_eq!(entry.units.as_deref(), Some("F"));
        assert_eq!(entry.starting_value, Some(serde_json::json!(70)));
    }

    #[test]
    fn writable_accepts_strings() {
        for (flag, expected) in [
            (r#""TRUE""#, true),
            (r#""true""#, true),
            (r#""FALSE""#, false),
            (r#""""#, false),
            ("1", false),
        ] {
            let json = format!(r#"{{"Entity ID": "fan.a", "Writable": {flag}}}"#);
            let entry: RegistryEntry = serde_json::from_str(&json).unwrap();
            assert_eq!(entry.writable, expected, "{flag}");
        }
    }

    #[test]
    fn missing_fields_default() {
        let entry: RegistryEntry = serde_json::from_str("{}").unwrap();
        assert_eq!(entry, RegistryEntry::default());
        assert!(!entry.writable);
    }

    #[test]
    fn builder() {
        let entry = RegistryEntry::new("lock.front_door", "state", "front_door_lock_state")
            .writable()
            .with_type("int")
            .with_starting_value(1);
        assert!(entry.writable);
        assert_eq!(entry.type_name.as_deref(), Some("int"));
        assert_eq!(entry.starting_value, Some(serde_json::json!(1)));
    }
}
