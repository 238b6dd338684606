// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Point registry: the mapping from local point names to remote entity
//! attributes.
//!
//! A registry is loaded once, validated completely, and never mutated
//! afterwards. Any invalid entry aborts the load; there is no partially
//! applied registry.
//!
//! # Examples
//!
//! ```
//! use hass_points::registry::Registry;
//!
//! let registry = Registry::from_json(r#"[
//!     {"Entity ID": "light.kitchen", "Entity Point": "state",
//!      "Volttron Point Name": "kitchen_light", "Writable": true, "Type": "int"},
//!     {"Entity ID": "light.kitchen", "Entity Point": "brightness",
//!      "Volttron Point Name": "light_brightness", "Writable": true, "Type": "int"}
//! ]"#).unwrap();
//!
//! assert_eq!(registry.len(), 2);
//! assert_eq!(registry.entities().count(), 1);
//! ```

mod entry;
mod point;

pub use entry::RegistryEntry;
pub use point::PointDefinition;

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use serde_json::Value;

use crate::adapter::{DeviceAdapter, ServiceCall};
use crate::entity::{EntityId, EntityState};
use crate::error::{ConfigError, DecodeError, EncodeError, Error, ValueError};
use crate::types::{PointType, PointValue};

/// A point definition bound to the adapter of its entity's domain.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundPoint {
    definition: PointDefinition,
    adapter: DeviceAdapter,
}

impl BoundPoint {
    /// Returns the point definition.
    #[must_use]
    pub fn definition(&self) -> &PointDefinition {
        &self.definition
    }

    /// Returns the bound adapter.
    #[must_use]
    pub fn adapter(&self) -> DeviceAdapter {
        self.adapter
    }

    /// Returns the local point name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.definition.point_name
    }

    /// Returns the raw remote value of this point in `state`.
    #[must_use]
    pub fn raw_value(&self, state: &EntityState) -> Option<Value> {
        state
            .attribute(&self.definition.entity_attribute)
            .or_else(|| {
                self.adapter
                    .fallback_attribute()
                    .and_then(|name| state.attribute(name))
            })
    }

    /// Decodes this point from an entity snapshot into its declared type.
    ///
    /// # Errors
    ///
    /// Returns `DecodeError` if the adapter rejects the raw value or the
    /// decoded value cannot be represented in the declared type.
    pub fn decode(&self, state: &EntityState) -> Result<PointValue, DecodeError> {
        let raw = self.raw_value(state);
        let value = self.adapter.decode(raw.as_ref())?;
        Ok(value.cast(self.definition.point_type)?)
    }

    /// Encodes a write to this point.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotWritable` if the point is read-only, and
    /// `Error::Encode` if the adapter rejects the value.
    pub fn encode(&self, value: &PointValue) -> Result<ServiceCall, Error> {
        if !self.definition.writable {
            return Err(Error::NotWritable(self.definition.point_name.clone()));
        }
        self.adapter.encode(value)
    }
}

/// The validated set of points of one driver instance.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    points: Vec<BoundPoint>,
    index: HashMap<String, usize>,
    /// Distinct entities in first-seen order, with the indices of their points.
    entities: Vec<(EntityId, Vec<usize>)>,
}

impl Registry {
    /// Builds a registry from parsed entries.
    ///
    /// Entries with an empty entity id are skipped. Point order follows
    /// entry order.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` on the first invalid entry: a duplicate point
    /// name, a malformed entity id or unsupported domain, an attribute the
    /// domain does not handle, an unknown declared type, a writable
    /// read-only attribute, or a starting value that does not fit the type.
    pub fn from_entries<I>(entries: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = RegistryEntry>,
    {
        let mut registry = Self::default();

        for entry in entries {
            if entry.entity_id.trim().is_empty() {
                tracing::debug!(point = %entry.point_name, "Skipping registry entry without entity id");
                continue;
            }

            let point = bind(entry)?;
            let position = registry.points.len();

            match registry.index.entry(point.definition.point_name.clone()) {
                Entry::Occupied(e) => return Err(ConfigError::DuplicatePoint(e.key().clone())),
                Entry::Vacant(e) => e.insert(position),
            };

            match registry
                .entities
                .iter_mut()
                .find(|(id, _)| *id == point.definition.entity_id)
            {
                Some((_, members)) => members.push(position),
                None => registry
                    .entities
                    .push((point.definition.entity_id.clone(), vec![position])),
            }

            registry.points.push(point);
        }

        tracing::debug!(
            points = registry.points.len(),
            entities = registry.entities.len(),
            "Loaded point registry"
        );

        Ok(registry)
    }

    /// Parses a registry from its JSON array form.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Json` if the document is not an array of
    /// records, or any error of [`from_entries`](Self::from_entries).
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let entries: Vec<RegistryEntry> = serde_json::from_str(json)?;
        Self::from_entries(entries)
    }

    /// Looks up a point by name.
    #[must_use]
    pub fn get(&self, point_name: &str) -> Option<&BoundPoint> {
        self.index.get(point_name).map(|&i| &self.points[i])
    }

    /// Iterates over all points in registry order.
    pub fn iter(&self) -> std::slice::Iter<'_, BoundPoint> {
        self.points.iter()
    }

    /// Iterates over the distinct entities with the points mapped onto each.
    pub fn entities(&self) -> impl Iterator<Item = (&EntityId, Vec<&BoundPoint>)> + '_ {
        self.entities.iter().map(|(id, members)| {
            (id, members.iter().map(|&i| &self.points[i]).collect())
        })
    }

    /// Returns the number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns `true` if the registry holds no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl<'a> IntoIterator for &'a Registry {
    type Item = &'a BoundPoint;
    type IntoIter = std::slice::Iter<'a, BoundPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Validates one entry and binds it to its adapter.
fn bind(entry: RegistryEntry) -> Result<BoundPoint, ConfigError> {
    let point_name = entry.point_name.trim().to_string();
    if point_name.is_empty() {
        return Err(ConfigError::MissingField("Volttron Point Name"));
    }

    let attribute = entry.entity_point.trim().to_string();
    if attribute.is_empty() {
        return Err(ConfigError::MissingField("Entity Point"));
    }

    let entity_id = EntityId::parse(&entry.entity_id)?;
    let adapter = DeviceAdapter::bind(entity_id.domain(), &attribute).ok_or_else(|| {
        ConfigError::UnsupportedAttribute {
            entity_id: entity_id.to_string(),
            attribute: attribute.clone(),
        }
    })?;

    let point_type = match entry.type_name.as_deref().map(str::trim) {
        None | Some("") => adapter.native_type(),
        Some(name) => name
            .parse::<PointType>()
            .map_err(|source| ConfigError::InvalidType {
                point: point_name.clone(),
                source,
            })?,
    };

    if !adapter.supports_type(point_type) {
        return Err(ConfigError::InvalidType {
            point: point_name,
            source: ValueError::IncompatibleType {
                attribute: adapter.attribute(),
                target: point_type.as_str(),
            },
        });
    }

    if entry.writable && !adapter.is_writable() {
        return Err(ConfigError::ReadOnlyAttribute {
            point: point_name,
            attribute,
        });
    }

    let starting_value = match &entry.starting_value {
        Some(raw) => starting_value(raw, point_type, adapter).map_err(|source| {
            ConfigError::InvalidStartingValue {
                point: point_name.clone(),
                source,
            }
        })?,
        None => None,
    };

    Ok(BoundPoint {
        definition: PointDefinition {
            entity_id,
            entity_attribute: attribute,
            point_name,
            writable: entry.writable,
            point_type,
            starting_value,
            units: entry.units,
            notes: entry.notes,
        },
        adapter,
    })
}

/// Converts a registry starting value into the declared type and checks
/// that the attribute could report it.
///
/// `null` and blank strings mean no starting value.
fn starting_value(
    raw: &Value,
    point_type: PointType,
    adapter: DeviceAdapter,
) -> Result<Option<PointValue>, EncodeError> {
    let value = match raw {
        Value::Null => return Ok(None),
        Value::String(s) if s.trim().is_empty() => return Ok(None),
        Value::String(s) => PointValue::parse(s, point_type)?,
        other => PointValue::from_json(other)
            .ok_or_else(|| ValueError::InvalidCast {
                value: other.to_string(),
                target: point_type.as_str(),
            })?
            .cast(point_type)?,
    };
    adapter.validate(&value)?;
    Ok(Some(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::{ClimatePoint, CoverPoint, LightPoint};

    fn entry(entity: &str, attribute: &str, name: &str) -> RegistryEntry {
        RegistryEntry::new(entity, attribute, name)
    }

    #[test]
    fn binds_points_to_domain_adapters() {
        let registry = Registry::from_entries([
            entry("light.kitchen", "brightness", "light_brightness").writable(),
            entry("climate.hallway", "current_temperature", "hallway_temp"),
            entry("cover.curtain", "position", "curtain_position").writable(),
        ])
        .unwrap();

        assert_eq!(
            registry.get("light_brightness").unwrap().adapter(),
            DeviceAdapter::Light(LightPoint::Brightness)
        );
        assert_eq!(
            registry.get("hallway_temp").unwrap().adapter(),
            DeviceAdapter::Climate(ClimatePoint::CurrentTemperature)
        );
        assert_eq!(
            registry.get("curtain_position").unwrap().adapter(),
            DeviceAdapter::Cover(CoverPoint::Position)
        );
        assert!(registry.get("missing").is_none());
    }

    #[test]
    fn duplicate_point_name_is_rejected() {
        let err = Registry::from_entries([
            entry("light.kitchen", "state", "kitchen"),
            entry("light.porch", "state", "kitchen"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::DuplicatePoint(ref name) if name == "kitchen"));
    }

    #[test]
    fn unknown_domain_is_rejected() {
        let err = Registry::from_entries([entry("switch.garage", "state", "garage")]).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownDomain { .. }));
    }

    #[test]
    fn unsupported_attribute_is_rejected() {
        let err =
            Registry::from_entries([entry("lock.front_door", "battery_level", "battery")])
                .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::UnsupportedAttribute { ref attribute, .. } if attribute == "battery_level"
        ));
    }

    #[test]
    fn unknown_type_is_rejected() {
        let err = Registry::from_entries([
            entry("fan.bedroom", "percentage", "fan_speed").with_type("double"),
        ])
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidType {
                source: ValueError::UnknownPointType(_),
                ..
            }
        ));
    }

    #[test]
    fn writable_read_only_attribute_is_rejected() {
        let err = Registry::from_entries([
            entry("climate.hallway", "current_temperature", "hallway_temp").writable(),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::ReadOnlyAttribute { .. }));
    }

    #[test]
    fn missing_point_name_is_rejected() {
        let err = Registry::from_entries([entry("light.kitchen", "state", " ")]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingField("Volttron Point Name")));
    }

    #[test]
    fn entries_without_entity_id_are_skipped() {
        let registry = Registry::from_entries([
            entry("", "state", "placeholder"),
            entry("fan.bedroom", "state", "fan_state"),
        ])
        .unwrap();
        assert_eq!(registry.len(), 1);
        assert!(registry.get("placeholder").is_none());
    }

    #[test]
    fn absent_type_uses_native_type() {
        let registry = Registry::from_entries([
            entry("light.kitchen", "state", "kitchen_on"),
            entry("climate.hallway", "temperature", "setpoint"),
        ])
        .unwrap();
        assert_eq!(
            registry.get("kitchen_on").unwrap().definition().point_type(),
            PointType::Boolean
        );
        assert_eq!(
            registry.get("setpoint").unwrap().definition().point_type(),
            PointType::Float
        );
    }

    #[test]
    fn starting_values_follow_declared_type() {
        let registry = Registry::from_entries([
            entry("fan.bedroom", "percentage", "fan_speed")
                .with_type("int")
                .with_starting_value("40"),
            entry("climate.hallway", "temperature", "setpoint")
                .with_type("float")
                .with_starting_value(70),
            entry("lock.front_door", "state", "door")
                .with_type("int")
                .with_starting_value(""),
        ])
        .unwrap();

        let starting = |name: &str| registry.get(name).unwrap().definition().starting_value().cloned();
        assert_eq!(starting("fan_speed"), Some(PointValue::Int(40)));
        assert_eq!(starting("setpoint"), Some(PointValue::Float(70.0)));
        assert_eq!(starting("door"), None);
    }

    #[test]
    fn invalid_starting_value_is_rejected() {
        let err = Registry::from_entries([
            entry("fan.bedroom", "percentage", "fan_speed")
                .with_type("int")
                .with_starting_value("fast"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidStartingValue { .. }));
    }

    #[test]
    fn declared_type_must_fit_the_attribute() {
        for (entity, attribute, type_name) in [
            ("fan.bedroom", "percentage", "boolean"),
            ("lock.front_door", "state", "string"),
            ("climate.hallway", "state", "bool"),
            ("climate.hallway", "temperature", "int"),
            ("light.kitchen", "state", "float"),
        ] {
            let err = Registry::from_entries([entry(entity, attribute, "point").with_type(type_name)])
                .unwrap_err();
            assert!(
                matches!(
                    err,
                    ConfigError::InvalidType {
                        source: ValueError::IncompatibleType { .. },
                        ..
                    }
                ),
                "{entity}.{attribute} as {type_name}"
            );
        }
    }

    #[test]
    fn published_value_writes_back_in_declared_type() {
        let registry = Registry::from_entries([
            entry("light.kitchen", "brightness", "level")
                .writable()
                .with_type("float"),
            entry("lock.front_door", "state", "door")
                .writable()
                .with_type("boolean"),
            entry("light.kitchen", "state", "lamp").writable().with_type("int"),
        ])
        .unwrap();

        let light = EntityState::new("light.kitchen", "on").with_attribute("brightness", 128);
        let lock = EntityState::new("lock.front_door", "locked");

        let level = registry.get("level").unwrap();
        let published = level.decode(&light).unwrap();
        assert_eq!(published, PointValue::Float(128.0));
        let call = level.encode(&published).unwrap();
        assert_eq!(call.field("brightness"), Some(&serde_json::json!(128)));

        let door = registry.get("door").unwrap();
        let published = door.decode(&lock).unwrap();
        assert_eq!(published, PointValue::Bool(true));
        assert_eq!(door.encode(&published).unwrap().service(), "lock");

        let lamp = registry.get("lamp").unwrap();
        let published = lamp.decode(&light).unwrap();
        assert_eq!(published, PointValue::Int(1));
        assert_eq!(lamp.encode(&published).unwrap().service(), "turn_on");
    }

    #[test]
    fn starting_value_must_be_in_range() {
        let err = Registry::from_entries([
            entry("light.kitchen", "brightness", "level")
                .writable()
                .with_type("float")
                .with_starting_value(300),
        ])
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidStartingValue {
                source: EncodeError::Value(ValueError::OutOfRange { actual: 300, .. }),
                ..
            }
        ));

        // Clamped on write, but never reported by the remote side.
        let err = Registry::from_entries([
            entry("cover.curtain", "position", "curtain").with_starting_value(150),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidStartingValue { .. }));

        let err = Registry::from_entries([
            entry("climate.hallway", "state", "mode").with_starting_value(1),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidStartingValue { .. }));
    }

    #[test]
    fn read_only_starting_value_is_checked() {
        let registry = Registry::from_entries([entry(
            "climate.hallway",
            "current_temperature",
            "hallway_temp",
        )
        .with_starting_value("68.5")])
        .unwrap();
        assert_eq!(
            registry
                .get("hallway_temp")
                .unwrap()
                .definition()
                .starting_value(),
            Some(&PointValue::Float(68.5))
        );

        let err = Registry::from_entries([entry(
            "climate.hallway",
            "current_temperature",
            "hallway_temp",
        )
        .with_type("string")
        .with_starting_value("warm")])
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidType { .. }));
    }

    #[test]
    fn entities_group_points_in_first_seen_order() {
        let registry = Registry::from_entries([
            entry("light.kitchen", "state", "kitchen_on"),
            entry("lock.front_door", "state", "door"),
            entry("light.kitchen", "brightness", "kitchen_level"),
        ])
        .unwrap();

        let groups: Vec<(String, Vec<String>)> = registry
            .entities()
            .map(|(id, points)| {
                (
                    id.to_string(),
                    points.iter().map(|p| p.name().to_string()).collect(),
                )
            })
            .collect();

        assert_eq!(
            groups,
            vec![
                (
                    "light.kitchen".to_string(),
                    vec!["kitchen_on".to_string(), "kitchen_level".to_string()]
                ),
                ("lock.front_door".to_string(), vec!["door".to_string()]),
            ]
        );
        let names: Vec<&str> = registry.iter().map(BoundPoint::name).collect();
        assert_eq!(names, ["kitchen_on", "door", "kitchen_level"]);
    }

    #[test]
    fn decode_casts_to_declared_type() {
        let registry = Registry::from_entries([
            entry("light.kitchen", "state", "kitchen_on").with_type("int"),
        ])
        .unwrap();
        let point = registry.get("kitchen_on").unwrap();
        let state = EntityState::new("light.kitchen", "on");
        assert_eq!(point.decode(&state), Ok(PointValue::Int(1)));
    }

    #[test]
    fn cover_position_falls_back_to_current_position() {
        let registry =
            Registry::from_entries([entry("cover.curtain", "position", "curtain_position")])
                .unwrap();
        let point = registry.get("curtain_position").unwrap();
        let state = EntityState::new("cover.curtain", "open").with_attribute("current_position", 57);
        assert_eq!(point.decode(&state), Ok(PointValue::Int(57)));
    }

    #[test]
    fn encode_read_only_point_is_not_writable() {
        let registry =
            Registry::from_entries([entry("lock.front_door", "state", "door")]).unwrap();
        let err = registry
            .get("door")
            .unwrap()
            .encode(&PointValue::Int(1))
            .unwrap_err();
        assert!(matches!(err, Error::NotWritable(ref p) if p == "door"));
    }

    #[test]
    fn from_json_reports_parse_errors() {
        assert!(matches!(
            Registry::from_json("{not json"),
            Err(ConfigError::Json(_))
        ));
    }
}
