// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Home Assistant service calls.

use std::fmt;

use serde_json::{Map, Value};

use crate::entity::Domain;

/// A service invocation produced by encoding a point write.
///
/// A service call consists of:
/// - the domain and service name, which select the REST endpoint
///   `POST /api/services/<domain>/<service>`
/// - optional data fields, sent alongside the target `entity_id`
///
/// # Examples
///
/// ```
/// use hass_points::adapter::ServiceCall;
/// use hass_points::entity::Domain;
///
/// let call = ServiceCall::new(Domain::Light, "turn_on").with_field("brightness", 128);
/// assert_eq!(call.path(), "/api/services/light/turn_on");
/// assert_eq!(
///     call.body("light.kitchen"),
///     serde_json::json!({"entity_id": "light.kitchen", "brightness": 128})
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceCall {
    domain: Domain,
    service: &'static str,
    data: Map<String, Value>,
}

impl ServiceCall {
    /// Creates a service call without data fields.
    #[must_use]
    pub fn new(domain: Domain, service: &'static str) -> Self {
        Self {
            domain,
            service,
            data: Map::new(),
        }
    }

    /// Adds a data field.
    #[must_use]
    pub fn with_field(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.data.insert(name.to_string(), value.into());
        self
    }

    /// Returns the service domain.
    #[must_use]
    pub const fn domain(&self) -> Domain {
        self.domain
    }

    /// Returns the service name, e.g. `"turn_on"`.
    #[must_use]
    pub const fn service(&self) -> &'static str {
        self.service
    }

    /// Returns the data fields, excluding the target entity.
    #[must_use]
    pub fn data(&self) -> &Map<String, Value> {
        &self.data
    }

    /// Returns a data field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.data.get(name)
    }

    /// Returns the REST path of the service endpoint.
    #[must_use]
    pub fn path(&self) -> String {
        format!("/api/services/{}/{}", self.domain, self.service)
    }

    /// Builds the JSON request body targeting `entity_id`.
    #[must_use]
    pub fn body(&self, entity_id: &str) -> Value {
        let mut body = Map::with_capacity(self.data.len() + 1);
        body.insert("entity_id".to_string(), Value::from(entity_id));
        body.extend(self.data.clone());
        Value::Object(body)
    }
}

impl fmt::Display for ServiceCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.domain, self.service)?;
        if !self.data.is_empty() {
            write!(f, " {}", Value::Object(self.data.clone()))?;
        }
        Ok(())
    }
}
