// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scrape and write orchestration.
//!
//! A [`Driver`] owns a validated [`Registry`] and a [`Gateway`]. On each
//! scrape it fetches every distinct entity once and decodes all of that
//! entity's points from the same snapshot. Failures are isolated: one entity
//! that cannot be fetched, or one point that cannot be decoded, never aborts
//! the rest of the scrape.
//!
//! Writes are checked locally (unknown point, read-only point, value out of
//! the domain's range) before anything is sent, and remote failures are
//! returned unchanged. Retrying is left to the caller.

mod report;

pub use report::{PointReading, PointStatus, ScrapeReport};

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use crate::error::{Error, RemoteError, Result};
use crate::gateway::{Acknowledgement, Gateway};
use crate::registry::{BoundPoint, Registry};
use crate::types::PointValue;

#[cfg(feature = "http")]
use crate::config::DriverConfig;
#[cfg(feature = "http")]
use crate::gateway::HttpGateway;

/// Last successfully decoded value of a point.
#[derive(Debug, Clone)]
struct Sample {
    value: PointValue,
    observed_at: Option<DateTime<Utc>>,
}

/// Point driver for one Home Assistant instance.
///
/// # Examples
///
/// ```no_run
/// use hass_points::config::DriverConfig;
/// use hass_points::driver::Driver;
/// use hass_points::types::PointValue;
///
/// # async fn example(config_json: &str, registry_json: &str) -> hass_points::Result<()> {
/// let config = DriverConfig::from_json(config_json)?;
/// let driver = Driver::from_config(&config, registry_json)?;
///
/// let report = driver.scrape().await;
/// for (point, value) in report.published() {
///     println!("{point} = {value}");
/// }
///
/// driver.set_point("light_brightness", PointValue::Int(128)).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Driver<G> {
    gateway: G,
    registry: Registry,
    last_good: RwLock<HashMap<String, Sample>>,
}

impl<G: Gateway> Driver<G> {
    /// Creates a driver over a gateway and a validated registry.
    #[must_use]
    pub fn new(gateway: G, registry: Registry) -> Self {
        Self {
            gateway,
            registry,
            last_good: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the registry.
    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Returns the gateway.
    #[must_use]
    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Reads every point of the registry.
    ///
    /// Each distinct entity is fetched once per scrape. The report holds one
    /// reading per point; see [`PointStatus`] for how failures are reported.
    pub async fn scrape(&self) -> ScrapeReport {
        let mut report = ScrapeReport::default();

        for (entity_id, points) in self.registry.entities() {
            match self.gateway.fetch_state(entity_id.as_str()).await {
                Ok(state) => {
                    let observed_at = state.last_updated();
                    for point in points {
                        let reading = match point.decode(&state) {
                            Ok(value) => {
                                self.remember(point.name(), &value, observed_at);
                                PointReading {
                                    value: Some(value),
                                    status: PointStatus::Fresh,
                                    observed_at,
                                }
                            }
                            Err(e) => {
                                tracing::error!(
                                    entity_id = %entity_id,
                                    point = %point.name(),
                                    error = %e,
                                    "Failed to decode point"
                                );
                                PointReading {
                                    value: None,
                                    status: PointStatus::DecodeFailed(e),
                                    observed_at,
                                }
                            }
                        };
                        report.readings.insert(point.name().to_string(), reading);
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        entity_id = %entity_id,
                        error = %e,
                        points = points.len(),
                        "Failed to fetch entity state"
                    );
                    for point in points {
                        let reading = self.fallback(point, e.clone());
                        report.readings.insert(point.name().to_string(), reading);
                    }
                }
            }
        }

        tracing::debug!(
            points = report.len(),
            complete = report.is_complete(),
            "Scrape finished"
        );

        report
    }

    /// Reads a single point.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownPoint` if the point is not in the registry,
    /// `Error::Remote` if its entity cannot be fetched and `Error::Decode`
    /// if the value cannot be decoded.
    pub async fn get_point(&self, point_name: &str) -> Result<PointValue> {
        let point = self.point(point_name)?;
        let entity_id = point.definition().entity_id().as_str();

        let state = self.gateway.fetch_state(entity_id).await?;
        let value = point.decode(&state)?;
        self.remember(point.name(), &value, state.last_updated());

        Ok(value)
    }

    /// Writes a point.
    ///
    /// The value is validated and encoded before any remote call. A
    /// read-only point never reaches the gateway.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownPoint`, `Error::NotWritable` or
    /// `Error::Encode` without contacting the remote system, and
    /// `Error::Remote` if the service call fails.
    pub async fn set_point(&self, point_name: &str, value: PointValue) -> Result<Acknowledgement> {
        let point = self.point(point_name)?;
        let entity_id = point.definition().entity_id().as_str();

        let call = point.encode(&value).inspect_err(|e| {
            tracing::debug!(point = %point_name, value = %value, error = %e, "Rejected write");
        })?;

        tracing::debug!(point = %point_name, entity_id = %entity_id, call = %call, "Writing point");

        let ack = self.gateway.call_service(&call, entity_id).await?;

        tracing::info!(point = %point_name, entity_id = %entity_id, value = %value, "Point written");

        // Adopt the new state when the remote reports it back.
        if let Some(state) = ack.state_of(entity_id)
            && let Ok(decoded) = point.decode(state)
        {
            self.remember(point.name(), &decoded, state.last_updated());
        }

        Ok(ack)
    }

    /// Writes the starting value of a point back.
    ///
    /// # Errors
    ///
    /// Returns `Error::NoStartingValue` if the point declares none, and any
    /// error of [`set_point`](Self::set_point).
    pub async fn revert_point(&self, point_name: &str) -> Result<Acknowledgement> {
        let value = self
            .point(point_name)?
            .definition()
            .starting_value()
            .cloned()
            .ok_or_else(|| Error::NoStartingValue(point_name.to_string()))?;

        tracing::debug!(point = %point_name, value = %value, "Reverting point");

        self.set_point(point_name, value).await
    }

    /// Returns the last successfully read value of a point, if any.
    #[must_use]
    pub fn last_value(&self, point_name: &str) -> Option<PointValue> {
        self.last_good
            .read()
            .get(point_name)
            .map(|sample| sample.value.clone())
    }

    fn point(&self, point_name: &str) -> Result<&BoundPoint> {
        self.registry
            .get(point_name)
            .ok_or_else(|| Error::UnknownPoint(point_name.to_string()))
    }

    fn remember(&self, point_name: &str, value: &PointValue, observed_at: Option<DateTime<Utc>>) {
        self.last_good.write().insert(
            point_name.to_string(),
            Sample {
                value: value.clone(),
                observed_at,
            },
        );
    }

    /// Builds the reading of a point whose entity could not be fetched.
    fn fallback(&self, point: &BoundPoint, error: RemoteError) -> PointReading {
        if let Some(sample) = self.last_good.read().get(point.name()) {
            return PointReading {
                value: Some(sample.value.clone()),
                status: PointStatus::Stale(error),
                observed_at: sample.observed_at,
            };
        }

        match point.definition().starting_value() {
            Some(value) => PointReading {
                value: Some(value.clone()),
                status: PointStatus::Stale(error),
                observed_at: None,
            },
            None => PointReading {
                value: None,
                status: PointStatus::Unavailable(error),
                observed_at: None,
            },
        }
    }
}

#[cfg(feature = "http")]
impl Driver<HttpGateway> {
    /// Builds an HTTP driver from a configuration record and a registry.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if either input is invalid and `Error::Remote`
    /// if the HTTP client cannot be created.
    pub fn from_config(config: &DriverConfig, registry_json: &str) -> Result<Self> {
        config.validate()?;
        let registry = Registry::from_json(registry_json)?;
        let gateway = config.gateway_config()?.into_gateway()?;

        tracing::info!(
            base_url = %gateway.base_url(),
            points = registry.len(),
            "Home Assistant driver configured"
        );

        Ok(Self::new(gateway, registry))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use parking_lot::Mutex;

    use crate::adapter::ServiceCall;
    use crate::entity::EntityState;
    use crate::error::{DecodeError, EncodeError, ValueError};
    use crate::registry::RegistryEntry;

    #[derive(Default)]
    struct MockGateway {
        states: Mutex<HashMap<String, std::result::Result<EntityState, RemoteError>>>,
        fetches: Mutex<Vec<String>>,
        calls: Mutex<Vec<(ServiceCall, String)>>,
    }

    impl MockGateway {
        fn set(&self, state: EntityState) {
            self.states
                .lock()
                .insert(state.entity_id().to_string(), Ok(state));
        }

        fn fail(&self, entity_id: &str, error: RemoteError) {
            self.states.lock().insert(entity_id.to_string(), Err(error));
        }
    }

    impl Gateway for MockGateway {
        async fn fetch_state(
            &self,
            entity_id: &str,
        ) -> std::result::Result<EntityState, RemoteError> {
            self.fetches.lock().push(entity_id.to_string());
            self.states
                .lock()
                .get(entity_id)
                .cloned()
                .unwrap_or_else(|| Err(RemoteError::NotFound(entity_id.to_string())))
        }

        async fn call_service(
            &self,
            call: &ServiceCall,
            entity_id: &str,
        ) -> std::result::Result<Acknowledgement, RemoteError> {
            self.calls.lock().push((call.clone(), entity_id.to_string()));
            Ok(Acknowledgement::default())
        }
    }

    fn registry() -> Registry {
        Registry::from_entries([
            RegistryEntry::new("light.kitchen", "state", "kitchen_on")
                .writable()
                .with_type("int"),
            RegistryEntry::new("light.kitchen", "brightness", "light_brightness")
                .writable()
                .with_type("int"),
            RegistryEntry::new("lock.front_door", "state", "front_door_lock_state")
                .writable()
                .with_type("int"),
            RegistryEntry::new("climate.hallway", "current_temperature", "hallway_temp")
                .with_type("float"),
            RegistryEntry::new("climate.hallway", "state", "hallway_mode")
                .writable()
                .with_type("int")
                .with_starting_value(0),
        ])
        .unwrap()
    }

    fn driver() -> Driver<MockGateway> {
        let gateway = MockGateway::default();
        gateway.set(EntityState::new("light.kitchen", "on").with_attribute("brightness", 128));
        gateway.set(EntityState::new("lock.front_door", "locked"));
        gateway.set(
            EntityState::new("climate.hallway", "cool").with_attribute("current_temperature", 71.5),
        );
        Driver::new(gateway, registry())
    }

    #[tokio::test]
    async fn scrape_fetches_each_entity_once() {
        let driver = driver();
        let report = driver.scrape().await;

        assert!(report.is_complete());
        let published = report.published();
        assert_eq!(published["kitchen_on"], PointValue::Int(1));
        assert_eq!(published["light_brightness"], PointValue::Int(128));
        assert_eq!(published["front_door_lock_state"], PointValue::Int(1));
        assert_eq!(published["hallway_temp"], PointValue::Float(71.5));
        assert_eq!(published["hallway_mode"], PointValue::Int(3));

        let fetches = driver.gateway().fetches.lock().clone();
        assert_eq!(
            fetches,
            ["light.kitchen", "lock.front_door", "climate.hallway"]
        );
    }

    #[tokio::test]
    async fn decode_failure_is_isolated_to_its_point() {
        let driver = driver();
        driver
            .gateway()
            .set(EntityState::new("lock.front_door", "jammed"));

        let report = driver.scrape().await;
        assert!(matches!(
            report.get("front_door_lock_state").unwrap().status(),
            PointStatus::DecodeFailed(DecodeError::UnrecognizedState(_))
        ));
        assert!(report.get("light_brightness").unwrap().is_fresh());
        assert!(report.get("hallway_temp").unwrap().is_fresh());
    }

    #[tokio::test]
    async fn fetch_failure_falls_back_to_last_good_value() {
        let driver = driver();
        driver.scrape().await;

        driver.gateway().fail(
            "light.kitchen",
            RemoteError::Unavailable("connection refused".to_string()),
        );
        let report = driver.scrape().await;

        let reading = report.get("light_brightness").unwrap();
        assert_eq!(reading.value(), Some(&PointValue::Int(128)));
        assert!(matches!(
            reading.status(),
            PointStatus::Stale(RemoteError::Unavailable(_))
        ));
        assert!(report.get("front_door_lock_state").unwrap().is_fresh());
        assert!(!report.is_complete());
    }

    #[tokio::test]
    async fn fetch_failure_without_history_uses_starting_value_or_nothing() {
        let driver = driver();
        driver.gateway().fail(
            "climate.hallway",
            RemoteError::Unavailable("timeout".to_string()),
        );

        let report = driver.scrape().await;

        let mode = report.get("hallway_mode").unwrap();
        assert_eq!(mode.value(), Some(&PointValue::Int(0)));
        assert!(matches!(mode.status(), PointStatus::Stale(_)));

        let temp = report.get("hallway_temp").unwrap();
        assert_eq!(temp.value(), None);
        assert!(matches!(temp.status(), PointStatus::Unavailable(_)));
        assert!(!report.published().contains_key("hallway_temp"));
    }

    #[tokio::test]
    async fn get_point_reads_one_point() {
        let driver = driver();
        assert_eq!(
            driver.get_point("light_brightness").await.unwrap(),
            PointValue::Int(128)
        );
        assert_eq!(driver.last_value("light_brightness"), Some(PointValue::Int(128)));
        assert!(matches!(
            driver.get_point("nope").await,
            Err(Error::UnknownPoint(_))
        ));
    }

    #[tokio::test]
    async fn get_point_propagates_not_found() {
        let driver = driver();
        driver.gateway().fail(
            "lock.front_door",
            RemoteError::NotFound("lock.front_door".to_string()),
        );
        assert!(matches!(
            driver.get_point("front_door_lock_state").await,
            Err(Error::Remote(RemoteError::NotFound(_)))
        ));
    }

    #[tokio::test]
    async fn set_point_sends_encoded_call() {
        let driver = driver();
        driver
            .set_point("light_brightness", PointValue::Int(200))
            .await
            .unwrap();

        let calls = driver.gateway().calls.lock().clone();
        assert_eq!(calls.len(), 1);
        let (call, entity_id) = &calls[0];
        assert_eq!(entity_id, "light.kitchen");
        assert_eq!(call.service(), "turn_on");
        assert_eq!(call.field("brightness"), Some(&serde_json::json!(200)));
    }

    #[tokio::test]
    async fn out_of_range_write_never_reaches_gateway() {
        let driver = driver();
        let err = driver
            .set_point("light_brightness", PointValue::Int(300))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Encode(EncodeError::Value(ValueError::OutOfRange { actual: 300, .. }))
        ));
        assert!(driver.gateway().calls.lock().is_empty());
    }

    #[tokio::test]
    async fn read_only_write_never_reaches_gateway() {
        let driver = driver();
        let err = driver
            .set_point("hallway_temp", PointValue::Float(70.0))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotWritable(ref p) if p == "hallway_temp"));
        assert!(driver.gateway().calls.lock().is_empty());
    }

    #[tokio::test]
    async fn revert_writes_starting_value() {
        let driver = driver();
        driver.revert_point("hallway_mode").await.unwrap();

        let calls = driver.gateway().calls.lock().clone();
        assert_eq!(calls[0].0.service(), "set_hvac_mode");
        assert_eq!(calls[0].0.field("hvac_mode"), Some(&serde_json::json!("off")));

        assert!(matches!(
            driver.revert_point("light_brightness").await,
            Err(Error::NoStartingValue(_))
        ));
    }

    #[tokio::test]
    async fn acknowledged_state_updates_last_value() {
        struct EchoGateway;

        impl Gateway for EchoGateway {
            async fn fetch_state(
                &self,
                entity_id: &str,
            ) -> std::result::Result<EntityState, RemoteError> {
                Err(RemoteError::Unavailable(entity_id.to_string()))
            }

            async fn call_service(
                &self,
                call: &ServiceCall,
                entity_id: &str,
            ) -> std::result::Result<Acknowledgement, RemoteError> {
                let brightness = call.field("brightness").cloned().unwrap_or_default();
                Ok(Acknowledgement::new(vec![
                    EntityState::new(entity_id, "on").with_attribute("brightness", brightness),
                ]))
            }
        }

        let driver = Driver::new(EchoGateway, registry());
        driver
            .set_point("light_brightness", PointValue::Int(90))
            .await
            .unwrap();
        assert_eq!(driver.last_value("light_brightness"), Some(PointValue::Int(90)));

        let report = driver.scrape().await;
        let reading = report.get("light_brightness").unwrap();
        assert_eq!(reading.value(), Some(&PointValue::Int(90)));
        assert!(matches!(reading.status(), PointStatus::Stale(_)));
    }
}
