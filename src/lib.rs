// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `hass_points` - Home Assistant entities as typed read/write points.
//!
//! This library exposes attributes of Home Assistant entities as uniformly
//! named "points" that a data-acquisition host can scrape on an interval and
//! write on demand. Each device domain's value encoding is hidden behind a
//! device adapter.
//!
//! # Supported Domains
//!
//! - **light**: on/off state, brightness (0-255)
//! - **climate**: HVAC mode (as integer code), target and current temperature
//! - **lock**: locked/unlocked state
//! - **fan**: on/off state, speed percentage (0-100)
//! - **cover**: open/closed state, position (0-100)
//!
//! # Quick Start
//!
//! ```no_run
//! use hass_points::{Driver, DriverConfig, PointValue};
//!
//! #[tokio::main]
//! async fn main() -> hass_points::Result<()> {
//!     let config = DriverConfig::from_json(r#"{
//!         "driver_config": {"ip_address": "192.168.1.20", "access_token": "token", "port": 8123},
//!         "driver_type": "home_assistant",
//!         "interval": 30
//!     }"#)?;
//!
//!     let registry = r#"[
//!         {"Entity ID": "light.kitchen", "Entity Point": "brightness",
//!          "Volttron Point Name": "light_brightness", "Writable": true, "Type": "int"},
//!         {"Entity ID": "lock.front_door", "Entity Point": "state",
//!          "Volttron Point Name": "front_door_lock_state", "Writable": true, "Type": "int"}
//!     ]"#;
//!
//!     let driver = Driver::from_config(&config, registry)?;
//!
//!     // One polling tick
//!     let report = driver.scrape().await;
//!     for (point, value) in report.published() {
//!         println!("{point} = {value}");
//!     }
//!
//!     // Unlock the door
//!     driver.set_point("front_door_lock_state", PointValue::Int(0)).await?;
//!     Ok(())
//! }
//! ```
//!
//! # Error Handling
//!
//! Configuration errors are fatal and surface from construction. During a
//! scrape, failures are isolated per entity and per point and reported in
//! the [`ScrapeReport`]. Writes fail with [`Error`] before any remote call
//! when the point is unknown, read-only or the value is out of range.

pub mod adapter;
pub mod config;
pub mod driver;
pub mod entity;
pub mod error;
pub mod gateway;
pub mod registry;
pub mod types;

pub use adapter::{DeviceAdapter, ServiceCall};
pub use config::DriverConfig;
pub use driver::{Driver, PointReading, PointStatus, ScrapeReport};
pub use entity::{Domain, EntityId, EntityState};
pub use error::{
    ConfigError, DecodeError, EncodeError, Error, RemoteError, Result, ValueError,
};
#[cfg(feature = "http")]
pub use gateway::HttpGateway;
pub use gateway::{Acknowledgement, Gateway, GatewayConfig};
pub use registry::{BoundPoint, PointDefinition, Registry, RegistryEntry};
pub use types::{Brightness, HvacMode, Percentage, PointType, PointValue};
