// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device configuration record.
//!
//! The host framework stores one record per driver instance:
//!
//! ```json
//! {
//!   "driver_config": {
//!     "ip_address": "192.168.1.20",
//!     "access_token": "eyJhbGciOi...",
//!     "port": 8123
//!   },
//!   "driver_type": "home_assistant",
//!   "registry_config": "config://home_assistant.json",
//!   "interval": 30,
//!   "timezone": "UTC"
//! }
//! ```

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::gateway::GatewayConfig;

/// The driver type this crate implements.
pub const DRIVER_TYPE: &str = "home_assistant";

/// Default scrape interval in seconds.
pub const DEFAULT_INTERVAL: u64 = 60;

/// Connection settings of a driver instance.
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConnectionSettings {
    /// Host name or IP address of the Home Assistant instance.
    #[serde(default)]
    pub ip_address: Option<String>,
    /// Long-lived access token.
    #[serde(default)]
    pub access_token: Option<String>,
    /// Port, as a JSON number or numeric string.
    #[serde(default)]
    pub port: Option<Port>,
}

// Keeps the token out of logs.
impl fmt::Debug for ConnectionSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionSettings")
            .field("ip_address", &self.ip_address)
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .field("port", &self.port)
            .finish()
    }
}

/// A port that may be written as a number or as a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Port {
    /// `8123`
    Number(u64),
    /// `"8123"`
    Text(String),
}

impl Port {
    fn resolve(&self) -> Result<u16, ConfigError> {
        let invalid = |shown: String| ConfigError::InvalidField {
            field: "driver_config.port",
            message: format!("{shown} is not a valid port"),
        };
        match self {
            Self::Number(n) => u16::try_from(*n).map_err(|_| invalid(n.to_string())),
            Self::Text(s) => s.trim().parse().map_err(|_| invalid(format!("{s:?}"))),
        }
    }
}

/// Configuration record of one driver instance.
///
/// # Examples
///
/// ```
/// use hass_points::config::DriverConfig;
///
/// let config = DriverConfig::from_json(r#"{
///     "driver_config": {"ip_address": "10.0.0.2", "access_token": "t", "port": "8123"},
///     "driver_type": "home_assistant",
///     "registry_config": "config://ha.json"
/// }"#).unwrap();
///
/// assert_eq!(config.interval().as_secs(), 60);
/// assert_eq!(config.gateway_config().unwrap().port(), 8123);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverConfig {
    /// Connection settings.
    #[serde(default)]
    pub driver_config: ConnectionSettings,
    /// Driver type identifier.
    #[serde(default)]
    pub driver_type: Option<String>,
    /// Reference to the stored registry.
    #[serde(default)]
    pub registry_config: Option<String>,
    /// Seconds between scrapes.
    #[serde(default = "default_interval")]
    pub interval: u64,
    /// Time zone name used by the host when stamping publications.
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

fn default_interval() -> u64 {
    DEFAULT_INTERVAL
}

fn default_timezone() -> String {
    "UTC".to_string()
}

impl DriverConfig {
    /// Parses and validates a configuration record.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Json` on malformed JSON and any error of
    /// [`validate`](Self::validate).
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks required fields and value domains.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingField` if the address, token, port or
    /// driver type is absent, and `ConfigError::InvalidField` for a foreign driver type, a
    /// zero interval or an unusable port.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.gateway_config()?;

        let driver_type = required(self.driver_type.as_deref(), "driver_type")?;
        if driver_type != DRIVER_TYPE {
            return Err(ConfigError::InvalidField {
                field: "driver_type",
                message: format!("expected {DRIVER_TYPE:?}, got {driver_type:?}"),
            });
        }

        if self.interval == 0 {
            return Err(ConfigError::InvalidField {
                field: "interval",
                message: "must be positive".to_string(),
            });
        }

        Ok(())
    }

    /// Returns the scrape interval.
    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval)
    }

    /// Builds the gateway configuration from the connection settings.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingField` for an absent or blank address,
    /// token or port, and `ConfigError::InvalidField` for an unusable port.
    pub fn gateway_config(&self) -> Result<GatewayConfig, ConfigError> {
        let settings = &self.driver_config;

        let ip_address = required(settings.ip_address.as_deref(), "driver_config.ip_address")?;
        let access_token =
            required(settings.access_token.as_deref(), "driver_config.access_token")?;
        let port = settings
            .port
            .as_ref()
            .ok_or(ConfigError::MissingField("driver_config.port"))?
            .resolve()?;

        Ok(GatewayConfig::new(ip_address, access_token).with_port(port))
    }
}

fn required<'a>(value: Option<&'a str>, field: &'static str) -> Result<&'a str, ConfigError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ConfigError::MissingField(field)),
    }
}
