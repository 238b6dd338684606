// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::fmt;
use std::time::Duration;

/// Connection parameters for a Home Assistant instance.
///
/// # Examples
///
/// ```
/// use hass_points::gateway::GatewayConfig;
/// use std::time::Duration;
///
/// let config = GatewayConfig::new("192.168.1.20", "token")
///     .with_timeout(Duration::from_secs(5));
/// assert_eq!(config.base_url(), "http://192.168.1.20:8123");
/// ```
#[derive(Clone)]
pub struct GatewayConfig {
    host: String,
    port: u16,
    access_token: String,
    use_https: bool,
    timeout: Duration,
}

impl GatewayConfig {
    /// Default Home Assistant port.
    pub const DEFAULT_PORT: u16 = 8123;
    /// Default request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Creates a configuration for the given host and long-lived access token.
    ///
    /// A host given as a full `http://` or `https://` URL keeps its scheme.
    #[must_use]
    pub fn new(host: impl Into<String>, access_token: impl Into<String>) -> Self {
        let host = host.into();
        let (host, use_https) = if let Some(rest) = host.strip_prefix("https://") {
            (rest.trim_end_matches('/').to_string(), true)
        } else if let Some(rest) = host.strip_prefix("http://") {
            (rest.trim_end_matches('/').to_string(), false)
        } else {
            (host, false)
        };

        Self {
            host,
            port: Self::DEFAULT_PORT,
            access_token: access_token.into(),
            use_https,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Sets a custom port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Enables HTTPS.
    #[must_use]
    pub fn with_https(mut self) -> Self {
        self.use_https = true;
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the host.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the port.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Returns the access token.
    #[must_use]
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// Returns whether HTTPS is enabled.
    #[must_use]
    pub fn use_https(&self) -> bool {
        self.use_https
    }

    /// Returns the timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Builds the base URL from this configuration.
    #[must_use]
    pub fn base_url(&self) -> String {
        let scheme = if self.use_https { "https" } else { "http" };
        format!("{scheme}://{}:{}", self.host, self.port)
    }

    /// Creates an [`HttpGateway`](super::HttpGateway) from this configuration.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError::Unavailable` if the HTTP client cannot be created.
    #[cfg(feature = "http")]
    pub fn into_gateway(self) -> Result<super::HttpGateway, crate::error::RemoteError> {
        super::HttpGateway::new(self)
    }
}

// Keeps the token out of logs.
impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("access_token", &"<redacted>")
            .field("use_https", &self.use_https)
            .field("timeout", &self.timeout)
            .finish()
    }
}
