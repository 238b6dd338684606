// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Home Assistant REST gateway.

use std::fmt;

use reqwest::{Client, Response, StatusCode};
use serde_json::Value;

use super::{Acknowledgement, Gateway, GatewayConfig};
use crate::adapter::ServiceCall;
use crate::entity::EntityState;
use crate::error::RemoteError;

/// Gateway speaking the Home Assistant REST API.
///
/// Uses `GET /api/states/<entity_id>` for reads and
/// `POST /api/services/<domain>/<service>` for writes, authenticated with a
/// bearer token. Each call is an independent request.
///
/// # Examples
///
/// ```no_run
/// use hass_points::gateway::{Gateway, GatewayConfig};
///
/// # async fn example() -> Result<(), hass_points::error::RemoteError> {
/// let gateway = GatewayConfig::new("192.168.1.20", "token").into_gateway()?;
/// let state = gateway.fetch_state("light.kitchen").await?;
/// println!("{}", state.state());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct HttpGateway {
    base_url: String,
    access_token: String,
    client: Client,
}

impl HttpGateway {
    /// Creates a gateway from its configuration.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError::Unavailable` if the HTTP client cannot be created.
    pub fn new(config: GatewayConfig) -> Result<Self, RemoteError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| RemoteError::Unavailable(e.to_string()))?;

        Ok(Self {
            base_url: config.base_url(),
            access_token: config.access_token().to_string(),
            client,
        })
    }

    /// Returns the base URL of the instance.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn state_url(&self, entity_id: &str) -> String {
        format!("{}/api/states/{}", self.base_url, urlencoding::encode(entity_id))
    }
}

impl fmt::Debug for HttpGateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpGateway")
            .field("base_url", &self.base_url)
            .field("access_token", &"<redacted>")
            .finish_non_exhaustive()
    }
}

/// Maps a non-success response onto the remote error taxonomy.
async fn rejection(response: Response, entity_id: &str) -> RemoteError {
    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        return RemoteError::NotFound(entity_id.to_string());
    }
    let body = response.text().await.unwrap_or_default();
    RemoteError::Rejected {
        status: status.as_u16(),
        body,
    }
}

fn transport(error: &reqwest::Error) -> RemoteError {
    RemoteError::Unavailable(error.to_string())
}

impl Gateway for HttpGateway {
    async fn fetch_state(&self, entity_id: &str) -> Result<EntityState, RemoteError> {
        let url = self.state_url(entity_id);

        tracing::debug!(url = %url, "Fetching entity state");

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| transport(&e))?;

        if !response.status().is_success() {
            return Err(rejection(response, entity_id).await);
        }

        let body = response.text().await.map_err(|e| transport(&e))?;

        tracing::trace!(body = %body, "Received entity state");

        serde_json::from_str(&body).map_err(|e| RemoteError::Malformed(e.to_string()))
    }

    async fn call_service(
        &self,
        call: &ServiceCall,
        entity_id: &str,
    ) -> Result<Acknowledgement, RemoteError> {
        let url = format!("{}{}", self.base_url, call.path());
        let body = call.body(entity_id);

        tracing::debug!(url = %url, body = %body, "Calling service");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| transport(&e))?;

        if !response.status().is_success() {
            return Err(rejection(response, entity_id).await);
        }

        let text = response.text().await.map_err(|e| transport(&e))?;
        let changed = match serde_json::from_str::<Value>(&text) {
            Ok(value) => serde_json::from_value::<Vec<EntityState>>(value).unwrap_or_else(|e| {
                tracing::debug!(error = %e, "Service response is not a state list");
                Vec::new()
            }),
            Err(e) => {
                tracing::debug!(error = %e, "Service response is not JSON");
                Vec::new()
            }
        };

        Ok(Acknowledgement::new(changed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_url_encodes_entity_id() {
        let gateway = GatewayConfig::new("10.0.0.2", "t").into_gateway().unwrap();
        assert_eq!(
            gateway.state_url("light.kitchen"),
            "http://10.0.0.2:8123/api/states/light.kitchen"
        );
        assert_eq!(
            gateway.state_url("light.a b"),
            "http://10.0.0.2:8123/api/states/light.a%20b"
        );
    }

    #[test]
    fn debug_redacts_token() {
        let gateway = GatewayConfig::new("10.0.0.2", "super-secret")
            .into_gateway()
            .unwrap();
        let rendered = format!("{gateway:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn base_url_from_config() {
        let gateway = GatewayConfig::new("hass.local", "t")
            .with_https()
            .with_port(8443)
            .into_gateway()
            .unwrap();
        assert_eq!(gateway.base_url(), "https://hass.local:8443");
    }
}
