// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Remote gateway to a Home Assistant instance.
//!
//! The [`Gateway`] trait is the only seam between the driver and the remote
//! system. [`HttpGateway`] implements it over the Home Assistant REST API;
//! tests substitute in-memory implementations.

mod config;
#[cfg(feature = "http")]
mod http;

pub use config::GatewayConfig;
#[cfg(feature = "http")]
pub use http::HttpGateway;

use serde::{Deserialize, Serialize};

use crate::adapter::ServiceCall;
use crate::entity::EntityState;
use crate::error::RemoteError;

/// Remote acknowledgement of a service call.
///
/// Home Assistant answers a service call with the states that changed while
/// the call ran. The list may be empty even when the call succeeded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Acknowledgement {
    changed: Vec<EntityState>,
}

impl Acknowledgement {
    /// Creates an acknowledgement carrying the given changed states.
    #[must_use]
    pub fn new(changed: Vec<EntityState>) -> Self {
        Self { changed }
    }

    /// Returns the states reported as changed.
    #[must_use]
    pub fn changed(&self) -> &[EntityState] {
        &self.changed
    }

    /// Returns the reported new state of one entity, if present.
    #[must_use]
    pub fn state_of(&self, entity_id: &str) -> Option<&EntityState> {
        self.changed.iter().find(|s| s.entity_id() == entity_id)
    }
}

/// Access to entity states and services of a remote instance.
#[allow(async_fn_in_trait)]
pub trait Gateway {
    /// Fetches the current state of one entity.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError::Unavailable` on transport failure,
    /// `RemoteError::NotFound` if the entity does not exist and
    /// `RemoteError::Rejected` for any other non-success response.
    async fn fetch_state(&self, entity_id: &str) -> Result<EntityState, RemoteError>;

    /// Invokes a service against one entity.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`fetch_state`](Self::fetch_state).
    async fn call_service(
        &self,
        call: &ServiceCall,
        entity_id: &str,
    ) -> Result<Acknowledgement, RemoteError>;
}
