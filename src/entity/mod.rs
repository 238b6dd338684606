// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Home Assistant entity identifiers, domains and states.

mod state;

pub use state::EntityState;

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// Device domain of an entity, taken from its entity id prefix.
///
/// Only the domains listed here are supported; any other prefix is rejected
/// when the registry is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Domain {
    /// Lights (`light.*`).
    Light,
    /// Thermostats (`climate.*`).
    Climate,
    /// Locks (`lock.*`).
    Lock,
    /// Fans (`fan.*`).
    Fan,
    /// Motorized covers such as curtains and blinds (`cover.*`).
    Cover,
}

impl Domain {
    /// Returns the Home Assistant domain name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Climate => "climate",
            Self::Lock => "lock",
            Self::Fan => "fan",
            Self::Cover => "cover",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Domain {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Self::Light),
            "climate" => Ok(Self::Climate),
            "lock" => Ok(Self::Lock),
            "fan" => Ok(Self::Fan),
            "cover" => Ok(Self::Cover),
            _ => Err(()),
        }
    }
}

/// A validated entity id of the form `<domain>.<object_id>`.
///
/// # Examples
///
/// ```
/// use hass_points::entity::{Domain, EntityId};
///
/// let id = EntityId::parse("cover.living_room_curtain").unwrap();
/// assert_eq!(id.domain(), Domain::Cover);
/// assert_eq!(id.object_id(), "living_room_curtain");
///
/// assert!(EntityId::parse("switch.garage").is_err());
/// assert!(EntityId::parse("kitchen").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntityId {
    raw: String,
    domain: Domain,
}

impl EntityId {
    /// Parses and validates an entity id.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEntityId` if the id has no `.` separator
    /// or an empty part, and `ConfigError::UnknownDomain` if the domain
    /// prefix is not supported.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let raw = raw.trim();
        let prefix = raw
            .split_once('.')
            .filter(|(d, o)| !d.is_empty() && !o.is_empty())
            .map(|(d, _)| d)
            .ok_or_else(|| ConfigError::InvalidEntityId(raw.to_string()))?;

        let domain = prefix.parse().map_err(|()| ConfigError::UnknownDomain {
            entity_id: raw.to_string(),
            domain: prefix.to_string(),
        })?;

        Ok(Self {
            raw: raw.to_string(),
            domain,
        })
    }

    /// Returns the device domain.
    #[must_use]
    pub const fn domain(&self) -> Domain {
        self.domain
    }

    /// Returns the part after the domain prefix.
    #[must_use]
    pub fn object_id(&self) -> &str {
        &self.raw[self.domain.as_str().len() + 1..]
    }

    /// Returns the full entity id.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
