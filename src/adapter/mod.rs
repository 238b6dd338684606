// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device adapters: per-domain decoding and encoding of entity attributes.
//!
//! Every supported domain implements the same two operations, so callers
//! never branch on the domain themselves:
//!
//! - **decode**: raw remote attribute value → typed [`PointValue`]
//! - **encode**: [`PointValue`] → [`ServiceCall`]
//!
//! An adapter is bound to one attribute when the registry is loaded, so an
//! attribute the domain does not know is rejected up front.
//!
//! | Domain | Attribute | Decode | Encode | Out-of-range writes |
//! |--------|-----------|--------|--------|---------------------|
//! | light | `state` | `on`/`off` → bool | `turn_on`/`turn_off` | rejected |
//! | light | `brightness` | int | `turn_on` + `brightness` | rejected (0-255) |
//! | climate | `state` | mode → code | `set_hvac_mode` | rejected |
//! | climate | `temperature` | float | `set_temperature` | - |
//! | climate | `current_temperature` | float | read-only | - |
//! | lock | `state` | `locked`/`unlocked` → 1/0 | `lock`/`unlock` | rejected |
//! | fan | `state` | `on`/`off` → 1/0 | `turn_on`/`turn_off` | rejected |
//! | fan | `percentage` | int | `set_percentage` | clamped (0-100) |
//! | cover | `state` | `open`/`closed` → 1/0 | `open_cover`/`close_cover` | rejected |
//! | cover | `position` | int | `set_cover_position` | clamped (0-100) |

mod climate;
mod cover;
mod fan;
mod light;
mod lock;
mod service;

pub use climate::ClimatePoint;
pub use cover::CoverPoint;
pub use fan::FanPoint;
pub use light::LightPoint;
pub use lock::LockPoint;
pub use service::ServiceCall;

use serde_json::Value;

use crate::entity::Domain;
use crate::error::{DecodeError, EncodeError, Error, ValueError};
use crate::types::{Percentage, PointType, PointValue};

/// A device adapter bound to one attribute of its domain.
///
/// # Examples
///
/// ```
/// use hass_points::adapter::DeviceAdapter;
/// use hass_points::entity::Domain;
/// use hass_points::types::PointValue;
///
/// let adapter = DeviceAdapter::bind(Domain::Lock, "state").unwrap();
/// let raw = serde_json::json!("locked");
/// assert_eq!(adapter.decode(Some(&raw)).unwrap(), PointValue::Int(1));
///
/// let call = adapter.encode(&PointValue::Int(0)).unwrap();
/// assert_eq!(call.service(), "unlock");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceAdapter {
    /// A light attribute.
    Light(LightPoint),
    /// A thermostat attribute.
    Climate(ClimatePoint),
    /// A lock attribute.
    Lock(LockPoint),
    /// A fan attribute.
    Fan(FanPoint),
    /// A cover attribute.
    Cover(CoverPoint),
}

impl DeviceAdapter {
    /// Binds the adapter of `domain` to an attribute name.
    ///
    /// Returns `None` if the domain does not handle the attribute.
    #[must_use]
    pub fn bind(domain: Domain, attribute: &str) -> Option<Self> {
        match domain {
            Domain::Light => LightPoint::from_name(attribute).map(Self::Light),
            Domain::Climate => ClimatePoint::from_name(attribute).map(Self::Climate),
            Domain::Lock => LockPoint::from_name(attribute).map(Self::Lock),
            Domain::Fan => FanPoint::from_name(attribute).map(Self::Fan),
            Domain::Cover => CoverPoint::from_name(attribute).map(Self::Cover),
        }
    }

    /// Returns the domain this adapter belongs to.
    #[must_use]
    pub const fn domain(&self) -> Domain {
        match self {
            Self::Light(_) => Domain::Light,
            Self::Climate(_) => Domain::Climate,
            Self::Lock(_) => Domain::Lock,
            Self::Fan(_) => Domain::Fan,
            Self::Cover(_) => Domain::Cover,
        }
    }

    /// Returns the canonical name of the bound attribute.
    #[must_use]
    pub const fn attribute(&self) -> &'static str {
        match self {
            Self::Light(p) => p.as_str(),
            Self::Climate(p) => p.as_str(),
            Self::Lock(p) => p.as_str(),
            Self::Fan(p) => p.as_str(),
            Self::Cover(p) => p.as_str(),
        }
    }

    /// Returns `true` if the attribute accepts writes.
    #[must_use]
    pub const fn is_writable(&self) -> bool {
        !matches!(self, Self::Climate(ClimatePoint::CurrentTemperature))
    }

    /// Returns the remote attribute to read when the configured one is absent.
    ///
    /// Home Assistant reports a cover's position as `current_position`
    /// while registries conventionally name the point `position`.
    #[must_use]
    pub const fn fallback_attribute(&self) -> Option<&'static str> {
        match self {
            Self::Cover(CoverPoint::Position) => Some("current_position"),
            _ => None,
        }
    }

    /// Returns the type of the values this adapter decodes to.
    #[must_use]
    pub const fn native_type(&self) -> PointType {
        match self {
            Self::Light(LightPoint::State) => PointType::Boolean,
            Self::Climate(ClimatePoint::Temperature | ClimatePoint::CurrentTemperature) => {
                PointType::Float
            }
            _ => PointType::Int,
        }
    }

    /// Decodes a raw remote value.
    ///
    /// `raw` is `None` when the entity state does not carry the attribute.
    ///
    /// # Errors
    ///
    /// Returns `DecodeError` if the value is missing where required, has the
    /// wrong type, or falls outside the attribute's range or vocabulary.
    pub fn decode(&self, raw: Option<&Value>) -> Result<PointValue, DecodeError> {
        match self {
            Self::Light(p) => p.decode(raw),
            Self::Climate(p) => p.decode(raw),
            Self::Lock(p) => p.decode(raw),
            Self::Fan(p) => p.decode(raw),
            Self::Cover(p) => p.decode(raw),
        }
    }

    /// Returns `true` if values of this attribute can be published as
    /// `point_type` and written back in that shape.
    ///
    /// Strings are never accepted, and neither is any type a decoded value
    /// could not be converted into without loss.
    #[must_use]
    pub const fn supports_type(&self, point_type: PointType) -> bool {
        match (self, point_type) {
            (_, PointType::String) => false,
            (Self::Climate(ClimatePoint::Temperature | ClimatePoint::CurrentTemperature), t) => {
                matches!(t, PointType::Float)
            }
            (Self::Light(LightPoint::State), t) => matches!(t, PointType::Boolean | PointType::Int),
            (Self::Lock(_) | Self::Fan(FanPoint::State) | Self::Cover(CoverPoint::State), _) => {
                true
            }
            (_, t) => matches!(t, PointType::Int | PointType::Float),
        }
    }

    /// Encodes a local value into the service call that applies it.
    ///
    /// A value published in a supported declared type is converted back to
    /// the native type first, so `1.0` on a level writes `1`.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotWritable` for read-only attributes and
    /// `Error::Encode` if the value is not a valid command.
    pub fn encode(&self, value: &PointValue) -> Result<ServiceCall, Error> {
        self.encode_native(&self.to_native(value))
            .map_err(|e| match e {
                EncodeError::ReadOnly(attribute) => Error::NotWritable(attribute.to_string()),
                other => Error::Encode(other),
            })
    }

    /// Checks that `value` is one the attribute can both report and accept.
    ///
    /// Unlike [`encode`](Self::encode), levels outside their range are
    /// rejected rather than clamped, and read-only attributes are checked
    /// against what they decode to.
    ///
    /// # Errors
    ///
    /// Returns `EncodeError` if the value is out of range, outside the
    /// domain's vocabulary or of the wrong type.
    pub fn validate(&self, value: &PointValue) -> Result<(), EncodeError> {
        let value = self.to_native(value);
        match self {
            Self::Fan(FanPoint::Percentage) | Self::Cover(CoverPoint::Position) => {
                Percentage::new(integer(&value)?)?;
                Ok(())
            }
            Self::Climate(ClimatePoint::CurrentTemperature) => decimal(&value).map(|_| ()),
            _ => self.encode_native(&value).map(|_| ()),
        }
    }

    fn encode_native(&self, value: &PointValue) -> Result<ServiceCall, EncodeError> {
        match self {
            Self::Light(p) => p.encode(value),
            Self::Climate(p) => p.encode(value),
            Self::Lock(p) => p.encode(value),
            Self::Fan(p) => p.encode(value),
            Self::Cover(p) => p.encode(value),
        }
    }

    /// Converts a value of a supported declared type into the native type.
    /// Anything else passes through and is judged by the domain encoder.
    fn to_native(&self, value: &PointValue) -> PointValue {
        if self.supports_type(value.point_type()) {
            value.cast(self.native_type()).unwrap_or_else(|_| value.clone())
        } else {
            value.clone()
        }
    }
}

// ============================================================================
// Shared decoding rules
// ============================================================================

/// Extracts the primary state string.
fn state_str(raw: Option<&Value>) -> Result<&str, DecodeError> {
    match raw {
        Some(Value::String(s)) => Ok(s),
        Some(other) => Err(DecodeError::TypeMismatch {
            expected: "state string",
            actual: other.to_string(),
        }),
        None => Err(DecodeError::MissingAttribute("state".to_string())),
    }
}

/// Extracts an integer level; an absent or null level reads as 0.
///
/// Home Assistant nulls brightness, speed and position while a device is off.
fn level(raw: Option<&Value>) -> Result<i64, DecodeError> {
    match raw {
        None | Some(Value::Null) => Ok(0),
        Some(v @ Value::Number(_)) => PointValue::from_json(v)
            .and_then(|p| p.cast(PointType::Int).ok())
            .and_then(|p| p.as_int())
            .ok_or_else(|| DecodeError::TypeMismatch {
                expected: "integer",
                actual: v.to_string(),
            }),
        Some(other) => Err(DecodeError::TypeMismatch {
            expected: "integer",
            actual: other.to_string(),
        }),
    }
}

/// Extracts a required number.
fn number(raw: Option<&Value>, attribute: &str) -> Result<f64, DecodeError> {
    match raw {
        None | Some(Value::Null) => Err(DecodeError::MissingAttribute(attribute.to_string())),
        Some(Value::Number(n)) => n.as_f64().ok_or_else(|| DecodeError::TypeMismatch {
            expected: "number",
            actual: n.to_string(),
        }),
        Some(other) => Err(DecodeError::TypeMismatch {
            expected: "number",
            actual: other.to_string(),
        }),
    }
}

// ============================================================================
// Shared encoding rules
// ============================================================================

/// Interprets a binary command: `true`/`1` and the `on` keywords turn the
/// attribute on, `false`/`0` and the `off` keywords turn it off.
///
/// Keywords are matched case-insensitively. Numeric strings are not accepted.
fn binary_command(value: &PointValue, on: &[&str], off: &[&str]) -> Result<bool, EncodeError> {
    match value {
        PointValue::Bool(b) => Ok(*b),
        PointValue::Int(1) => Ok(true),
        PointValue::Int(0) => Ok(false),
        PointValue::Int(other) => Err(ValueError::OutOfRange {
            min: 0,
            max: 1,
            actual: *other,
        }
        .into()),
        PointValue::Str(s) => {
            let keyword = s.trim().to_lowercase();
            if on.contains(&keyword.as_str()) {
                Ok(true)
            } else if off.contains(&keyword.as_str()) {
                Ok(false)
            } else {
                Err(EncodeError::UnrecognizedValue(format!("{s:?}")))
            }
        }
        PointValue::Float(_) => Err(EncodeError::TypeMismatch {
            expected: "0, 1 or boolean",
            actual: value.to_string(),
        }),
    }
}

/// Requires an integer value.
fn integer(value: &PointValue) -> Result<i64, EncodeError> {
    value.as_int().ok_or_else(|| EncodeError::TypeMismatch {
        expected: "integer",
        actual: value.to_string(),
    })
}

/// Requires a finite numeric value.
fn decimal(value: &PointValue) -> Result<f64, EncodeError> {
    value
        .as_float()
        .filter(|f| f.is_finite())
        .ok_or_else(|| EncodeError::TypeMismatch {
            expected: "number",
            actual: value.to_string(),
        })
}
