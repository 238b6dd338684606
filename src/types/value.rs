// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Local point values and their declared types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ValueError;

/// The type a registry declares for a point.
///
/// Decoded values are shaped into this type before publication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointType {
    /// Signed integer.
    Int,
    /// Floating point number.
    Float,
    /// Boolean.
    Boolean,
    /// Free-form string.
    String,
}

impl PointType {
    /// Returns the canonical registry name of the type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Float => "float",
            Self::Boolean => "boolean",
            Self::String => "string",
        }
    }
}

impl fmt::Display for PointType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PointType {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "int" | "integer" => Ok(Self::Int),
            "float" => Ok(Self::Float),
            "bool" | "boolean" => Ok(Self::Boolean),
            "string" => Ok(Self::String),
            _ => Err(ValueError::UnknownPointType(s.to_string())),
        }
    }
}

/// A typed local point value.
///
/// Serializes to the bare JSON scalar, so a published scrape is a plain
/// `{"point": value}` object.
///
/// # Examples
///
/// ```
/// use hass_points::types::{PointType, PointValue};
///
/// let on = PointValue::Bool(true);
/// assert_eq!(on.cast(PointType::Int).unwrap(), PointValue::Int(1));
///
/// // Strings never turn into numbers implicitly
/// assert!(PointValue::from("3").cast(PointType::Int).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PointValue {
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Floating point value.
    Float(f64),
    /// String value.
    Str(String),
}

impl PointValue {
    /// Returns a short name of the variant, used in error messages.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Bool(_) => "boolean",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Str(_) => "string",
        }
    }

    /// Returns the point type this value already has.
    #[must_use]
    pub const fn point_type(&self) -> PointType {
        match self {
            Self::Bool(_) => PointType::Boolean,
            Self::Int(_) => PointType::Int,
            Self::Float(_) => PointType::Float,
            Self::Str(_) => PointType::String,
        }
    }

    /// Returns the value as an integer if it is one.
    ///
    /// Floats and booleans are not considered integers here.
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the value as a float if it is numeric.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub const fn as_float(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Converts a JSON scalar into a point value.
    ///
    /// Returns `None` for `null`, arrays and objects.
    #[must_use]
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(Self::Bool(*b)),
            Value::Number(n) => n
                .as_i64()
                .map(Self::Int)
                .or_else(|| n.as_f64().map(Self::Float)),
            Value::String(s) => Some(Self::Str(s.clone())),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }

    /// Converts the value into the given declared type.
    ///
    /// Allowed conversions are lossless between numbers and booleans
    /// (`true` is `1`, integral floats become integers) and anything into a
    /// string. Strings are never parsed into other types.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidCast` when no allowed conversion applies.
    pub fn cast(&self, target: PointType) -> Result<Self, ValueError> {
        let converted = match (self, target) {
            (Self::Int(_), PointType::Int)
            | (Self::Float(_), PointType::Float)
            | (Self::Bool(_), PointType::Boolean)
            | (Self::Str(_), PointType::String) => Some(self.clone()),
            (Self::Bool(b), PointType::Int) => Some(Self::Int(i64::from(*b))),
            (Self::Float(f), PointType::Int) => integral(*f).map(Self::Int),
            (Self::Int(_), PointType::Float) => self.as_float().map(Self::Float),
            (Self::Bool(b), PointType::Float) => Some(Self::Float(f64::from(u8::from(*b)))),
            (Self::Int(0), PointType::Boolean) => Some(Self::Bool(false)),
            (Self::Int(1), PointType::Boolean) => Some(Self::Bool(true)),
            (_, PointType::String) => Some(Self::Str(self.to_string())),
            _ => None,
        };
        converted.ok_or_else(|| ValueError::InvalidCast {
            value: self.to_string(),
            target: target.as_str(),
        })
    }

    /// Parses registry text into a value of the given type.
    ///
    /// Used for starting values, which registries commonly store as strings.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidCast` if the text does not denote a value
    /// of the requested type.
    pub fn parse(text: &str, target: PointType) -> Result<Self, ValueError> {
        let trimmed = text.trim();
        let parsed = match target {
            PointType::Int => trimmed.parse().ok().map(Self::Int),
            PointType::Float => trimmed.parse().ok().map(Self::Float),
            PointType::Boolean => match trimmed.to_lowercase().as_str() {
                "true" | "1" | "on" => Some(Self::Bool(true)),
                "false" | "0" | "off" => Some(Self::Bool(false)),
                _ => None,
            },
            PointType::String => Some(Self::Str(text.to_string())),
        };
        parsed.ok_or_else(|| ValueError::InvalidCast {
            value: format!("{text:?}"),
            target: target.as_str(),
        })
    }

    /// Converts the value into JSON.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Bool(b) => Value::Bool(*b),
            Self::Int(i) => Value::from(*i),
            Self::Float(f) => Value::from(*f),
            Self::Str(s) => Value::String(s.clone()),
        }
    }
}

/// Returns the integer a float represents exactly, if any.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss, clippy::float_cmp)]
fn integral(f: f64) -> Option<i64> {
    if f.is_finite() && f.trunc() == f && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

impl fmt::Display for PointValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x:?}"),
            Self::Str(s) => write!(f, "{s:?}"),
        }
    }
}

impl From<bool> for PointValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for PointValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for PointValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for PointValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for PointValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}
