// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the driver.
//!
//! Errors are split by the stage that produces them: configuration loading
//! (fatal, aborts startup), value decoding and encoding (isolated to one
//! point), and remote calls (isolated to one entity or one write).

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// The driver configuration or registry is invalid.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A remote value could not be decoded into a local point value.
    #[error("decoding error: {0}")]
    Decode(#[from] DecodeError),

    /// A local point value could not be encoded into a service call.
    #[error("encoding error: {0}")]
    Encode(#[from] EncodeError),

    /// The Home Assistant instance failed or rejected a request.
    #[error("remote error: {0}")]
    Remote(#[from] RemoteError),

    /// A write was attempted on a read-only point or attribute.
    #[error("{0} is not writable")]
    NotWritable(String),

    /// The named point is not part of the registry.
    #[error("unknown point: {0}")]
    UnknownPoint(String),

    /// A revert was requested for a point without a starting value.
    #[error("point {0} has no starting value")]
    NoStartingValue(String),
}

impl Error {
    /// Returns `true` if retrying the same operation later may succeed
    /// without any configuration change.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Remote(e) if e.is_transient())
    }
}

/// Errors related to value validation and constraints.
///
/// These errors occur when constructing constrained value types or when
/// converting a point value between declared types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// A numeric value is outside the allowed range.
    #[error("value {actual} is out of range [{min}, {max}]")]
    OutOfRange {
        /// Minimum allowed value.
        min: i64,
        /// Maximum allowed value.
        max: i64,
        /// The actual value that was provided.
        actual: i64,
    },

    /// An integer is not one of the fixed HVAC mode codes.
    #[error("{0} is not a valid HVAC mode code (expected 0, 2, 3 or 4)")]
    UnknownModeCode(i64),

    /// A string is not one of the supported HVAC mode names.
    #[error("unsupported HVAC mode: {0:?}")]
    UnknownMode(String),

    /// A declared point type name is not recognized.
    #[error("unknown point type: {0:?}")]
    UnknownPointType(String),

    /// An attribute cannot be published as the declared point type.
    #[error("attribute {attribute} cannot be declared as {target}")]
    IncompatibleType {
        /// The attribute name.
        attribute: &'static str,
        /// The declared point type.
        target: &'static str,
    },

    /// A value cannot be represented as the requested point type.
    #[error("cannot convert {value} to {target}")]
    InvalidCast {
        /// Rendering of the offending value.
        value: String,
        /// The requested point type.
        target: &'static str,
    },
}

/// Errors raised while decoding a remote attribute into a point value.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DecodeError {
    /// The entity state does not carry the attribute.
    #[error("attribute {0} is missing from the entity state")]
    MissingAttribute(String),

    /// The state string is not part of the domain's vocabulary.
    #[error("unrecognized state {0:?}")]
    UnrecognizedState(String),

    /// The raw value has the wrong JSON type.
    #[error("expected {expected}, got {actual}")]
    TypeMismatch {
        /// Description of the accepted shape.
        expected: &'static str,
        /// Rendering of the raw value.
        actual: String,
    },

    /// The raw value violates a range or enumeration constraint.
    #[error(transparent)]
    Value(#[from] ValueError),
}

/// Errors raised while encoding a point value into a service call.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EncodeError {
    /// The value is not an accepted command for the attribute.
    #[error("unsupported command value {0}")]
    UnrecognizedValue(String),

    /// The value has the wrong type for the attribute.
    #[error("expected {expected}, got {actual}")]
    TypeMismatch {
        /// Description of the accepted shape.
        expected: &'static str,
        /// Rendering of the offending value.
        actual: String,
    },

    /// The attribute only reports state and cannot be commanded.
    #[error("attribute {0} is read-only")]
    ReadOnly(&'static str),

    /// The value violates a range or enumeration constraint.
    #[error(transparent)]
    Value(#[from] ValueError),
}

/// Errors related to communication with the Home Assistant REST API.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RemoteError {
    /// The request could not be delivered or no response was received.
    #[error("Home Assistant unavailable: {0}")]
    Unavailable(String),

    /// The entity does not exist on the remote instance.
    #[error("entity not found: {0}")]
    NotFound(String),

    /// The remote instance answered with a non-success status.
    #[error("request rejected with HTTP {status}: {body}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Response body, as returned.
        body: String,
    },

    /// A success response did not have the documented shape.
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl RemoteError {
    /// Returns `true` for transport failures.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

/// Errors related to the registry and the device configuration.
///
/// All of these are fatal at load time.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Two registry entries declare the same point name.
    #[error("duplicate point name: {0}")]
    DuplicatePoint(String),

    /// The entity id is not of the form `<domain>.<object_id>`.
    #[error("malformed entity id: {0:?}")]
    InvalidEntityId(String),

    /// The entity id domain has no matching device adapter.
    #[error("unsupported domain {domain:?} in entity id {entity_id}")]
    UnknownDomain {
        /// The full entity id.
        entity_id: String,
        /// The domain prefix.
        domain: String,
    },

    /// The attribute is not handled by the entity's device adapter.
    #[error("attribute {attribute:?} is not supported for {entity_id}")]
    UnsupportedAttribute {
        /// The full entity id.
        entity_id: String,
        /// The attribute name.
        attribute: String,
    },

    /// A read-only attribute was declared writable.
    #[error("point {point} maps read-only attribute {attribute} but is declared writable")]
    ReadOnlyAttribute {
        /// The point name.
        point: String,
        /// The attribute name.
        attribute: String,
    },

    /// The declared type of a point is invalid.
    #[error("point {point}: {source}")]
    InvalidType {
        /// The point name.
        point: String,
        /// The underlying value error.
        source: ValueError,
    },

    /// The starting value of a point does not fit its declared type or is
    /// not a value the attribute accepts.
    #[error("point {point}: invalid starting value: {source}")]
    InvalidStartingValue {
        /// The point name.
        point: String,
        /// The underlying encoding error.
        source: EncodeError,
    },

    /// A required field is absent or empty.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// A field has a value outside its accepted domain.
    #[error("invalid value for {field}: {message}")]
    InvalidField {
        /// The field name.
        field: &'static str,
        /// Description of the problem.
        message: String,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
