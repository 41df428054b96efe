//! # Error Types — Open Data Failures
//!
//! Defines the errors raised while constructing open types and open data
//! values. All errors use `thiserror` for derive-based `Display` and `Error`
//! implementations.
//!
//! ## Design
//!
//! - Type definition errors name the offending type and the broken rule.
//! - Conversion errors carry the target type, the rendered input, and the
//!   reason the input was refused.
//! - Tabular key errors carry the rendered index tuple.

use thiserror::Error;

/// Top-level error type for the open type model.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OpenDataError {
    /// A type definition violates a structural invariant (duplicate item
    /// names, unknown index names, invalid dimension, blank names).
    #[error("malformed type '{type_name}': {reason}")]
    MalformedType {
        /// Name of the type being defined.
        type_name: String,
        /// The rule the definition broke.
        reason: String,
    },

    /// A value does not fit the open type it was supplied for.
    #[error(transparent)]
    ValueConversion(#[from] ConversionError),

    /// A key or item name does not match the shape it is looked up against.
    #[error("invalid key: {reason}")]
    InvalidKey {
        /// Why the key was rejected.
        reason: String,
    },

    /// A tabular row was inserted with an index tuple that is already present.
    #[error("key already exists: {key}")]
    KeyAlreadyExists {
        /// Rendering of the duplicated index tuple.
        key: String,
    },

    /// A composite row does not belong to the tabular type's row type.
    #[error("invalid open type: expected {expected}, got {actual}")]
    InvalidOpenType {
        /// Type name the container requires.
        expected: String,
        /// Type name that was supplied.
        actual: String,
    },
}

impl OpenDataError {
    /// Shorthand for a [`OpenDataError::MalformedType`].
    pub fn malformed(type_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedType {
            type_name: type_name.into(),
            reason: reason.into(),
        }
    }

    /// Shorthand for a [`OpenDataError::InvalidKey`].
    pub fn invalid_key(reason: impl Into<String>) -> Self {
        Self::InvalidKey {
            reason: reason.into(),
        }
    }
}

/// A raw value could not be turned into a value of the required open type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("cannot convert {input} to {target}: {reason}")]
pub struct ConversionError {
    /// Type name of the conversion target.
    pub target: String,
    /// Rendering of the value that was refused.
    pub input: String,
    /// Why the conversion failed.
    pub reason: String,
}

impl ConversionError {
    /// Build a conversion error for `input` targeting `target`.
    pub fn new(
        target: impl Into<String>,
        input: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            target: target.into(),
            input: input.into(),
            reason: reason.into(),
        }
    }
}
