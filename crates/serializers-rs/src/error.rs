//! Error types for the serializer engine.
//!
//! [`SerializerError`] covers the structural failures that abort an
//! operation: a serializer configuration with no model binding (fatal at
//! construction) and a `data` read on a serializer with nothing bound.
//! Field validation failures are never errors at this level; they
//! accumulate as message strings per field on the serializer itself,
//! with [`ValidationError`] as the internal carrier between a check and
//! that accumulation.

use std::fmt;

use thiserror::Error;

/// A single field-level validation failure.
///
/// Produced by validation checks and flattened into the serializer's
/// per-field error message lists. The `code` is a short machine-readable
/// identifier for the kind of failure (e.g. "required", "max_length").
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// The human-readable error message.
    pub message: String,
    /// A short code identifying the type of validation failure.
    pub code: String,
}

impl ValidationError {
    /// Creates a new `ValidationError` with a message and code.
    pub fn new(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: code.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Structural errors raised by the serializer engine.
#[derive(Debug, Error)]
pub enum SerializerError {
    /// The serializer configuration is unusable: no model is bound, or a
    /// nested declaration is itself missing its model. Raised eagerly at
    /// serializer construction.
    #[error("malformed serializer configuration: {0}")]
    MalformedConfig(String),

    /// A `data` read was attempted with no instance bound.
    #[error("serializer has no bound instance to serialize")]
    UnboundInstance,
}
