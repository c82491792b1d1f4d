//! # serializers-rs
//!
//! Declarative, model-driven serializers in the style of Django REST
//! Framework's `ModelSerializer`, bound to ORM column metadata instead
//! of hand-written per-field rules.
//!
//! A [`SerializerConfig`](schema::SerializerConfig) names the model it
//! serves and any per-field overrides; constructing a
//! [`Serializer`](serializer::Serializer) from it resolves an ordered
//! field schema from the model's columns. The serializer then works in
//! both directions:
//!
//! - `is_valid()` casts and validates raw JSON input field by field,
//!   accumulating every failure message per field instead of stopping at
//!   the first;
//! - `data()` serializes a bound model instance (or list) to plain JSON,
//!   recursing into nested serializers for relationship fields and
//!   calling registered getters for computed fields.
//!
//! ## Module Overview
//!
//! - [`fields`] - Field validators: total casts plus ordered checks
//! - [`schema`] - Declaration surface and schema resolution
//! - [`serializer`] - The per-request [`Serializer`](serializer::Serializer)
//! - [`error`] - Structural errors and the validation-failure carrier

// The integer cast deliberately truncates floats, matching the field's
// coercion contract.
#![allow(clippy::cast_possible_truncation)]

pub mod error;
pub mod fields;
pub mod schema;
pub mod serializer;

pub use error::{SerializerError, ValidationError};
pub use fields::{Check, FieldKind, FieldValidator};
pub use schema::{FieldEntry, FieldOverride, MethodGetter, Schema, SerializerConfig};
pub use serializer::{Bound, Serializer};
