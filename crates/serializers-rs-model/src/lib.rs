//! # serializers-rs-model
//!
//! The model-metadata contract for serializers-rs. Provides the
//! backend-agnostic [`Value`](value::Value) enum, column metadata
//! ([`ColumnDef`](columns::ColumnDef), [`ColumnType`](columns::ColumnType),
//! [`ModelMeta`](model::ModelMeta)), and the [`Instance`](model::Instance)
//! trait through which the serializer engine reads runtime attribute
//! values off model objects.
//!
//! This crate has no opinion about where the metadata comes from: an ORM
//! adapter declares a `ModelMeta` per model and implements `Instance` for
//! its row types, and the engine never touches the storage layer.

pub mod columns;
pub mod model;
pub mod value;

pub use columns::{ColumnDef, ColumnType};
pub use model::{AttrValue, Instance, ModelMeta};
pub use value::Value;
