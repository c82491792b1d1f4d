//! Model metadata and the instance read contract.
//!
//! [`ModelMeta`] is the static, ordered description of a model's columns
//! that the serializer engine resolves its schema from. The [`Instance`]
//! trait is the narrow, read-only interface through which the engine
//! reads runtime attribute values off a persisted model object; any ORM
//! adapter can implement it without exposing its own reflection API.

use crate::columns::ColumnDef;
use crate::value::Value;

/// Static metadata for a model type.
///
/// Column order is significant: the serializer schema, and therefore
/// serialized output key order, follows it.
///
/// # Examples
///
/// ```
/// use std::sync::LazyLock;
/// use serializers_rs_model::columns::{ColumnDef, ColumnType};
/// use serializers_rs_model::model::ModelMeta;
///
/// static USER_META: LazyLock<ModelMeta> = LazyLock::new(|| ModelMeta {
///     model_name: "user",
///     columns: vec![
///         ColumnDef::new("id", ColumnType::Integer).primary_key(),
///         ColumnDef::new("name", ColumnType::Char).max_length(100),
///     ],
/// });
///
/// assert_eq!(USER_META.column("name").unwrap().max_length, Some(100));
/// assert_eq!(USER_META.pk().unwrap().name, "id");
/// ```
#[derive(Debug)]
pub struct ModelMeta {
    /// The model name (e.g. "user").
    pub model_name: &'static str,
    /// Ordered column definitions.
    pub columns: Vec<ColumnDef>,
}

impl ModelMeta {
    /// Looks up a column definition by attribute name.
    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Returns the primary-key column, if one is declared.
    pub fn pk(&self) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.primary_key)
    }
}

/// A runtime attribute value read off a model instance.
///
/// This is what [`Instance::attribute`] hands back to the serializer
/// engine: a plain value, an enumerated member with its underlying
/// scalar, a single related instance, or an ordered collection of
/// related instances.
pub enum AttrValue<'a> {
    /// The instance has no such attribute.
    Missing,
    /// A plain scalar or list value.
    Value(Value),
    /// An enumerated member. Serialization emits `value`, not `member`.
    Enum {
        /// The symbolic member name.
        member: &'static str,
        /// The underlying scalar value.
        value: Value,
    },
    /// A single related model instance.
    Related(&'a dyn Instance),
    /// An ordered collection of related model instances.
    RelatedMany(Vec<&'a dyn Instance>),
}

impl std::fmt::Debug for AttrValue<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing => write!(f, "Missing"),
            Self::Value(v) => write!(f, "Value({v:?})"),
            Self::Enum { member, value } => write!(f, "Enum({member}, {value:?})"),
            Self::Related(inst) => write!(f, "Related({})", inst.meta().model_name),
            Self::RelatedMany(list) => write!(f, "RelatedMany(len={})", list.len()),
        }
    }
}

/// The read-only contract a model instance exposes to the serializer.
///
/// Attribute reads must behave as simple in-memory reads; any lazy
/// materialization is the adapter's concern.
///
/// # Examples
///
/// ```
/// use std::sync::LazyLock;
/// use serializers_rs_model::columns::{ColumnDef, ColumnType};
/// use serializers_rs_model::model::{AttrValue, Instance, ModelMeta};
/// use serializers_rs_model::value::Value;
///
/// static ARTICLE_META: LazyLock<ModelMeta> = LazyLock::new(|| ModelMeta {
///     model_name: "article",
///     columns: vec![
///         ColumnDef::new("id", ColumnType::Integer).primary_key(),
///         ColumnDef::new("title", ColumnType::Char).max_length(200),
///     ],
/// });
///
/// struct Article {
///     id: i64,
///     title: String,
/// }
///
/// impl Instance for Article {
///     fn meta(&self) -> &'static ModelMeta {
///         &ARTICLE_META
///     }
///
///     fn attribute(&self, name: &str) -> AttrValue<'_> {
///         match name {
///             "id" => AttrValue::Value(Value::Int(self.id)),
///             "title" => AttrValue::Value(Value::String(self.title.clone())),
///             _ => AttrValue::Missing,
///         }
///     }
/// }
/// ```
pub trait Instance: Send + Sync {
    /// Returns the static metadata for this instance's model type.
    fn meta(&self) -> &'static ModelMeta;

    /// Reads a runtime attribute value by name.
    fn attribute(&self, name: &str) -> AttrValue<'_>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::columns::ColumnType;
    use std::sync::LazyLock;

    static META: LazyLock<ModelMeta> = LazyLock::new(|| ModelMeta {
        model_name: "widget",
        columns: vec![
            ColumnDef::new("id", ColumnType::Integer).primary_key(),
            ColumnDef::new("label", ColumnType::Char).max_length(10),
        ],
    });

    #[test]
    fn test_column_lookup() {
        assert_eq!(META.column("label").unwrap().max_length, Some(10));
        assert!(META.column("missing").is_none());
    }

    #[test]
    fn test_pk_lookup() {
        assert_eq!(META.pk().unwrap().name, "id");
    }
}
