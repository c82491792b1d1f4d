//! The serializer: validation sweep and instance serialization.
//!
//! A [`Serializer`] is created per request from a shared
//! [`SerializerConfig`]. Construction resolves the field schema once;
//! [`is_valid`](Serializer::is_valid) drives raw JSON input through the
//! field validators, accumulating errors per field without
//! short-circuiting, and [`data`](Serializer::data) walks the schema
//! over the bound instance(s), recursing into nested serializers for
//! relationship fields and computed getters for method fields.
//!
//! Nested serialization never shares mutable state: each recursive call
//! constructs a fresh serializer from the nested configuration with the
//! child instance and the propagated context.

use std::collections::HashMap;
use std::sync::Arc;

use serializers_rs_model::model::{AttrValue, Instance};
use serializers_rs_model::value::Value;

use crate::error::SerializerError;
use crate::fields::FieldKind;
use crate::schema::{self, FieldEntry, Schema, SerializerConfig};

/// What a serializer is bound to for serialization.
pub enum Bound<'a> {
    /// Nothing bound; `data` reads fail.
    None,
    /// A single model instance.
    One(&'a dyn Instance),
    /// An ordered list of model instances.
    Many(Vec<&'a dyn Instance>),
}

/// A per-request serializer bound to a model's resolved field schema.
///
/// # Examples
///
/// ```
/// use std::sync::{Arc, LazyLock};
/// use serializers_rs::schema::SerializerConfig;
/// use serializers_rs::serializer::Serializer;
/// use serializers_rs_model::columns::{ColumnDef, ColumnType};
/// use serializers_rs_model::model::{AttrValue, Instance, ModelMeta};
/// use serializers_rs_model::value::Value;
///
/// static USER_META: LazyLock<ModelMeta> = LazyLock::new(|| ModelMeta {
///     model_name: "user",
///     columns: vec![ColumnDef::new("name", ColumnType::Char).max_length(6)],
/// });
///
/// struct User {
///     name: String,
/// }
///
/// impl Instance for User {
///     fn meta(&self) -> &'static ModelMeta {
///         &USER_META
///     }
///     fn attribute(&self, name: &str) -> AttrValue<'_> {
///         match name {
///             "name" => AttrValue::Value(Value::String(self.name.clone())),
///             _ => AttrValue::Missing,
///         }
///     }
/// }
///
/// let config = Arc::new(SerializerConfig::new(&USER_META));
///
/// let user = User { name: "Fulano".to_string() };
/// let serializer = Serializer::new(Arc::clone(&config))
///     .unwrap()
///     .with_instance(&user);
/// assert_eq!(
///     serializer.data().unwrap(),
///     serde_json::json!({"name": "Fulano"})
/// );
///
/// let mut serializer = Serializer::new(config)
///     .unwrap()
///     .with_data(serde_json::json!({"name": null}));
/// assert!(!serializer.is_valid());
/// assert_eq!(serializer.errors()["name"], vec!["Can't be blank"]);
/// ```
pub struct Serializer<'a> {
    config: Arc<SerializerConfig>,
    schema: Schema,
    bound: Bound<'a>,
    initial_data: serde_json::Map<String, serde_json::Value>,
    many: bool,
    /// Reserved for partial-update semantics; carried through the
    /// constructor surface but does not alter validation.
    partial: bool,
    context: HashMap<String, serde_json::Value>,
    errors: HashMap<String, Vec<String>>,
    validated_data: HashMap<String, Value>,
}

impl<'a> Serializer<'a> {
    /// Creates a serializer from a shared configuration, resolving the
    /// field schema once.
    ///
    /// # Errors
    ///
    /// Returns [`SerializerError::MalformedConfig`] when the
    /// configuration (or a nested one) has no model bound.
    pub fn new(config: Arc<SerializerConfig>) -> Result<Self, SerializerError> {
        let schema = schema::resolve(&config)?;
        Ok(Self {
            config,
            schema,
            bound: Bound::None,
            initial_data: serde_json::Map::new(),
            many: false,
            partial: false,
            context: HashMap::new(),
            errors: HashMap::new(),
            validated_data: HashMap::new(),
        })
    }

    /// Binds a single model instance for serialization.
    #[must_use]
    pub fn with_instance(mut self, instance: &'a dyn Instance) -> Self {
        self.bound = Bound::One(instance);
        self
    }

    /// Binds an ordered list of instances and switches to many mode.
    #[must_use]
    pub fn with_instances(mut self, instances: Vec<&'a dyn Instance>) -> Self {
        self.bound = Bound::Many(instances);
        self.many = true;
        self
    }

    /// Binds raw input data for validation.
    ///
    /// Anything other than a JSON object binds an empty input mapping.
    #[must_use]
    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        if let serde_json::Value::Object(map) = data {
            self.initial_data = map;
        }
        self
    }

    /// Sets the reserved partial flag.
    #[must_use]
    pub const fn with_partial(mut self, partial: bool) -> Self {
        self.partial = partial;
        self
    }

    /// Adds a context entry, passed through to nested serializers.
    #[must_use]
    pub fn with_context(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.context.insert(key.into(), value);
        self
    }

    /// Replaces the whole context mapping.
    #[must_use]
    pub fn with_context_map(mut self, context: HashMap<String, serde_json::Value>) -> Self {
        self.context = context;
        self
    }

    /// Returns the resolved field schema.
    pub const fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Returns `true` if this serializer is in many mode.
    pub const fn many(&self) -> bool {
        self.many
    }

    /// Returns the reserved partial flag.
    pub const fn partial(&self) -> bool {
        self.partial
    }

    /// Returns the context mapping.
    pub const fn context(&self) -> &HashMap<String, serde_json::Value> {
        &self.context
    }

    /// Validates the bound input data against the field schema.
    ///
    /// Every non-excluded field is evaluated regardless of earlier
    /// failures: after one call, `errors` reflects every failing field
    /// and `validated_data` holds the cast value of every passing one.
    /// Returns `true` when `errors` is empty after the sweep.
    ///
    /// Repeated calls without [`clear`](Self::clear) re-evaluate fields
    /// into the same mappings; entries from prior calls stay in place.
    pub fn is_valid(&mut self) -> bool {
        for entry in &self.schema {
            if entry.validator.kind() == FieldKind::Method {
                continue;
            }
            if self.config.is_excluded(&entry.name) {
                continue;
            }

            let raw = self
                .initial_data
                .get(&entry.name)
                .cloned()
                .unwrap_or(serde_json::Value::Null);

            let (valid, messages) = entry.validator.run_validation(&raw);
            if valid {
                self.validated_data
                    .insert(entry.name.clone(), entry.validator.cast(&raw));
            } else {
                tracing::debug!(field = %entry.name, count = messages.len(), "field failed validation");
                self.errors.insert(entry.name.clone(), messages);
            }
        }

        self.errors.is_empty()
    }

    /// Returns per-field validation errors.
    pub const fn errors(&self) -> &HashMap<String, Vec<String>> {
        &self.errors
    }

    /// Returns the validated, cast data from the last sweep.
    pub const fn validated_data(&self) -> &HashMap<String, Value> {
        &self.validated_data
    }

    /// Resets `errors` and `validated_data`, leaving the schema and
    /// bound instance untouched.
    pub fn clear(&mut self) {
        self.errors.clear();
        self.validated_data.clear();
    }

    /// Serializes the bound instance(s) to plain JSON.
    ///
    /// Produces an object in single mode and an array of objects in
    /// many mode, preserving the bound list's order. Keys follow schema
    /// order.
    ///
    /// # Errors
    ///
    /// Returns [`SerializerError::UnboundInstance`] when nothing is
    /// bound.
    pub fn data(&self) -> Result<serde_json::Value, SerializerError> {
        match &self.bound {
            Bound::None => Err(SerializerError::UnboundInstance),
            Bound::One(instance) => Ok(serde_json::Value::Object(
                self.serialize_instance(*instance),
            )),
            Bound::Many(instances) => Ok(serde_json::Value::Array(
                instances
                    .iter()
                    .map(|instance| serde_json::Value::Object(self.serialize_instance(*instance)))
                    .collect(),
            )),
        }
    }

    fn serialize_instance(
        &self,
        instance: &dyn Instance,
    ) -> serde_json::Map<String, serde_json::Value> {
        let mut out = serde_json::Map::new();
        for entry in &self.schema {
            out.insert(entry.name.clone(), self.field_value(instance, entry));
        }
        out
    }

    fn field_value(&self, instance: &dyn Instance, entry: &FieldEntry) -> serde_json::Value {
        if entry.validator.kind() == FieldKind::Method {
            return self
                .config
                .getter(&entry.name)
                .map_or(serde_json::Value::Null, |getter| {
                    getter(instance, &self.context)
                });
        }

        match instance.attribute(&entry.name) {
            AttrValue::Missing => serde_json::Value::Null,
            AttrValue::Value(value) => value.to_json(),
            AttrValue::Enum { value, .. } => value.to_json(),
            AttrValue::Related(child) => match &entry.nested {
                Some(nested) => self.serialize_nested(nested, entry, Bound::One(child)),
                None => pk_value(child),
            },
            AttrValue::RelatedMany(children) => match &entry.nested {
                Some(nested) => self.serialize_nested(nested, entry, Bound::Many(children)),
                None => serde_json::Value::Array(
                    children.iter().map(|child| pk_value(*child)).collect(),
                ),
            },
        }
    }

    fn serialize_nested(
        &self,
        nested: &Arc<SerializerConfig>,
        entry: &FieldEntry,
        bound: Bound<'_>,
    ) -> serde_json::Value {
        let child = match Serializer::new(Arc::clone(nested)) {
            Ok(child) => child,
            Err(err) => {
                tracing::warn!(field = %entry.name, error = %err, "nested serializer misconfigured");
                return serde_json::Value::Null;
            }
        };
        let child = match bound {
            Bound::None => return serde_json::Value::Null,
            Bound::One(instance) => child.with_instance(instance),
            Bound::Many(instances) => child.with_instances(instances),
        };
        child
            .with_context_map(self.context.clone())
            .data()
            .unwrap_or(serde_json::Value::Null)
    }
}

/// Serializes a related instance without a nested serializer as its
/// primary-key scalar; null when the related model declares no primary
/// key.
fn pk_value(instance: &dyn Instance) -> serde_json::Value {
    instance
        .meta()
        .pk()
        .map_or(serde_json::Value::Null, |pk| {
            match instance.attribute(pk.name) {
                AttrValue::Value(value) | AttrValue::Enum { value, .. } => value.to_json(),
                _ => serde_json::Value::Null,
            }
        })
}
