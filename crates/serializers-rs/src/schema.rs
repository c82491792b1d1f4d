//! Serializer declaration surface and schema resolution.
//!
//! [`SerializerConfig`] is the declarative description of a serializer:
//! the bound model metadata, an optional field allow-list, the set of
//! names excluded from validation, and per-field overrides (typed
//! validators, nested serializers, computed getters). [`resolve`] turns
//! a configuration into an ordered [`Schema`], inferring a validator per
//! column unless an override takes precedence.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serializers_rs_model::columns::ColumnDef;
use serializers_rs_model::model::{Instance, ModelMeta};

use crate::error::SerializerError;
use crate::fields::FieldValidator;

/// A computed-field getter: reads a value off an instance at
/// serialization time, with access to the serializing serializer's
/// context mapping (propagated from parent serializers during nested
/// serialization). The result is emitted verbatim, never cast.
pub type MethodGetter = Arc<
    dyn Fn(&dyn Instance, &HashMap<String, serde_json::Value>) -> serde_json::Value
        + Send
        + Sync,
>;

/// A per-field override declared on a serializer configuration.
#[derive(Clone)]
pub enum FieldOverride {
    /// An explicit field validator, used verbatim after binding.
    Validator(FieldValidator),
    /// A nested serializer for a relationship field.
    Nested(Arc<SerializerConfig>),
}

/// Declarative configuration for a serializer.
///
/// Mirrors what a hand-written serializer class declares: the model it
/// is bound to, which fields it exposes, which field names validation
/// skips (primary keys by default), and any per-field overrides.
#[derive(Clone)]
pub struct SerializerConfig {
    model: Option<&'static ModelMeta>,
    fields: Option<Vec<String>>,
    exclude: HashSet<String>,
    overrides: Vec<(String, FieldOverride)>,
    getters: HashMap<String, MethodGetter>,
}

impl SerializerConfig {
    /// Creates a configuration bound to the given model metadata.
    ///
    /// Validation excludes `"id"` by default; override the set with
    /// [`with_exclude`](Self::with_exclude) for models whose primary key
    /// is named differently.
    pub fn new(model: &'static ModelMeta) -> Self {
        Self {
            model: Some(model),
            ..Self::default()
        }
    }

    /// Restricts the schema to the given field names (the allow-list).
    ///
    /// Listed names with no backing column are included only when a
    /// matching override is declared, and are never required.
    #[must_use]
    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    /// Replaces the set of field names excluded from validation.
    #[must_use]
    pub fn with_exclude<I, S>(mut self, exclude: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude = exclude.into_iter().map(Into::into).collect();
        self
    }

    /// Declares an explicit validator for a field, taking precedence
    /// over type inference.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, validator: FieldValidator) -> Self {
        self.overrides
            .push((name.into(), FieldOverride::Validator(validator)));
        self
    }

    /// Declares a nested serializer for a relationship field.
    #[must_use]
    pub fn with_nested(mut self, name: impl Into<String>, nested: Arc<Self>) -> Self {
        self.overrides
            .push((name.into(), FieldOverride::Nested(nested)));
        self
    }

    /// Declares a computed field populated by `getter` at serialization
    /// time.
    ///
    /// Computed fields have no backing column, so they only appear in
    /// the schema when named in the allow-list. They are excluded from
    /// validation entirely.
    #[must_use]
    pub fn with_computed<F>(mut self, name: impl Into<String>, getter: F) -> Self
    where
        F: Fn(&dyn Instance, &HashMap<String, serde_json::Value>) -> serde_json::Value
            + Send
            + Sync
            + 'static,
    {
        let name = name.into();
        self.getters.insert(name.clone(), Arc::new(getter));
        self.overrides
            .push((name, FieldOverride::Validator(FieldValidator::method())));
        self
    }

    /// Returns the bound model metadata, if any.
    pub const fn model(&self) -> Option<&'static ModelMeta> {
        self.model
    }

    /// Returns `true` if validation skips the given field name.
    pub fn is_excluded(&self, name: &str) -> bool {
        self.exclude.contains(name)
    }

    /// Returns the computed-field getter for a name, if declared.
    pub fn getter(&self, name: &str) -> Option<&MethodGetter> {
        self.getters.get(name)
    }

    fn override_for(&self, name: &str) -> Option<&FieldOverride> {
        self.overrides
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, ov)| ov)
    }

    fn allows(&self, name: &str) -> bool {
        self.fields
            .as_ref()
            .map_or(true, |fields| fields.iter().any(|f| f == name))
    }
}

impl Default for SerializerConfig {
    /// An unbound configuration. Constructing a serializer from it fails
    /// with [`SerializerError::MalformedConfig`].
    fn default() -> Self {
        Self {
            model: None,
            fields: None,
            exclude: HashSet::from(["id".to_string()]),
            overrides: Vec::new(),
            getters: HashMap::new(),
        }
    }
}

/// One resolved schema entry: a field name, its required flag, the bound
/// validator, and the nested serializer configuration for relationship
/// fields.
#[derive(Clone)]
pub struct FieldEntry {
    /// The exposed field name.
    pub name: String,
    /// Whether validation treats the field as required (non-nullable
    /// column). Declared-only fields are never required.
    pub required: bool,
    /// The bound field validator.
    pub validator: FieldValidator,
    /// Nested serializer configuration, for relationship fields with a
    /// declared nested override.
    pub nested: Option<Arc<SerializerConfig>>,
}

/// An ordered field schema resolved from a serializer configuration.
///
/// Entry order mirrors column declaration order, with declared-only
/// fields appended; serialized output keys follow it.
#[derive(Clone, Default)]
pub struct Schema {
    entries: Vec<FieldEntry>,
}

impl Schema {
    /// Iterates entries in schema order.
    pub fn iter(&self) -> std::slice::Iter<'_, FieldEntry> {
        self.entries.iter()
    }

    /// Looks up an entry by field name.
    pub fn get(&self, name: &str) -> Option<&FieldEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the schema has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a Schema {
    type Item = &'a FieldEntry;
    type IntoIter = std::slice::Iter<'a, FieldEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Resolves a serializer configuration into an ordered field schema.
///
/// Columns are walked in metadata order; a declared override wins over
/// type inference and is bound to the column it serves. Allow-listed
/// names with no backing column but a declared override are appended
/// after the metadata-backed entries, never required.
pub fn resolve(config: &SerializerConfig) -> Result<Schema, SerializerError> {
    let meta = config.model().ok_or_else(|| {
        SerializerError::MalformedConfig("no model bound to serializer configuration".to_string())
    })?;

    let mut entries = Vec::new();
    for column in &meta.columns {
        if !config.allows(column.name) {
            continue;
        }
        let (validator, nested) = match config.override_for(column.name) {
            Some(ov) => bind_override(ov, column.name, Some(column))?,
            None => (infer_validator(column), None),
        };
        entries.push(FieldEntry {
            name: column.name.to_string(),
            required: !column.null,
            validator,
            nested,
        });
    }

    if let Some(fields) = &config.fields {
        for name in fields {
            if entries.iter().any(|e| &e.name == name) {
                continue;
            }
            let Some(ov) = config.override_for(name) else {
                continue;
            };
            let (validator, nested) = bind_override(ov, name, None)?;
            entries.push(FieldEntry {
                name: name.clone(),
                required: false,
                validator,
                nested,
            });
        }
    }

    tracing::debug!(
        model = meta.model_name,
        fields = entries.len(),
        "resolved serializer schema"
    );

    Ok(Schema { entries })
}

fn bind_override(
    ov: &FieldOverride,
    name: &str,
    column: Option<&ColumnDef>,
) -> Result<(FieldValidator, Option<Arc<SerializerConfig>>), SerializerError> {
    match ov {
        FieldOverride::Validator(validator) => {
            let mut validator = validator.clone();
            validator.bind(name, column);
            Ok((validator, None))
        }
        FieldOverride::Nested(nested) => {
            if nested.model().is_none() {
                return Err(SerializerError::MalformedConfig(format!(
                    "nested serializer for field '{name}' has no model bound"
                )));
            }
            let mut validator = FieldValidator::base();
            validator.bind(name, column);
            Ok((validator, Some(Arc::clone(nested))))
        }
    }
}

fn infer_validator(column: &ColumnDef) -> FieldValidator {
    let mut validator = if column.column_type.is_string_like() {
        FieldValidator::string()
    } else if column.column_type.is_integer_like() {
        FieldValidator::integer()
    } else if column.column_type.is_boolean_like() {
        FieldValidator::boolean()
    } else {
        FieldValidator::base()
    };
    validator.bind(column.name, Some(column));
    validator
}
