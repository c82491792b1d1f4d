//! Column metadata for model fields.
//!
//! [`ColumnDef`] describes a single model attribute the way the
//! serializer engine needs to see it: its storage type, nullability,
//! optional length limit, and whether it is the primary key. The
//! [`ColumnType`] enum covers the scalar kinds the engine dispatches on
//! plus relationship kinds carrying a target model and cardinality.

/// The storage type of a model column.
///
/// Scalar variants determine which field validator the schema resolver
/// infers; relationship variants carry the target model name and
/// cardinality for nested serialization.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type")]
pub enum ColumnType {
    /// Variable-length string with an optional max length on the column.
    Char,
    /// Unlimited-length text.
    Text,
    /// 32-bit signed integer.
    Integer,
    /// 64-bit signed integer.
    BigInteger,
    /// Boolean (true/false).
    Boolean,
    /// 64-bit floating-point number.
    Float,
    /// Date without time.
    Date,
    /// Date and time.
    DateTime,
    /// UUID column.
    Uuid,
    /// JSON document column.
    Json,
    /// Enumerated column restricted to a fixed set of members.
    Enum {
        /// The allowed member names.
        choices: Vec<String>,
    },
    /// Many-to-one relationship to another model.
    ForeignKey {
        /// The target model name.
        to: String,
    },
    /// One-to-one relationship to another model.
    OneToOne {
        /// The target model name.
        to: String,
    },
    /// One-to-many reverse relationship holding a collection.
    OneToMany {
        /// The target model name.
        to: String,
    },
}

impl ColumnType {
    /// Returns `true` for string-backed column types.
    pub const fn is_string_like(&self) -> bool {
        matches!(self, Self::Char | Self::Text)
    }

    /// Returns `true` for integer-backed column types.
    pub const fn is_integer_like(&self) -> bool {
        matches!(self, Self::Integer | Self::BigInteger)
    }

    /// Returns `true` for boolean column types.
    pub const fn is_boolean_like(&self) -> bool {
        matches!(self, Self::Boolean)
    }

    /// Returns `true` if this column represents a relationship.
    pub const fn is_relation(&self) -> bool {
        matches!(
            self,
            Self::ForeignKey { .. } | Self::OneToOne { .. } | Self::OneToMany { .. }
        )
    }

    /// Returns the relationship target model name, if any.
    pub fn relation_target(&self) -> Option<&str> {
        match self {
            Self::ForeignKey { to } | Self::OneToOne { to } | Self::OneToMany { to } => {
                Some(to.as_str())
            }
            _ => None,
        }
    }

    /// Returns `true` if this relationship holds a collection.
    pub const fn relation_many(&self) -> bool {
        matches!(self, Self::OneToMany { .. })
    }
}

/// Definition of a single model column.
///
/// Captures the metadata the serializer engine reads: the attribute
/// name, storage type, nullability, optional character limit, and the
/// primary-key marker used when a relation is serialized without a
/// nested serializer.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef {
    /// The attribute name of this column.
    pub name: &'static str,
    /// The storage type of this column.
    pub column_type: ColumnType,
    /// Whether NULL is allowed.
    pub null: bool,
    /// Maximum character length (string columns).
    pub max_length: Option<usize>,
    /// Whether this column is the primary key.
    pub primary_key: bool,
}

impl ColumnDef {
    /// Creates a new `ColumnDef` with sensible defaults.
    ///
    /// The column is non-nullable, not a primary key, and has no length
    /// limit.
    pub const fn new(name: &'static str, column_type: ColumnType) -> Self {
        Self {
            name,
            column_type,
            null: false,
            max_length: None,
            primary_key: false,
        }
    }

    /// Allows NULL values in this column.
    #[must_use]
    pub const fn nullable(mut self) -> Self {
        self.null = true;
        self
    }

    /// Sets the maximum character length.
    #[must_use]
    pub const fn max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    /// Marks this column as the primary key.
    #[must_use]
    pub const fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }
}
