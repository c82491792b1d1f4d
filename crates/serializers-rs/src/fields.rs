//! Field validators: per-kind casting plus ordered validation checks.
//!
//! A [`FieldValidator`] pairs a total cast function with an explicit,
//! ordered list of [`Check`]s assembled at construction — base checks
//! first, kind-specific checks appended, custom checks after those. The
//! cast never fails: input a transport layer could plausibly deliver
//! either coerces to the field's kind or passes through unchanged, where
//! the kind's check reports it.

use std::fmt;
use std::sync::Arc;

use serializers_rs_model::columns::ColumnDef;
use serializers_rs_model::value::Value;

use crate::error::ValidationError;

/// The kind of a field validator, determining its cast and checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Identity cast, required check only.
    Base,
    /// Casts a fixed token set to booleans.
    Boolean,
    /// Coerces numbers, numeric strings, and booleans to integers.
    Integer,
    /// Stringifies input; enforces the column's length limit.
    String,
    /// Computed field marker; never cast or validated.
    Method,
}

/// A single validation check against one field value.
///
/// Checks receive the original raw input (for emptiness semantics that
/// casting would distort), the cast value, and the bound column
/// metadata. Every registered check runs; failures accumulate.
pub trait Check: Send + Sync + fmt::Debug {
    /// Runs the check, returning a [`ValidationError`] on failure.
    fn check(
        &self,
        raw: &serde_json::Value,
        cast: &Value,
        column: Option<&ColumnDef>,
    ) -> Result<(), ValidationError>;

    /// Returns a short name identifying this check.
    fn name(&self) -> &str;
}

/// Fails when the column is non-nullable and the raw input is null or an
/// empty string.
///
/// Inspects the raw value, not the cast one: the string cast turns null
/// into `""` and the integer cast turns it into `0`, either of which
/// would hide the blankness.
#[derive(Debug, Clone, Copy)]
pub struct RequiredCheck;

impl Check for RequiredCheck {
    fn check(
        &self,
        raw: &serde_json::Value,
        _cast: &Value,
        column: Option<&ColumnDef>,
    ) -> Result<(), ValidationError> {
        let required = column.is_some_and(|c| !c.null);
        let blank = raw.is_null() || raw.as_str().is_some_and(str::is_empty);
        if required && blank {
            return Err(ValidationError::new("Can't be blank", "required"));
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "required_and_filled"
    }
}

/// Fails when the boolean cast did not produce a boolean, i.e. the input
/// was outside both token sets.
#[derive(Debug, Clone, Copy)]
pub struct BooleanCheck;

impl Check for BooleanCheck {
    fn check(
        &self,
        _raw: &serde_json::Value,
        cast: &Value,
        _column: Option<&ColumnDef>,
    ) -> Result<(), ValidationError> {
        if matches!(cast, Value::Bool(_)) {
            Ok(())
        } else {
            Err(ValidationError::new("Not a valid boolean", "invalid_boolean"))
        }
    }

    fn name(&self) -> &str {
        "is_a_valid_boolean"
    }
}

/// Fails when the integer cast did not produce an integer.
///
/// This makes uncastable integer input a recoverable field error rather
/// than an aborted validation run, consistent with how every other field
/// kind reports bad input.
#[derive(Debug, Clone, Copy)]
pub struct IntegerCheck;

impl Check for IntegerCheck {
    fn check(
        &self,
        _raw: &serde_json::Value,
        cast: &Value,
        _column: Option<&ColumnDef>,
    ) -> Result<(), ValidationError> {
        if matches!(cast, Value::Int(_)) {
            Ok(())
        } else {
            Err(ValidationError::new("Not a valid integer", "invalid_integer"))
        }
    }

    fn name(&self) -> &str {
        "is_a_valid_integer"
    }
}

/// Fails when the column declares a max length and the cast string
/// exceeds it. Length is counted in characters, not bytes, matching
/// the column's character limit.
#[derive(Debug, Clone, Copy)]
pub struct MaxLengthCheck;

impl Check for MaxLengthCheck {
    fn check(
        &self,
        _raw: &serde_json::Value,
        cast: &Value,
        column: Option<&ColumnDef>,
    ) -> Result<(), ValidationError> {
        let Some(limit) = column.and_then(|c| c.max_length) else {
            return Ok(());
        };
        if let Value::String(s) = cast {
            if s.chars().count() > limit {
                return Err(ValidationError::new(
                    format!("Limit of characters is {limit}"),
                    "max_length",
                ));
            }
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "length_is_under_limit"
    }
}

/// A field validator: one total cast plus an ordered set of checks.
///
/// The schema resolver binds `name` and `column` when it places a
/// validator into a schema, so a validator declared as an override can
/// be constructed before it knows which column it will serve.
#[derive(Debug, Clone)]
pub struct FieldValidator {
    /// The field name this validator is bound to.
    pub name: String,
    /// The bound column metadata, if the field is metadata-backed.
    pub column: Option<ColumnDef>,
    kind: FieldKind,
    checks: Vec<Arc<dyn Check>>,
}

impl FieldValidator {
    /// Creates a validator of the given kind with its built-in checks.
    ///
    /// Check order is fixed at construction: the required check first,
    /// then the kind-specific check. [`FieldKind::Method`] carries no
    /// checks at all.
    pub fn new(kind: FieldKind) -> Self {
        let mut checks: Vec<Arc<dyn Check>> = Vec::new();
        if kind != FieldKind::Method {
            checks.push(Arc::new(RequiredCheck));
        }
        match kind {
            FieldKind::Boolean => checks.push(Arc::new(BooleanCheck)),
            FieldKind::Integer => checks.push(Arc::new(IntegerCheck)),
            FieldKind::String => checks.push(Arc::new(MaxLengthCheck)),
            FieldKind::Base | FieldKind::Method => {}
        }
        Self {
            name: String::new(),
            column: None,
            kind,
            checks,
        }
    }

    /// Creates a base validator (identity cast, required check only).
    pub fn base() -> Self {
        Self::new(FieldKind::Base)
    }

    /// Creates a boolean validator.
    pub fn boolean() -> Self {
        Self::new(FieldKind::Boolean)
    }

    /// Creates an integer validator.
    pub fn integer() -> Self {
        Self::new(FieldKind::Integer)
    }

    /// Creates a string validator.
    pub fn string() -> Self {
        Self::new(FieldKind::String)
    }

    /// Creates a computed-field marker.
    pub fn method() -> Self {
        Self::new(FieldKind::Method)
    }

    /// Returns this validator's kind.
    pub const fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Appends a custom check after the built-in ones.
    #[must_use]
    pub fn with_check(mut self, check: Arc<dyn Check>) -> Self {
        self.checks.push(check);
        self
    }

    /// Binds this validator to a field name and its column metadata.
    pub fn bind(&mut self, name: &str, column: Option<&ColumnDef>) {
        self.name = name.to_string();
        self.column = column.cloned();
    }

    /// Casts a raw JSON value to this validator's kind.
    ///
    /// Total over any input: values outside the kind's domain pass
    /// through unchanged for the checks to detect.
    pub fn cast(&self, raw: &serde_json::Value) -> Value {
        match self.kind {
            FieldKind::Boolean => cast_boolean(raw),
            FieldKind::Integer => cast_integer(raw),
            FieldKind::String => cast_string(raw),
            FieldKind::Base | FieldKind::Method => Value::from_json(raw),
        }
    }

    /// Casts once, then runs every check in order against the result.
    ///
    /// All checks run regardless of earlier failures; the returned list
    /// holds every failure message. [`FieldKind::Method`] fields skip
    /// validation entirely.
    pub fn run_validation(&self, raw: &serde_json::Value) -> (bool, Vec<String>) {
        if self.kind == FieldKind::Method {
            return (true, Vec::new());
        }

        let cast = self.cast(raw);
        let mut errors = Vec::new();
        for check in &self.checks {
            if let Err(err) = check.check(raw, &cast, self.column.as_ref()) {
                tracing::trace!(
                    field = %self.name,
                    check = check.name(),
                    "validation check failed"
                );
                errors.push(err.message);
            }
        }

        (errors.is_empty(), errors)
    }
}

// Numeric tokens compare by value: 1 and 1.0 are the same token.
#[allow(clippy::float_cmp)]
fn cast_boolean(raw: &serde_json::Value) -> Value {
    match raw {
        serde_json::Value::Bool(b) => Value::Bool(*b),
        serde_json::Value::Number(n) if n.as_f64() == Some(1.0) => Value::Bool(true),
        serde_json::Value::Number(n) if n.as_f64() == Some(0.0) => Value::Bool(false),
        serde_json::Value::String(s) => match s.as_str() {
            "True" | "T" | "true" | "t" | "1" => Value::Bool(true),
            "False" | "F" | "false" | "f" | "0" => Value::Bool(false),
            _ => Value::from_json(raw),
        },
        _ => Value::from_json(raw),
    }
}

fn cast_integer(raw: &serde_json::Value) -> Value {
    match raw {
        serde_json::Value::Null => Value::Int(0),
        serde_json::Value::Bool(b) => Value::Int(i64::from(*b)),
        serde_json::Value::Number(n) => n.as_i64().map_or_else(
            || {
                n.as_f64()
                    .map_or_else(|| Value::from_json(raw), |f| Value::Int(f as i64))
            },
            Value::Int,
        ),
        serde_json::Value::String(s) => s
            .parse::<i64>()
            .map_or_else(|_| Value::from_json(raw), Value::Int),
        _ => Value::from_json(raw),
    }
}

fn cast_string(raw: &serde_json::Value) -> Value {
    match raw {
        serde_json::Value::Null => Value::String(String::new()),
        serde_json::Value::String(s) => Value::String(s.clone()),
        other => Value::String(other.to_string()),
    }
}
