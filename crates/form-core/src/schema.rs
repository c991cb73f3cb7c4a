//! Declarative document schema and collect-all validation

use crate::path::FieldPath;
use chrono::{Local, NaiveDate};
use regex::Regex;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Calendar dates travel through the document tree as strings
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Semantic type of a scalar field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    Str,
    Int,
    Date,
}

impl ScalarKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScalarKind::Str => "string",
            ScalarKind::Int => "integer",
            ScalarKind::Date => "date",
        }
    }
}

/// Default injected for an absent optional field
#[derive(Debug, Clone)]
pub enum DefaultValue {
    /// A fixed JSON value
    Fixed(Value),
    /// The current local date, resolved at validation time
    Today,
}

impl DefaultValue {
    fn resolve(&self) -> Value {
        match self {
            DefaultValue::Fixed(value) => value.clone(),
            DefaultValue::Today => {
                Value::String(Local::now().date_naive().format(DATE_FORMAT).to_string())
            }
        }
    }
}

/// Specification of a scalar field
#[derive(Debug, Clone)]
pub struct ScalarSpec {
    pub kind: ScalarKind,
    pub required: bool,
    pub default: Option<DefaultValue>,
    /// Closed enumeration of allowed string values
    pub allowed: Option<Vec<String>>,
    /// Full-match constraint for string fields
    pub pattern: Option<Regex>,
    /// Maximum length in characters for string fields
    pub max_length: Option<usize>,
    /// Lower bound for integer fields
    pub min: Option<i64>,
}

impl ScalarSpec {
    fn new(kind: ScalarKind) -> Self {
        Self {
            kind,
            required: false,
            default: None,
            allowed: None,
            pattern: None,
            max_length: None,
            min: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn default_value(mut self, value: Value) -> Self {
        self.default = Some(DefaultValue::Fixed(value));
        self
    }

    pub fn default_today(mut self) -> Self {
        self.default = Some(DefaultValue::Today);
        self
    }

    pub fn allowed<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// Set a full-match regex constraint. Schemas are static
    /// configuration, so an invalid pattern is a startup panic.
    pub fn pattern(mut self, pattern: &str) -> Self {
        let anchored = format!("^(?:{pattern})$");
        self.pattern = Some(Regex::new(&anchored).expect("schema pattern is not a valid regex"));
        self
    }

    pub fn max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    pub fn min(mut self, min: i64) -> Self {
        self.min = Some(min);
        self
    }
}

/// Specification of an object field: a named map of sub-fields
#[derive(Debug, Clone, Default)]
pub struct ObjectSpec {
    pub required: bool,
    pub fields: BTreeMap<String, FieldSpec>,
}

impl ObjectSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn field(mut self, name: impl Into<String>, spec: impl Into<FieldSpec>) -> Self {
        self.fields.insert(name.into(), spec.into());
        self
    }
}

/// Specification of a homogeneous list of objects
#[derive(Debug, Clone)]
pub struct ListSpec {
    pub required: bool,
    pub min_len: usize,
    pub max_len: usize,
    pub item: ObjectSpec,
}

impl ListSpec {
    pub fn new(item: ObjectSpec) -> Self {
        Self {
            required: false,
            min_len: 0,
            max_len: usize::MAX,
            item,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn length(mut self, min_len: usize, max_len: usize) -> Self {
        self.min_len = min_len;
        self.max_len = max_len;
        self
    }
}

/// A node of the schema tree
#[derive(Debug, Clone)]
pub enum FieldSpec {
    Scalar(ScalarSpec),
    Object(ObjectSpec),
    List(ListSpec),
}

impl FieldSpec {
    pub fn string() -> ScalarSpec {
        ScalarSpec::new(ScalarKind::Str)
    }

    pub fn integer() -> ScalarSpec {
        ScalarSpec::new(ScalarKind::Int)
    }

    pub fn date() -> ScalarSpec {
        ScalarSpec::new(ScalarKind::Date)
    }

    fn required(&self) -> bool {
        match self {
            FieldSpec::Scalar(spec) => spec.required,
            FieldSpec::Object(spec) => spec.required,
            FieldSpec::List(spec) => spec.required,
        }
    }
}

impl From<ScalarSpec> for FieldSpec {
    fn from(spec: ScalarSpec) -> Self {
        FieldSpec::Scalar(spec)
    }
}

impl From<ObjectSpec> for FieldSpec {
    fn from(spec: ObjectSpec) -> Self {
        FieldSpec::Object(spec)
    }
}

impl From<ListSpec> for FieldSpec {
    fn from(spec: ListSpec) -> Self {
        FieldSpec::List(spec)
    }
}

/// A single field-level validation failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("{path}: expected {expected}, got {actual}")]
    TypeMismatch {
        path: String,
        expected: &'static str,
        actual: String,
    },

    #[error("{path}: {rule} constraint violated by {value}")]
    ConstraintViolation {
        path: String,
        rule: String,
        value: String,
    },

    #[error("{path}: required field is missing")]
    MissingField { path: String },
}

/// Aggregate of every violation found across the document tree
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub violations: Vec<Violation>,
}

impl std::error::Error for ValidationError {}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "document validation failed: ")?;
        for (i, violation) in self.violations.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{violation}")?;
        }
        Ok(())
    }
}

/// Validate a raw document against a schema.
///
/// Every violation across the whole tree is collected before failing.
/// On success the returned document has the schema's shape with
/// defaults injected for absent optional fields. Keys the schema does
/// not declare are ignored and passed through unchanged, so validating
/// an already-normalized document is a no-op.
pub fn validate(schema: &ObjectSpec, document: &Value) -> Result<Value, ValidationError> {
    let mut violations = Vec::new();
    let normalized = validate_object(schema, document, &FieldPath::root(), &mut violations);
    if violations.is_empty() {
        Ok(normalized)
    } else {
        Err(ValidationError { violations })
    }
}

fn validate_object(
    spec: &ObjectSpec,
    value: &Value,
    path: &FieldPath,
    violations: &mut Vec<Violation>,
) -> Value {
    let Some(object) = value.as_object() else {
        violations.push(Violation::TypeMismatch {
            path: path.to_string(),
            expected: "object",
            actual: type_name(value).to_string(),
        });
        return value.clone();
    };

    // Unknown keys pass through untouched
    let mut normalized: Map<String, Value> = object.clone();

    for (name, field_spec) in &spec.fields {
        let field_path = path.child(name.as_str());
        match object.get(name) {
            Some(field_value) => {
                let checked = validate_field(field_spec, field_value, &field_path, violations);
                normalized.insert(name.clone(), checked);
            }
            None => match field_spec {
                FieldSpec::Scalar(scalar) if scalar.default.is_some() => {
                    if let Some(default) = &scalar.default {
                        normalized.insert(name.clone(), default.resolve());
                    }
                }
                _ if field_spec.required() => {
                    violations.push(Violation::MissingField {
                        path: field_path.to_string(),
                    });
                }
                _ => {}
            },
        }
    }

    Value::Object(normalized)
}

fn validate_field(
    spec: &FieldSpec,
    value: &Value,
    path: &FieldPath,
    violations: &mut Vec<Violation>,
) -> Value {
    match spec {
        FieldSpec::Scalar(scalar) => {
            validate_scalar(scalar, value, path, violations);
            value.clone()
        }
        FieldSpec::Object(object) => validate_object(object, value, path, violations),
        FieldSpec::List(list) => validate_list(list, value, path, violations),
    }
}

fn validate_scalar(
    spec: &ScalarSpec,
    value: &Value,
    path: &FieldPath,
    violations: &mut Vec<Violation>,
) {
    let mismatch = |violations: &mut Vec<Violation>| {
        violations.push(Violation::TypeMismatch {
            path: path.to_string(),
            expected: spec.kind.as_str(),
            actual: type_name(value).to_string(),
        });
    };

    match spec.kind {
        ScalarKind::Str => {
            let Some(text) = value.as_str() else {
                mismatch(violations);
                return;
            };
            check_string_rules(spec, text, path, violations);
        }
        ScalarKind::Int => {
            let Some(number) = value.as_i64() else {
                mismatch(violations);
                return;
            };
            if let Some(min) = spec.min {
                if number < min {
                    violations.push(Violation::ConstraintViolation {
                        path: path.to_string(),
                        rule: format!("min {min}"),
                        value: number.to_string(),
                    });
                }
            }
        }
        ScalarKind::Date => {
            let Some(text) = value.as_str() else {
                mismatch(violations);
                return;
            };
            if NaiveDate::parse_from_str(text, DATE_FORMAT).is_err() {
                violations.push(Violation::ConstraintViolation {
                    path: path.to_string(),
                    rule: "date format".to_string(),
                    value: text.to_string(),
                });
            }
        }
    }
}

fn check_string_rules(
    spec: &ScalarSpec,
    text: &str,
    path: &FieldPath,
    violations: &mut Vec<Violation>,
) {
    if let Some(allowed) = &spec.allowed {
        if !allowed.iter().any(|candidate| candidate == text) {
            violations.push(Violation::ConstraintViolation {
                path: path.to_string(),
                rule: format!("allowed [{}]", allowed.join(", ")),
                value: text.to_string(),
            });
        }
    }
    if let Some(pattern) = &spec.pattern {
        if !pattern.is_match(text) {
            violations.push(Violation::ConstraintViolation {
                path: path.to_string(),
                rule: format!("pattern {}", pattern.as_str()),
                value: text.to_string(),
            });
        }
    }
    if let Some(max_length) = spec.max_length {
        let length = text.chars().count();
        if length > max_length {
            violations.push(Violation::ConstraintViolation {
                path: path.to_string(),
                rule: format!("max length {max_length}"),
                value: text.to_string(),
            });
        }
    }
}

fn validate_list(
    spec: &ListSpec,
    value: &Value,
    path: &FieldPath,
    violations: &mut Vec<Violation>,
) -> Value {
    let Some(items) = value.as_array() else {
        violations.push(Violation::TypeMismatch {
            path: path.to_string(),
            expected: "list",
            actual: type_name(value).to_string(),
        });
        return value.clone();
    };

    if items.len() < spec.min_len {
        violations.push(Violation::ConstraintViolation {
            path: path.to_string(),
            rule: format!("min length {}", spec.min_len),
            value: items.len().to_string(),
        });
    }
    if items.len() > spec.max_len {
        violations.push(Violation::ConstraintViolation {
            path: path.to_string(),
            rule: format!("max length {}", spec.max_len),
            value: items.len().to_string(),
        });
    }

    let normalized = items
        .iter()
        .enumerate()
        .map(|(index, item)| validate_object(&spec.item, item, &path.child(index), violations))
        .collect();
    Value::Array(normalized)
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}
