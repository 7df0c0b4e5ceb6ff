//! Input schema algebra
//!
//! A tool's input is described by an [`ObjectSchema`]: an ordered list of
//! named, typed fields. The schema can validate candidate input, derive
//! reduced views of itself (`partial`, `omit`) and render itself as JSON
//! Schema for LLM function-calling metadata.
//!
//! # Example
//!
//! ```
//! use totool_core::schema::{Field, FieldType, ObjectSchema};
//! use serde_json::json;
//!
//! let schema = ObjectSchema::new()
//!     .field(Field::new("baseId", FieldType::string()).describe("The ID of the base"))
//!     .field(Field::new("pageSize", FieldType::integer_in(1, 100)).optional());
//!
//! assert!(schema.validate(&json!({"baseId": "app1"})).is_ok());
//! assert!(schema.validate(&json!({"baseId": 42})).is_err());
//!
//! let exposed = schema.omit(["baseId"]);
//! assert!(!exposed.contains("baseId"));
//! ```

use crate::error::{ValidationError, ValidationIssue};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};

/// Type (and constraints) of a single field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldType {
    /// UTF-8 string, optionally with a minimum length in characters
    String { min_length: Option<usize> },
    /// Any JSON number within the optional bounds
    Number {
        minimum: Option<f64>,
        maximum: Option<f64>,
    },
    /// Whole number within the optional bounds
    Integer {
        minimum: Option<i64>,
        maximum: Option<i64>,
    },
    /// `true` or `false`
    Boolean,
    /// One of a fixed set of strings
    Enum(Vec<String>),
    /// Exactly this string (used as a discriminator)
    Literal(String),
    /// Homogeneous list
    Array {
        items: Box<FieldType>,
        max_items: Option<usize>,
    },
    /// Nested object with its own fields
    Object(ObjectSchema),
    /// String-keyed map whose values share one type
    Record(Box<FieldType>),
    /// Must match at least one of the variants
    OneOf(Vec<FieldType>),
    /// Anything
    Any,
}

impl FieldType {
    pub fn string() -> Self {
        Self::String { min_length: None }
    }

    /// String with at least `min` characters
    pub fn non_empty_string(min: usize) -> Self {
        Self::String {
            min_length: Some(min),
        }
    }

    pub fn number() -> Self {
        Self::Number {
            minimum: None,
            maximum: None,
        }
    }

    pub fn number_in(minimum: f64, maximum: f64) -> Self {
        Self::Number {
            minimum: Some(minimum),
            maximum: Some(maximum),
        }
    }

    pub fn integer() -> Self {
        Self::Integer {
            minimum: None,
            maximum: None,
        }
    }

    pub fn integer_in(minimum: i64, maximum: i64) -> Self {
        Self::Integer {
            minimum: Some(minimum),
            maximum: Some(maximum),
        }
    }

    pub fn boolean() -> Self {
        Self::Boolean
    }

    pub fn enumeration<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Enum(values.into_iter().map(Into::into).collect())
    }

    pub fn literal(value: impl Into<String>) -> Self {
        Self::Literal(value.into())
    }

    pub fn array(items: FieldType) -> Self {
        Self::Array {
            items: Box::new(items),
            max_items: None,
        }
    }

    pub fn array_max(items: FieldType, max_items: usize) -> Self {
        Self::Array {
            items: Box::new(items),
            max_items: Some(max_items),
        }
    }

    pub fn object(schema: ObjectSchema) -> Self {
        Self::Object(schema)
    }

    pub fn record(values: FieldType) -> Self {
        Self::Record(Box::new(values))
    }

    pub fn one_of(variants: Vec<FieldType>) -> Self {
        Self::OneOf(variants)
    }

    pub fn any() -> Self {
        Self::Any
    }

    /// Render this type as a JSON Schema fragment
    pub fn to_json_schema(&self) -> Value {
        match self {
            Self::String { min_length } => {
                let mut schema = json!({"type": "string"});
                if let Some(min) = min_length {
                    schema["minLength"] = json!(min);
                }
                schema
            }
            Self::Number { minimum, maximum } => {
                let mut schema = json!({"type": "number"});
                if let Some(min) = minimum {
                    schema["minimum"] = json!(min);
                }
                if let Some(max) = maximum {
                    schema["maximum"] = json!(max);
                }
                schema
            }
            Self::Integer { minimum, maximum } => {
                let mut schema = json!({"type": "integer"});
                if let Some(min) = minimum {
                    schema["minimum"] = json!(min);
                }
                if let Some(max) = maximum {
                    schema["maximum"] = json!(max);
                }
                schema
            }
            Self::Boolean => json!({"type": "boolean"}),
            Self::Enum(values) => json!({"type": "string", "enum": values}),
            Self::Literal(value) => json!({"type": "string", "const": value}),
            Self::Array { items, max_items } => {
                let mut schema = json!({"type": "array", "items": items.to_json_schema()});
                if let Some(max) = max_items {
                    schema["maxItems"] = json!(max);
                }
                schema
            }
            Self::Object(schema) => schema.to_json_schema(),
            Self::Record(values) => json!({
                "type": "object",
                "additionalProperties": values.to_json_schema(),
            }),
            Self::OneOf(variants) => json!({
                "anyOf": variants.iter().map(FieldType::to_json_schema).collect::<Vec<_>>(),
            }),
            Self::Any => json!({}),
        }
    }

    /// Check `value` against this type, returning the cleaned value
    ///
    /// Nested objects drop keys that their schema does not declare.
    fn check(&self, value: &Value, path: &str, issues: &mut Vec<ValidationIssue>) -> Value {
        match self {
            Self::String { min_length } => match value.as_str() {
                Some(s) => {
                    if let Some(min) = min_length {
                        if s.chars().count() < *min {
                            push(
                                issues,
                                path,
                                format!("must contain at least {min} character(s)"),
                            );
                        }
                    }
                }
                None => push(issues, path, mismatch("string", value)),
            },
            Self::Number { minimum, maximum } => match value.as_f64() {
                Some(n) => check_bounds(n, *minimum, *maximum, path, issues),
                None => push(issues, path, mismatch("number", value)),
            },
            Self::Integer { minimum, maximum } => match whole_number(value) {
                Some(n) => {
                    check_bounds(n, *minimum, *maximum, path, issues);
                    return Value::from(n);
                }
                None => push(issues, path, mismatch("integer", value)),
            },
            Self::Boolean => {
                if !value.is_boolean() {
                    push(issues, path, mismatch("boolean", value));
                }
            }
            Self::Enum(values) => match value.as_str() {
                Some(s) if values.iter().any(|v| v == s) => {}
                _ => push(
                    issues,
                    path,
                    format!("expected one of [{}], got {value}", values.join(", ")),
                ),
            },
            Self::Literal(expected) => {
                if value.as_str() != Some(expected.as_str()) {
                    push(issues, path, format!("expected \"{expected}\", got {value}"));
                }
            }
            Self::Array { items, max_items } => {
                let Some(elements) = value.as_array() else {
                    push(issues, path, mismatch("array", value));
                    return value.clone();
                };
                if let Some(max) = max_items.filter(|max| elements.len() > *max) {
                    push(issues, path, format!("must contain at most {max} item(s)"));
                }
                return Value::Array(
                    elements
                        .iter()
                        .enumerate()
                        .map(|(i, element)| items.check(element, &format!("{path}[{i}]"), issues))
                        .collect(),
                );
            }
            Self::Object(schema) => {
                let Some(object) = value.as_object() else {
                    push(issues, path, mismatch("object", value));
                    return value.clone();
                };
                return Value::Object(schema.check_object(object, path, issues));
            }
            Self::Record(values) => {
                let Some(object) = value.as_object() else {
                    push(issues, path, mismatch("object", value));
                    return value.clone();
                };
                return Value::Object(
                    object
                        .iter()
                        .map(|(key, entry)| {
                            (key.clone(), values.check(entry, &join(path, key), issues))
                        })
                        .collect(),
                );
            }
            Self::OneOf(variants) => {
                for variant in variants {
                    let mut variant_issues = Vec::new();
                    let cleaned = variant.check(value, path, &mut variant_issues);
                    if variant_issues.is_empty() {
                        return cleaned;
                    }
                }
                push(issues, path, "did not match any allowed variant".to_string());
            }
            Self::Any => {}
        }
        value.clone()
    }
}

/// A named field of an object schema
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    name: String,
    ty: FieldType,
    required: bool,
    description: Option<String>,
}

impl Field {
    /// Create a required field
    pub fn new(name: impl Into<String>, ty: FieldType) -> Self {
        Self {
            name: name.into(),
            ty,
            required: true,
            description: None,
        }
    }

    /// Mark the field as optional
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Attach a human-readable description shown to the LLM
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_type(&self) -> &FieldType {
        &self.ty
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// Ordered set of named fields describing a JSON object
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectSchema {
    fields: Vec<Field>,
}

impl ObjectSchema {
    /// Create an empty schema
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field, replacing any existing field with the same name
    pub fn field(mut self, field: Field) -> Self {
        self.fields.retain(|f| f.name != field.name);
        self.fields.push(field);
        self
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Field names in declaration order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Same fields, all optional
    pub fn partial(&self) -> Self {
        Self {
            fields: self
                .fields
                .iter()
                .cloned()
                .map(Field::optional)
                .collect(),
        }
    }

    /// Same schema without the named fields
    pub fn omit<I, S>(&self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keys: Vec<S> = keys.into_iter().collect();
        Self {
            fields: self
                .fields
                .iter()
                .filter(|f| !keys.iter().any(|k| k.as_ref() == f.name))
                .cloned()
                .collect(),
        }
    }

    /// Validate a candidate value
    ///
    /// On success returns the object with undeclared keys removed. An
    /// explicit `null` for an optional field is treated as absent.
    pub fn validate(&self, value: &Value) -> Result<Map<String, Value>, ValidationError> {
        let Some(object) = value.as_object() else {
            return Err(ValidationError::single("", mismatch("object", value)));
        };

        let mut issues = Vec::new();
        let cleaned = self.check_object(object, "", &mut issues);

        if issues.is_empty() {
            Ok(cleaned)
        } else {
            Err(ValidationError::new(issues))
        }
    }

    /// Validate with every field treated as optional
    pub fn validate_partial(&self, value: &Value) -> Result<Map<String, Value>, ValidationError> {
        self.partial().validate(value)
    }

    /// Validate and deserialize into a typed value
    pub fn parse<T: DeserializeOwned>(&self, value: &Value) -> Result<T, ValidationError> {
        let cleaned = self.validate(value)?;
        serde_json::from_value(Value::Object(cleaned))
            .map_err(|e| ValidationError::single("", e.to_string()))
    }

    /// Render as a JSON Schema object
    pub fn to_json_schema(&self) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();

        for field in &self.fields {
            let mut property = field.ty.to_json_schema();
            if let (Some(description), Value::Object(map)) = (&field.description, &mut property) {
                map.insert("description".to_string(), json!(description));
            }
            properties.insert(field.name.clone(), property);

            if field.required {
                required.push(field.name.clone());
            }
        }

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
            "additionalProperties": false,
        })
    }

    fn check_object(
        &self,
        object: &Map<String, Value>,
        path: &str,
        issues: &mut Vec<ValidationIssue>,
    ) -> Map<String, Value> {
        let mut cleaned = Map::new();

        for field in &self.fields {
            let field_path = join(path, &field.name);
            match object.get(&field.name) {
                None | Some(Value::Null) if !field.required => {}
                None => push(issues, &field_path, "is required".to_string()),
                Some(value) => {
                    let checked = field.ty.check(value, &field_path, issues);
                    cleaned.insert(field.name.clone(), checked);
                }
            }
        }

        cleaned
    }
}

/// Integers, including floats such as `10.0` that carry no fraction
#[allow(clippy::float_cmp)]
fn whole_number(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|n| n.trunc() == *n && (i64::MIN as f64..i64::MAX as f64).contains(n))
            .map(|n| n as i64)
    })
}

fn check_bounds<T>(
    n: T,
    minimum: Option<T>,
    maximum: Option<T>,
    path: &str,
    issues: &mut Vec<ValidationIssue>,
) where
    T: PartialOrd + std::fmt::Display,
{
    if let Some(min) = minimum.filter(|min| n < *min) {
        push(issues, path, format!("must be greater than or equal to {min}"));
    }
    if let Some(max) = maximum.filter(|max| n > *max) {
        push(issues, path, format!("must be less than or equal to {max}"));
    }
}

fn push(issues: &mut Vec<ValidationIssue>, path: &str, message: String) {
    issues.push(ValidationIssue {
        path: path.to_string(),
        message,
    });
}

fn join(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{path}.{key}")
    }
}

fn mismatch(expected: &str, value: &Value) -> String {
    let actual = match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    };
    format!("expected {expected}, got {actual}")
}
