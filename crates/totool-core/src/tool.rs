//! Tool trait and definition

use crate::context::RuntimeContext;
use crate::error::{Error, Result, ValidationError, ValidationIssue};
use crate::schema::ObjectSchema;
use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::debug;

/// Everything needed to define a tool, before validation
///
/// # Example
///
/// ```
/// use totool_core::{ToolConfig, ToolDefinition};
/// use totool_core::schema::{Field, FieldType, ObjectSchema};
/// use serde_json::json;
///
/// let schema = ObjectSchema::new()
///     .field(Field::new("baseId", FieldType::string()))
///     .field(Field::new("tableId", FieldType::string()));
///
/// let definition = ToolDefinition::new(
///     ToolConfig::new("list-records", "List records", schema, "airtable")
///         .with_predefined_parameters(Some(json!({"baseId": "base123"}))),
/// )
/// .unwrap();
///
/// assert!(!definition.input_schema().contains("baseId"));
/// ```
#[derive(Debug, Clone)]
pub struct ToolConfig {
    pub name: String,
    pub description: String,
    pub input_schema: ObjectSchema,
    pub service: String,
    pub predefined_parameters: Option<Value>,
}

impl ToolConfig {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        input_schema: ObjectSchema,
        service: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
            service: service.into(),
            predefined_parameters: None,
        }
    }

    /// Pin some input fields to fixed values, hiding them from the caller
    pub fn with_predefined_parameters(mut self, predefined: Option<Value>) -> Self {
        self.predefined_parameters = predefined;
        self
    }
}

/// Validated, immutable identity and schema partition of a tool
///
/// The stored input schema is the *exposed* one: the full schema minus the
/// predefined keys. The full schema is kept for validating merged input.
#[derive(Debug, Clone)]
pub struct ToolDefinition {
    name: String,
    description: String,
    service: String,
    full_schema: ObjectSchema,
    exposed_schema: ObjectSchema,
    predefined_parameters: Option<Map<String, Value>>,
}

impl ToolDefinition {
    /// Validate a [`ToolConfig`] and partition its schema
    ///
    /// Fails with [`Error::ConstructionValidation`] when the name or
    /// description is empty, or when a predefined parameter is not an
    /// object, names an unknown field, is `null`, or does not validate
    /// against its field in the original schema.
    pub fn new(config: ToolConfig) -> Result<Self> {
        let ToolConfig {
            name,
            description,
            input_schema,
            service,
            predefined_parameters,
        } = config;

        let mut issues = Vec::new();
        if name.trim().is_empty() {
            issues.push(issue("name", "must not be empty"));
        }
        if description.trim().is_empty() {
            issues.push(issue("description", "must not be empty"));
        }
        if !issues.is_empty() {
            return Err(Error::ConstructionValidation(ValidationError::new(issues)));
        }

        let predefined = predefined_parameters
            .map(|value| validate_predefined(&input_schema, &value))
            .transpose()?;

        let exposed_schema = match &predefined {
            Some(predefined) => input_schema.omit(predefined.keys()),
            None => input_schema.clone(),
        };

        debug!(
            tool = %name,
            parameters = %exposed_schema.to_json_schema(),
            "Exposed parameters"
        );
        debug!(tool = %name, predefined = ?predefined, "Predefined parameters");

        Ok(Self {
            name,
            description,
            service,
            full_schema: input_schema,
            exposed_schema,
            predefined_parameters: predefined,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    /// Schema presented to the calling runtime
    pub fn input_schema(&self) -> &ObjectSchema {
        &self.exposed_schema
    }

    /// Schema the tool was declared with, predefined fields included
    pub fn full_schema(&self) -> &ObjectSchema {
        &self.full_schema
    }

    pub fn predefined_parameters(&self) -> Option<&Map<String, Value>> {
        self.predefined_parameters.as_ref()
    }

    /// Validate merged input against the full schema and deserialize it
    pub fn parse_input<T: DeserializeOwned>(&self, input: &Value) -> Result<T> {
        self.full_schema
            .parse(input)
            .map_err(|e| Error::InputValidation(format!("Invalid input for {}: {e}", self.name)))
    }
}

fn validate_predefined(schema: &ObjectSchema, value: &Value) -> Result<Map<String, Value>> {
    let Some(predefined) = value.as_object() else {
        return Err(Error::ConstructionValidation(ValidationError::single(
            "predefinedParameters",
            "must be an object",
        )));
    };

    let mut issues = Vec::new();
    for (key, value) in predefined {
        if !schema.contains(key) {
            issues.push(issue(key, "is not a field of this tool"));
        } else if value.is_null() {
            issues.push(issue(key, "predefined value must not be null"));
        }
    }
    if !issues.is_empty() {
        return Err(Error::ConstructionValidation(ValidationError::new(issues)));
    }

    schema
        .validate_partial(value)
        .map_err(Error::ConstructionValidation)
}

fn issue(path: &str, message: &str) -> ValidationIssue {
    ValidationIssue {
        path: path.to_string(),
        message: message.to_string(),
    }
}

/// Trait implemented by every concrete tool
///
/// Tools are stateless after construction and shared behind `Arc`, so
/// concurrent invocations never contend on anything.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Identity, schemas and predefined parameters
    fn definition(&self) -> &ToolDefinition;

    /// Perform the tool's service call
    ///
    /// `input` is the merged input: predefined parameters plus caller
    /// values. Implementations validate business constraints beyond the
    /// schema and map every upstream failure to a descriptive error.
    async fn execute(&self, input: Value, context: &RuntimeContext) -> Result<Value>;

    /// Dispatch key, unique within a registry
    fn name(&self) -> &str {
        self.definition().name()
    }

    /// Text the LLM uses to decide when to call the tool
    fn description(&self) -> &str {
        self.definition().description()
    }

    fn service(&self) -> &str {
        self.definition().service()
    }

    /// Exposed schema (predefined fields removed)
    fn input_schema(&self) -> &ObjectSchema {
        self.definition().input_schema()
    }

    fn predefined_parameters(&self) -> Option<&Map<String, Value>> {
        self.definition().predefined_parameters()
    }
}

/// Access to the credential a tool was built with
///
/// Useful for constructing sibling tools that share one credential.
pub trait Authenticated {
    type Credentials;

    fn auth(&self) -> &Self::Credentials;
}

/// Serialize a typed tool result into the JSON handed back to the runtime
pub fn to_output<T: Serialize>(value: &T) -> Result<Value> {
    serde_json::to_value(value)
        .map_err(|e| Error::Service(format!("Failed to serialize tool output: {e}")))
}

/// Reject blank identifiers with the given message
pub fn ensure_present(value: &str, message: &str) -> Result<()> {
    if value.trim().is_empty() {
        Err(Error::InputValidation(message.to_string()))
    } else {
        Ok(())
    }
}
