//! Adapters from a [`Tool`] to agent-runtime calling conventions
//!
//! Two runtime shapes are supported:
//!
//! - [`StructuredTool`]: a named, independently invocable unit with a JSON
//!   schema and an async callable, as expected by graph/state-machine
//!   runtimes.
//! - [`StepTool`]: a `{description, parameters, execute}` record keyed by
//!   name in a [`StepToolSet`], as expected by stream-of-steps runtimes.
//!
//! Both are thin views over the same [`invoke`] path, so a tool's business
//! logic lives only in [`Tool::execute`].

use crate::context::{RunnableConfig, RuntimeContext, StepContext};
use crate::error::{Error, Result};
use crate::tool::Tool;
use futures::future::BoxFuture;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Boxed async callable stored inside an adapter
type ToolFn<C> = Arc<dyn Fn(Value, C) -> BoxFuture<'static, Result<Value>> + Send + Sync>;

/// Merge predefined parameters over caller input
///
/// Predefined keys always win; the caller cannot override them.
pub fn merge(
    predefined: Option<&Map<String, Value>>,
    caller: Map<String, Value>,
) -> Map<String, Value> {
    let mut merged = caller;
    if let Some(predefined) = predefined {
        for (key, value) in predefined {
            merged.insert(key.clone(), value.clone());
        }
    }
    merged
}

/// Run a tool the way both adapters do
///
/// Caller values for predefined keys are dropped, the remainder is
/// validated against the exposed schema, merged with the predefined
/// parameters and passed to [`Tool::execute`]. Any failure is logged with
/// the tool name, original input and predefined parameters, then returned
/// unchanged.
pub async fn invoke<T>(tool: &T, input: Value, context: RuntimeContext) -> Result<Value>
where
    T: Tool + ?Sized,
{
    let result = run(tool, &input, &context).await;

    if let Err(err) = &result {
        error!(
            tool = tool.name(),
            input = %input,
            predefined = ?tool.predefined_parameters(),
            error = %err,
            "Error executing tool"
        );
    }

    result
}

async fn run<T>(tool: &T, input: &Value, context: &RuntimeContext) -> Result<Value>
where
    T: Tool + ?Sized,
{
    let Some(caller) = input.as_object() else {
        return Err(Error::InputValidation(format!(
            "Invalid input for {}: expected a JSON object",
            tool.name()
        )));
    };

    let mut caller = caller.clone();
    if let Some(predefined) = tool.predefined_parameters() {
        let overridden: Vec<String> = caller
            .keys()
            .filter(|key| predefined.contains_key(*key))
            .cloned()
            .collect();
        if !overridden.is_empty() {
            warn!(
                tool = tool.name(),
                keys = ?overridden,
                "Ignoring caller values for predefined parameters"
            );
            caller.retain(|key, _| !predefined.contains_key(key));
        }
    }

    let caller = tool
        .input_schema()
        .validate(&Value::Object(caller))
        .map_err(|e| Error::InputValidation(format!("Invalid input for {}: {e}", tool.name())))?;

    let merged = merge(tool.predefined_parameters(), caller);
    debug!(tool = tool.name(), tool_call_id = ?context.tool_call_id(), "Executing tool");

    tool.execute(Value::Object(merged), context).await
}

/// Tool shaped for graph/state-machine runtimes
#[derive(Clone)]
pub struct StructuredTool {
    name: String,
    description: String,
    schema: Value,
    func: ToolFn<RunnableConfig>,
}

impl StructuredTool {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// JSON Schema of the exposed input
    pub fn schema(&self) -> &Value {
        &self.schema
    }

    pub async fn invoke(&self, input: Value, config: RunnableConfig) -> Result<Value> {
        (self.func)(input, config).await
    }
}

impl fmt::Debug for StructuredTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StructuredTool")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}

/// Tool shaped for stream-of-steps runtimes
#[derive(Clone)]
pub struct StepTool {
    description: String,
    parameters: Value,
    execute: ToolFn<StepContext>,
}

impl StepTool {
    pub fn description(&self) -> &str {
        &self.description
    }

    /// JSON Schema of the exposed input
    pub fn parameters(&self) -> &Value {
        &self.parameters
    }

    pub async fn execute(&self, input: Value, context: StepContext) -> Result<Value> {
        (self.execute)(input, context).await
    }
}

impl fmt::Debug for StepTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepTool")
            .field("description", &self.description)
            .field("parameters", &self.parameters)
            .finish_non_exhaustive()
    }
}

/// Name-keyed step tools
pub type StepToolSet = BTreeMap<String, StepTool>;

/// Build the graph-runtime view of a tool
pub fn structured_tool<T>(tool: Arc<T>) -> StructuredTool
where
    T: Tool + ?Sized + 'static,
{
    let name = tool.name().to_string();
    let description = tool.description().to_string();
    let schema = tool.input_schema().to_json_schema();

    let func: ToolFn<RunnableConfig> = Arc::new(
        move |input: Value, config: RunnableConfig| -> BoxFuture<'static, Result<Value>> {
            let tool = Arc::clone(&tool);
            Box::pin(async move {
                invoke(tool.as_ref(), input, RuntimeContext::Runnable(config)).await
            })
        },
    );

    StructuredTool {
        name,
        description,
        schema,
        func,
    }
}

/// Build the step-runtime view of a tool
pub fn step_tool<T>(tool: Arc<T>) -> StepTool
where
    T: Tool + ?Sized + 'static,
{
    let description = tool.description().to_string();
    let parameters = tool.input_schema().to_json_schema();

    let execute: ToolFn<StepContext> = Arc::new(
        move |input: Value, context: StepContext| -> BoxFuture<'static, Result<Value>> {
            let tool = Arc::clone(&tool);
            Box::pin(async move { invoke(tool.as_ref(), input, RuntimeContext::Step(context)).await })
        },
    );

    StepTool {
        description,
        parameters,
        execute,
    }
}

/// Build a name-keyed set of step tools
pub fn step_tool_set<I>(tools: I) -> StepToolSet
where
    I: IntoIterator<Item = Arc<dyn Tool>>,
{
    tools
        .into_iter()
        .map(|tool| (tool.name().to_string(), step_tool(tool)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Field, FieldType, ObjectSchema};
    use crate::tool::{ToolConfig, ToolDefinition};
    use async_trait::async_trait;
    use serde_json::json;
    use std::io;
    use std::sync::Mutex;
    use tracing_subscriber::fmt::MakeWriter;

    /// Returns the merged input it was called with
    struct EchoTool {
        definition: ToolDefinition,
    }

    impl EchoTool {
        fn new(predefined: Option<Value>) -> Self {
            let schema = ObjectSchema::new()
                .field(Field::new("baseId", FieldType::string()))
                .field(Field::new("tableId", FieldType::string()))
                .field(Field::new("fields", FieldType::record(FieldType::any())));
            let definition = ToolDefinition::new(
                ToolConfig::new("create-record", "Create a record", schema, "airtable")
                    .with_predefined_parameters(predefined),
            )
            .unwrap();
            Self { definition }
        }
    }

    #[async_trait]
    impl Tool for EchoTool {
        fn definition(&self) -> &ToolDefinition {
            &self.definition
        }

        async fn execute(&self, input: Value, context: &RuntimeContext) -> Result<Value> {
            Ok(json!({"input": input, "tool_call_id": context.tool_call_id()}))
        }
    }

    struct FailingTool {
        definition: ToolDefinition,
    }

    #[async_trait]
    impl Tool for FailingTool {
        fn definition(&self) -> &ToolDefinition {
            &self.definition
        }

        async fn execute(&self, _input: Value, _context: &RuntimeContext) -> Result<Value> {
            Err(Error::Service("Base or table not found".to_string()))
        }
    }

    fn failing_tool() -> Arc<dyn Tool> {
        let definition = ToolDefinition::new(ToolConfig::new(
            "search-records",
            "Search records",
            ObjectSchema::new().field(Field::new("searchValue", FieldType::string())),
            "airtable",
        ))
        .unwrap();
        Arc::new(FailingTool { definition })
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CapturedLogs {
        type Writer = Self;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn test_merge_predefined_wins() {
        let predefined = json!({"baseId": "base123"}).as_object().cloned().unwrap();
        let caller = json!({"baseId": "other", "tableId": "tbl1"})
            .as_object()
            .cloned()
            .unwrap();

        let merged = merge(Some(&predefined), caller);
        assert_eq!(merged["baseId"], "base123");
        assert_eq!(merged["tableId"], "tbl1");

        let caller = json!({"tableId": "tbl1"}).as_object().cloned().unwrap();
        assert_eq!(merge(None, caller.clone()), caller);
    }

    #[tokio::test]
    async fn test_structured_tool_merges_predefined() {
        let tool = Arc::new(EchoTool::new(Some(json!({"baseId": "base123"}))));
        let adapter = structured_tool(tool);

        assert_eq!(adapter.name(), "create-record");
        assert!(adapter.schema()["properties"].get("baseId").is_none());
        assert!(adapter.schema()["properties"].get("tableId").is_some());

        let result = adapter
            .invoke(
                json!({"tableId": "tbl1", "fields": {"Name": "x"}}),
                RunnableConfig::new(),
            )
            .await
            .unwrap();

        assert_eq!(
            result["input"],
            json!({"baseId": "base123", "tableId": "tbl1", "fields": {"Name": "x"}})
        );
    }

    #[tokio::test]
    async fn test_step_tool_merges_and_passes_context() {
        let tool = Arc::new(EchoTool::new(Some(json!({"baseId": "base123"}))));
        let adapter = step_tool(tool);

        assert_eq!(adapter.description(), "Create a record");
        assert!(adapter.parameters()["properties"].get("baseId").is_none());

        let result = adapter
            .execute(
                json!({"tableId": "tbl1", "fields": {}}),
                StepContext::new("call_42"),
            )
            .await
            .unwrap();

        assert_eq!(result["input"]["baseId"], "base123");
        assert_eq!(result["tool_call_id"], "call_42");
    }

    #[tokio::test]
    async fn test_caller_cannot_override_predefined() {
        let tool = Arc::new(EchoTool::new(Some(json!({"baseId": "base123"}))));
        let adapter = structured_tool(tool);

        let result = adapter
            .invoke(
                json!({"baseId": "evil", "tableId": "tbl1", "fields": {}}),
                RunnableConfig::new(),
            )
            .await
            .unwrap();

        assert_eq!(result["input"]["baseId"], "base123");
    }

    #[tokio::test]
    async fn test_invalid_caller_input_is_rejected() {
        let adapter = structured_tool(Arc::new(EchoTool::new(None)));

        let err = adapter
            .invoke(json!({"baseId": "b", "tableId": 5}), RunnableConfig::new())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InputValidation(_)));

        let err = adapter
            .invoke(json!("not an object"), RunnableConfig::new())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InputValidation(_)));
    }

    #[tokio::test]
    async fn test_adapters_are_idempotent() {
        let tool: Arc<dyn Tool> = Arc::new(EchoTool::new(Some(json!({"baseId": "base123"}))));

        let first = structured_tool(Arc::clone(&tool));
        let second = structured_tool(Arc::clone(&tool));
        assert_eq!(first.name(), second.name());
        assert_eq!(first.description(), second.description());
        assert_eq!(first.schema(), second.schema());

        let input = json!({"tableId": "tbl1", "fields": {}});
        let a = first.invoke(input.clone(), RunnableConfig::new()).await.unwrap();
        let b = second.invoke(input, RunnableConfig::new()).await.unwrap();
        assert_eq!(a, b);

        // producing adapters leaves the tool untouched
        assert_eq!(tool.input_schema().len(), 2);
        assert_eq!(tool.predefined_parameters().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_failure_is_logged_and_propagated_unchanged() {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_ansi(false)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let structured = structured_tool(failing_tool());
        let err = structured
            .invoke(json!({"searchValue": "J"}), RunnableConfig::new())
            .await
            .unwrap_err();
        assert_eq!(err, Error::Service("Base or table not found".to_string()));
        assert_eq!(err.to_string(), "Base or table not found");

        let step = step_tool(failing_tool());
        let err = step
            .execute(json!({"searchValue": "J"}), StepContext::new("call_1"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Base or table not found");

        let output = logs.contents();
        assert!(output.contains("Error executing tool"));
        assert!(output.contains("search-records"));
        assert!(output.contains("searchValue"));
    }

    #[test]
    fn test_step_tool_set_is_keyed_by_name() {
        let tools: Vec<Arc<dyn Tool>> = vec![Arc::new(EchoTool::new(None)), failing_tool()];
        let set = step_tool_set(tools);

        assert_eq!(
            set.keys().map(String::as_str).collect::<Vec<_>>(),
            vec!["create-record", "search-records"]
        );
    }
}
