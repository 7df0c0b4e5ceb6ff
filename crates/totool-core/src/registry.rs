//! Tool registry for managing available tools

use crate::adapter::{StepToolSet, StructuredTool, step_tool_set, structured_tool};
use crate::error::{Error, Result};
use crate::tool::Tool;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Name-keyed collection of tools for one session
#[derive(Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Create a new tool registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool
    ///
    /// Names are dispatch keys, so a second tool with the same name is rejected.
    pub fn register(&mut self, tool: Arc<dyn Tool>) -> Result<()> {
        let name = tool.name().to_string();
        if self.tools.contains_key(&name) {
            return Err(Error::DuplicateTool(name));
        }
        self.tools.insert(name, tool);
        Ok(())
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// List all registered tools, ordered by name
    pub fn list_tools(&self) -> Vec<Arc<dyn Tool>> {
        self.tools.values().cloned().collect()
    }

    /// Graph-runtime adapters for every registered tool
    pub fn structured_tools(&self) -> Vec<StructuredTool> {
        self.tools.values().cloned().map(structured_tool).collect()
    }

    /// Step-runtime adapters keyed by tool name
    pub fn step_tools(&self) -> StepToolSet {
        step_tool_set(self.tools.values().cloned())
    }

    /// Get the number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.tools.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{RunnableConfig, RuntimeContext};
    use crate::schema::{Field, FieldType, ObjectSchema};
    use crate::tool::{ToolConfig, ToolDefinition};
    use async_trait::async_trait;
    use serde_json::{Value, json};

    struct StaticTool {
        definition: ToolDefinition,
    }

    impl StaticTool {
        fn new(name: &str) -> Arc<dyn Tool> {
            let schema = ObjectSchema::new().field(Field::new("query", FieldType::string()));
            let definition =
                ToolDefinition::new(ToolConfig::new(name, "Static answer", schema, "test")).unwrap();
            Arc::new(Self { definition })
        }
    }

    #[async_trait]
    impl Tool for StaticTool {
        fn definition(&self) -> &ToolDefinition {
            &self.definition
        }

        async fn execute(&self, input: Value, _context: &RuntimeContext) -> Result<Value> {
            Ok(json!({"answer": input["query"]}))
        }
    }

    #[test]
    fn test_register_and_get() {
        let mut registry = ToolRegistry::new();
        assert!(registry.is_empty());

        registry.register(StaticTool::new("notion_search")).unwrap();
        registry.register(StaticTool::new("list-bases")).unwrap();

        assert_eq!(registry.len(), 2);
        assert!(registry.get("notion_search").is_some());
        assert!(registry.get("missing").is_none());

        let names: Vec<_> = registry
            .list_tools()
            .iter()
            .map(|t| t.name().to_string())
            .collect();
        assert_eq!(names, vec!["list-bases", "notion_search"]);
    }

    #[test]
    fn test_duplicate_name_is_rejected() {
        let mut registry = ToolRegistry::new();
        registry.register(StaticTool::new("list-bases")).unwrap();

        let err = registry
            .register(StaticTool::new("list-bases"))
            .unwrap_err();
        assert_eq!(err, Error::DuplicateTool("list-bases".to_string()));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_adapter_sets() {
        let mut registry = ToolRegistry::new();
        registry.register(StaticTool::new("a")).unwrap();
        registry.register(StaticTool::new("b")).unwrap();

        let structured = registry.structured_tools();
        assert_eq!(structured.len(), 2);
        assert_eq!(structured[0].name(), "a");

        let steps = registry.step_tools();
        assert!(steps.contains_key("b"));

        let result = tokio_test::block_on(
            structured[1].invoke(json!({"query": "hello"}), RunnableConfig::new()),
        )
        .unwrap();
        assert_eq!(result, json!({"answer": "hello"}));
    }
}
