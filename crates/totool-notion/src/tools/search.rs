use super::{call, http_api};
use crate::SERVICE;
use crate::auth::NotionAuth;
use crate::client::{NotionApi, SearchRequest};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use totool_core::schema::{Field, FieldType, ObjectSchema};
use totool_core::{
    Authenticated, Error, Result, RuntimeContext, Tool, ToolConfig, ToolDefinition, to_output,
};
use tracing::debug;

const NAME: &str = "notion_search";
const DESCRIPTION: &str = "Searches all parent or child pages and databases that have been shared with an integration.";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Input {
    query: String,
    page_size: Option<u32>,
    start_cursor: Option<String>,
}

/// Search pages and databases shared with the integration
pub struct SearchTool {
    definition: ToolDefinition,
    auth: NotionAuth,
    api: Arc<dyn NotionApi>,
}

impl SearchTool {
    pub fn new(auth: NotionAuth, predefined_parameters: Option<Value>) -> Result<Self> {
        let api = http_api(&auth);
        Self::with_api(auth, predefined_parameters, api)
    }

    pub fn with_api(
        auth: NotionAuth,
        predefined_parameters: Option<Value>,
        api: Arc<dyn NotionApi>,
    ) -> Result<Self> {
        let schema = ObjectSchema::new()
            .field(
                Field::new("query", FieldType::string())
                    .describe("The search query to find pages and databases"),
            )
            .field(
                Field::new("pageSize", FieldType::integer_in(1, 100))
                    .optional()
                    .describe("The number of items to return per page (default: 100)"),
            )
            .field(
                Field::new("startCursor", FieldType::string())
                    .optional()
                    .describe("The cursor to start the search from (for pagination)"),
            );
        let definition = ToolDefinition::new(
            ToolConfig::new(NAME, DESCRIPTION, schema, SERVICE)
                .with_predefined_parameters(predefined_parameters),
        )?;
        Ok(Self {
            definition,
            auth,
            api,
        })
    }
}

#[async_trait]
impl Tool for SearchTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, input: Value, context: &RuntimeContext) -> Result<Value> {
        let input: Input = self.definition.parse_input(&input)?;
        let request = SearchRequest {
            query: input.query,
            page_size: input.page_size,
            start_cursor: input.start_cursor,
        };

        let response = call(context, self.api.search(request))
            .await?
            .map_err(|e| Error::Service(format!("Notion search failed: {e}")))?;

        debug!(
            tool = NAME,
            results = response.results.len(),
            has_more = response.has_more,
            "Notion search finished"
        );
        to_output(&response)
    }
}

impl Authenticated for SearchTool {
    type Credentials = NotionAuth;

    fn auth(&self) -> &NotionAuth {
        &self.auth
    }
}
