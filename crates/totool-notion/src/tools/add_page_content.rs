use super::{call, http_api};
use crate::SERVICE;
use crate::auth::NotionAuth;
use crate::blocks::BlockContent;
use crate::client::NotionApi;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use totool_core::schema::{Field, FieldType, ObjectSchema};
use totool_core::{
    Authenticated, Error, Result, RuntimeContext, Tool, ToolConfig, ToolDefinition,
    ensure_present, to_output,
};
use tracing::{debug, warn};

const NAME: &str = "notion_add_page_content";
const DESCRIPTION: &str = "Adds new content blocks to a Notion page, supporting various content types like paragraphs, headings, and lists.";

/// Most blocks one append request may carry
pub const MAX_BLOCKS: usize = 100;

#[derive(Debug, Deserialize)]
struct Input {
    block_id: String,
    children: Vec<BlockContent>,
}

#[derive(Debug, Serialize)]
struct Output {
    results: Vec<Value>,
}

/// Append content blocks to an existing page or block
pub struct AddPageContentTool {
    definition: ToolDefinition,
    auth: NotionAuth,
    api: Arc<dyn NotionApi>,
}

impl AddPageContentTool {
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
                Field::new("block_id", FieldType::string())
                    .describe("The ID of the block to add content to"),
            )
            .field(
                Field::new(
                    "children",
                    FieldType::array_max(BlockContent::schema(), MAX_BLOCKS),
                )
                .describe("Array of content blocks to add (max 100)"),
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

    async fn append(&self, input: &Input, context: &RuntimeContext) -> Result<Vec<Value>> {
        let found = call(context, self.api.retrieve_block(&input.block_id)).await?;
        if let Err(e) = found {
            warn!(tool = NAME, block_id = %input.block_id, error = %e, "Block lookup failed");
            return Err(Error::Service(format!(
                "Block with ID {} not found or not accessible",
                input.block_id
            )));
        }

        let children = input.children.iter().map(BlockContent::to_request).collect();
        call(
            context,
            self.api.append_block_children(&input.block_id, children),
        )
        .await?
        .map_err(|e| Error::Service(e.to_string()))
    }
}

#[async_trait]
impl Tool for AddPageContentTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, input: Value, context: &RuntimeContext) -> Result<Value> {
        let input: Input = self.definition.parse_input(&input)?;
        ensure_present(&input.block_id, "Block ID is required")?;

        let results = match self.append(&input, context).await {
            Ok(results) => results,
            Err(Error::Service(message)) => {
                return Err(Error::Service(format!(
                    "Failed to add content to Notion page: {message}"
                )));
            }
            Err(e) => return Err(e),
        };

        debug!(tool = NAME, appended = results.len(), "Appended Notion blocks");
        to_output(&Output { results })
    }
}

impl Authenticated for AddPageContentTool {
    type Credentials = NotionAuth;

    fn auth(&self) -> &NotionAuth {
        &self.auth
    }
}
