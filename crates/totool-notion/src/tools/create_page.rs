use super::{call, http_api};
use crate::SERVICE;
use crate::auth::NotionAuth;
use crate::client::NotionApi;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;
use std::sync::Arc;
use totool_core::schema::{Field, FieldType, ObjectSchema};
use totool_core::{
    Authenticated, Error, Result, RuntimeContext, Tool, ToolConfig, ToolDefinition,
    ensure_present, to_output,
};
use tracing::info;

const NAME: &str = "notion_create_page";
const DESCRIPTION: &str =
    "Creates a new page in Notion as a child of an existing page or database.";

#[derive(Debug, Deserialize)]
struct Input {
    parent_id: String,
    title: String,
    #[serde(default)]
    properties: BTreeMap<String, PropertyInput>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum PropertyKind {
    Text,
    RichText,
}

#[derive(Debug, Deserialize)]
struct PropertyInput {
    #[serde(rename = "type")]
    kind: PropertyKind,
    text: Option<Content>,
    rich_text: Option<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
struct Content {
    content: String,
}

fn content_schema() -> ObjectSchema {
    ObjectSchema::new().field(Field::new("content", FieldType::string()))
}

fn input_schema() -> ObjectSchema {
    let property = ObjectSchema::new()
        .field(Field::new(
            "type",
            FieldType::enumeration(["text", "rich_text"]),
        ))
        .field(Field::new("text", FieldType::object(content_schema())).optional())
        .field(
            Field::new(
                "rich_text",
                FieldType::array(FieldType::object(
                    ObjectSchema::new().field(Field::new("text", FieldType::object(content_schema()))),
                )),
            )
            .optional(),
        );

    ObjectSchema::new()
        .field(
            Field::new("parent_id", FieldType::string()).describe(
                "The ID of the parent page or database where the new page will be created",
            ),
        )
        .field(Field::new("title", FieldType::string()).describe("The title of the new page"))
        .field(
            Field::new("properties", FieldType::record(FieldType::object(property)))
                .optional()
                .describe("Optional properties for the page"),
        )
}

/// Request body for `POST /pages`
fn page_body(input: &Input) -> Value {
    let mut properties = Map::new();
    properties.insert(
        "title".to_string(),
        json!({ "title": [{ "text": { "content": input.title } }] }),
    );

    for (key, property) in &input.properties {
        let value = match property.kind {
            PropertyKind::Text => {
                let content = property.text.as_ref().map_or("", |t| t.content.as_str());
                json!({ "rich_text": [{ "text": { "content": content } }] })
            }
            PropertyKind::RichText => {
                json!({ "rich_text": property.rich_text.clone().unwrap_or_default() })
            }
        };
        properties.insert(key.clone(), value);
    }

    json!({
        "parent": { "page_id": input.parent_id },
        "properties": properties,
    })
}

/// Create a page under a parent page or database
pub struct CreatePageTool {
    definition: ToolDefinition,
    auth: NotionAuth,
    api: Arc<dyn NotionApi>,
}

impl CreatePageTool {
    pub fn new(auth: NotionAuth, predefined_parameters: Option<Value>) -> Result<Self> {
        let api = http_api(&auth);
        Self::with_api(auth, predefined_parameters, api)
    }

    pub fn with_api(
        auth: NotionAuth,
        predefined_parameters: Option<Value>,
        api: Arc<dyn NotionApi>,
    ) -> Result<Self> {
        let definition = ToolDefinition::new(
            ToolConfig::new(NAME, DESCRIPTION, input_schema(), SERVICE)
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
impl Tool for CreatePageTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, input: Value, context: &RuntimeContext) -> Result<Value> {
        let input: Input = self.definition.parse_input(&input)?;
        ensure_present(&input.parent_id, "Parent ID is required")?;

        let page = call(context, self.api.create_page(page_body(&input)))
            .await?
            .map_err(|e| Error::Service(format!("Failed to create Notion page: {e}")))?;

        info!(tool = NAME, page_id = %page.id, "Created Notion page");
        to_output(&page)
    }
}

impl Authenticated for CreatePageTool {
    type Credentials = NotionAuth;

    fn auth(&self) -> &NotionAuth {
        &self.auth
    }
}
