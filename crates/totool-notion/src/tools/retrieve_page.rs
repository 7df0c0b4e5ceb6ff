use super::{call, http_api};
use crate::SERVICE;
use crate::auth::NotionAuth;
use crate::client::NotionApi;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use totool_core::schema::{Field, FieldType, ObjectSchema};
use totool_core::{
    Authenticated, Error, Result, RuntimeContext, Tool, ToolConfig, ToolDefinition,
};

const NAME: &str = "notion_retrieve_page";
const DESCRIPTION: &str = "Retrieves a Page object using the ID specified. Returns page properties, not page content. Note: Properties with more than 25 references might not be fully returned.";

#[derive(Debug, Deserialize)]
struct Input {
    page_id: String,
}

/// Fetch a page object (properties only)
pub struct RetrievePageTool {
    definition: ToolDefinition,
    auth: NotionAuth,
    api: Arc<dyn NotionApi>,
}

impl RetrievePageTool {
    pub fn new(auth: NotionAuth, predefined_parameters: Option<Value>) -> Result<Self> {
        let api = http_api(&auth);
        Self::with_api(auth, predefined_parameters, api)
    }

    pub fn with_api(
        auth: NotionAuth,
        predefined_parameters: Option<Value>,
        api: Arc<dyn NotionApi>,
    ) -> Result<Self> {
        let schema = ObjectSchema::new().field(
            Field::new("page_id", FieldType::non_empty_string(1)).describe(
                "The ID of the page to retrieve. This is a UUID that identifies a specific Notion page. Example: '123e4567-e89b-12d3-a456-426614174000'",
            ),
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
impl Tool for RetrievePageTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, input: Value, context: &RuntimeContext) -> Result<Value> {
        // missing and empty ids share one message
        if input
            .get("page_id")
            .and_then(Value::as_str)
            .is_none_or(str::is_empty)
        {
            return Err(Error::InputValidation("Page ID is required".to_string()));
        }
        let Input { page_id } = self.definition.parse_input(&input)?;

        call(context, self.api.retrieve_page(&page_id))
            .await?
            .map_err(|e| {
                let message = match e.status() {
                    Some(404) => format!("Page not found with ID: {page_id}"),
                    Some(403) => format!("Access denied to page with ID: {page_id}"),
                    _ => format!("Failed to retrieve page: {e}"),
                };
                Error::Service(message)
            })
    }
}

impl Authenticated for RetrievePageTool {
    type Credentials = NotionAuth;

    fn auth(&self) -> &NotionAuth {
        &self.auth
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockNotionApi;
    use crate::error::NotionError;
    use serde_json::json;

    fn tool(api: MockNotionApi) -> RetrievePageTool {
        RetrievePageTool::with_api(NotionAuth::new("secret").unwrap(), None, Arc::new(api)).unwrap()
    }

    #[tokio::test]
    async fn test_returns_page_object() {
        let page = json!({"object": "page", "id": "abc", "properties": {"title": {}}});
        let expected = page.clone();

        let mut api = MockNotionApi::new();
        api.expect_retrieve_page()
            .withf(|id| id == "abc")
            .times(1)
            .returning(move |_| Ok(page.clone()));

        let output = tool(api)
            .execute(json!({"page_id": "abc"}), &RuntimeContext::default())
            .await
            .unwrap();
        assert_eq!(output, expected);
    }

    #[tokio::test]
    async fn test_status_mapping() {
        let cases = [
            (404, "Page not found with ID: abc".to_string()),
            (403, "Access denied to page with ID: abc".to_string()),
            (
                500,
                "Failed to retrieve page: boom (500 unknown)".to_string(),
            ),
        ];

        for (status, expected) in cases {
            let mut api = MockNotionApi::new();
            api.expect_retrieve_page()
                .returning(move |_| Err(NotionError::from_response(status, "boom")));

            let err = tool(api)
                .execute(json!({"page_id": "abc"}), &RuntimeContext::default())
                .await
                .unwrap_err();
            assert_eq!(err, Error::Service(expected));
        }
    }

    #[tokio::test]
    async fn test_empty_page_id() {
        let mut api = MockNotionApi::new();
        api.expect_retrieve_page().never();
        let tool = tool(api);

        for input in [json!({"page_id": ""}), json!({})] {
            let err = tool
                .execute(input, &RuntimeContext::default())
                .await
                .unwrap_err();
            assert_eq!(err, Error::InputValidation("Page ID is required".to_string()));
        }
    }
}
