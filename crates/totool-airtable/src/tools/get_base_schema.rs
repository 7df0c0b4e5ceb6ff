use super::{call, http_api};
use crate::SERVICE;
use crate::auth::AirtableAuth;
use crate::client::{AirtableApi, Table};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use totool_core::schema::{Field, FieldType, ObjectSchema};
use totool_core::{
    Authenticated, Error, Result, RuntimeContext, Tool, ToolConfig, ToolDefinition,
    ensure_present, to_output,
};

const NAME: &str = "get-base-schema";
const DESCRIPTION: &str = "Retrieves the schema of an Airtable base, including tables and fields.";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Input {
    base_id: String,
}

#[derive(Debug, Serialize)]
struct Output {
    tables: Vec<Table>,
}

/// Tables and fields of one base
pub struct GetBaseSchemaTool {
    definition: ToolDefinition,
    auth: AirtableAuth,
    api: Arc<dyn AirtableApi>,
}

impl GetBaseSchemaTool {
    pub fn new(auth: AirtableAuth, predefined_parameters: Option<Value>) -> Result<Self> {
        let api = http_api(&auth);
        Self::with_api(auth, predefined_parameters, api)
    }

    pub fn with_api(
        auth: AirtableAuth,
        predefined_parameters: Option<Value>,
        api: Arc<dyn AirtableApi>,
    ) -> Result<Self> {
        let schema = ObjectSchema::new().field(
            Field::new("baseId", FieldType::string())
                .describe("The ID of the Airtable base to retrieve schema from"),
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
impl Tool for GetBaseSchemaTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, input: Value, context: &RuntimeContext) -> Result<Value> {
        let input: Input = self.definition.parse_input(&input)?;
        ensure_present(&input.base_id, "Base ID is required")?;

        let tables = call(context, self.api.get_base_schema(&input.base_id))
            .await?
            .map_err(|e| Error::Service(format!("Failed to retrieve base schema: {e}")))?;

        to_output(&Output { tables })
    }
}

impl Authenticated for GetBaseSchemaTool {
    type Credentials = AirtableAuth;

    fn auth(&self) -> &AirtableAuth {
        &self.auth
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{MockAirtableApi, TableField};
    use crate::error::AirtableError;
    use serde_json::json;

    fn tasks_table() -> Table {
        Table {
            id: "tbl1".to_string(),
            name: "Tasks".to_string(),
            primary_field_id: "fld1".to_string(),
            fields: vec![
                TableField {
                    id: "fld1".to_string(),
                    name: "Name".to_string(),
                    field_type: "singleLineText".to_string(),
                    options: None,
                },
                TableField {
                    id: "fld2".to_string(),
                    name: "Done".to_string(),
                    field_type: "checkbox".to_string(),
                    options: json!({"icon": "check"}).as_object().cloned(),
                },
            ],
        }
    }

    #[tokio::test]
    async fn test_returns_tables() {
        let mut api = MockAirtableApi::new();
        api.expect_get_base_schema()
            .withf(|base| base == "app1")
            .times(1)
            .returning(|_| Ok(vec![tasks_table()]));

        let tool = GetBaseSchemaTool::with_api(
            AirtableAuth::new("pat"),
            Some(json!({"baseId": "app1"})),
            Arc::new(api),
        )
        .unwrap();
        assert!(tool.input_schema().is_empty());

        let output = tool.execute(json!({"baseId": "app1"}), &RuntimeContext::default()).await.unwrap();
        let table = &output["tables"][0];
        assert_eq!(table["primaryFieldId"], "fld1");
        assert_eq!(table["fields"][1]["type"], "checkbox");
        assert!(table["fields"][0].get("options").is_none());
    }

    #[tokio::test]
    async fn test_failure_is_wrapped() {
        let mut api = MockAirtableApi::new();
        api.expect_get_base_schema()
            .returning(|_| Err(AirtableError::from_response(404, r#"{"error":"NOT_FOUND"}"#)));

        let tool = GetBaseSchemaTool::with_api(AirtableAuth::new("pat"), None, Arc::new(api)).unwrap();
        let err = tool
            .execute(json!({"baseId": "app1"}), &RuntimeContext::default())
            .await
            .unwrap_err();
        assert!(err.to_string().starts_with("Failed to retrieve base schema: NOT_FOUND"));
    }
}
