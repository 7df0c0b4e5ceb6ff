use super::{RecordsOutput, call, drain_records, http_api, mentions};
use crate::SERVICE;
use crate::auth::AirtableAuth;
use crate::client::{AirtableApi, ListRecordsOptions};
use crate::error::AirtableError;
use crate::formula::SearchType;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use totool_core::schema::{Field, FieldType, ObjectSchema};
use totool_core::{
    Authenticated, Error, Result, RuntimeContext, Tool, ToolConfig, ToolDefinition,
    ensure_present, to_output,
};
use tracing::{debug, warn};

const NAME: &str = "search-records";
const DESCRIPTION: &str = "Search records in a specified Airtable table using simple field comparisons. Returns matching records with their IDs, creation times, and field values.";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Input {
    base_id: String,
    table_id: String,
    search_field: String,
    search_type: SearchType,
    search_value: String,
    page_size: Option<u32>,
}

fn input_schema() -> ObjectSchema {
    ObjectSchema::new()
        .field(Field::new("baseId", FieldType::string()).describe("The ID of the Airtable base"))
        .field(
            Field::new("tableId", FieldType::string())
                .describe("The ID of the table to search records in"),
        )
        .field(
            Field::new("searchField", FieldType::string())
                .describe("The name of the field to search in"),
        )
        .field(
            Field::new("searchType", FieldType::enumeration(SearchType::ALL))
                .describe("The type of search to perform"),
        )
        .field(Field::new("searchValue", FieldType::string()).describe("The value to search for"))
        .field(
            Field::new("pageSize", FieldType::integer_in(1, 100))
                .optional()
                .describe("Number of records to return per page (max 100)"),
        )
}

/// Filter a table's records with one field comparison
pub struct SearchRecordsTool {
    definition: ToolDefinition,
    auth: AirtableAuth,
    api: Arc<dyn AirtableApi>,
}

impl SearchRecordsTool {
    pub fn new(auth: AirtableAuth, predefined_parameters: Option<Value>) -> Result<Self> {
        let api = http_api(&auth);
        Self::with_api(auth, predefined_parameters, api)
    }

    pub fn with_api(
        auth: AirtableAuth,
        predefined_parameters: Option<Value>,
        api: Arc<dyn AirtableApi>,
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

fn map_error(err: &AirtableError, search_field: &str) -> Error {
    let message = if mentions(err, "NOT_FOUND") {
        "Base or table not found. Please check the baseId and tableId.".to_string()
    } else if mentions(err, "AUTHENTICATION_REQUIRED") {
        "Invalid access token. Please check your credentials.".to_string()
    } else if mentions(err, "INVALID_FIELD_NAME") {
        format!("Invalid field name: {search_field}")
    } else if mentions(err, "INVALID_FORMULA") {
        "Invalid formula generated for search criteria".to_string()
    } else {
        format!("Failed to search records: {err}")
    };
    Error::Service(message)
}

#[async_trait]
impl Tool for SearchRecordsTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, input: Value, context: &RuntimeContext) -> Result<Value> {
        let input: Input = self.definition.parse_input(&input)?;
        ensure_present(&input.base_id, "Base ID is required")?;
        ensure_present(&input.table_id, "Table ID is required")?;
        ensure_present(&input.search_field, "Search field is required")?;

        let formula = input
            .search_type
            .formula(&input.search_field, &input.search_value);
        debug!(
            tool = NAME,
            base_id = %input.base_id,
            table_id = %input.table_id,
            formula = %formula,
            page_size = ?input.page_size,
            "Executing Airtable search"
        );

        let options = ListRecordsOptions {
            page_size: input.page_size,
            filter_by_formula: Some(formula),
            ..ListRecordsOptions::default()
        };

        let records = call(
            context,
            drain_records(self.api.as_ref(), &input.base_id, &input.table_id, options),
        )
        .await?
        .map_err(|e| {
            warn!(tool = NAME, error = %e, "Airtable search failed");
            map_error(&e, &input.search_field)
        })?;

        debug!(tool = NAME, count = records.len(), "Found records");
        to_output(&RecordsOutput { records })
    }
}

impl Authenticated for SearchRecordsTool {
    type Credentials = AirtableAuth;

    fn auth(&self) -> &AirtableAuth {
        &self.auth
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{MockAirtableApi, RecordPage};
    use crate::tools::test_support::record;
    use serde_json::json;
    use totool_core::{StepContext, step_tool};

    fn tool(api: MockAirtableApi) -> SearchRecordsTool {
        SearchRecordsTool::with_api(AirtableAuth::new("pat-test"), None, Arc::new(api)).unwrap()
    }

    fn search(search_type: &str) -> Value {
        json!({
            "baseId": "base123",
            "tableId": "People",
            "searchField": "Name",
            "searchType": search_type,
            "searchValue": "J"
        })
    }

    #[tokio::test]
    async fn test_contains_builds_find_formula() {
        let mut api = MockAirtableApi::new();
        api.expect_list_records()
            .withf(|base, table, options| {
                base == "base123"
                    && table == "People"
                    && options.filter_by_formula.as_deref() == Some("FIND(\"J\", {Name}) > 0")
                    && options.page_size.is_none()
            })
            .times(1)
            .returning(|_, _, _| {
                Ok(RecordPage {
                    records: vec![record("rec1", "John"), record("rec2", "Jane")],
                    offset: None,
                })
            });

        let output = step_tool(Arc::new(tool(api)))
            .execute(search("contains"), StepContext::new("call_1"))
            .await
            .unwrap();

        assert_eq!(output["records"].as_array().unwrap().len(), 2);
        assert_eq!(output["records"][1]["fields"]["Name"], "Jane");
    }

    #[tokio::test]
    async fn test_unknown_search_type_is_rejected() {
        let mut api = MockAirtableApi::new();
        api.expect_list_records().never();

        let err = tool(api)
            .execute(search("startsWith"), &RuntimeContext::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InputValidation(_)));
    }

    #[tokio::test]
    async fn test_error_mapping() {
        let cases = [
            (
                404,
                r#"{"error":"NOT_FOUND"}"#,
                "Base or table not found. Please check the baseId and tableId.",
            ),
            (
                401,
                r#"{"error":{"type":"AUTHENTICATION_REQUIRED","message":"Authentication required"}}"#,
                "Invalid access token. Please check your credentials.",
            ),
            (
                422,
                r#"{"error":{"type":"INVALID_FIELD_NAME","message":"Unknown field name"}}"#,
                "Invalid field name: Name",
            ),
            (
                422,
                r#"{"error":{"type":"INVALID_FORMULA","message":"bad formula"}}"#,
                "Invalid formula generated for search criteria",
            ),
            (
                403,
                r#"{"error":{"type":"INVALID_PERMISSIONS_OR_MODEL_NOT_FOUND","message":"denied"}}"#,
                "Base or table not found. Please check the baseId and tableId.",
            ),
            (
                404,
                r#"{"error":{"type":"TABLE_NOT_FOUND","message":"Could not find table People"}}"#,
                "Base or table not found. Please check the baseId and tableId.",
            ),
            (
                500,
                "boom",
                "Failed to search records: HTTP_500: boom",
            ),
        ];

        for (status, body, expected) in cases {
            let mut api = MockAirtableApi::new();
            api.expect_list_records()
                .returning(move |_, _, _| Err(AirtableError::from_response(status, body)));

            let err = tool(api)
                .execute(search("equals"), &RuntimeContext::default())
                .await
                .unwrap_err();
            assert_eq!(err, Error::Service(expected.to_string()));
        }
    }
}
