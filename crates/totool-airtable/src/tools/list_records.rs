use super::{RecordsOutput, call, drain_records, http_api};
use crate::SERVICE;
use crate::auth::AirtableAuth;
use crate::client::{AirtableApi, ListRecordsOptions};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use totool_core::schema::{Field, FieldType, ObjectSchema};
use totool_core::{
    Authenticated, Error, Result, RuntimeContext, Tool, ToolConfig, ToolDefinition,
    ensure_present, to_output,
};
use tracing::debug;

const NAME: &str = "list-records";
const DESCRIPTION: &str = "List records from a specified Airtable table with optional pagination. Returns records with their IDs, creation times, and field values.";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Input {
    base_id: String,
    table_id: String,
    page_size: Option<u32>,
    max_records: Option<u32>,
    offset: Option<String>,
}

fn input_schema() -> ObjectSchema {
    ObjectSchema::new()
        .field(Field::new("baseId", FieldType::string()).describe("The ID of the Airtable base"))
        .field(
            Field::new("tableId", FieldType::string())
                .describe("The ID of the table to list records from"),
        )
        .field(
            Field::new("pageSize", FieldType::integer_in(1, 100))
                .optional()
                .describe("Number of records to return per page (max 100)"),
        )
        .field(
            Field::new("maxRecords", FieldType::integer_in(1, i64::from(u32::MAX)))
                .optional()
                .describe("Maximum total number of records to return"),
        )
        .field(
            Field::new("offset", FieldType::string())
                .optional()
                .describe("Offset for pagination, returned from previous request"),
        )
}

/// List the records of a table, following pagination to the end
pub struct ListRecordsTool {
    definition: ToolDefinition,
    auth: AirtableAuth,
    api: Arc<dyn AirtableApi>,
}

impl ListRecordsTool {
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

#[async_trait]
impl Tool for ListRecordsTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, input: Value, context: &RuntimeContext) -> Result<Value> {
        let input: Input = self.definition.parse_input(&input)?;
        ensure_present(&input.base_id, "Base ID is required")?;
        ensure_present(&input.table_id, "Table ID is required")?;

        let options = ListRecordsOptions {
            page_size: input.page_size,
            max_records: input.max_records,
            offset: input.offset,
            filter_by_formula: None,
        };

        let records = call(
            context,
            drain_records(self.api.as_ref(), &input.base_id, &input.table_id, options),
        )
        .await?
        .map_err(|e| Error::Service(format!("Failed to list records: {e}")))?;

        debug!(tool = NAME, count = records.len(), "Listed Airtable records");
        to_output(&RecordsOutput { records })
    }
}

impl Authenticated for ListRecordsTool {
    type Credentials = AirtableAuth;

    fn auth(&self) -> &AirtableAuth {
        &self.auth
    }
}
