use super::{call, http_api, mentions};
use crate::SERVICE;
use crate::auth::AirtableAuth;
use crate::client::AirtableApi;
use crate::error::AirtableError;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use totool_core::schema::{Field, FieldType, ObjectSchema};
use totool_core::{
    Authenticated, Error, Result, RuntimeContext, Tool, ToolConfig, ToolDefinition,
    ensure_present, to_output,
};
use tracing::info;

const NAME: &str = "create-record";
const DESCRIPTION: &str = "Create a new record in a specified Airtable table. Returns the created record with its ID, creation time, and field values.";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Input {
    base_id: String,
    table_id: String,
    fields: Map<String, Value>,
}

fn input_schema() -> ObjectSchema {
    ObjectSchema::new()
        .field(Field::new("baseId", FieldType::string()).describe("The ID of the Airtable base"))
        .field(
            Field::new("tableId", FieldType::string())
                .describe("The ID of the table to create a record in"),
        )
        .field(
            Field::new("fields", FieldType::record(FieldType::any()))
                .describe("The field values for the new record, keyed by field name"),
        )
}

/// Create one record in a table
pub struct CreateRecordTool {
    definition: ToolDefinition,
    auth: AirtableAuth,
    api: Arc<dyn AirtableApi>,
}

impl CreateRecordTool {
    pub fn new(auth: AirtableAuth, predefined_parameters: Option<Value>) -> Result<Self> {
        let api = http_api(&auth);
        Self::with_api(auth, predefined_parameters, api)
    }

    /// Build the tool on a custom API implementation
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

fn map_error(err: &AirtableError) -> Error {
    let message = if mentions(err, "NOT_FOUND") {
        "Base or table not found".to_string()
    } else if mentions(err, "INVALID_PERMISSIONS_OR_MODEL_NOT_FOUND") {
        "Invalid permissions or model not found".to_string()
    } else if mentions(err, "INVALID_VALUE_FOR_COLUMN") {
        "Invalid value for column".to_string()
    } else {
        format!("Failed to create record: {err}")
    };
    Error::Service(message)
}

#[async_trait]
impl Tool for CreateRecordTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, input: Value, context: &RuntimeContext) -> Result<Value> {
        let input: Input = self.definition.parse_input(&input)?;
        ensure_present(&input.base_id, "Base ID is required")?;
        ensure_present(&input.table_id, "Table ID is required")?;

        let record = call(
            context,
            self.api
                .create_record(&input.base_id, &input.table_id, input.fields),
        )
        .await?
        .map_err(|e| map_error(&e))?;

        info!(tool = NAME, record_id = %record.id, "Created Airtable record");
        to_output(&record)
    }
}

impl Authenticated for CreateRecordTool {
    type Credentials = AirtableAuth;

    fn auth(&self) -> &AirtableAuth {
        &self.auth
    }
}
