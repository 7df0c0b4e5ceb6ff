//! Airtable tool implementations

mod create_record;
mod get_base_schema;
mod list_bases;
mod list_records;
mod search_records;

pub use create_record::CreateRecordTool;
pub use get_base_schema::GetBaseSchemaTool;
pub use list_bases::ListBasesTool;
pub use list_records::ListRecordsTool;
pub use search_records::SearchRecordsTool;

use crate::auth::AirtableAuth;
use crate::client::{AirtableApi, AirtableClient, ListRecordsOptions, Record};
use crate::error::AirtableError;
use serde::Serialize;
use std::sync::Arc;
use totool_core::{Error, RuntimeContext};

/// Output of the record-listing tools
#[derive(Debug, Serialize)]
pub(crate) struct RecordsOutput {
    pub records: Vec<Record>,
}

pub(crate) fn http_api(auth: &AirtableAuth) -> Arc<dyn AirtableApi> {
    Arc::new(AirtableClient::new(auth.clone()))
}

/// Run an API future, honouring the runtime's abort signal
pub(crate) async fn call<T>(
    context: &RuntimeContext,
    fut: impl Future<Output = crate::Result<T>>,
) -> totool_core::Result<crate::Result<T>> {
    context.until_cancelled(fut).await.ok_or(Error::Cancelled)
}

/// Fetch every page of records starting at `options.offset`
pub(crate) async fn drain_records(
    api: &dyn AirtableApi,
    base_id: &str,
    table_id: &str,
    mut options: ListRecordsOptions,
) -> crate::Result<Vec<Record>> {
    let mut records = Vec::new();
    loop {
        let page = api.list_records(base_id, table_id, options.clone()).await?;
        records.extend(page.records);
        match page.offset {
            Some(offset) => options.offset = Some(offset),
            None => return Ok(records),
        }
    }
}

/// Whether the rendered error mentions `code`; `TABLE_NOT_FOUND` mentions `NOT_FOUND`
pub(crate) fn mentions(err: &AirtableError, code: &str) -> bool {
    err.to_string().contains(code)
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::client::Record;
    use serde_json::json;

    pub fn record(id: &str, name: &str) -> Record {
        Record {
            id: id.to_string(),
            created_time: "2024-01-01T00:00:00.000Z".to_string(),
            fields: json!({ "Name": name }).as_object().cloned().unwrap_or_default(),
        }
    }
}
