//! Airtable REST client
//!
//! See: https://airtable.com/developers/web/api/introduction

use crate::auth::AirtableAuth;
use crate::error::{AirtableError, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use tracing::{debug, instrument};
use url::Url;

pub const AIRTABLE_API_BASE: &str = "https://api.airtable.com/v0";

/// A table record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: String,
    pub created_time: String,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

/// One page of records
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RecordPage {
    pub records: Vec<Record>,
    /// Present when more records follow
    pub offset: Option<String>,
}

/// Query options for listing records
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListRecordsOptions {
    pub page_size: Option<u32>,
    pub max_records: Option<u32>,
    pub offset: Option<String>,
    pub filter_by_formula: Option<String>,
}

impl ListRecordsOptions {
    fn query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(page_size) = self.page_size {
            query.push(("pageSize", page_size.to_string()));
        }
        if let Some(max_records) = self.max_records {
            query.push(("maxRecords", max_records.to_string()));
        }
        if let Some(offset) = &self.offset {
            query.push(("offset", offset.clone()));
        }
        if let Some(formula) = &self.filter_by_formula {
            query.push(("filterByFormula", formula.clone()));
        }
        query
    }
}

/// A base visible to the token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Base {
    pub id: String,
    pub name: String,
    pub permission_level: String,
}

/// One page of bases
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BasePage {
    pub bases: Vec<Base>,
    pub offset: Option<String>,
}

/// A field of a table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableField {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Map<String, Value>>,
}

/// A table with its fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    pub id: String,
    pub name: String,
    pub primary_field_id: String,
    pub fields: Vec<TableField>,
}

#[derive(Deserialize)]
struct TablesResponse {
    tables: Vec<Table>,
}

/// Operations the Airtable tools need from the API
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AirtableApi: Send + Sync {
    /// Create one record
    async fn create_record(
        &self,
        base_id: &str,
        table_id: &str,
        fields: Map<String, Value>,
    ) -> Result<Record>;

    /// Fetch one page of records
    async fn list_records(
        &self,
        base_id: &str,
        table_id: &str,
        options: ListRecordsOptions,
    ) -> Result<RecordPage>;

    /// Fetch one page of bases
    async fn list_bases(&self, offset: Option<String>) -> Result<BasePage>;

    /// Tables and fields of a base
    async fn get_base_schema(&self, base_id: &str) -> Result<Vec<Table>>;
}

/// HTTP implementation of [`AirtableApi`]
#[derive(Debug, Clone)]
pub struct AirtableClient {
    client: Client,
    base_url: String,
    auth: AirtableAuth,
}

impl AirtableClient {
    /// Create a client against the public Airtable API
    pub fn new(auth: AirtableAuth) -> Self {
        Self {
            client: Client::new(),
            base_url: AIRTABLE_API_BASE.to_string(),
            auth,
        }
    }

    /// Point the client at a different API root, e.g. a proxy
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self> {
        let parsed =
            Url::parse(base_url).map_err(|e| AirtableError::InvalidBaseUrl(format!("{base_url}: {e}")))?;
        self.base_url = parsed.as_str().trim_end_matches('/').to_string();
        Ok(self)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn table_url(&self, base_id: &str, table_id: &str) -> String {
        format!("{}/{}/{}", self.base_url, base_id, table_id)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request
            .bearer_auth(self.auth.access_token())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AirtableError::from_response(status.as_u16(), &body));
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl AirtableApi for AirtableClient {
    #[instrument(skip(self, fields))]
    async fn create_record(
        &self,
        base_id: &str,
        table_id: &str,
        fields: Map<String, Value>,
    ) -> Result<Record> {
        debug!("Creating Airtable record");
        let request = self
            .client
            .post(self.table_url(base_id, table_id))
            .json(&json!({ "fields": fields }));
        self.send(request).await
    }

    #[instrument(skip(self))]
    async fn list_records(
        &self,
        base_id: &str,
        table_id: &str,
        options: ListRecordsOptions,
    ) -> Result<RecordPage> {
        debug!("Listing Airtable records");
        let request = self
            .client
            .get(self.table_url(base_id, table_id))
            .query(&options.query());
        self.send(request).await
    }

    #[instrument(skip(self))]
    async fn list_bases(&self, offset: Option<String>) -> Result<BasePage> {
        let mut request = self.client.get(format!("{}/meta/bases", self.base_url));
        if let Some(offset) = offset {
            request = request.query(&[("offset", offset)]);
        }
        self.send(request).await
    }

    #[instrument(skip(self))]
    async fn get_base_schema(&self, base_id: &str) -> Result<Vec<Table>> {
        let request = self
            .client
            .get(format!("{}/meta/bases/{}/tables", self.base_url, base_id));
        let response: TablesResponse = self.send(request).await?;
        Ok(response.tables)
    }
}
