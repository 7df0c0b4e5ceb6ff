//! Notion REST client

use crate::auth::NotionAuth;
use crate::error::{NotionError, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, instrument};
use url::Url;

pub const NOTION_API_BASE: &str = "https://api.notion.com/v1";

/// Identity of a freshly created page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedPage {
    pub id: String,
    pub object: String,
}

/// Body of `POST /search`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchRequest {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_cursor: Option<String>,
}

/// Paginated search results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub object: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub result_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_or_database: Option<Value>,
    pub results: Vec<Value>,
    pub next_cursor: Option<String>,
    pub has_more: bool,
}

#[derive(Deserialize)]
struct BlockChildren {
    results: Vec<Value>,
}

/// Operations the Notion tools need from the API
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotionApi: Send + Sync {
    /// `POST /pages` with a prepared body
    async fn create_page(&self, body: Value) -> Result<CreatedPage>;

    /// `GET /blocks/{id}`
    async fn retrieve_block(&self, block_id: &str) -> Result<Value>;

    /// `PATCH /blocks/{id}/children`, returning the appended blocks
    async fn append_block_children(&self, block_id: &str, children: Vec<Value>)
    -> Result<Vec<Value>>;

    /// `GET /pages/{id}`
    async fn retrieve_page(&self, page_id: &str) -> Result<Value>;

    /// `POST /search`
    async fn search(&self, request: SearchRequest) -> Result<SearchResponse>;
}

/// HTTP implementation of [`NotionApi`]
#[derive(Debug, Clone)]
pub struct NotionClient {
    client: Client,
    base_url: String,
    auth: NotionAuth,
}

impl NotionClient {
    pub fn new(auth: NotionAuth) -> Self {
        Self {
            client: Client::new(),
            base_url: NOTION_API_BASE.to_string(),
            auth,
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Result<Self> {
        let parsed = Url::parse(base_url)
            .map_err(|e| NotionError::InvalidBaseUrl(format!("{base_url}: {e}")))?;
        self.base_url = parsed.as_str().trim_end_matches('/').to_string();
        Ok(self)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request
            .bearer_auth(self.auth.token())
            .header("Notion-Version", self.auth.version())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotionError::from_response(status.as_u16(), &body));
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl NotionApi for NotionClient {
    #[instrument(skip(self, body))]
    async fn create_page(&self, body: Value) -> Result<CreatedPage> {
        debug!(body = %body, "Creating Notion page");
        self.send(self.client.post(self.url("pages")).json(&body))
            .await
    }

    #[instrument(skip(self))]
    async fn retrieve_block(&self, block_id: &str) -> Result<Value> {
        self.send(self.client.get(self.url(&format!("blocks/{block_id}"))))
            .await
    }

    #[instrument(skip(self, children), fields(count = children.len()))]
    async fn append_block_children(
        &self,
        block_id: &str,
        children: Vec<Value>,
    ) -> Result<Vec<Value>> {
        let request = self
            .client
            .patch(self.url(&format!("blocks/{block_id}/children")))
            .json(&json!({ "children": children }));
        let response: BlockChildren = self.send(request).await?;
        Ok(response.results)
    }

    #[instrument(skip(self))]
    async fn retrieve_page(&self, page_id: &str) -> Result<Value> {
        self.send(self.client.get(self.url(&format!("pages/{page_id}"))))
            .await
    }

    #[instrument(skip(self))]
    async fn search(&self, request: SearchRequest) -> Result<SearchResponse> {
        self.send(self.client.post(self.url("search")).json(&request))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls() {
        let client = NotionClient::new(NotionAuth::new("secret").unwrap());
        assert_eq!(client.url("pages/abc"), "https://api.notion.com/v1/pages/abc");

        let client = client.with_base_url("http://127.0.0.1:9000/v1/").unwrap();
        assert_eq!(client.url("search"), "http://127.0.0.1:9000/v1/search");
    }

    #[test]
    fn test_search_request_skips_unset_fields() {
        let request = SearchRequest {
            query: "roadmap".to_string(),
            ..SearchRequest::default()
        };
        assert_eq!(serde_json::to_value(&request).unwrap(), json!({"query": "roadmap"}));

        let request = SearchRequest {
            query: "q".to_string(),
            page_size: Some(10),
            start_cursor: Some("cur".to_string()),
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"query": "q", "page_size": 10, "start_cursor": "cur"})
        );
    }

    #[test]
    fn test_search_response_shape() {
        let response: SearchResponse = serde_json::from_value(json!({
            "object": "list",
            "results": [{"object": "page", "id": "p1"}],
            "next_cursor": null,
            "has_more": false,
            "type": "page_or_database",
            "page_or_database": {}
        }))
        .unwrap();

        assert_eq!(response.result_type.as_deref(), Some("page_or_database"));
        assert!(!response.has_more);
        assert_eq!(serde_json::to_value(&response).unwrap()["type"], "page_or_database");
    }
}
