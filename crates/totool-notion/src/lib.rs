//! Notion tools for totool
//!
//! - [`CreatePageTool`] (`notion_create_page`)
//! - [`AddPageContentTool`] (`notion_add_page_content`)
//! - [`RetrievePageTool`] (`notion_retrieve_page`)
//! - [`SearchTool`] (`notion_search`)
//!
//! All tools authenticate with an integration token:
//!
//! ```no_run
//! use totool_notion::{NotionAuth, SearchTool};
//! use totool_core::{StepContext, step_tool};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let auth = NotionAuth::new("secret_xxx")?;
//! let search = step_tool(Arc::new(SearchTool::new(auth, None)?));
//! let results = search
//!     .execute(json!({"query": "roadmap"}), StepContext::new("call_1"))
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod blocks;
pub mod client;
pub mod error;
pub mod tools;

pub use auth::{DEFAULT_NOTION_VERSION, NotionAuth};
pub use blocks::{BlockContent, TextBlock};
pub use client::{CreatedPage, NotionApi, NotionClient, SearchRequest, SearchResponse};
pub use error::{NotionError, Result};
pub use tools::{AddPageContentTool, CreatePageTool, RetrievePageTool, SearchTool};

/// Service tag shared by every Notion tool
pub const SERVICE: &str = "notion";
