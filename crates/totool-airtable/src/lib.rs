//! Airtable tools for totool
//!
//! Each tool wraps one Airtable REST operation and implements
//! [`totool_core::Tool`]:
//!
//! | tool | operation |
//! |------|-----------|
//! | [`CreateRecordTool`] | create a record in a table |
//! | [`ListRecordsTool`] | list records of a table |
//! | [`SearchRecordsTool`] | filter records with a simple field comparison |
//! | [`GetBaseSchemaTool`] | tables and fields of a base |
//! | [`ListBasesTool`] | bases visible to the token |
//!
//! # Example
//!
//! ```no_run
//! use totool_airtable::{AirtableAuth, CreateRecordTool};
//! use totool_core::{RunnableConfig, structured_tool};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! # async fn example() -> totool_core::Result<()> {
//! let tool = CreateRecordTool::new(
//!     AirtableAuth::new("pat-token"),
//!     Some(json!({"baseId": "appXXXX"})),
//! )?;
//! let adapter = structured_tool(Arc::new(tool));
//!
//! let record = adapter
//!     .invoke(json!({"tableId": "Tasks", "fields": {"Name": "Ship"}}), RunnableConfig::new())
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod client;
pub mod error;
pub mod formula;
pub mod tools;

pub use auth::AirtableAuth;
pub use client::{AirtableApi, AirtableClient, Base, BasePage, ListRecordsOptions, Record, RecordPage, Table, TableField};
pub use error::{AirtableError, Result};
pub use formula::SearchType;
pub use tools::{
    CreateRecordTool, GetBaseSchemaTool, ListBasesTool, ListRecordsTool, SearchRecordsTool,
};

/// Service tag shared by every Airtable tool
pub const SERVICE: &str = "airtable";
