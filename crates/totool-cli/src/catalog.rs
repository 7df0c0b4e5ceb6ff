//! Construction of tools from environment configuration

use anyhow::{Context, Result, bail};
use secrecy::ExposeSecret;
use serde_json::{Map, Value};
use std::sync::Arc;
use totool_airtable::{
    AirtableAuth, CreateRecordTool, GetBaseSchemaTool, ListBasesTool, ListRecordsTool,
    SearchRecordsTool,
};
use totool_core::{Tool, ToolRegistry};
use totool_notion::{AddPageContentTool, CreatePageTool, NotionAuth, RetrievePageTool, SearchTool};
use totool_utils::Config;
use tracing::debug;

pub const AIRTABLE_TOOLS: [&str; 5] = [
    "create-record",
    "list-records",
    "search-records",
    "get-base-schema",
    "list-bases",
];

pub const NOTION_TOOLS: [&str; 4] = [
    "notion_create_page",
    "notion_add_page_content",
    "notion_retrieve_page",
    "notion_search",
];

fn airtable_auth(config: &Config) -> Result<AirtableAuth> {
    let token = config
        .airtable_access_token
        .as_ref()
        .context("AIRTABLE_ACCESS_TOKEN is not set")?;
    Ok(AirtableAuth::new(token.expose_secret()))
}

fn notion_auth(config: &Config) -> Result<NotionAuth> {
    let token = config
        .notion_token
        .as_ref()
        .context("NOTION_API_KEY is not set")?;
    let auth = NotionAuth::new(token.expose_secret())?;
    Ok(match &config.notion_version {
        Some(version) => auth.with_version(version),
        None => auth,
    })
}

/// Pin `parent_id` of `notion_create_page` to the configured root page
fn pin_root_page(name: &str, config: &Config, predefined: Option<Value>) -> Option<Value> {
    let Some(root) = config.notion_root_page_id.as_ref().filter(|_| name == "notion_create_page")
    else {
        return predefined;
    };

    match predefined {
        None => {
            let mut pinned = Map::new();
            pinned.insert("parent_id".to_string(), Value::String(root.clone()));
            Some(Value::Object(pinned))
        }
        Some(Value::Object(mut pinned)) => {
            pinned
                .entry("parent_id")
                .or_insert_with(|| Value::String(root.clone()));
            Some(Value::Object(pinned))
        }
        other => other,
    }
}

/// Build one tool by name
pub fn build(name: &str, config: &Config, predefined: Option<Value>) -> Result<Arc<dyn Tool>> {
    let predefined = pin_root_page(name, config, predefined);
    debug!(tool = name, predefined = ?predefined, "Building tool");

    let tool: Arc<dyn Tool> = match name {
        "create-record" => Arc::new(CreateRecordTool::new(airtable_auth(config)?, predefined)?),
        "list-records" => Arc::new(ListRecordsTool::new(airtable_auth(config)?, predefined)?),
        "search-records" => Arc::new(SearchRecordsTool::new(airtable_auth(config)?, predefined)?),
        "get-base-schema" => Arc::new(GetBaseSchemaTool::new(airtable_auth(config)?, predefined)?),
        "list-bases" => Arc::new(ListBasesTool::new(airtable_auth(config)?, predefined)?),
        "notion_create_page" => Arc::new(CreatePageTool::new(notion_auth(config)?, predefined)?),
        "notion_add_page_content" => {
            Arc::new(AddPageContentTool::new(notion_auth(config)?, predefined)?)
        }
        "notion_retrieve_page" => {
            Arc::new(RetrievePageTool::new(notion_auth(config)?, predefined)?)
        }
        "notion_search" => Arc::new(SearchTool::new(notion_auth(config)?, predefined)?),
        other => bail!("Unknown tool: {other}"),
    };
    Ok(tool)
}

/// Every tool whose credentials are configured
pub fn available(config: &Config) -> Result<ToolRegistry> {
    let mut names = Vec::new();
    if config.airtable_access_token.is_some() {
        names.extend(AIRTABLE_TOOLS);
    }
    if config.notion_token.is_some() {
        names.extend(NOTION_TOOLS);
    }

    let mut registry = ToolRegistry::new();
    for name in names {
        registry.register(build(name, config, None)?)?;
    }
    Ok(registry)
}
