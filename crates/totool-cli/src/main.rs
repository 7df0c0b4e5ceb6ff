//! Command-line interface for totool

mod catalog;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL};
use serde_json::Value;
use totool_core::{RunnableConfig, StepContext, step_tool, structured_tool};
use totool_utils::{Config, LogFormat};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "totool")]
#[command(about = "List and call Airtable and Notion agent tools", long_about = None)]
struct Args {
    /// Log output format (overrides TOTOOL_LOG_FORMAT)
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the tools available with the configured credentials
    Tools,
    /// Call one tool and print its JSON result
    Call {
        /// Tool name, e.g. `list-records` or `notion_search`
        name: String,
        /// Caller input as a JSON object
        #[arg(long, default_value = "{}")]
        input: String,
        /// Parameters to pin at construction, as a JSON object
        #[arg(long)]
        predefined: Option<String>,
        /// Runtime shape used to invoke the tool
        #[arg(long, value_enum, default_value_t = Adapter::Structured)]
        adapter: Adapter,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Adapter {
    /// Graph-runtime tool with a run config
    Structured,
    /// Stream-of-steps tool with a step context
    Step,
}

fn parse_json(raw: &str, what: &str) -> Result<Value> {
    serde_json::from_str(raw).with_context(|| format!("--{what} is not valid JSON"))
}

fn list_tools(config: &Config) -> Result<()> {
    let registry = catalog::available(config)?;
    if registry.is_empty() {
        println!("No tools available. Set AIRTABLE_ACCESS_TOKEN and/or NOTION_API_KEY.");
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Tool", "Service", "Parameters"]);

    for tool in registry.list_tools() {
        table.add_row(vec![
            tool.name().to_string(),
            tool.service().to_string(),
            serde_json::to_string_pretty(&tool.input_schema().to_json_schema())?,
        ]);
    }

    println!("{table}");
    Ok(())
}

async fn call_tool(
    config: &Config,
    name: &str,
    input: &str,
    predefined: Option<&str>,
    adapter: Adapter,
) -> Result<()> {
    let input = parse_json(input, "input")?;
    let predefined = predefined
        .map(|raw| parse_json(raw, "predefined"))
        .transpose()?;

    let tool = catalog::build(name, config, predefined)?;
    info!(tool = name, adapter = ?adapter, "Calling tool");

    let output = match adapter {
        Adapter::Structured => {
            structured_tool(tool)
                .invoke(input, RunnableConfig::new().with_run_name("totool-cli"))
                .await?
        }
        Adapter::Step => step_tool(tool).execute(input, StepContext::new("cli")).await?,
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = Config::from_env()?;

    totool_utils::init_tracing_with(args.log_format.unwrap_or(config.log_format));

    match args.command {
        Command::Tools => list_tools(&config),
        Command::Call {
            name,
            input,
            predefined,
            adapter,
        } => call_tool(&config, &name, &input, predefined.as_deref(), adapter).await,
    }
}
