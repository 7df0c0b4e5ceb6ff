//! Tool abstraction core for totool
//!
//! This crate defines the contract every service tool implements and the
//! adapters that expose a tool to agent runtimes:
//!
//! - [`schema`]: a small schema algebra (validate, partial, omit, JSON Schema)
//! - [`Tool`] / [`ToolDefinition`]: identity, schema partitioning and
//!   predefined parameters
//! - [`adapter`]: graph-runtime and step-runtime views over one `execute`
//! - [`ToolRegistry`]: name-keyed tool collection

pub mod adapter;
pub mod context;
pub mod error;
pub mod registry;
pub mod schema;
pub mod tool;

pub use adapter::{StepTool, StepToolSet, StructuredTool, merge, step_tool, step_tool_set, structured_tool};
pub use context::{RunnableConfig, RuntimeContext, StepContext};
pub use error::{Error, Result, ValidationError, ValidationIssue};
pub use registry::ToolRegistry;
pub use schema::{Field, FieldType, ObjectSchema};
pub use tool::{Authenticated, Tool, ToolConfig, ToolDefinition, ensure_present, to_output};
