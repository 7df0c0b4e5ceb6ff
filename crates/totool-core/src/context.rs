//! Runtime context handed to tools by agent runtimes
//!
//! Each agent runtime passes its own auxiliary data alongside a tool call.
//! Tools receive it as an opaque [`RuntimeContext`]; the only part the core
//! looks at is the optional cancellation signal.

use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;
use tokio_util::sync::CancellationToken;

/// Well-known configuration keys for graph-style runtimes
pub mod keys {
    /// Human-readable name of the current run
    pub const RUN_NAME: &str = "run_name";
    /// Unique identifier of the current run
    pub const RUN_ID: &str = "run_id";
    /// Tags attached to the run
    pub const TAGS: &str = "tags";
}

/// Configuration bag passed by graph/state-machine runtimes
///
/// # Example
///
/// ```
/// use totool_core::RunnableConfig;
///
/// let config = RunnableConfig::new()
///     .with_run_name("notes-agent")
///     .with_tags(["notion"]);
///
/// assert_eq!(config.run_name(), Some("notes-agent"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct RunnableConfig {
    data: HashMap<String, Value>,
    signal: Option<CancellationToken>,
}

impl RunnableConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_run_name(mut self, name: impl Into<String>) -> Self {
        self.insert(keys::RUN_NAME, Value::String(name.into()));
        self
    }

    pub fn with_run_id(mut self, id: impl Into<String>) -> Self {
        self.insert(keys::RUN_ID, Value::String(id.into()));
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tags = tags.into_iter().map(|t| Value::String(t.into())).collect();
        self.insert(keys::TAGS, Value::Array(tags));
        self
    }

    /// Attach a cancellation signal
    pub fn with_signal(mut self, signal: CancellationToken) -> Self {
        self.signal = Some(signal);
        self
    }

    pub fn run_name(&self) -> Option<&str> {
        self.get(keys::RUN_NAME).and_then(Value::as_str)
    }

    pub fn run_id(&self) -> Option<&str> {
        self.get(keys::RUN_ID).and_then(Value::as_str)
    }

    pub fn signal(&self) -> Option<&CancellationToken> {
        self.signal.as_ref()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.data.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }
}

/// Context passed by stream-of-steps runtimes
#[derive(Debug, Clone, Default)]
pub struct StepContext {
    /// Optional abort signal for the whole step
    pub abort_signal: Option<CancellationToken>,
    /// Identifier of this tool call within the step
    pub tool_call_id: String,
    /// Conversation so far, in the runtime's own message format
    pub messages: Vec<Value>,
}

impl StepContext {
    pub fn new(tool_call_id: impl Into<String>) -> Self {
        Self {
            tool_call_id: tool_call_id.into(),
            ..Self::default()
        }
    }

    pub fn with_abort_signal(mut self, signal: CancellationToken) -> Self {
        self.abort_signal = Some(signal);
        self
    }

    pub fn with_messages(mut self, messages: Vec<Value>) -> Self {
        self.messages = messages;
        self
    }
}

/// Whatever the invoking runtime supplied with the call
#[derive(Debug, Clone)]
pub enum RuntimeContext {
    Runnable(RunnableConfig),
    Step(StepContext),
}

impl Default for RuntimeContext {
    fn default() -> Self {
        Self::Runnable(RunnableConfig::default())
    }
}

impl RuntimeContext {
    /// The cancellation signal, if the runtime provided one
    pub fn abort_signal(&self) -> Option<&CancellationToken> {
        match self {
            Self::Runnable(config) => config.signal(),
            Self::Step(step) => step.abort_signal.as_ref(),
        }
    }

    /// Tool call identifier (stream-of-steps runtimes only)
    pub fn tool_call_id(&self) -> Option<&str> {
        match self {
            Self::Runnable(_) => None,
            Self::Step(step) => Some(&step.tool_call_id),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.abort_signal()
            .is_some_and(CancellationToken::is_cancelled)
    }

    /// Drive `fut` unless the abort signal fires first
    ///
    /// Returns `None` when cancelled. Without a signal this is just `fut.await`.
    pub async fn until_cancelled<F: Future>(&self, fut: F) -> Option<F::Output> {
        match self.abort_signal() {
            Some(signal) => {
                tokio::select! {
                    biased;
                    () = signal.cancelled() => None,
                    output = fut => Some(output),
                }
            }
            None => Some(fut.await),
        }
    }
}

impl From<RunnableConfig> for RuntimeContext {
    fn from(config: RunnableConfig) -> Self {
        Self::Runnable(config)
    }
}

impl From<StepContext> for RuntimeContext {
    fn from(step: StepContext) -> Self {
        Self::Step(step)
    }
}
