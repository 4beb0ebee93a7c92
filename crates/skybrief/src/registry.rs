use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::tool::ToolSpec;

/// Performs the side-effecting work behind one registered tool.
///
/// Arguments arrive already parsed and validated against the tool's declared
/// schema. Handlers never fail past this boundary: a handler that cannot
/// produce an answer encodes the failure in its returned text, marked with ❌
/// so the model can read it and respond accordingly.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    async fn call(&self, args: &Value) -> String;
}

struct RegisteredTool {
    spec: ToolSpec,
    handler: Box<dyn ToolHandler>,
}

/// Dispatch failures, structured internally and rendered to marked strings
/// at the boundary.
#[derive(Debug, Error)]
enum DispatchError {
    #[error("❌ Unknown tool: {0}")]
    UnknownTool(String),
    #[error("❌ Invalid arguments for {tool}: {reason}")]
    MalformedArguments { tool: String, reason: String },
}

/// The fixed catalog of tools the model may invoke during a conversation.
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<RegisteredTool>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool under its spec's name.
    ///
    /// Panics on a duplicate name: the catalog is assembled once at startup
    /// from literals, so a collision is a programming error rather than a
    /// runtime condition.
    pub fn register(&mut self, spec: ToolSpec, handler: impl ToolHandler + 'static) -> &mut Self {
        assert!(
            self.lookup(&spec.name).is_none(),
            "duplicate tool name: {}",
            spec.name
        );
        self.tools.push(RegisteredTool {
            spec,
            handler: Box::new(handler),
        });
        self
    }

    /// The specs exposed to the model, in registration order.
    pub fn specs(&self) -> Vec<ToolSpec> {
        self.tools.iter().map(|tool| tool.spec.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    fn lookup(&self, name: &str) -> Option<&RegisteredTool> {
        self.tools.iter().find(|tool| tool.spec.name == name)
    }

    /// Resolve one model-requested invocation to its result text.
    ///
    /// This never returns an error: unknown names, malformed argument
    /// payloads, and handler failures all come back as text destined for the
    /// conversation, so the loop cannot crash on a hallucinated tool name or
    /// a bad payload.
    pub async fn dispatch(&self, name: &str, raw_args: &str) -> String {
        match self.try_dispatch(name, raw_args).await {
            Ok(result) => result,
            Err(err) => {
                warn!(tool = name, %err, "tool dispatch rejected");
                err.to_string()
            }
        }
    }

    async fn try_dispatch(&self, name: &str, raw_args: &str) -> Result<String, DispatchError> {
        let tool = self
            .lookup(name)
            .ok_or_else(|| DispatchError::UnknownTool(name.to_string()))?;
        let args = parse_args(&tool.spec, raw_args)?;
        debug!(tool = name, "dispatching tool call");
        Ok(tool.handler.call(&args).await)
    }
}

/// Parse a raw argument payload and check it against the tool's schema.
/// Parameters beyond the declared ones are tolerated; models add them.
fn parse_args(spec: &ToolSpec, raw_args: &str) -> Result<Value, DispatchError> {
    let malformed = |reason: String| DispatchError::MalformedArguments {
        tool: spec.name.clone(),
        reason,
    };

    // Some gateways serialize a no-argument call as an empty string.
    let raw = if raw_args.trim().is_empty() {
        "{}"
    } else {
        raw_args
    };

    let args: Value = serde_json::from_str(raw)
        .map_err(|err| malformed(format!("payload is not valid JSON: {err}")))?;

    let object = args
        .as_object()
        .ok_or_else(|| malformed("payload must be a JSON object".to_string()))?;

    for param in &spec.parameters {
        match object.get(&param.name) {
            Some(value) if value.is_string() => {}
            Some(_) => {
                return Err(malformed(format!(
                    "parameter `{}` must be a string",
                    param.name
                )))
            }
            None if param.required => {
                return Err(malformed(format!(
                    "missing required parameter `{}`",
                    param.name
                )))
            }
            None => {}
        }
    }

    Ok(args)
}
