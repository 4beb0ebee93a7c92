use serde::{Deserialize, Serialize};

/// Who authored a turn in the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    System,
    User,
    Assistant,
    ToolResult,
}

/// A tool invocation the model has requested but the loop has not resolved.
///
/// `arguments` is kept exactly as the gateway serialized it; the registry is
/// responsible for deserializing it against the tool's declared schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingToolCall {
    /// Gateway-assigned identifier, unique within its assistant turn.
    pub id: String,
    /// Name of the tool to invoke.
    pub name: String,
    /// Serialized JSON argument payload.
    pub arguments: String,
}

impl PendingToolCall {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        arguments: impl Into<String>,
    ) -> Self {
        PendingToolCall {
            id: id.into(),
            name: name.into(),
            arguments: arguments.into(),
        }
    }
}

/// One entry in the conversation log.
///
/// Turns are created by the orchestration loop and never mutated after they
/// are appended. The builder constructors keep the field invariants: only
/// assistant turns carry pending calls, only tool-result turns carry a
/// correlation id, and content is absent only on an assistant turn that
/// requested tools without saying anything.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<PendingToolCall>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl Turn {
    /// The system framing that opens a conversation.
    pub fn system(text: impl Into<String>) -> Self {
        Turn {
            role: Role::System,
            content: Some(text.into()),
            tool_calls: Vec::new(),
            tool_call_id: None,
        }
    }

    /// A message typed by the user.
    pub fn user(text: impl Into<String>) -> Self {
        Turn {
            role: Role::User,
            content: Some(text.into()),
            tool_calls: Vec::new(),
            tool_call_id: None,
        }
    }

    /// A terminal assistant reply.
    pub fn assistant(text: impl Into<String>) -> Self {
        Turn {
            role: Role::Assistant,
            content: Some(text.into()),
            tool_calls: Vec::new(),
            tool_call_id: None,
        }
    }

    /// An assistant turn that requested tools, with optional leading text.
    pub fn assistant_with_calls(content: Option<String>, calls: Vec<PendingToolCall>) -> Self {
        Turn {
            role: Role::Assistant,
            content,
            tool_calls: calls,
            tool_call_id: None,
        }
    }

    /// The result of one dispatched tool call, correlated by id.
    pub fn tool_result(id: impl Into<String>, content: impl Into<String>) -> Self {
        Turn {
            role: Role::ToolResult,
            content: Some(content.into()),
            tool_calls: Vec::new(),
            tool_call_id: Some(id.into()),
        }
    }

    /// The text content, if any.
    pub fn text(&self) -> Option<&str> {
        self.content.as_deref()
    }

    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}
