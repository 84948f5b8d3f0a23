use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::role::Role;
use super::tool::ToolCallRequest;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// One turn of the conversation
pub struct Message {
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Only present on assistant messages that ask for tool invocations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCallRequest>>,
    /// Only present on tool messages, naming the request they answer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl Message {
    fn new(role: Role, content: Option<String>) -> Self {
        Message {
            role,
            content,
            tool_calls: None,
            tool_call_id: None,
        }
    }

    /// Create a new system message
    pub fn system<S: Into<String>>(text: S) -> Self {
        Self::new(Role::System, Some(text.into()))
    }

    /// Create a new user message
    pub fn user<S: Into<String>>(text: S) -> Self {
        Self::new(Role::User, Some(text.into()))
    }

    /// Create a new assistant message with no content yet
    pub fn assistant() -> Self {
        Self::new(Role::Assistant, None)
    }

    /// Create a tool result message from a dispatch result
    ///
    /// Strings are carried verbatim, `null` or a missing result becomes absent
    /// content, and any other value is JSON encoded.
    pub fn tool<S: Into<String>>(tool_call_id: S, result: Option<Value>) -> Self {
        let content = match result {
            None | Some(Value::Null) => None,
            Some(Value::String(text)) => Some(text),
            Some(other) => Some(other.to_string()),
        };
        Message {
            tool_call_id: Some(tool_call_id.into()),
            ..Self::new(Role::Tool, content)
        }
    }

    /// Set the text content of the message
    pub fn with_text<S: Into<String>>(mut self, text: S) -> Self {
        self.content = Some(text.into());
        self
    }

    /// Add a tool call request to the message
    pub fn with_tool_call(mut self, tool_call: ToolCallRequest) -> Self {
        self.tool_calls.get_or_insert_with(Vec::new).push(tool_call);
        self
    }

    /// The requested tool calls, if the message asks for any
    pub fn requested_tool_calls(&self) -> Option<&[ToolCallRequest]> {
        self.tool_calls
            .as_deref()
            .filter(|calls| !calls.is_empty())
    }

    pub fn text(&self) -> &str {
        self.content.as_deref().unwrap_or("")
    }
}
