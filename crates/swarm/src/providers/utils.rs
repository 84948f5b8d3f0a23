use anyhow::{anyhow, Context, Result};
use serde_json::{json, Map, Value};
use std::collections::HashSet;

use crate::models::message::Message;
use crate::models::tool::{FunctionCall, ToolCallRequest};
use crate::tool::Tool;

/// Convert internal Message format to OpenAI's API message specification
///
/// Tool call arguments are re-encoded as a JSON string, which is what the
/// chat-completions endpoint expects.
pub fn messages_to_openai_spec(messages: &[Message]) -> Vec<Value> {
    messages
        .iter()
        .map(|message| {
            let mut converted = json!({
                "role": message.role,
                "content": message.content,
            });

            if let Some(tool_calls) = &message.tool_calls {
                let calls: Vec<Value> = tool_calls
                    .iter()
                    .map(|call| {
                        json!({
                            "id": call.id,
                            "type": "function",
                            "function": {
                                "name": call.function.name,
                                "arguments": Value::Object(call.function.arguments.clone()).to_string(),
                            }
                        })
                    })
                    .collect();
                converted["tool_calls"] = json!(calls);
            }

            if let Some(id) = &message.tool_call_id {
                converted["tool_call_id"] = json!(id);
            }

            converted
        })
        .collect()
}

/// Convert internal Tool format to OpenAI's API tool specification
///
/// Only the first tool with a given name is advertised, matching how calls are
/// dispatched.
pub fn tools_to_openai_spec(tools: &[Tool]) -> Vec<Value> {
    let mut tool_names = HashSet::new();
    tools
        .iter()
        .filter(|tool| tool_names.insert(tool.name.as_str()))
        .map(|tool| {
            json!({
                "type": "function",
                "function": {
                    "name": tool.name,
                    "description": tool.description,
                    "parameters": tool.input_schema(),
                }
            })
        })
        .collect()
}

/// Convert OpenAI's API response to internal Message format
pub fn openai_response_to_message(response: &Value) -> Result<Message> {
    let original = response
        .get("choices")
        .and_then(|choices| choices.get(0))
        .and_then(|choice| choice.get("message"))
        .ok_or_else(|| anyhow!("Malformed response, no choices[0].message: {}", response))?;

    let mut message = Message::assistant();
    if let Some(text) = original.get("content").and_then(Value::as_str) {
        message = message.with_text(text);
    }

    if let Some(tool_calls) = original.get("tool_calls").and_then(Value::as_array) {
        for tool_call in tool_calls {
            message = message.with_tool_call(parse_tool_call(tool_call)?);
        }
    }

    Ok(message)
}

fn parse_tool_call(tool_call: &Value) -> Result<ToolCallRequest> {
    let id = tool_call["id"].as_str().unwrap_or_default().to_string();
    let name = tool_call["function"]["name"]
        .as_str()
        .ok_or_else(|| anyhow!("Tool call {} has no function name", id))?
        .to_string();

    // Some compatible endpoints send arguments as an object instead of a string
    let arguments = match &tool_call["function"]["arguments"] {
        Value::String(raw) if raw.trim().is_empty() => Map::new(),
        Value::String(raw) => match serde_json::from_str::<Value>(raw)
            .with_context(|| format!("Could not interpret arguments for tool call {}", id))?
        {
            Value::Object(map) => map,
            other => return Err(anyhow!("Arguments for tool call {} are not an object: {}", id, other)),
        },
        Value::Object(map) => map.clone(),
        Value::Null => Map::new(),
        other => return Err(anyhow!("Arguments for tool call {} are not an object: {}", id, other)),
    };

    Ok(ToolCallRequest {
        id,
        function: FunctionCall { name, arguments },
    })
}

#[derive(Debug, thiserror::Error)]
#[error("Context length exceeded. Message: {0}")]
pub struct ContextLengthExceededError(String);

pub fn check_openai_context_length_error(error: &Value) -> Option<ContextLengthExceededError> {
    let code = error.get("code")?.as_str()?;
    if code == "context_length_exceeded" || code == "string_above_max_length" {
        let message = error
            .get("message")
            .and_then(|m| m.as_str())
            .unwrap_or("Unknown error")
            .to_string();
        Some(ContextLengthExceededError(message))
    } else {
        None
    }
}
