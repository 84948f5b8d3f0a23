use serde_json::{json, Value};
use swarm::errors::SwarmError;
use swarm::tool::Tool;

/// Tools that keep notes in the run's context variables
pub fn memory_tools() -> Vec<Tool> {
    vec![remember(), recall()]
}

fn remember() -> Tool {
    Tool::new(
        "remember",
        "Store a value under a key for the rest of the conversation",
        |ctx, args| {
            let key = args[0]
                .as_str()
                .ok_or_else(|| SwarmError::InvalidParameters("key must be a string".into()))?;
            ctx.insert(key.to_string(), args[1].clone());
            Ok(json!(format!("Stored {}", key)))
        },
    )
    .with_parameter("key", json!({"type": "string", "description": "Name to store the value under"}))
    .with_parameter("value", json!({"type": "string", "description": "The value to remember"}))
}

fn recall() -> Tool {
    Tool::new(
        "recall",
        "Look up a value stored with the remember tool",
        |ctx, args| {
            let key = args[0]
                .as_str()
                .ok_or_else(|| SwarmError::InvalidParameters("key must be a string".into()))?;
            Ok(ctx.get(key).cloned().unwrap_or(Value::Null))
        },
    )
    .with_parameter("key", json!({"type": "string", "description": "Name the value was stored under"}))
}
