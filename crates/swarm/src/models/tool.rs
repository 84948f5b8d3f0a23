use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The function half of a tool call: which tool to run and with what arguments
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FunctionCall {
    /// The name of the tool to execute
    pub name: String,
    /// Arguments keyed by parameter name, in the order the model produced them
    #[serde(default)]
    pub arguments: Map<String, Value>,
}

/// A tool call requested by the model in an assistant message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolCallRequest {
    pub id: String,
    pub function: FunctionCall,
}

impl ToolCallRequest {
    /// Create a new request for the named tool
    ///
    /// Non-object `arguments` are treated as an empty argument list.
    pub fn new<I: Into<String>, N: Into<String>>(id: I, name: N, arguments: Value) -> Self {
        let arguments = match arguments {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self {
            id: id.into(),
            function: FunctionCall {
                name: name.into(),
                arguments,
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.function.name
    }
}
