use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::errors::SwarmResult;

/// Caller state shared by every tool invocation within one run
pub type ContextVariables = HashMap<String, Value>;

/// The callable behind a tool: receives the shared context and the bound argument values
pub type ToolFn = Arc<dyn Fn(&mut ContextVariables, Vec<Value>) -> SwarmResult<Value> + Send + Sync>;

/// How call arguments are turned into the values handed to a tool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgumentBinding {
    /// Bind by declared parameter name, in declaration order
    Named,
    /// Pass argument values in the order the model listed them
    Positional,
}

/// A declared tool parameter
#[derive(Debug, Clone, PartialEq)]
pub struct ToolParameter {
    pub name: String,
    /// JSON schema describing the parameter, sent to the model
    pub schema: Value,
}

/// A named capability the model may request
#[derive(Clone)]
pub struct Tool {
    pub name: String,
    pub description: String,
    pub parameters: Vec<ToolParameter>,
    pub binding: ArgumentBinding,
    func: ToolFn,
}

impl Tool {
    /// Create a new tool with the given name and description
    pub fn new<N, D, F>(name: N, description: D, func: F) -> Self
    where
        N: Into<String>,
        D: Into<String>,
        F: Fn(&mut ContextVariables, Vec<Value>) -> SwarmResult<Value> + Send + Sync + 'static,
    {
        Tool {
            name: name.into(),
            description: description.into(),
            parameters: Vec::new(),
            binding: ArgumentBinding::Named,
            func: Arc::new(func),
        }
    }

    /// Declare a named parameter; values are bound in declaration order
    pub fn with_parameter<S: Into<String>>(mut self, name: S, schema: Value) -> Self {
        self.parameters.push(ToolParameter {
            name: name.into(),
            schema,
        });
        self
    }

    /// Pass argument values in the order the model produced them, ignoring names.
    ///
    /// Only safe when the model is known to emit arguments in the same order the
    /// tool expects them.
    pub fn positional(mut self) -> Self {
        self.binding = ArgumentBinding::Positional;
        self
    }

    /// Resolve the values to pass for a set of call arguments
    pub fn bind_arguments(&self, arguments: &Map<String, Value>) -> Vec<Value> {
        match self.binding {
            ArgumentBinding::Positional => arguments.values().cloned().collect(),
            ArgumentBinding::Named => self
                .parameters
                .iter()
                .map(|param| arguments.get(&param.name).cloned().unwrap_or(Value::Null))
                .collect(),
        }
    }

    /// Invoke the tool body
    pub fn call(&self, context: &mut ContextVariables, args: Vec<Value>) -> SwarmResult<Value> {
        (self.func)(context, args)
    }

    /// JSON schema for the tool's arguments
    pub fn input_schema(&self) -> Value {
        let properties: Map<String, Value> = self
            .parameters
            .iter()
            .map(|param| (param.name.clone(), param.schema.clone()))
            .collect();
        let required: Vec<&str> = self.parameters.iter().map(|p| p.name.as_str()).collect();
        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }
}

impl fmt::Debug for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tool")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("parameters", &self.parameters)
            .field("binding", &self.binding)
            .finish_non_exhaustive()
    }
}
