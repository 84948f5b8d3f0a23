use crate::tool::Tool;

/// Model used when an agent does not name one
pub const DEFAULT_MODEL: &str = "deepseek-chat";

/// Agent bundles the instructions, model choice and tools used to drive a run
#[derive(Debug, Clone)]
pub struct Agent {
    pub name: String,
    pub instructions: String,
    pub model: Option<String>,
    pub tools: Vec<Tool>,
}

impl Agent {
    /// Create a new Agent with the default model and no tools
    pub fn new<N: Into<String>, I: Into<String>>(name: N, instructions: I) -> Self {
        Self {
            name: name.into(),
            instructions: instructions.into(),
            model: None,
            tools: Vec::new(),
        }
    }

    pub fn with_model<S: Into<String>>(mut self, model: S) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Add a tool to the agent
    pub fn with_tool(mut self, tool: Tool) -> Self {
        self.tools.push(tool);
        self
    }

    /// The model to request, falling back to [`DEFAULT_MODEL`]
    pub fn model(&self) -> &str {
        self.model.as_deref().unwrap_or(DEFAULT_MODEL)
    }
}
