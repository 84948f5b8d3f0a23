use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::SwarmResult;
use crate::models::tool::ToolCallRequest;
use crate::tool::{ContextVariables, Tool};

/// Dispatch a single tool call to the first tool with a matching name
///
/// Returns `Ok(None)` when no tool matches. Errors raised by the tool body are
/// returned unchanged.
pub fn dispatch(
    tool_call: &ToolCallRequest,
    tools: &[Tool],
    context_variables: &mut ContextVariables,
) -> SwarmResult<Option<Value>> {
    let Some(tool) = tools.iter().find(|tool| tool.name == tool_call.name()) else {
        warn!(tool = tool_call.name(), "no tool matches requested call");
        return Ok(None);
    };

    let args = tool.bind_arguments(&tool_call.function.arguments);
    debug!(tool = %tool.name, args = args.len(), "invoking tool");
    tool.call(context_variables, args).map(Some)
}
