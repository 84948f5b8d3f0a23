use anyhow::Result;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::agent::Agent;
use crate::dispatch::dispatch;
use crate::models::message::Message;
use crate::providers::base::Provider;
use crate::tool::ContextVariables;

/// Per-run knobs for [`Runner::run`]
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Upper bound on turns; `None` runs until the model stops calling tools
    pub max_turns: Option<usize>,
    /// Echo every assistant message as `<agent>: <content>` on the `swarm::debug` target
    pub debug: bool,
    /// Stops the run before the next turn, or while a completion is pending
    pub cancel_token: Option<CancellationToken>,
}

impl RunOptions {
    pub fn with_max_turns(mut self, max_turns: usize) -> Self {
        self.max_turns = Some(max_turns);
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_cancel_token(mut self, cancel_token: CancellationToken) -> Self {
        self.cancel_token = Some(cancel_token);
        self
    }
}

/// Result of a run
#[derive(Debug)]
pub struct Response<'a> {
    /// The agent the run finished with; always the one it started with
    pub agent: &'a Agent,
    /// The caller's transcript, including everything appended by the run
    pub messages: &'a [Message],
    /// Number of completions requested
    pub turns: usize,
    /// Whether the run stopped because its cancel token fired
    pub cancelled: bool,
}

/// Runner drives an agent through repeated completions, dispatching the tool calls
/// the model asks for
pub struct Runner {
    provider: Box<dyn Provider>,
}

impl Runner {
    /// Create a new Runner over the specified provider
    pub fn new(provider: Box<dyn Provider>) -> Self {
        Self { provider }
    }

    /// Run the turn loop for `agent` over `messages`.
    ///
    /// Every completion and every tool result is pushed onto `messages` in place, and
    /// tools mutate `context_variables` in place, so when an error is returned both
    /// still hold what was produced up to the failure. The loop stops once a completion carries no tool calls or
    /// `max_turns` completions have been requested.
    ///
    /// Tool calls are only dispatched when the agent has tools. A completion that
    /// asks for tools on an agent without any is still appended, and the loop
    /// continues since it only looks at whether the completion asked for tools.
    pub async fn run<'a>(
        &self,
        agent: &'a Agent,
        messages: &'a mut Vec<Message>,
        context_variables: &mut ContextVariables,
        options: RunOptions,
    ) -> Result<Response<'a>> {
        let RunOptions {
            max_turns,
            debug: echo,
            cancel_token,
        } = options;

        let mut num_turns = 0;
        let mut turns = 0;
        let mut cancelled = false;

        while max_turns.map_or(true, |max| num_turns < max) {
            if cancel_token.as_ref().is_some_and(CancellationToken::is_cancelled) {
                info!(agent = %agent.name, turns, "run cancelled");
                cancelled = true;
                break;
            }

            let mut request = Vec::with_capacity(messages.len() + 1);
            request.push(Message::system(&agent.instructions));
            request.extend(messages.iter().cloned());

            let completion = self.provider.complete(agent.model(), &request, &agent.tools);
            let outcome = match &cancel_token {
                Some(token) => tokio::select! {
                    biased;
                    _ = token.cancelled() => None,
                    result = completion => Some(result),
                },
                None => Some(completion.await),
            };
            let Some(result) = outcome else {
                info!(agent = %agent.name, turns, "run cancelled while awaiting completion");
                cancelled = true;
                break;
            };
            let (message, usage) = result?;
            turns += 1;

            debug!(
                agent = %agent.name,
                turn = num_turns,
                input_tokens = ?usage.input_tokens,
                output_tokens = ?usage.output_tokens,
                "received completion"
            );
            if echo {
                info!(target: "swarm::debug", "{}: {}", agent.name, message.text());
            }

            let tool_calls = message.requested_tool_calls().map(<[_]>::to_vec);
            messages.push(message);

            if let Some(calls) = &tool_calls {
                if !agent.tools.is_empty() {
                    for call in calls {
                        let result = dispatch(call, &agent.tools, context_variables)?;
                        messages.push(Message::tool(&call.id, result));
                    }
                }
            }

            if tool_calls.is_none() || max_turns.is_some_and(|max| num_turns >= max) {
                break;
            }

            num_turns += 1;
        }

        Ok(Response {
            agent,
            messages,
            turns,
            cancelled,
        })
    }
}
