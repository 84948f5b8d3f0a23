use anyhow::Result;
use bat::WrappingMode;
use cliclack::{input, spinner};
use console::style;
use tokio_util::sync::CancellationToken;

use swarm::agent::Agent;
use swarm::models::message::Message;
use swarm::models::role::Role;
use swarm::runner::{RunOptions, Runner};
use swarm::tool::ContextVariables;

/// A conversation with one agent; the transcript and context variables persist
/// across messages
pub struct Session {
    runner: Runner,
    agent: Agent,
    max_turns: Option<usize>,
    debug: bool,
    messages: Vec<Message>,
    context_variables: ContextVariables,
}

impl Session {
    pub fn new(runner: Runner, agent: Agent, max_turns: Option<usize>, debug: bool) -> Self {
        Session {
            runner,
            agent,
            max_turns,
            debug,
            messages: Vec::new(),
            context_variables: ContextVariables::new(),
        }
    }

    /// Send one user message and return everything the run appended after it
    ///
    /// On failure the transcript and context variables keep whatever the run
    /// produced before the error.
    pub async fn send(&mut self, text: &str, cancel_token: CancellationToken) -> Result<Vec<Message>> {
        self.messages.push(Message::user(text));
        let start = self.messages.len();

        let mut options = RunOptions::default()
            .with_debug(self.debug)
            .with_cancel_token(cancel_token);
        options.max_turns = self.max_turns;

        let response = self
            .runner
            .run(
                &self.agent,
                &mut self.messages,
                &mut self.context_variables,
                options,
            )
            .await?;
        if response.cancelled {
            tracing::warn!(turns = response.turns, "reply interrupted");
        }
        Ok(response.messages[start..].to_vec())
    }

    /// Run an interactive session until the user types "exit"
    pub async fn start(&mut self) -> Result<()> {
        println!(
            "{} {}",
            style(format!("Chatting with {}", self.agent.name)).bold(),
            style("- type \"exit\" to end the session, ctrl-c interrupts a reply").dim()
        );
        println!();

        loop {
            let message_text: String = input("Message:").placeholder("").interact()?;
            if message_text.trim().eq_ignore_ascii_case("exit") {
                break;
            }

            let spin = spinner();
            spin.start("awaiting reply");
            let result = self.send_interruptible(&message_text).await;
            spin.stop("");

            match result {
                Ok(appended) => appended.iter().for_each(render),
                Err(e) => eprintln!("{} {}", style("Error:").red().bold(), e),
            }
            println!();
        }
        Ok(())
    }

    /// Send a message, cancelling the run on ctrl-c
    pub async fn send_interruptible(&mut self, text: &str) -> Result<Vec<Message>> {
        let token = CancellationToken::new();
        let trigger = token.clone();
        let watcher = tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                trigger.cancel();
            }
        });
        let result = self.send(text, token).await;
        watcher.abort();
        result
    }
}

pub fn render(message: &Message) {
    match message.role {
        Role::Assistant => {
            if let Some(calls) = message.requested_tool_calls() {
                for call in calls {
                    let arguments = serde_json::Value::Object(call.function.arguments.clone());
                    println!(
                        "{} {}({})",
                        style("Tool Request:").cyan(),
                        style(call.name()).bold(),
                        arguments
                    );
                }
            }
            if !message.text().is_empty() {
                print_markdown(message.text());
            }
        }
        Role::Tool => {
            let content = message.content.as_deref().unwrap_or("null");
            println!("{} {}", style("Tool Response:").cyan(), style(content).dim());
        }
        Role::User | Role::System => println!("{}", message.text()),
    }
}

fn print_markdown(content: &str) {
    let printed = bat::PrettyPrinter::new()
        .input_from_bytes(content.as_bytes())
        .language("Markdown")
        .wrapping_mode(WrappingMode::Character)
        .print();
    if printed.is_err() {
        println!("{}", content);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::memory_tools;
    use anyhow::anyhow;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;
    use swarm::models::tool::ToolCallRequest;
    use swarm::providers::base::{Provider, Usage};
    use swarm::tool::Tool;

    struct ScriptedProvider(Mutex<Vec<Message>>);

    #[async_trait]
    impl Provider for ScriptedProvider {
        async fn complete(
            &self,
            _model: &str,
            _messages: &[Message],
            _tools: &[Tool],
        ) -> Result<(Message, Usage)> {
            let mut responses = self.0.lock().unwrap();
            if responses.is_empty() {
                return Err(anyhow!("No more scripted responses"));
            }
            Ok((responses.remove(0), Usage::default()))
        }
    }

    #[tokio::test]
    async fn test_context_persists_between_messages() -> Result<()> {
        let provider = ScriptedProvider(Mutex::new(vec![
            Message::assistant().with_tool_call(ToolCallRequest::new(
                "1",
                "remember",
                json!({"key": "color", "value": "blue"}),
            )),
            Message::assistant().with_text("Noted."),
            Message::assistant().with_tool_call(ToolCallRequest::new(
                "2",
                "recall",
                json!({"key": "color"}),
            )),
            Message::assistant().with_text("Blue."),
        ]));
        let mut agent = Agent::new("Helper", "Remember things");
        agent.tools = memory_tools();
        let mut session = Session::new(Runner::new(Box::new(provider)), agent, Some(5), false);

        let first = session.send("My color is blue", CancellationToken::new()).await?;
        assert_eq!(first.len(), 3);
        assert_eq!(first[2].text(), "Noted.");

        let second = session.send("What is my color?", CancellationToken::new()).await?;
        assert_eq!(second[1].text(), "blue");
        assert_eq!(session.messages.len(), 8);
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_reply_keeps_remembered_values() -> Result<()> {
        // The second completion fails because nothing more is scripted
        let provider = ScriptedProvider(Mutex::new(vec![Message::assistant().with_tool_call(
            ToolCallRequest::new("1", "remember", json!({"key": "color", "value": "blue"})),
        )]));
        let mut agent = Agent::new("Helper", "Remember things");
        agent.tools = memory_tools();
        let mut session = Session::new(Runner::new(Box::new(provider)), agent, None, false);

        let result = session.send("My color is blue", CancellationToken::new()).await;

        assert!(result.is_err());
        assert_eq!(session.messages[2].text(), "Stored color");
        assert_eq!(session.context_variables.get("color"), Some(&json!("blue")));
        Ok(())
    }
}
