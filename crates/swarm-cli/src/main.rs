use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use swarm::configuration::Settings;
use swarm::providers::openai::OpenAiProvider;
use swarm::runner::Runner;

mod session;
mod tools;

use session::{render, Session};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Send a single message and exit instead of starting a session
    #[arg(short, long)]
    message: Option<String>,

    /// Model to use (overrides SWARM_AGENT__MODEL)
    #[arg(long)]
    model: Option<String>,

    /// System prompt for the agent (overrides SWARM_AGENT__INSTRUCTIONS)
    #[arg(long)]
    instructions: Option<String>,

    /// Maximum turns per message (overrides SWARM_RUN__MAX_TURNS)
    #[arg(long)]
    max_turns: Option<usize>,

    /// Echo every assistant message with the agent name
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.debug {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut settings = Settings::new().context("Failed to load configuration")?;
    if let Some(model) = cli.model {
        settings.agent.model = model;
    }
    if let Some(instructions) = cli.instructions {
        settings.agent.instructions = instructions;
    }

    let mut agent = settings.agent.to_agent();
    agent.tools = tools::memory_tools();

    let provider = OpenAiProvider::new(settings.provider.into_config())?;
    let runner = Runner::new(Box::new(provider));
    let max_turns = cli.max_turns.or(settings.run.max_turns);
    let debug = cli.debug || settings.run.debug;

    let mut session = Session::new(runner, agent, max_turns, debug);
    match cli.message {
        Some(message) => {
            let appended = session.send_interruptible(&message).await?;
            appended.iter().for_each(render);
        }
        None => session.start().await?,
    }
    Ok(())
}
