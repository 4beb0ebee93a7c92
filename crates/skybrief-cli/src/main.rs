use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use console::style;
use tracing_subscriber::EnvFilter;

use skybrief::adapters::avwx::AvwxClient;
use skybrief::adapters::weather_toolset;
use skybrief::agent::{Agent, SYSTEM_PROMPT};
use skybrief::config::Config;
use skybrief::conversation::Conversation;
use skybrief::providers::openai::{OpenAiProvider, OpenAiProviderConfig};

mod prompt;
mod session;

use prompt::rustyline::RustylinePrompt;
use session::Session;

#[derive(Parser)]
#[command(author, version, about = "Conversational aviation weather briefings", long_about = None)]
struct Cli {
    /// Model to use for the chat endpoint
    #[arg(short, long)]
    model: Option<String>,

    /// Override the chat endpoint host
    #[arg(long)]
    host: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Quiet by default; RUST_LOG opens it up.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{} {err}", style("Configuration error:").red().bold());
            eprintln!("Set the keys in your environment or a .env file and try again.");
            std::process::exit(1);
        }
    };
    if let Some(model) = cli.model {
        config.model = model;
    }
    if let Some(host) = cli.host {
        config.openai_host = host;
    }

    let provider = OpenAiProvider::new(OpenAiProviderConfig::from_config(&config))?;
    let registry = weather_toolset(&config)?;
    let avwx = Arc::new(AvwxClient::new(&config.avwx_api_key)?);

    let agent = Agent::new(Box::new(provider), registry);
    let conversation = Conversation::new(SYSTEM_PROMPT);

    let mut session = Session::new(agent, Box::new(RustylinePrompt::new()), avwx, conversation);
    session.start().await
}
