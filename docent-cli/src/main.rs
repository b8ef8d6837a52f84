//! Docent CLI - run skill-aware conversations from the terminal

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use docent_core::prelude::*;
use tokio::io::{AsyncBufReadExt, BufReader};

const DEFAULT_MESSAGE: &str =
    "Write a SQL query to find all customers who made orders over $1000 in the last month";

#[derive(Parser)]
#[command(name = "docent")]
#[command(about = "SQL assistant with progressive skill disclosure", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file (overrides DOCENT_CONFIG_PATH)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding `<skill>.md` files
    #[arg(long, global = true, env = "DOCENT_SKILLS_DIR")]
    skills_dir: Option<PathBuf>,

    /// Thread id for this session (random by default). History is held in
    /// memory, so a thread continues only within one process; use
    /// --interactive for follow-up turns.
    #[arg(long)]
    thread_id: Option<ThreadId>,

    /// After the first turn, read further messages from stdin, one per line,
    /// as follow-up turns on the same thread
    #[arg(short, long)]
    interactive: bool,

    /// User message for this turn
    message: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the skills advertised to the model
    Skills,
    /// Version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => DocentConfig::from_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => DocentConfig::load()?,
    };
    if let Some(dir) = &cli.skills_dir {
        config.skills.dir = dir.clone();
    }

    match cli.command {
        Some(Commands::Version) => {
            println!("docent {}", env!("CARGO_PKG_VERSION"));
            println!("docent-core {}", docent_core::VERSION);
        }
        Some(Commands::Skills) => {
            let registry = skill_registry(&config)?;
            for (name, description) in registry.describe_all() {
                println!("{name}: {description}");
            }
        }
        None => {
            let message = cli.message.unwrap_or_else(|| DEFAULT_MESSAGE.to_string());
            let thread_id = cli.thread_id.unwrap_or_default();
            run_session(config, thread_id, message, cli.interactive).await?;
        }
    }

    Ok(())
}

fn skill_registry(config: &DocentConfig) -> Result<SkillRegistry> {
    if config.skills.discover {
        SkillRegistry::discover(&config.skills.dir)
            .with_context(|| format!("discovering skills in {}", config.skills.dir.display()))
    } else {
        Ok(SkillRegistry::builtin())
    }
}

async fn run_session(
    config: DocentConfig,
    thread_id: ThreadId,
    message: String,
    interactive: bool,
) -> Result<()> {
    let registry = skill_registry(&config)?;
    let provider = LLMProviderFactory::create(&config.llm)?;
    let store = Arc::new(FileSkillStore::new(config.skills.dir.clone()));

    let agent = SkillAgent::builder()
        .config(config)
        .llm_provider(provider)
        .skill_registry(registry)
        .skill_store(store)
        .build()?;

    tracing::info!(thread_id = %thread_id, "Running turn");
    let history = agent.invoke(&thread_id, message).await?;
    print_messages(&history);

    if interactive {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = lines.next_line().await? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let outcome = agent.invoke_turn(&thread_id, line).await?;
            print_messages(&outcome.messages);
        }
    }

    println!();
    println!("thread: {thread_id}");

    Ok(())
}

fn print_messages(messages: &[Message]) {
    for message in messages {
        println!("{}: {}", message.role, message.content);
        for call in &message.tool_calls {
            println!("  -> {}({})", call.name, call.arguments_text());
        }
    }
}
