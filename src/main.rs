//! # FaqClaw — FAQ support bot
//!
//! Lexical TF-IDF retrieval over a FAQ dataset with optional LLM
//! refinement and fallback.
//!
//! Usage:
//!   faqclaw chat                          # Interactive chat loop
//!   faqclaw ask "how do I track my order" # One-shot question
//!   faqclaw chat --no-llm                 # Retrieval only, no provider

use std::io::{BufRead, Write};
use std::path::Path;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use faqclaw_bot::SupportBot;
use faqclaw_core::FaqClawConfig;
use faqclaw_retrieval::{EngineOptions, FaqEngine};

#[derive(Parser)]
#[command(name = "faqclaw", version, about = "🤖 FaqClaw — FAQ support bot")]
struct Cli {
    /// Path to config file (default: ~/.faqclaw/config.toml)
    #[arg(long)]
    config: Option<String>,

    /// Path to the FAQ dataset (JSON array)
    #[arg(long)]
    faqs: Option<String>,

    /// Similarity threshold override (0–1)
    #[arg(long)]
    threshold: Option<f32>,

    /// Provider name override ("openai", "openrouter", "ollama", "custom:<url>", ...)
    #[arg(long)]
    provider: Option<String>,

    /// Model id override
    #[arg(long)]
    model: Option<String>,

    /// Disable the LLM entirely (retrieval-only answers)
    #[arg(long)]
    no_llm: bool,

    /// Disable answer refinement (matched FAQs are returned verbatim)
    #[arg(long)]
    no_refine: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Interactive chat loop on stdin
    Chat,
    /// Answer a single question and exit
    Ask {
        /// The question to answer
        question: Vec<String>,
    },
}

fn expand_path(p: &str) -> String {
    shellexpand::tilde(p).to_string()
}

fn load_config(cli: &Cli) -> Result<FaqClawConfig> {
    let mut config = match &cli.config {
        Some(path) => FaqClawConfig::load_from(Path::new(&expand_path(path)))?,
        None => FaqClawConfig::load()?,
    };
    if let Some(faqs) = &cli.faqs {
        config.retrieval.faq_path = faqs.clone();
    }
    if let Some(threshold) = cli.threshold {
        config.retrieval.threshold = threshold;
    }
    if let Some(provider) = &cli.provider {
        config.llm.provider = provider.clone();
    }
    if let Some(model) = &cli.model {
        config.llm.model = model.clone();
    }
    if cli.no_refine {
        config.retrieval.refine = false;
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "faqclaw=debug,faqclaw_bot=debug,faqclaw_retrieval=debug,faqclaw_providers=debug"
    } else {
        "faqclaw=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    let config = load_config(&cli)?;

    // Build the retrieval snapshot. An empty or malformed dataset stops
    // here — the bot never serves without a corpus.
    let faq_path = expand_path(&config.retrieval.faq_path);
    let engine = FaqEngine::load(
        Path::new(&faq_path),
        EngineOptions {
            threshold: config.retrieval.threshold,
            stop_words: config.retrieval.stop_words,
            bigrams: config.retrieval.bigrams,
        },
    )?;

    // The LLM is optional: without it the bot answers matched FAQs
    // verbatim and falls back to the canned support message.
    let provider = if cli.no_llm {
        None
    } else {
        match faqclaw_providers::create_provider_chain(&config) {
            Ok(p) => match p.health_check().await {
                Ok(true) => Some(p),
                // No API key / unreachable local server: run retrieval-only,
                // exactly as if --no-llm had been passed.
                _ => {
                    tracing::warn!(
                        "Provider '{}' is not usable (missing API key?) — LLM disabled",
                        p.name()
                    );
                    None
                }
            },
            Err(e) => {
                tracing::warn!("LLM disabled: {e}");
                None
            }
        }
    };

    let bot = SupportBot::new(engine, provider, &config);

    match cli.command {
        Command::Ask { question } => {
            let question = question.join(" ");
            let reply = bot.reply(&question).await?;
            println!("{}", reply.text);
        }
        Command::Chat => {
            println!("🤖 FaqClaw ready. Ask about orders, returns, payments, or shipping.");
            println!("   (empty line or Ctrl-D to quit)\n");
            let stdin = std::io::stdin();
            loop {
                print!("you> ");
                std::io::stdout().flush()?;
                let mut line = String::new();
                if stdin.lock().read_line(&mut line)? == 0 {
                    break;
                }
                let line = line.trim();
                if line.is_empty() {
                    break;
                }
                let reply = bot.reply(line).await?;
                println!("bot> {}\n", reply.text);
            }
            println!("👋 Bye!");
        }
    }

    Ok(())
}
