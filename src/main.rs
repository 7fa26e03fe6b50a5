//! # TbGuide: semantic retrieval over TB guideline text and tables
//!
//! Usage:
//!   tbguide serve                        # Start the HTTP gateway
//!   tbguide serve --port 8080            # Custom port
//!   tbguide ask "question..."            # One-shot query from the terminal

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use tbguide_core::TbGuideConfig;
use tbguide_core::types::AskResponse;
use tbguide_corpus::CorpusStore;
use tbguide_embeddings::create_embedder;

#[derive(Parser)]
#[command(
    name = "tbguide",
    version,
    about = "Semantic retrieval over TB guideline text and tables"
)]
struct Cli {
    /// Path to config file (default: ~/.tbguide/config.toml)
    #[arg(long)]
    config: Option<String>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the HTTP gateway
    Serve {
        /// Bind host
        #[arg(long)]
        host: Option<String>,

        /// Bind port
        #[arg(long)]
        port: Option<u16>,

        /// Corpus directory override
        #[arg(long)]
        corpus_dir: Option<String>,
    },
    /// Answer one question from the terminal (no HTTP)
    Ask {
        /// The clinical question
        question: String,

        /// Number of results
        #[arg(long, default_value = "8")]
        top_k: usize,

        /// Explicit topical scope
        #[arg(long)]
        scope: Option<String>,

        /// Explicit document hint
        #[arg(long)]
        hint: Option<String>,

        /// Corpus directory override
        #[arg(long)]
        corpus_dir: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "debug,hyper=info,reqwest=info"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    let mut config = match &cli.config {
        Some(path) => {
            let expanded = shellexpand::tilde(path).to_string();
            TbGuideConfig::load_from(std::path::Path::new(&expanded))?
        }
        None => TbGuideConfig::load()?,
    };

    match cli.command {
        Command::Serve {
            host,
            port,
            corpus_dir,
        } => {
            if let Some(host) = host {
                config.gateway.host = host;
            }
            if let Some(port) = port {
                config.gateway.port = port;
            }
            if let Some(dir) = corpus_dir {
                config.corpus.dir = dir;
            }
            tbguide_gateway::start(config).await?;
        }
        Command::Ask {
            question,
            top_k,
            scope,
            hint,
            corpus_dir,
        } => {
            if let Some(dir) = corpus_dir {
                config.corpus.dir = dir;
            }
            let store = CorpusStore::shared(&config)?;
            let embedder = create_embedder(&config)?;

            let query_vector = embedder.embed(&question).await?;
            let outcome = tbguide_retrieval::retrieve(
                &store,
                &query_vector,
                &question,
                scope,
                hint,
                top_k,
                &config.retrieval,
            )?;

            let results = outcome
                .ranked
                .iter()
                .map(|candidate| tbguide_gateway::routes::build_result_item(&store, candidate))
                .collect();
            let response = AskResponse {
                question,
                top_k: top_k.clamp(1, tbguide_core::types::MAX_TOP_K),
                scope: outcome.scope,
                document_hint: outcome.document_hint,
                results,
            };
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}
