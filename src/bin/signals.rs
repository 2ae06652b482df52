//! Signal engine CLI
//!
//! Command-line interface for running the pipeline, deduplicating ad-hoc
//! text, and serving the HTTP API.

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use percolate_signals::config::{parse_threshold, Config};
use percolate_signals::dedup::{DedupPolicy, Deduplicator};
use percolate_signals::embeddings::{EmbeddingProvider, ProviderFactory};
use percolate_signals::export::{write_signals, OutputFormat};
use percolate_signals::ingest::{JsonlSource, PostSource, RedditSource};
use percolate_signals::pipeline::SignalPipeline;
use percolate_signals::server::{self, AppState};
use std::io::{BufRead, Write};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Signal engine - ranked market signals from social posts
#[derive(Parser)]
#[command(name = "signals")]
#[command(about = "Social post signal engine with near-duplicate suppression", long_about = None)]
#[command(version)]
struct Cli {
    /// Log output format
    #[arg(long, env = "P8_LOG_FORMAT", value_enum, default_value = "text", global = true)]
    log_format: LogFormat,

    /// Embedding model (overrides P8_DEFAULT_EMBEDDING)
    #[arg(long, global = true)]
    model: Option<String>,

    /// Dedup policy: per-item or keep-first (overrides P8_DEDUP_POLICY)
    #[arg(long, global = true)]
    policy: Option<DedupPolicy>,

    /// Dedup distance threshold (overrides P8_DEDUP_THRESHOLD)
    #[arg(long, global = true, value_parser = threshold_arg)]
    threshold: Option<f32>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the pipeline once and print ranked signals
    Run {
        /// Read posts from a JSONL file instead of Reddit
        #[arg(long)]
        input: Option<PathBuf>,

        /// Output format: json, jsonl, csv
        #[arg(long, default_value = "json")]
        format: OutputFormat,

        /// Write to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Deduplicate texts from stdin (one per line) and print the report
    Dedup,

    /// Start the HTTP API
    Serve {
        /// Host to bind
        #[arg(long, env = "P8_HOST", default_value = "0.0.0.0")]
        host: String,

        /// Port to bind
        #[arg(long, env = "P8_PORT", default_value = "8000")]
        port: u16,
    },
}

fn threshold_arg(raw: &str) -> Result<f32, String> {
    parse_threshold(raw).map_err(|e| e.to_string())
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_format);

    let mut config = Config::from_env()?;
    if let Some(model) = cli.model {
        config.embedding_model = model;
    }
    if let Some(policy) = cli.policy {
        config.dedup.policy = policy;
    }
    if let Some(threshold) = cli.threshold {
        config.dedup.threshold = threshold;
    }

    match cli.command {
        Commands::Run {
            input,
            format,
            output,
        } => cmd_run(&config, input, format, output).await?,
        Commands::Dedup => cmd_dedup(&config).await?,
        Commands::Serve { host, port } => cmd_serve(&config, &host, port).await?,
    }

    Ok(())
}

// ============================================================================
// COMMANDS
// ============================================================================

async fn build_deduplicator(config: &Config) -> anyhow::Result<Deduplicator> {
    let embedder: Arc<dyn EmbeddingProvider> =
        ProviderFactory::from_model(&config.embedding_model, config.openai_api_key.as_deref())
            .await?;
    tracing::info!(
        model = embedder.model_name(),
        dimensions = embedder.dimensions(),
        policy = %config.dedup.policy,
        threshold = config.dedup.threshold,
        "Embedding provider ready"
    );
    Ok(Deduplicator::with_config(embedder, config.dedup))
}

async fn build_pipeline(
    config: &Config,
    input: Option<PathBuf>,
) -> anyhow::Result<SignalPipeline> {
    let source: Arc<dyn PostSource> = match input {
        Some(path) => {
            // Expand ~ in path
            let path = shellexpand::tilde(&path.to_string_lossy()).to_string();
            Arc::new(JsonlSource::new(path))
        }
        None => Arc::new(RedditSource::new(
            config.reddit.clone(),
            config.subreddits.clone(),
            config.post_limit,
        )),
    };

    Ok(SignalPipeline::new(source, build_deduplicator(config).await?)?)
}

async fn cmd_run(
    config: &Config,
    input: Option<PathBuf>,
    format: OutputFormat,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let pipeline = build_pipeline(config, input).await?;
    let result = pipeline.run().await?;

    match output {
        Some(path) => {
            let path = PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).to_string());
            let file = std::fs::File::create(&path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            write_signals(std::io::BufWriter::new(file), &result.signals, format)?;
            eprintln!(
                "✓ Wrote {} signals to {}",
                result.signals.len(),
                path.display()
            );
        }
        None => write_signals(std::io::stdout().lock(), &result.signals, format)?,
    }

    Ok(())
}

async fn cmd_dedup(config: &Config) -> anyhow::Result<()> {
    let texts = std::io::stdin()
        .lock()
        .lines()
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>();

    let deduplicator = build_deduplicator(config).await?;
    let report = deduplicator.deduplicate_with_report(texts).await?;

    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &report)?;
    writeln!(stdout)?;
    Ok(())
}

async fn cmd_serve(config: &Config, host: &str, port: u16) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .with_context(|| format!("Invalid bind address {}:{}", host, port))?;

    let pipeline = build_pipeline(config, None).await?;
    server::serve(addr, AppState::new(pipeline)).await?;
    Ok(())
}
