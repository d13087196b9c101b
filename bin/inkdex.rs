use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use inkdex::persistence::{load_json, save_json};
use inkdex::{
    create_router, discover_documents, AppState, BuildReport, IndexAggregator, IndexMetrics,
    IndexSettings, QueryEngine, ServerConfig, Tokenizer, TokenizerConfig,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "inkdex")]
#[command(about = "Generate an inverted index from text files and search over it", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Stemmer and stop-word language
    #[arg(long, global = true, env = "INKDEX_LANGUAGE", default_value = "english")]
    language: String,
}

#[derive(Subcommand)]
enum Command {
    /// Build the search index
    #[command(alias = "b")]
    Build {
        /// File or directory of files to index
        #[arg(short, long)]
        sources: PathBuf,

        /// Index file to write
        #[arg(short, long)]
        index: PathBuf,

        /// Bytes per scan chunk
        #[arg(long, env = "INKDEX_CHUNK_SIZE", default_value_t = inkdex::config::DEFAULT_CHUNK_SIZE)]
        chunk_size: u64,
    },
    /// Search over the index once and print the results
    #[command(alias = "s")]
    Search {
        /// Index file to read
        #[arg(short, long)]
        index: PathBuf,

        /// Search phrase
        #[arg(short, long)]
        query: String,
    },
    /// Serve the search API over HTTP
    Serve {
        /// Index file to read, or to write when --sources is given
        #[arg(short, long)]
        index: PathBuf,

        /// Rebuild the index from this file or directory before serving
        #[arg(short, long)]
        sources: Option<PathBuf>,

        /// Bytes per scan chunk when rebuilding
        #[arg(long, env = "INKDEX_CHUNK_SIZE", default_value_t = inkdex::config::DEFAULT_CHUNK_SIZE)]
        chunk_size: u64,

        /// Listen address (defaults to INKDEX_LISTEN or localhost:8888)
        #[arg(short, long)]
        listen: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let server_config = ServerConfig::from_env();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&server_config.log_level)),
        )
        .init();

    let args = Args::parse();
    let tokenizer_config = TokenizerConfig {
        language: args.language.clone(),
        ..Default::default()
    };

    match args.command {
        Command::Build {
            sources,
            index,
            chunk_size,
        } => {
            let settings = IndexSettings {
                tokenizer_config,
                ..Default::default()
            }
            .with_chunk_size(chunk_size);
            build(settings, sources, index).await.map(|_| ())
        }
        Command::Search { index, query } => {
            let engine = load_engine(&index, &tokenizer_config)?;
            let results = engine.search(&query);
            println!("{}", serde_json::to_string_pretty(&results)?);
            Ok(())
        }
        Command::Serve {
            index,
            sources,
            chunk_size,
            listen,
        } => {
            let metrics = Arc::new(IndexMetrics::new()?);
            let engine = match sources {
                Some(sources) => {
                    let settings = IndexSettings {
                        tokenizer_config,
                        ..Default::default()
                    }
                    .with_chunk_size(chunk_size);
                    let (report, tokenizer) = build(settings, sources, index).await?;
                    metrics.record_build(&report);
                    QueryEngine::new(Arc::new(report.index), tokenizer)
                }
                None => load_engine(&index, &tokenizer_config)?,
            };
            let listen = listen.unwrap_or(server_config.listen);
            serve(engine, metrics, listen).await
        }
    }
}

async fn build(
    settings: IndexSettings,
    sources: PathBuf,
    index_path: PathBuf,
) -> Result<(BuildReport, Tokenizer)> {
    info!("Building index from {:?}", sources);
    let documents = discover_documents(&sources)
        .with_context(|| format!("failed to list documents under {}", sources.display()))?;
    info!("  Documents: {}", documents.len());
    info!("  Chunk size: {} bytes", settings.chunk_size);

    let aggregator = IndexAggregator::new(&settings)?;
    let tokenizer = aggregator.tokenizer().clone();
    let report = tokio::task::spawn_blocking(move || aggregator.build(&documents)).await?;

    for (document, reason) in &report.failed {
        tracing::warn!("Skipped {}: {}", document, reason);
    }

    save_json(&report.index, &index_path)
        .with_context(|| format!("failed to write index to {}", index_path.display()))?;

    info!(
        "Indexed {} documents ({} skipped), {} terms in {:.2}s",
        report.documents_indexed,
        report.documents_failed(),
        report.index.len(),
        report.elapsed.as_secs_f64()
    );
    Ok((report, tokenizer))
}

fn load_engine(index_path: &Path, tokenizer_config: &TokenizerConfig) -> Result<QueryEngine> {
    let index = load_json(index_path)
        .with_context(|| format!("failed to read index from {}", index_path.display()))?;
    let tokenizer = Tokenizer::new(tokenizer_config)?;
    Ok(QueryEngine::new(Arc::new(index), tokenizer))
}

async fn serve(engine: QueryEngine, metrics: Arc<IndexMetrics>, listen: String) -> Result<()> {
    metrics.set_index_size(engine.index().len(), engine.index().documents().len());

    let app = create_router(AppState { engine, metrics });
    let listener = tokio::net::TcpListener::bind(&listen).await?;
    info!("HTTP API server listening on {}", listen);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Received shutdown signal, gracefully shutting down");
            }
        })
        .await?;

    Ok(())
}
