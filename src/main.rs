use bookrec_api::{ApiConfig, MetadataClient, MetadataConfig, RestApi};
use bookrec_similarity::{Recommender, SelfExclusion, DEFAULT_TOP_N};
use bookrec_storage::{DataStore, CATALOG_FILE, MATRIX_FILE};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Book catalog, title search and precomputed similar-book recommendations
#[derive(Parser, Debug)]
#[command(name = "bookrec")]
#[command(about = "A small book recommendation service", long_about = None)]
struct Args {
    /// Directory holding the catalog and similarity artifacts
    #[arg(short, long, default_value = "./data")]
    data_dir: PathBuf,

    /// Catalog file (default: <data-dir>/books.json)
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Similarity matrix file (default: <data-dir>/similarity.bin)
    #[arg(long)]
    similarity: Option<PathBuf>,

    /// Address to bind the HTTP API on
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// HTTP API port
    #[arg(long, default_value_t = 8000)]
    http_port: u16,

    /// Number of recommendations per request
    #[arg(long, default_value_t = DEFAULT_TOP_N)]
    top_n: usize,

    /// How the queried book is kept out of its own recommendations
    #[arg(long, value_enum, default_value_t = ExclusionArg::ExcludeQuery)]
    self_exclusion: ExclusionArg,

    /// Open Library base URL used for cover metadata
    #[arg(long, default_value = bookrec_api::metadata::DEFAULT_SEARCH_URL)]
    metadata_url: String,

    /// Open Library covers base URL
    #[arg(long, default_value = bookrec_api::metadata::DEFAULT_COVERS_URL)]
    covers_url: String,

    /// Metadata request timeout in seconds
    #[arg(long, default_value_t = 5)]
    metadata_timeout_secs: u64,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ExclusionArg {
    ExcludeQuery,
    DropFirst,
}

impl From<ExclusionArg> for SelfExclusion {
    fn from(arg: ExclusionArg) -> Self {
        match arg {
            ExclusionArg::ExcludeQuery => SelfExclusion::ExcludeQuery,
            ExclusionArg::DropFirst => SelfExclusion::DropFirst,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting bookrec v{}", env!("CARGO_PKG_VERSION"));

    let store = DataStore::with_paths(
        args.catalog.clone().unwrap_or_else(|| args.data_dir.join(CATALOG_FILE)),
        args.similarity.clone().unwrap_or_else(|| args.data_dir.join(MATRIX_FILE)),
    );
    let data = store.load()?;

    let policy = SelfExclusion::from(args.self_exclusion);
    let recommender = Arc::new(
        Recommender::new(Arc::new(data.catalog), Arc::new(data.matrix))?.with_policy(policy),
    );
    info!(
        "Recommender ready: {} books, self-exclusion {:?}",
        recommender.catalog().len(),
        policy
    );

    let metadata = Arc::new(MetadataClient::new(MetadataConfig {
        base_url: args.metadata_url.clone(),
        covers_url: args.covers_url.clone(),
        timeout: Duration::from_secs(args.metadata_timeout_secs),
    })?);

    let config = ApiConfig {
        host: args.host.clone(),
        port: args.http_port,
        top_n: args.top_n,
    };
    config.validate()?;

    let http_port = args.http_port;
    let http_handle = std::thread::spawn(move || {
        info!("Starting HTTP server on {}:{}", config.host, config.port);
        let sys = actix_web::rt::System::new();
        sys.block_on(async {
            if let Err(e) = RestApi::start(recommender, metadata, config).await {
                tracing::error!("HTTP server error: {}", e);
            }
        })
    });

    info!("bookrec started successfully");
    info!("HTTP API: http://localhost:{}/", http_port);

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
        _ = tokio::task::spawn_blocking(move || {
            http_handle.join().ok();
        }) => {
            info!("HTTP server stopped");
        }
    }

    info!("Shutting down...");
    Ok(())
}
