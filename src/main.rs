use clap::Parser;
use faceseek_api::RestApi;
use faceseek_core::{ActivityLog, QueryCache, SearchPipeline, DEFAULT_CACHE_CAPACITY};
use faceseek_gallery::GalleryStore;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Face embedding identity search server
#[derive(Parser, Debug)]
#[command(name = "faceseek")]
#[command(about = "Face embedding identity search", long_about = None)]
struct Args {
    /// Path to the data directory holding gallery.json and
    /// identity_centroids.json
    #[arg(short, long, default_value = "./data")]
    data_dir: PathBuf,

    /// HTTP API port
    #[arg(long, default_value_t = 8600)]
    http_port: u16,

    /// Query-result cache capacity
    #[arg(long, default_value_t = DEFAULT_CACHE_CAPACITY)]
    cache_capacity: usize,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
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

    info!("Starting FaceSeek v{}", env!("CARGO_PKG_VERSION"));
    info!("Data directory: {:?}", args.data_dir);
    info!("HTTP API port: {}", args.http_port);

    let store = GalleryStore::load(&args.data_dir)?;
    info!(
        "Gallery loaded: {} records, {} identities",
        store.gallery().len(),
        store.index().len()
    );

    let pipeline = Arc::new(SearchPipeline::new(
        store.gallery(),
        store.index(),
        Arc::new(QueryCache::new(args.cache_capacity)),
        Arc::new(ActivityLog::default()),
    ));

    info!("FaceSeek started successfully");
    info!("HTTP API: http://localhost:{}/", args.http_port);

    RestApi::start(pipeline, args.http_port).await?;

    info!("Shutting down...");
    Ok(())
}
