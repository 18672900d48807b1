//! Search-Answer: a cache-aside web search answering service
//!
//! This is the main entry point for the application.

use anyhow::Result;
use clap::Parser;
use search_answer::{
    config::{self, Settings},
    network::HttpClient,
    web::{create_router, AppState},
};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let builder = FmtSubscriber::builder()
        .with_env_filter(log_filter(false))
        .with_target(false)
        .with_filter_reloading();
    let log_reload = builder.reload_handle();
    builder.init();

    info!("Starting Search-Answer v{}", search_answer::VERSION);

    // Load configuration
    let settings = match args.config {
        Some(path) => {
            info!("Loading settings from: {}", path.display());
            let mut settings = Settings::from_file(&path)?;
            settings.merge_env();
            settings
        }
        None => config::load()?,
    };
    settings.validate()?;
    if settings.general.debug {
        log_reload.reload(log_filter(true))?;
    }
    info!("Loaded configuration for instance: {}", settings.general.instance_name);

    // Initialize HTTP client
    let client = HttpClient::with_settings(&settings.outgoing)?;
    info!("HTTP client initialized");

    // Create application state
    let state = AppState::new(settings.clone(), client);
    info!(
        "Serving {} focus modes: {:?}",
        state.search.agents().len(),
        state.search.agents().focus_modes()
    );

    let app = create_router(state);

    // Bind address
    let addr = SocketAddr::new(settings.server.bind_address.parse()?, settings.server.port);

    info!("Starting server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// `RUST_LOG` wins over the debug setting
fn log_filter(debug: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if debug {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info,tower_http=debug")
        }
    })
}

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "search-answer", version, about = "Cache-aside web search answering service")]
#[command(after_help = ENV_HELP)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
}

const ENV_HELP: &str = "\
ENVIRONMENT VARIABLES:
    SEARCH_ANSWER_SETTINGS_PATH   Path to settings.yml
    SEARCH_ANSWER_DEBUG           Enable debug mode (true/false)
    SEARCH_ANSWER_PORT            Server port
    SEARCH_ANSWER_BIND_ADDRESS    Bind address
    REDIS_URL                     Redis connection URL for the answer cache
    CACHE_TTL                     Cache time-to-live in seconds
    SEARXNG_API_URL               SearXNG base URL
    OPENAI_API_KEY                Key for providers without their own key
    RUST_LOG                      Log filter (default: info)";
