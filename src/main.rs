//! Labor Law Assistant API server.
//!
//! This is the application entry point. It loads and validates settings from
//! the environment and an optional dotenv file, initializes tracing, builds
//! the Axum router and starts the HTTP server. Invalid settings stop the
//! process before anything is bound.

use std::path::PathBuf;

use clap::Parser;

use labor_law_assistant::config::{
    Settings, APP_DESCRIPTION, APP_TITLE, DEFAULT_ENV_FILE, DEFAULT_LOG_FILTER,
};
use labor_law_assistant::http::start_server;
use labor_law_assistant::logging::{init_tracing, resolve_log_filter};
use labor_law_assistant::routes::create_router;

/// Labor Law Assistant API server
#[derive(Parser, Debug)]
#[command(name = "labor-law-assistant", version, about)]
struct Args {
    /// Path to the dotenv file (missing file is ignored)
    #[arg(short, long, default_value = DEFAULT_ENV_FILE)]
    env_file: PathBuf,

    /// Log level filter (e.g., "labor_law_assistant=debug,tower_http=info")
    #[arg(short, long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let settings = match Settings::load(Some(&args.env_file)) {
        Ok(settings) => settings,
        Err(e) => {
            let filter = resolve_log_filter(args.log_level, DEFAULT_LOG_FILTER);
            init_tracing(&filter, Default::default())?;
            tracing::error!(error = %e, "Invalid configuration, refusing to start");
            return Err(e.into());
        }
    };

    // Initialize tracing with priority: CLI > env > debug flag
    let log_filter = resolve_log_filter(args.log_level, settings.default_log_filter());
    init_tracing(&log_filter, settings.log_format)?;

    tracing::info!(
        title = APP_TITLE,
        description = APP_DESCRIPTION,
        version = env!("CARGO_PKG_VERSION"),
        environment = %settings.app_env,
        debug = settings.app_debug,
        addr = %settings.bind_addr(),
        log_format = %settings.log_format,
        has_api_key = settings.has_api_key(),
        "Loaded configuration"
    );

    if settings.app_debug {
        tracing::warn!("Debug mode enabled - do not use outside development");
    }

    let app = create_router();
    start_server(app, &settings).await?;

    Ok(())
}
