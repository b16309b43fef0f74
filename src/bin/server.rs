//! Scheduling HTTP Server Binary
//!
//! This is the main entry point for the scheduling REST API server.
//! It wires the repository, the provider seams, and the optimizer strategy,
//! sets up the HTTP router, and starts serving requests.
//!
//! # Usage
//!
//! ```bash
//! # Run with the local (in-memory) repository (default)
//! cargo run --bin fsa-server --features "local-repo,http-server"
//! ```
//!
//! # Environment Variables
//!
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)
//! - `FSA_CONFIG`: Path to a scheduler TOML config (optional)
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use fsa_rust::config::SchedulerConfig;
use fsa_rust::db::LocalRepository;
use fsa_rust::http::{create_router, AppState};
use fsa_rust::providers::{
    CachingCalendarProvider, ProviderCache, StaticBlockedTimeProvider, StaticCalendarProvider,
};
use fsa_rust::scheduler::optimizer::HeuristicOptimizer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting scheduling HTTP server");

    let config = SchedulerConfig::from_env()?;
    info!(
        "Scheduler window {}-{}, {}-minute granularity",
        config.day_window_start, config.day_window_end, config.slot_granularity_minutes
    );

    // Wire the in-memory backend and collaborators. Real deployments swap
    // these for calendar-sync and work-schedule integrations behind the
    // same traits. The provider cache lives for the whole process.
    let repository = Arc::new(LocalRepository::new());
    let calendar = Arc::new(CachingCalendarProvider::new(
        StaticCalendarProvider::new(),
        Arc::new(ProviderCache::new()),
    ));
    let blocked_time = Arc::new(StaticBlockedTimeProvider::new());
    let optimizer = Arc::new(HeuristicOptimizer);

    let state = AppState::new(repository, calendar, blocked_time, optimizer, config);

    // Create router with all endpoints
    let app = create_router(state);

    // Determine bind address
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8080);
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;

    info!("Server listening on http://{}", addr);
    info!("API documentation: http://{}/health", addr);

    // Start the server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
