//! zonekeeper — a self-registering service directory.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────────┐
//!                      │                 zonekeeper                   │
//!                      │                                              │
//!  GET|POST /register  │  ┌─────────┐        ┌────────────────────┐  │
//!  ────────────────────┼─▶│  http   │──────▶ │      registry      │  │
//!  GET /health         │  │ server  │ upsert │  (single-lock map) │  │
//!                      │  └─────────┘        └─────┬───────▲──────┘  │
//!                      │                  snapshot │       │ apply   │
//!                      │                           ▼       │         │
//!                      │  ┌────────────┐     ┌──────────────────┐    │
//!   registrant /health │  │   health   │◀────│    reconciler    │    │
//!  ◀───────────────────┼──│   prober   │     │  (interval tick) │    │
//!                      │  └────────────┘     └────────┬─────────┘    │
//!                      │                              ▼              │
//!                      │                    ┌──────────────────┐     │
//!        zone file ◀───┼────────────────────│  zone render +   │     │
//!                      │                    │  atomic writer   │     │
//!                      │                    └──────────────────┘     │
//!                      └──────────────────────────────────────────────┘
//! ```

use std::path::Path;

use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use zonekeeper::config::{self, Config};
use zonekeeper::http::HttpServer;
use zonekeeper::lifecycle::Shutdown;
use zonekeeper::observability::metrics;
use zonekeeper::reconcile::Reconciler;
use zonekeeper::registry::Registry;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Optional config file as the first argument; env vars override either way.
    let mut config = match std::env::args().nth(1) {
        Some(path) => config::load_config(Path::new(&path))?,
        None => Config::default(),
    };
    config::apply_env_overrides(&mut config);
    config::validate_config(&config).map_err(config::ConfigError::Validation)?;

    init_tracing(&config);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        bind_address = %config.listener.bind_address,
        zone_path = %config.zone.output_path,
        error_threshold = config.registry.error_threshold,
        interval_ms = config.health_check.interval_ms,
        "configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "failed to parse metrics address"
            ),
        }
    }

    let registry = Registry::new(config.registry.error_threshold);

    let shutdown = Shutdown::new();
    shutdown.trigger_on_ctrl_c();

    let reconciler = Reconciler::new(registry.clone(), &config);
    tokio::spawn(reconciler.run(shutdown.subscribe()));

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "listening for registrations");

    let server = HttpServer::new(&config, registry);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("shutdown complete");
    Ok(())
}

fn init_tracing(config: &Config) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.observability.log_level.clone().into());

    let registry = tracing_subscriber::registry().with(env_filter);
    if config.observability.log_json {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
