//! Permit API Server
//!
//! Read-only HTTP API over a fixed collection of building permits:
//!
//! - `GET /v1/permits` filtered, paginated listing
//! - `GET /v1/permits/:permit_id` full permit record
//!
//! ## Request pipeline
//!
//! Every request passes through, in order: a process-wide sliding-window rate
//! limiter, a random fault injector, then the route handler. Panics anywhere
//! in the stack become a generic `serverError` response.
//!
//! The `_bypass_rate_limit=true` and `_bypass_random_error=true` query flags
//! skip the first two stages. They exist for test suites; run with
//! `--disable-test-bypass` anywhere they must not be reachable.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::{middleware, routing::get, Router};
use clap::Parser;
use permit_core::{FaultInjector, JsonFilePermitSource, RateLimiter};
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod api;
mod error;
mod pipeline;
mod state;

use api::{handle_get_permit, handle_list_permits, handle_not_found};
use state::AppState;

/// Command-line arguments for the permit API server
#[derive(Parser, Debug)]
#[command(name = "permit-api")]
#[command(about = "Read-only HTTP API over building permit records")]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value = "3000")]
    port: u16,

    /// Host address to bind to
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: String,

    /// JSON file holding the permit collection
    #[arg(long, env = "PERMITS_FILE", default_value = "data/permits.json")]
    data_file: PathBuf,

    /// Requests admitted per window, across all clients
    #[arg(long, env = "RATE_LIMIT", default_value = "5")]
    rate_limit: usize,

    /// Rate limit window in milliseconds
    #[arg(long, env = "RATE_WINDOW_MS", default_value = "1000")]
    rate_window_ms: u64,

    /// Probability of answering a request with an injected 500
    #[arg(long, env = "FAULT_RATE", default_value = "0.2")]
    fault_rate: f64,

    /// Ignore the reserved `_bypass_*` query flags
    #[arg(long, env = "DISABLE_TEST_BYPASS")]
    disable_test_bypass: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Permit routes wrapped in the request pipeline
pub fn build_router(state: Arc<AppState>) -> Router {
    let routes = Router::new()
        .route(
            "/v1/permits",
            get(handle_list_permits).fallback(handle_not_found),
        )
        // Trailing-slash form of the list route
        .route(
            "/v1/permits/",
            get(handle_list_permits).fallback(handle_not_found),
        )
        .route(
            "/v1/permits/:permit_id",
            get(handle_get_permit).fallback(handle_not_found),
        );

    with_pipeline(routes, state)
}

/// Wrap routes in the admission pipeline, in request order:
/// trace, CORS, catch-panic, rate limit, fault injection, handler.
/// Paths no route claims get the `notFound` body.
pub fn with_pipeline(routes: Router<Arc<AppState>>, state: Arc<AppState>) -> Router {
    let layers = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(CatchPanicLayer::custom(pipeline::handle_panic))
        .layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            pipeline::rate_limit,
        ))
        .layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            pipeline::inject_faults,
        ));

    routes
        .fallback(handle_not_found)
        .layer(layers)
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::registry()
        .with(
            EnvFilter::from_default_env()
                .add_directive(log_level.into())
                .add_directive("tower_http=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let source = JsonFilePermitSource::new(&args.data_file);
    if !source.path().exists() {
        warn!(
            "Permit file {} does not exist; every request will fail until it does",
            source.path().display()
        );
    }

    let state = AppState::new(Arc::new(source))
        .with_rate_limiter(RateLimiter::new(
            args.rate_limit,
            Duration::from_millis(args.rate_window_ms),
        ))
        .with_fault_injector(FaultInjector::new(args.fault_rate))
        .with_test_bypass(!args.disable_test_bypass);

    if state.allow_test_bypass {
        warn!("Test bypass query flags are enabled; pass --disable-test-bypass in production");
    }

    let app = build_router(Arc::new(state));

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Permit API listening on http://{}/v1/permits", addr);
    info!(
        "Rate limit: {} requests per {}ms",
        args.rate_limit, args.rate_window_ms
    );
    info!("Fault rate: {}", args.fault_rate);
    info!("Permit data: {}", args.data_file.display());

    axum::serve(listener, app).await?;

    Ok(())
}
