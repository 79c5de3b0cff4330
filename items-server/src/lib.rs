//! HTTP CRUD route for todo items over an in-memory `memstore::Store`.
//!
//! # Overview
//! `items_router` exposes the `TodoItem` collection as list / create / get /
//! replace / update / delete. `app` is the host wiring around it: mount
//! prefix, a session for every request, and request tracing. `run` serves
//! `app` on a listener until Ctrl-C.
//!
//! # Design
//! - The router takes the store explicitly; each `items_router` call can be
//!   given a fresh store, so tests never share state.
//! - Handlers get the caller as a `Session` argument rather than reading it
//!   off the request.
//! - All failures flow through `AppError`, which owns the error-to-status
//!   mapping.

pub mod config;
pub mod error;
pub mod logging;
pub mod router;
pub mod session;
pub mod validate;

use axum::Router;
use memstore::Store;
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

pub use config::{ConfigError, ServerConfig};
pub use error::{panic_response, AppError};
pub use router::{items_router, COLLECTION};
pub use session::{with_session, Session};

/// The items router mounted at `config.base_path`, with `config.dev_user`
/// as the session of every request. Handler panics answer 500.
pub fn app(store: Store, config: &ServerConfig) -> Router {
    let items = items_router(store);
    let mounted = if config.base_path == "/" {
        Router::new().merge(items)
    } else {
        Router::new().nest(&config.base_path, items)
    };
    with_session(mounted, Session::new(config.dev_user.clone()))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
}

pub async fn run(listener: TcpListener, config: ServerConfig) -> Result<(), std::io::Error> {
    let app = app(memstore::create(), &config);
    info!(base_path = %config.base_path, "serving items");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown requested"),
        Err(e) => {
            warn!(error = %e, "cannot listen for ctrl-c; running until killed");
            std::future::pending::<()>().await;
        }
    }
}
