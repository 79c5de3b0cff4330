use tracing_subscriber::{fmt, EnvFilter};

/// Install the global fmt subscriber.
/// - Respects `RUST_LOG` if set
/// - Falls back to `info,tower_http=info`
/// - Safe to call more than once; later calls are no-ops
pub fn init_logging() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,tower_http=info"));
    let _ = fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .try_init();
}
