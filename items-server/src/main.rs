use anyhow::Context;
use items_server::{logging::init_logging, ServerConfig};
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let config = ServerConfig::from_env().context("loading configuration")?;
    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(%addr, "listening");
    items_server::run(listener, config).await.context("serving items")?;
    Ok(())
}
