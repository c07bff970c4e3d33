use std::sync::Arc;

use anyhow::{Context, Result};
use browser_session::ChromiumFactory;
use byod_compat::config::ServeArgs;
use byod_compat::server::{build_router, ServeState};
use clap::Parser;
use compat_checker::CompatChecker;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = ServeArgs::parse();
    let config = args.checker_config()?;
    let factory = Arc::new(ChromiumFactory::new(args.browser_options()));
    let checker = Arc::new(CompatChecker::new(factory, config));

    let router = build_router(ServeState { checker });
    let listener = TcpListener::bind(args.bind)
        .await
        .with_context(|| format!("failed to bind {}", args.bind))?;
    info!(addr = %args.bind, "compatibility check service listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown signal received");
    }
}
