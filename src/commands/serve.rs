//! Serve command - run the HTTP API.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Args;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::api::{self, AppState};
use crate::config::StoreArgs;
use crate::store::{DocumentStore, Stores};

#[derive(Args)]
pub struct ServeCmd {
    /// Address to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, short = 'p', env = "PORT", default_value = "8000")]
    pub port: u16,
}

impl ServeCmd {
    pub async fn run(&self, store_args: &StoreArgs) -> Result<()> {
        // A missing or unreachable store is not fatal: the API still starts and
        // store-backed routes answer 500 until it is fixed and restarted.
        let store = match store_args.config() {
            None => {
                warn!("DATABASE_URL not set; starting without a store");
                None
            }
            Some(config) => match Stores::connect(&config).await {
                Ok(store) => Some(store),
                Err(e) => {
                    warn!("store connection failed, starting without a store: {}", e);
                    None
                }
            },
        };

        let state = AppState::new(store, store_args);
        let store = state.store_handle();

        let addr: SocketAddr = format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid listen address {}:{}", self.host, self.port))?;
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind {}", addr))?;
        info!("listening on http://{}", addr);

        axum::serve(listener, api::router(state))
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("Server error")?;

        if let Some(store) = store {
            store.close().await;
            info!("store connection closed");
        }

        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
