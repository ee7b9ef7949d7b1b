//! Store configuration.
//!
//! Read once at startup from CLI flags, falling back to:
//! - `DATABASE_URL` - connection string (`mongodb://...` or `sqlite:...`)
//! - `DATABASE_NAME` - database name (MongoDB only)

use clap::Args;
use secrecy::{ExposeSecret, SecretString};
use url::Url;

use crate::types::StoreError;

/// Store flags shared by every subcommand.
#[derive(Args, Debug)]
pub struct StoreArgs {
    /// Store connection string (mongodb://, mongodb+srv:// or sqlite:)
    #[arg(long, env = "DATABASE_URL", hide_env_values = true, global = true)]
    pub database_url: Option<String>,

    /// Database name (defaults to the one in the MongoDB URL)
    #[arg(long, env = "DATABASE_NAME", global = true)]
    pub database_name: Option<String>,
}

impl StoreArgs {
    /// Build the store config, or `None` when no connection string is set.
    pub fn config(&self) -> Option<StoreConfig> {
        let url = self.database_url.as_deref().map(str::trim)?;
        if url.is_empty() {
            return None;
        }
        let name = self
            .database_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string);
        Some(StoreConfig::new(url, name))
    }
}

/// Which backend a connection string points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Mongo,
    Sqlite,
}

/// Connection settings for the document store.
#[derive(Debug)]
pub struct StoreConfig {
    url: SecretString,
    pub database_name: Option<String>,
}

impl StoreConfig {
    pub fn new(url: impl Into<String>, database_name: Option<String>) -> Self {
        Self {
            url: SecretString::from(url.into()),
            database_name,
        }
    }

    /// The raw connection string. Never log this.
    pub fn url(&self) -> &str {
        self.url.expose_secret()
    }

    /// Detect the backend from the URL scheme.
    pub fn kind(&self) -> Result<StoreKind, StoreError> {
        // The URL can carry credentials, so errors only mention the scheme.
        let parsed = Url::parse(self.url())
            .map_err(|e| StoreError::Configuration(format!("invalid DATABASE_URL: {}", e)))?;

        match parsed.scheme() {
            "mongodb" | "mongodb+srv" => Ok(StoreKind::Mongo),
            "sqlite" => Ok(StoreKind::Sqlite),
            other => Err(StoreError::Configuration(format!(
                "unsupported store scheme: {}",
                other
            ))),
        }
    }
}
