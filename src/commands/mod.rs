//! CLI command implementations.

mod order;
mod packages;
mod seed;
mod serve;

pub use order::OrderCmd;
pub use packages::PackagesCmd;
pub use seed::SeedCmd;
pub use serve::ServeCmd;

use anyhow::{Context, Result};

use crate::config::StoreArgs;
use crate::store::Stores;
use crate::types::Package;

/// Connect to the configured store, failing if none is configured.
async fn connect(args: &StoreArgs) -> Result<Stores> {
    let config = args
        .config()
        .context("No store configured. Set DATABASE_URL or pass --database-url.")?;

    Stores::connect(&config)
        .await
        .context("Failed to connect to the store")
}

fn print_packages(packages: &[Package], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(packages)?);
        return Ok(());
    }

    for pkg in packages {
        let bonus = if pkg.bonus > 0 {
            format!(" +{} bonus", pkg.bonus)
        } else {
            String::new()
        };
        let popular = if pkg.popular { " [popular]" } else { "" };
        println!(
            "{}  {} (${:.2}){}{}",
            pkg.id, pkg.name, pkg.price, bonus, popular
        );
    }
    println!("\n{} packages", packages.len());

    Ok(())
}
