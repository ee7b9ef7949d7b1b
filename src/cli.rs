//! CLI argument definitions.

use clap::{Parser, Subcommand};

use crate::commands::{OrderCmd, PackagesCmd, SeedCmd, ServeCmd};
use crate::config::StoreArgs;

#[derive(Parser)]
#[command(name = "topup")]
#[command(about = "Topup - game top-up storefront backend")]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub store: StoreArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API
    Serve(ServeCmd),

    /// Insert the default packages (existing ones are left alone)
    Seed(SeedCmd),

    /// List the package catalog
    Packages(PackagesCmd),

    /// Show a stored order
    Order(OrderCmd),
}

impl Command {
    pub async fn execute(&self, store: &StoreArgs) -> anyhow::Result<()> {
        match self {
            Command::Serve(cmd) => cmd.run(store).await,
            Command::Seed(cmd) => cmd.run(store).await,
            Command::Packages(cmd) => cmd.run(store).await,
            Command::Order(cmd) => cmd.run(store).await,
        }
    }
}
