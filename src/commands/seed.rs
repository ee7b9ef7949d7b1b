//! Seed command - insert the default packages.

use anyhow::Result;
use clap::Args;

use super::{connect, print_packages};
use crate::catalog::Catalog;
use crate::config::StoreArgs;
use crate::store::DocumentStore;

#[derive(Args)]
pub struct SeedCmd {
    /// Print the resulting catalog as JSON
    #[arg(long)]
    pub json: bool,
}

impl SeedCmd {
    pub async fn run(&self, store_args: &StoreArgs) -> Result<()> {
        let store = connect(store_args).await?;
        let result = Catalog::new(&store).seed().await;
        store.close().await;

        print_packages(&result?, self.json)
    }
}
