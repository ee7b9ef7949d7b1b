//! Packages command - list the catalog.

use anyhow::Result;
use clap::Args;

use super::{connect, print_packages};
use crate::catalog::Catalog;
use crate::config::StoreArgs;
use crate::store::DocumentStore;

#[derive(Args)]
pub struct PackagesCmd {
    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

impl PackagesCmd {
    pub async fn run(&self, store_args: &StoreArgs) -> Result<()> {
        let store = connect(store_args).await?;
        let result = Catalog::new(&store).list().await;
        store.close().await;

        let packages = result?;
        if packages.is_empty() && !self.json {
            println!("No packages yet. Run `topup seed` to add the defaults.");
            return Ok(());
        }
        print_packages(&packages, self.json)
    }
}
