//! Order command - show a stored order.

use anyhow::Result;
use clap::Args;

use super::connect;
use crate::config::StoreArgs;
use crate::orders::OrderService;
use crate::store::DocumentStore;

#[derive(Args)]
pub struct OrderCmd {
    /// Order id (24 hex characters)
    pub id: String,

    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

impl OrderCmd {
    pub async fn run(&self, store_args: &StoreArgs) -> Result<()> {
        let store = connect(store_args).await?;
        let result = OrderService::new(&store).get(&self.id).await;
        store.close().await;

        let order = result?;
        if self.json {
            println!("{}", serde_json::to_string_pretty(&order)?);
            return Ok(());
        }

        println!("Order:    {}", order.id);
        println!("Status:   {}", order.status);
        println!("Game:     {}", order.game);
        println!("Player:   {} (server {})", order.player_id, order.server_id);
        println!(
            "Package:  {} ({} diamonds, ${:.2})",
            order.package_name, order.diamonds, order.price
        );
        if let Some(email) = &order.contact_email {
            println!("Contact:  {}", email);
        }
        println!("Created:  {}", order.created_at.to_rfc3339());
        Ok(())
    }
}
