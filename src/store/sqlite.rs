//! SQLite document store.
//!
//! Each collection is a table keyed by a 24-char hex ObjectId, so ids look
//! the same as with MongoDB.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{FromRow, SqlitePool};

use super::{DocumentStore, ORDERS_COLLECTION, PACKAGES_COLLECTION};
use crate::types::{NewOrder, NewPackage, Order, OrderStatus, Package, StoreError};

const DEFAULT_NAME: &str = "main";

/// A package row.
#[derive(Debug, Clone, FromRow)]
struct PackageRow {
    id: String,
    name: String,
    diamonds: i64,
    bonus: i64,
    price: f64,
    popular: bool,
}

impl From<PackageRow> for Package {
    fn from(row: PackageRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            diamonds: row.diamonds,
            bonus: row.bonus,
            price: row.price,
            popular: row.popular,
        }
    }
}

/// An order row. Timestamps are RFC 3339 strings.
#[derive(Debug, Clone, FromRow)]
struct OrderRow {
    id: String,
    game: String,
    player_id: String,
    server_id: String,
    package_id: String,
    package_name: String,
    diamonds: i64,
    price: f64,
    contact_email: Option<String>,
    status: String,
    created_at: String,
    updated_at: String,
}

impl TryFrom<OrderRow> for Order {
    type Error = StoreError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let status = OrderStatus::from_str(&row.status).map_err(StoreError::InvalidDocument)?;

        Ok(Self {
            created_at: parse_timestamp(&row.created_at)?,
            updated_at: parse_timestamp(&row.updated_at)?,
            id: row.id,
            game: row.game,
            player_id: row.player_id,
            server_id: row.server_id,
            package_id: row.package_id,
            package_name: row.package_name,
            diamonds: row.diamonds,
            price: row.price,
            contact_email: row.contact_email,
            status,
        })
    }
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::InvalidDocument(format!("bad timestamp {:?}: {}", value, e)))
}

/// SQLite-backed store.
pub struct SqliteStore {
    pool: SqlitePool,
    name: String,
}

impl SqliteStore {
    /// Connect using a `sqlite:` URL, creating the database if missing.
    pub async fn connect(url: &str, name: Option<&str>) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal);

        // One connection keeps `sqlite::memory:` databases alive and shared.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        let store = Self {
            pool,
            name: name.unwrap_or(DEFAULT_NAME).to_string(),
        };
        store.migrate().await?;

        Ok(store)
    }

    /// Create tables if they do not exist.
    async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::query(&format!(
            r#"
            CREATE TABLE IF NOT EXISTS {PACKAGES_COLLECTION} (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                diamonds INTEGER NOT NULL UNIQUE,
                bonus INTEGER NOT NULL DEFAULT 0,
                price REAL NOT NULL,
                popular INTEGER NOT NULL DEFAULT 0
            )
            "#
        ))
        .execute(&self.pool)
        .await?;

        sqlx::query(&format!(
            r#"
            CREATE TABLE IF NOT EXISTS "{ORDERS_COLLECTION}" (
                id TEXT PRIMARY KEY,
                game TEXT NOT NULL,
                player_id TEXT NOT NULL,
                server_id TEXT NOT NULL,
                package_id TEXT NOT NULL,
                package_name TEXT NOT NULL,
                diamonds INTEGER NOT NULL,
                price REAL NOT NULL,
                contact_email TEXT,
                status TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#
        ))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

impl DocumentStore for SqliteStore {
    fn name(&self) -> &str {
        &self.name
    }

    async fn list_packages(&self) -> Result<Vec<Package>, StoreError> {
        let rows = sqlx::query_as::<_, PackageRow>(&format!(
            "SELECT * FROM {PACKAGES_COLLECTION} ORDER BY diamonds ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Package::from).collect())
    }

    async fn find_package(&self, id: &ObjectId) -> Result<Option<Package>, StoreError> {
        let row = sqlx::query_as::<_, PackageRow>(&format!(
            "SELECT * FROM {PACKAGES_COLLECTION} WHERE id = ?"
        ))
        .bind(id.to_hex())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Package::from))
    }

    async fn insert_package_if_absent(&self, package: &NewPackage) -> Result<bool, StoreError> {
        let result = sqlx::query(&format!(
            r#"
            INSERT INTO {PACKAGES_COLLECTION} (id, name, diamonds, bonus, price, popular)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(diamonds) DO NOTHING
            "#
        ))
        .bind(ObjectId::new().to_hex())
        .bind(&package.name)
        .bind(package.diamonds)
        .bind(package.bonus)
        .bind(package.price)
        .bind(package.popular)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn insert_order(&self, order: &NewOrder) -> Result<ObjectId, StoreError> {
        let id = ObjectId::new();
        let now = order.created_at.to_rfc3339();

        sqlx::query(&format!(
            r#"
            INSERT INTO "{ORDERS_COLLECTION}" (
                id, game, player_id, server_id, package_id, package_name,
                diamonds, price, contact_email, status, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#
        ))
        .bind(id.to_hex())
        .bind(&order.game)
        .bind(&order.player_id)
        .bind(&order.server_id)
        .bind(&order.package_id)
        .bind(&order.package_name)
        .bind(order.diamonds)
        .bind(order.price)
        .bind(&order.contact_email)
        .bind(order.status.as_str())
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(id)
    }

    async fn find_order(&self, id: &ObjectId) -> Result<Option<Order>, StoreError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            r#"SELECT * FROM "{ORDERS_COLLECTION}" WHERE id = ?"#
        ))
        .bind(id.to_hex())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Order::try_from).transpose()
    }

    async fn collection_names(&self) -> Result<Vec<String>, StoreError> {
        let names: Vec<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(names)
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
