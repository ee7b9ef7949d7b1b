//! Document store backends.
//!
//! Two collections live in the store:
//! - `mlbbpackage` - the package catalog
//! - `order` - placed orders
//!
//! The backend is picked from the connection string scheme. MongoDB is the
//! production store; SQLite keeps the same collections as tables for local
//! runs and tests.

mod mongo;
mod sqlite;

pub use mongo::MongoStore;
pub use sqlite::SqliteStore;

#[cfg(test)]
pub(crate) use sqlite::tests::temp_store;

use std::future::Future;

use mongodb::bson::oid::ObjectId;
use tracing::info;

use crate::config::{StoreConfig, StoreKind};
use crate::types::{NewOrder, NewPackage, Order, Package, StoreError};

/// Package catalog collection name.
pub const PACKAGES_COLLECTION: &str = "mlbbpackage";

/// Orders collection name.
pub const ORDERS_COLLECTION: &str = "order";

/// Operations the catalog and order service need from a store.
///
/// Identifiers are ObjectIds in every backend, so a malformed id can be
/// rejected before the store is touched.
pub trait DocumentStore: Send + Sync {
    /// Database name, for diagnostics.
    fn name(&self) -> &str;

    /// All packages, ascending by diamonds.
    fn list_packages(&self) -> impl Future<Output = Result<Vec<Package>, StoreError>> + Send;

    /// Look up a single package.
    fn find_package(
        &self,
        id: &ObjectId,
    ) -> impl Future<Output = Result<Option<Package>, StoreError>> + Send;

    /// Insert a package unless one with the same diamonds already exists.
    ///
    /// Returns `true` if a document was inserted.
    fn insert_package_if_absent(
        &self,
        package: &NewPackage,
    ) -> impl Future<Output = Result<bool, StoreError>> + Send;

    /// Insert a new order, returning its assigned id.
    fn insert_order(
        &self,
        order: &NewOrder,
    ) -> impl Future<Output = Result<ObjectId, StoreError>> + Send;

    /// Look up a single order.
    fn find_order(
        &self,
        id: &ObjectId,
    ) -> impl Future<Output = Result<Option<Order>, StoreError>> + Send;

    /// Names of the collections present in the store.
    fn collection_names(&self) -> impl Future<Output = Result<Vec<String>, StoreError>> + Send;

    /// Release connections. The store must not be used afterwards.
    fn close(&self) -> impl Future<Output = ()> + Send;
}

/// Unified store that dispatches to the configured backend.
pub enum Stores {
    Mongo(MongoStore),
    Sqlite(SqliteStore),
}

impl Stores {
    /// Connect to the store described by `config`.
    pub async fn connect(config: &StoreConfig) -> Result<Self, StoreError> {
        let store = match config.kind()? {
            StoreKind::Mongo => {
                Self::Mongo(MongoStore::connect(config.url(), config.database_name.as_deref()).await?)
            }
            StoreKind::Sqlite => {
                Self::Sqlite(SqliteStore::connect(config.url(), config.database_name.as_deref()).await?)
            }
        };
        info!(backend = store.backend(), database = store.name(), "connected to store");
        Ok(store)
    }

    /// Short backend label, for logs.
    pub fn backend(&self) -> &'static str {
        match self {
            Self::Mongo(_) => "mongodb",
            Self::Sqlite(_) => "sqlite",
        }
    }
}

impl DocumentStore for Stores {
    fn name(&self) -> &str {
        match self {
            Self::Mongo(s) => s.name(),
            Self::Sqlite(s) => s.name(),
        }
    }

    async fn list_packages(&self) -> Result<Vec<Package>, StoreError> {
        match self {
            Self::Mongo(s) => s.list_packages().await,
            Self::Sqlite(s) => s.list_packages().await,
        }
    }

    async fn find_package(&self, id: &ObjectId) -> Result<Option<Package>, StoreError> {
        match self {
            Self::Mongo(s) => s.find_package(id).await,
            Self::Sqlite(s) => s.find_package(id).await,
        }
    }

    async fn insert_package_if_absent(&self, package: &NewPackage) -> Result<bool, StoreError> {
        match self {
            Self::Mongo(s) => s.insert_package_if_absent(package).await,
            Self::Sqlite(s) => s.insert_package_if_absent(package).await,
        }
    }

    async fn insert_order(&self, order: &NewOrder) -> Result<ObjectId, StoreError> {
        match self {
            Self::Mongo(s) => s.insert_order(order).await,
            Self::Sqlite(s) => s.insert_order(order).await,
        }
    }

    async fn find_order(&self, id: &ObjectId) -> Result<Option<Order>, StoreError> {
        match self {
            Self::Mongo(s) => s.find_order(id).await,
            Self::Sqlite(s) => s.find_order(id).await,
        }
    }

    async fn collection_names(&self) -> Result<Vec<String>, StoreError> {
        match self {
            Self::Mongo(s) => s.collection_names().await,
            Self::Sqlite(s) => s.collection_names().await,
        }
    }

    async fn close(&self) {
        match self {
            Self::Mongo(s) => s.close().await,
            Self::Sqlite(s) => s.close().await,
        }
    }
}
