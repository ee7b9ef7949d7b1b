//! MongoDB document store.

use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::bson::{Bson, doc, oid::ObjectId};
use mongodb::options::{ClientOptions, IndexOptions};
use mongodb::{Client, Collection, Database, IndexModel};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use super::{DocumentStore, ORDERS_COLLECTION, PACKAGES_COLLECTION};
use crate::types::{NewOrder, NewPackage, Order, OrderStatus, Package, StoreError};

/// Package document as stored in `mlbbpackage`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct PackageDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    name: String,
    diamonds: i64,
    #[serde(default)]
    bonus: i64,
    #[serde(default, deserialize_with = "price_as_f64")]
    price: f64,
    #[serde(default)]
    popular: bool,
}

/// Read a price stored as a double, an integer or a Decimal128.
///
/// Documents not written by this service may use any of these; null reads as 0.
fn price_as_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    match Bson::deserialize(deserializer)? {
        Bson::Double(v) => Ok(v),
        Bson::Int32(v) => Ok(f64::from(v)),
        Bson::Int64(v) => Ok(v as f64),
        Bson::Decimal128(v) => v
            .to_string()
            .parse::<f64>()
            .map_err(|e| D::Error::custom(format!("bad decimal price {}: {}", v, e))),
        Bson::Null => Ok(0.0),
        other => Err(D::Error::custom(format!(
            "price must be numeric, got {:?}",
            other.element_type()
        ))),
    }
}

impl From<PackageDocument> for Package {
    fn from(doc: PackageDocument) -> Self {
        Self {
            id: doc.id.to_hex(),
            name: doc.name,
            diamonds: doc.diamonds,
            bonus: doc.bonus,
            price: doc.price,
            popular: doc.popular,
        }
    }
}

/// Order document as stored in `order`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct OrderDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    game: String,
    player_id: String,
    server_id: String,
    package_id: String,
    package_name: String,
    diamonds: i64,
    #[serde(default, deserialize_with = "price_as_f64")]
    price: f64,
    contact_email: Option<String>,
    status: OrderStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl OrderDocument {
    fn new(id: ObjectId, order: &NewOrder) -> Self {
        Self {
            id,
            game: order.game.clone(),
            player_id: order.player_id.clone(),
            server_id: order.server_id.clone(),
            package_id: order.package_id.clone(),
            package_name: order.package_name.clone(),
            diamonds: order.diamonds,
            price: order.price,
            contact_email: order.contact_email.clone(),
            status: order.status,
            created_at: order.created_at,
            updated_at: order.created_at,
        }
    }
}

impl From<OrderDocument> for Order {
    fn from(doc: OrderDocument) -> Self {
        Self {
            id: doc.id.to_hex(),
            game: doc.game,
            player_id: doc.player_id,
            server_id: doc.server_id,
            package_id: doc.package_id,
            package_name: doc.package_name,
            diamonds: doc.diamonds,
            price: doc.price,
            contact_email: doc.contact_email,
            status: doc.status,
            created_at: doc.created_at,
            updated_at: doc.updated_at,
        }
    }
}

/// MongoDB-backed store.
pub struct MongoStore {
    client: Client,
    db: Database,
}

impl MongoStore {
    /// Connect and verify the server answers a ping.
    ///
    /// `name` overrides the default database carried by the URL.
    pub async fn connect(url: &str, name: Option<&str>) -> Result<Self, StoreError> {
        let options = ClientOptions::parse(url).await?;
        let name = name
            .map(str::to_string)
            .or_else(|| options.default_database.clone())
            .ok_or_else(|| {
                StoreError::Configuration(
                    "no database name: set DATABASE_NAME or include one in the URL".to_string(),
                )
            })?;

        let client = Client::with_options(options)?;
        let db = client.database(&name);
        db.run_command(doc! { "ping": 1 }).await?;

        let store = Self { client, db };
        store.ensure_indexes().await;

        Ok(store)
    }

    /// Unique index on `diamonds` so concurrent seeds cannot duplicate a package.
    async fn ensure_indexes(&self) {
        let index = IndexModel::builder()
            .keys(doc! { "diamonds": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        // Existing duplicate data makes this fail; seeding still works without it.
        if let Err(e) = self.packages().create_index(index).await {
            warn!("could not create unique index on {}.diamonds: {}", PACKAGES_COLLECTION, e);
        }
    }

    fn packages(&self) -> Collection<PackageDocument> {
        self.db.collection(PACKAGES_COLLECTION)
    }

    fn orders(&self) -> Collection<OrderDocument> {
        self.db.collection(ORDERS_COLLECTION)
    }
}

impl DocumentStore for MongoStore {
    fn name(&self) -> &str {
        self.db.name()
    }

    async fn list_packages(&self) -> Result<Vec<Package>, StoreError> {
        let docs: Vec<PackageDocument> = self
            .packages()
            .find(doc! {})
            .sort(doc! { "diamonds": 1 })
            .await?
            .try_collect()
            .await?;

        Ok(docs.into_iter().map(Package::from).collect())
    }

    async fn find_package(&self, id: &ObjectId) -> Result<Option<Package>, StoreError> {
        let doc = self.packages().find_one(doc! { "_id": *id }).await?;
        Ok(doc.map(Package::from))
    }

    async fn insert_package_if_absent(&self, package: &NewPackage) -> Result<bool, StoreError> {
        let result = self
            .packages()
            .update_one(
                doc! { "diamonds": package.diamonds },
                doc! {
                    "$setOnInsert": {
                        "_id": ObjectId::new(),
                        "name": package.name.as_str(),
                        "bonus": package.bonus,
                        "price": package.price,
                        "popular": package.popular,
                    }
                },
            )
            .upsert(true)
            .await?;

        Ok(result.upserted_id.is_some())
    }

    async fn insert_order(&self, order: &NewOrder) -> Result<ObjectId, StoreError> {
        let id = ObjectId::new();
        self.orders().insert_one(OrderDocument::new(id, order)).await?;
        Ok(id)
    }

    async fn find_order(&self, id: &ObjectId) -> Result<Option<Order>, StoreError> {
        let doc = self.orders().find_one(doc! { "_id": *id }).await?;
        Ok(doc.map(Order::from))
    }

    async fn collection_names(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.db.list_collection_names().await?)
    }

    async fn close(&self) {
        self.client.clone().shutdown().await;
    }
}
