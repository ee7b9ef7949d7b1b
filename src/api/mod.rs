//! HTTP API.
//!
//! Routes:
//! - `GET /` - banner
//! - `GET /test` - store diagnostics
//! - `POST /seed/mlbb` - seed default packages
//! - `GET /api/mlbb/packages` - list packages
//! - `POST /api/mlbb/order` - place an order

mod error;
mod handlers;
mod request;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::StoreArgs;
use crate::store::Stores;
use crate::types::StoreError;

/// Shared per-process state: the store handle, if a connection was made.
#[derive(Clone)]
pub struct AppState {
    store: Option<Arc<Stores>>,
    database_url_set: bool,
    database_name_set: bool,
}

impl AppState {
    pub fn new(store: Option<Stores>, args: &StoreArgs) -> Self {
        let is_set = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
        Self {
            store: store.map(Arc::new),
            database_url_set: is_set(&args.database_url),
            database_name_set: is_set(&args.database_name),
        }
    }

    /// The connected store, or `NotConnected` when startup could not reach it.
    pub fn store(&self) -> Result<&Stores, StoreError> {
        self.store.as_deref().ok_or(StoreError::NotConnected)
    }

    /// A second handle on the store, for teardown after the server stops.
    pub fn store_handle(&self) -> Option<Arc<Stores>> {
        self.store.clone()
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/test", get(handlers::diagnostics))
        .route("/seed/mlbb", post(handlers::seed_packages))
        .route("/api/mlbb/packages", get(handlers::list_packages))
        .route("/api/mlbb/order", post(handlers::create_order))
        .layer(TraceLayer::new_for_http())
        // Public storefront: any origin may call the API.
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use reqwest::{Client, StatusCode};
    use serde_json::{Value, json};
    use tokio::net::TcpListener;

    use super::*;
    use crate::config::StoreConfig;
    use crate::orders::OrderService;

    fn args(url: Option<&str>) -> StoreArgs {
        StoreArgs {
            database_url: url.map(str::to_string),
            database_name: Some("topup_test".to_string()),
        }
    }

    async fn memory_state() -> AppState {
        let config = StoreConfig::new("sqlite::memory:", Some("topup_test".to_string()));
        let store = Stores::connect(&config).await.unwrap();
        AppState::new(Some(store), &args(Some("sqlite::memory:")))
    }

    /// Serve `state` on an ephemeral port and return the base URL.
    async fn spawn(state: AppState) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router(state)).await.unwrap();
        });
        format!("http://{}", addr)
    }

    async fn place(client: &Client, base: &str, body: Value) -> reqwest::Response {
        client
            .post(format!("{}/api/mlbb/order", base))
            .json(&body)
            .send()
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_root() {
        let base = spawn(AppState::new(None, &args(None))).await;
        let body: Value = reqwest::get(format!("{}/", base))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["message"], "Game Top-up Backend Running");
    }

    #[tokio::test]
    async fn test_diagnostics_without_store() {
        let base = spawn(AppState::new(None, &args(None))).await;
        let response = reqwest::get(format!("{}/test", base)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body: Value = response.json().await.unwrap();
        assert_eq!(body["backend"], "running");
        assert_eq!(body["connectionStatus"], "Not Connected");
        assert_eq!(body["databaseUrl"], "not set");
        assert_eq!(body["databaseName"], "set");
        assert_eq!(body["collections"], json!([]));
    }

    #[tokio::test]
    async fn test_diagnostics_with_store() {
        let base = spawn(memory_state().await).await;
        let body: Value = reqwest::get(format!("{}/test", base))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert_eq!(body["connectionStatus"], "Connected");
        assert_eq!(body["databaseUrl"], "set");
        assert_eq!(body["database"], "connected (sqlite)");
        let collections = body["collections"].as_array().unwrap();
        assert!(collections.contains(&json!("mlbbpackage")));
        assert!(collections.contains(&json!("order")));
    }

    #[tokio::test]
    async fn test_store_unavailable() {
        let base = spawn(AppState::new(None, &args(None))).await;
        let client = Client::new();

        let seed = client
            .post(format!("{}/seed/mlbb", base))
            .send()
            .await
            .unwrap();
        assert_eq!(seed.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = seed.json().await.unwrap();
        assert_eq!(body["detail"], "Database not connected");

        let list = reqwest::get(format!("{}/api/mlbb/packages", base)).await.unwrap();
        assert_eq!(list.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let order = place(
            &client,
            &base,
            json!({ "playerId": "1", "serverId": "2", "packageId": "65a1b2c3d4e5f6a7b8c9d0e1" }),
        )
        .await;
        assert_eq!(order.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_validation_runs_before_store_access() {
        let base = spawn(AppState::new(None, &args(None))).await;
        let client = Client::new();

        let blank = place(
            &client,
            &base,
            json!({ "playerId": "  ", "serverId": "2", "packageId": "x" }),
        )
        .await;
        assert_eq!(blank.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = blank.json().await.unwrap();
        assert_eq!(body["detail"], "playerId is required");
    }

    #[tokio::test]
    async fn test_end_to_end_seed_list_order() {
        let state = memory_state().await;
        let store = state.store_handle().unwrap();
        let base = spawn(state).await;
        let client = Client::new();

        let seeded: Value = client
            .post(format!("{}/seed/mlbb", base))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(seeded.as_array().unwrap().len(), 6);

        // A second seed changes nothing.
        let reseeded: Value = client
            .post(format!("{}/seed/mlbb", base))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(seeded, reseeded);

        let listed: Value = reqwest::get(format!("{}/api/mlbb/packages", base))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        let packages = listed["packages"].as_array().unwrap();
        assert_eq!(packages.len(), 6);
        assert_eq!(packages[0]["name"], "86 Diamonds");
        assert_eq!(packages[0]["diamonds"], 86);
        assert_eq!(packages[0]["price"], 1.99);
        assert_eq!(packages[5]["diamonds"], 1156);
        assert_eq!(packages[5]["price"], 22.99);

        let pkg_172 = packages
            .iter()
            .find(|p| p["name"] == "172 Diamonds")
            .unwrap();
        let package_id = pkg_172["id"].as_str().unwrap();

        let response = place(
            &client,
            &base,
            json!({
                "playerId": " 12345678 ",
                "serverId": "1234",
                "packageId": package_id,
                "contactEmail": "player@example.com",
            }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["status"], "pending");
        let order_id = body["orderId"].as_str().unwrap();
        assert!(!order_id.is_empty());

        let order = OrderService::new(store.as_ref()).get(order_id).await.unwrap();
        assert_eq!(order.diamonds, 172);
        assert_eq!(order.price, 3.69);
        assert_eq!(order.package_name, "172 Diamonds");
        assert_eq!(order.player_id, "12345678");
    }

    #[tokio::test]
    async fn test_order_accepts_snake_case_body() {
        let state = memory_state().await;
        let store = state.store_handle().unwrap();
        let packages = crate::catalog::Catalog::new(store.as_ref()).seed().await.unwrap();
        let base = spawn(state).await;

        let response = place(
            &Client::new(),
            &base,
            json!({ "player_id": "1", "server_id": "2", "package_id": packages[0].id }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_order_unknown_or_malformed_package() {
        let base = spawn(memory_state().await).await;
        let client = Client::new();

        for package_id in ["65a1b2c3d4e5f6a7b8c9d0e1", "not-an-object-id"] {
            let response = place(
                &client,
                &base,
                json!({ "playerId": "1", "serverId": "2", "packageId": package_id }),
            )
            .await;
            assert_eq!(response.status(), StatusCode::NOT_FOUND, "{package_id}");
            let body: Value = response.json().await.unwrap();
            assert_eq!(body["detail"], "Package not found");
        }
    }

    #[tokio::test]
    async fn test_order_rejects_bad_bodies() {
        let base = spawn(memory_state().await).await;
        let client = Client::new();

        let missing = place(&client, &base, json!({ "playerId": "1", "serverId": "2" })).await;
        assert_eq!(missing.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let bad_email = place(
            &client,
            &base,
            json!({
                "playerId": "1",
                "serverId": "2",
                "packageId": "65a1b2c3d4e5f6a7b8c9d0e1",
                "contactEmail": "nobody",
            }),
        )
        .await;
        assert_eq!(bad_email.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let not_json = client
            .post(format!("{}/api/mlbb/order", base))
            .header("content-type", "application/json")
            .body("{not json")
            .send()
            .await
            .unwrap();
        assert_eq!(not_json.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_cors_allows_any_origin() {
        let base = spawn(AppState::new(None, &args(None))).await;
        let response = Client::new()
            .get(format!("{}/", base))
            .header("origin", "https://shop.example.com")
            .send()
            .await
            .unwrap();

        let allowed = response
            .headers()
            .get("access-control-allow-origin")
            .unwrap();
        assert_eq!(allowed, "https://shop.example.com");
    }
}
