//! Route handlers.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde::Serialize;
use serde_json::{Value, json};

use super::AppState;
use super::error::ApiError;
use super::request::{CreateOrderRequest, CreateOrderResponse, PackagesResponse, ValidationError};
use crate::catalog::Catalog;
use crate::orders::OrderService;
use crate::store::DocumentStore;
use crate::types::Package;

const MAX_LISTED_COLLECTIONS: usize = 10;

pub async fn root() -> Json<Value> {
    Json(json!({ "message": "Game Top-up Backend Running" }))
}

/// Store connectivity report returned by `GET /test`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostics {
    pub backend: String,
    pub database: String,
    pub database_url: String,
    pub database_name: String,
    pub connection_status: String,
    pub collections: Vec<String>,
}

fn set_or_not(set: bool) -> String {
    let label = if set { "set" } else { "not set" };
    label.to_string()
}

/// Always answers 200; failures are reported in the body.
pub async fn diagnostics(State(state): State<AppState>) -> Json<Diagnostics> {
    let mut report = Diagnostics {
        backend: "running".to_string(),
        database: "not available".to_string(),
        database_url: set_or_not(state.database_url_set),
        database_name: set_or_not(state.database_name_set),
        connection_status: "Not Connected".to_string(),
        collections: Vec::new(),
    };

    if let Some(store) = state.store.as_deref() {
        report.connection_status = "Connected".to_string();
        match store.collection_names().await {
            Ok(mut names) => {
                names.truncate(MAX_LISTED_COLLECTIONS);
                report.collections = names;
                report.database = format!("connected ({})", store.backend());
            }
            Err(e) => {
                let reason: String = e.to_string().chars().take(50).collect();
                report.database = format!("connected but error: {}", reason);
            }
        }
    }

    Json(report)
}

pub async fn seed_packages(State(state): State<AppState>) -> Result<Json<Vec<Package>>, ApiError> {
    let store = state.store()?;
    let packages = Catalog::new(store).seed().await?;
    Ok(Json(packages))
}

pub async fn list_packages(
    State(state): State<AppState>,
) -> Result<Json<PackagesResponse>, ApiError> {
    let store = state.store()?;
    let packages = Catalog::new(store).list().await?;
    Ok(Json(PackagesResponse { packages }))
}

pub async fn create_order(
    State(state): State<AppState>,
    payload: Result<Json<CreateOrderRequest>, JsonRejection>,
) -> Result<Json<CreateOrderResponse>, ApiError> {
    let Json(body) = payload.map_err(|e| ValidationError::Body(e.body_text()))?;
    let request = body.validate()?;

    let store = state.store()?;
    let placed = OrderService::new(store).create(request).await?;
    Ok(Json(placed.into()))
}
