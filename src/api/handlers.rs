//! API Handlers
//!
//! HTTP request handlers for each inspection endpoint. Every handler goes
//! through the registry and the backend contract; none touches store internals.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::Value;

use crate::cache::MemoryStore;
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::models::{
    DeleteResponse, GetResponse, HealthResponse, KeysResponse, RemoveStoreQuery, SetRequest,
    SetResponse, StatsResponse, StoreActionResponse, StoresResponse,
};
use crate::registry::{CacheRegistry, SharedBackend};

/// Registry type served over HTTP: string keys, arbitrary JSON values.
pub type JsonRegistry = CacheRegistry<String, Value>;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<JsonRegistry>,
}

impl AppState {
    /// Creates a new AppState around an existing registry.
    pub fn new(registry: JsonRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    /// Creates a registry holding one in-process store built from `config`.
    ///
    /// Must run inside a Tokio runtime when the config enables a default TTL,
    /// so the store can start its sweep.
    pub fn from_config(config: &Config) -> Result<Self> {
        let registry = JsonRegistry::new();
        let store: SharedBackend<String, Value> = Arc::new(MemoryStore::new(config.memory_options()));
        registry.add_store(&config.default_store, store)?;
        Ok(Self::new(registry))
    }
}

/// Handler for `PUT /stores/:name/set`
pub async fn set_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(req): Json<SetRequest>,
) -> Result<Json<SetResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidArgument(error_msg));
    }

    let store = state.registry.get_store(&name)?;
    let options = req.options();
    store.set(req.key.clone(), req.value, options).await?;

    Ok(Json(SetResponse::new(req.key)))
}

/// Handler for `GET /stores/:name/get/:key`
///
/// An absent or expired key is a 404 (and a miss on the store).
pub async fn get_handler(
    State(state): State<AppState>,
    Path((name, key)): Path<(String, String)>,
) -> Result<Json<GetResponse>> {
    let store = state.registry.get_store(&name)?;

    match store.get(&key).await? {
        Some(value) => Ok(Json(GetResponse::new(key, value))),
        None => Err(CacheError::NotFound(format!("Key not found: {}", key))),
    }
}

/// Handler for `DELETE /stores/:name/del/:key`
pub async fn delete_handler(
    State(state): State<AppState>,
    Path((name, key)): Path<(String, String)>,
) -> Result<Json<DeleteResponse>> {
    let store = state.registry.get_store(&name)?;
    let deleted = store.delete(&key).await?;

    Ok(Json(DeleteResponse { key, deleted }))
}

/// Handler for `GET /stores/:name/stats`
pub async fn stats_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<StatsResponse>> {
    let store = state.registry.get_store(&name)?;
    let size = store.size().await?;

    Ok(Json(StatsResponse::new(store.stats(), size)))
}

/// Handler for `GET /stores/:name/keys`
pub async fn keys_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<KeysResponse>> {
    let store = state.registry.get_store(&name)?;
    let keys = store.keys().await?;

    Ok(Json(KeysResponse { keys }))
}

/// Handler for `POST /stores/:name/flush`
pub async fn flush_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<StoreActionResponse>> {
    let store = state.registry.get_store(&name)?;
    let success = store.flush_all().await?;

    Ok(Json(StoreActionResponse {
        store: name,
        success,
    }))
}

/// Handler for `GET /stores`
pub async fn list_stores_handler(State(state): State<AppState>) -> Json<StoresResponse> {
    let mut stores = state.registry.names();
    stores.sort();
    Json(StoresResponse { stores })
}

/// Handler for `DELETE /stores/:name?flush=bool`
pub async fn remove_store_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(query): Query<RemoveStoreQuery>,
) -> Result<Json<StoreActionResponse>> {
    let success = state.registry.remove_store(&name, query.flush).await?;

    Ok(Json(StoreActionResponse {
        store: name,
        success,
    }))
}

/// Handler for `GET /health`
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
