use axum::{extract::State, http::StatusCode, response::Json};
use serde::Serialize;
use std::sync::Arc;
use user_service_credentials::CredentialService;

use crate::{config::StorageBackend, state::AppState};

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Serialize)]
pub struct ReadinessResponse {
    status: &'static str,
    storage: &'static str,
    credentials: &'static str,
}

/// Readiness check endpoint
///
/// Ready once the signing key exists.
pub async fn readiness_check(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<ReadinessResponse>) {
    let storage = match state.config.storage_backend {
        StorageBackend::RocksDb => "rocksdb",
        StorageBackend::Memory => "memory",
    };

    let (status, body_status, credentials) = match state.credentials.jwks().await {
        Ok(_) => (StatusCode::OK, "ready", "initialized"),
        Err(_) => (StatusCode::SERVICE_UNAVAILABLE, "starting", "pending"),
    };

    (
        status,
        Json(ReadinessResponse {
            status: body_status,
            storage,
            credentials,
        }),
    )
}
