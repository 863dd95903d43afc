use axum::{extract::State, response::Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use user_service_credentials::{CredentialService, JwksResponse};

use crate::{error::ApiError, extractors::AuthenticatedUser, state::AppState};

/// Body of `POST /api/v1/users/login`
#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    #[serde(alias = "password")]
    pub secret: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: &'static str,
    pub expires_at: u64,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub subject: String,
    pub expires_at: u64,
}

/// POST /api/v1/users/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let issued = state.users.login(&req.username, &req.secret).await?;

    Ok(Json(LoginResponse {
        token: issued.token,
        token_type: "Bearer",
        expires_at: issued.expires_at,
    }))
}

/// GET /api/v1/users/auth
pub async fn check_session(user: AuthenticatedUser) -> Json<SessionResponse> {
    Json(SessionResponse {
        subject: user.session.subject,
        expires_at: user.session.expires_at,
    })
}

/// GET /.well-known/jwks.json
pub async fn jwks_endpoint(
    State(state): State<Arc<AppState>>,
) -> Result<Json<JwksResponse>, ApiError> {
    let jwks = state
        .credentials
        .jwks()
        .await
        .map_err(|e| ApiError::Internal(anyhow::anyhow!(e)))?;

    Ok(Json(jwks))
}
