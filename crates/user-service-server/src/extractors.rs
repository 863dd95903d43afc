use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use std::sync::Arc;
use user_service_core::ValidatedSession;

use crate::{error::ApiError, state::AppState};

/// Extractor for requests carrying a valid bearer token
///
/// Signature, issuer and expiry are checked by the credential service
/// through the `ValidateSession` workflow.
pub struct AuthenticatedUser {
    pub session: ValidatedSession,
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for AuthenticatedUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .ok_or(ApiError::Unauthorized)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(ApiError::Unauthorized)?;

        let session = state.users.validate_session(token).await?;

        Ok(AuthenticatedUser { session })
    }
}
