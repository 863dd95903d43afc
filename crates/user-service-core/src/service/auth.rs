//! Login and session validation.

use crate::{errors::*, types::*};
use tracing::debug;
use user_service_credentials::CredentialService;
use user_service_events::EventPublisher;
use user_service_storage::UserStore;

use super::UserService;

impl<S, C, P> UserService<S, C, P>
where
    S: UserStore + ?Sized,
    C: CredentialService + ?Sized,
    P: EventPublisher + ?Sized,
{
    pub(super) async fn login_internal(&self, username: &str, secret: &str) -> Result<IssuedToken> {
        let matched = match self.store_call("get", self.store.get(username)).await {
            Ok(record) => self.hasher.verify(secret, &record.credential_secret).await?,
            Err(UserServiceError::NotFound(_)) => self.hasher.verify_decoy(secret).await?,
            Err(e) => return Err(e),
        };

        if !matched {
            debug!(username, "Login rejected");
            return Err(UserServiceError::Unauthorized);
        }

        let token = self.credentials.issue(username).await?;
        debug!(username, expires_at = token.expires_at, "Login succeeded");
        Ok(token)
    }

    pub(super) async fn validate_session_internal(&self, token: &str) -> Result<ValidatedSession> {
        match self.credentials.verify(token).await {
            Ok(Some(claims)) => Ok(ValidatedSession {
                subject: claims.sub,
                issued_at: claims.iat,
                expires_at: claims.exp,
            }),
            Ok(None) => Err(UserServiceError::Unauthorized),
            Err(e) => {
                debug!(error = %e, "Session token rejected");
                Err(UserServiceError::Unauthorized)
            }
        }
    }
}
