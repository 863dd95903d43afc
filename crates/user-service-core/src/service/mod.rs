//! User service implementation.

mod auth;
mod seed;
mod users;

use crate::{errors::*, events::LifecycleEvent, traits::*, types::*};
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use tracing::warn;
use user_service_credentials::{CredentialService, SecretHasher};
use user_service_events::EventPublisher;
use user_service_storage::{StoreResult, UserStore};

pub use seed::demo_users;

/// User service implementation
///
/// Generic over the three contracts it sequences. The store owns persisted
/// state; this service only holds transient copies of records.
pub struct UserService<S, C, P>
where
    S: UserStore + ?Sized,
    C: CredentialService + ?Sized,
    P: EventPublisher + ?Sized,
{
    store: Arc<S>,
    credentials: Arc<C>,
    publisher: Arc<P>,
    hasher: Arc<SecretHasher>,
    config: ServiceConfig,
}

impl<S, C, P> UserService<S, C, P>
where
    S: UserStore + ?Sized,
    C: CredentialService + ?Sized,
    P: EventPublisher + ?Sized,
{
    /// Create a new user service
    pub fn new(
        store: Arc<S>,
        credentials: Arc<C>,
        publisher: Arc<P>,
        hasher: Arc<SecretHasher>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            store,
            credentials,
            publisher,
            hasher,
            config,
        }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Run a store call under the store timeout
    async fn store_call<T, F>(&self, operation: &'static str, call: F) -> Result<T>
    where
        F: Future<Output = StoreResult<T>> + Send,
    {
        match tokio::time::timeout(self.config.store_timeout, call).await {
            Ok(result) => result.map_err(UserServiceError::from),
            Err(_) => Err(UserServiceError::StoreUnavailable(format!(
                "{} timed out after {:?}",
                operation, self.config.store_timeout
            ))),
        }
    }

    /// Publish one event under the publish timeout
    ///
    /// Failures are logged and handed back as a warning; they are never
    /// retried and never undo the mutation that produced the event.
    async fn publish(&self, event: &LifecycleEvent) -> Option<PublishWarning> {
        let routing_key = event.routing_key();

        let outcome = match event.payload() {
            Ok(payload) => {
                let call = self
                    .publisher
                    .publish(&self.config.topic, routing_key, &payload);
                match tokio::time::timeout(self.config.publish_timeout, call).await {
                    Ok(result) => result.map_err(UserServiceError::from),
                    Err(_) => Err(UserServiceError::PublishFailed(format!(
                        "timed out after {:?}",
                        self.config.publish_timeout
                    ))),
                }
            }
            Err(e) => Err(UserServiceError::PublishFailed(e.to_string())),
        };

        match outcome {
            Ok(()) => None,
            Err(e) => {
                warn!(routing_key, error = %e, "Lifecycle event not published");
                Some(PublishWarning {
                    routing_key: routing_key.to_string(),
                    message: e.to_string(),
                })
            }
        }
    }
}

#[async_trait]
impl<S, C, P> UserManager for UserService<S, C, P>
where
    S: UserStore + ?Sized + 'static,
    C: CredentialService + ?Sized + 'static,
    P: EventPublisher + ?Sized + 'static,
{
    async fn create_user(&self, user: NewUser) -> Result<CreateUserOutcome> {
        self.create_user_internal(user).await
    }

    async fn update_user(&self, update: ProfileUpdate) -> Result<UpdateUserOutcome> {
        self.update_user_internal(update).await
    }

    async fn delete_user(&self, username: &str) -> Result<()> {
        self.delete_user_internal(username).await
    }

    async fn get_user(&self, username: &str) -> Result<UserProfile> {
        let record = self.store_call("get", self.store.get(username)).await?;
        Ok(record.into())
    }

    async fn list_users(&self) -> Result<Vec<UserProfile>> {
        let records = self.store_call("list", self.store.list()).await?;
        Ok(records.into_iter().map(UserProfile::from).collect())
    }

    async fn login(&self, username: &str, secret: &str) -> Result<IssuedToken> {
        self.login_internal(username, secret).await
    }

    async fn validate_session(&self, token: &str) -> Result<ValidatedSession> {
        self.validate_session_internal(token).await
    }
}
