//! Shared fixtures for user service tests.

use crate::*;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use user_service_credentials::{
    CredentialService, HasherParams, JwtCredentialService, ManualClock, SecretHasher, TokenConfig,
};
use user_service_events::{EventPublisher, RecordingPublisher};
use user_service_storage::{MemoryUserStore, StoreError, StoreResult, UserRecord, UserStore};

pub const T0: u64 = 1_700_000_000;

pub type TestService<S, P> = UserService<S, JwtCredentialService<ManualClock>, P>;

pub struct Fixture<S: UserStore, P: EventPublisher> {
    pub service: TestService<S, P>,
    pub store: Arc<S>,
    pub publisher: Arc<P>,
    pub clock: Arc<ManualClock>,
}

pub fn hasher() -> Arc<SecretHasher> {
    Arc::new(SecretHasher::new(HasherParams::insecure_fast()).unwrap())
}

pub fn service_config() -> ServiceConfig {
    ServiceConfig {
        topic: "recipemanagement".to_string(),
        store_timeout: Duration::from_millis(500),
        publish_timeout: Duration::from_millis(500),
    }
}

pub async fn fixture_with<S, P>(store: Arc<S>, publisher: Arc<P>) -> Fixture<S, P>
where
    S: UserStore + 'static,
    P: EventPublisher + 'static,
{
    let clock = Arc::new(ManualClock::new(T0));
    let credentials = Arc::new(JwtCredentialService::with_clock(
        TokenConfig::default(),
        Arc::clone(&clock),
    ));
    credentials.initialize().await.unwrap();

    let service = UserService::new(
        Arc::clone(&store),
        credentials,
        Arc::clone(&publisher),
        hasher(),
        service_config(),
    );

    Fixture {
        service,
        store,
        publisher,
        clock,
    }
}

/// Memory store with a recording publisher
pub async fn fixture() -> Fixture<MemoryUserStore, RecordingPublisher> {
    fixture_with(
        Arc::new(MemoryUserStore::new()),
        Arc::new(RecordingPublisher::new()),
    )
    .await
}

pub fn alice() -> NewUser {
    NewUser::new("alice", "Alice", "Liddell", "looking-glass")
}

/// Store whose engine is down
pub struct UnavailableStore;

#[async_trait]
impl UserStore for UnavailableStore {
    async fn save(&self, _record: &UserRecord) -> StoreResult<()> {
        Err(StoreError::Unavailable("engine down".to_string()))
    }

    async fn get(&self, _username: &str) -> StoreResult<UserRecord> {
        Err(StoreError::Unavailable("engine down".to_string()))
    }

    async fn update(&self, _update: &ProfileUpdate) -> StoreResult<UserRecord> {
        Err(StoreError::Unavailable("engine down".to_string()))
    }

    async fn delete(&self, _username: &str) -> StoreResult<()> {
        Err(StoreError::Unavailable("engine down".to_string()))
    }

    async fn list(&self) -> StoreResult<Vec<UserRecord>> {
        Err(StoreError::Unavailable("engine down".to_string()))
    }
}

/// Store whose reads never complete
#[derive(Default)]
pub struct StalledStore {
    inner: MemoryUserStore,
}

#[async_trait]
impl UserStore for StalledStore {
    async fn save(&self, record: &UserRecord) -> StoreResult<()> {
        self.inner.save(record).await
    }

    async fn get(&self, _username: &str) -> StoreResult<UserRecord> {
        std::future::pending().await
    }

    async fn update(&self, update: &ProfileUpdate) -> StoreResult<UserRecord> {
        self.inner.update(update).await
    }

    async fn delete(&self, username: &str) -> StoreResult<()> {
        self.inner.delete(username).await
    }

    async fn list(&self) -> StoreResult<Vec<UserRecord>> {
        std::future::pending().await
    }
}

/// Publisher that never answers
pub struct HangingPublisher;

#[async_trait]
impl EventPublisher for HangingPublisher {
    async fn publish(
        &self,
        _topic: &str,
        _routing_key: &str,
        _payload: &[u8],
    ) -> user_service_events::Result<()> {
        std::future::pending().await
    }
}
