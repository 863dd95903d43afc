use anyhow::{Context, Result};
use std::sync::Arc;
use user_service_core::{demo_users, UserManager, UserService};
use user_service_credentials::{CredentialService, JwtCredentialService, SecretHasher};
use user_service_events::{BroadcastPublisher, FanoutPublisher, WebhookPublisher};
use user_service_storage::{KvUserStore, MemoryUserStore, RocksDbStorage, UserStore};

use crate::config::{Config, StorageBackend};

/// Application state shared across all handlers
pub struct AppState {
    pub config: Config,
    pub users: Arc<dyn UserManager>,
    pub credentials: Arc<JwtCredentialService>,
    /// Source of the server-sent event stream
    pub events: Arc<BroadcastPublisher>,
}

impl AppState {
    /// Open the configured store and build the service graph on top of it
    pub async fn new(config: Config) -> Result<Self> {
        let store = open_store(&config)?;
        Self::with_store(config, store).await
    }

    pub async fn with_store(config: Config, store: Arc<dyn UserStore>) -> Result<Self> {
        let events = Arc::new(BroadcastPublisher::default());

        let mut publisher = FanoutPublisher::new().with_sink(events.clone());
        if let Some(webhook) = &config.webhook {
            tracing::info!(url = %webhook.url, "Webhook delivery enabled");
            let sink = WebhookPublisher::new(webhook.clone())
                .context("Failed to build webhook client")?;
            publisher = publisher.with_sink(Arc::new(sink));
        }

        let credentials = Arc::new(JwtCredentialService::new(config.token.clone()));
        credentials
            .initialize()
            .await
            .context("Failed to initialize credential service")?;

        let hasher = Arc::new(SecretHasher::new(config.hasher).context("Invalid Argon2 parameters")?);

        let service = Arc::new(UserService::new(
            store,
            credentials.clone(),
            Arc::new(publisher),
            hasher,
            config.service.clone(),
        ));

        if config.seed_demo_users {
            let seeded = service
                .seed_users(demo_users(&config.demo_user_secret))
                .await;
            tracing::info!(seeded, "Demo users seeded");
        }

        Ok(Self {
            config,
            users: service,
            credentials,
            events,
        })
    }
}

fn open_store(config: &Config) -> Result<Arc<dyn UserStore>> {
    match config.storage_backend {
        StorageBackend::RocksDb => {
            tracing::info!(path = %config.database_path.display(), "Opening RocksDB user store");
            let storage = RocksDbStorage::open(&config.database_path).with_context(|| {
                format!(
                    "Failed to open database at {}",
                    config.database_path.display()
                )
            })?;
            Ok(Arc::new(KvUserStore::new(Arc::new(storage))))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory user store; users are lost on restart");
            Ok(Arc::new(MemoryUserStore::new()))
        }
    }
}
