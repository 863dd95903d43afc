use anyhow::{bail, Context, Result};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use user_service_core::ServiceConfig;
use user_service_credentials::{HasherParams, TokenConfig};
use user_service_events::WebhookConfig;

/// Which user store the server runs on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    RocksDb,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "rocksdb" => Ok(StorageBackend::RocksDb),
            "memory" => Ok(StorageBackend::Memory),
            other => bail!("STORAGE_BACKEND must be 'rocksdb' or 'memory', got '{}'", other),
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => bail!("LOG_FORMAT must be 'pretty' or 'json', got '{}'", other),
        }
    }
}

/// Server configuration
#[derive(Clone)]
pub struct Config {
    /// Address to bind the server to
    pub bind_address: SocketAddr,

    pub storage_backend: StorageBackend,

    /// Path to RocksDB database
    pub database_path: PathBuf,

    /// JWT issuer and validity window
    pub token: TokenConfig,

    /// Event topic and call timeouts
    pub service: ServiceConfig,

    /// Secret hashing cost
    pub hasher: HasherParams,

    /// Optional webhook sink for lifecycle events
    pub webhook: Option<WebhookConfig>,

    /// Seed user1..user3 at startup
    pub seed_demo_users: bool,

    /// Secret given to seeded demo users
    pub demo_user_secret: String,

    /// Allowed CORS origins; permissive when empty
    pub cors_allowed_origins: Vec<String>,

    pub log_format: LogFormat,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from any variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_string());

        let bind_address = var("BIND_ADDRESS", "127.0.0.1:8082")
            .parse::<SocketAddr>()
            .context("BIND_ADDRESS")?;

        let storage_backend = var("STORAGE_BACKEND", "rocksdb").parse::<StorageBackend>()?;

        let database_path = var("DATABASE_PATH", "./data/user-service.db").into();

        let token = TokenConfig {
            issuer: var("JWT_ISSUER", "user-service"),
            ttl_seconds: var("TOKEN_TTL_SECONDS", "86400")
                .parse::<u64>()
                .context("TOKEN_TTL_SECONDS")?,
        };
        if token.ttl_seconds == 0 {
            bail!("TOKEN_TTL_SECONDS must be positive");
        }

        let service = ServiceConfig {
            topic: var("EVENT_TOPIC", "recipemanagement"),
            store_timeout: Duration::from_millis(
                var("STORE_TIMEOUT_MS", "5000")
                    .parse::<u64>()
                    .context("STORE_TIMEOUT_MS")?,
            ),
            publish_timeout: Duration::from_millis(
                var("PUBLISH_TIMEOUT_MS", "3000")
                    .parse::<u64>()
                    .context("PUBLISH_TIMEOUT_MS")?,
            ),
        };

        let hasher = HasherParams {
            memory_kib: var("ARGON2_MEMORY_KIB", "19456")
                .parse::<u32>()
                .context("ARGON2_MEMORY_KIB")?,
            iterations: var("ARGON2_ITERATIONS", "2")
                .parse::<u32>()
                .context("ARGON2_ITERATIONS")?,
            ..HasherParams::default()
        };

        let webhook = match (lookup("WEBHOOK_URL"), lookup("WEBHOOK_SECRET")) {
            (None, None) => None,
            (Some(url), Some(hex_secret)) => Some(WebhookConfig::new(url, parse_secret(&hex_secret)?)),
            _ => bail!("WEBHOOK_URL and WEBHOOK_SECRET must be set together"),
        };

        let seed_demo_users = parse_bool(&var("SEED_DEMO_USERS", "false"))
            .context("SEED_DEMO_USERS")?;

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .map(|origins| {
                origins
                    .split(',')
                    .map(str::trim)
                    .filter(|o| !o.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Config {
            bind_address,
            storage_backend,
            database_path,
            token,
            service,
            hasher,
            webhook,
            seed_demo_users,
            demo_user_secret: var("DEMO_USER_SECRET", "demo"),
            cors_allowed_origins,
            log_format: var("LOG_FORMAT", "pretty").parse::<LogFormat>()?,
        })
    }
}

/// Webhook secret: 32 bytes, hex encoded
fn parse_secret(hex_secret: &str) -> Result<[u8; 32]> {
    let bytes = hex::decode(hex_secret.trim()).context("WEBHOOK_SECRET must be hex")?;
    if bytes.len() != 32 {
        bail!("WEBHOOK_SECRET must be 32 bytes (64 hex chars)");
    }
    let mut secret = [0u8; 32];
    secret.copy_from_slice(&bytes);
    Ok(secret)
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" | "" => Ok(false),
        other => bail!("expected a boolean, got '{}'", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();

        assert_eq!(config.bind_address.to_string(), "127.0.0.1:8082");
        assert_eq!(config.storage_backend, StorageBackend::RocksDb);
        assert_eq!(config.token.issuer, "user-service");
        assert_eq!(config.token.ttl_seconds, 86_400);
        assert_eq!(config.service.topic, "recipemanagement");
        assert_eq!(config.service.store_timeout, Duration::from_millis(5000));
        assert_eq!(config.service.publish_timeout, Duration::from_millis(3000));
        assert_eq!(config.hasher, HasherParams::default());
        assert!(config.webhook.is_none());
        assert!(!config.seed_demo_users);
        assert!(config.cors_allowed_origins.is_empty());
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("STORAGE_BACKEND", "memory"),
            ("TOKEN_TTL_SECONDS", "60"),
            ("EVENT_TOPIC", "people"),
            ("SEED_DEMO_USERS", "true"),
            ("CORS_ALLOWED_ORIGINS", "http://a.test, http://b.test,"),
            ("LOG_FORMAT", "json"),
        ])
        .unwrap();

        assert_eq!(config.storage_backend, StorageBackend::Memory);
        assert_eq!(config.token.ttl_seconds, 60);
        assert_eq!(config.service.topic, "people");
        assert!(config.seed_demo_users);
        assert_eq!(
            config.cors_allowed_origins,
            vec!["http://a.test", "http://b.test"]
        );
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_webhook_needs_url_and_secret() {
        assert!(load(&[("WEBHOOK_URL", "http://hook.test")]).is_err());

        let secret = "ab".repeat(32);
        let config = load(&[("WEBHOOK_URL", "http://hook.test"), ("WEBHOOK_SECRET", secret.as_str())])
            .unwrap();
        let webhook = config.webhook.unwrap();
        assert_eq!(webhook.url, "http://hook.test");
        assert_eq!(webhook.secret, [0xab; 32]);

        assert!(load(&[("WEBHOOK_URL", "http://hook.test"), ("WEBHOOK_SECRET", "abcd")]).is_err());
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(load(&[("BIND_ADDRESS", "not-an-address")]).is_err());
        assert!(load(&[("STORAGE_BACKEND", "postgres")]).is_err());
        assert!(load(&[("TOKEN_TTL_SECONDS", "0")]).is_err());
        assert!(load(&[("SEED_DEMO_USERS", "maybe")]).is_err());
    }
}
