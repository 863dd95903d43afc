//! Orchestrator request, response and configuration types.

use crate::errors::{Result, UserServiceError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use user_service_storage::UserRecord;

pub use user_service_credentials::IssuedToken;
pub use user_service_storage::ProfileUpdate;

/// Longest accepted username
pub const MAX_USERNAME_LEN: usize = 64;

/// Longest accepted first or last name
pub const MAX_NAME_LEN: usize = 128;

/// Orchestrator settings
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Exchange every lifecycle event is published to
    pub topic: String,
    /// Upper bound on a single store call
    pub store_timeout: Duration,
    /// Upper bound on a single publish call
    pub publish_timeout: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            topic: "recipemanagement".to_string(),
            store_timeout: Duration::from_millis(5_000),
            publish_timeout: Duration::from_millis(3_000),
        }
    }
}

/// Outbound view of a user; never carries the secret
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

impl From<&UserRecord> for UserProfile {
    fn from(record: &UserRecord) -> Self {
        Self {
            username: record.username.clone(),
            first_name: record.first_name.clone(),
            last_name: record.last_name.clone(),
        }
    }
}

impl From<UserRecord> for UserProfile {
    fn from(record: UserRecord) -> Self {
        Self {
            username: record.username,
            first_name: record.first_name,
            last_name: record.last_name,
        }
    }
}

/// Create-user request
#[derive(Clone, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    /// Plaintext secret; hashed before it reaches the store
    #[serde(alias = "password")]
    pub secret: String,
}

impl NewUser {
    pub fn new(username: &str, first_name: &str, last_name: &str, secret: &str) -> Self {
        Self {
            username: username.to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            secret: secret.to_string(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        validate_username(&self.username)?;
        validate_name("first_name", &self.first_name)?;
        validate_name("last_name", &self.last_name)?;

        if self.secret.is_empty() {
            return Err(UserServiceError::InvalidInput(
                "secret must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUser")
            .field("username", &self.username)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Validate a profile update's fields
pub fn validate_update(update: &ProfileUpdate) -> Result<()> {
    validate_username(&update.username)?;
    validate_name("first_name", &update.first_name)?;
    validate_name("last_name", &update.last_name)
}

/// Usernames are 1-64 characters of `[A-Za-z0-9._-]`
pub fn validate_username(username: &str) -> Result<()> {
    if username.is_empty() || username.len() > MAX_USERNAME_LEN {
        return Err(UserServiceError::InvalidInput(format!(
            "username must be 1-{} characters",
            MAX_USERNAME_LEN
        )));
    }

    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
    {
        return Err(UserServiceError::InvalidInput(
            "username may only contain letters, digits, '.', '_' and '-'".to_string(),
        ));
    }

    Ok(())
}

fn validate_name(field: &str, value: &str) -> Result<()> {
    if value.chars().count() > MAX_NAME_LEN {
        return Err(UserServiceError::InvalidInput(format!(
            "{} must be at most {} characters",
            field, MAX_NAME_LEN
        )));
    }
    Ok(())
}

/// An event publish that failed after the mutation committed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishWarning {
    pub routing_key: String,
    pub message: String,
}

/// Result of a successful CreateUser
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserOutcome {
    pub user: UserProfile,
    pub warnings: Vec<PublishWarning>,
}

/// Result of a successful UpdateUser
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateUserOutcome {
    pub previous: UserProfile,
    pub user: UserProfile,
    pub warnings: Vec<PublishWarning>,
}

/// Claims of a token that passed validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatedSession {
    pub subject: String,
    pub issued_at: u64,
    pub expires_at: u64,
}
