//! User service trait definitions.

use crate::{errors::Result, types::*};
use async_trait::async_trait;

/// User workflows exposed to protocol adapters
#[async_trait]
pub trait UserManager: Send + Sync {
    /// Register a user and announce it
    ///
    /// Publish failures after the record is saved come back as warnings in
    /// the outcome; they never fail the call.
    async fn create_user(&self, user: NewUser) -> Result<CreateUserOutcome>;

    /// Change a user's display attributes and announce the change
    async fn update_user(&self, update: ProfileUpdate) -> Result<UpdateUserOutcome>;

    /// Remove a user; succeeds whether or not it existed
    async fn delete_user(&self, username: &str) -> Result<()>;

    /// Fetch one user
    async fn get_user(&self, username: &str) -> Result<UserProfile>;

    /// All users, ordered by username
    async fn list_users(&self) -> Result<Vec<UserProfile>>;

    /// Check a username/secret pair and issue a token
    ///
    /// Unknown users and wrong secrets fail with the same `Unauthorized`.
    async fn login(&self, username: &str, secret: &str) -> Result<IssuedToken>;

    /// Check a bearer token
    async fn validate_session(&self, token: &str) -> Result<ValidatedSession>;
}
