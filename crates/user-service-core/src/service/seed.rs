//! Startup seeding of known users.

use crate::{errors::Result, types::NewUser};
use tracing::{info, warn};
use user_service_credentials::CredentialService;
use user_service_events::EventPublisher;
use user_service_storage::UserStore;

use super::UserService;

/// The three demo accounts, all sharing `secret`
pub fn demo_users(secret: &str) -> Vec<NewUser> {
    vec![
        NewUser::new("user1", "John", "Doe", secret),
        NewUser::new("user2", "Jane", "Doe", secret),
        NewUser::new("user3", "Jim", "Beam", secret),
    ]
}

impl<S, C, P> UserService<S, C, P>
where
    S: UserStore + ?Sized,
    C: CredentialService + ?Sized,
    P: EventPublisher + ?Sized,
{
    /// Save users directly, without lifecycle events
    ///
    /// Each failure (an existing username included) is logged and skipped.
    /// Returns the number of users actually created.
    pub async fn seed_users(&self, users: Vec<NewUser>) -> usize {
        let mut created = 0;

        for user in users {
            match self.seed_one(&user).await {
                Ok(()) => {
                    info!(username = %user.username, "Seeded user");
                    created += 1;
                }
                Err(e) => warn!(username = %user.username, error = %e, "Failed to seed user"),
            }
        }

        created
    }

    async fn seed_one(&self, user: &NewUser) -> Result<()> {
        user.validate()?;
        let record = self.build_record(user).await?;
        self.store_call("save", self.store.save(&record)).await
    }
}
