//! User record workflows.

use crate::{errors::*, events::LifecycleEvent, types::*};
use tracing::{debug, info};
use user_service_credentials::CredentialService;
use user_service_events::EventPublisher;
use user_service_storage::{UserRecord, UserStore};

use super::UserService;

impl<S, C, P> UserService<S, C, P>
where
    S: UserStore + ?Sized,
    C: CredentialService + ?Sized,
    P: EventPublisher + ?Sized,
{
    /// Hash a new user's secret into a storable record
    pub(super) async fn build_record(&self, user: &NewUser) -> Result<UserRecord> {
        let credential_secret = self.hasher.hash(&user.secret).await?;

        Ok(UserRecord {
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            credential_secret,
        })
    }

    pub(super) async fn create_user_internal(&self, user: NewUser) -> Result<CreateUserOutcome> {
        user.validate()?;
        let record = self.build_record(&user).await?;

        // Uniqueness is the store's test-and-set, never a lookup here
        if let Err(e) = self.store_call("save", self.store.save(&record)).await {
            if matches!(e, UserServiceError::Conflict(_)) {
                debug!(username = %record.username, "Rejected duplicate user");
            }
            return Err(e);
        }
        info!(username = %record.username, "User created");

        let profile = UserProfile::from(&record);
        let mut warnings = Vec::new();

        if let Some(w) = self.publish(&LifecycleEvent::Created(profile.clone())).await {
            warnings.push(w);
        }

        // The count is taken after the save, so it includes this user
        let count_warning = match self.store_call("list", self.store.list()).await {
            Ok(records) => self.publish(&LifecycleEvent::Count(records.len())).await,
            Err(e) => Some(PublishWarning {
                routing_key: crate::events::ROUTING_KEY_COUNT.to_string(),
                message: format!("count unavailable: {}", e),
            }),
        };
        warnings.extend(count_warning);

        Ok(CreateUserOutcome {
            user: profile,
            warnings,
        })
    }

    pub(super) async fn update_user_internal(
        &self,
        update: ProfileUpdate,
    ) -> Result<UpdateUserOutcome> {
        validate_update(&update)?;

        let prior = self
            .store_call("get", self.store.get(&update.username))
            .await?;

        // A delete between these two calls surfaces as NotFound with no event
        let updated = self.store_call("update", self.store.update(&update)).await?;
        info!(username = %updated.username, "User updated");

        let previous = UserProfile::from(prior);
        let user = UserProfile::from(updated);

        let warnings = self
            .publish(&LifecycleEvent::Updated {
                old_user: previous.clone(),
                updated_user: user.clone(),
            })
            .await
            .into_iter()
            .collect();

        Ok(UpdateUserOutcome {
            previous,
            user,
            warnings,
        })
    }

    pub(super) async fn delete_user_internal(&self, username: &str) -> Result<()> {
        self.store_call("delete", self.store.delete(username)).await?;
        info!(username, "User deleted");
        Ok(())
    }
}
