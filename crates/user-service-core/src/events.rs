//! Lifecycle events and their wire encoding.

use crate::types::UserProfile;
use serde::Serialize;

/// Routing key for a newly created user
pub const ROUTING_KEY_NEW: &str = "users.new";

/// Routing key for a profile change
pub const ROUTING_KEY_UPDATE: &str = "users.update";

/// Routing key for the user population count
pub const ROUTING_KEY_COUNT: &str = "users.count";

/// Notification of a user mutation or population change
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleEvent {
    Created(UserProfile),
    Updated {
        old_user: UserProfile,
        updated_user: UserProfile,
    },
    Count(usize),
}

#[derive(Serialize)]
struct UpdatedPayload<'a> {
    old_user: &'a UserProfile,
    updated_user: &'a UserProfile,
}

impl LifecycleEvent {
    pub fn routing_key(&self) -> &'static str {
        match self {
            LifecycleEvent::Created(_) => ROUTING_KEY_NEW,
            LifecycleEvent::Updated { .. } => ROUTING_KEY_UPDATE,
            LifecycleEvent::Count(_) => ROUTING_KEY_COUNT,
        }
    }

    /// JSON payload bytes
    pub fn payload(&self) -> serde_json::Result<Vec<u8>> {
        match self {
            LifecycleEvent::Created(user) => serde_json::to_vec(user),
            LifecycleEvent::Updated {
                old_user,
                updated_user,
            } => serde_json::to_vec(&UpdatedPayload {
                old_user,
                updated_user,
            }),
            LifecycleEvent::Count(count) => serde_json::to_vec(count),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn profile(username: &str, first: &str) -> UserProfile {
        UserProfile {
            username: username.to_string(),
            first_name: first.to_string(),
            last_name: "Doe".to_string(),
        }
    }

    #[test]
    fn test_created_payload_is_profile() {
        let event = LifecycleEvent::Created(profile("alice", "Alice"));
        let value: serde_json::Value = serde_json::from_slice(&event.payload().unwrap()).unwrap();

        assert_eq!(event.routing_key(), "users.new");
        assert_eq!(
            value,
            json!({"username": "alice", "first_name": "Alice", "last_name": "Doe"})
        );
    }

    #[test]
    fn test_updated_payload_carries_both_versions() {
        let event = LifecycleEvent::Updated {
            old_user: profile("bob", "Bob"),
            updated_user: profile("bob", "Robert"),
        };
        let value: serde_json::Value = serde_json::from_slice(&event.payload().unwrap()).unwrap();

        assert_eq!(event.routing_key(), "users.update");
        assert_eq!(value["old_user"]["first_name"], "Bob");
        assert_eq!(value["updated_user"]["first_name"], "Robert");
    }

    #[test]
    fn test_count_payload_is_bare_number() {
        let event = LifecycleEvent::Count(3);
        assert_eq!(event.routing_key(), "users.count");
        assert_eq!(event.payload().unwrap(), b"3".to_vec());
    }
}
