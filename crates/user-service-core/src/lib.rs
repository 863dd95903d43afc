//! # user-service-core
//!
//! Identity orchestration for the user service.
//!
//! `UserService` sequences the user store, the credential service and the
//! event publisher into the user workflows: create, update, delete, get,
//! list, login and session validation. It depends only on the three
//! contracts, never on a concrete engine or transport.

#![warn(clippy::all)]

pub mod errors;
pub mod events;
pub mod service;
pub mod traits;
pub mod types;

#[cfg(test)]
mod tests;

pub use errors::{Result, UserServiceError};
pub use events::LifecycleEvent;
pub use service::{demo_users, UserService};
pub use traits::UserManager;
pub use types::*;
