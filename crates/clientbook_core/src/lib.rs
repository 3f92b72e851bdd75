//! Core domain logic for ClientBook.
//! This crate is the single source of truth for contact-book invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod store;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::client::{
    Client, ClientFilter, ClientId, ClientPatch, ClientValidationError, NewClient, PhoneNumber,
    PhoneNumberId,
};
pub use repo::contact_repo::{ContactRepository, RepoError, RepoResult, SqliteContactRepository};
pub use store::contact_store::{ContactStore, StoreError, StoreResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
