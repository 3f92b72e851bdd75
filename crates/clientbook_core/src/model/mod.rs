//! Domain model for clients and their phone numbers.
//!
//! # Responsibility
//! - Define the canonical records persisted by the contact store.
//! - Define the request shapes (new-client input, field patch, lookup filter).
//!
//! # Invariants
//! - Every record is identified by a stable engine-generated integer id.
//! - A phone number never outlives its owning client.

pub mod client;
