//! Contact store lifecycle and public operation surface.
//!
//! # Responsibility
//! - Own the database connection as an explicit open/close resource.
//! - Expose the contact operation set and flatten errors to one taxonomy.
//!
//! # Invariants
//! - All operations except construction and `close` require the open state.
//! - The connection is owned exclusively; there is no pooling or sharing.

pub mod contact_store;
