//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts for contact records.
//! - Isolate SQLite query details from store/lifecycle orchestration.
//!
//! # Invariants
//! - Repository writes must enforce model validation before persistence.
//! - Repository APIs return semantic errors (`NotFound`, `Constraint`,
//!   `ForeignKey`) instead of leaking raw driver error types.

pub mod contact_repo;
