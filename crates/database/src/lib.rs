//! # Campus Events Database Crate
//!
//! This crate acts as a high-level, application-specific interface to the
//! PostgreSQL database that stores colleges, students, events and the
//! registration, attendance and feedback records linking them.
//!
//! ## Architectural Principles
//!
//! - **Adapter:** All SQL lives here. Callers work with the structs from
//!   `core-types` and never see a query string.
//! - **Constraints in storage:** Uniqueness (one registration, check-in and
//!   feedback per student and event) and referential integrity are enforced by
//!   the schema. Violations come back as typed [`DbError`] variants.
//! - **Asynchronous & Pooled:** All operations are asynchronous and borrow
//!   connections from a `PgPool`; writes each run in a short transaction.
//!
//! ## Public API
//!
//! - `connect` / `run_migrations`: pool setup and the embedded schema.
//! - `DbRepository`: creation and listing for every entity, the report
//!   queries, and the idempotent sample-data seed.
//! - `DbError`: the specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod error;
pub mod reports;
pub mod repository;
pub mod seed;

// Re-export the key components to create a clean, public-facing API.
pub use connection::{connect, connect_lazy, run_migrations};
pub use error::DbError;
pub use repository::DbRepository;
pub use seed::{SeedOutcome, SEED_COLLEGE};
