//! Store implementations.
//!
//! # Stores
//!
//! - [`PgUrlStore`] - PostgreSQL via SQLx, selected when a database is configured
//! - [`InMemoryUrlStore`] - DashMap-backed, used without a database and in tests

pub mod memory_url_store;
pub mod pg_url_store;

pub use memory_url_store::InMemoryUrlStore;
pub use pg_url_store::PgUrlStore;
