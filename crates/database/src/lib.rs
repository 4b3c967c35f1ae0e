//! # Grade Statistics Database Crate
//!
//! This crate is the read-only adapter to the PostgreSQL grades database. It
//! owns every SQL aggregation the statistics API exposes.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Adapter:** All SQL lives here. The rest of the application talks
//!   to the `StatsStore` trait and never sees a query string.
//! - **Read-Only:** Every operation is a single aggregate `SELECT`. The schema
//!   (`courses`, `grades`) is owned by another system and is never migrated
//!   from here.
//! - **Asynchronous & Pooled:** The connection pool is created once at start-up
//!   and injected into `DbRepository`. Acquisition waits are bounded by the pool
//!   and each query runs under its own timeout.
//!
//! ## Public API
//!
//! - `connect`: builds the connection pool from `DatabaseSettings`.
//! - `StatsStore`: the seven statistics operations.
//! - `DbRepository`: the PostgreSQL implementation of `StatsStore`.
//! - `DbError`: the specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod error;
pub mod repository;
pub mod store;

// Re-export the key components to create a clean, public-facing API.
pub use connection::connect;
pub use error::DbError;
pub use repository::DbRepository;
pub use store::StatsStore;
