//! Link store implementations.
//!
//! - [`PgLinkRepository`] - PostgreSQL storage via SQLx
//! - [`MemoryLinkRepository`] - Process-local storage for tests and local runs

pub mod memory_link_repository;
pub mod pg_link_repository;

pub use memory_link_repository::MemoryLinkRepository;
pub use pg_link_repository::PgLinkRepository;
