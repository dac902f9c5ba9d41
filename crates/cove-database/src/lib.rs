//! # cove-database
//!
//! PostgreSQL connection management, the entry-store trait surface, and
//! the concrete sqlx repository implementations for all Cove entities.
//!
//! Services depend on the traits in [`store`], never on the concrete
//! repositories, so tests can inject in-memory stores.

pub mod connection;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use store::{DownloadLogStore, FileStore, FolderStore, ReparentOutcome, ShareStore};
