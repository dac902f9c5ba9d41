//! PostgreSQL repository implementations.

pub mod audit;
pub mod file;
pub mod folder;
pub mod share;

pub use audit::PgDownloadLogRepository;
pub use file::PgFileRepository;
pub use folder::PgFolderRepository;
pub use share::PgShareRepository;
