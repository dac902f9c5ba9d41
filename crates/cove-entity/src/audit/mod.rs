//! Download audit log entities.

pub mod model;

pub use model::{CreateDownloadLog, DownloadLog};
