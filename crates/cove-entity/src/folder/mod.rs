//! Folder entities.

pub mod model;

pub use model::{Breadcrumb, CreateFolder, Folder};
