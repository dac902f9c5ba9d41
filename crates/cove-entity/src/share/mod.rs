//! Share entities and public projections.

pub mod model;
pub mod view;

pub use model::{CreateShare, Share, SharePermission, ShareType};
pub use view::{SharePublic, ShareView, SharedFile, SharedFolder};
