//! Share creation, public resolution, and token generation.

pub mod access;
pub mod service;
pub mod token;

pub use access::ShareAccessService;
pub use service::{CreateShareRequest, ShareService, ShareWithUrl};
pub use token::TokenGenerator;
