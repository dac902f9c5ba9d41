//! # cove-auth
//!
//! JWT access-token handling and the resource access guard.

pub mod guard;
pub mod jwt;

pub use guard::AccessGuard;
pub use jwt::claims::Claims;
pub use jwt::decoder::JwtDecoder;
pub use jwt::encoder::JwtEncoder;
