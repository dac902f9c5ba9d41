//! JWT claims, encoding, and validation.

pub mod claims;
pub mod decoder;
pub mod encoder;
