//! Share token generation.

use rand::RngCore;

/// Number of random bytes per token; 32 bytes gives 256 bits of entropy,
/// which makes tokens unguessable rather than merely unique.
const TOKEN_BYTES: usize = 32;

/// Generates opaque share tokens from the OS CSPRNG.
#[derive(Debug, Clone, Default)]
pub struct TokenGenerator;

impl TokenGenerator {
    /// Creates a new token generator.
    pub fn new() -> Self {
        Self
    }

    /// Generates a cryptographically secure random token for share links.
    pub fn generate(&self) -> String {
        let mut bytes = [0u8; TOKEN_BYTES];
        rand::rng().fill_bytes(&mut bytes);
        hex::encode(&bytes)
    }
}

/// Simple hex encoding without external dependency.
mod hex {
    /// Encode bytes to hex string.
    pub fn encode(bytes: &[u8]) -> String {
        bytes.iter().map(|b| format!("{b:02x}")).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_token_is_64_hex_chars() {
        let token = TokenGenerator::new().generate();
        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_tokens_do_not_collide() {
        let generator = TokenGenerator::new();
        let tokens: HashSet<String> = (0..10_000).map(|_| generator.generate()).collect();
        assert_eq!(tokens.len(), 10_000);
    }
}
