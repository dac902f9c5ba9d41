//! Resource access guard.

use uuid::Uuid;

use cove_core::error::AppError;
use cove_core::result::AppResult;

use crate::jwt::claims::Claims;
use crate::jwt::decoder::JwtDecoder;

/// Authenticates bearer tokens and authorizes resource access.
#[derive(Debug, Clone)]
pub struct AccessGuard {
    decoder: JwtDecoder,
}

impl AccessGuard {
    /// Create a new guard around a token decoder.
    pub fn new(decoder: JwtDecoder) -> Self {
        Self { decoder }
    }

    /// Validate an `Authorization` header value and return its claims.
    pub fn authenticate(&self, header_value: &str) -> AppResult<Claims> {
        let token = header_value
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::authentication("Missing bearer token"))?;
        self.decoder.decode_access_token(token)
    }

    /// Require that `user_id` owns a resource.
    ///
    /// A mismatch is reported as not-found rather than forbidden, so a
    /// caller probing someone else's IDs cannot distinguish "exists but
    /// not yours" from "does not exist". `missing_message` must be the
    /// same message the caller uses when the resource genuinely does
    /// not exist, otherwise the two cases become distinguishable.
    /// Needs no token state, so the services call it without holding a
    /// guard instance.
    pub fn authorize_owner(
        resource_owner: Uuid,
        user_id: Uuid,
        missing_message: &str,
    ) -> AppResult<()> {
        if resource_owner == user_id {
            Ok(())
        } else {
            Err(AppError::not_found(missing_message))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwt::encoder::JwtEncoder;
    use cove_core::config::AuthConfig;
    use cove_core::error::ErrorKind;

    fn guard_and_encoder() -> (AccessGuard, JwtEncoder) {
        let config = AuthConfig {
            jwt_secret: "guard-test-secret".to_string(),
            access_token_ttl_seconds: 900,
        };
        (
            AccessGuard::new(JwtDecoder::new(&config)),
            JwtEncoder::new(&config),
        )
    }

    #[test]
    fn test_authenticate_bearer_header() {
        let (guard, encoder) = guard_and_encoder();
        let user_id = Uuid::new_v4();
        let (token, _) = encoder.generate_access_token(user_id).unwrap();

        let claims = guard.authenticate(&format!("Bearer {token}")).unwrap();
        assert_eq!(claims.user_id(), user_id);
    }

    #[test]
    fn test_missing_bearer_prefix_is_rejected() {
        let (guard, encoder) = guard_and_encoder();
        let (token, _) = encoder.generate_access_token(Uuid::new_v4()).unwrap();

        let err = guard.authenticate(&token).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
    }

    #[test]
    fn test_owner_mismatch_reads_as_not_found() {
        let err = AccessGuard::authorize_owner(Uuid::new_v4(), Uuid::new_v4(), "File not found")
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert_eq!(err.message, "File not found");
    }

    #[test]
    fn test_owner_match_is_allowed() {
        let id = Uuid::new_v4();
        assert!(AccessGuard::authorize_owner(id, id, "File not found").is_ok());
    }
}
