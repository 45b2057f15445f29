use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use chrono::{TimeZone, Utc};
use tracing::debug;
use uuid::Uuid;

use shared_models::auth::{AuthUser, JwtClaims, JwtHeader};
use shared_models::error::AuthError;

type HmacSha256 = Hmac<Sha256>;

/// Verifies an HS256 token issued by the hosted auth provider and resolves
/// the caller's application role.
pub fn validate_token(token: &str, jwt_secret: &str) -> Result<AuthUser, AuthError> {
    if jwt_secret.is_empty() {
        return Err(AuthError::InvalidToken("JWT secret is not set".to_string()));
    }

    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return Err(AuthError::InvalidToken("Invalid token format".to_string()));
    }

    let header_b64 = parts[0];
    let claims_b64 = parts[1];
    let signature_b64 = parts[2];

    let header: JwtHeader = decode_segment(header_b64)
        .ok_or_else(|| AuthError::InvalidToken("Invalid header encoding".to_string()))?;
    if header.alg != "HS256" {
        return Err(AuthError::InvalidToken(format!("Unsupported algorithm {}", header.alg)));
    }

    let signature = URL_SAFE_NO_PAD.decode(signature_b64).map_err(|e| {
        debug!("Failed to decode signature: {}", e);
        AuthError::InvalidToken("Invalid signature encoding".to_string())
    })?;

    let mut mac = HmacSha256::new_from_slice(jwt_secret.as_bytes())
        .map_err(|_| AuthError::InvalidToken("Failed to create HMAC".to_string()))?;
    mac.update(format!("{}.{}", header_b64, claims_b64).as_bytes());

    if mac.verify_slice(&signature).is_err() {
        debug!("Token signature verification failed");
        return Err(AuthError::InvalidToken("Invalid token signature".to_string()));
    }

    let claims: JwtClaims = decode_segment(claims_b64)
        .ok_or_else(|| AuthError::InvalidToken("Invalid claims format".to_string()))?;

    if let Some(exp) = claims.exp {
        let now = Utc::now().timestamp() as u64;
        if exp < now {
            debug!("Token expired at {} (now: {})", exp, now);
            return Err(AuthError::ExpiredToken);
        }
    }

    let id = Uuid::parse_str(&claims.sub)
        .map_err(|_| AuthError::InvalidToken("Subject is not a valid user id".to_string()))?;

    let role = claims.app_role()
        .ok_or_else(|| AuthError::Unauthorized("No application role assigned to this account".to_string()))?;

    let created_at = claims.iat
        .and_then(|timestamp| Utc.timestamp_opt(timestamp as i64, 0).single());

    let user = AuthUser {
        id,
        email: claims.email,
        role,
        token: token.to_string(),
        created_at,
    };

    debug!("Token validated successfully for user: {} ({})", user.id, user.role);
    Ok(user)
}

fn decode_segment<T: serde::de::DeserializeOwned>(segment: &str) -> Option<T> {
    let bytes = URL_SAFE_NO_PAD.decode(segment).ok()?;
    serde_json::from_slice(&bytes).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{JwtTestUtils, TestUser};
    use shared_models::auth::Role;

    const SECRET: &str = "unit-test-secret";

    #[test]
    fn accepts_valid_token() {
        let user = TestUser::doctor("doc@example.com");
        let token = JwtTestUtils::create_test_token(&user, SECRET, Some(1));

        let auth = validate_token(&token, SECRET).unwrap();
        assert_eq!(auth.id, user.id);
        assert_eq!(auth.role, Role::Doctor);
        assert_eq!(auth.email.as_deref(), Some("doc@example.com"));
        assert_eq!(auth.token, token);
    }

    #[test]
    fn rejects_expired_token() {
        let user = TestUser::admin("admin@example.com");
        let token = JwtTestUtils::create_expired_token(&user, SECRET);
        assert_eq!(validate_token(&token, SECRET).unwrap_err(), AuthError::ExpiredToken);
    }

    #[test]
    fn rejects_wrong_signature() {
        let user = TestUser::admin("admin@example.com");
        let token = JwtTestUtils::create_invalid_signature_token(&user);
        assert!(matches!(validate_token(&token, SECRET), Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn rejects_malformed_token() {
        let token = JwtTestUtils::create_malformed_token();
        assert!(matches!(validate_token(&token, SECRET), Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn rejects_token_without_role() {
        let token = JwtTestUtils::create_token_without_role(SECRET);
        assert!(matches!(validate_token(&token, SECRET), Err(AuthError::Unauthorized(_))));
    }
}
