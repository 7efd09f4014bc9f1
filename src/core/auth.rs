//! Identity boundary
//!
//! Token verification is delegated to a collaborator behind `TokenVerifier`.
//! The shipped `RecordNumberVerifier` accepts participant record numbers as
//! bearer tokens, standing in for the external identity service in
//! development and tests.

use lazy_static::lazy_static;
use regex::Regex;

use crate::types::{ApiError, Result};
use crate::EMAIL_DOMAIN;

lazy_static! {
    // Participant record numbers: 4 to 16 digits
    static ref RE_RECORD_NUMBER: Regex = Regex::new(r"^[0-9]{4,16}$").unwrap();
}

/// Verified identity, opaque to the core beyond uid and email
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub uid: String,
    pub email: String,
}

impl AuthUser {
    /// The fixed development identity used when auth is bypassed
    pub fn dev_user() -> Self {
        Self {
            uid: "12345678".to_string(),
            email: format!("12345678{}", EMAIL_DOMAIN),
        }
    }
}

/// Derive the participant record id: the email with the fixed domain
/// stripped, falling back to the uid
pub fn participant_id(user: &AuthUser) -> String {
    match user.email.strip_suffix(EMAIL_DOMAIN) {
        Some(record_number) => record_number.to_string(),
        None => user.uid.clone(),
    }
}

/// Token verification collaborator
pub trait TokenVerifier: Send + Sync {
    /// Verify a bearer token, failing with `InvalidToken` on malformed
    /// or expired input
    fn verify(&self, token: &str) -> Result<AuthUser>;
}

/// Verifier that accepts participant record numbers as tokens
#[derive(Debug, Default)]
pub struct RecordNumberVerifier;

impl RecordNumberVerifier {
    pub fn new() -> Self {
        Self
    }
}

impl TokenVerifier for RecordNumberVerifier {
    fn verify(&self, token: &str) -> Result<AuthUser> {
        if !RE_RECORD_NUMBER.is_match(token) {
            return Err(ApiError::InvalidToken(
                "token is not a participant record number".to_string(),
            ));
        }
        Ok(AuthUser {
            uid: token.to_string(),
            email: format!("{}{}", token, EMAIL_DOMAIN),
        })
    }
}

/// Extract the token from an `Authorization: Bearer ...` header value
pub fn bearer_token(header: &str) -> Result<&str> {
    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::InvalidToken("missing or invalid token".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_record_number_token_accepted() {
        let user = RecordNumberVerifier::new().verify("12345678").unwrap();
        assert_eq!(user.uid, "12345678");
        assert_eq!(user.email, "12345678@eco.play");
    }

    #[test]
    fn test_non_numeric_token_rejected() {
        let err = RecordNumberVerifier::new().verify("not-a-number").unwrap_err();
        assert!(matches!(err, ApiError::InvalidToken(_)));
    }

    #[test]
    fn test_short_token_rejected() {
        let err = RecordNumberVerifier::new().verify("123").unwrap_err();
        assert!(matches!(err, ApiError::InvalidToken(_)));
    }

    #[test]
    fn test_participant_id_strips_domain() {
        let user = AuthUser {
            uid: "uid-xyz".to_string(),
            email: "87654321@eco.play".to_string(),
        };
        assert_eq!(participant_id(&user), "87654321");
    }

    #[test]
    fn test_participant_id_falls_back_to_uid() {
        let user = AuthUser {
            uid: "uid-xyz".to_string(),
            email: "someone@example.com".to_string(),
        };
        assert_eq!(participant_id(&user), "uid-xyz");
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token("Bearer 12345678").unwrap(), "12345678");
        assert!(bearer_token("Basic 12345678").is_err());
        assert!(bearer_token("Bearer ").is_err());
    }
}
