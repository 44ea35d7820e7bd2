use chrono::{TimeDelta, Utc};
use jsonwebtoken::{
    errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use super::errors::{AuthError, UpdateTokenError};
use crate::models::{Account, Role, UpdateRequest};

/// Claims carried by a staff session token
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionClaims {
    /// Account id
    pub sub: String,
    pub email: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

/// Claims carried by a proposal update token
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateClaims {
    /// Update request id
    pub sub: String,
    pub proposal_id: String,
    pub proposal_type: String,
    pub iat: i64,
    pub exp: i64,
}

/// Signing material for both token families.
///
/// Session and update tokens use distinct secrets so that one can never be
/// presented in place of the other.
#[derive(Clone)]
pub struct TokenKeys {
    session_encoding: EncodingKey,
    session_decoding: DecodingKey,
    update_encoding: EncodingKey,
    update_decoding: DecodingKey,
    session_ttl: TimeDelta,
}

fn validation() -> Validation {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    validation.set_required_spec_claims(&["exp", "sub"]);
    validation
}

impl TokenKeys {
    /// Fails unless the session lifetime is a positive number of hours
    pub fn new(
        session_secret: &SecretString,
        update_secret: &SecretString,
        session_ttl_hours: i64,
    ) -> Result<Self, AuthError> {
        let session_ttl = TimeDelta::try_hours(session_ttl_hours)
            .filter(|ttl| *ttl > TimeDelta::zero())
            .ok_or(AuthError::InvalidSessionTtl(session_ttl_hours))?;

        let session_secret = session_secret.expose_secret().as_bytes();
        let update_secret = update_secret.expose_secret().as_bytes();
        Ok(Self {
            session_encoding: EncodingKey::from_secret(session_secret),
            session_decoding: DecodingKey::from_secret(session_secret),
            update_encoding: EncodingKey::from_secret(update_secret),
            update_decoding: DecodingKey::from_secret(update_secret),
            session_ttl,
        })
    }

    pub fn issue_session_token(&self, account: &Account) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = SessionClaims {
            sub: account.id.clone(),
            email: account.email.clone(),
            role: account.role,
            iat: now.timestamp(),
            exp: (now + self.session_ttl).timestamp(),
        };
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.session_encoding)
            .map_err(AuthError::TokenSigning)
    }

    pub fn decode_session_token(&self, token: &str) -> Result<SessionClaims, AuthError> {
        jsonwebtoken::decode::<SessionClaims>(token, &self.session_decoding, &validation())
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::SessionExpired,
                _ => AuthError::InvalidToken,
            })
    }

    /// Signs an update token that expires together with the request
    pub fn issue_update_token(&self, request: &UpdateRequest) -> Result<String, AuthError> {
        let claims = UpdateClaims {
            sub: request.id.clone(),
            proposal_id: request.proposal_id.clone(),
            proposal_type: request.proposal_type.clone(),
            iat: request.created_at.timestamp(),
            exp: request.expires_at.timestamp(),
        };
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.update_encoding)
            .map_err(AuthError::TokenSigning)
    }

    /// Checks an update token.
    ///
    /// A blank token counts as missing. A token with a valid signature whose
    /// `exp` has passed is expired. Every other decoding failure is invalid.
    pub fn verify_update_token(
        &self,
        token: Option<&str>,
    ) -> Result<UpdateClaims, UpdateTokenError> {
        let token = token
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(UpdateTokenError::Missing)?;

        jsonwebtoken::decode::<UpdateClaims>(token, &self.update_decoding, &validation())
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!("Update token rejected: {e}");
                match e.kind() {
                    ErrorKind::ExpiredSignature => UpdateTokenError::Expired,
                    _ => UpdateTokenError::Invalid,
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{pending_request, test_token_keys as test_keys};

    #[test]
    fn test_valid_update_token() {
        let keys = test_keys();
        let request = pending_request("req-1", TimeDelta::days(3));
        let token = keys.issue_update_token(&request).unwrap();

        let claims = keys.verify_update_token(Some(&token)).unwrap();
        assert_eq!(claims.sub, "req-1");
        assert_eq!(claims.proposal_id, "PRJ-2024-017");
        assert_eq!(claims.proposal_type, "research-grant");
        assert_eq!(claims.exp, request.expires_at.timestamp());
    }

    #[test]
    fn test_missing_update_token() {
        let keys = test_keys();
        assert_eq!(
            keys.verify_update_token(None),
            Err(UpdateTokenError::Missing)
        );
        assert_eq!(
            keys.verify_update_token(Some("   ")),
            Err(UpdateTokenError::Missing)
        );
    }

    #[test]
    fn test_expired_update_token() {
        let keys = test_keys();
        let request = pending_request("req-1", TimeDelta::hours(-1));
        let token = keys.issue_update_token(&request).unwrap();

        assert_eq!(
            keys.verify_update_token(Some(&token)),
            Err(UpdateTokenError::Expired)
        );
    }

    #[test]
    fn test_update_token_signed_with_other_secret() {
        let keys = test_keys();
        let other = TokenKeys::new(
            &SecretString::from("test-session-secret"),
            &SecretString::from("someone-elses-secret"),
            1,
        )
        .unwrap();
        let token = other
            .issue_update_token(&pending_request("req-1", TimeDelta::days(1)))
            .unwrap();

        assert_eq!(
            keys.verify_update_token(Some(&token)),
            Err(UpdateTokenError::Invalid)
        );
    }

    #[test]
    fn test_malformed_update_token() {
        let keys = test_keys();
        assert_eq!(
            keys.verify_update_token(Some("not.a.jwt")),
            Err(UpdateTokenError::Invalid)
        );
    }

    #[test]
    fn test_session_token_is_not_an_update_token() {
        let keys = test_keys();
        let account = Account {
            id: "admin-1".to_string(),
            name: "Admin".to_string(),
            email: "admin@research.edu".to_string(),
            password_hash: String::new(),
            role: Role::Admin,
            created_at: Utc::now(),
        };
        let session = keys.issue_session_token(&account).unwrap();

        assert_eq!(
            keys.verify_update_token(Some(&session)),
            Err(UpdateTokenError::Invalid)
        );
        let claims = keys.decode_session_token(&session).unwrap();
        assert_eq!(claims.sub, "admin-1");
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_session_ttl_out_of_range() {
        for hours in [0, -5, i64::MAX] {
            let result = TokenKeys::new(
                &SecretString::from("test-session-secret"),
                &SecretString::from("test-update-secret"),
                hours,
            );
            assert!(
                matches!(result, Err(AuthError::InvalidSessionTtl(h)) if h == hours),
                "{hours} hours should be rejected"
            );
        }
    }
}
