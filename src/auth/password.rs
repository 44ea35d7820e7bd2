use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use super::errors::AuthError;

/// Well-formed argon2id hash with default parameters that no known password produces
const DUMMY_HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$C0pQRg4reBXlkjHLisApXg$aaknXGaOLNaRYlkPA4oF2Uw6ZI3bvIxfec66xo+1+s8";

/// Hashes a password with argon2id and a random salt, returning the PHC string
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::PasswordHash(e.to_string()))
}

/// Checks a password against a stored PHC string.
/// An unparsable hash never verifies.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        tracing::warn!("Stored password hash could not be parsed");
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Runs a full verification against a throwaway hash.
/// Used when no account matches so lookups for unknown emails take as long as real ones.
pub fn verify_dummy(password: &str) -> bool {
    verify_password(password, DUMMY_HASH)
}
