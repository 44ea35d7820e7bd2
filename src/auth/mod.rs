pub mod errors;
pub mod password;
pub mod tokens;

pub use errors::{AuthError, UpdateTokenError};
pub use tokens::{SessionClaims, TokenKeys, UpdateClaims};
