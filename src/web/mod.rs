pub mod auth;
pub mod error;
pub mod extract;
pub mod handlers;
pub(crate) mod validation;
