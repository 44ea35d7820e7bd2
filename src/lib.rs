pub mod auth;
pub mod config;
pub mod database;
pub mod models;
pub mod startup;
#[cfg(test)]
pub(crate) mod test_utils;
pub mod utils;
pub mod web;

pub use utils::{state, uploads};
