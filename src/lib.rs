pub mod cli;
pub mod config;
pub mod crypto;
pub mod errors;
pub mod vault;

pub use errors::{DurinError, Result};
pub use vault::{Record, SecretStore};
