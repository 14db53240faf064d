//! Configuration: `config.toml` settings and store directory resolution.

pub mod settings;

pub use settings::{resolve_store_dir, Settings, DIR_ENV};
