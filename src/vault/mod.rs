//! Vault module — the on-disk encrypted password store.
//!
//! This module provides:
//! - The `Record` type and its plaintext encoding (`record`)
//! - Private-file helpers with atomic replace (`files`)
//! - The exclusive directory lock (`lock`)
//! - Salt and master keyset lifecycle (`master`)
//! - The `pw.db` record-set format (`format`)
//! - The high-level `SecretStore` (`store`)

pub mod files;
pub mod format;
pub mod lock;
pub mod master;
pub mod record;
pub mod store;

// Re-export the most commonly used items.
pub use format::{Envelope, RecordSet};
pub use lock::StoreLock;
pub use record::Record;
pub use store::SecretStore;
