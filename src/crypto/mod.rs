//! Cryptographic primitives for Durin.
//!
//! This module provides:
//! - AES-256-GCM encryption with associated data (`encryption`)
//! - Argon2id password-based KEK derivation (`kdf`)
//! - Zeroizing key types (`keys`)
//! - The binary master keyset format and its wrapping (`keyset`)

pub mod encryption;
pub mod kdf;
pub mod keys;
pub mod keyset;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{encrypt, decrypt, derive_kek, ...};
pub use encryption::{decrypt, encrypt};
pub use kdf::{
    derive_kek, derive_kek_from_source, generate_salt, Argon2Params, EnvPassword, PasswordSource,
    StaticPassword, SALT_LEN,
};
pub use keys::{Kek, MasterKey, KEY_LEN};
pub use keyset::{stored_params, unwrap_keyset, wrap_keyset};
