//! In-memory key types.
//!
//! Both keys zeroize their bytes on drop.  Neither type implements
//! `Debug` or `Clone`, so key material cannot end up in a log line or
//! be duplicated by accident.

use rand::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::kdf::Argon2Params;

/// Length of every symmetric key in bytes (256 bits, for AES-256).
pub const KEY_LEN: usize = 32;

/// Key-encryption key derived from the user's password.
///
/// Remembers the Argon2 parameters it was derived with so a freshly
/// wrapped keyset can record them in its header.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct Kek {
    bytes: [u8; KEY_LEN],
    #[zeroize(skip)]
    params: Argon2Params,
}

impl Kek {
    pub fn new(bytes: [u8; KEY_LEN], params: Argon2Params) -> Self {
        Self { bytes, params }
    }

    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }

    pub fn params(&self) -> Argon2Params {
        self.params
    }
}

/// The master AEAD key that encrypts every record.
///
/// Created once per store, persisted only in wrapped form.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct MasterKey {
    #[zeroize(skip)]
    key_id: u32,
    bytes: [u8; KEY_LEN],
}

impl MasterKey {
    /// Rebuild a `MasterKey` from an unwrapped keyset.
    pub fn new(key_id: u32, bytes: [u8; KEY_LEN]) -> Self {
        Self { key_id, bytes }
    }

    /// Generate a fresh random key with a random key id.
    pub fn generate() -> Self {
        let mut rng = rand::rng();
        let mut bytes = [0u8; KEY_LEN];
        rng.fill_bytes(&mut bytes);
        let key = Self::new(rng.next_u32(), bytes);
        bytes.zeroize();
        key
    }

    /// Identifier stored alongside the key in the keyset.
    pub fn key_id(&self) -> u32 {
        self.key_id
    }

    /// Access the raw key bytes (e.g. to pass to the AEAD layer).
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }
}
