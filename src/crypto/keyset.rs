//! Binary keyset format and wrapping under a KEK.
//!
//! A wrapped keyset (the `master` file) has this layout:
//!
//! ```text
//! [DRNK: 4 bytes][version: 1 byte][m_cost: u32 LE][t_cost: u32 LE][p_cost: u32 LE][nonce: 12][sealed keyset + tag]
//! ```
//!
//! - **Magic** (`DRNK`): identifies the file as a Durin keyset.
//! - **Version**: format version (currently `1`).
//! - **Argon2 params**: the KDF settings the KEK was derived with.
//! - The 17-byte header is the associated data of the seal, so editing
//!   the stored params breaks authentication just like a wrong password.
//!
//! The sealed plaintext is the keyset itself:
//!
//! ```text
//! [primary key id: u32 LE][key type: 1 byte][key material: 32 bytes]
//! ```

use zeroize::Zeroizing;

use super::encryption::{decrypt, encrypt};
use super::kdf::Argon2Params;
use super::keys::{Kek, MasterKey, KEY_LEN};
use crate::errors::{DurinError, Result};

/// Magic bytes at the start of every wrapped keyset.
const MAGIC: &[u8; 4] = b"DRNK";

/// Current keyset format version.
pub const CURRENT_VERSION: u8 = 1;

/// 4 (magic) + 1 (version) + 3 * 4 (Argon2 params).
const HEADER_LEN: usize = 17;

/// Key type tag for AES-256-GCM.
const KEY_TYPE_AES256_GCM: u8 = 1;

/// 4 (key id) + 1 (key type) + 32 (key material).
const KEYSET_LEN: usize = 5 + KEY_LEN;

/// Serialize the plaintext keyset for `key`.
fn encode_keyset(key: &MasterKey) -> Zeroizing<Vec<u8>> {
    let mut buf = Zeroizing::new(Vec::with_capacity(KEYSET_LEN));
    buf.extend_from_slice(&key.key_id().to_le_bytes());
    buf.push(KEY_TYPE_AES256_GCM);
    buf.extend_from_slice(key.as_bytes());
    buf
}

/// Parse a plaintext keyset.  Any malformation is reported as an
/// authentication failure: by the time we get here the bytes came out of
/// a verified seal, so a bad shape means a bad file.
fn decode_keyset(data: &[u8]) -> Result<MasterKey> {
    if data.len() != KEYSET_LEN || data[4] != KEY_TYPE_AES256_GCM {
        return Err(DurinError::AuthenticationFailed);
    }
    let key_id = u32::from_le_bytes([data[0], data[1], data[2], data[3]]);
    let mut bytes = Zeroizing::new([0u8; KEY_LEN]);
    bytes.copy_from_slice(&data[5..]);
    Ok(MasterKey::new(key_id, *bytes))
}

fn encode_header(params: &Argon2Params) -> [u8; HEADER_LEN] {
    let mut header = [0u8; HEADER_LEN];
    header[0..4].copy_from_slice(MAGIC);
    header[4] = CURRENT_VERSION;
    header[5..9].copy_from_slice(&params.memory_kib.to_le_bytes());
    header[9..13].copy_from_slice(&params.iterations.to_le_bytes());
    header[13..17].copy_from_slice(&params.parallelism.to_le_bytes());
    header
}

/// Read the Argon2 params out of a wrapped keyset header.
///
/// The params are not trusted until `unwrap_keyset` verifies the seal,
/// yet they size the KDF run that produces the key to verify it with.
/// A header that cannot be parsed, or whose costs are outside the
/// accepted range, is therefore already an authentication failure.
pub fn stored_params(wrapped: &[u8]) -> Result<Argon2Params> {
    if wrapped.len() < HEADER_LEN || &wrapped[0..4] != MAGIC || wrapped[4] != CURRENT_VERSION {
        return Err(DurinError::AuthenticationFailed);
    }
    let word = |at: usize| {
        u32::from_le_bytes([
            wrapped[at],
            wrapped[at + 1],
            wrapped[at + 2],
            wrapped[at + 3],
        ])
    };
    let params = Argon2Params {
        memory_kib: word(5),
        iterations: word(9),
        parallelism: word(13),
    };
    if !params.within_limits() {
        return Err(DurinError::AuthenticationFailed);
    }
    Ok(params)
}

/// Seal `key` under `kek`, producing the bytes of the `master` file.
pub fn wrap_keyset(key: &MasterKey, kek: &Kek) -> Result<Vec<u8>> {
    let header = encode_header(&kek.params());
    let keyset = encode_keyset(key);
    let sealed = encrypt(kek.as_bytes(), &keyset, &header)?;

    let mut out = Vec::with_capacity(HEADER_LEN + sealed.len());
    out.extend_from_slice(&header);
    out.extend_from_slice(&sealed);
    Ok(out)
}

/// Open a wrapped keyset with `kek`.
///
/// Wrong password, truncated file and flipped bits all yield the same
/// `AuthenticationFailed`.
pub fn unwrap_keyset(wrapped: &[u8], kek: &Kek) -> Result<MasterKey> {
    stored_params(wrapped)?;
    let (header, sealed) = wrapped.split_at(HEADER_LEN);
    let keyset = Zeroizing::new(decrypt(kek.as_bytes(), sealed, header)?);
    decode_keyset(&keyset)
}
