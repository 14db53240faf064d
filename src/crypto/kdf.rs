//! Password-based key derivation using Argon2id.
//!
//! Argon2id is a memory-hard KDF that protects against brute-force and
//! GPU-based attacks.  The derived value is a key-encryption key (KEK):
//! it only ever wraps the master keyset, never record data.

use argon2::{Algorithm, Argon2, Params, Version};
use rand::RngCore;
use zeroize::Zeroizing;

use super::keys::{Kek, KEY_LEN};
use crate::errors::{DurinError, Result};

/// Length of the salt in bytes (128 bits).
pub const SALT_LEN: usize = 16;

/// Minimum safe memory cost in KiB (8 MB).
pub const MIN_MEMORY_KIB: u32 = 8_192;

/// Largest memory cost accepted, in KiB (4 GiB).
pub const MAX_MEMORY_KIB: u32 = 4 * 1024 * 1024;

/// Largest iteration count accepted.
pub const MAX_ITERATIONS: u32 = 256;

/// Largest number of lanes accepted.
pub const MAX_PARALLELISM: u32 = 255;

/// Configurable Argon2id parameters.
///
/// These map 1:1 to the fields in `Settings`, and are also stored in the
/// wrapped keyset header so a store always reopens with the parameters it
/// was created with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Argon2Params {
    /// Memory cost in KiB (default: 65 536 = 64 MB).
    pub memory_kib: u32,
    /// Number of iterations (default: 3).
    pub iterations: u32,
    /// Parallelism lanes (default: 4).
    pub parallelism: u32,
}

impl Default for Argon2Params {
    fn default() -> Self {
        Self {
            memory_kib: 65_536,
            iterations: 3,
            parallelism: 4,
        }
    }
}

impl Argon2Params {
    /// The cheapest parameters `derive_kek` accepts.
    pub fn minimum() -> Self {
        Self {
            memory_kib: MIN_MEMORY_KIB,
            iterations: 1,
            parallelism: 1,
        }
    }

    /// Returns `true` if every cost lies within the accepted range.
    pub fn within_limits(&self) -> bool {
        (MIN_MEMORY_KIB..=MAX_MEMORY_KIB).contains(&self.memory_kib)
            && (1..=MAX_ITERATIONS).contains(&self.iterations)
            && (1..=MAX_PARALLELISM).contains(&self.parallelism)
    }

    /// Reject dangerously weak or absurdly expensive settings.
    pub fn validate(&self) -> Result<()> {
        if !(MIN_MEMORY_KIB..=MAX_MEMORY_KIB).contains(&self.memory_kib) {
            return Err(DurinError::KeyDerivationFailed(format!(
                "Argon2 memory_kib must be between {MIN_MEMORY_KIB} and {MAX_MEMORY_KIB} (got {})",
                self.memory_kib
            )));
        }
        if !(1..=MAX_ITERATIONS).contains(&self.iterations) {
            return Err(DurinError::KeyDerivationFailed(format!(
                "Argon2 iterations must be between 1 and {MAX_ITERATIONS} (got {})",
                self.iterations
            )));
        }
        if !(1..=MAX_PARALLELISM).contains(&self.parallelism) {
            return Err(DurinError::KeyDerivationFailed(format!(
                "Argon2 parallelism must be between 1 and {MAX_PARALLELISM} (got {})",
                self.parallelism
            )));
        }
        Ok(())
    }
}

/// Somewhere the unlock password can be read from.
///
/// `creating` is `true` when no master keyset exists yet, so interactive
/// sources can ask for confirmation before the password becomes permanent.
pub trait PasswordSource {
    fn read_password(&mut self, creating: bool) -> Result<Zeroizing<String>>;
}

/// A password already held in memory.
pub struct StaticPassword(Zeroizing<String>);

impl StaticPassword {
    pub fn new(password: impl Into<String>) -> Self {
        Self(Zeroizing::new(password.into()))
    }
}

impl PasswordSource for StaticPassword {
    fn read_password(&mut self, _creating: bool) -> Result<Zeroizing<String>> {
        Ok(self.0.clone())
    }
}

/// Reads the password from an environment variable (CI, scripting).
pub struct EnvPassword {
    var: String,
}

impl EnvPassword {
    /// Name of the variable the binary consults before prompting.
    pub const DEFAULT_VAR: &'static str = "DURIN_PASSWORD";

    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }

    /// Returns `true` if the variable is set and non-empty.
    pub fn is_available(&self) -> bool {
        std::env::var(&self.var).is_ok_and(|pw| !pw.is_empty())
    }
}

impl PasswordSource for EnvPassword {
    fn read_password(&mut self, _creating: bool) -> Result<Zeroizing<String>> {
        match std::env::var(&self.var) {
            Ok(pw) if !pw.is_empty() => Ok(Zeroizing::new(pw)),
            _ => Err(DurinError::KeyDerivationFailed(format!(
                "no password available in ${}",
                self.var
            ))),
        }
    }
}

/// Derive a 32-byte KEK from a password and salt.
///
/// The same password + salt + params will always produce the same key.
pub fn derive_kek(password: &[u8], salt: &[u8], argon2_params: &Argon2Params) -> Result<Kek> {
    argon2_params.validate()?;

    let params = Params::new(
        argon2_params.memory_kib,
        argon2_params.iterations,
        argon2_params.parallelism,
        Some(KEY_LEN),
    )
    .map_err(|e| DurinError::KeyDerivationFailed(format!("invalid Argon2 params: {e}")))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    argon2
        .hash_password_into(password, salt, &mut *key)
        .map_err(|e| DurinError::KeyDerivationFailed(format!("Argon2id hashing failed: {e}")))?;

    Ok(Kek::new(*key, *argon2_params))
}

/// Read a password from `source` and derive a KEK from it.
pub fn derive_kek_from_source(
    source: &mut dyn PasswordSource,
    creating: bool,
    salt: &[u8],
    argon2_params: &Argon2Params,
) -> Result<Kek> {
    let password = source.read_password(creating)?;
    derive_kek(password.as_bytes(), salt, argon2_params)
}

/// Generate a cryptographically random salt.
pub fn generate_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    rand::rng().fill_bytes(&mut salt);
    salt
}
