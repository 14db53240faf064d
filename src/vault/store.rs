//! The store façade used by the CLI and by library callers.
//!
//! `SecretStore` ties the pieces together: it holds the directory lock,
//! the unwrapped master key and the in-memory index of envelopes, and
//! exposes `list` / `get` / `put` / `delete`.  Every mutation commits the
//! full index to disk before returning.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::config::Settings;
use crate::crypto::encryption::{decrypt, encrypt};
use crate::crypto::kdf::{derive_kek, derive_kek_from_source, Argon2Params, PasswordSource};
use crate::crypto::keys::MasterKey;
use crate::errors::{DurinError, Result};

use super::files::ensure_private_dir;
use super::format;
use super::lock::StoreLock;
use super::master;
use super::record::Record;

/// Longest accepted record name, in bytes.
const MAX_NAME_LEN: usize = 256;

/// An open, unlocked store.  Dropping it zeroizes the master key and
/// releases the directory lock.
pub struct SecretStore {
    /// Store directory on disk.
    dir: PathBuf,

    /// In-memory map of record name -> nonce || ciphertext || tag.
    records: HashMap<String, Vec<u8>>,

    /// The unwrapped master key (zeroized on drop).
    master_key: MasterKey,

    /// Argon2 params the current KEK was derived with.
    kdf_params: Argon2Params,

    /// Held for the lifetime of the store; declared last so it is
    /// released after the key material is wiped.
    _lock: StoreLock,
}

impl SecretStore {
    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Open (or initialise) the store in `dir`, reading settings from
    /// `<dir>/config.toml`.
    pub fn open(dir: &Path, password: &mut dyn PasswordSource) -> Result<Self> {
        ensure_private_dir(dir)?;
        let lock = StoreLock::acquire(dir)?;
        let settings = Settings::load(dir)?;
        Self::open_locked(dir, lock, &settings, password)
    }

    /// Open (or initialise) the store in `dir` with explicit settings.
    pub fn open_with_settings(
        dir: &Path,
        settings: &Settings,
        password: &mut dyn PasswordSource,
    ) -> Result<Self> {
        ensure_private_dir(dir)?;
        let lock = StoreLock::acquire(dir)?;
        Self::open_locked(dir, lock, settings, password)
    }

    /// Everything after the lock: salt, KEK, master key, records.
    ///
    /// On any error `lock` is dropped here and nothing is kept.
    fn open_locked(
        dir: &Path,
        lock: StoreLock,
        settings: &Settings,
        password: &mut dyn PasswordSource,
    ) -> Result<Self> {
        let salt = master::load_or_create_salt(dir)?;

        let wrapped = master::read_wrapped_master(dir)?;
        let creating = wrapped.is_none();
        let kdf_params = master::kdf_params_for(wrapped.as_deref(), settings.argon2_params())?;

        let secret = password.read_password(creating)?;
        let kek = derive_kek(secret.as_bytes(), &salt, &kdf_params).map_err(|e| {
            // Params read from an existing keyset are unauthenticated here.
            if creating {
                e
            } else {
                DurinError::AuthenticationFailed
            }
        })?;
        drop(secret);
        let master_key = master::load_or_create_master_key(dir, &kek)?;
        drop(kek);

        let records = format::load(dir)?;
        tracing::info!(dir = %dir.display(), records = records.len(), "opened store");

        Ok(Self {
            dir: dir.to_path_buf(),
            records,
            master_key,
            kdf_params,
            _lock: lock,
        })
    }

    // ------------------------------------------------------------------
    // Record operations
    // ------------------------------------------------------------------

    /// All record names, sorted.
    pub fn list(&self) -> Vec<String> {
        let mut names: Vec<String> = self.records.keys().cloned().collect();
        names.sort();
        names
    }

    /// Decrypt and return the record stored under `name`.
    pub fn get(&self, name: &str) -> Result<Record> {
        let ciphertext = self
            .records
            .get(name)
            .ok_or_else(|| DurinError::RecordNotFound(name.to_string()))?;

        let plaintext = zeroize::Zeroizing::new(decrypt(
            self.master_key.as_bytes(),
            ciphertext,
            name.as_bytes(),
        )?);
        Record::decode(&plaintext)
    }

    /// Encrypt `record` under `name`, replacing any previous record, and
    /// commit the store.
    pub fn put(&mut self, name: &str, record: &Record) -> Result<()> {
        validate_name(name)?;

        let plaintext = record.encode()?;
        let ciphertext = encrypt(self.master_key.as_bytes(), &plaintext, name.as_bytes())?;

        let replaced = self.records.insert(name.to_string(), ciphertext).is_some();
        tracing::debug!(name, replaced, "stored record");
        self.commit()
    }

    /// Remove the record stored under `name` and commit the store.
    pub fn delete(&mut self, name: &str) -> Result<()> {
        if self.records.remove(name).is_none() {
            return Err(DurinError::RecordNotFound(name.to_string()));
        }
        tracing::debug!(name, "deleted record");
        self.commit()
    }

    /// Rewrap the master key under a KEK derived from a new password.
    ///
    /// Records are untouched; only the `master` file is replaced.  Pass
    /// `None` for `params` to keep the current Argon2 settings.
    pub fn change_password(
        &mut self,
        new_password: &mut dyn PasswordSource,
        params: Option<Argon2Params>,
    ) -> Result<()> {
        let salt = master::load_or_create_salt(&self.dir)?;
        let kdf_params = params.unwrap_or(self.kdf_params);

        let kek = derive_kek_from_source(new_password, true, &salt, &kdf_params)?;
        master::rewrap_master_key(&self.dir, &self.master_key, &kek)?;
        self.kdf_params = kdf_params;

        tracing::info!(dir = %self.dir.display(), "master keyset rewrapped");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    /// Write the full index to disk.
    fn commit(&self) -> Result<()> {
        format::commit(&self.dir, &self.records)
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Returns the store directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the number of records in the store.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns `true` if a record named `name` exists.
    ///
    /// This is a metadata-only check — no decryption is performed.
    pub fn contains(&self, name: &str) -> bool {
        self.records.contains_key(name)
    }

    /// Argon2 params the store is currently wrapped with.
    pub fn kdf_params(&self) -> Argon2Params {
        self.kdf_params
    }
}

/// Record names are free-form but must be non-empty and bounded.
fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(DurinError::InvalidName(
            "record name cannot be empty".into(),
        ));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(DurinError::InvalidName(format!(
            "record name cannot exceed {MAX_NAME_LEN} bytes"
        )));
    }
    Ok(())
}
