//! Salt and master keyset lifecycle.
//!
//! The salt (`salt`) is plaintext: it is needed to re-derive the KEK.
//! The master key (`master`) is only ever stored wrapped under that KEK.
//! Splitting the two means a password change only rewraps one small
//! file; records stay encrypted under the same master key.

use std::path::Path;

use crate::crypto::kdf::{generate_salt, Argon2Params, SALT_LEN};
use crate::crypto::keys::{Kek, MasterKey};
use crate::crypto::keyset::{stored_params, unwrap_keyset, wrap_keyset};
use crate::errors::{DurinError, Result};

use super::files::{read_optional, write_private};

/// Name of the salt file inside the store directory.
pub const SALT_FILE: &str = "salt";

/// Name of the wrapped master keyset file inside the store directory.
pub const MASTER_FILE: &str = "master";

/// Read the persisted salt, creating and persisting one if absent.
pub fn load_or_create_salt(dir: &Path) -> Result<[u8; SALT_LEN]> {
    let path = dir.join(SALT_FILE);

    if let Some(data) = read_optional(&path)? {
        return data.as_slice().try_into().map_err(|_| {
            DurinError::InvalidFormat(format!(
                "{} must be exactly {SALT_LEN} bytes, got {}",
                path.display(),
                data.len()
            ))
        });
    }

    let salt = generate_salt();
    write_private(&path, &salt)?;
    tracing::info!(path = %path.display(), "created new salt");
    Ok(salt)
}

/// Read the wrapped keyset bytes, if the store has one yet.
pub fn read_wrapped_master(dir: &Path) -> Result<Option<Vec<u8>>> {
    read_optional(&dir.join(MASTER_FILE))
}

/// The Argon2 params a KEK must be derived with to open this store.
///
/// An existing keyset dictates its own params; a new store uses
/// `configured`.
pub fn kdf_params_for(wrapped: Option<&[u8]>, configured: Argon2Params) -> Result<Argon2Params> {
    match wrapped {
        Some(bytes) => stored_params(bytes),
        None => Ok(configured),
    }
}

/// Unwrap the persisted master key, or generate and persist a new one.
pub fn load_or_create_master_key(dir: &Path, kek: &Kek) -> Result<MasterKey> {
    match read_wrapped_master(dir)? {
        Some(wrapped) => unwrap_keyset(&wrapped, kek),
        None => {
            let key = MasterKey::generate();
            rewrap_master_key(dir, &key, kek)?;
            tracing::info!(dir = %dir.display(), "created new master keyset");
            Ok(key)
        }
    }
}

/// Wrap `key` under `kek` and replace the `master` file.
pub fn rewrap_master_key(dir: &Path, key: &MasterKey, kek: &Kek) -> Result<()> {
    let wrapped = wrap_keyset(key, kek)?;
    write_private(&dir.join(MASTER_FILE), &wrapped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::kdf::derive_kek;
    use tempfile::TempDir;

    fn kek(password: &str, salt: &[u8]) -> Kek {
        derive_kek(password.as_bytes(), salt, &Argon2Params::minimum()).unwrap()
    }

    #[test]
    fn salt_is_created_once_then_reused() {
        let dir = TempDir::new().unwrap();
        let first = load_or_create_salt(dir.path()).unwrap();
        let second = load_or_create_salt(dir.path()).unwrap();
        assert_eq!(first, second);
        assert_eq!(std::fs::read(dir.path().join(SALT_FILE)).unwrap(), first);
    }

    #[test]
    fn wrong_length_salt_is_a_format_error() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(SALT_FILE), [0u8; 3]).unwrap();
        assert!(matches!(
            load_or_create_salt(dir.path()),
            Err(DurinError::InvalidFormat(_))
        ));
    }

    #[test]
    fn master_key_survives_reload() {
        let dir = TempDir::new().unwrap();
        let salt = load_or_create_salt(dir.path()).unwrap();

        let created = load_or_create_master_key(dir.path(), &kek("pw-one", &salt)).unwrap();
        let loaded = load_or_create_master_key(dir.path(), &kek("pw-one", &salt)).unwrap();
        assert_eq!(created.as_bytes(), loaded.as_bytes());
        assert_eq!(created.key_id(), loaded.key_id());
    }

    #[test]
    fn wrong_password_cannot_unwrap() {
        let dir = TempDir::new().unwrap();
        let salt = load_or_create_salt(dir.path()).unwrap();
        load_or_create_master_key(dir.path(), &kek("right", &salt)).unwrap();

        let result = load_or_create_master_key(dir.path(), &kek("wrong", &salt));
        assert!(matches!(result, Err(DurinError::AuthenticationFailed)));
    }

    #[test]
    fn corrupted_master_reports_the_same_error_as_a_wrong_password() {
        let dir = TempDir::new().unwrap();
        let salt = load_or_create_salt(dir.path()).unwrap();
        load_or_create_master_key(dir.path(), &kek("right", &salt)).unwrap();

        let path = dir.path().join(MASTER_FILE);
        let mut data = std::fs::read(&path).unwrap();
        let last = data.len() - 1;
        data[last] ^= 0x80;
        std::fs::write(&path, &data).unwrap();

        let corrupted = load_or_create_master_key(dir.path(), &kek("right", &salt)).err().unwrap();
        assert_eq!(
            corrupted.to_string(),
            DurinError::AuthenticationFailed.to_string()
        );
    }

    #[test]
    fn stored_params_win_over_configuration() {
        let dir = TempDir::new().unwrap();
        let salt = load_or_create_salt(dir.path()).unwrap();
        load_or_create_master_key(dir.path(), &kek("pw", &salt)).unwrap();

        let wrapped = read_wrapped_master(dir.path()).unwrap();
        let params = kdf_params_for(wrapped.as_deref(), Argon2Params::default()).unwrap();
        assert_eq!(params, Argon2Params::minimum());

        let fresh = kdf_params_for(None, Argon2Params::default()).unwrap();
        assert_eq!(fresh, Argon2Params::default());
    }
}
