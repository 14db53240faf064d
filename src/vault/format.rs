//! On-disk record set (`pw.db`).
//!
//! The file is a single JSON document holding every envelope:
//!
//! ```json
//! {"version":1,"records":[{"name":"github","ciphertext":"<base64>"}]}
//! ```
//!
//! - **version**: format version (currently `1`).
//! - **records**: one envelope per record; `ciphertext` is the base64 of
//!   `nonce || AES-256-GCM(record JSON, aad = name) || tag`.
//!
//! Each commit rewrites the whole file through `files::write_private`.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::files::{read_optional, write_private};
use crate::errors::{DurinError, Result};

/// Name of the record-set file inside the store directory.
pub const RECORDS_FILE: &str = "pw.db";

/// Current record-set format version.
pub const CURRENT_VERSION: u32 = 1;

/// One named ciphertext.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    pub name: String,

    /// nonce || ciphertext || tag, base64 in JSON.
    #[serde(serialize_with = "base64_encode", deserialize_with = "base64_decode")]
    pub ciphertext: Vec<u8>,
}

/// Every envelope in the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordSet {
    pub version: u32,
    pub records: Vec<Envelope>,
}

impl RecordSet {
    /// Build a record set from the in-memory index, sorted by name so
    /// successive commits of the same index are byte-identical.
    pub fn from_index(index: &HashMap<String, Vec<u8>>) -> Self {
        let mut records: Vec<Envelope> = index
            .iter()
            .map(|(name, ciphertext)| Envelope {
                name: name.clone(),
                ciphertext: ciphertext.clone(),
            })
            .collect();
        records.sort_by(|a, b| a.name.cmp(&b.name));
        Self {
            version: CURRENT_VERSION,
            records,
        }
    }

    /// Rebuild the in-memory index, rejecting duplicate names.
    pub fn into_index(self) -> Result<HashMap<String, Vec<u8>>> {
        let mut index = HashMap::with_capacity(self.records.len());
        for envelope in self.records {
            if index.contains_key(&envelope.name) {
                return Err(DurinError::InvalidFormat(format!(
                    "duplicate record '{}'",
                    envelope.name
                )));
            }
            index.insert(envelope.name, envelope.ciphertext);
        }
        Ok(index)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self)
            .map_err(|e| DurinError::InvalidFormat(format!("record set encoding: {e}")))
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let set: RecordSet = serde_json::from_slice(data)
            .map_err(|e| DurinError::InvalidFormat(format!("{RECORDS_FILE}: {e}")))?;
        if set.version != CURRENT_VERSION {
            return Err(DurinError::InvalidFormat(format!(
                "{RECORDS_FILE}: unsupported version {}, expected {CURRENT_VERSION}",
                set.version
            )));
        }
        Ok(set)
    }
}

/// Load the record index from `dir`.
///
/// A missing file means an empty store; the empty set is committed right
/// away so the file exists from then on.
pub fn load(dir: &Path) -> Result<HashMap<String, Vec<u8>>> {
    let path = dir.join(RECORDS_FILE);
    match read_optional(&path)? {
        Some(data) => RecordSet::from_bytes(&data)?.into_index(),
        None => {
            let index = HashMap::new();
            commit(dir, &index)?;
            Ok(index)
        }
    }
}

/// Replace the record-set file with the full contents of `index`.
pub fn commit(dir: &Path, index: &HashMap<String, Vec<u8>>) -> Result<()> {
    let bytes = RecordSet::from_index(index).to_bytes()?;
    write_private(&dir.join(RECORDS_FILE), &bytes)?;
    tracing::debug!(dir = %dir.display(), records = index.len(), "committed record set");
    Ok(())
}

// ---------------------------------------------------------------------------
// Serde helpers for base64-encoded Vec<u8> fields
// ---------------------------------------------------------------------------

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

fn base64_encode<S>(data: &[u8], serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    let encoded = BASE64.encode(data);
    serializer.serialize_str(&encoded)
}

fn base64_decode<'de, D>(deserializer: D) -> std::result::Result<Vec<u8>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    BASE64.decode(&s).map_err(serde::de::Error::custom)
}
