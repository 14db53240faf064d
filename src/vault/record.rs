//! The credential record and its plaintext encoding.
//!
//! A record is serialized as a small JSON object before encryption:
//!
//! ```json
//! {"username":"alice","password":"p1","notes":""}
//! ```
//!
//! Field order does not matter when decoding; all three fields are
//! required.

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::errors::{DurinError, Result};

/// One credential entry.  Its strings are wiped when it is dropped.
#[derive(Clone, PartialEq, Eq, Default, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct Record {
    pub username: String,
    pub password: String,
    pub notes: String,
}

impl Record {
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        notes: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            notes: notes.into(),
        }
    }

    /// Serialize to the plaintext payload that gets encrypted.
    pub fn encode(&self) -> Result<Zeroizing<Vec<u8>>> {
        serde_json::to_vec(self)
            .map(Zeroizing::new)
            .map_err(|e| DurinError::InvalidFormat(format!("record encoding: {e}")))
    }

    /// Parse a decrypted payload back into a record.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes)
            .map_err(|e| DurinError::InvalidFormat(format!("record payload: {e}")))
    }
}

// Hand-written so the password never lands in a log line.
impl std::fmt::Debug for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Record")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("notes", &self.notes)
            .finish()
    }
}
