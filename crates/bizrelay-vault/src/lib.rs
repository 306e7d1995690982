// SPDX-FileCopyrightText: 2026 Bizrelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Credential encryption for bizrelay.
//!
//! [`CredentialVault`] wraps the AES-256-GCM primitives with a string
//! codec: the stored form is `base64(nonce || ciphertext || tag)`, one
//! opaque column value per credential. The vault is a pure function over
//! its fixed key; it holds no other state.

pub mod crypto;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use bizrelay_core::RelayError;

/// Byte length of the symmetric key (AES-256).
pub const KEY_LEN: usize = 32;

const NONCE_LEN: usize = 12;

/// Encrypts and decrypts credential strings under a fixed symmetric key.
///
/// Debug output intentionally omits the key.
#[derive(Clone)]
pub struct CredentialVault {
    key: [u8; KEY_LEN],
}

impl std::fmt::Debug for CredentialVault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialVault").field("key", &"[REDACTED]").finish()
    }
}

impl CredentialVault {
    /// Creates a vault from a key string.
    ///
    /// The key must be exactly [`KEY_LEN`] bytes; this is the one-time
    /// startup precondition, so per-call code never re-checks it.
    pub fn new(key: &str) -> Result<Self, RelayError> {
        let bytes = key.as_bytes();
        if bytes.len() != KEY_LEN {
            return Err(RelayError::Config(format!(
                "encryption key must be exactly {KEY_LEN} bytes, got {}",
                bytes.len()
            )));
        }
        let mut key = [0u8; KEY_LEN];
        key.copy_from_slice(bytes);
        Ok(Self { key })
    }

    /// Encrypts a credential, returning the base64 stored form.
    pub fn encrypt(&self, plaintext: &str) -> Result<String, RelayError> {
        let (ciphertext, nonce) = crypto::seal(&self.key, plaintext.as_bytes())?;
        let mut combined = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        combined.extend_from_slice(&nonce);
        combined.extend_from_slice(&ciphertext);
        Ok(BASE64.encode(combined))
    }

    /// Decrypts a stored credential back to its plaintext.
    pub fn decrypt(&self, stored: &str) -> Result<String, RelayError> {
        let combined = BASE64
            .decode(stored)
            .map_err(|e| RelayError::Vault(format!("invalid base64 credential: {e}")))?;
        if combined.len() < NONCE_LEN {
            return Err(RelayError::Vault("stored credential too short".to_string()));
        }
        let (nonce_bytes, ciphertext) = combined.split_at(NONCE_LEN);
        let mut nonce = [0u8; NONCE_LEN];
        nonce.copy_from_slice(nonce_bytes);
        let plaintext = crypto::open(&self.key, &nonce, ciphertext)?;
        String::from_utf8(plaintext)
            .map_err(|e| RelayError::Vault(format!("decrypted credential is not UTF-8: {e}")))
    }
}
