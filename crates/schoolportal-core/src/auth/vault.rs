use anyhow::{anyhow, Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chacha20poly1305::aead::{Aead, KeyInit};
use chacha20poly1305::{ChaCha20Poly1305, Key, Nonce};
use keyring::Entry;
use rand::RngCore;
use tracing::info;

use super::credentials::SERVICE_NAME;

/// Keychain account holding the session encryption key
const VAULT_ACCOUNT: &str = "session-key";

const KEY_LEN: usize = 32;
const NONCE_LEN: usize = 12;

/// Seals the persisted session record with ChaCha20-Poly1305.
///
/// The sealed layout is `nonce || ciphertext`, with a fresh random nonce per
/// write.
pub struct SessionVault {
    cipher: ChaCha20Poly1305,
}

impl SessionVault {
    /// Load the key from the OS keychain, generating and storing one on first use.
    pub fn from_keychain() -> Result<Self> {
        let entry = Entry::new(SERVICE_NAME, VAULT_ACCOUNT).context("Failed to create keyring entry")?;

        let key = match entry.get_password() {
            Ok(encoded) => {
                let bytes = STANDARD
                    .decode(encoded.trim())
                    .context("Stored session key is not valid base64")?;
                <[u8; KEY_LEN]>::try_from(bytes.as_slice())
                    .map_err(|_| anyhow!("Stored session key has the wrong length"))?
            }
            Err(keyring::Error::NoEntry) => {
                let mut key = [0u8; KEY_LEN];
                rand::thread_rng().fill_bytes(&mut key);
                entry
                    .set_password(&STANDARD.encode(key))
                    .context("Failed to store session key in keychain")?;
                info!("Generated new session encryption key");
                key
            }
            Err(e) => return Err(e).context("Failed to read session key from keychain"),
        };

        Ok(Self::with_key(key))
    }

    pub fn with_key(key: [u8; KEY_LEN]) -> Self {
        Self {
            cipher: ChaCha20Poly1305::new(Key::from_slice(&key)),
        }
    }

    pub fn seal(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        let mut nonce = [0u8; NONCE_LEN];
        rand::thread_rng().fill_bytes(&mut nonce);

        let ciphertext = self
            .cipher
            .encrypt(Nonce::from_slice(&nonce), plaintext)
            .map_err(|_| anyhow!("Failed to encrypt session record"))?;

        let mut sealed = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        sealed.extend_from_slice(&nonce);
        sealed.extend_from_slice(&ciphertext);
        Ok(sealed)
    }

    pub fn open(&self, sealed: &[u8]) -> Result<Vec<u8>> {
        if sealed.len() <= NONCE_LEN {
            return Err(anyhow!("Sealed session record is truncated"));
        }
        let (nonce, ciphertext) = sealed.split_at(NONCE_LEN);
        self.cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| anyhow!("Failed to decrypt session record"))
    }
}
