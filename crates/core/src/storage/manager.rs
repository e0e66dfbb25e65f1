use crate::errors::CoreError;
use crate::models::book::TripBook;

use super::encryption::{self, KdfParams};
use super::format;

/// High-level storage operations: save/load the trip book to/from
/// encrypted bytes or files.
pub struct StorageManager;

impl StorageManager {
    /// Encrypt and serialize a book to raw bytes (portable,
    /// platform-independent).
    ///
    /// Flow: TripBook → bincode → AES-256-GCM(Argon2id(password)) → TSBK bytes
    pub fn save_to_bytes(book: &TripBook, password: &str) -> Result<Vec<u8>, CoreError> {
        let plaintext = bincode::serialize(book)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize trip book: {e}")))?;

        let salt = encryption::random_salt()?;
        let nonce = encryption::random_nonce()?;

        let kdf_params = KdfParams::default();
        let key = encryption::derive_key(password, &salt, &kdf_params)?;

        let ciphertext = encryption::seal(&plaintext, &key, &nonce)?;

        Ok(format::encode(
            format::CURRENT_VERSION,
            &salt,
            &nonce,
            &kdf_params,
            &ciphertext,
        ))
    }

    /// Decrypt and deserialize a book from raw bytes.
    ///
    /// Flow: TSBK bytes → parse header → Argon2id(password, salt) →
    /// AES-256-GCM decrypt → bincode → TripBook
    pub fn load_from_bytes(data: &[u8], password: &str) -> Result<TripBook, CoreError> {
        let (header, ciphertext) = format::decode(data)?;

        let key = encryption::derive_key(password, &header.salt, &header.kdf_params)?;

        let plaintext = encryption::open(ciphertext, &key, &header.nonce)?;

        let book: TripBook = bincode::deserialize(&plaintext).map_err(|e| {
            CoreError::Deserialization(format!("Failed to deserialize trip book: {e}"))
        })?;

        Ok(book)
    }

    /// Save the book to an encrypted file on disk (native only).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to_file(book: &TripBook, path: &str, password: &str) -> Result<(), CoreError> {
        let bytes = Self::save_to_bytes(book, password)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Load the book from an encrypted file on disk (native only).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_file(path: &str, password: &str) -> Result<TripBook, CoreError> {
        let bytes = std::fs::read(path)?;
        Self::load_from_bytes(&bytes, password)
    }
}
