use crate::errors::CoreError;

use super::encryption::{KdfParams, NONCE_LEN, SALT_LEN};

/// Magic bytes identifying a Trip Savings book file.
pub const MAGIC: &[u8; 4] = b"TSBK";

/// Current book-file format version.
pub const CURRENT_VERSION: u16 = 1;

/// Fixed header size in bytes:
/// magic(4) + version(2) + salt(16) + nonce(12)
/// + memory_kib(4) + iterations(4) + lanes(4) = 46.
/// Everything after the header is ciphertext.
pub const HEADER_SIZE: usize = 46;

/// Header parsed from the front of a book file.
#[derive(Debug)]
pub struct BookHeader {
    pub version: u16,
    pub salt: [u8; SALT_LEN],
    pub nonce: [u8; NONCE_LEN],
    pub kdf_params: KdfParams,
}

/// Assemble a complete book file.
///
/// Layout:
/// ```text
/// [TSBK: 4B] [version: 2B LE] [salt: 16B] [nonce: 12B]
/// [memory_kib: 4B LE] [iterations: 4B LE] [lanes: 4B LE]
/// [ciphertext: rest of file, includes the AES-GCM auth tag]
/// ```
pub fn encode(
    version: u16,
    salt: &[u8; SALT_LEN],
    nonce: &[u8; NONCE_LEN],
    kdf_params: &KdfParams,
    ciphertext: &[u8],
) -> Vec<u8> {
    let mut buf = Vec::with_capacity(HEADER_SIZE + ciphertext.len());

    buf.extend_from_slice(MAGIC);
    buf.extend_from_slice(&version.to_le_bytes());
    buf.extend_from_slice(salt);
    buf.extend_from_slice(nonce);
    buf.extend_from_slice(&kdf_params.memory_kib.to_le_bytes());
    buf.extend_from_slice(&kdf_params.iterations.to_le_bytes());
    buf.extend_from_slice(&kdf_params.lanes.to_le_bytes());
    buf.extend_from_slice(ciphertext);

    buf
}

/// Parse the header from raw file bytes.
/// Returns the header and the ciphertext slice (the remainder of the file).
pub fn decode(data: &[u8]) -> Result<(BookHeader, &[u8]), CoreError> {
    if data.len() < HEADER_SIZE {
        return Err(CoreError::InvalidFileFormat(
            "File too small to be a valid book file".into(),
        ));
    }

    if &data[0..4] != MAGIC {
        return Err(CoreError::InvalidFileFormat(
            "Invalid magic bytes — not a Trip Savings book file".into(),
        ));
    }

    let version = u16::from_le_bytes([data[4], data[5]]);
    if version == 0 || version > CURRENT_VERSION {
        return Err(CoreError::UnsupportedVersion(version));
    }

    let mut offset = 6;

    let mut salt = [0u8; SALT_LEN];
    salt.copy_from_slice(&data[offset..offset + SALT_LEN]);
    offset += SALT_LEN;

    let mut nonce = [0u8; NONCE_LEN];
    nonce.copy_from_slice(&data[offset..offset + NONCE_LEN]);
    offset += NONCE_LEN;

    let memory_kib = read_u32(data, offset)?;
    offset += 4;
    let iterations = read_u32(data, offset)?;
    offset += 4;
    let lanes = read_u32(data, offset)?;
    offset += 4;

    // Bound the KDF cost so a crafted header can't pin the CPU or eat
    // memory before the password is even checked.
    if !(8..=1_048_576).contains(&memory_kib) {
        return Err(CoreError::InvalidFileFormat(format!(
            "KDF memory cost out of safe range: {memory_kib} KiB (expected 8..1048576)"
        )));
    }
    if !(1..=16).contains(&iterations) {
        return Err(CoreError::InvalidFileFormat(format!(
            "KDF iterations out of safe range: {iterations} (expected 1..16)"
        )));
    }
    if !(1..=8).contains(&lanes) {
        return Err(CoreError::InvalidFileFormat(format!(
            "KDF lanes out of safe range: {lanes} (expected 1..8)"
        )));
    }

    let header = BookHeader {
        version,
        salt,
        nonce,
        kdf_params: KdfParams {
            memory_kib,
            iterations,
            lanes,
        },
    };

    Ok((header, &data[offset..]))
}

fn read_u32(data: &[u8], offset: usize) -> Result<u32, CoreError> {
    data[offset..offset + 4]
        .try_into()
        .map(u32::from_le_bytes)
        .map_err(|_| CoreError::InvalidFileFormat("Failed to read KDF parameter".into()))
}
