//! Base-58 address decoding with version and checksum verification.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Length of the public key hash carried by an address.
pub const KEY_HASH_LEN: usize = 20;
/// Decoded address length: key hash, version byte, checksum.
pub const ADDRESS_BYTES_LEN: usize = KEY_HASH_LEN + 1 + CHECKSUM_LEN;
/// The only address version currently accepted.
pub const ADDRESS_VERSION: u8 = 0;

const CHECKSUM_LEN: usize = 4;

/// Validation errors for base-58 addresses.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AddressValidationError {
    #[error("address is empty")]
    Empty,
    #[error("address is not valid base58")]
    InvalidBase58,
    #[error("address decodes to {actual} bytes, expected 25")]
    InvalidLength { actual: usize },
    #[error("address version {version} is not supported")]
    InvalidVersion { version: u8 },
    #[error("address checksum mismatch")]
    InvalidChecksum,
}

/// A syntactically valid address in its canonical base-58 form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

impl Address {
    /// Encode a key hash as a version-0 address.
    pub fn from_key_hash(key_hash: [u8; KEY_HASH_LEN]) -> Self {
        let mut bytes = Vec::with_capacity(ADDRESS_BYTES_LEN);
        bytes.extend_from_slice(&key_hash);
        bytes.push(ADDRESS_VERSION);
        let sum = checksum(&bytes);
        bytes.extend_from_slice(&sum);
        Self(bs58::encode(bytes).into_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Address {
    type Error = AddressValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        decode_address(&value)
    }
}

impl From<Address> for String {
    fn from(value: Address) -> Self {
        value.0
    }
}

fn checksum(body: &[u8]) -> [u8; CHECKSUM_LEN] {
    let digest = Sha256::digest(body);
    let mut out = [0_u8; CHECKSUM_LEN];
    out.copy_from_slice(&digest[..CHECKSUM_LEN]);
    out
}

/// Decode and verify a base-58 address. Does not check existence or funds.
pub fn decode_address(input: &str) -> Result<Address, AddressValidationError> {
    let s = input.trim();
    if s.is_empty() {
        return Err(AddressValidationError::Empty);
    }

    let bytes = bs58::decode(s)
        .into_vec()
        .map_err(|_| AddressValidationError::InvalidBase58)?;

    if bytes.len() != ADDRESS_BYTES_LEN {
        return Err(AddressValidationError::InvalidLength {
            actual: bytes.len(),
        });
    }

    let (body, sum) = bytes.split_at(KEY_HASH_LEN + 1);
    if checksum(body).as_slice() != sum {
        return Err(AddressValidationError::InvalidChecksum);
    }

    let version = body[KEY_HASH_LEN];
    if version != ADDRESS_VERSION {
        return Err(AddressValidationError::InvalidVersion { version });
    }

    Ok(Address(s.to_string()))
}
