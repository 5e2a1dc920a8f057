use std::{fmt, str::FromStr};

use crate::error::CasperHelperError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub const DIGEST_LENGTH: usize = 32;

/// A 32-byte hash, written as lowercase hex in JSON and text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Digest(pub [u8; DIGEST_LENGTH]);

impl Digest {
    pub fn as_bytes(&self) -> &[u8; DIGEST_LENGTH] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl FromStr for Digest {
    type Err = CasperHelperError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s)?;
        let bytes: [u8; DIGEST_LENGTH] = bytes.try_into().map_err(|bytes: Vec<u8>| {
            CasperHelperError::ConversionError(format!(
                "Digest must be {} bytes, got {}",
                DIGEST_LENGTH,
                bytes.len()
            ))
        })?;
        Ok(Self(bytes))
    }
}

impl Serialize for Digest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Digest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

/// BLAKE2b with a 32-byte output, the hash behind deploy and body hashes.
pub fn blake2b_hash(data: &[u8]) -> Digest {
    let hash = blake2b_simd::Params::new()
        .hash_length(DIGEST_LENGTH)
        .to_state()
        .update(data)
        .finalize();

    let mut bytes = [0u8; DIGEST_LENGTH];
    bytes.copy_from_slice(hash.as_bytes());
    Digest(bytes)
}
