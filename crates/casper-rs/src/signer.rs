use std::{fmt, str::FromStr};

use crate::bytesrepr::ToBytes;
use crate::deploy::DeployHash;
use crate::error::CasperHelperError;
use crate::fs::FileReader;
use ed25519_dalek::{
    Signature as Ed25519Signature, Signer as _, SigningKey, Verifier as _, VerifyingKey,
};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Algorithm tag prefixed to ed25519 keys and signatures in their hex form.
pub const ED25519_TAG: u8 = 1;
const ED25519_TAG_HEX: &str = "01";
const PUBLIC_KEY_LENGTH: usize = 32;

/// DER prefix of a PKCS#8 ed25519 private key; the 32-byte seed follows it.
const PKCS8_ED25519_PREFIX: [u8; 16] = [
    0x30, 0x2e, 0x02, 0x01, 0x00, 0x30, 0x05, 0x06, 0x03, 0x2b, 0x65, 0x70, 0x04, 0x22, 0x04, 0x20,
];

fn parse_tagged_hex<const N: usize>(s: &str, what: &str) -> Result<[u8; N], CasperHelperError> {
    let body = s.strip_prefix(ED25519_TAG_HEX).ok_or_else(|| {
        CasperHelperError::ConversionError(format!("{} must start with the ed25519 tag 01", what))
    })?;
    parse_hex::<N>(body, what)
}

fn parse_hex<const N: usize>(body: &str, what: &str) -> Result<[u8; N], CasperHelperError> {
    let bytes = hex::decode(body)?;
    bytes.try_into().map_err(|bytes: Vec<u8>| {
        CasperHelperError::ConversionError(format!(
            "{} must be {} bytes, got {}",
            what,
            N,
            bytes.len()
        ))
    })
}

/// An ed25519 account public key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey(pub [u8; PUBLIC_KEY_LENGTH]);

impl PublicKey {
    /// Returns the tagged hex form used as the account address.
    pub fn to_hex(&self) -> String {
        format!("{}{}", ED25519_TAG_HEX, hex::encode(self.0))
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl FromStr for PublicKey {
    type Err = CasperHelperError;

    /// Accepts the tagged form (`01` + 64 hex chars) or a bare 64 hex char
    /// ed25519 key.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.to_lowercase();
        if s.len() == PUBLIC_KEY_LENGTH * 2 {
            return parse_hex(&s, "Public key").map(Self);
        }
        parse_tagged_hex(&s, "Public key").map(Self)
    }
}

impl ToBytes for PublicKey {
    fn write_bytes(&self, writer: &mut Vec<u8>) -> Result<(), CasperHelperError> {
        ED25519_TAG.write_bytes(writer)?;
        self.0.write_bytes(writer)
    }
}

impl Serialize for PublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

/// An ed25519 signature over a deploy hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature(pub [u8; 64]);

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", ED25519_TAG_HEX, hex::encode(self.0))
    }
}

impl Serialize for Signature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Signature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex_str = String::deserialize(deserializer)?;
        parse_tagged_hex(&hex_str, "Signature")
            .map(Self)
            .map_err(serde::de::Error::custom)
    }
}

/// A signer's approval of a deploy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Approval {
    pub signer: PublicKey,
    pub signature: Signature,
}

impl Approval {
    /// Checks that `signature` is a valid signature of `hash` by `signer`.
    pub fn verify(&self, hash: &DeployHash) -> Result<(), CasperHelperError> {
        let verifying_key = VerifyingKey::from_bytes(&self.signer.0).map_err(|e| {
            CasperHelperError::Unauthorized(format!("Invalid signer key {}: {}", self.signer, e))
        })?;
        let signature = Ed25519Signature::from_bytes(&self.signature.0);

        verifying_key
            .verify(hash.as_bytes(), &signature)
            .map_err(|_| {
                CasperHelperError::Unauthorized(format!(
                    "Approval by {} does not match deploy {}",
                    self.signer, hash
                ))
            })
    }
}

/// Holds an ed25519 secret key and signs deploy hashes with it.
#[derive(Clone)]
pub struct Signer {
    signing_key: SigningKey,
    public_key: PublicKey,
}

impl Signer {
    pub fn new(signing_key: SigningKey) -> Self {
        let public_key = PublicKey(*signing_key.verifying_key().as_bytes());

        Self {
            signing_key,
            public_key,
        }
    }

    /// Loads a secret key from a file holding either 64 hex characters or a
    /// PEM-wrapped PKCS#8 ed25519 key.
    pub fn from_key_file(path: &str, reader: &dyn FileReader) -> Result<Self, CasperHelperError> {
        let contents = reader.read(path)?;
        let text = String::from_utf8(contents).map_err(|_| {
            CasperHelperError::SigningFailed(format!("Key file {} is not valid UTF-8", path))
        })?;
        Self::from_key_str(text.trim())
    }

    pub fn from_key_str(key: &str) -> Result<Self, CasperHelperError> {
        let secret = if key.starts_with("-----BEGIN") {
            Self::secret_from_pem(key)?
        } else {
            hex::decode(key).map_err(|e| {
                CasperHelperError::SigningFailed(format!("Invalid hex secret key: {}", e))
            })?
        };

        let secret: [u8; 32] = secret.try_into().map_err(|bytes: Vec<u8>| {
            CasperHelperError::SigningFailed(format!(
                "Secret key must be 32 bytes, got {}",
                bytes.len()
            ))
        })?;

        Ok(Self::new(SigningKey::from_bytes(&secret)))
    }

    fn secret_from_pem(pem: &str) -> Result<Vec<u8>, CasperHelperError> {
        let body: String = pem
            .lines()
            .map(str::trim)
            .filter(|line| !line.starts_with("-----"))
            .collect();
        let der = base64::decode(body)
            .map_err(|e| CasperHelperError::SigningFailed(format!("Invalid PEM body: {}", e)))?;

        match der.strip_prefix(&PKCS8_ED25519_PREFIX[..]) {
            Some(secret) => Ok(secret.to_vec()),
            None => Err(CasperHelperError::SigningFailed(
                "PEM key is not a PKCS#8 ed25519 private key".to_string(),
            )),
        }
    }

    pub fn public_key(&self) -> PublicKey {
        self.public_key
    }

    pub fn sign(&self, hash: &DeployHash) -> Approval {
        let signature = self.signing_key.sign(hash.as_bytes());

        Approval {
            signer: self.public_key,
            signature: Signature(signature.to_bytes()),
        }
    }
}
