//! Oracle proof packet relayed to the bridge contract.
//!
//! Packets use the Oracle Binary Interface: big-endian integers, and strings
//! and byte vectors prefixed with their length as a big-endian `u32`. Fields
//! are written in declaration order with no padding.
use casper_rs::CasperHelperError;
use obi::{OBIDecode, OBIEncode};
use sha3::{Digest, Keccak256};

#[derive(Debug, Clone, PartialEq, Eq, OBIDecode, OBIEncode)]
pub struct OracleRequest {
    pub client_id: String,
    pub oracle_script_id: u64,
    pub calldata: Vec<u8>,
    pub ans_count: u64,
    pub min_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, OBIDecode, OBIEncode)]
pub struct OracleResponse {
    pub client_id: String,
    pub request_id: u64,
    pub ans_count: u64,
    pub request_time: u64,
    pub resolve_time: u64,
    pub resolve_status: u8,
    pub result: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, OBIDecode, OBIEncode)]
pub struct OraclePacket {
    pub req: OracleRequest,
    pub res: OracleResponse,
}

fn encoding_failed(e: impl std::fmt::Display) -> CasperHelperError {
    CasperHelperError::EncodingFailed(format!("OBI encoding failed: {}", e))
}

impl OracleRequest {
    pub fn obi_bytes(&self) -> Result<Vec<u8>, CasperHelperError> {
        self.try_to_vec().map_err(encoding_failed)
    }

    /// Keccak-256 of the OBI-encoded request.
    pub fn hash(&self) -> Result<[u8; 32], CasperHelperError> {
        Ok(Keccak256::digest(self.obi_bytes()?).into())
    }

    /// Named key under which the bridge contract stores a verified proof.
    pub fn storage_key(&self) -> Result<String, CasperHelperError> {
        Ok(hex::encode(self.hash()?))
    }
}

impl OraclePacket {
    pub fn encode(&self) -> Result<Vec<u8>, CasperHelperError> {
        self.try_to_vec().map_err(encoding_failed)
    }

    /// Decodes a whole packet; truncated input and trailing bytes are errors.
    pub fn decode(data: &[u8]) -> Result<Self, CasperHelperError> {
        let packet = Self::try_from_slice(data).map_err(|e| {
            CasperHelperError::ConversionError(format!("Invalid OBI packet: {}", e))
        })?;

        let consumed = packet.encode()?.len();
        if consumed != data.len() {
            return Err(CasperHelperError::ConversionError(format!(
                "OBI input has {} trailing bytes",
                data.len().saturating_sub(consumed)
            )));
        }
        Ok(packet)
    }

    pub fn from_hex(hex_str: &str) -> Result<Self, CasperHelperError> {
        Self::decode(&hex::decode(hex_str.trim())?)
    }
}
