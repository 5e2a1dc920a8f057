//! # Casper Error Handling
//!
//! This module defines the error type used throughout the Casper helpers library.
//! It provides a unified error handling approach for argument encoding, deploy
//! assembly and signing, and communication with the node.
use std::{error::Error, fmt};

/// Errors that can occur when using the Casper helpers library.
///
/// This enum covers errors from argument encoding, deploy building and signing,
/// file access and network communication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CasperHelperError {
    /// Error when a native value cannot be encoded into a `CLValue`.
    EncodingFailed(String),

    /// Error when a network request to the node fails at the transport level.
    NetworkRequestFailed(String),

    /// Error when the node answers a JSON-RPC request with an error.
    DeployRejected(String),

    /// Error when a deploy lacks a valid approval or the key does not match the sender.
    Unauthorized(String),

    /// Error when a key cannot be loaded or a signing operation fails.
    SigningFailed(String),

    /// Error when an invalid argument is provided to a function.
    InvalidArgument(String),

    /// Error when building a deploy fails.
    DeployBuildFailed(String),

    /// Error when a processed deploy reports an execution failure.
    DeployFailed(String),

    /// Error when a file operation fails.
    FileReadError(String),

    /// Error when a conversion fails.
    ConversionError(String),

    /// Error when waiting for a deploy exceeds the configured timeout.
    Timeout(String),
}

impl fmt::Display for CasperHelperError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EncodingFailed(msg) => write!(f, "Encoding failed: {}", msg),
            Self::NetworkRequestFailed(msg) => write!(f, "Network request failed: {}", msg),
            Self::DeployRejected(msg) => write!(f, "Deploy rejected: {}", msg),
            Self::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            Self::SigningFailed(msg) => write!(f, "Signing operation failed: {}", msg),
            Self::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            Self::DeployBuildFailed(msg) => write!(f, "Deploy build failed: {}", msg),
            Self::DeployFailed(msg) => write!(f, "Deploy failed: {}", msg),
            Self::FileReadError(msg) => write!(f, "File read error: {}", msg),
            Self::ConversionError(msg) => write!(f, "Conversion error: {}", msg),
            Self::Timeout(msg) => write!(f, "Timed out: {}", msg),
        }
    }
}

impl Error for CasperHelperError {}

/// Convert IO errors into CasperHelperError
impl From<std::io::Error> for CasperHelperError {
    fn from(err: std::io::Error) -> Self {
        Self::FileReadError(format!("File operation failed: {}", err))
    }
}

/// Convert JSON errors into CasperHelperError
impl From<serde_json::Error> for CasperHelperError {
    fn from(err: serde_json::Error) -> Self {
        Self::ConversionError(format!("JSON conversion failed: {}", err))
    }
}

/// Convert hex decoding errors into CasperHelperError
impl From<hex::FromHexError> for CasperHelperError {
    fn from(err: hex::FromHexError) -> Self {
        Self::ConversionError(format!("Invalid hex: {}", err))
    }
}
