use std::fs;

use crate::error::CasperHelperError;

/// Source of key files and session modules.
pub trait FileReader: Send + Sync {
    fn read(&self, path: &str) -> Result<Vec<u8>, CasperHelperError>;
}

/// Reads from the local filesystem.
pub struct DefaultFileReader;

impl FileReader for DefaultFileReader {
    fn read(&self, path: &str) -> Result<Vec<u8>, CasperHelperError> {
        fs::read(path).map_err(|e| CasperHelperError::FileReadError(format!("{}: {}", path, e)))
    }
}
