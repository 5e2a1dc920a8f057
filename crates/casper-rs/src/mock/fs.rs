use crate::error::CasperHelperError;
use crate::fs::FileReader;
use std::collections::HashMap;

/// In-memory file system keyed by path. Unknown paths read as missing files.
#[derive(Default)]
pub struct MockFileReader {
    files: HashMap<String, Result<Vec<u8>, CasperHelperError>>,
}

impl MockFileReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(
        mut self,
        path: impl Into<String>,
        contents: Result<Vec<u8>, CasperHelperError>,
    ) -> Self {
        self.files.insert(path.into(), contents);
        self
    }
}

impl FileReader for MockFileReader {
    fn read(&self, path: &str) -> Result<Vec<u8>, CasperHelperError> {
        match self.files.get(path) {
            Some(contents) => contents.clone(),
            None => Err(CasperHelperError::FileReadError(format!(
                "{}: No such file or directory",
                path
            ))),
        }
    }
}
