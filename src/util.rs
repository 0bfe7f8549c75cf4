//! Filesystem convenience wrappers around [`Archive::parse`]/[`Archive::save`].

use std::path::Path;

use crate::cabinet::Archive;
use crate::error::Error;

impl Archive {
    /// Reads and parses a cabinet file from `path`.
    pub fn parse_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let data = std::fs::read(path)
            .map_err(|e| Error::file_open(e, path.to_string_lossy().to_string()))?;
        Self::parse(&data)
    }

    /// Serializes the archive and writes it to `path`.
    pub fn save_file(&self, path: impl AsRef<Path>, compressed: bool) -> Result<(), Error> {
        let path = path.as_ref();
        let data = self.save(compressed)?;
        std::fs::write(path, data)
            .map_err(|e| Error::file_open(e, path.to_string_lossy().to_string()))
    }
}
