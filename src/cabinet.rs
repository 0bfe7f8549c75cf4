//! The public `Archive` object: an ordered collection of [`File`]s plus the
//! operations callers actually interact with (`add_file`, `find_file`,
//! `parse`, `save`).

use crate::archive::{emit, parse};
use crate::compress::CompressionMethod;
use crate::error::Error;
use crate::file::File;
use crate::wildcard::matches_wildcard;

/// An in-memory MSCAB archive: a caller-assigned `set_id` and an
/// insertion-ordered list of [`File`]s.
///
/// Mutation (`add_file`, editing a returned `File`) is allowed at any time
/// before emission; `save` does not consume the archive, so it can be
/// called repeatedly, or after further edits.
#[derive(Debug, Clone, Default)]
pub struct Archive {
    /// A caller-assigned 16-bit identifier grouping cabinets that belong
    /// to the same logical set. Irrelevant for single-cabinet archives
    /// beyond round-tripping it.
    pub set_id: u16,
    files: Vec<File>,
}

impl Archive {
    /// Creates a new, empty archive.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `file` to the archive's file list.
    pub fn add_file(&mut self, file: File) {
        self.files.push(file);
    }

    /// Returns the archive's files, in insertion/file-table order.
    pub fn files(&self) -> &[File] {
        &self.files
    }

    /// Returns the archive's files, mutably.
    pub fn files_mut(&mut self) -> &mut [File] {
        &mut self.files
    }

    /// Returns the first file whose name matches the shell-style wildcard
    /// `pattern` (`*` and `?` only, case-sensitive), or `None` if no file
    /// matches.
    pub fn find_file(&self, pattern: &str) -> Option<&File> {
        self.files.iter().find(|f| matches_wildcard(pattern, f.filename()))
    }

    /// Parses a complete MSCAB byte stream into an archive.
    pub fn parse(data: &[u8]) -> Result<Self, Error> {
        let parsed = parse(data)?;
        Ok(Self {
            set_id: parsed.set_id,
            files: parsed.files,
        })
    }

    /// Serializes the archive to a complete MSCAB byte stream.
    ///
    /// All files are assigned to a single folder (this crate's emission
    /// policy never splits files across folders); `compressed` selects
    /// MSZIP for that folder's blocks, otherwise the stored ("None")
    /// method is used.
    pub fn save(&self, compressed: bool) -> Result<Vec<u8>, Error> {
        let method = if compressed {
            CompressionMethod::MsZip
        } else {
            CompressionMethod::None
        };
        emit(self.set_id, &self.files, method)
    }
}
