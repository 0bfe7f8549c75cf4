//! The `File` entity exposed to callers, its attribute bitmap, and the
//! on-disk file record codec (16 fixed bytes followed by a NUL-terminated
//! name).

use crate::cursor::{ByteWriter, Cursor};
use crate::dostime::{Date, Time};
use crate::error::Error;

const ATTR_READ_ONLY: u16 = 0x01;
const ATTR_HIDDEN: u16 = 0x02;
const ATTR_SYSTEM: u16 = 0x04;
const ATTR_ARCHIVED: u16 = 0x20;
const ATTR_EXECUTABLE: u16 = 0x40;
const ATTR_NAME_IS_UTF8: u16 = 0x80;

/// Folder-index sentinels that indicate continuation across cabinets in a
/// multi-cabinet set. This crate only supports single-cabinet archives, so
/// encountering any of them on parse is a [`Error::NotSupported`].
const FOLDER_CONTINUED_FROM_PREV: u16 = 0xFFFD;
const FOLDER_CONTINUED_TO_NEXT: u16 = 0xFFFE;
const FOLDER_CONTINUED_PREV_AND_NEXT: u16 = 0xFFFF;

/// A single file stored in a cabinet.
///
/// Files are created standalone with [`File::new`] and attached to an
/// [`crate::Archive`] with [`crate::Archive::add_file`]; on parse they come
/// back fully materialized, `content` included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
    filename: String,
    /// The file's uncompressed payload.
    pub content: Vec<u8>,
    /// The file's calendar date.
    pub date: Date,
    /// The file's time of day.
    pub time: Time,
    /// `FILE_ATTRIBUTE_READONLY`.
    pub read_only: bool,
    /// `FILE_ATTRIBUTE_HIDDEN`.
    pub hidden: bool,
    /// `FILE_ATTRIBUTE_SYSTEM`.
    pub system: bool,
    /// `FILE_ATTRIBUTE_ARCHIVE`. Defaults to `true` for newly created files.
    pub archived: bool,
    /// Execute bit, as MSCAB (unusually, for a Windows-native format)
    /// chooses to track it.
    pub executable: bool,
    pub(crate) folder_index: u16,
    pub(crate) folder_offset: u32,
}

impl File {
    /// Creates a new file with the given name, content, and timestamp.
    ///
    /// `archived` defaults to `true`, matching the convention that a freshly
    /// created file is "modified since last backup"; the other attribute
    /// bits default to `false`.
    pub fn new(filename: impl Into<String>, content: Vec<u8>, date: Date, time: Time) -> Self {
        Self {
            filename: filename.into(),
            content,
            date,
            time,
            read_only: false,
            hidden: false,
            system: false,
            archived: true,
            executable: false,
            folder_index: 0,
            folder_offset: 0,
        }
    }

    /// Returns the file's name.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Sets the file's name.
    pub fn set_filename(&mut self, filename: impl Into<String>) {
        self.filename = filename.into();
    }

    /// Whether the name must be encoded as UTF-8 rather than 7-bit ASCII:
    /// true whenever any code point is `>= 128`. This is a derived
    /// property of the filename, recomputed on every read rather than
    /// stored, so it can never desynchronize from the name.
    pub fn is_name_utf8(&self) -> bool {
        self.filename.chars().any(|c| c as u32 >= 128)
    }

    fn attributes(&self) -> u16 {
        let mut attr = 0u16;
        if self.read_only {
            attr |= ATTR_READ_ONLY;
        }
        if self.hidden {
            attr |= ATTR_HIDDEN;
        }
        if self.system {
            attr |= ATTR_SYSTEM;
        }
        if self.archived {
            attr |= ATTR_ARCHIVED;
        }
        if self.executable {
            attr |= ATTR_EXECUTABLE;
        }
        if self.is_name_utf8() {
            attr |= ATTR_NAME_IS_UTF8;
        }
        attr
    }

    fn apply_attributes(&mut self, attr: u16) {
        self.read_only = attr & ATTR_READ_ONLY != 0;
        self.hidden = attr & ATTR_HIDDEN != 0;
        self.system = attr & ATTR_SYSTEM != 0;
        self.archived = attr & ATTR_ARCHIVED != 0;
        self.executable = attr & ATTR_EXECUTABLE != 0;
        // ATTR_NAME_IS_UTF8 is not stored; is_name_utf8() is derived.
    }
}

/// A file record decoded from the wire, plus the fixed fields needed to
/// locate its bytes once the owning folder's blocks have been decoded.
pub(crate) struct FileRecord {
    pub(crate) file: File,
    pub(crate) uncompressed_size: u32,
}

/// Decodes one 16-byte-plus-name file record at `cursor`'s current position.
pub(crate) fn read_file_record(cursor: &mut Cursor<'_>) -> Result<FileRecord, Error> {
    let uncompressed_size = cursor.read_u32_le()?;
    let folder_offset = cursor.read_u32_le()?;
    let folder_index = cursor.read_u16_le()?;
    let packed_date = cursor.read_u16_le()?;
    let packed_time = cursor.read_u16_le()?;
    let attributes = cursor.read_u16_le()?;

    match folder_index {
        FOLDER_CONTINUED_FROM_PREV | FOLDER_CONTINUED_TO_NEXT | FOLDER_CONTINUED_PREV_AND_NEXT => {
            return Err(Error::unsupported(
                "file record references a folder continued across cabinets",
            ));
        }
        _ => {}
    }

    let name_bytes = cursor.read_nul_terminated()?;
    if name_bytes.is_empty() {
        return Err(Error::corrupt("file record has an empty filename"));
    }
    let is_utf8 = attributes & ATTR_NAME_IS_UTF8 != 0;
    let filename = if is_utf8 {
        std::str::from_utf8(name_bytes)
            .map_err(|_| Error::corrupt("file name flagged UTF-8 is not valid UTF-8"))?
            .to_string()
    } else {
        if !name_bytes.is_ascii() {
            return Err(Error::corrupt(
                "file name contains non-ASCII bytes without the UTF-8 attribute flag set",
            ));
        }
        String::from_utf8_lossy(name_bytes).into_owned()
    };

    let mut file = File::new(
        filename,
        Vec::new(),
        Date::unpack(packed_date),
        Time::unpack(packed_time),
    );
    file.apply_attributes(attributes);
    file.folder_index = folder_index;
    file.folder_offset = folder_offset;

    Ok(FileRecord {
        file,
        uncompressed_size,
    })
}

/// Encodes `file`'s record (fixed fields plus NUL-terminated name) to
/// `writer`. `folder_index` and `folder_offset` are assigned by the
/// archive codec's layout pass, not read from `file`.
pub(crate) fn write_file_record(
    writer: &mut ByteWriter,
    file: &File,
    folder_index: u16,
    folder_offset: u32,
) -> Result<(), Error> {
    file.date.validate()?;
    let size = u32::try_from(file.content.len())
        .map_err(|_| Error::corrupt("file content exceeds the 32-bit size field"))?;
    writer.write_u32_le(size);
    writer.write_u32_le(folder_offset);
    writer.write_u16_le(folder_index);
    writer.write_u16_le(file.date.pack());
    writer.write_u16_le(file.time.pack());
    writer.write_u16_le(file.attributes());
    if file.filename.is_empty() {
        return Err(Error::corrupt("cannot emit a file with an empty name"));
    }
    writer.write_nul_terminated(file.filename.as_bytes());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_date() -> Date {
        Date {
            year: 1997,
            month: 3,
            day: 12,
        }
    }

    fn sample_time() -> Time {
        Time {
            hour: 11,
            minute: 13,
            second: 52,
        }
    }

    #[test]
    fn attribute_bitmap_round_trips_all_six_bits() {
        let mut f = File::new("test.txt", vec![], sample_date(), sample_time());
        f.read_only = true;
        f.hidden = true;
        f.system = true;
        f.archived = false;
        f.executable = true;
        let attr = f.attributes();

        let mut f2 = File::new("test.txt", vec![], sample_date(), sample_time());
        f2.apply_attributes(attr);
        assert_eq!(f2.read_only, f.read_only);
        assert_eq!(f2.hidden, f.hidden);
        assert_eq!(f2.system, f.system);
        assert_eq!(f2.archived, f.archived);
        assert_eq!(f2.executable, f.executable);
        assert_eq!(f2.is_name_utf8(), f.is_name_utf8());
    }

    #[test]
    fn utf8_name_sets_flag() {
        let f = File::new("tést.dat", vec![], sample_date(), sample_time());
        assert!(f.is_name_utf8());
        assert_eq!(f.attributes() & ATTR_NAME_IS_UTF8, ATTR_NAME_IS_UTF8);
    }

    #[test]
    fn ascii_name_clears_flag() {
        let f = File::new("test.txt", vec![], sample_date(), sample_time());
        assert!(!f.is_name_utf8());
        assert_eq!(f.attributes() & ATTR_NAME_IS_UTF8, 0);
    }

    #[test]
    fn new_file_defaults_archived_true() {
        let f = File::new("x", vec![], sample_date(), sample_time());
        assert!(f.archived);
        assert!(!f.read_only && !f.hidden && !f.system && !f.executable);
    }

    #[test]
    fn out_of_domain_year_is_rejected_not_panicked_on() {
        let f = File::new(
            "x",
            vec![],
            Date {
                year: 1970,
                month: 1,
                day: 1,
            },
            sample_time(),
        );
        let mut w = ByteWriter::new();
        match write_file_record(&mut w, &f, 0, 0) {
            Err(Error::Corruption(_)) => {}
            other => panic!("expected Corruption, got {other:?}"),
        }
    }

    #[test]
    fn record_round_trips() {
        let f = File::new("hello.c", b"body".to_vec(), sample_date(), sample_time());
        let mut w = ByteWriter::new();
        write_file_record(&mut w, &f, 0, 0).unwrap();
        let buf = w.into_inner();
        let mut c = Cursor::new(&buf);
        let record = read_file_record(&mut c).unwrap();
        assert_eq!(record.file.filename(), "hello.c");
        assert_eq!(record.uncompressed_size, 4);
        assert_eq!(record.file.date, sample_date());
        assert_eq!(record.file.time, sample_time());
    }

    #[test]
    fn sentinel_folder_index_is_not_supported() {
        let mut w = ByteWriter::new();
        w.write_u32_le(0);
        w.write_u32_le(0);
        w.write_u16_le(0xFFFF);
        w.write_u16_le(0);
        w.write_u16_le(0);
        w.write_u16_le(0);
        w.write_nul_terminated(b"x");
        let buf = w.into_inner();
        let mut c = Cursor::new(&buf);
        match read_file_record(&mut c) {
            Err(Error::NotSupported(_)) => {}
            other => panic!("expected NotSupported, got {other:?}"),
        }
    }

    #[test]
    fn empty_filename_is_corruption() {
        let mut w = ByteWriter::new();
        w.write_u32_le(0);
        w.write_u32_le(0);
        w.write_u16_le(0);
        w.write_u16_le(0);
        w.write_u16_le(0);
        w.write_u16_le(0);
        w.write_nul_terminated(b"");
        let buf = w.into_inner();
        let mut c = Cursor::new(&buf);
        assert!(read_file_record(&mut c).is_err());
    }
}
