//! The top-level MSCAB codec: header, folder table, file table, and the
//! back-patched offsets that tie them together. `parse` and `emit` are the
//! two public entry points the rest of the crate (and [`crate::Archive`])
//! is built around.

use crate::block::{read_blocks, write_blocks};
use crate::compress::CompressionMethod;
use crate::cursor::{ByteWriter, Cursor};
use crate::error::Error;
use crate::file::{File, read_file_record, write_file_record};

const MAGIC: &[u8; 4] = b"MSCF";
const HEADER_SIZE: usize = 36;
const VERSION_MAJOR: u8 = 1;
const VERSION_MINOR: u8 = 3;

/// A fully parsed archive, before it is handed off to [`crate::Archive`].
pub(crate) struct ParsedArchive {
    pub(crate) set_id: u16,
    pub(crate) files: Vec<File>,
}

struct FolderEntry {
    first_data_offset: u32,
    data_block_count: u16,
    compression_method: u16,
}

/// Parses a complete MSCAB byte stream.
pub(crate) fn parse(data: &[u8]) -> Result<ParsedArchive, Error> {
    let mut cursor = Cursor::new(data);

    if data.len() < HEADER_SIZE {
        return Err(Error::corrupt("truncated MSCAB header"));
    }
    let magic = cursor.read_bytes(4)?;
    if magic != MAGIC {
        return Err(Error::corrupt("bad MSCF signature"));
    }
    let reserved1 = cursor.read_u32_le()?;
    let _cabinet_size = cursor.read_u32_le()?;
    let reserved2 = cursor.read_u32_le()?;
    let files_offset = cursor.read_u32_le()?;
    let reserved3 = cursor.read_u32_le()?;
    let _version_minor = cursor.read_u8()?;
    let _version_major = cursor.read_u8()?;
    let folder_count = cursor.read_u16_le()?;
    let file_count = cursor.read_u16_le()?;
    let flags = cursor.read_u16_le()?;
    let set_id = cursor.read_u16_le()?;
    let _cabinet_index = cursor.read_u16_le()?;

    if reserved1 != 0 || reserved2 != 0 || reserved3 != 0 {
        return Err(Error::unsupported("reserved header field is non-zero"));
    }
    if flags != 0 {
        return Err(Error::unsupported(format!(
            "unsupported cabinet flags 0x{flags:04X}"
        )));
    }

    let mut folders = Vec::with_capacity(folder_count as usize);
    for _ in 0..folder_count {
        let first_data_offset = cursor.read_u32_le()?;
        let data_block_count = cursor.read_u16_le()?;
        let compression_method = cursor.read_u16_le()?;
        folders.push(FolderEntry {
            first_data_offset,
            data_block_count,
            compression_method,
        });
    }

    cursor.seek(files_offset as usize)?;
    let mut files = Vec::with_capacity(file_count as usize);
    let mut sizes = Vec::with_capacity(file_count as usize);
    for _ in 0..file_count {
        let record = read_file_record(&mut cursor)?;
        if record.file.folder_index as usize >= folders.len() {
            return Err(Error::corrupt(format!(
                "file references folder index {} but only {} folders exist",
                record.file.folder_index,
                folders.len()
            )));
        }
        sizes.push(record.uncompressed_size);
        files.push(record.file);
    }

    if folders.len() > 1 && folders.iter().any(|f| f.compression_method != CompressionMethod::None.to_wire()) {
        return Err(Error::unsupported(
            "compressed folders in a multi-folder cabinet are not supported",
        ));
    }

    let mut folder_buffers = Vec::with_capacity(folders.len());
    for folder in &folders {
        let method = CompressionMethod::from_wire(folder.compression_method)?;
        cursor.seek(folder.first_data_offset as usize)?;
        let buf = read_blocks(&mut cursor, method, folder.data_block_count)?;
        folder_buffers.push(buf);
    }

    for (file, &size) in files.iter_mut().zip(sizes.iter()) {
        let buf = &folder_buffers[file.folder_index as usize];
        let start = file.folder_offset as usize;
        let end = start
            .checked_add(size as usize)
            .ok_or_else(|| Error::corrupt("file extent overflows folder buffer"))?;
        if end > buf.len() {
            return Err(Error::corrupt(format!(
                "file '{}' extent [{start}, {end}) is out of bounds of its folder's {} decoded bytes",
                file.filename(),
                buf.len()
            )));
        }
        file.content = buf[start..end].to_vec();
    }

    Ok(ParsedArchive { set_id, files })
}

/// Emits `files` (already laid out into a single folder by the caller) as a
/// complete MSCAB byte stream, compressing with `method` if requested.
pub(crate) fn emit(set_id: u16, files: &[File], method: CompressionMethod) -> Result<Vec<u8>, Error> {
    let mut w = ByteWriter::new();

    w.write_bytes(MAGIC);
    w.write_u32_le(0); // reserved1
    let cabinet_size_slot = w.write_u32_le(0); // cabinet_size, back-patched
    w.write_u32_le(0); // reserved2
    let files_offset_slot = w.write_u32_le(0); // files_offset, back-patched
    w.write_u32_le(0); // reserved3
    w.write_u8(VERSION_MINOR);
    w.write_u8(VERSION_MAJOR);
    let folder_count: u16 = if files.is_empty() { 0 } else { 1 };
    w.write_u16_le(folder_count);
    let file_count = u16::try_from(files.len())
        .map_err(|_| Error::corrupt("too many files for a single cabinet"))?;
    w.write_u16_le(file_count);
    w.write_u16_le(0); // flags
    w.write_u16_le(set_id);
    w.write_u16_le(0); // cabinet_index

    let folder_offset_slot = if folder_count > 0 {
        let slot = w.write_u32_le(0); // first_data_offset, back-patched
        w.write_u16_le(0); // data_block_count, back-patched
        w.write_u16_le(method.to_wire());
        Some(slot)
    } else {
        None
    };

    let files_offset = w.position();
    w.patch_u32_le(files_offset_slot, files_offset as u32);

    let mut folder_offset = 0u32;
    for file in files {
        write_file_record(&mut w, file, 0, folder_offset)?;
        folder_offset = folder_offset
            .checked_add(file.content.len() as u32)
            .ok_or_else(|| Error::corrupt("folder uncompressed size exceeds 32 bits"))?;
    }

    if let Some(slot) = folder_offset_slot {
        let data_offset = w.position();
        let payload: Vec<u8> = files.iter().flat_map(|f| f.content.iter().copied()).collect();
        let block_count = write_blocks(&mut w, method, &payload)?;
        w.patch_u32_le(slot, data_offset as u32);
        w.patch_u16_le(slot + 4, block_count);
    }

    let cabinet_size = w.position();
    w.patch_u32_le(cabinet_size_slot, cabinet_size as u32);

    Ok(w.into_inner())
}
