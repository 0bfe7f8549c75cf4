//! The block engine: slices a folder's uncompressed payload into blocks of
//! at most 32 KiB, computes and verifies each block's checksum, and drives
//! the compression adapter across block boundaries.

use crate::checksum::checksum;
use crate::compress::{CompressionMethod, compress_block, decompress_block};
use crate::cursor::{ByteWriter, Cursor};
use crate::error::Error;

/// A block's uncompressed payload never exceeds 32 KiB.
pub(crate) const MAX_BLOCK_UNCOMPRESSED: usize = 0x8000;

/// Computes the checksum seed for a block header of the given
/// `(compressed_len, uncompressed_len)`, as laid out on disk but with the
/// checksum field itself zeroed: `{u16 compressed_len, u16
/// uncompressed_len, u32 0}`.
fn header_seed(compressed_len: u16, uncompressed_len: u16) -> u32 {
    let mut header = [0u8; 8];
    header[0..2].copy_from_slice(&compressed_len.to_le_bytes());
    header[2..4].copy_from_slice(&uncompressed_len.to_le_bytes());
    checksum(0, &header)
}

/// Reads `block_count` consecutive blocks starting at `cursor`'s current
/// position, verifying each checksum and decompressing as needed, and
/// returns the concatenated uncompressed bytes of the folder.
pub(crate) fn read_blocks(
    cursor: &mut Cursor<'_>,
    method: CompressionMethod,
    block_count: u16,
) -> Result<Vec<u8>, Error> {
    if method == CompressionMethod::MsZip && block_count > 1 {
        return Err(Error::unsupported("multi-block MSZIP folder"));
    }

    let mut out = Vec::new();
    for _ in 0..block_count {
        let stored_checksum = cursor.read_u32_le()?;
        let compressed_len = cursor.read_u16_le()?;
        let uncompressed_len = cursor.read_u16_le()?;
        if uncompressed_len as usize > MAX_BLOCK_UNCOMPRESSED {
            return Err(Error::corrupt(format!(
                "block declares uncompressed length {uncompressed_len}, exceeding the 32 KiB limit"
            )));
        }
        let payload = cursor.read_bytes(compressed_len as usize)?;

        let computed = checksum(header_seed(compressed_len, uncompressed_len), payload);
        if computed != stored_checksum {
            return Err(Error::corrupt(format!(
                "block checksum mismatch: stored 0x{stored_checksum:08X}, computed 0x{computed:08X}"
            )));
        }

        out.extend_from_slice(&decompress_block(method, payload, uncompressed_len as usize)?);
    }
    Ok(out)
}

/// Partitions `data` (a folder's full uncompressed payload) into blocks of
/// exactly [`MAX_BLOCK_UNCOMPRESSED`] bytes, except possibly the last, and
/// appends each compressed, checksummed block to `writer`. Returns the
/// number of blocks written.
pub(crate) fn write_blocks(
    writer: &mut ByteWriter,
    method: CompressionMethod,
    data: &[u8],
) -> Result<u16, Error> {
    if data.is_empty() {
        return Ok(0);
    }
    let mut count = 0u16;
    for chunk in data.chunks(MAX_BLOCK_UNCOMPRESSED) {
        let compressed = compress_block(method, chunk)?;
        let compressed_len = u16::try_from(compressed.len()).map_err(|_| {
            Error::corrupt("compressed block length exceeds 16 bits")
        })?;
        let uncompressed_len = u16::try_from(chunk.len()).map_err(|_| {
            Error::corrupt("uncompressed block length exceeds 32 KiB")
        })?;

        let stored_checksum = checksum(header_seed(compressed_len, uncompressed_len), &compressed);
        writer.write_u32_le(stored_checksum);
        writer.write_u16_le(compressed_len);
        writer.write_u16_le(uncompressed_len);
        writer.write_bytes(&compressed);

        count = count
            .checked_add(1)
            .ok_or_else(|| Error::corrupt("folder has too many blocks"))?;
    }
    Ok(count)
}
