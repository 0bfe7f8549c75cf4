//! The compression methods a folder may declare, and the MSZIP block
//! framing (the two-byte `CK` signature) layered on top of a plain deflate
//! stream.

use std::io::{Read, Write};

use flate2::{Compression, bufread::DeflateDecoder, write::DeflateEncoder};

use crate::error::Error;

/// Method id 0x0000: stored bytes equal uncompressed bytes.
const METHOD_NONE: u16 = 0x0000;
/// Method id 0x0001: MSZIP, a raw deflate stream per block with a `CK`
/// prefix.
const METHOD_MSZIP: u16 = 0x0001;

const MSZIP_SIGNATURE: [u8; 2] = [0x43, 0x4B];

/// The compression method a folder uses for all of its blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionMethod {
    /// No compression; block payload equals the uncompressed bytes.
    None,
    /// MSZIP: deflate with a `CK` block signature.
    MsZip,
}

impl CompressionMethod {
    pub(crate) fn to_wire(self) -> u16 {
        match self {
            Self::None => METHOD_NONE,
            Self::MsZip => METHOD_MSZIP,
        }
    }

    pub(crate) fn from_wire(v: u16) -> Result<Self, Error> {
        match v {
            METHOD_NONE => Ok(Self::None),
            METHOD_MSZIP => Ok(Self::MsZip),
            other => Err(Error::unsupported(format!(
                "unsupported compression method 0x{other:04X}"
            ))),
        }
    }
}

/// Compresses one block's worth of uncompressed bytes under `method`,
/// returning the bytes to store as the block's payload (including the
/// `CK` prefix for MSZIP).
pub(crate) fn compress_block(method: CompressionMethod, data: &[u8]) -> Result<Vec<u8>, Error> {
    match method {
        CompressionMethod::None => Ok(data.to_vec()),
        CompressionMethod::MsZip => {
            let mut out = Vec::with_capacity(data.len() / 2 + MSZIP_SIGNATURE.len());
            out.extend_from_slice(&MSZIP_SIGNATURE);
            let mut encoder = DeflateEncoder::new(&mut out, Compression::default());
            encoder.write_all(data).map_err(Error::io)?;
            encoder.finish().map_err(Error::io)?;
            Ok(out)
        }
    }
}

/// Decompresses one block's payload under `method`, given the expected
/// uncompressed length from the block header.
pub(crate) fn decompress_block(
    method: CompressionMethod,
    payload: &[u8],
    uncompressed_len: usize,
) -> Result<Vec<u8>, Error> {
    match method {
        CompressionMethod::None => {
            if payload.len() != uncompressed_len {
                return Err(Error::corrupt(format!(
                    "stored block length {} does not match declared uncompressed length {uncompressed_len}",
                    payload.len()
                )));
            }
            Ok(payload.to_vec())
        }
        CompressionMethod::MsZip => {
            if payload.len() < MSZIP_SIGNATURE.len() || payload[..2] != MSZIP_SIGNATURE {
                return Err(Error::corrupt("MSZIP block missing 'CK' signature"));
            }
            let mut out = vec![0u8; uncompressed_len];
            let mut decoder = DeflateDecoder::new(&payload[2..]);
            decoder.read_exact(&mut out).map_err(Error::io)?;
            Ok(out)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_round_trips() {
        let data = b"hello, cabinet world".to_vec();
        let compressed = compress_block(CompressionMethod::None, &data).unwrap();
        assert_eq!(compressed, data);
        let decompressed = decompress_block(CompressionMethod::None, &compressed, data.len()).unwrap();
        assert_eq!(decompressed, data);
    }

    #[test]
    fn mszip_round_trips() {
        let data = b"the quick brown fox jumps over the lazy dog ".repeat(100);
        let compressed = compress_block(CompressionMethod::MsZip, &data).unwrap();
        assert_eq!(&compressed[..2], &MSZIP_SIGNATURE);
        let decompressed = decompress_block(CompressionMethod::MsZip, &compressed, data.len()).unwrap();
        assert_eq!(decompressed, data);
    }

    #[test]
    fn mszip_missing_signature_is_corruption() {
        let bogus = vec![0u8; 10];
        assert!(decompress_block(CompressionMethod::MsZip, &bogus, 10).is_err());
    }

    #[test]
    fn method_ids_round_trip() {
        assert_eq!(CompressionMethod::from_wire(0).unwrap(), CompressionMethod::None);
        assert_eq!(CompressionMethod::from_wire(1).unwrap(), CompressionMethod::MsZip);
        assert!(CompressionMethod::from_wire(2).is_err());
    }
}
