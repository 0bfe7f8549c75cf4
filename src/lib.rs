//! A library for reading and writing Microsoft Cabinet (MSCAB) archives.
//!
//! Parses a byte stream conforming to the MSCAB container format into an
//! [`Archive`] of [`File`]s (name, timestamp, attributes, payload), and
//! emits an [`Archive`] back to conformant bytes, round-tripping
//! bit-exactly when the archive uses a layout this crate supports: a
//! single cabinet segment, per-folder compression method "None" or
//! "MSZIP", and single-block MSZIP folders.
//!
//! ## Supported compression methods
//!
//! | Method | Decompression             | Compression               |
//! |--------|----------------------------|----------------------------|
//! | None   | ✓                          | ✓                          |
//! | MSZIP  | ✓ (single-block folders)   | ✓ (single-block folders)   |
//!
//! Multi-cabinet continuation, reserved header fields, and any compression
//! method other than the two above are surfaced as [`Error::NotSupported`].
#![warn(missing_docs)]

mod archive;
mod block;
mod cabinet;
mod checksum;
mod compress;
mod cursor;
pub mod dostime;
mod error;
mod file;
#[cfg(all(feature = "util", not(target_arch = "wasm32")))]
mod util;
mod wildcard;

pub use cabinet::Archive;
pub use compress::CompressionMethod;
pub use error::Error;
pub use file::File;
