use std::{borrow::Cow, fmt::Display};

/// The error type of the crate.
#[derive(Debug)]
pub enum Error {
    /// The byte stream violates the MSCAB container format: bad magic,
    /// truncation, a checksum mismatch, an out-of-bounds slice, a missing
    /// NUL terminator, or any other structural inconsistency.
    Corruption(Cow<'static, str>),
    /// The byte stream is well-formed MSCAB but uses a feature this
    /// implementation declines to handle: multi-cabinet continuation, an
    /// unknown compression method, a multi-block MSZIP folder, or a
    /// reserved header field that is non-zero.
    NotSupported(Cow<'static, str>),
    /// IO error with optional context message.
    Io(std::io::Error, Cow<'static, str>),
    /// Error opening a file at the given path.
    FileOpen(std::io::Error, String),
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Self::io(value)
    }
}

impl Error {
    #[inline]
    pub(crate) fn corrupt<S: Into<Cow<'static, str>>>(s: S) -> Self {
        Self::Corruption(s.into())
    }

    #[inline]
    pub(crate) fn unsupported<S: Into<Cow<'static, str>>>(s: S) -> Self {
        Self::NotSupported(s.into())
    }

    #[inline]
    pub(crate) fn io(e: std::io::Error) -> Self {
        Self::io_msg(e, "")
    }

    #[inline]
    pub(crate) fn io_msg(e: std::io::Error, msg: impl Into<Cow<'static, str>>) -> Self {
        Self::Io(e, msg.into())
    }

    #[cfg(feature = "util")]
    #[inline]
    pub(crate) fn file_open(e: std::io::Error, filename: impl Into<Cow<'static, str>>) -> Self {
        Self::FileOpen(e, filename.into().into_owned())
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(&self, f)
    }
}

impl std::error::Error for Error {}
