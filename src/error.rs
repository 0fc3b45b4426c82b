//! Error types for the index.

use thiserror::Error;

/// Errors that can occur while indexing or reading a ZIP archive.
#[derive(Debug, Error)]
pub enum Error {
    /// Underlying I/O failure.
    #[error("I/O error: {0}")]
    Io(#[source] std::io::Error),

    /// The source ended before a declared structure or payload.
    #[error("archive is truncated")]
    Truncated,

    /// No end of central directory signature was found.
    #[error("corrupted archive: end of central directory not found")]
    EocdNotFound,

    /// A record signature did not match the expected magic.
    #[error(
        "corrupted archive: invalid {record} signature at {offset:#x}: expected {expected:#010x}, got {actual:#010x}"
    )]
    InvalidSignature {
        record: &'static str,
        offset: u64,
        expected: u32,
        actual: u32,
    },

    /// The end of central directory points at ZIP64 records.
    #[error("ZIP64 archives are not supported")]
    Zip64Unsupported,

    /// An entry name is not valid UTF-8 and strict decoding is enabled.
    #[error("corrupted archive: entry name at {offset:#x} is not valid UTF-8")]
    InvalidName { offset: u64 },

    /// The entry is encrypted.
    #[error("encrypted entries are not supported: {0}")]
    Encrypted(String),

    /// The entry payload is larger than the configured limit.
    #[error("entry {name} is {size} bytes, limit is {limit}")]
    EntryTooLarge { name: String, size: u32, limit: u32 },

    /// No entry with this name exists in the archive.
    #[error("there is no {0} file in the archive")]
    NotFound(String),

    /// The index has been closed.
    #[error("archive index has been released")]
    Released,
}

/// Broad failure classes, one per recovery policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed input; the operation in progress is aborted.
    Corrupt,
    /// A feature this reader does not handle.
    Unsupported,
    /// The requested name is absent.
    NotFound,
    /// The index was used after release.
    Released,
    /// The byte source itself failed.
    Io,
}

impl Error {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Truncated
            | Error::EocdNotFound
            | Error::InvalidSignature { .. }
            | Error::InvalidName { .. } => ErrorKind::Corrupt,
            Error::Zip64Unsupported | Error::Encrypted(_) | Error::EntryTooLarge { .. } => {
                ErrorKind::Unsupported
            }
            Error::NotFound(_) => ErrorKind::NotFound,
            Error::Released => ErrorKind::Released,
            Error::Io(_) => ErrorKind::Io,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        // Every read is sized from a declared field, so running dry means
        // the archive lies about its own layout.
        if err.kind() == std::io::ErrorKind::UnexpectedEof {
            Error::Truncated
        } else {
            Error::Io(err)
        }
    }
}

/// Result type for index operations.
pub type Result<T> = std::result::Result<T, Error>;
