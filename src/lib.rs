//! # zipindex
//!
//! A read-only ZIP archive index and raw entry extractor.
//!
//! Opening an archive locates its End of Central Directory record, walks
//! the Central Directory once and keeps a map from entry name to Local File
//! Header offset. Looking an entry up reads its header and returns the raw
//! payload with the metadata needed to decode it. Decompression is left to
//! the caller.
//!
//! ## Features
//!
//! - Index archives from a file path, an in-memory buffer, or any
//!   [`ByteSource`] (`Read + Seek`)
//! - Archives with trailing comments of any length
//! - Compression methods identified (Stored, Deflate, Deflate64, BZip2,
//!   LZMA, WavPack, PPMd); unknown codes are reported, not rejected
//! - Encrypted entries and ZIP64 archives are detected and refused
//!
//! ## Example
//!
//! ```no_run
//! use zipindex::ZipIndex;
//!
//! let bytes = std::fs::read("archive.zip")?;
//! let mut index = ZipIndex::from_bytes(bytes)?;
//!
//! let names: Vec<String> = index.names()?.into_iter().map(str::to_owned).collect();
//! for name in names {
//!     let entry = index.by_name(&name)?;
//!     println!(
//!         "{name}: {:?}, {} -> {} bytes",
//!         entry.compression_method, entry.compressed_size, entry.uncompressed_size
//!     );
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
mod error;
pub mod io;
pub mod zip;

pub use config::{IndexOptions, NameEncoding};
pub use error::{Error, ErrorKind, Result};
pub use io::{ByteSource, LocalFileSource, MemorySource};
pub use self::zip::{CompressionMethod, Entry, ZipIndex};
