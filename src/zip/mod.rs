//! ZIP archive indexing and raw entry extraction.
//!
//! ## Architecture
//!
//! The module is organized into three main components:
//!
//! - [`structures`]: Data structures representing ZIP format elements (EOCD, file headers, etc.)
//! - [`parser`]: Low-level parsing of ZIP structures from a [`ByteSource`](crate::io::ByteSource)
//! - `archive`: [`ZipIndex`], the name-indexed view callers use
//!
//! ## ZIP Format Overview
//!
//! A ZIP file consists of:
//! 1. Local file headers and compressed data for each file
//! 2. Central Directory with metadata for all files
//! 3. End of Central Directory (EOCD) record at the end, followed by an
//!    optional comment
//!
//! ## Limitations
//!
//! - No decompression: payloads are returned as stored in the archive
//! - No encryption support (encrypted entries are rejected per lookup)
//! - No ZIP64 (rejected when the archive is opened)
//! - Sizes deferred to a data descriptor are not resolved

mod archive;
pub mod parser;
pub mod structures;

pub use archive::ZipIndex;
pub use structures::{CompressionMethod, Entry};
