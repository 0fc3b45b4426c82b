//! Low-level ZIP archive parser.
//!
//! This module handles the binary parsing of ZIP file structures,
//! reading from any source that implements the [`ByteSource`] trait.
//!
//! ## Parsing Strategy
//!
//! ZIP files are designed to be read from the end:
//! 1. Scan backwards for the End of Central Directory (EOCD) signature
//! 2. Walk the Central Directory to map every file name to its Local File Header
//! 3. On lookup, read that entry's Local File Header and raw payload
//!
//! Every function here repositions the source's cursor and leaves it
//! wherever the last read ended.

use byteorder::{LittleEndian, ReadBytesExt};
use std::io::{Read, SeekFrom};
use tracing::{debug, trace, warn};

use crate::config::{IndexOptions, NameEncoding};
use crate::io::ByteSource;
use crate::{Error, Result};

use super::structures::*;

/// Find the End of Central Directory record.
///
/// Steps backwards one byte at a time from the last position a complete
/// record fits, returning the first (closest to EOF) offset holding the
/// EOCD signature. The trailing archive comment can be any length, so the
/// record has no fixed position.
///
/// A comment that itself contains the signature bytes nearer to EOF than
/// the real record will be picked instead of it.
///
/// # Errors
///
/// Returns [`Error::EocdNotFound`] if the source is shorter than an EOCD
/// record or no signature exists in the searchable region.
pub fn find_eocd<R: ByteSource>(
    source: &mut R,
    size: u64,
    search_limit: Option<u64>,
) -> Result<u64> {
    let step = 4;
    let Some(mut pos) = size.checked_sub(EndOfCentralDirectory::SIZE as u64) else {
        return Err(Error::EocdNotFound);
    };
    let floor = search_limit.map_or(0, |limit| size.saturating_sub(limit));
    if pos < floor {
        return Err(Error::EocdNotFound);
    }

    source.seek(SeekFrom::Start(pos))?;
    loop {
        let signature = source.read_u32::<LittleEndian>()?;
        if signature == EndOfCentralDirectory::SIGNATURE {
            debug!("Found end of central directory @{pos:#x}");
            return Ok(pos);
        }
        if pos <= floor {
            break;
        }
        pos = source.seek(SeekFrom::Current(-(step + 1)))?;
    }

    Err(Error::EocdNotFound)
}

/// Read the End of Central Directory record found by [`find_eocd`].
///
/// # Errors
///
/// Returns [`Error::Zip64Unsupported`] if the record defers to ZIP64
/// structures.
pub fn read_eocd<R: ByteSource>(source: &mut R, eocd_offset: u64) -> Result<EndOfCentralDirectory> {
    let mut buf = [0u8; EndOfCentralDirectory::SIZE];
    source.seek(SeekFrom::Start(eocd_offset))?;
    source.read_exact(&mut buf)?;

    let eocd = EndOfCentralDirectory::from_bytes(&buf)?;
    debug!(
        "EOCD: {} entries, directory {} bytes @{:#x}",
        eocd.total_entries, eocd.cd_size, eocd.cd_offset
    );
    if eocd.is_zip64() {
        return Err(Error::Zip64Unsupported);
    }
    Ok(eocd)
}

/// Read the archive comment that follows the EOCD record.
///
/// A comment cut short by the end of the source is returned as far as it
/// goes.
pub fn read_comment<R: ByteSource>(
    source: &mut R,
    eocd_offset: u64,
    eocd: &EndOfCentralDirectory,
) -> Result<Vec<u8>> {
    let mut comment = Vec::new();
    if eocd.comment_len == 0 {
        return Ok(comment);
    }

    source.seek(SeekFrom::Start(
        eocd_offset + EndOfCentralDirectory::SIZE as u64,
    ))?;
    source
        .by_ref()
        .take(u64::from(eocd.comment_len))
        .read_to_end(&mut comment)?;
    if comment.len() != usize::from(eocd.comment_len) {
        warn!(
            "Zip comment is truncated: {} of {} bytes",
            comment.len(),
            eocd.comment_len
        );
    }
    Ok(comment)
}

/// Walk the Central Directory and collect `(name, local header offset)`
/// pairs in directory order.
///
/// Directory placeholders (names ending in `/` or `\`) are skipped.
///
/// # Errors
///
/// Any record with a bad signature means the walk has lost its footing,
/// so the whole walk fails with [`Error::InvalidSignature`]. A directory
/// that ends before the declared record count fails with
/// [`Error::Truncated`].
pub fn walk_central_directory<R: ByteSource>(
    source: &mut R,
    eocd: &EndOfCentralDirectory,
    options: &IndexOptions,
) -> Result<Vec<(String, u32)>> {
    let mut entries = Vec::with_capacity(usize::from(eocd.total_entries));
    let mut pos = u64::from(eocd.cd_offset);

    for _ in 0..eocd.total_entries {
        source.seek(SeekFrom::Start(pos))?;

        let signature = source.read_u32::<LittleEndian>()?;
        if signature != CentralDirectoryHeader::SIGNATURE {
            return Err(Error::InvalidSignature {
                record: "central directory file header",
                offset: pos,
                expected: CentralDirectoryHeader::SIGNATURE,
                actual: signature,
            });
        }

        let mut buf = [0u8; CentralDirectoryHeader::SIZE];
        source.read_exact(&mut buf[4..])?;
        let header = CentralDirectoryHeader::from_bytes(&buf)?;

        let mut name_bytes = vec![0u8; usize::from(header.file_name_length)];
        source.read_exact(&mut name_bytes)?;
        let name = decode_name(name_bytes, options.name_encoding, pos)?;
        trace!("{name} @{:#x}: {:#x?}", pos, header);

        if is_directory(&name) {
            trace!("Skipping directory entry {name}");
        } else {
            entries.push((name, header.lfh_offset));
        }

        pos = source.seek(SeekFrom::Current(header.trailing_len()))?;
    }

    Ok(entries)
}

/// Read the Local File Header at `offset` and the raw payload after it.
///
/// Stored entries yield `uncompressed_size` bytes, all other methods
/// `compressed_size` bytes, still encoded. Sizes are taken from the local
/// header as written; entries that defer them to a data descriptor are
/// read with whatever the header declares.
///
/// # Errors
///
/// - [`Error::InvalidSignature`] if no Local File Header starts at `offset`
/// - [`Error::Encrypted`] if the entry's encryption flag is set
/// - [`Error::EntryTooLarge`] if the payload exceeds `options.max_entry_size`
/// - [`Error::Truncated`] if the payload runs past the end of the source
pub fn read_local_entry<R: ByteSource>(
    source: &mut R,
    offset: u32,
    name: &str,
    options: &IndexOptions,
) -> Result<Entry> {
    let start = u64::from(offset);
    source.seek(SeekFrom::Start(start))?;

    let signature = source.read_u32::<LittleEndian>()?;
    if signature != LocalFileHeader::SIGNATURE {
        return Err(Error::InvalidSignature {
            record: "local file header",
            offset: start,
            expected: LocalFileHeader::SIGNATURE,
            actual: signature,
        });
    }

    let version_needed = source.read_u16::<LittleEndian>()?;
    let flags = source.read_u16::<LittleEndian>()?;
    let compression_method = CompressionMethod::from_u16(source.read_u16::<LittleEndian>()?);

    source.seek(SeekFrom::Start(start + LocalFileHeader::COMPRESSED_SIZE_OFFSET))?;
    let header = LocalFileHeader {
        version_needed,
        flags,
        compression_method,
        compressed_size: source.read_u32::<LittleEndian>()?,
        uncompressed_size: source.read_u32::<LittleEndian>()?,
        file_name_length: source.read_u16::<LittleEndian>()?,
        extra_field_length: source.read_u16::<LittleEndian>()?,
    };
    if header.is_encrypted() {
        return Err(Error::Encrypted(name.to_string()));
    }
    debug!("{name}: {:#x?}", header);

    if header.has_data_descriptor() {
        warn!("{name}: sizes are deferred to a data descriptor, using local header values");
    }

    let len = header.payload_len();
    if let Some(limit) = options.max_entry_size {
        if len > limit {
            return Err(Error::EntryTooLarge {
                name: name.to_string(),
                size: len,
                limit,
            });
        }
    }

    source.seek(SeekFrom::Current(header.variable_len()))?;
    // Grow with the bytes actually present rather than trusting the header.
    let mut data = Vec::new();
    source.by_ref().take(u64::from(len)).read_to_end(&mut data)?;
    if data.len() != len as usize {
        return Err(Error::Truncated);
    }

    Ok(Entry {
        compression_method: header.compression_method,
        compressed_size: header.compressed_size,
        uncompressed_size: header.uncompressed_size,
        data,
    })
}

fn decode_name(bytes: Vec<u8>, encoding: NameEncoding, offset: u64) -> Result<String> {
    match encoding {
        NameEncoding::Lossy => Ok(String::from_utf8_lossy(&bytes).into_owned()),
        NameEncoding::Strict => String::from_utf8(bytes).map_err(|_| Error::InvalidName { offset }),
    }
}

fn is_directory(name: &str) -> bool {
    name.ends_with('/') || name.ends_with('\\')
}
