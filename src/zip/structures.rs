use byteorder::{LittleEndian, ReadBytesExt};
use std::io::Cursor;

use crate::{Error, Result};

/// ZIP compression methods
///
/// Only identifies the method; payloads are handed out still encoded.
/// Codes outside the registry below land in [`CompressionMethod::Unsupported`]
/// with the raw code kept, so the caller decides whether to reject them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompressionMethod {
    Stored,
    Deflate,
    Deflate64,
    BZip2,
    Lzma,
    WavPack,
    PPMd,
    Unsupported(u16),
}

impl CompressionMethod {
    pub fn from_u16(value: u16) -> Self {
        match value {
            0 => CompressionMethod::Stored,
            8 => CompressionMethod::Deflate,
            9 => CompressionMethod::Deflate64,
            12 => CompressionMethod::BZip2,
            14 => CompressionMethod::Lzma,
            97 => CompressionMethod::WavPack,
            98 => CompressionMethod::PPMd,
            _ => CompressionMethod::Unsupported(value),
        }
    }

    pub fn code(&self) -> u16 {
        match self {
            CompressionMethod::Stored => 0,
            CompressionMethod::Deflate => 8,
            CompressionMethod::Deflate64 => 9,
            CompressionMethod::BZip2 => 12,
            CompressionMethod::Lzma => 14,
            CompressionMethod::WavPack => 97,
            CompressionMethod::PPMd => 98,
            CompressionMethod::Unsupported(v) => *v,
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, CompressionMethod::Unsupported(_))
    }
}

/// General purpose flag: entry is encrypted.
pub const FLAG_ENCRYPTED: u16 = 1 << 0;
/// General purpose flag: sizes follow the data in a data descriptor.
pub const FLAG_DATA_DESCRIPTOR: u16 = 1 << 3;

/// End of Central Directory (EOCD) - 22 bytes minimum
#[derive(Debug, Clone)]
pub struct EndOfCentralDirectory {
    pub disk_number: u16,
    pub disk_with_cd: u16,
    pub disk_entries: u16,
    pub total_entries: u16,
    pub cd_size: u32,
    pub cd_offset: u32,
    pub comment_len: u16,
}

impl EndOfCentralDirectory {
    pub const SIGNATURE: u32 = 0x06054b50;
    pub const SIZE: usize = 22;

    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < Self::SIZE {
            return Err(Error::Truncated);
        }

        let mut cursor = Cursor::new(data);
        let signature = cursor.read_u32::<LittleEndian>()?;
        if signature != Self::SIGNATURE {
            return Err(Error::EocdNotFound);
        }

        Ok(Self {
            disk_number: cursor.read_u16::<LittleEndian>()?,
            disk_with_cd: cursor.read_u16::<LittleEndian>()?,
            disk_entries: cursor.read_u16::<LittleEndian>()?,
            total_entries: cursor.read_u16::<LittleEndian>()?,
            cd_size: cursor.read_u32::<LittleEndian>()?,
            cd_offset: cursor.read_u32::<LittleEndian>()?,
            comment_len: cursor.read_u16::<LittleEndian>()?,
        })
    }

    pub fn is_zip64(&self) -> bool {
        self.disk_entries == 0xFFFF
            || self.total_entries == 0xFFFF
            || self.cd_size == 0xFFFFFFFF
            || self.cd_offset == 0xFFFFFFFF
    }
}

/// Central Directory File Header (CDFH) - 46 bytes before the variable fields
#[derive(Debug, Clone)]
pub struct CentralDirectoryHeader {
    pub version_made_by: u16,
    pub version_needed: u16,
    pub flags: u16,
    pub compression_method: u16,
    pub last_mod_time: u16,
    pub last_mod_date: u16,
    pub crc32: u32,
    pub compressed_size: u32,
    pub uncompressed_size: u32,
    pub file_name_length: u16,
    pub extra_field_length: u16,
    pub file_comment_length: u16,
    pub lfh_offset: u32,
}

impl CentralDirectoryHeader {
    pub const SIGNATURE: u32 = 0x02014b50;
    pub const SIZE: usize = 46;
    pub const FILE_NAME_LENGTH_OFFSET: usize = 28;
    pub const LFH_OFFSET_OFFSET: usize = 42;

    /// Parse the fixed part of a record, signature included.
    ///
    /// The caller has already checked the signature.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < Self::SIZE {
            return Err(Error::Truncated);
        }

        let mut cursor = Cursor::new(&data[4..]);
        let version_made_by = cursor.read_u16::<LittleEndian>()?;
        let version_needed = cursor.read_u16::<LittleEndian>()?;
        let flags = cursor.read_u16::<LittleEndian>()?;
        let compression_method = cursor.read_u16::<LittleEndian>()?;
        let last_mod_time = cursor.read_u16::<LittleEndian>()?;
        let last_mod_date = cursor.read_u16::<LittleEndian>()?;
        let crc32 = cursor.read_u32::<LittleEndian>()?;
        let compressed_size = cursor.read_u32::<LittleEndian>()?;
        let uncompressed_size = cursor.read_u32::<LittleEndian>()?;

        cursor.set_position((Self::FILE_NAME_LENGTH_OFFSET - 4) as u64);
        let file_name_length = cursor.read_u16::<LittleEndian>()?;
        let extra_field_length = cursor.read_u16::<LittleEndian>()?;
        let file_comment_length = cursor.read_u16::<LittleEndian>()?;

        // Skip disk number start and internal/external attributes
        cursor.set_position((Self::LFH_OFFSET_OFFSET - 4) as u64);
        let lfh_offset = cursor.read_u32::<LittleEndian>()?;

        Ok(Self {
            version_made_by,
            version_needed,
            flags,
            compression_method,
            last_mod_time,
            last_mod_date,
            crc32,
            compressed_size,
            uncompressed_size,
            file_name_length,
            extra_field_length,
            file_comment_length,
            lfh_offset,
        })
    }

    /// Bytes between the end of the file name and the next record.
    pub fn trailing_len(&self) -> i64 {
        i64::from(self.extra_field_length) + i64::from(self.file_comment_length)
    }
}

/// Local File Header (LFH) - 30 bytes before the variable fields
#[derive(Debug, Clone)]
pub struct LocalFileHeader {
    pub version_needed: u16,
    pub flags: u16,
    pub compression_method: CompressionMethod,
    pub compressed_size: u32,
    pub uncompressed_size: u32,
    pub file_name_length: u16,
    pub extra_field_length: u16,
}

impl LocalFileHeader {
    pub const SIGNATURE: u32 = 0x04034b50;
    pub const COMPRESSED_SIZE_OFFSET: u64 = 18;

    pub fn is_encrypted(&self) -> bool {
        self.flags & FLAG_ENCRYPTED != 0
    }

    pub fn has_data_descriptor(&self) -> bool {
        self.flags & FLAG_DATA_DESCRIPTOR != 0
    }

    /// Number of payload bytes that follow the header.
    ///
    /// Stored entries are read by their uncompressed size, everything else
    /// by the compressed size.
    pub fn payload_len(&self) -> u32 {
        if self.compression_method == CompressionMethod::Stored {
            self.uncompressed_size
        } else {
            self.compressed_size
        }
    }

    /// Bytes between the fixed header and the payload.
    pub fn variable_len(&self) -> i64 {
        i64::from(self.file_name_length) + i64::from(self.extra_field_length)
    }
}

/// A single entry read from the archive.
///
/// `data` holds the raw payload as found in the archive: plain bytes for
/// [`CompressionMethod::Stored`], still encoded for every other method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub compression_method: CompressionMethod,
    pub compressed_size: u32,
    pub uncompressed_size: u32,
    pub data: Vec<u8>,
}

impl Entry {
    pub fn is_stored(&self) -> bool {
        self.compression_method == CompressionMethod::Stored
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}
