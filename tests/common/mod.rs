#![allow(dead_code)]

use byteorder::{LittleEndian, WriteBytesExt};
use flate2::Compression;
use flate2::write::DeflateEncoder;
use std::io::Write;

/// One record to lay down in a test archive.
pub struct Record {
    pub name: Vec<u8>,
    pub method: u16,
    pub flags: u16,
    pub compressed_size: u32,
    pub uncompressed_size: u32,
    pub payload: Vec<u8>,
    pub local_extra: Vec<u8>,
    pub central_extra: Vec<u8>,
    pub comment: Vec<u8>,
}

/// Writes archives byte by byte so tests control every field.
#[derive(Default)]
pub struct ArchiveBuilder {
    records: Vec<Record>,
    prefix: Vec<u8>,
    comment: Vec<u8>,
}

impl ArchiveBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stored(self, name: &str, data: &[u8]) -> Self {
        self.record(Record {
            name: name.as_bytes().to_vec(),
            method: 0,
            flags: 0,
            compressed_size: data.len() as u32,
            uncompressed_size: data.len() as u32,
            payload: data.to_vec(),
            local_extra: Vec::new(),
            central_extra: Vec::new(),
            comment: Vec::new(),
        })
    }

    pub fn deflated(self, name: &str, data: &[u8]) -> Self {
        let payload = deflate(data);
        self.record(Record {
            name: name.as_bytes().to_vec(),
            method: 8,
            flags: 0,
            compressed_size: payload.len() as u32,
            uncompressed_size: data.len() as u32,
            payload,
            local_extra: Vec::new(),
            central_extra: Vec::new(),
            comment: Vec::new(),
        })
    }

    pub fn directory(self, name: &str) -> Self {
        self.stored(name, b"")
    }

    pub fn record(mut self, record: Record) -> Self {
        self.records.push(record);
        self
    }

    /// Bytes placed before the first local header.
    pub fn prefix(mut self, prefix: &[u8]) -> Self {
        self.prefix = prefix.to_vec();
        self
    }

    pub fn comment(mut self, comment: &[u8]) -> Self {
        self.comment = comment.to_vec();
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut out = self.prefix.clone();
        let mut offsets = Vec::with_capacity(self.records.len());

        for record in &self.records {
            offsets.push(out.len() as u32);
            out.write_u32::<LittleEndian>(0x04034b50).unwrap();
            out.write_u16::<LittleEndian>(20).unwrap();
            out.write_u16::<LittleEndian>(record.flags).unwrap();
            out.write_u16::<LittleEndian>(record.method).unwrap();
            out.write_u32::<LittleEndian>(0).unwrap(); // mod time + date
            out.write_u32::<LittleEndian>(0).unwrap(); // crc32
            out.write_u32::<LittleEndian>(record.compressed_size).unwrap();
            out.write_u32::<LittleEndian>(record.uncompressed_size).unwrap();
            out.write_u16::<LittleEndian>(record.name.len() as u16).unwrap();
            out.write_u16::<LittleEndian>(record.local_extra.len() as u16).unwrap();
            out.extend_from_slice(&record.name);
            out.extend_from_slice(&record.local_extra);
            out.extend_from_slice(&record.payload);
        }

        let cd_offset = out.len() as u32;
        for (record, offset) in self.records.iter().zip(&offsets) {
            out.write_u32::<LittleEndian>(0x02014b50).unwrap();
            out.write_u16::<LittleEndian>(20).unwrap(); // made by
            out.write_u16::<LittleEndian>(20).unwrap(); // needed
            out.write_u16::<LittleEndian>(record.flags).unwrap();
            out.write_u16::<LittleEndian>(record.method).unwrap();
            out.write_u32::<LittleEndian>(0).unwrap();
            out.write_u32::<LittleEndian>(0).unwrap();
            out.write_u32::<LittleEndian>(record.compressed_size).unwrap();
            out.write_u32::<LittleEndian>(record.uncompressed_size).unwrap();
            out.write_u16::<LittleEndian>(record.name.len() as u16).unwrap();
            out.write_u16::<LittleEndian>(record.central_extra.len() as u16).unwrap();
            out.write_u16::<LittleEndian>(record.comment.len() as u16).unwrap();
            out.write_u16::<LittleEndian>(0).unwrap(); // disk start
            out.write_u16::<LittleEndian>(0).unwrap(); // internal attrs
            out.write_u32::<LittleEndian>(0).unwrap(); // external attrs
            out.write_u32::<LittleEndian>(*offset).unwrap();
            out.extend_from_slice(&record.name);
            out.extend_from_slice(&record.central_extra);
            out.extend_from_slice(&record.comment);
        }
        let cd_size = out.len() as u32 - cd_offset;

        out.write_u32::<LittleEndian>(0x06054b50).unwrap();
        out.write_u16::<LittleEndian>(0).unwrap();
        out.write_u16::<LittleEndian>(0).unwrap();
        out.write_u16::<LittleEndian>(self.records.len() as u16).unwrap();
        out.write_u16::<LittleEndian>(self.records.len() as u16).unwrap();
        out.write_u32::<LittleEndian>(cd_size).unwrap();
        out.write_u32::<LittleEndian>(cd_offset).unwrap();
        out.write_u16::<LittleEndian>(self.comment.len() as u16).unwrap();
        out.extend_from_slice(&self.comment);
        out
    }
}

pub fn deflate(data: &[u8]) -> Vec<u8> {
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

pub fn inflate(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut decoder = flate2::read::DeflateDecoder::new(data);
    std::io::Read::read_to_end(&mut decoder, &mut out).unwrap();
    out
}

/// The two-entry archive with a text file and a folder placeholder.
pub fn hello_archive() -> Vec<u8> {
    ArchiveBuilder::new()
        .stored("hello.txt", b"Hello World!")
        .directory("docs/")
        .build()
}
