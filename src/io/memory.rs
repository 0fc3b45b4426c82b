use std::io::{Cursor, Read, Seek, SeekFrom};
use std::sync::Arc;

use super::ByteSource;

/// In-memory source over a shared buffer.
///
/// Cloning shares the bytes but not the cursor.
#[derive(Debug, Clone)]
pub struct MemorySource {
    cursor: Cursor<Arc<[u8]>>,
}

impl MemorySource {
    pub fn new(data: impl Into<Arc<[u8]>>) -> Self {
        Self {
            cursor: Cursor::new(data.into()),
        }
    }

    pub fn as_slice(&self) -> &[u8] {
        self.cursor.get_ref()
    }
}

impl Read for MemorySource {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.cursor.read(buf)
    }
}

impl Seek for MemorySource {
    fn seek(&mut self, pos: SeekFrom) -> std::io::Result<u64> {
        self.cursor.seek(pos)
    }
}

impl ByteSource for MemorySource {
    fn size(&mut self) -> std::io::Result<u64> {
        Ok(self.as_slice().len() as u64)
    }
}
