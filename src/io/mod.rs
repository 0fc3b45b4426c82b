mod local;
mod memory;

pub use local::LocalFileSource;
pub use memory::MemorySource;

use std::io::{Cursor, Read, Seek, SeekFrom};

/// A seekable source of archive bytes.
///
/// Reads go through one cursor, so a source serves one reader at a time.
/// Callers that need parallel lookups give each one its own source.
pub trait ByteSource: Read + Seek {
    /// Get the total size of the data source.
    ///
    /// The read position is left where it was.
    fn size(&mut self) -> std::io::Result<u64> {
        let pos = self.stream_position()?;
        let end = self.seek(SeekFrom::End(0))?;
        if pos != end {
            self.seek(SeekFrom::Start(pos))?;
        }
        Ok(end)
    }
}

impl ByteSource for std::fs::File {}

impl<T: AsRef<[u8]>> ByteSource for Cursor<T> {
    fn size(&mut self) -> std::io::Result<u64> {
        Ok(self.get_ref().as_ref().len() as u64)
    }
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    fn size(&mut self) -> std::io::Result<u64> {
        (**self).size()
    }
}
