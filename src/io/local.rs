use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use super::ByteSource;

/// Read-only local file source
pub struct LocalFileSource {
    file: File,
    path: PathBuf,
    size: u64,
}

impl LocalFileSource {
    pub fn open(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let size = file.metadata()?.len();
        Ok(Self {
            file,
            path: path.to_path_buf(),
            size,
        })
    }

    /// Open an independent handle on the same file.
    ///
    /// The new handle has its own read position, unlike `File::try_clone`
    /// whose handles share one.
    pub fn try_clone(&self) -> std::io::Result<Self> {
        Self::open(&self.path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Read for LocalFileSource {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.file.read(buf)
    }
}

impl Seek for LocalFileSource {
    fn seek(&mut self, pos: SeekFrom) -> std::io::Result<u64> {
        self.file.seek(pos)
    }
}

impl ByteSource for LocalFileSource {
    fn size(&mut self) -> std::io::Result<u64> {
        Ok(self.size)
    }
}

impl std::fmt::Debug for LocalFileSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalFileSource")
            .field("path", &self.path)
            .field("size", &self.size)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn clones_have_independent_cursors() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(b"abcdef").unwrap();
        tmp.flush().unwrap();

        let mut first = LocalFileSource::open(tmp.path()).unwrap();
        let mut second = first.try_clone().unwrap();

        first.seek(SeekFrom::Start(4)).unwrap();
        let mut buf = [0u8; 2];
        second.read_exact(&mut buf).unwrap();
        assert_eq!(&buf, b"ab");
        first.read_exact(&mut buf).unwrap();
        assert_eq!(&buf, b"ef");
        assert_eq!(second.size().unwrap(), 6);
    }

    #[test]
    fn missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(LocalFileSource::open(dir.path().join("missing.zip")).is_err());
    }
}
