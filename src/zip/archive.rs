use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::IndexOptions;
use crate::io::{ByteSource, LocalFileSource, MemorySource};
use crate::{Error, Result};

use super::parser;
use super::structures::Entry;

/// Name to local header offset map, built once per archive.
#[derive(Debug, Default)]
struct NameTable {
    /// Names in directory order, each listed once
    order: Vec<String>,
    offsets: HashMap<String, u32>,
    comment: Vec<u8>,
}

impl NameTable {
    fn from_records(records: Vec<(String, u32)>, comment: Vec<u8>) -> Self {
        let mut table = NameTable {
            order: Vec::with_capacity(records.len()),
            offsets: HashMap::with_capacity(records.len()),
            comment,
        };
        for (name, offset) in records {
            match table.offsets.insert(name.clone(), offset) {
                Some(previous) => {
                    warn!("Duplicate entry {name}: @{previous:#x} replaced by @{offset:#x}");
                }
                None => table.order.push(name),
            }
        }
        table
    }
}

/// State held while the index is open
struct Open<R> {
    source: R,
    table: Arc<NameTable>,
}

/// Read-only index over a ZIP archive.
///
/// Construction locates the End of Central Directory, walks the Central
/// Directory once and keeps a name to offset map. Each [`by_name`] call
/// re-reads the entry from the source; nothing is cached.
///
/// Lookups move the source's single cursor, which is why they take
/// `&mut self`. To read from several places at once, give each reader its
/// own handle with [`with_source`].
///
/// [`close`] releases the source and the map. After that every operation
/// fails with [`Error::Released`].
///
/// [`by_name`]: ZipIndex::by_name
/// [`with_source`]: ZipIndex::with_source
/// [`close`]: ZipIndex::close
///
/// ## Example
///
/// ```no_run
/// use zipindex::{CompressionMethod, ZipIndex};
///
/// let mut index = ZipIndex::open("archive.zip")?;
/// for name in index.names()? {
///     println!("{name}");
/// }
///
/// let entry = index.by_name("hello.txt")?;
/// if entry.compression_method == CompressionMethod::Stored {
///     assert_eq!(entry.data.len(), entry.uncompressed_size as usize);
/// }
/// index.close();
/// # Ok::<(), zipindex::Error>(())
/// ```
pub struct ZipIndex<R: ByteSource> {
    state: Option<Open<R>>,
    options: IndexOptions,
}

impl ZipIndex<LocalFileSource> {
    /// Open and index the archive at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_options(path, IndexOptions::default())
    }

    pub fn open_with_options(path: impl AsRef<Path>, options: IndexOptions) -> Result<Self> {
        let path = path.as_ref();
        debug!("Opening {}", path.display());
        let source = LocalFileSource::open(path).map_err(Error::Io)?;
        Self::with_options(source, options)
    }
}

impl ZipIndex<MemorySource> {
    /// Index an archive held in memory.
    pub fn from_bytes(data: impl Into<Arc<[u8]>>) -> Result<Self> {
        Self::with_options(MemorySource::new(data), IndexOptions::default())
    }
}

impl<R: ByteSource> ZipIndex<R> {
    /// Index the archive in `source` with default options.
    pub fn new(source: R) -> Result<Self> {
        Self::with_options(source, IndexOptions::default())
    }

    /// Index the archive in `source`.
    ///
    /// # Errors
    ///
    /// Fails if no End of Central Directory is found, the archive uses
    /// ZIP64, or the Central Directory walk hits a bad record. No partial
    /// index is returned.
    pub fn with_options(mut source: R, options: IndexOptions) -> Result<Self> {
        let size = source.size()?;
        let eocd_offset = parser::find_eocd(&mut source, size, options.eocd_search_limit)?;
        let eocd = parser::read_eocd(&mut source, eocd_offset)?;
        let comment = parser::read_comment(&mut source, eocd_offset, &eocd)?;
        let records = parser::walk_central_directory(&mut source, &eocd, &options)?;

        let table = NameTable::from_records(records, comment);
        debug!(
            "Indexed {} of {} directory records",
            table.order.len(),
            eocd.total_entries
        );

        Ok(Self {
            state: Some(Open {
                source,
                table: Arc::new(table),
            }),
            options,
        })
    }

    /// A second index over the same archive, reading through `source`.
    ///
    /// The name map is shared rather than rebuilt, so `source` must hold the
    /// same bytes as this index's source.
    pub fn with_source<S: ByteSource>(&self, source: S) -> Result<ZipIndex<S>> {
        let open = self.open_state()?;
        Ok(ZipIndex {
            state: Some(Open {
                source,
                table: Arc::clone(&open.table),
            }),
            options: self.options.clone(),
        })
    }

    /// Entry names in directory order. Directories are not listed.
    pub fn names(&self) -> Result<Vec<&str>> {
        let open = self.open_state()?;
        Ok(open.table.order.iter().map(String::as_str).collect())
    }

    /// Number of indexed entries.
    pub fn len(&self) -> Result<usize> {
        Ok(self.open_state()?.table.order.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    pub fn contains(&self, name: &str) -> Result<bool> {
        Ok(self.open_state()?.table.offsets.contains_key(name))
    }

    /// Offset of the entry's Local File Header within the archive.
    pub fn local_header_offset(&self, name: &str) -> Result<u32> {
        self.open_state()?
            .table
            .offsets
            .get(name)
            .copied()
            .ok_or_else(|| Error::NotFound(name.to_string()))
    }

    /// The archive comment stored after the End of Central Directory.
    pub fn comment(&self) -> Result<&[u8]> {
        Ok(&self.open_state()?.table.comment)
    }

    /// Read the entry called `name` (exact, case-sensitive match).
    ///
    /// # Errors
    ///
    /// - [`Error::NotFound`] if the name is not indexed
    /// - [`Error::Released`] after [`close`](ZipIndex::close)
    /// - [`Error::Encrypted`] if the entry is encrypted
    /// - [`Error::InvalidSignature`] or [`Error::Truncated`] if the entry's
    ///   local header or payload is damaged
    ///
    /// None of these affect later lookups.
    pub fn by_name(&mut self, name: &str) -> Result<Entry> {
        let open = self.state.as_mut().ok_or(Error::Released)?;
        let offset = open
            .table
            .offsets
            .get(name)
            .copied()
            .ok_or_else(|| Error::NotFound(name.to_string()))?;

        debug!("Reading {name} @{offset:#x}");
        parser::read_local_entry(&mut open.source, offset, name, &self.options)
    }

    /// Release the source and the index. Calling it again does nothing.
    pub fn close(&mut self) {
        if self.state.take().is_some() {
            debug!("Archive index released");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.state.is_none()
    }

    /// Release the index and hand back the source.
    pub fn into_source(mut self) -> Result<R> {
        self.state
            .take()
            .map(|open| open.source)
            .ok_or(Error::Released)
    }

    fn open_state(&self) -> Result<&Open<R>> {
        self.state.as_ref().ok_or(Error::Released)
    }
}

impl<R: ByteSource> std::fmt::Debug for ZipIndex<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZipIndex")
            .field(
                "entries",
                &self.state.as_ref().map(|open| open.table.order.len()),
            )
            .field("closed", &self.is_closed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_names_keep_first_position_last_offset() {
        let table = NameTable::from_records(
            vec![
                ("a".to_string(), 0),
                ("b".to_string(), 10),
                ("a".to_string(), 20),
            ],
            Vec::new(),
        );
        assert_eq!(table.order, ["a", "b"]);
        assert_eq!(table.offsets["a"], 20);
        assert_eq!(table.offsets["b"], 10);
    }
}
