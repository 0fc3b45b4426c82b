//! Options controlling how an archive is indexed and read.

/// How entry names are decoded from the central directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NameEncoding {
    /// Invalid UTF-8 sequences are replaced with U+FFFD.
    #[default]
    Lossy,
    /// Invalid UTF-8 fails the directory walk.
    Strict,
}

/// Indexing options.
///
/// ```
/// use zipindex::{IndexOptions, NameEncoding};
///
/// let options = IndexOptions::default()
///     .eocd_search_limit(Some(64 * 1024))
///     .name_encoding(NameEncoding::Strict)
///     .max_entry_size(Some(16 * 1024 * 1024));
/// assert_eq!(options.max_entry_size, Some(16 * 1024 * 1024));
/// ```
#[derive(Debug, Clone, Default)]
pub struct IndexOptions {
    /// How many bytes before the end of the source the EOCD scan may cover.
    /// `None` scans all the way to the start.
    pub eocd_search_limit: Option<u64>,
    /// Entry name decoding.
    pub name_encoding: NameEncoding,
    /// Largest payload a lookup will allocate. `None` means unlimited.
    pub max_entry_size: Option<u32>,
}

impl IndexOptions {
    pub fn eocd_search_limit(mut self, limit: Option<u64>) -> Self {
        self.eocd_search_limit = limit;
        self
    }

    pub fn name_encoding(mut self, encoding: NameEncoding) -> Self {
        self.name_encoding = encoding;
        self
    }

    pub fn max_entry_size(mut self, limit: Option<u32>) -> Self {
        self.max_entry_size = limit;
        self
    }
}
