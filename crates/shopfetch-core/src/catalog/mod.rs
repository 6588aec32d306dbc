//! Version catalog built from one bucket listing.
//!
//! The catalog is a frozen snapshot: entries keep listing-document order and
//! there is no way to mutate it after construction. Shells select entries
//! either by listing position or by "most recent first" position; both are
//! explicit operations here so the reversal lives in one place.

mod parse;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{Error, ParseError, Result};

pub use parse::{derive_version, parse_listing, S3_NAMESPACE};

/// One catalog row, derived from one `Contents` element of the listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionEntry {
    /// Version derived from `object_key` (see [`derive_version`]).
    pub version: String,
    /// Full object path within the bucket.
    pub object_key: String,
    /// Last modification time as declared by the listing (UTC).
    pub last_modified: DateTime<Utc>,
    /// Declared object size in bytes.
    pub size_bytes: u64,
}

/// Position order used when selecting an entry by number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    /// Same order as the listing document.
    Listing,
    /// Mirrored listing order; the last listed entry comes first.
    RecentFirst,
}

/// Numbering base for positions typed by a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Base {
    Zero,
    One,
}

#[derive(Debug, Clone, Default)]
pub struct VersionCatalog {
    entries: Vec<VersionEntry>,
}

impl VersionCatalog {
    pub fn new(entries: Vec<VersionEntry>) -> Self {
        Self { entries }
    }

    /// Parse a raw listing body into a catalog.
    pub fn from_listing(raw: &[u8]) -> Result<Self, ParseError> {
        Ok(Self::new(parse_listing(raw)?))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in listing order.
    pub fn entries(&self) -> &[VersionEntry] {
        &self.entries
    }

    /// Entries in "most recent first" order.
    pub fn iter_recent_first(&self) -> impl Iterator<Item = &VersionEntry> {
        self.entries.iter().rev()
    }

    /// Iterate in the given order.
    pub fn iter_in(&self, order: Order) -> Box<dyn Iterator<Item = &VersionEntry> + '_> {
        match order {
            Order::Listing => Box::new(self.entries.iter()),
            Order::RecentFirst => Box::new(self.iter_recent_first()),
        }
    }

    /// Zero-based lookup in listing order.
    pub fn entry_by_listing_index(&self, index: usize) -> Result<&VersionEntry> {
        self.entries.get(index).ok_or(Error::Index {
            index,
            len: self.len(),
        })
    }

    /// Zero-based lookup in "most recent first" order: index 0 is the last listed entry.
    pub fn entry_by_recent_index(&self, index: usize) -> Result<&VersionEntry> {
        let len = self.len();
        if index >= len {
            return Err(Error::Index { index, len });
        }
        Ok(&self.entries[len - 1 - index])
    }

    /// Zero-based lookup in the given order.
    pub fn entry_by_index(&self, index: usize, order: Order) -> Result<&VersionEntry> {
        match order {
            Order::Listing => self.entry_by_listing_index(index),
            Order::RecentFirst => self.entry_by_recent_index(index),
        }
    }

    /// Lookup by a user-facing position. With `Base::One`, position 0 is out of range.
    pub fn entry_by_position(
        &self,
        position: usize,
        order: Order,
        base: Base,
    ) -> Result<&VersionEntry> {
        let index = match base {
            Base::Zero => position,
            Base::One => position.checked_sub(1).ok_or(Error::Index {
                index: position,
                len: self.len(),
            })?,
        };
        self.entry_by_index(index, order)
    }

    /// First entry in listing order whose version equals `version`.
    pub fn entry_by_version(&self, version: &str) -> Result<&VersionEntry> {
        self.entries
            .iter()
            .find(|e| e.version == version)
            .ok_or_else(|| Error::NotFound(version.to_string()))
    }
}
