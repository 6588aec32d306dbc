//! Error types shared by the listing, catalog and download layers.
//!
//! Every failure is returned to the caller; nothing here is retried.

use std::path::PathBuf;

use thiserror::Error;

use crate::downloader::DownloadResult;

/// Network or HTTP failure while fetching the listing or an object.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The final response of the redirect chain had an unacceptable status.
    #[error("GET {url} returned HTTP {status}")]
    Status { url: String, status: u32 },
    /// libcurl reported an error (resolve, connect, receive, ...).
    #[error("GET {url} failed: {source}")]
    Curl {
        url: String,
        #[source]
        source: curl::Error,
    },
    /// The server closed the connection before the declared end of the body.
    /// `partial` describes what is on disk; it never carries a verified verdict.
    #[error("GET {url} ended early: {partial} on disk")]
    Truncated { url: String, partial: DownloadResult },
}

/// Malformed bucket listing document.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("listing is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),
    #[error("listing is not valid XML: {0}")]
    Xml(#[from] roxmltree::Error),
    #[error("unexpected listing root <{0}>, expected ListBucketResult")]
    UnexpectedRoot(String),
    #[error("listing entry {entry_index}: missing <{field}>")]
    MissingField {
        entry_index: usize,
        field: &'static str,
    },
    #[error("listing entry {entry_index}: invalid <{field}> value {value:?}")]
    InvalidField {
        entry_index: usize,
        field: &'static str,
        value: String,
    },
}

/// Top-level error for catalog and download operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// Selection position outside `[0, len)`.
    #[error("index {index} is out of range for a catalog of {len} entries")]
    Index { index: usize, len: usize },
    #[error("version {0:?} is not in the catalog")]
    NotFound(String),
    /// Local file create/write/stat failure.
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid bucket URL {url:?}: {reason}")]
    InvalidBucketUrl { url: String, reason: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}
