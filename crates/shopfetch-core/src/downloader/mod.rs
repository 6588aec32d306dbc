//! Verified streaming download engine.
//!
//! Streams one object to disk in bounded chunks with a single GET and judges
//! completeness by comparing the declared length with the size of the file
//! on disk. Byte counts are the only integrity check; there is no hashing.
//! The file is left in place whatever the verdict.

mod writer;

use std::cell::RefCell;
use std::fmt;
use std::path::Path;

use serde::Serialize;

use crate::error::{Error, Result, TransportError};
use crate::http::{curl_error, get_handle, ResponseHead};
use crate::progress::ProgressSink;
use writer::ChunkWriter;

/// Upper bound on the size of one body chunk handed to the writer.
pub const CHUNK_SIZE: usize = 8 * 1024;

/// Outcome of comparing declared and persisted sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    /// Persisted size equals the declared size.
    Verified,
    /// Persisted size differs from the declared size.
    Mismatch,
    /// No declared size was available, so completeness cannot be confirmed.
    Unverifiable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DownloadResult {
    /// Declared length; `None` when the server sent no usable `Content-Length`
    /// and no fallback size was supplied.
    pub bytes_expected: Option<u64>,
    /// Size of the destination file as reported by the filesystem.
    pub bytes_written: u64,
}

impl DownloadResult {
    pub fn verdict(&self) -> Verdict {
        match self.bytes_expected {
            None | Some(0) => Verdict::Unverifiable,
            Some(n) if n == self.bytes_written => Verdict::Verified,
            Some(_) => Verdict::Mismatch,
        }
    }

    pub fn verified(&self) -> bool {
        self.verdict() == Verdict::Verified
    }
}

impl fmt::Display for DownloadResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.bytes_expected {
            Some(n) => write!(f, "{} of {} bytes", self.bytes_written, n),
            None => write!(f, "{} of ? bytes", self.bytes_written),
        }
    }
}

/// Download `url` to `dest`, reporting cumulative bytes to `progress`.
///
/// A non-2xx final response fails before `dest` is created or truncated.
/// Write failures abort the transfer and leave the partial file behind.
pub fn download(url: &str, dest: &Path, progress: &mut dyn ProgressSink) -> Result<DownloadResult> {
    download_with_declared_size(url, dest, None, progress)
}

/// Like [`download`], but `declared_size` is used as the expected length when
/// the response carries no usable `Content-Length`.
pub fn download_with_declared_size(
    url: &str,
    dest: &Path,
    declared_size: Option<u64>,
    progress: &mut dyn ProgressSink,
) -> Result<DownloadResult> {
    let head = RefCell::new(ResponseHead::default());
    let mut writer = ChunkWriter::new(dest, declared_size, progress);

    let mut easy = get_handle(url)?;
    easy.buffer_size(CHUNK_SIZE)
        .map_err(|source| curl_error(url, source))?;
    tracing::debug!(url, dest = %dest.display(), "starting download");

    let performed = {
        let mut transfer = easy.transfer();
        transfer
            .header_function(|line| {
                head.borrow_mut().feed(line);
                true
            })
            .map_err(|source| curl_error(url, source))?;
        transfer
            .write_function(|data| {
                let accepted = writer.write_chunk(&head.borrow(), data);
                Ok(if accepted { data.len() } else { 0 })
            })
            .map_err(|source| curl_error(url, source))?;
        transfer.perform()
    };
    drop(easy);

    let head = head.into_inner();
    if let Some(source) = writer.take_io_error() {
        return Err(Error::io(dest, source));
    }
    if let Some(status) = head.status.filter(|_| !head.is_success()) {
        return Err(TransportError::Status {
            url: url.to_string(),
            status,
        }
        .into());
    }
    let bytes_expected = head.expected_len().or(declared_size.filter(|n| *n > 0));

    if let Err(source) = performed {
        if source.is_partial_file() && head.is_success() {
            writer
                .finish(&head)
                .map_err(|source| Error::io(dest, source))?;
            let partial = DownloadResult {
                bytes_expected,
                bytes_written: on_disk_len(dest)?,
            };
            return Err(TransportError::Truncated {
                url: url.to_string(),
                partial,
            }
            .into());
        }
        return Err(curl_error(url, source).into());
    }

    let counted = writer
        .finish(&head)
        .map_err(|source| Error::io(dest, source))?;
    let result = DownloadResult {
        bytes_expected,
        bytes_written: on_disk_len(dest)?,
    };
    tracing::debug!(
        url,
        counted,
        on_disk = result.bytes_written,
        verdict = ?result.verdict(),
        "download finished"
    );
    Ok(result)
}

fn on_disk_len(path: &Path) -> Result<u64> {
    std::fs::metadata(path)
        .map(|m| m.len())
        .map_err(|source| Error::io(path, source))
}
