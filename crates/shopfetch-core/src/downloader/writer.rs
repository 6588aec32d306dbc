//! Destination file handling for the streaming download.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::http::ResponseHead;
use crate::progress::ProgressSink;

/// Writes accepted body chunks straight to the destination file.
///
/// The file is created (or truncated) only once a 2xx response delivers its
/// first bytes, so a rejected response never touches an existing file.
pub(super) struct ChunkWriter<'a> {
    dest: &'a Path,
    declared_size: Option<u64>,
    progress: &'a mut dyn ProgressSink,
    file: Option<File>,
    bytes: u64,
    io_error: Option<io::Error>,
}

impl<'a> ChunkWriter<'a> {
    pub fn new(
        dest: &'a Path,
        declared_size: Option<u64>,
        progress: &'a mut dyn ProgressSink,
    ) -> Self {
        Self {
            dest,
            declared_size,
            progress,
            file: None,
            bytes: 0,
            io_error: None,
        }
    }

    /// Handle one chunk from libcurl. Returns false to abort the transfer.
    pub fn write_chunk(&mut self, head: &ResponseHead, data: &[u8]) -> bool {
        if data.is_empty() {
            return true;
        }
        if !head.is_success() {
            return false;
        }
        let result = self
            .open(head)
            .and_then(|file| file.write_all(data));
        if let Err(e) = result {
            self.io_error = Some(e);
            return false;
        }
        self.bytes += data.len() as u64;
        self.progress.on_progress(self.bytes);
        true
    }

    /// Error that made `write_chunk` abort, if any.
    pub fn take_io_error(&mut self) -> Option<io::Error> {
        self.io_error.take()
    }

    /// Make sure the file exists (an empty 2xx body never reaches
    /// `write_chunk`), then flush and close it.
    pub fn finish(mut self, head: &ResponseHead) -> io::Result<u64> {
        let file = self.open(head)?;
        file.flush()?;
        file.sync_all()?;
        Ok(self.bytes)
    }

    fn open(&mut self, head: &ResponseHead) -> io::Result<&mut File> {
        let file = match self.file.take() {
            Some(file) => file,
            None => {
                let file = File::create(self.dest)?;
                self.progress
                    .on_start(head.expected_len().or(self.declared_size));
                file
            }
        };
        Ok(self.file.insert(file))
    }
}
