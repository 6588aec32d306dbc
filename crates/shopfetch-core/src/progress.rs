//! Progress reporting for downloads.
//!
//! The engine calls the sink synchronously on the transfer thread after each
//! chunk is written, so implementations must return quickly.

/// Receives cumulative byte counts for one transfer.
pub trait ProgressSink {
    /// Called once the response is accepted, before the first chunk.
    /// `expected` is the declared length, if any.
    fn on_start(&mut self, _expected: Option<u64>) {}

    /// Called after each non-empty chunk reaches the file.
    fn on_progress(&mut self, bytes_so_far: u64);
}

impl<F: FnMut(u64)> ProgressSink for F {
    fn on_progress(&mut self, bytes_so_far: u64) {
        self(bytes_so_far)
    }
}

/// Sink that ignores all updates.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn on_progress(&mut self, _bytes_so_far: u64) {}
}

/// Fraction complete in [0.0, 1.0], or None when the total is unknown.
pub fn fraction(bytes_so_far: u64, expected: Option<u64>) -> Option<f64> {
    match expected {
        Some(total) if total > 0 => Some((bytes_so_far as f64 / total as f64).min(1.0)),
        _ => None,
    }
}
