//! Single-line download progress on stderr.

use shopfetch_core::progress::{fraction, ProgressSink};
use std::io::Write;
use std::time::{Duration, Instant};

const PRINT_INTERVAL: Duration = Duration::from_millis(500);
const MIB: f64 = 1_048_576.0;

pub struct TerminalProgress {
    expected: Option<u64>,
    started: Instant,
    last_print: Option<Instant>,
    last_bytes: u64,
}

impl TerminalProgress {
    pub fn new() -> Self {
        Self {
            expected: None,
            started: Instant::now(),
            last_print: None,
            last_bytes: 0,
        }
    }

    /// Print the final state and end the line.
    pub fn finish(&mut self) {
        if self.last_print.is_some() {
            self.print(self.last_bytes);
            eprintln!();
        }
    }

    fn print(&self, bytes: u64) {
        let elapsed = self.started.elapsed().as_secs_f64();
        let rate = if elapsed > 0.0 {
            bytes as f64 / elapsed / MIB
        } else {
            0.0
        };
        let line = match (self.expected, fraction(bytes, self.expected)) {
            (Some(total), Some(f)) => format!(
                "\r  {:.1} / {:.1} MiB ({:.1}%)  {:.2} MiB/s  ",
                bytes as f64 / MIB,
                total as f64 / MIB,
                f * 100.0,
                rate
            ),
            _ => format!("\r  {:.1} MiB  {:.2} MiB/s  ", bytes as f64 / MIB, rate),
        };
        let mut err = std::io::stderr().lock();
        let _ = err.write_all(line.as_bytes());
        let _ = err.flush();
    }
}

impl ProgressSink for TerminalProgress {
    fn on_start(&mut self, expected: Option<u64>) {
        self.expected = expected;
        self.started = Instant::now();
    }

    fn on_progress(&mut self, bytes_so_far: u64) {
        self.last_bytes = bytes_so_far;
        let now = Instant::now();
        let due = self
            .last_print
            .map_or(true, |t| now.duration_since(t) >= PRINT_INTERVAL);
        if due {
            self.print(bytes_so_far);
            self.last_print = Some(now);
        }
    }
}
