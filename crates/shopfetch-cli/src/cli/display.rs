//! Text formatting for versions, sizes, times and download verdicts.

use chrono::{DateTime, Local, Utc};
use shopfetch_core::{DownloadResult, Verdict, VersionEntry};
use std::fmt::Write as _;
use std::path::Path;

const MIB: f64 = 1_048_576.0;

/// Size in MB with one decimal, as shown to users.
pub fn size_mb(bytes: u64) -> String {
    format!("{:.1} MB", bytes as f64 / MIB)
}

/// `dd.mm.yy HH:MM:SS` in the local timezone.
pub fn local_time(t: DateTime<Utc>) -> String {
    t.with_timezone(&Local).format("%d.%m.%y %H:%M:%S").to_string()
}

/// Offset of the local timezone at `t`, e.g. `+03:00`.
pub fn local_offset(t: DateTime<Utc>) -> String {
    t.with_timezone(&Local).format("%:z").to_string()
}

/// Numbered table; `entries` is already in display order.
pub fn version_table<'a>(entries: impl Iterator<Item = &'a VersionEntry>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:>4}  {:<20} {:<18} {:>10}", "#", "VERSION", "MODIFIED", "SIZE");
    for (i, e) in entries.enumerate() {
        let _ = writeln!(
            out,
            "{:>4}  {:<20} {:<18} {:>10}",
            i + 1,
            e.version,
            local_time(e.last_modified),
            size_mb(e.size_bytes)
        );
    }
    out
}

/// Details block printed before a download.
pub fn details(entry: &VersionEntry, url: &str) -> String {
    format!(
        "Version {}\n  Size:          {}\n  Download URL:  {}\n  Last modified: {} {} (UTC {})\n",
        entry.version,
        size_mb(entry.size_bytes),
        url,
        local_time(entry.last_modified),
        local_offset(entry.last_modified),
        entry.last_modified.format("%H:%M:%S"),
    )
}

/// One-line report of a finished download.
pub fn report(version: &str, dest: &Path, result: &DownloadResult) -> String {
    match result.verdict() {
        Verdict::Verified => format!(
            "Version {} downloaded to {} ({} bytes, size verified)",
            version,
            dest.display(),
            result.bytes_written
        ),
        Verdict::Unverifiable => format!(
            "Version {} downloaded to {} ({} bytes); the server declared no size, completeness not verified",
            version,
            dest.display(),
            result.bytes_written
        ),
        Verdict::Mismatch => format!(
            "Version {} is incomplete: {} at {}",
            version,
            result,
            dest.display()
        ),
    }
}
