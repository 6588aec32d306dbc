//! `shopfetch get` – download one version.

use anyhow::{Context, Result};
use shopfetch_core::bucket::default_destination;
use shopfetch_core::{Order, Verdict, VersionEntry};
use std::path::PathBuf;

use crate::cli::progress::TerminalProgress;
use crate::cli::{display, prompt, select, Outcome, Selector, Session};

pub fn run_get(
    session: &Session,
    selector: &Selector,
    order: Order,
    output: Option<PathBuf>,
    yes: bool,
) -> Result<Outcome> {
    let catalog = session.catalog()?;
    let entry = select(&catalog, selector, order)?;
    print!("{}", display::details(entry, &session.bucket.entry_url(entry)));

    if !yes {
        let stdin = std::io::stdin();
        let confirmed = prompt::confirm(
            &mut stdin.lock(),
            &mut std::io::stdout(),
            "Download this version?",
        )?;
        if !confirmed {
            println!("Nothing downloaded.");
            return Ok(Outcome::Done);
        }
    }

    let dest = output.unwrap_or_else(|| default_destination(&session.output_dir, &entry.version));
    download_to(session, entry, dest)
}

/// Download `entry` to `dest` and print where it went and whether it is complete.
pub(super) fn download_to(session: &Session, entry: &VersionEntry, dest: PathBuf) -> Result<Outcome> {
    tracing::info!(version = %entry.version, dest = %dest.display(), "download started");
    let mut progress = TerminalProgress::new();
    let result = session.bucket.download_entry(entry, &dest, &mut progress);
    progress.finish();
    let result = result.with_context(|| format!("could not download version {}", entry.version))?;

    let shown = std::path::absolute(&dest).unwrap_or(dest);
    println!("{}", display::report(&entry.version, &shown, &result));
    tracing::info!(
        version = %entry.version,
        bytes_written = result.bytes_written,
        verdict = ?result.verdict(),
        "download finished"
    );
    Ok(match result.verdict() {
        Verdict::Mismatch => Outcome::Unverified,
        Verdict::Verified | Verdict::Unverifiable => Outcome::Done,
    })
}
