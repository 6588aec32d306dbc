//! `shopfetch pick` – choose a version from the list and download it.

use anyhow::Result;
use shopfetch_core::bucket::default_destination;
use shopfetch_core::Base;
use std::io::{self, Write};

use super::get::download_to;
use crate::cli::{display, prompt, Outcome, Session};

pub fn run_pick(session: &Session) -> Result<Outcome> {
    let catalog = session.catalog()?;
    if catalog.is_empty() {
        println!("No versions published.");
        return Ok(Outcome::Done);
    }
    let order = session.order;

    println!("Available versions:");
    print!("{}", display::version_table(catalog.iter_in(order)));

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();
    let Some(position) = prompt::choose(&mut input, &mut output, catalog.len())? else {
        println!("No version selected.");
        return Ok(Outcome::Done);
    };
    let entry = catalog.entry_by_position(position, order, Base::One)?;

    writeln!(output)?;
    print!("{}", display::details(entry, &session.bucket.entry_url(entry)));
    if !prompt::confirm(&mut input, &mut output, "Download this version?")? {
        println!("Nothing downloaded.");
        return Ok(Outcome::Done);
    }
    drop(input);

    download_to(
        session,
        entry,
        default_destination(&session.output_dir, &entry.version),
    )
}
