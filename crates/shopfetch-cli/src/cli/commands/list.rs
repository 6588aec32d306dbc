//! `shopfetch list` – show available versions.

use anyhow::Result;
use shopfetch_core::Order;

use crate::cli::display;
use crate::cli::Session;

pub fn run_list(session: &Session, order: Order, json: bool) -> Result<()> {
    let catalog = session.catalog()?;
    if json {
        let versions = session.bucket.list_versions(&catalog, order);
        println!("{}", serde_json::to_string_pretty(&versions)?);
        return Ok(());
    }
    if catalog.is_empty() {
        println!("No versions published.");
        return Ok(());
    }
    println!("Available versions:");
    print!("{}", display::version_table(catalog.iter_in(order)));
    Ok(())
}
