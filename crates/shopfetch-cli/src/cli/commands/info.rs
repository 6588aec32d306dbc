//! `shopfetch info` – details of one version.

use anyhow::Result;
use shopfetch_core::Order;

use crate::cli::{display, select, Selector, Session};

pub fn run_info(session: &Session, selector: &Selector, order: Order) -> Result<()> {
    let catalog = session.catalog()?;
    let entry = select(&catalog, selector, order)?;
    print!("{}", display::details(entry, &session.bucket.entry_url(entry)));
    Ok(())
}
