//! CLI command handlers. Each command is in its own file.

mod get;
mod info;
mod list;
mod pick;

pub use get::run_get;
pub use info::run_info;
pub use list::run_list;
pub use pick::run_pick;
