//! CLI for browsing and downloading Shopper builds.

mod commands;
mod display;
mod progress;
mod prompt;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use shopfetch_core::config::{self, ShopfetchConfig};
use shopfetch_core::{Base, Bucket, BucketUrl, Order, VersionCatalog, VersionEntry};
use std::path::PathBuf;

use commands::{run_get, run_info, run_list, run_pick};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "shopfetch", version)]
#[command(about = "Browse and download Shopper builds from the public bucket", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Bucket root URL (overrides the config file).
    #[arg(long, global = true, value_name = "URL")]
    pub bucket_url: Option<String>,

    /// Directory downloads are saved to (default: current directory).
    #[arg(long, global = true, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Ignore the config file and use built-in defaults.
    #[arg(long, global = true)]
    pub no_config: bool,
}

/// Numbering of the version list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OrderArg {
    /// Most recent build first.
    Recent,
    /// Same order as the bucket listing.
    Listing,
}

impl From<OrderArg> for Order {
    fn from(o: OrderArg) -> Self {
        match o {
            OrderArg::Recent => Order::RecentFirst,
            OrderArg::Listing => Order::Listing,
        }
    }
}

/// Which build to act on: a version string or a 1-based list position.
#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
pub struct Selector {
    /// Version identifier, e.g. 7.12.0.
    #[arg(value_name = "VERSION")]
    pub build: Option<String>,

    /// 1-based position as printed by `list`.
    #[arg(short, long, value_name = "N")]
    pub index: Option<usize>,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// List available versions.
    List {
        /// Numbering order (default from config).
        #[arg(long, value_enum)]
        order: Option<OrderArg>,
        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Show size, date and download URL of one version.
    Info {
        #[command(flatten)]
        selector: Selector,
        /// Order `--index` refers to (default from config).
        #[arg(long, value_enum)]
        order: Option<OrderArg>,
    },

    /// Download one version.
    Get {
        #[command(flatten)]
        selector: Selector,
        /// Order `--index` refers to (default from config).
        #[arg(long, value_enum)]
        order: Option<OrderArg>,
        /// Output file (default: Shopper_<version>.apk in the output directory).
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
        /// Do not ask for confirmation.
        #[arg(short, long)]
        yes: bool,
    },

    /// Choose a version interactively and download it.
    Pick,
}

/// How a command ended, for the process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Done,
    /// A download finished but its size did not match the declared size.
    Unverified,
}

/// Resolved settings shared by all commands.
#[derive(Debug)]
pub struct Session {
    pub bucket: Bucket,
    pub order: Order,
    pub output_dir: PathBuf,
}

impl Session {
    fn from_args(global: &GlobalArgs) -> Result<Self> {
        let cfg = if global.no_config {
            ShopfetchConfig::default()
        } else {
            config::load_or_init()?
        };
        tracing::debug!("loaded config: {:?}", cfg);

        let base = match &global.bucket_url {
            Some(url) => BucketUrl::parse(url).context("--bucket-url")?,
            None => cfg.bucket_url()?,
        };
        let output_dir = match global.output_dir.clone().or(cfg.output_dir.clone()) {
            Some(dir) => dir,
            None => std::env::current_dir()?,
        };
        Ok(Self {
            bucket: Bucket::new(base),
            order: cfg.list_order.into(),
            output_dir,
        })
    }

    fn order_or(&self, arg: Option<OrderArg>) -> Order {
        arg.map(Order::from).unwrap_or(self.order)
    }

    /// Fetch the catalog. Nothing can be selected if this fails.
    fn catalog(&self) -> Result<VersionCatalog> {
        self.bucket
            .fetch_catalog()
            .with_context(|| format!("could not load the version list from {}", self.bucket.base_url()))
    }
}

/// Resolve a selector against the catalog.
pub(crate) fn select<'c>(
    catalog: &'c VersionCatalog,
    selector: &Selector,
    order: Order,
) -> Result<&'c VersionEntry> {
    let entry = match (&selector.build, selector.index) {
        (Some(version), _) => catalog.entry_by_version(version)?,
        (None, Some(index)) => catalog.entry_by_position(index, order, Base::One)?,
        (None, None) => anyhow::bail!("specify a version or --index"),
    };
    Ok(entry)
}

impl CliCommand {
    pub fn run_from_args() -> Result<Outcome> {
        let cli = Cli::parse();
        let session = Session::from_args(&cli.global)?;

        match cli.command {
            CliCommand::List { order, json } => {
                run_list(&session, session.order_or(order), json)?;
                Ok(Outcome::Done)
            }
            CliCommand::Info { selector, order } => {
                run_info(&session, &selector, session.order_or(order))?;
                Ok(Outcome::Done)
            }
            CliCommand::Get {
                selector,
                order,
                output,
                yes,
            } => run_get(&session, &selector, session.order_or(order), output, yes),
            CliCommand::Pick => run_pick(&session),
        }
    }
}

#[cfg(test)]
mod tests;
