//! Core of shopfetch: bucket listing catalog and verified download engine.
//!
//! Shells call [`bucket::Bucket`] to fetch a [`catalog::VersionCatalog`],
//! pick an entry, and stream it to disk with [`downloader`].

pub mod config;
pub mod logging;

pub mod bucket;
pub mod catalog;
pub mod downloader;
pub mod error;
mod http;
pub mod listing;
pub mod progress;

pub use bucket::{Bucket, BucketUrl, VersionSummary};
pub use catalog::{Base, Order, VersionCatalog, VersionEntry};
pub use downloader::{DownloadResult, Verdict};
pub use error::{Error, ParseError, Result, TransportError};
pub use progress::{NoProgress, ProgressSink};
