//! Request/response operations consumed by the shells.
//!
//! `Bucket` holds only the validated base URL. The catalog is returned by
//! [`Bucket::fetch_catalog`] and passed back into the selection and download
//! calls; nothing is cached between calls.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use url::Url;

use crate::catalog::{Order, VersionCatalog, VersionEntry};
use crate::downloader::{self, DownloadResult};
use crate::error::{Error, Result};
use crate::listing;
use crate::progress::ProgressSink;

/// Public bucket the Shopper builds are published to.
pub const DEFAULT_BUCKET_URL: &str =
    "https://storage.yandexcloud.net/sbermarker-shopper-distribution/";

/// Validated http(s) bucket root, always ending in `/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketUrl(Url);

impl BucketUrl {
    pub fn parse(raw: &str) -> Result<Self> {
        let invalid = |reason: String| Error::InvalidBucketUrl {
            url: raw.to_string(),
            reason,
        };
        let mut parsed = Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme {:?}", parsed.scheme())));
        }
        if parsed.query().is_some() || parsed.fragment().is_some() {
            return Err(invalid("query and fragment are not allowed".to_string()));
        }
        if !parsed.path().ends_with('/') {
            let path = format!("{}/", parsed.path());
            parsed.set_path(&path);
        }
        Ok(Self(parsed))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Download URL of an object: the base URL followed by the key.
    ///
    /// Each `/`-separated part of the key is percent-encoded as a path
    /// segment. Empty parts are kept, so a leading `/` in the key yields `//`.
    pub fn object_url(&self, object_key: &str) -> String {
        let mut url = self.0.clone();
        // http(s) URLs always have path segments.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(object_key.split('/'));
        }
        url.into()
    }
}

impl fmt::Display for BucketUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a shell shows for one version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionSummary {
    pub version: String,
    pub last_modified: DateTime<Utc>,
    pub size_bytes: u64,
}

impl From<&VersionEntry> for VersionSummary {
    fn from(e: &VersionEntry) -> Self {
        Self {
            version: e.version.clone(),
            last_modified: e.last_modified,
            size_bytes: e.size_bytes,
        }
    }
}

/// File name a version is saved under.
pub fn output_file_name(version: &str) -> String {
    format!("Shopper_{version}.apk")
}

/// `dir/Shopper_<version>.apk`.
pub fn default_destination(dir: &Path, version: &str) -> PathBuf {
    dir.join(output_file_name(version))
}

#[derive(Debug, Clone)]
pub struct Bucket {
    base: BucketUrl,
}

impl Bucket {
    pub fn new(base: BucketUrl) -> Self {
        Self { base }
    }

    pub fn base_url(&self) -> &BucketUrl {
        &self.base
    }

    /// Fetch and parse the listing. Either the whole catalog or an error.
    pub fn fetch_catalog(&self) -> Result<VersionCatalog> {
        let raw = listing::fetch_listing(self.base.as_str())?;
        let catalog = VersionCatalog::from_listing(&raw)?;
        tracing::debug!(entries = catalog.len(), "catalog built");
        Ok(catalog)
    }

    pub fn list_versions(&self, catalog: &VersionCatalog, order: Order) -> Vec<VersionSummary> {
        catalog.iter_in(order).map(VersionSummary::from).collect()
    }

    /// Download URL of the first catalog entry carrying `version`.
    pub fn resolve_download_url(&self, catalog: &VersionCatalog, version: &str) -> Result<String> {
        let entry = catalog.entry_by_version(version)?;
        Ok(self.entry_url(entry))
    }

    pub fn entry_url(&self, entry: &VersionEntry) -> String {
        self.base.object_url(&entry.object_key)
    }

    /// Stream `url` to `dest`. Verification uses the response `Content-Length` only.
    pub fn download(
        &self,
        url: &str,
        dest: &Path,
        progress: &mut dyn ProgressSink,
    ) -> Result<DownloadResult> {
        downloader::download(url, dest, progress)
    }

    /// Download a catalog entry; its listed size stands in for a missing
    /// `Content-Length`.
    pub fn download_entry(
        &self,
        entry: &VersionEntry,
        dest: &Path,
        progress: &mut dyn ProgressSink,
    ) -> Result<DownloadResult> {
        downloader::download_with_declared_size(
            &self.entry_url(entry),
            dest,
            Some(entry.size_bytes),
            progress,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::derive_version;
    use chrono::TimeZone;

    fn catalog() -> VersionCatalog {
        let entry = |key: &str, size| VersionEntry {
            version: derive_version(key),
            object_key: key.to_string(),
            last_modified: Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap(),
            size_bytes: size,
        };
        VersionCatalog::new(vec![
            entry("builds/shopper-1.0.apk", 1_048_576),
            entry("builds/shopper-2.0.apk", 2_097_152),
        ])
    }

    #[test]
    fn bucket_url_gets_trailing_slash() {
        let u = BucketUrl::parse("https://example.com/bucket").unwrap();
        assert_eq!(u.as_str(), "https://example.com/bucket/");
        let u = BucketUrl::parse("http://127.0.0.1:8080/").unwrap();
        assert_eq!(u.as_str(), "http://127.0.0.1:8080/");
    }

    #[test]
    fn bucket_url_rejects_bad_input() {
        assert!(BucketUrl::parse("not a url").is_err());
        assert!(BucketUrl::parse("ftp://example.com/").is_err());
        assert!(BucketUrl::parse("https://example.com/?list-type=2").is_err());
    }

    #[test]
    fn default_bucket_url_is_valid() {
        let u = BucketUrl::parse(DEFAULT_BUCKET_URL).unwrap();
        assert_eq!(u.as_str(), DEFAULT_BUCKET_URL);
    }

    #[test]
    fn object_url_percent_encodes_key_segments() {
        let u = BucketUrl::parse("http://h/b/").unwrap();
        assert_eq!(
            u.object_url("builds/shopper 1.0.apk"),
            "http://h/b/builds/shopper%201.0.apk"
        );
        assert_eq!(u.object_url("a/#1?.apk"), "http://h/b/a/%231%3F.apk");
        assert_eq!(u.object_url("100%.apk"), "http://h/b/100%25.apk");
    }

    #[test]
    fn object_url_keeps_leading_slash_of_key() {
        let u = BucketUrl::parse("http://h/b/").unwrap();
        assert_eq!(u.object_url("/x/shopper-1.apk"), "http://h/b//x/shopper-1.apk");
        let root = BucketUrl::parse("http://127.0.0.1:8080").unwrap();
        assert_eq!(root.object_url("a.apk"), "http://127.0.0.1:8080/a.apk");
    }

    #[test]
    fn list_versions_in_both_orders() {
        let bucket = Bucket::new(BucketUrl::parse(DEFAULT_BUCKET_URL).unwrap());
        let c = catalog();
        let forward: Vec<_> = bucket
            .list_versions(&c, Order::Listing)
            .into_iter()
            .map(|s| s.version)
            .collect();
        let recent: Vec<_> = bucket
            .list_versions(&c, Order::RecentFirst)
            .into_iter()
            .map(|s| s.version)
            .collect();
        assert_eq!(forward, ["1.0", "2.0"]);
        assert_eq!(recent, ["2.0", "1.0"]);
    }

    #[test]
    fn resolve_url_appends_object_key() {
        let base = BucketUrl::parse("https://example.com/bucket/").unwrap();
        let bucket = Bucket::new(base);
        let c = catalog();
        let selected = c.entry_by_recent_index(0).unwrap();
        assert_eq!(selected.version, "2.0");
        assert_eq!(
            bucket.resolve_download_url(&c, &selected.version).unwrap(),
            "https://example.com/bucket/builds/shopper-2.0.apk"
        );
        assert!(matches!(
            bucket.resolve_download_url(&c, "3.0"),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn output_names() {
        assert_eq!(output_file_name("2.0"), "Shopper_2.0.apk");
        assert_eq!(
            default_destination(Path::new("/tmp/x"), "1.0"),
            Path::new("/tmp/x/Shopper_1.0.apk")
        );
    }
}
