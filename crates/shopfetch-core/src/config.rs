use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::bucket::{BucketUrl, DEFAULT_BUCKET_URL};
use crate::catalog::Order;

/// Default numbering for `list` and index selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListOrder {
    /// Last listed build first.
    #[default]
    Recent,
    /// Listing document order.
    Listing,
}

impl From<ListOrder> for Order {
    fn from(o: ListOrder) -> Self {
        match o {
            ListOrder::Recent => Order::RecentFirst,
            ListOrder::Listing => Order::Listing,
        }
    }
}

/// Global configuration loaded from `~/.config/shopfetch/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopfetchConfig {
    /// Bucket root that serves the listing and the builds.
    pub bucket_url: String,
    /// Directory downloads are saved to (None = current directory).
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    /// Numbering used by `list` and `--index`.
    #[serde(default)]
    pub list_order: ListOrder,
}

impl Default for ShopfetchConfig {
    fn default() -> Self {
        Self {
            bucket_url: DEFAULT_BUCKET_URL.to_string(),
            output_dir: None,
            list_order: ListOrder::default(),
        }
    }
}

impl ShopfetchConfig {
    pub fn bucket_url(&self) -> Result<BucketUrl> {
        BucketUrl::parse(&self.bucket_url).context("bucket_url in config")
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("shopfetch")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<ShopfetchConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = ShopfetchConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)
        .with_context(|| format!("read {}", path.display()))?;
    let cfg: ShopfetchConfig =
        toml::from_str(&data).with_context(|| format!("parse {}", path.display()))?;
    cfg.bucket_url()?;
    Ok(cfg)
}
