use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default output directory, relative to the working directory.
pub const DEFAULT_OUTPUT_DIR: &str = "Fetched_Images";

/// Hard ceiling on body size (20 MiB).
pub const DEFAULT_MAX_BYTES: u64 = 20 * 1024 * 1024;

/// Pipeline configuration loaded from `~/.config/imgfetch/config.toml`.
///
/// Every field has a default, so a partial file is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Directory files are written into. Created on first use.
    pub output_dir: PathBuf,
    /// Maximum accepted body size in bytes, enforced against the bytes actually received.
    pub max_bytes: u64,
    /// Total per-request timeout in seconds.
    pub timeout_secs: u64,
    /// `User-Agent` sent with every request.
    pub user_agent: String,
    /// URL path extensions (without dot, lowercase) that are refused before any request.
    pub denied_extensions: Vec<String>,
    /// Accepted `Content-Type` values (without parameters).
    pub allowed_content_types: Vec<String>,
    /// Prefix for synthesized filenames (`<prefix>_<digest8><ext>`).
    pub filename_prefix: String,
    /// Maximum filename length in characters.
    pub max_filename_len: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            max_bytes: DEFAULT_MAX_BYTES,
            timeout_secs: 15,
            user_agent: format!(
                "imgfetch/{} (+image fetcher)",
                env!("CARGO_PKG_VERSION")
            ),
            denied_extensions: [
                "exe", "bat", "cmd", "sh", "php", "js", "html", "htm", "vbs", "scr", "pif",
                "com", "jar", "bin", "cpl", "hta",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            allowed_content_types: [
                "image/jpeg",
                "image/png",
                "image/gif",
                "image/webp",
                "image/bmp",
                "image/tiff",
                "image/svg+xml",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            filename_prefix: "image".to_string(),
            max_filename_len: 100,
        }
    }
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("imgfetch")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<FetchConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = FetchConfig::default();
        let toml = to_toml(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    load_from(&path)
}

/// Load configuration from an explicit path. The file must exist.
pub fn load_from(path: &Path) -> Result<FetchConfig> {
    let data =
        fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
    let cfg: FetchConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    Ok(cfg)
}

/// Render a config as the TOML that `load_from` accepts.
pub fn to_toml(cfg: &FetchConfig) -> Result<String> {
    Ok(toml::to_string_pretty(cfg)?)
}
