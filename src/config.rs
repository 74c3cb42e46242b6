//! Configuration primitives for the media gallery.
//!
//! Stored in a machine-readable TOML file located at
//! `<gallery root>/config/config.toml`, where the gallery root is resolved
//! from the `MEDIABASE_HOME` environment variable or the OS data directory.
//! The config tracks upload limits, the extension allow-list, and the
//! categories seeded on first run.

use serde::{Deserialize, Serialize};

/// Root configuration persisted per installation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GalleryConfig {
    /// Secret required by the HTTP layer for mutating endpoints. `None`
    /// means uploads are rejected outright (the gate fails closed).
    #[serde(default)]
    pub upload_token: Option<String>,
    /// Lowercase file extensions accepted into the gallery.
    #[serde(default = "default_allowed_extensions")]
    pub allowed_extensions: Vec<String>,
    /// Per-file upload ceiling in bytes.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: u64,
    /// Maximum number of files streamed to disk concurrently per batch.
    #[serde(default = "default_max_parallel_uploads")]
    pub max_parallel_uploads: u32,
    /// Categories created on first run if missing.
    #[serde(default)]
    pub seed_categories: Vec<SeedCategory>,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            upload_token: None,
            allowed_extensions: default_allowed_extensions(),
            max_upload_bytes: default_max_upload_bytes(),
            max_parallel_uploads: default_max_parallel_uploads(),
            seed_categories: Vec::new(),
        }
    }
}

/// Category definition applied to the store on first run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedCategory {
    pub name: String,
    /// Storage subdirectory; defaults to the normalized name.
    #[serde(default)]
    pub path: Option<String>,
}

fn default_allowed_extensions() -> Vec<String> {
    ["jpg", "jpeg", "png", "gif", "webp", "mp4", "mov", "mkv", "avi"]
        .into_iter()
        .map(str::to_string)
        .collect()
}

const fn default_max_upload_bytes() -> u64 {
    200 * 1024 * 1024
}

const fn default_max_parallel_uploads() -> u32 {
    4
}

/// Standard relative path to the config file (under the config directory).
pub const CONFIG_FILE_NAME: &str = "config.toml";

use anyhow::{Context, Result};
use directories::BaseDirs;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Returns the root directory where the gallery stores data.
///
/// Order of precedence:
/// 1. `MEDIABASE_HOME` environment variable.
/// 2. OS-specific data directory via `directories::BaseDirs`.
pub fn gallery_root() -> Result<PathBuf> {
    if let Ok(path) = env::var("MEDIABASE_HOME") {
        return Ok(PathBuf::from(path));
    }
    let base_dirs = BaseDirs::new().context("Unable to determine OS data directory")?;
    Ok(base_dirs.data_dir().join("Mediabase"))
}

/// Returns the config directory under the gallery root.
pub fn config_dir() -> Result<PathBuf> {
    let root = gallery_root()?;
    Ok(root.join("config"))
}

/// Path to the config file.
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Loads the configuration from disk or returns defaults.
///
/// `MEDIABASE_UPLOAD_TOKEN` overrides the persisted token so the secret can
/// stay out of the config file.
pub fn load_or_default() -> Result<GalleryConfig> {
    let path = config_file_path()?;
    let mut cfg = if path.exists() {
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        toml::from_str(&data).with_context(|| format!("Failed to parse config file {:?}", path))?
    } else {
        GalleryConfig::default()
    };
    if let Ok(token) = env::var("MEDIABASE_UPLOAD_TOKEN") {
        cfg.upload_token = Some(token);
    }
    Ok(cfg)
}

/// Persists the configuration to disk.
pub fn save(config: &GalleryConfig) -> Result<()> {
    let dir = config_dir()?;
    fs::create_dir_all(&dir)?;
    let path = config_file_path()?;
    let data = toml::to_string_pretty(config)?;
    fs::write(&path, data)?;
    Ok(())
}

/// Convenience struct exposing the gallery's on-disk locations.
#[derive(Debug, Clone)]
pub struct GalleryPaths {
    pub root: PathBuf,
    pub media_dir: PathBuf,
    pub categories_file: PathBuf,
    pub links_file: PathBuf,
    pub events_file: PathBuf,
}

impl GalleryPaths {
    pub fn new(root: PathBuf) -> Self {
        Self {
            media_dir: root.join("media"),
            categories_file: root.join("categories.json"),
            links_file: root.join("links.json"),
            events_file: root.join("events.jsonl"),
            root,
        }
    }
}

/// Ensures the gallery directory layout exists and returns its paths.
pub fn ensure_gallery_structure() -> Result<GalleryPaths> {
    ensure_structure_at(gallery_root()?)
}

/// Same as [`ensure_gallery_structure`] for an explicit root.
pub fn ensure_structure_at(root: PathBuf) -> Result<GalleryPaths> {
    let paths = GalleryPaths::new(root);
    fs::create_dir_all(&paths.root)?;
    fs::create_dir_all(&paths.media_dir)?;
    Ok(paths)
}
