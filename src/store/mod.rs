//! Durable metadata stores backing the gallery.
//!
//! Each store owns one JSON document (an array of records) as its sole
//! persistent state. Documents are rewritten whole on every mutation via a
//! temporary sibling file and an atomic rename, so a concurrent reader never
//! observes a half-written document.

mod categories;
mod links;

pub use categories::{Category, CategoryStore};
pub use links::{LinkRecord, LinkStore};

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Cleans a category label: keeps alphanumerics, hyphen, underscore, and
/// spaces, then collapses whitespace runs into single underscores. Case is
/// preserved. Returns `None` when nothing survives cleaning.
pub fn normalize_label(raw: &str) -> Option<String> {
    let kept: String = raw
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ' '))
        .collect();
    let normalized = kept.split_whitespace().collect::<Vec<_>>().join("_");
    if normalized.is_empty() {
        None
    } else {
        Some(normalized)
    }
}

fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}

/// Loads a JSON array document, treating a missing file as empty.
pub(crate) fn read_json_array<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let data = fs::read(path)?;
    Ok(serde_json::from_slice(&data)?)
}

/// Rewrites a JSON document through a temporary file and an atomic rename.
pub(crate) fn write_json_atomic<T: Serialize>(path: &Path, records: &[T]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = temp_sibling(path);
    fs::write(&tmp, serde_json::to_vec_pretty(records)?)?;
    fs::rename(&tmp, path)?;
    Ok(())
}
