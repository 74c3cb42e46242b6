//! Read-time projection of the media tree plus both metadata stores.
//!
//! The catalog owns no state: every listing is a full re-scan of the media
//! root cross-referenced against the category index, with link records
//! merged in as pseudo-files. The filesystem stays the source of truth.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;
use walkdir::WalkDir;

use crate::error::Result;
use crate::paths::PathResolver;
use crate::store::{normalize_label, CategoryStore, LinkStore};

/// Prefix marking a catalog path as a link reference instead of a file.
pub const LINK_REF_PREFIX: &str = "link:";

const LINK_MIME_TYPE: &str = "text/html";

/// One gallery entry: either a stored file or an external link.
#[derive(Debug, Clone, Serialize)]
pub struct MediaItem {
    pub name: String,
    /// Relative media path, or `link:<id>` for link entries.
    pub path: String,
    pub category: Option<String>,
    pub category_path: Option<String>,
    pub size: u64,
    pub modified: DateTime<Utc>,
    pub mime_type: String,
    /// Serving URL for files; the external URL for links.
    pub url: String,
}

pub struct MediaCatalog<'a> {
    resolver: &'a PathResolver,
    categories: &'a CategoryStore,
    links: &'a LinkStore,
}

impl<'a> MediaCatalog<'a> {
    pub fn new(
        resolver: &'a PathResolver,
        categories: &'a CategoryStore,
        links: &'a LinkStore,
    ) -> Self {
        Self {
            resolver,
            categories,
            links,
        }
    }

    /// Lists every allow-listed file under the media root plus all links,
    /// newest first. A filter that matches nothing yields an empty list; a
    /// filter that normalizes to nothing behaves as no filter.
    pub fn list(&self, category_filter: Option<&str>) -> Result<Vec<MediaItem>> {
        let filter = category_filter.and_then(normalize_label);
        let category_index = self.categories.list()?;
        let mut items = Vec::new();

        for entry in WalkDir::new(self.resolver.media_root())
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if !entry.file_type().is_file() || !self.resolver.is_allowed_file(entry.path()) {
                continue;
            }
            let Some(relative) = self.resolver.relative_label(entry.path()) else {
                continue;
            };
            let category_path = relative
                .split_once('/')
                .map(|(first, _)| first.to_string());
            let category = category_path.as_deref().map(|dir| {
                category_index
                    .iter()
                    .find(|c| c.path == dir)
                    .map(|c| c.name.clone())
                    // Unknown directories still list, labeled by folder name.
                    .unwrap_or_else(|| dir.to_string())
            });

            if let Some(wanted) = &filter {
                if category.as_deref() != Some(wanted.as_str()) {
                    continue;
                }
            }

            let metadata = entry.metadata().map_err(|e| {
                e.into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("metadata unavailable"))
            })?;
            let modified = metadata
                .modified()
                .map(DateTime::<Utc>::from)
                .unwrap_or_else(|_| Utc::now());
            let name = entry.file_name().to_string_lossy().to_string();

            items.push(MediaItem {
                mime_type: guess_mime(entry.path()),
                url: format!("/media/{relative}"),
                path: relative,
                category,
                category_path,
                size: metadata.len(),
                modified,
                name,
            });
        }

        for link in self.links.list()? {
            if let Some(wanted) = &filter {
                if link.category.as_deref() != Some(wanted.as_str()) {
                    continue;
                }
            }
            items.push(MediaItem {
                name: link.name,
                path: format!("{LINK_REF_PREFIX}{}", link.id),
                category: link.category,
                category_path: link.category_path,
                size: 0,
                modified: link.added,
                mime_type: LINK_MIME_TYPE.to_string(),
                url: link.url,
            });
        }

        items.sort_by(|a, b| b.modified.cmp(&a.modified));
        Ok(items)
    }
}

/// Content type inferred from the file name, octet-stream when unknown.
pub fn guess_mime(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}
