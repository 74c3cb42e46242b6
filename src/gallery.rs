//! Top-level gallery object wiring config, stores, resolver, and pipelines.
//!
//! Constructed explicitly (from the OS-level root or an arbitrary directory)
//! and passed down to callers, so tests and embedders can run isolated
//! galleries side by side.

use std::path::{Path, PathBuf};

use serde_json::json;

use crate::auth;
use crate::batch::{
    DeletePipeline, DeleteReport, ItemStatus, UploadItem, UploadPipeline, UploadReport,
};
use crate::catalog::{guess_mime, MediaCatalog, MediaItem};
use crate::config::{self, GalleryConfig, GalleryPaths};
use crate::error::Result;
use crate::events::{EventLog, EventType};
use crate::paths::PathResolver;
use crate::store::{Category, CategoryStore, LinkRecord, LinkStore};

/// Resolved file handed to the HTTP layer for serving.
#[derive(Debug, Clone)]
pub struct MediaFileHandle {
    pub path: PathBuf,
    pub mime_type: String,
}

/// Manages one media collection rooted at a single directory.
pub struct Gallery {
    pub config: GalleryConfig,
    pub paths: GalleryPaths,
    categories: CategoryStore,
    links: LinkStore,
    resolver: PathResolver,
    log: EventLog,
}

impl Gallery {
    /// Opens the gallery at the environment-resolved root with the
    /// persisted configuration.
    pub fn open() -> anyhow::Result<Self> {
        let paths = config::ensure_gallery_structure()?;
        let cfg = config::load_or_default()?;
        Self::wire(paths, cfg)
    }

    /// Opens a gallery at an explicit root with an explicit configuration.
    pub fn with_root(root: &Path, cfg: GalleryConfig) -> anyhow::Result<Self> {
        let paths = config::ensure_structure_at(root.to_path_buf())?;
        Self::wire(paths, cfg)
    }

    fn wire(paths: GalleryPaths, cfg: GalleryConfig) -> anyhow::Result<Self> {
        let resolver = PathResolver::new(&paths.media_dir, cfg.allowed_extensions.clone())?;
        let categories = CategoryStore::open(paths.categories_file.clone());
        categories.seed(&cfg.seed_categories)?;
        let links = LinkStore::open(paths.links_file.clone());
        let log = EventLog::at(paths.events_file.clone());
        Ok(Self {
            config: cfg,
            paths,
            categories,
            links,
            resolver,
            log,
        })
    }

    pub fn categories(&self) -> &CategoryStore {
        &self.categories
    }

    pub fn links(&self) -> &LinkStore {
        &self.links
    }

    pub fn resolver(&self) -> &PathResolver {
        &self.resolver
    }

    pub fn events(&self) -> &EventLog {
        &self.log
    }

    /// Gate for mutating endpoints; see [`auth::token_matches`].
    pub fn token_matches(&self, presented: Option<&str>) -> bool {
        auth::token_matches(self.config.upload_token.as_deref(), presented)
    }

    pub fn list_media(&self, category_filter: Option<&str>) -> Result<Vec<MediaItem>> {
        MediaCatalog::new(&self.resolver, &self.categories, &self.links).list(category_filter)
    }

    /// Resolves one stored file for serving: its absolute path plus the
    /// inferred content type.
    pub fn open_media(&self, relative: &str) -> Result<MediaFileHandle> {
        let path = self.resolver.resolve_existing(relative)?;
        Ok(MediaFileHandle {
            mime_type: guess_mime(&path),
            path,
        })
    }

    pub fn upload(&self, category: Option<&str>, items: Vec<UploadItem>) -> Result<UploadReport> {
        let pipeline = UploadPipeline::new(&self.resolver, &self.categories, &self.config);
        let report = pipeline.run(category, items)?;
        self.log.log(
            EventType::UploadBatchCompleted,
            json!({
                "status": report.status,
                "category": report.category.as_ref().map(|c| c.name.clone()),
                "stored": report
                    .results
                    .iter()
                    .filter_map(|r| r.stored_path.clone())
                    .collect::<Vec<_>>(),
            }),
        )?;
        Ok(report)
    }

    pub fn delete_media(&self, reference: &str) -> Result<String> {
        let deleted = DeletePipeline::new(&self.resolver, &self.links).delete_one(reference)?;
        self.log
            .log(EventType::MediaDeleted, json!({ "path": deleted }))?;
        Ok(deleted)
    }

    pub fn delete_batch(&self, references: &[String]) -> Result<DeleteReport> {
        let report = DeletePipeline::new(&self.resolver, &self.links).run(references)?;
        self.log.log(
            EventType::DeleteBatchCompleted,
            json!({
                "status": report.status,
                "deleted": report
                    .results
                    .iter()
                    .filter(|r| r.status == ItemStatus::Success)
                    .map(|r| r.path.clone())
                    .collect::<Vec<_>>(),
            }),
        )?;
        Ok(report)
    }

    pub fn create_category(&self, name: &str, path: Option<&str>) -> Result<Category> {
        let category = self.categories.add(name, path)?;
        self.log.log(
            EventType::CategoryCreated,
            json!({ "name": category.name, "path": category.path }),
        )?;
        Ok(category)
    }

    pub fn update_category(
        &self,
        name: &str,
        new_name: Option<&str>,
        new_path: Option<&str>,
    ) -> Result<Category> {
        let category = self.categories.update(name, new_name, new_path)?;
        self.log.log(
            EventType::CategoryUpdated,
            json!({ "name": category.name, "path": category.path }),
        )?;
        Ok(category)
    }

    pub fn delete_category(&self, name: &str) -> Result<Category> {
        let removed = self.categories.delete(name)?;
        self.log.log(
            EventType::CategoryDeleted,
            json!({ "name": removed.name, "path": removed.path }),
        )?;
        Ok(removed)
    }

    pub fn add_link(
        &self,
        url: &str,
        name: Option<&str>,
        category: Option<&str>,
    ) -> Result<LinkRecord> {
        let link = self.links.add(&self.categories, url, name, category)?;
        self.log.log(
            EventType::LinkAdded,
            json!({ "id": link.id, "url": link.url, "category": link.category }),
        )?;
        Ok(link)
    }

    pub fn delete_link(&self, id: &str) -> Result<LinkRecord> {
        let removed = self.links.delete(id)?;
        self.log
            .log(EventType::LinkDeleted, json!({ "id": removed.id }))?;
        Ok(removed)
    }
}
