use mediabase::{Gallery, GalleryConfig};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub struct GalleryHarness {
    root: TempDir,
}

impl GalleryHarness {
    pub fn new() -> Self {
        let root = TempDir::new().expect("failed to create temp gallery root");
        Self { root }
    }

    pub fn root_path(&self) -> &Path {
        self.root.path()
    }

    pub fn media_dir(&self) -> PathBuf {
        self.root.path().join("media")
    }

    pub fn gallery(&self) -> Gallery {
        self.gallery_with(GalleryConfig::default())
    }

    pub fn gallery_with(&self, config: GalleryConfig) -> Gallery {
        Gallery::with_root(self.root.path(), config).expect("failed to open gallery")
    }

    /// Drops a file into the media tree without going through the pipeline.
    pub fn write_media(&self, relative: &str, bytes: &[u8]) -> PathBuf {
        let path = self.media_dir().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("failed to create media subdirectory");
        }
        fs::write(&path, bytes).expect("failed to write media file");
        path
    }
}

mod catalog_listing;
mod links_crud;
mod path_resolution;
