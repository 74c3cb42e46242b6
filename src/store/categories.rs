use std::path::PathBuf;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use super::{normalize_label, read_json_array, write_json_atomic};
use crate::config::SeedCategory;
use crate::error::{GalleryError, Result};

/// A named storage subdirectory of the media root. `name` is the display
/// label, `path` the on-disk folder name; both are unique across the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub path: String,
}

/// On-disk store for category records, persisted as one JSON document.
///
/// Mutations run load -> check -> mutate -> persist under an internal lock
/// so concurrent adds cannot both pass the uniqueness checks.
pub struct CategoryStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl CategoryStore {
    pub fn open(path: PathBuf) -> Self {
        Self {
            path,
            lock: Mutex::new(()),
        }
    }

    fn load(&self) -> Result<Vec<Category>> {
        read_json_array(&self.path)
    }

    fn persist(&self, records: &[Category]) -> Result<()> {
        write_json_atomic(&self.path, records)
    }

    pub fn list(&self) -> Result<Vec<Category>> {
        let _guard = self.lock.lock().unwrap();
        self.load()
    }

    pub fn get_by_name(&self, name: &str) -> Result<Option<Category>> {
        let Some(normalized) = normalize_label(name) else {
            return Ok(None);
        };
        let _guard = self.lock.lock().unwrap();
        Ok(self.load()?.into_iter().find(|c| c.name == normalized))
    }

    pub fn get_by_path(&self, path: &str) -> Result<Option<Category>> {
        let Some(normalized) = normalize_label(path) else {
            return Ok(None);
        };
        let _guard = self.lock.lock().unwrap();
        Ok(self.load()?.into_iter().find(|c| c.path == normalized))
    }

    /// Looks a category up by display name first, then by storage path.
    pub fn resolve(&self, label: &str) -> Result<Option<Category>> {
        match self.get_by_name(label)? {
            Some(category) => Ok(Some(category)),
            None => self.get_by_path(label),
        }
    }

    /// Adds a category. The storage path defaults to the normalized name.
    pub fn add(&self, name: &str, path: Option<&str>) -> Result<Category> {
        let normalized_name =
            normalize_label(name).ok_or_else(|| GalleryError::InvalidName(name.to_string()))?;
        let normalized_path = normalize_label(path.unwrap_or(&normalized_name))
            .ok_or_else(|| GalleryError::InvalidName(path.unwrap_or_default().to_string()))?;

        let _guard = self.lock.lock().unwrap();
        let mut records = self.load()?;
        if records.iter().any(|c| c.name == normalized_name) {
            return Err(GalleryError::DuplicateName(normalized_name));
        }
        if records.iter().any(|c| c.path == normalized_path) {
            return Err(GalleryError::DuplicatePath(normalized_path));
        }
        let category = Category {
            name: normalized_name,
            path: normalized_path,
        };
        records.push(category.clone());
        self.persist(&records)?;
        Ok(category)
    }

    /// Removes a category by name and returns the removed record. Stored
    /// files under its directory are left in place.
    pub fn delete(&self, name: &str) -> Result<Category> {
        let normalized =
            normalize_label(name).ok_or_else(|| GalleryError::NotFound(name.to_string()))?;
        let _guard = self.lock.lock().unwrap();
        let mut records = self.load()?;
        let index = records
            .iter()
            .position(|c| c.name == normalized)
            .ok_or_else(|| GalleryError::NotFound(normalized.clone()))?;
        let removed = records.remove(index);
        self.persist(&records)?;
        Ok(removed)
    }

    /// Renames a category and/or relocates its storage path. Unsupplied
    /// fields keep their current values. Relocating the path does not move
    /// files already stored under the old directory.
    pub fn update(
        &self,
        name: &str,
        new_name: Option<&str>,
        new_path: Option<&str>,
    ) -> Result<Category> {
        let normalized =
            normalize_label(name).ok_or_else(|| GalleryError::NotFound(name.to_string()))?;
        let _guard = self.lock.lock().unwrap();
        let mut records = self.load()?;
        let index = records
            .iter()
            .position(|c| c.name == normalized)
            .ok_or_else(|| GalleryError::NotFound(normalized.clone()))?;

        let candidate_name = match new_name {
            Some(raw) => {
                normalize_label(raw).ok_or_else(|| GalleryError::InvalidName(raw.to_string()))?
            }
            None => records[index].name.clone(),
        };
        let candidate_path = match new_path {
            Some(raw) => {
                normalize_label(raw).ok_or_else(|| GalleryError::InvalidName(raw.to_string()))?
            }
            None => records[index].path.clone(),
        };

        for (i, existing) in records.iter().enumerate() {
            if i == index {
                continue;
            }
            if existing.name == candidate_name {
                return Err(GalleryError::DuplicateName(candidate_name));
            }
            if existing.path == candidate_path {
                return Err(GalleryError::DuplicatePath(candidate_path));
            }
        }

        records[index].name = candidate_name;
        records[index].path = candidate_path;
        let updated = records[index].clone();
        self.persist(&records)?;
        Ok(updated)
    }

    /// Applies first-run seeds, skipping any whose name or path is taken.
    pub fn seed(&self, seeds: &[SeedCategory]) -> Result<()> {
        for seed in seeds {
            match self.add(&seed.name, seed.path.as_deref()) {
                Ok(_) => {}
                Err(GalleryError::DuplicateName(_)) | Err(GalleryError::DuplicatePath(_)) => {}
                Err(err) => return Err(err),
            }
        }
        Ok(())
    }
}
