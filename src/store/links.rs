use std::path::PathBuf;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use url::Url;

use super::{read_json_array, write_json_atomic, CategoryStore};
use crate::error::{GalleryError, Result};

/// An external HTTPS bookmark shown alongside stored media. Records are
/// created and deleted, never mutated in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRecord {
    pub id: String,
    pub name: String,
    pub url: String,
    pub domain: String,
    pub category: Option<String>,
    pub category_path: Option<String>,
    pub added: DateTime<Utc>,
}

/// On-disk store for link records, persisted as one JSON document with the
/// same atomic-rewrite discipline as the category store.
pub struct LinkStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl LinkStore {
    pub fn open(path: PathBuf) -> Self {
        Self {
            path,
            lock: Mutex::new(()),
        }
    }

    fn load(&self) -> Result<Vec<LinkRecord>> {
        read_json_array(&self.path)
    }

    fn persist(&self, records: &[LinkRecord]) -> Result<()> {
        write_json_atomic(&self.path, records)
    }

    pub fn list(&self) -> Result<Vec<LinkRecord>> {
        let _guard = self.lock.lock().unwrap();
        self.load()
    }

    pub fn get(&self, id: &str) -> Result<Option<LinkRecord>> {
        let _guard = self.lock.lock().unwrap();
        Ok(self.load()?.into_iter().find(|l| l.id == id))
    }

    /// Adds a link. The URL must be absolute HTTPS with a host; an optional
    /// category is resolved against the category store by name or path and
    /// denormalized onto the record. The display name defaults to the host.
    pub fn add(
        &self,
        categories: &CategoryStore,
        url: &str,
        name: Option<&str>,
        category: Option<&str>,
    ) -> Result<LinkRecord> {
        let parsed =
            Url::parse(url).map_err(|_| GalleryError::InvalidUrl(url.to_string()))?;
        if parsed.scheme() != "https" {
            return Err(GalleryError::InvalidUrl(url.to_string()));
        }
        let domain = parsed
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| GalleryError::InvalidUrl(url.to_string()))?
            .to_string();

        let resolved = match category {
            Some(raw) => Some(
                categories
                    .resolve(raw)?
                    .ok_or_else(|| GalleryError::UnknownCategory(raw.to_string()))?,
            ),
            None => None,
        };

        // Dedup against the parsed form so trailing-slash and port
        // normalization collapse, without case-folding the path.
        let canonical = parsed.to_string();

        let _guard = self.lock.lock().unwrap();
        let mut records = self.load()?;
        if records.iter().any(|l| l.url == canonical) {
            return Err(GalleryError::DuplicateUrl(canonical));
        }

        let link = LinkRecord {
            id: format!("{:016x}", rand::thread_rng().gen::<u64>()),
            name: name
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| domain.clone()),
            url: canonical,
            domain,
            category: resolved.as_ref().map(|c| c.name.clone()),
            category_path: resolved.as_ref().map(|c| c.path.clone()),
            added: Utc::now(),
        };
        records.push(link.clone());
        self.persist(&records)?;
        Ok(link)
    }

    /// Removes a link by id and returns the removed record.
    pub fn delete(&self, id: &str) -> Result<LinkRecord> {
        let _guard = self.lock.lock().unwrap();
        let mut records = self.load()?;
        let index = records
            .iter()
            .position(|l| l.id == id)
            .ok_or_else(|| GalleryError::NotFound(id.to_string()))?;
        let removed = records.remove(index);
        self.persist(&records)?;
        Ok(removed)
    }
}
