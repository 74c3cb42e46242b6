//! Path resolution for the media root.
//!
//! All user-supplied filenames and relative paths pass through here before
//! any filesystem access. Produced paths are canonicalized and checked
//! against the canonical media root, so symlinked directories cannot smuggle
//! writes or reads outside the tree.

use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::error::{GalleryError, Result};

pub struct PathResolver {
    media_root: PathBuf,
    allowed_extensions: Vec<String>,
}

impl PathResolver {
    /// The media root must already exist; it is canonicalized once here.
    pub fn new(media_root: &Path, allowed_extensions: Vec<String>) -> Result<Self> {
        Ok(Self {
            media_root: media_root.canonicalize()?,
            allowed_extensions,
        })
    }

    pub fn media_root(&self) -> &Path {
        &self.media_root
    }

    /// Whether the file name carries an allow-listed extension.
    pub fn is_allowed_file(&self, name: &Path) -> bool {
        name.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                let ext = ext.to_ascii_lowercase();
                self.allowed_extensions.iter().any(|a| *a == ext)
            })
            .unwrap_or(false)
    }

    /// Resolves a collision-free target for an upload into the media root or
    /// one of its direct subdirectories. On collision the stem gains `_1`,
    /// `_2`, ... until a free path is found; the counter has no upper bound
    /// and is only safe under single-process sequencing.
    pub fn resolve_upload_target(&self, filename: &str, target_dir: Option<&str>) -> Result<PathBuf> {
        let safe_name = safe_file_name(filename)?;
        let stem = safe_name
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| GalleryError::InvalidName(filename.to_string()))?;
        let extension = safe_name.extension().and_then(|e| e.to_str());

        let dir = match target_dir {
            Some(sub) => {
                // Category paths are direct children of the root, never
                // nested, so anything but a single normal component is an
                // escape attempt.
                let mut components = Path::new(sub).components();
                match (components.next(), components.next()) {
                    (Some(Component::Normal(_)), None) => {}
                    _ => return Err(GalleryError::PathTraversal(sub.to_string())),
                }
                self.media_root.join(sub)
            }
            None => self.media_root.clone(),
        };
        fs::create_dir_all(&dir)?;
        let dir = dir.canonicalize()?;
        if !dir.starts_with(&self.media_root) {
            return Err(GalleryError::PathTraversal(filename.to_string()));
        }

        let mut counter = 0u32;
        loop {
            let candidate_name = match (counter, extension) {
                (0, _) => safe_name.as_os_str().to_os_string(),
                (n, Some(ext)) => format!("{stem}_{n}.{ext}").into(),
                (n, None) => format!("{stem}_{n}").into(),
            };
            let candidate = dir.join(candidate_name);
            if !candidate.exists() {
                return Ok(candidate);
            }
            counter += 1;
        }
    }

    /// Resolves a relative path to an existing, allow-listed file inside the
    /// media root. Missing files report `NotFound` before the extension
    /// check so callers can distinguish absent paths from disallowed ones.
    pub fn resolve_existing(&self, relative: &str) -> Result<PathBuf> {
        if relative.is_empty() {
            return Err(GalleryError::InvalidName(relative.to_string()));
        }
        for component in Path::new(relative).components() {
            match component {
                Component::Normal(_) => {}
                _ => return Err(GalleryError::PathTraversal(relative.to_string())),
            }
        }

        let joined = self.media_root.join(relative);
        if !joined.is_file() {
            return Err(GalleryError::NotFound(relative.to_string()));
        }
        let canonical = joined.canonicalize()?;
        if !canonical.starts_with(&self.media_root) {
            return Err(GalleryError::PathTraversal(relative.to_string()));
        }
        if !self.is_allowed_file(&canonical) {
            return Err(GalleryError::DisallowedType(relative.to_string()));
        }
        Ok(canonical)
    }

    /// The `/`-separated path of `absolute` relative to the media root.
    pub fn relative_label(&self, absolute: &Path) -> Option<String> {
        absolute.strip_prefix(&self.media_root).ok().map(|rel| {
            rel.components()
                .filter_map(|c| c.as_os_str().to_str())
                .collect::<Vec<_>>()
                .join("/")
        })
    }
}

/// Validates that a filename is a bare name: non-empty, with a stem, and
/// identical to its own `file_name()` (so separators and traversal
/// sequences are rejected rather than stripped).
fn safe_file_name(filename: &str) -> Result<PathBuf> {
    let path = Path::new(filename);
    let base = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| GalleryError::InvalidName(filename.to_string()))?;
    if base != filename {
        return Err(GalleryError::InvalidName(filename.to_string()));
    }
    if path.file_stem().map_or(true, |s| s.is_empty()) {
        return Err(GalleryError::InvalidName(filename.to_string()));
    }
    Ok(PathBuf::from(base))
}
