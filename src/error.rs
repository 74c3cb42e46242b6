use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GalleryError>;

/// Every way a gallery operation can fail, one variant per contract kind.
#[derive(Debug, Error)]
pub enum GalleryError {
    #[error("Invalid name: {0}")]
    InvalidName(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Category name already exists: {0}")]
    DuplicateName(String),

    #[error("Category path already exists: {0}")]
    DuplicatePath(String),

    #[error("Link URL already exists: {0}")]
    DuplicateUrl(String),

    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Path escapes the media root: {0}")]
    PathTraversal(String),

    #[error("File type not allowed: {0}")]
    DisallowedType(String),

    #[error("File exceeds the maximum size of {limit} bytes")]
    TooLarge { limit: u64 },

    #[error("Filesystem error: {0}")]
    Io(#[from] std::io::Error),
}

impl GalleryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GalleryError::InvalidName(_) => ErrorKind::InvalidName,
            GalleryError::InvalidUrl(_) => ErrorKind::InvalidUrl,
            GalleryError::DuplicateName(_) => ErrorKind::DuplicateName,
            GalleryError::DuplicatePath(_) => ErrorKind::DuplicatePath,
            GalleryError::DuplicateUrl(_) => ErrorKind::DuplicateUrl,
            GalleryError::UnknownCategory(_) => ErrorKind::UnknownCategory,
            GalleryError::NotFound(_) => ErrorKind::NotFound,
            GalleryError::PathTraversal(_) => ErrorKind::PathTraversal,
            GalleryError::DisallowedType(_) => ErrorKind::DisallowedType,
            GalleryError::TooLarge { .. } => ErrorKind::TooLarge,
            GalleryError::Io(_) => ErrorKind::IoFailure,
        }
    }
}

impl From<serde_json::Error> for GalleryError {
    fn from(err: serde_json::Error) -> Self {
        GalleryError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, err))
    }
}

/// Plain kind tag carried alongside per-item batch outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidName,
    InvalidUrl,
    DuplicateName,
    DuplicatePath,
    DuplicateUrl,
    UnknownCategory,
    NotFound,
    PathTraversal,
    DisallowedType,
    TooLarge,
    IoFailure,
}
