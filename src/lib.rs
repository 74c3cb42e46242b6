pub mod auth;
pub mod batch;
pub mod catalog;
pub mod config;
pub mod error;
pub mod events;
pub mod gallery;
pub mod paths;
pub mod store;

// Re-export commonly used types for convenience.
pub use batch::{BatchStatus, DeleteReport, ItemStatus, UploadItem, UploadReport};
pub use catalog::{MediaItem, LINK_REF_PREFIX};
pub use config::GalleryConfig;
pub use error::{ErrorKind, GalleryError};
pub use gallery::{Gallery, MediaFileHandle};
pub use store::{Category, CategoryStore, LinkRecord, LinkStore};
