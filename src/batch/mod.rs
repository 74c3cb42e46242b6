//! Multi-item upload and delete orchestration.
//!
//! Pipelines validate and execute each item independently, collecting one
//! typed outcome per item instead of aborting the batch on first failure.

mod delete;
mod upload;

pub use delete::DeletePipeline;
pub use upload::{UploadItem, UploadPipeline};

use serde::Serialize;

use crate::error::ErrorKind;
use crate::store::Category;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    Success,
    Error,
}

/// Aggregate result of a whole batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchStatus {
    Success,
    Partial,
    NotFound,
    Failed,
}

/// Per-file outcome of an upload batch.
#[derive(Debug, Clone, Serialize)]
pub struct UploadOutcome {
    pub name: String,
    pub status: ItemStatus,
    pub message: String,
    pub error: Option<ErrorKind>,
    /// Relative media path of the stored file on success.
    pub stored_path: Option<String>,
}

impl UploadOutcome {
    pub(crate) fn success(name: impl Into<String>, stored_path: String) -> Self {
        Self {
            name: name.into(),
            status: ItemStatus::Success,
            message: "Uploaded".to_string(),
            error: None,
            stored_path: Some(stored_path),
        }
    }

    pub(crate) fn failure(name: impl Into<String>, kind: ErrorKind, message: String) -> Self {
        Self {
            name: name.into(),
            status: ItemStatus::Error,
            message,
            error: Some(kind),
            stored_path: None,
        }
    }
}

/// Per-reference outcome of a delete batch.
#[derive(Debug, Clone, Serialize)]
pub struct DeleteOutcome {
    pub path: String,
    pub status: ItemStatus,
    pub message: String,
    pub error: Option<ErrorKind>,
}

impl DeleteOutcome {
    pub(crate) fn success(path: String) -> Self {
        Self {
            path,
            status: ItemStatus::Success,
            message: "Deleted".to_string(),
            error: None,
        }
    }

    pub(crate) fn failure(path: impl Into<String>, kind: ErrorKind, message: String) -> Self {
        Self {
            path: path.into(),
            status: ItemStatus::Error,
            message,
            error: Some(kind),
        }
    }
}

/// Upload batch response: aggregate status, echoed category, per-file rows.
#[derive(Debug, Clone, Serialize)]
pub struct UploadReport {
    pub status: BatchStatus,
    pub category: Option<Category>,
    pub results: Vec<UploadOutcome>,
}

/// Delete batch response.
#[derive(Debug, Clone, Serialize)]
pub struct DeleteReport {
    pub status: BatchStatus,
    pub results: Vec<DeleteOutcome>,
}

/// All success => success; mixed => partial; every failure a `NotFound` =>
/// not-found; anything else => failed.
fn aggregate_status<'a, I>(outcomes: I) -> BatchStatus
where
    I: IntoIterator<Item = (ItemStatus, Option<&'a ErrorKind>)>,
{
    let mut successes = 0usize;
    let mut failures = 0usize;
    let mut non_not_found = 0usize;
    for (status, kind) in outcomes {
        match status {
            ItemStatus::Success => successes += 1,
            ItemStatus::Error => {
                failures += 1;
                if kind != Some(&ErrorKind::NotFound) {
                    non_not_found += 1;
                }
            }
        }
    }
    match (successes, failures) {
        (_, 0) => BatchStatus::Success,
        (0, _) if non_not_found == 0 => BatchStatus::NotFound,
        (0, _) => BatchStatus::Failed,
        _ => BatchStatus::Partial,
    }
}
