use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use rayon::ThreadPoolBuilder;

use super::{UploadOutcome, UploadReport};
use crate::config::GalleryConfig;
use crate::error::{ErrorKind, GalleryError, Result};
use crate::paths::PathResolver;
use crate::store::{normalize_label, Category, CategoryStore};

const UPLOAD_CHUNK_BYTES: usize = 1024 * 1024;

/// One file of an upload batch: its client-supplied name and byte source.
pub struct UploadItem {
    pub filename: String,
    pub source: Box<dyn Read + Send>,
}

impl UploadItem {
    pub fn new(filename: impl Into<String>, source: impl Read + Send + 'static) -> Self {
        Self {
            filename: filename.into(),
            source: Box::new(source),
        }
    }
}

/// Streams a batch of files into the media root.
///
/// Target paths are reserved sequentially (the collision counter is only
/// correct single-file-at-a-time), then the reserved files are streamed on a
/// bounded thread pool. Each item fails or succeeds on its own.
pub struct UploadPipeline<'a> {
    resolver: &'a PathResolver,
    categories: &'a CategoryStore,
    max_upload_bytes: u64,
    max_parallel: usize,
}

struct PendingUpload {
    index: usize,
    filename: String,
    path: PathBuf,
    file: File,
    source: Box<dyn Read + Send>,
}

impl<'a> UploadPipeline<'a> {
    pub fn new(
        resolver: &'a PathResolver,
        categories: &'a CategoryStore,
        config: &GalleryConfig,
    ) -> Self {
        Self {
            resolver,
            categories,
            max_upload_bytes: config.max_upload_bytes,
            max_parallel: config.max_parallel_uploads.max(1) as usize,
        }
    }

    /// Runs the batch. An unknown category fails the whole request before
    /// any write; per-file problems only fail that file.
    pub fn run(&self, category: Option<&str>, items: Vec<UploadItem>) -> Result<UploadReport> {
        if items.is_empty() {
            return Err(GalleryError::InvalidName("no files provided".to_string()));
        }

        let category_record = match category.and_then(normalize_label) {
            Some(label) => Some(
                self.categories
                    .resolve(&label)?
                    .ok_or(GalleryError::UnknownCategory(label))?,
            ),
            None => None,
        };
        let target_dir = category_record.as_ref().map(|c: &Category| c.path.as_str());

        let mut results: Vec<Option<UploadOutcome>> = Vec::new();
        results.resize_with(items.len(), || None);
        let mut pending = Vec::new();

        for (index, item) in items.into_iter().enumerate() {
            match self.reserve(index, item, target_dir) {
                Ok(reserved) => pending.push(reserved),
                Err(outcome) => results[index] = Some(outcome),
            }
        }

        let pool = ThreadPoolBuilder::new()
            .num_threads(self.max_parallel)
            .build()
            .map_err(|e| GalleryError::Io(io::Error::other(e)))?;
        let streamed: Vec<(usize, UploadOutcome)> = pool.install(|| {
            pending
                .into_par_iter()
                .map(|reserved| (reserved.index, self.stream_one(reserved)))
                .collect()
        });
        for (index, outcome) in streamed {
            results[index] = Some(outcome);
        }

        let results: Vec<UploadOutcome> = results.into_iter().flatten().collect();
        let status = super::aggregate_status(
            results
                .iter()
                .map(|outcome| (outcome.status, outcome.error.as_ref())),
        );
        Ok(UploadReport {
            status,
            category: category_record,
            results,
        })
    }

    /// Validates one item and reserves its target path by creating the file
    /// exclusively, re-resolving if another writer took the candidate.
    fn reserve(
        &self,
        index: usize,
        item: UploadItem,
        target_dir: Option<&str>,
    ) -> std::result::Result<PendingUpload, UploadOutcome> {
        if item.filename.is_empty() {
            return Err(UploadOutcome::failure(
                item.filename,
                ErrorKind::InvalidName,
                "Filename is required".to_string(),
            ));
        }
        if !self.resolver.is_allowed_file(Path::new(&item.filename)) {
            return Err(UploadOutcome::failure(
                item.filename,
                ErrorKind::DisallowedType,
                "File type not allowed".to_string(),
            ));
        }

        loop {
            let candidate = match self.resolver.resolve_upload_target(&item.filename, target_dir) {
                Ok(path) => path,
                Err(err) => {
                    return Err(UploadOutcome::failure(
                        item.filename,
                        err.kind(),
                        err.to_string(),
                    ))
                }
            };
            match OpenOptions::new().write(true).create_new(true).open(&candidate) {
                Ok(file) => {
                    return Ok(PendingUpload {
                        index,
                        filename: item.filename,
                        path: candidate,
                        file,
                        source: item.source,
                    })
                }
                Err(err) if err.kind() == io::ErrorKind::AlreadyExists => continue,
                Err(err) => {
                    return Err(UploadOutcome::failure(
                        item.filename,
                        ErrorKind::IoFailure,
                        err.to_string(),
                    ))
                }
            }
        }
    }

    fn stream_one(&self, reserved: PendingUpload) -> UploadOutcome {
        let PendingUpload {
            filename,
            path,
            mut file,
            source,
            ..
        } = reserved;
        match stream_bounded(source, &mut file, self.max_upload_bytes) {
            Ok(_) => {
                let stored = self.resolver.relative_label(&path).unwrap_or_default();
                UploadOutcome::success(filename, stored)
            }
            Err(err) => {
                drop(file);
                let _ = fs::remove_file(&path);
                UploadOutcome::failure(filename, err.kind(), err.to_string())
            }
        }
    }
}

/// Copies the source into the file in bounded chunks, aborting as soon as
/// the running total crosses the ceiling.
fn stream_bounded(
    mut source: Box<dyn Read + Send>,
    file: &mut File,
    limit: u64,
) -> Result<u64> {
    let mut buffer = vec![0u8; UPLOAD_CHUNK_BYTES];
    let mut total: u64 = 0;
    loop {
        let read = source.read(&mut buffer)?;
        if read == 0 {
            break;
        }
        total += read as u64;
        if total > limit {
            return Err(GalleryError::TooLarge { limit });
        }
        file.write_all(&buffer[..read])?;
    }
    file.flush()?;
    Ok(total)
}
