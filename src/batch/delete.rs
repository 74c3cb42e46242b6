use std::fs;

use super::{DeleteOutcome, DeleteReport};
use crate::catalog::LINK_REF_PREFIX;
use crate::error::{GalleryError, Result};
use crate::paths::PathResolver;
use crate::store::LinkStore;

/// Deletes media paths and link references, one outcome per reference.
pub struct DeletePipeline<'a> {
    resolver: &'a PathResolver,
    links: &'a LinkStore,
}

impl<'a> DeletePipeline<'a> {
    pub fn new(resolver: &'a PathResolver, links: &'a LinkStore) -> Self {
        Self { resolver, links }
    }

    /// Deletes one reference: `link:<id>` removes the link record, anything
    /// else resolves as a media path. Returns the deleted reference label.
    pub fn delete_one(&self, reference: &str) -> Result<String> {
        if let Some(id) = reference.strip_prefix(LINK_REF_PREFIX) {
            let removed = self.links.delete(id)?;
            return Ok(format!("{LINK_REF_PREFIX}{}", removed.id));
        }
        let target = self.resolver.resolve_existing(reference)?;
        fs::remove_file(&target)?;
        Ok(self
            .resolver
            .relative_label(&target)
            .unwrap_or_else(|| reference.to_string()))
    }

    /// Deletes every reference independently; one bad path never stops the
    /// rest of the batch.
    pub fn run(&self, references: &[String]) -> Result<DeleteReport> {
        if references.is_empty() {
            return Err(GalleryError::InvalidName(
                "no paths provided".to_string(),
            ));
        }
        let results: Vec<DeleteOutcome> = references
            .iter()
            .map(|reference| match self.delete_one(reference) {
                Ok(deleted) => DeleteOutcome::success(deleted),
                Err(err) => {
                    DeleteOutcome::failure(reference.clone(), err.kind(), err.to_string())
                }
            })
            .collect();
        let status = super::aggregate_status(
            results
                .iter()
                .map(|outcome| (outcome.status, outcome.error.as_ref())),
        );
        Ok(DeleteReport { status, results })
    }
}
