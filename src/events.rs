//! Append-only mutation log stored as JSONL under the gallery root.
//!
//! Every successful mutation appends one event, so the history of a gallery
//! can be reconstructed or audited without a separate logging pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use uuid::Uuid;

use crate::error::Result;

/// Type of gallery events that can be logged.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    CategoryCreated,
    CategoryUpdated,
    CategoryDeleted,
    LinkAdded,
    LinkDeleted,
    UploadBatchCompleted,
    MediaDeleted,
    DeleteBatchCompleted,
}

/// General-purpose gallery event stored as JSONL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GalleryEvent {
    pub event_id: Uuid,
    pub event_type: EventType,
    pub timestamp: DateTime<Utc>,
    pub details: serde_json::Value,
}

/// Wraps the event log path for a gallery root.
pub struct EventLog {
    path: PathBuf,
}

impl EventLog {
    pub fn at(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn append_event(&self, event: &GalleryEvent) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(serde_json::to_string(event)?.as_bytes())?;
        file.write_all(b"\n")?;
        Ok(())
    }

    pub fn load_events(&self) -> Result<Vec<GalleryEvent>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let data = fs::read_to_string(&self.path)?;
        let mut events = Vec::new();
        for line in data.lines().filter(|l| !l.trim().is_empty()) {
            let event: GalleryEvent = serde_json::from_str(line)?;
            events.push(event);
        }
        Ok(events)
    }

    pub fn load_events_since(&self, cutoff: DateTime<Utc>) -> Result<Vec<GalleryEvent>> {
        Ok(self
            .load_events()?
            .into_iter()
            .filter(|event| event.timestamp >= cutoff)
            .collect())
    }

    /// Append a simple event helper.
    pub fn log(&self, event_type: EventType, details: serde_json::Value) -> Result<()> {
        let event = GalleryEvent {
            event_id: Uuid::new_v4(),
            event_type,
            timestamp: Utc::now(),
            details,
        };
        self.append_event(&event)
    }
}
