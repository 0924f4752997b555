// Static snapshot files: a JSON object mapping story id to story document.
// Records may use MongoDB Extended JSON ({"$oid": ...}, {"$date": ...}), so a
// raw `mongoexport`-style dump and a normalized dump load the same way.

use mongodb::bson::Bson;
use serde_json::Value;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use tracing::info;

use crate::adapter::convert::normalize_document;
use crate::domain::{Snapshot, Story};
use crate::error::RankerError;
use crate::port::SnapshotSource;

pub struct JsonFileSnapshotSource {
    path: PathBuf,
}

impl JsonFileSnapshotSource {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn load(&self) -> Result<Snapshot, RankerError> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| RankerError::unavailable(self.name(), e))?;

        let snapshot = parse_snapshot(&raw)?;
        info!(
            path = %self.path.display(),
            stories = snapshot.len(),
            "loaded snapshot file"
        );
        Ok(snapshot)
    }
}

impl SnapshotSource for JsonFileSnapshotSource {
    fn name(&self) -> String {
        format!("file:{}", self.path.display())
    }

    fn fetch_all(&self) -> Pin<Box<dyn Future<Output = Result<Snapshot, RankerError>> + Send + '_>> {
        Box::pin(self.load())
    }
}

/// Parse and normalize the contents of a snapshot file.
///
/// # Errors
/// Returns [`RankerError::MalformedSnapshot`] for invalid JSON, a non-object
/// top level or record, a record without `_id`, or a key that disagrees
/// with its record's `_id`.
pub fn parse_snapshot(raw: &str) -> Result<Snapshot, RankerError> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|e| RankerError::MalformedSnapshot(format!("invalid JSON: {e}")))?;

    let Value::Object(records) = value else {
        return Err(RankerError::MalformedSnapshot(
            "top-level value must be an object of id to story".into(),
        ));
    };

    let mut stories = Vec::with_capacity(records.len());
    for (key, record) in records {
        let document = match Bson::try_from(record) {
            Ok(Bson::Document(document)) => document,
            Ok(_) => {
                return Err(RankerError::MalformedSnapshot(format!(
                    "record {key} is not an object"
                )));
            }
            Err(e) => {
                return Err(RankerError::MalformedSnapshot(format!(
                    "record {key} is not valid extended JSON: {e}"
                )));
            }
        };

        let story = Story::from_document(normalize_document(&document)).map_err(|e| match e {
            RankerError::MalformedSnapshot(reason) => {
                RankerError::MalformedSnapshot(format!("record {key}: {reason}"))
            }
            other => other,
        })?;

        if story.id != key {
            return Err(RankerError::MalformedSnapshot(format!(
                "record key {key} does not match its _id {}",
                story.id
            )));
        }
        stories.push(story);
    }

    Snapshot::from_stories(stories)
}

/// Write a normalized snapshot in the shape [`parse_snapshot`] reads.
///
/// # Errors
/// Returns [`RankerError::Sink`] when the file cannot be written.
pub async fn write_snapshot(path: &Path, snapshot: &Snapshot) -> Result<(), RankerError> {
    let json =
        serde_json::to_string_pretty(snapshot).map_err(|e| RankerError::sink("snapshot", e))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| RankerError::sink("snapshot", e))?;
    }
    tokio::fs::write(path, json)
        .await
        .map_err(|e| RankerError::sink("snapshot", e))?;

    info!(path = %path.display(), stories = snapshot.len(), "wrote snapshot dump");
    Ok(())
}
