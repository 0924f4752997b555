use thiserror::Error;

use crate::config::ConfigError;

#[derive(Error, Debug)]
pub enum RankerError {
    #[error("Snapshot source {source_name} is unavailable: {reason}")]
    SourceUnavailable { source_name: String, reason: String },

    #[error("Malformed snapshot: {0}")]
    MalformedSnapshot(String),

    #[error("Story {story_id} references parent {parent_id}, which is not in the snapshot")]
    UnresolvedParent { story_id: String, parent_id: String },

    #[error("Story {story_id} has a cyclic parent chain (revisited {revisited_id})")]
    CyclicChain {
        story_id: String,
        revisited_id: String,
    },

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to write {sink} output: {reason}")]
    Sink { sink: &'static str, reason: String },
}

impl RankerError {
    pub(crate) fn unavailable(source_name: impl Into<String>, reason: impl ToString) -> Self {
        Self::SourceUnavailable {
            source_name: source_name.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn sink(sink: &'static str, reason: impl ToString) -> Self {
        Self::Sink {
            sink,
            reason: reason.to_string(),
        }
    }
}
