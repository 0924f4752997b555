use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::error::RankerError;

/// A single vote cast on a story. Only `upvote` and `downvote` carry weight.
///
/// The tag is kept as raw JSON: a null, numeric or missing tag is a
/// zero-weight vote, not a malformed record.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Vote {
    #[serde(rename = "voteType", default, skip_serializing_if = "Value::is_null")]
    pub vote_type: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Vote {
    #[must_use]
    pub fn new(vote_type: impl Into<String>) -> Self {
        Self {
            vote_type: Value::String(vote_type.into()),
            extra: Map::new(),
        }
    }

    #[must_use]
    pub fn weight(&self) -> i64 {
        match self.vote_type.as_str() {
            Some("upvote") => 1,
            Some("downvote") => -1,
            _ => 0,
        }
    }
}

/// A post, or a reply to another post when `parent_id` is set.
///
/// Fields outside the ranking model are kept in `extra` so a normalized
/// snapshot can be written back out without losing data.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct Story {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "parentId")]
    pub parent_id: Option<String>,
    pub votes: Vec<Vote>,
    pub text: String,
    #[serde(rename = "storyChain")]
    pub story_chain: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Story {
    #[must_use]
    pub fn new(id: impl Into<String>, parent_id: Option<&str>) -> Self {
        Self {
            id: id.into(),
            parent_id: parent_id.map(str::to_string),
            votes: Vec::new(),
            text: String::new(),
            story_chain: String::new(),
            extra: Map::new(),
        }
    }

    #[must_use]
    pub fn with_votes<'a>(mut self, vote_types: impl IntoIterator<Item = &'a str>) -> Self {
        self.votes = vote_types.into_iter().map(Vote::new).collect();
        self
    }

    #[must_use]
    pub fn with_text(mut self, story_chain: impl Into<String>, text: impl Into<String>) -> Self {
        self.story_chain = story_chain.into();
        self.text = text.into();
        self
    }

    /// Upvotes minus downvotes.
    #[must_use]
    pub fn net_votes(&self) -> i64 {
        self.votes.iter().map(Vote::weight).sum()
    }

    /// Builds a story from an already-normalized document.
    ///
    /// `_id` is required. `parentId` may be absent or null. Numeric ids are
    /// rendered to their decimal string form.
    ///
    /// # Errors
    /// Returns [`RankerError::MalformedSnapshot`] when `_id` is missing or a
    /// modeled field has the wrong type.
    pub fn from_document(mut document: Map<String, Value>) -> Result<Self, RankerError> {
        let id = match document.remove("_id") {
            None | Some(Value::Null) => {
                return Err(RankerError::MalformedSnapshot(
                    "record is missing required _id".into(),
                ));
            }
            Some(value) => canonical_id(value).map_err(|kind| {
                RankerError::MalformedSnapshot(format!("record _id must be a string, got {kind}"))
            })?,
        };

        let malformed = |field: &str, detail: String| {
            RankerError::MalformedSnapshot(format!("story {id}: field {field} {detail}"))
        };

        let parent_id = match document.remove("parentId") {
            None | Some(Value::Null) => None,
            Some(value) => Some(
                canonical_id(value)
                    .map_err(|kind| malformed("parentId", format!("must be a string, got {kind}")))?,
            ),
        };

        let votes = match document.remove("votes") {
            None | Some(Value::Null) => Vec::new(),
            Some(value) => serde_json::from_value::<Vec<Vote>>(value)
                .map_err(|e| malformed("votes", format!("is invalid: {e}")))?,
        };

        let text = take_string(&mut document, "text")
            .map_err(|kind| malformed("text", format!("must be a string, got {kind}")))?;
        let story_chain = take_string(&mut document, "storyChain")
            .map_err(|kind| malformed("storyChain", format!("must be a string, got {kind}")))?;

        Ok(Self {
            id,
            parent_id,
            votes,
            text,
            story_chain,
            extra: document,
        })
    }
}

fn canonical_id(value: Value) -> Result<String, &'static str> {
    match value {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(json_kind(&other)),
    }
}

fn take_string(document: &mut Map<String, Value>, field: &str) -> Result<String, &'static str> {
    match document.remove(field) {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s),
        Some(other) => Err(json_kind(&other)),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Immutable id → story mapping for one ranking run.
///
/// Iteration is in ascending id order.
#[derive(Serialize, Clone, Debug, Default, PartialEq)]
#[serde(transparent)]
pub struct Snapshot {
    stories: BTreeMap<String, Story>,
}

impl Snapshot {
    /// # Errors
    /// Returns [`RankerError::MalformedSnapshot`] when two stories share an id.
    pub fn from_stories(stories: impl IntoIterator<Item = Story>) -> Result<Self, RankerError> {
        let mut map = BTreeMap::new();
        for story in stories {
            if let Some(previous) = map.insert(story.id.clone(), story) {
                return Err(RankerError::MalformedSnapshot(format!(
                    "duplicate story id {}",
                    previous.id
                )));
            }
        }
        Ok(Self { stories: map })
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Story> {
        self.stories.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Story> {
        self.stories.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.stories.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stories.is_empty()
    }
}
