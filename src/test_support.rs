//! Shared test support utilities
//!
//! In-memory doubles for `SnapshotSource` and `RankingSink` used by unit and
//! integration tests.

use crate::domain::{RankedStory, Snapshot, Story};
use crate::error::RankerError;
use crate::port::{RankingSink, SnapshotSource};
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

/// Source that hands out a fixed snapshot, or fails on demand.
pub struct InMemorySource {
    snapshot: Snapshot,
    should_fail: AtomicBool,
    fetch_count: AtomicUsize,
}

impl InMemorySource {
    pub fn new(snapshot: Snapshot) -> Self {
        Self {
            snapshot,
            should_fail: AtomicBool::new(false),
            fetch_count: AtomicUsize::new(0),
        }
    }

    pub fn from_stories(stories: impl IntoIterator<Item = Story>) -> Self {
        Self::new(Snapshot::from_stories(stories).expect("test stories must have unique ids"))
    }

    pub fn set_should_fail(&self, fail: bool) {
        self.should_fail.store(fail, Ordering::SeqCst);
    }

    pub fn fetch_count(&self) -> usize {
        self.fetch_count.load(Ordering::SeqCst)
    }
}

impl SnapshotSource for InMemorySource {
    fn name(&self) -> String {
        "memory".to_string()
    }

    fn fetch_all(&self) -> Pin<Box<dyn Future<Output = Result<Snapshot, RankerError>> + Send + '_>> {
        Box::pin(async move {
            self.fetch_count.fetch_add(1, Ordering::SeqCst);
            if self.should_fail.load(Ordering::SeqCst) {
                return Err(RankerError::unavailable(self.name(), "mock source failure"));
            }
            Ok(self.snapshot.clone())
        })
    }
}

/// Sink that records every emitted ranking.
pub struct CollectingSink {
    emitted: Mutex<Vec<Vec<RankedStory>>>,
    should_fail: AtomicBool,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self {
            emitted: Mutex::new(Vec::new()),
            should_fail: AtomicBool::new(false),
        }
    }

    pub fn set_should_fail(&self, fail: bool) {
        self.should_fail.store(fail, Ordering::SeqCst);
    }

    pub fn emitted(&self) -> Vec<Vec<RankedStory>> {
        self.emitted.lock().unwrap().clone()
    }

    pub fn emit_count(&self) -> usize {
        self.emitted.lock().unwrap().len()
    }
}

impl Default for CollectingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl RankingSink for CollectingSink {
    fn emit<'a>(
        &'a self,
        ranked: &'a [RankedStory],
    ) -> Pin<Box<dyn Future<Output = Result<(), RankerError>> + Send + 'a>> {
        Box::pin(async move {
            if self.should_fail.load(Ordering::SeqCst) {
                return Err(RankerError::sink("collecting", "mock sink failure"));
            }
            self.emitted.lock().unwrap().push(ranked.to_vec());
            Ok(())
        })
    }
}

/// Linear chain `ids[0] <- ids[1] <- ...`, each story with the given net votes.
pub fn linear_chain(ids: &[&str], net_votes: &[i64]) -> Vec<Story> {
    ids.iter()
        .zip(net_votes)
        .enumerate()
        .map(|(i, (id, &net))| {
            let parent = if i == 0 { None } else { Some(ids[i - 1]) };
            let vote = if net >= 0 { "upvote" } else { "downvote" };
            Story::new(*id, parent)
                .with_votes(std::iter::repeat_n(vote, net.unsigned_abs() as usize))
                .with_text(ids[..i].join(" "), *id)
        })
        .collect()
}
