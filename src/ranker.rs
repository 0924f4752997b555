//! Chain score aggregation.
//!
//! A story's score is the sum of net votes along its ancestor chain, where
//! the story itself has weight 1.0 and each level further up is multiplied
//! by the configured decay.

use std::cmp::Ordering;
use std::collections::HashSet;

use tracing::{debug, info, instrument, warn};

use crate::config::{MissingParentPolicy, RankerSettings};
use crate::domain::{RankedStory, Snapshot, Story};
use crate::error::RankerError;

#[derive(Debug, Clone, Copy, Default)]
pub struct ChainRanker {
    settings: RankerSettings,
}

impl ChainRanker {
    #[must_use]
    pub fn new(settings: RankerSettings) -> Self {
        Self { settings }
    }

    #[must_use]
    pub fn settings(&self) -> &RankerSettings {
        &self.settings
    }

    /// Decayed net-vote total for `story` and its ancestors.
    ///
    /// # Errors
    /// - [`RankerError::CyclicChain`] when the walk revisits a story.
    /// - [`RankerError::UnresolvedParent`] when a parent is missing and the
    ///   policy is [`MissingParentPolicy::Fail`].
    pub fn chain_score<'a>(
        &self,
        snapshot: &'a Snapshot,
        story: &'a Story,
    ) -> Result<f64, RankerError> {
        let mut visited: HashSet<&'a str> = HashSet::new();
        let mut weight = 1.0;
        let mut total = 0.0;
        let mut cursor = Some(story);

        while let Some(current) = cursor {
            if !visited.insert(current.id.as_str()) {
                return Err(RankerError::CyclicChain {
                    story_id: story.id.clone(),
                    revisited_id: current.id.clone(),
                });
            }

            total += current.net_votes() as f64 * weight;

            cursor = match current.parent_id.as_deref() {
                None => None,
                Some(parent_id) => match snapshot.get(parent_id) {
                    Some(parent) => Some(parent),
                    None => self.on_missing_parent(story, parent_id)?,
                },
            };
            weight *= self.settings.decay;
        }

        Ok(total)
    }

    fn on_missing_parent<'a>(
        &self,
        story: &Story,
        parent_id: &str,
    ) -> Result<Option<&'a Story>, RankerError> {
        match self.settings.missing_parent {
            MissingParentPolicy::Fail => Err(RankerError::UnresolvedParent {
                story_id: story.id.clone(),
                parent_id: parent_id.to_string(),
            }),
            MissingParentPolicy::Terminate => {
                warn!(
                    story_id = %story.id,
                    parent_id,
                    "parent not in snapshot, terminating chain"
                );
                Ok(None)
            }
        }
    }

    /// Scores every story and sorts best first. Equal scores are ordered by
    /// ascending id.
    ///
    /// Any traversal error aborts the whole ranking.
    ///
    /// # Errors
    /// Propagates the first error from [`ChainRanker::chain_score`].
    #[instrument(skip_all, fields(story_count = snapshot.len(), decay = self.settings.decay))]
    pub fn rank(&self, snapshot: &Snapshot) -> Result<Vec<RankedStory>, RankerError> {
        let mut ranked = Vec::with_capacity(snapshot.len());
        for story in snapshot.iter() {
            let score = self.chain_score(snapshot, story)?;
            debug!(story_id = %story.id, score, "scored story");
            ranked.push(RankedStory::new(story, score));
        }

        ranked.sort_by(compare_ranked);

        info!(ranked = ranked.len(), "ranking complete");
        Ok(ranked)
    }
}

fn compare_ranked(a: &RankedStory, b: &RankedStory) -> Ordering {
    b.score.total_cmp(&a.score).then_with(|| a.id.cmp(&b.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    const EPS: f64 = 1e-9;

    fn snapshot(stories: Vec<Story>) -> Snapshot {
        Snapshot::from_stories(stories).unwrap()
    }

    fn score_of(snapshot: &Snapshot, id: &str) -> f64 {
        ChainRanker::default()
            .chain_score(snapshot, snapshot.get(id).unwrap())
            .unwrap()
    }

    fn terminating() -> ChainRanker {
        ChainRanker::new(RankerSettings {
            missing_parent: MissingParentPolicy::Terminate,
            ..RankerSettings::default()
        })
    }

    #[test]
    fn test_no_votes_scores_zero() {
        let snap = snapshot(vec![
            Story::new("root", None),
            Story::new("child", Some("root")),
        ]);
        assert_eq!(score_of(&snap, "child"), 0.0);
        assert_eq!(score_of(&snap, "root"), 0.0);
    }

    #[test]
    fn test_lone_root_net_votes() {
        let snap = snapshot(vec![
            Story::new("root", None).with_votes(["upvote", "upvote", "downvote"]),
        ]);
        assert!((score_of(&snap, "root") - 1.0).abs() < EPS);
    }

    #[test]
    fn test_two_level_chain() {
        let snap = snapshot(vec![
            Story::new("root", None).with_votes(["upvote", "upvote"]),
            Story::new("child", Some("root")).with_votes(["upvote"]),
        ]);
        assert!((score_of(&snap, "child") - 2.8).abs() < EPS);
        assert!((score_of(&snap, "root") - 2.0).abs() < EPS);
    }

    #[test]
    fn test_three_level_chain() {
        let snap = snapshot(vec![
            Story::new("a", None).with_votes(["upvote"]),
            Story::new("b", Some("a")).with_votes(["upvote"]),
            Story::new("c", Some("b")).with_votes(["upvote"]),
        ]);
        assert!((score_of(&snap, "c") - 2.71).abs() < EPS);
    }

    #[test]
    fn test_empty_votes_still_consume_decay_step() {
        let snap = snapshot(vec![
            Story::new("a", None).with_votes(["upvote"]),
            Story::new("b", Some("a")),
            Story::new("c", Some("b")),
        ]);
        assert!((score_of(&snap, "c") - 0.81).abs() < EPS);
    }

    #[test]
    fn test_custom_decay() {
        let snap = snapshot(vec![
            Story::new("a", None).with_votes(["upvote"]),
            Story::new("b", Some("a")).with_votes(["downvote"]),
        ]);
        let ranker = ChainRanker::new(RankerSettings {
            decay: 0.5,
            ..RankerSettings::default()
        });
        let score = ranker.chain_score(&snap, snap.get("b").unwrap()).unwrap();
        assert!((score - (-0.5)).abs() < EPS);
    }

    #[test]
    fn test_self_cycle_is_detected() {
        let snap = snapshot(vec![Story::new("a", Some("a")).with_votes(["upvote"])]);
        let err = ChainRanker::default()
            .chain_score(&snap, snap.get("a").unwrap())
            .unwrap_err();
        match err {
            RankerError::CyclicChain {
                story_id,
                revisited_id,
            } => {
                assert_eq!(story_id, "a");
                assert_eq!(revisited_id, "a");
            }
            other => panic!("expected CyclicChain, got {other:?}"),
        }
    }

    #[test]
    fn test_two_story_cycle_is_detected() {
        let snap = snapshot(vec![Story::new("a", Some("b")), Story::new("b", Some("a"))]);
        let err = ChainRanker::default().rank(&snap).unwrap_err();
        assert!(matches!(err, RankerError::CyclicChain { .. }));
    }

    #[test]
    fn test_cycle_above_story_is_detected() {
        let snap = snapshot(vec![
            Story::new("leaf", Some("x")),
            Story::new("x", Some("y")),
            Story::new("y", Some("x")),
        ]);
        let err = ChainRanker::default()
            .chain_score(&snap, snap.get("leaf").unwrap())
            .unwrap_err();
        match err {
            RankerError::CyclicChain {
                story_id,
                revisited_id,
            } => {
                assert_eq!(story_id, "leaf");
                assert_eq!(revisited_id, "x");
            }
            other => panic!("expected CyclicChain, got {other:?}"),
        }
    }

    #[test]
    fn test_cycle_fails_even_when_terminating_missing_parents() {
        let snap = snapshot(vec![Story::new("a", Some("b")), Story::new("b", Some("a"))]);
        assert!(matches!(
            terminating().rank(&snap),
            Err(RankerError::CyclicChain { .. })
        ));
    }

    #[test]
    fn test_unresolved_parent_fails_by_default() {
        let snap = snapshot(vec![Story::new("child", Some("ghost")).with_votes(["upvote"])]);
        let err = ChainRanker::default().rank(&snap).unwrap_err();
        match err {
            RankerError::UnresolvedParent {
                story_id,
                parent_id,
            } => {
                assert_eq!(story_id, "child");
                assert_eq!(parent_id, "ghost");
            }
            other => panic!("expected UnresolvedParent, got {other:?}"),
        }
    }

    #[test]
    fn test_unresolved_grandparent_reports_starting_story() {
        let snap = snapshot(vec![
            Story::new("parent", Some("ghost")),
            Story::new("child", Some("parent")),
        ]);
        let err = ChainRanker::default()
            .chain_score(&snap, snap.get("child").unwrap())
            .unwrap_err();
        assert!(err.to_string().contains("child"));
        assert!(err.to_string().contains("ghost"));
    }

    #[traced_test]
    #[test]
    fn test_unresolved_parent_terminates_chain_when_configured() {
        let snap = snapshot(vec![
            Story::new("parent", Some("ghost")).with_votes(["upvote", "upvote"]),
            Story::new("child", Some("parent")).with_votes(["upvote"]),
        ]);
        let ranker = terminating();
        let score = ranker.chain_score(&snap, snap.get("child").unwrap()).unwrap();
        assert!((score - 2.8).abs() < EPS);
        assert!(logs_contain("parent not in snapshot, terminating chain"));
    }

    #[test]
    fn test_rank_orders_by_score_descending() {
        let snap = snapshot(vec![
            Story::new("a", None).with_votes(["downvote"]),
            Story::new("b", None).with_votes(["upvote", "upvote"]),
            Story::new("c", None).with_votes(["upvote"]),
        ]);
        let ranked = ChainRanker::default().rank(&snap).unwrap();
        let ids: Vec<&str> = ranked.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["b", "c", "a"]);
    }

    #[test]
    fn test_rank_breaks_ties_by_id() {
        let snap = snapshot(vec![
            Story::new("zeta", None).with_votes(["upvote"]),
            Story::new("alpha", None).with_votes(["upvote"]),
            Story::new("mid", None).with_votes(["upvote"]),
        ]);
        let ranked = ChainRanker::default().rank(&snap).unwrap();
        let ids: Vec<&str> = ranked.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["alpha", "mid", "zeta"]);
    }

    #[test]
    fn test_rank_is_idempotent() {
        let snap = snapshot(vec![
            Story::new("a", None).with_votes(["upvote"]),
            Story::new("b", Some("a")).with_votes(["downvote"]),
            Story::new("c", Some("a")),
            Story::new("d", Some("c")).with_votes(["upvote", "upvote"]),
        ]);
        let ranker = ChainRanker::default();
        assert_eq!(ranker.rank(&snap).unwrap(), ranker.rank(&snap).unwrap());
    }

    #[test]
    fn test_rank_renders_lines() {
        let snap = snapshot(vec![
            Story::new("a", None)
                .with_votes(["upvote", "upvote"])
                .with_text("", "Once upon a time"),
            Story::new("b", Some("a"))
                .with_votes(["upvote"])
                .with_text("Once upon a time", "there was a fox"),
        ]);
        let ranked = ChainRanker::default().rank(&snap).unwrap();
        assert_eq!(ranked[0].line, "2.80: \"Once upon a time there was a fox\"");
        assert_eq!(ranked[1].line, "2.00: \" Once upon a time\"");
    }

    #[test]
    fn test_rank_empty_snapshot() {
        let ranked = ChainRanker::default().rank(&Snapshot::default()).unwrap();
        assert!(ranked.is_empty());
    }
}
