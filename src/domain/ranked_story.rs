use serde::{Deserialize, Serialize};

use super::Story;

/// One entry of the final ranking, best first.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RankedStory {
    pub id: String,
    pub score: f64,
    pub line: String,
}

impl RankedStory {
    #[must_use]
    pub fn new(story: &Story, score: f64) -> Self {
        Self {
            id: story.id.clone(),
            score,
            line: render_line(story, score),
        }
    }
}

/// `<score>: "<storyChain> <text>"` with the score at two decimals.
#[must_use]
pub fn render_line(story: &Story, score: f64) -> String {
    format!("{score:.2}: \"{} {}\"", story.story_chain, story.text)
}
