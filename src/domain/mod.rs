pub mod ranked_story;
pub mod story;

pub use ranked_story::RankedStory;
pub use story::{Snapshot, Story, Vote};
