use crate::domain::RankedStory;
use crate::error::RankerError;
use std::future::Future;
use std::pin::Pin;

/// Destination for a finished ranking (console, JSON file).
pub trait RankingSink: Send + Sync {
    fn emit<'a>(
        &'a self,
        ranked: &'a [RankedStory],
    ) -> Pin<Box<dyn Future<Output = Result<(), RankerError>> + Send + 'a>>;
}
