use crate::domain::Snapshot;
use crate::error::RankerError;
use std::future::Future;
use std::pin::Pin;

/// Source of the full story set for one run (MongoDB, JSON export, etc.)
///
/// This trait is dyn-compatible by using boxed futures instead of `impl Future`.
pub trait SnapshotSource: Send + Sync {
    /// Short label used in logs and errors.
    fn name(&self) -> String;

    fn fetch_all(&self) -> Pin<Box<dyn Future<Output = Result<Snapshot, RankerError>> + Send + '_>>;
}
