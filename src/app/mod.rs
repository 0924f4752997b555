pub mod job;
pub mod tracing;

pub use job::RankingJob;

use crate::config::Settings;
use crate::error::RankerError;

/// Run one ranking pass with the given settings.
pub async fn run(settings: &Settings) -> Result<(), RankerError> {
    let job = RankingJob::from_settings(settings);
    let ranked = job.run().await?;
    ::tracing::info!(ranked = ranked.len(), "ranking emitted");
    Ok(())
}
