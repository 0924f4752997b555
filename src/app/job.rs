use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use crate::adapter::json_file::write_snapshot;
use crate::adapter::{ConsoleSink, JsonFileSink, JsonFileSnapshotSource, MongoSnapshotSource};
use crate::config::{Settings, SourceSettings};
use crate::domain::RankedStory;
use crate::error::RankerError;
use crate::port::{RankingSink, SnapshotSource};
use crate::ranker::ChainRanker;

/// One read → rank → emit pass.
///
/// Sinks only run after the whole snapshot has been ranked, so a failed
/// run never produces partial output.
pub struct RankingJob {
    source: Arc<dyn SnapshotSource>,
    sinks: Vec<Arc<dyn RankingSink>>,
    ranker: ChainRanker,
    snapshot_dump: Option<PathBuf>,
}

impl RankingJob {
    #[must_use]
    pub fn new(
        source: Arc<dyn SnapshotSource>,
        sinks: Vec<Arc<dyn RankingSink>>,
        ranker: ChainRanker,
    ) -> Self {
        Self {
            source,
            sinks,
            ranker,
            snapshot_dump: None,
        }
    }

    #[must_use]
    pub fn with_snapshot_dump(mut self, path: impl Into<PathBuf>) -> Self {
        self.snapshot_dump = Some(path.into());
        self
    }

    /// Wire the source and sinks selected by `settings`.
    #[must_use]
    pub fn from_settings(settings: &Settings) -> Self {
        let source: Arc<dyn SnapshotSource> = match &settings.source {
            SourceSettings::Mongo(mongo) => Arc::new(MongoSnapshotSource::new(mongo.clone())),
            SourceSettings::File(path) => Arc::new(JsonFileSnapshotSource::new(path.clone())),
        };

        let console: Arc<dyn RankingSink> = Arc::new(ConsoleSink::stdout(settings.print_scores));
        let mut sinks = vec![console];
        if let Some(path) = &settings.output {
            sinks.push(Arc::new(JsonFileSink::new(path.clone())));
        }

        let job = Self::new(source, sinks, ChainRanker::new(settings.ranker));
        match &settings.dump_snapshot {
            Some(path) => job.with_snapshot_dump(path.clone()),
            None => job,
        }
    }

    /// # Errors
    /// Returns the first error from loading, ranking or emitting.
    pub async fn run(&self) -> Result<Vec<RankedStory>, RankerError> {
        info!(source = %self.source.name(), "loading snapshot");
        let snapshot = self.source.fetch_all().await?;
        info!(stories = snapshot.len(), "snapshot loaded");

        if let Some(path) = &self.snapshot_dump {
            write_snapshot(path, &snapshot).await?;
        }

        let ranked = self.ranker.rank(&snapshot)?;

        for sink in &self.sinks {
            sink.emit(&ranked).await?;
        }
        Ok(ranked)
    }
}
