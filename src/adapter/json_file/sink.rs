use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use tracing::info;

use crate::domain::RankedStory;
use crate::error::RankerError;
use crate::port::RankingSink;

/// Writes the rendered ranking lines as a JSON array, best first.
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn write(&self, ranked: &[RankedStory]) -> Result<(), RankerError> {
        let lines: Vec<&str> = ranked.iter().map(|r| r.line.as_str()).collect();
        let json =
            serde_json::to_string_pretty(&lines).map_err(|e| RankerError::sink("json file", e))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| RankerError::sink("json file", e))?;
        }
        tokio::fs::write(&self.path, json)
            .await
            .map_err(|e| RankerError::sink("json file", e))?;

        info!(path = %self.path.display(), lines = lines.len(), "wrote ranking file");
        Ok(())
    }
}

impl RankingSink for JsonFileSink {
    fn emit<'a>(
        &'a self,
        ranked: &'a [RankedStory],
    ) -> Pin<Box<dyn Future<Output = Result<(), RankerError>> + Send + 'a>> {
        Box::pin(self.write(ranked))
    }
}
