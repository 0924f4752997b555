use futures::TryStreamExt;
use mongodb::Client;
use mongodb::bson::{Document, doc};
use std::future::Future;
use std::pin::Pin;
use tracing::{debug, info};

use crate::adapter::convert::normalize_document;
use crate::config::MongoSettings;
use crate::domain::{Snapshot, Story};
use crate::error::RankerError;
use crate::port::SnapshotSource;

/// Reads every document of the configured collection.
///
/// The client lives only for the duration of one `fetch_all` call and is
/// shut down before it returns.
pub struct MongoSnapshotSource {
    settings: MongoSettings,
}

impl MongoSnapshotSource {
    #[must_use]
    pub fn new(settings: MongoSettings) -> Self {
        Self { settings }
    }

    async fn load(&self) -> Result<Snapshot, RankerError> {
        let client = Client::with_uri_str(&self.settings.uri)
            .await
            .map_err(|e| RankerError::unavailable(self.name(), e))?;

        let documents = self.read_collection(&client).await;
        client.shutdown().await;
        let documents = documents?;

        info!(
            database = %self.settings.database,
            collection = %self.settings.collection,
            documents = documents.len(),
            "fetched story documents"
        );

        let stories = documents
            .iter()
            .map(|document| Story::from_document(normalize_document(document)))
            .collect::<Result<Vec<_>, _>>()?;

        Snapshot::from_stories(stories)
    }

    async fn read_collection(&self, client: &Client) -> Result<Vec<Document>, RankerError> {
        let collection = client
            .database(&self.settings.database)
            .collection::<Document>(&self.settings.collection);

        let mut cursor = collection
            .find(doc! {})
            .await
            .map_err(|e| RankerError::unavailable(self.name(), e))?;

        let mut documents = Vec::new();
        while let Some(document) = cursor
            .try_next()
            .await
            .map_err(|e| RankerError::unavailable(self.name(), e))?
        {
            documents.push(document);
        }
        debug!(count = documents.len(), "cursor exhausted");
        Ok(documents)
    }
}

impl SnapshotSource for MongoSnapshotSource {
    fn name(&self) -> String {
        format!(
            "mongodb:{}/{}",
            self.settings.database, self.settings.collection
        )
    }

    fn fetch_all(&self) -> Pin<Box<dyn Future<Output = Result<Snapshot, RankerError>> + Send + '_>> {
        Box::pin(self.load())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(uri: &str) -> MongoSettings {
        MongoSettings {
            uri: uri.into(),
            database: "storydb".into(),
            collection: "stories".into(),
        }
    }

    #[test]
    fn test_name_omits_uri() {
        let source = MongoSnapshotSource::new(settings("mongodb://user:secret@db:27017"));
        assert_eq!(source.name(), "mongodb:storydb/stories");
    }

    #[tokio::test]
    async fn test_invalid_uri_is_source_unavailable() {
        let source = MongoSnapshotSource::new(settings("not-a-mongo-uri"));
        let err = source.fetch_all().await.unwrap_err();
        assert!(matches!(err, RankerError::SourceUnavailable { .. }));
    }
}
