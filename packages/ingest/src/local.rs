//! Local-file record fetcher for offline runs.

use std::path::PathBuf;

use async_trait::async_trait;
use crime_harvest_source::{FetchRequest, RecordFetcher, SourceError};
use serde_json::Value;

/// Reads raw records from a JSON file holding an array of records, as saved
/// from a Socrata resource endpoint.
///
/// The request's window and field selection are ignored; only its `limit`
/// is honored.
pub struct FileFetcher {
    path: PathBuf,
}

impl FileFetcher {
    /// Creates a fetcher reading from `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl RecordFetcher for FileFetcher {
    async fn fetch(&self, request: &FetchRequest) -> Result<Vec<Value>, SourceError> {
        let text = tokio::fs::read_to_string(&self.path).await?;
        let Value::Array(mut records) = serde_json::from_str::<Value>(&text)? else {
            return Err(SourceError::Fetch {
                message: format!("{}: expected a JSON array of records", self.path.display()),
            });
        };

        if let Some(limit) = request.limit {
            records.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        }

        log::info!("Read {} records from {}", records.len(), self.path.display());
        Ok(records)
    }
}
