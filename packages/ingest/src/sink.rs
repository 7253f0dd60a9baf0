//! `GeoJSON` file sink.

use std::path::PathBuf;

use async_trait::async_trait;
use crime_harvest_source::site_def::SiteDefinition;
use crime_harvest_source::{RecordSink, SourceError};
use crime_harvest_source_models::CanonicalRecord;

/// Writes each site's records as a pretty-printed `FeatureCollection` to
/// `<output_dir>/<site id>.geojson`, replacing any previous file.
pub struct GeoJsonFileSink {
    output_dir: PathBuf,
}

impl GeoJsonFileSink {
    /// Creates a sink writing into `output_dir`.
    #[must_use]
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Returns the file a site's records are written to.
    #[must_use]
    pub fn path_for(&self, site: &SiteDefinition) -> PathBuf {
        self.output_dir.join(format!("{}.geojson", site.id))
    }
}

#[async_trait]
impl RecordSink for GeoJsonFileSink {
    async fn write(
        &self,
        site: &SiteDefinition,
        records: &[CanonicalRecord],
    ) -> Result<u64, SourceError> {
        tokio::fs::create_dir_all(&self.output_dir).await?;

        let collection = serde_json::json!({
            "type": "FeatureCollection",
            "features": records,
        });
        let path = self.path_for(site);
        tokio::fs::write(&path, serde_json::to_vec_pretty(&collection)?).await?;

        log::info!("{}: wrote {} records to {}", site.city, records.len(), path.display());
        Ok(records.len() as u64)
    }
}
