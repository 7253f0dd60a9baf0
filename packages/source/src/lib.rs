#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Per-city crime feed adapters and the site registry.
//!
//! Each city feed is described by a [`SiteDefinition`](site_def::SiteDefinition)
//! loaded from embedded TOML. The definition names one of the
//! [`CrimeSiteAdapter`] implementations in [`sites`], which turns the
//! city's raw records into [`CanonicalRecord`]s annotated with
//! classification flags resolved through [`categorization::lookup`].
//!
//! Fetching raw records, loading classification tables, and persisting
//! results sit behind the [`RecordFetcher`], [`MappingLoader`], and
//! [`RecordSink`] traits.

pub mod categorization;
pub mod mapping;
pub mod parsing;
pub mod query_window;
pub mod registry;
pub mod retry;
pub mod site_def;
pub mod sites;
pub mod socrata;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use crime_harvest_crime_models::ClassificationRow;
use crime_harvest_source_models::CanonicalRecord;

use crate::site_def::SiteDefinition;

/// Errors that can occur while fetching, loading, or persisting feed data.
///
/// Normalization itself never fails; these cover the collaborators around
/// it.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error (file read/write).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Classification table could not be parsed.
    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),

    /// A site definition is malformed.
    #[error("Invalid site definition: {message}")]
    Config {
        /// Description of what went wrong.
        message: String,
    },

    /// The upstream feed answered with an unusable response.
    #[error("Fetch failed: {message}")]
    Fetch {
        /// Description of what went wrong.
        message: String,
    },
}

/// Transforms one city's raw feed records into [`CanonicalRecord`]s.
///
/// Implementations handle a single raw record at a time and never fail:
/// missing or malformed fields degrade to defaults. Returning `None` drops
/// the record from the output, which only the cities that require a
/// location do.
pub trait CrimeSiteAdapter: Send + Sync {
    /// Normalizes a single raw record.
    ///
    /// `updated` is the normalization time in epoch milliseconds.
    fn normalize_record(
        &self,
        site: &SiteDefinition,
        record: &serde_json::Value,
        classifications: &[ClassificationRow],
        updated: i64,
    ) -> Option<CanonicalRecord>;

    /// Normalizes a batch of raw records, preserving input order.
    fn normalize(
        &self,
        site: &SiteDefinition,
        records: &[serde_json::Value],
        classifications: &[ClassificationRow],
        now: DateTime<Utc>,
    ) -> Vec<CanonicalRecord> {
        let updated = now.timestamp_millis();
        let normalized: Vec<CanonicalRecord> = records
            .iter()
            .filter_map(|record| self.normalize_record(site, record, classifications, updated))
            .collect();

        log::info!(
            "{}: normalized {} records from {} raw records",
            site.city,
            normalized.len(),
            records.len()
        );

        normalized
    }
}

/// What a [`RecordFetcher`] should retrieve for one site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    /// Host of the open-data portal (e.g., `"https://data.sfgov.org"`).
    pub host: String,
    /// Dataset resource identifier (e.g., `"tmnf-yvry.json"`).
    pub resource_id: String,
    /// Fields to request, in order.
    pub select: Vec<String>,
    /// Filter predicate produced by the site's query window.
    pub filter: String,
    /// Maximum number of records to fetch.
    pub limit: Option<u64>,
}

/// Retrieves raw feed records.
#[async_trait]
pub trait RecordFetcher: Send + Sync {
    /// Fetches every raw record matching `request`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the records cannot be retrieved.
    async fn fetch(&self, request: &FetchRequest) -> Result<Vec<serde_json::Value>, SourceError>;
}

/// Loads a city's classification table.
#[async_trait]
pub trait MappingLoader: Send + Sync {
    /// Loads the ordered classification rows found at `locator`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the table cannot be read or parsed.
    async fn load(&self, locator: &str) -> Result<Vec<ClassificationRow>, SourceError>;
}

/// Persists normalized records.
#[async_trait]
pub trait RecordSink: Send + Sync {
    /// Writes `records` for `site`, returning how many were written.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the records cannot be persisted.
    async fn write(
        &self,
        site: &SiteDefinition,
        records: &[CanonicalRecord],
    ) -> Result<u64, SourceError>;
}
