//! Config-driven crime feed site definition.
//!
//! [`SiteDefinition`] captures everything about one city's feed: where it
//! lives, which fields to request, which date window to query, and which
//! [`AdapterKind`] normalizes its records. Definitions are loaded from TOML
//! files embedded at compile time (see [`crate::registry`]).

use chrono::{DateTime, Utc};
use crime_harvest_crime_models::ClassificationRow;
use crime_harvest_source_models::CanonicalRecord;
use serde::Deserialize;

use crate::query_window::QueryWindow;
use crate::sites::AdapterKind;
use crate::{FetchRequest, SourceError};

/// A complete description of one city's crime feed.
#[derive(Debug, Clone, Deserialize)]
pub struct SiteDefinition {
    /// Registry identifier (e.g., `"baton_rouge"`).
    pub id: String,
    /// Human-readable name (e.g., `"Baton Rouge Police Department"`).
    pub name: String,
    /// City identifier used as the record-id prefix and `source` property
    /// (e.g., `"BatonRouge"`).
    pub city: String,
    /// Whether the site is harvested by default.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Open-data portal host.
    pub host: String,
    /// Dataset resource identifier on the host.
    pub resource_id: String,
    /// Locator of the city's classification table.
    pub mapping_source: String,
    /// Fields to request from the feed, in order.
    pub select: Vec<String>,
    /// Which adapter normalizes this feed's records.
    pub adapter: AdapterKind,
    /// Date window to query.
    pub window: QueryWindow,
    /// Free-form notes about known quirks of this feed.
    #[serde(default)]
    pub notes: Option<String>,
}

const fn default_enabled() -> bool {
    true
}

impl SiteDefinition {
    /// Returns the registry identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the human-readable site name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the city identifier used to prefix record ids.
    #[must_use]
    pub fn city(&self) -> &str {
        &self.city
    }

    /// Returns the query filter for the window ending at `now`.
    #[must_use]
    pub fn query_window_at(&self, now: DateTime<Utc>) -> String {
        self.window.filter(now)
    }

    /// Returns the query filter for the window ending now.
    #[must_use]
    pub fn query_window(&self) -> String {
        if self.window.is_fixed() {
            log::warn!(
                "{}: using fixed historical window on '{}' instead of a relative lookback",
                self.id,
                self.window.field()
            );
        }
        self.query_window_at(Utc::now())
    }

    /// Builds the request handed to a [`crate::RecordFetcher`] at `now`.
    #[must_use]
    pub fn fetch_request_at(&self, now: DateTime<Utc>, limit: Option<u64>) -> FetchRequest {
        FetchRequest {
            host: self.host.clone(),
            resource_id: self.resource_id.clone(),
            select: self.select.clone(),
            filter: self.query_window_at(now),
            limit,
        }
    }

    /// Builds the request handed to a [`crate::RecordFetcher`] for now.
    #[must_use]
    pub fn fetch_request(&self, limit: Option<u64>) -> FetchRequest {
        FetchRequest {
            filter: self.query_window(),
            ..self.fetch_request_at(Utc::now(), limit)
        }
    }

    /// Normalizes raw records, stamping them with `now` as their `updated`
    /// time.
    #[must_use]
    pub fn normalize_at(
        &self,
        records: &[serde_json::Value],
        classifications: &[ClassificationRow],
        now: DateTime<Utc>,
    ) -> Vec<CanonicalRecord> {
        self.adapter
            .adapter()
            .normalize(self, records, classifications, now)
    }

    /// Normalizes raw records, stamping them with the current time.
    #[must_use]
    pub fn normalize(
        &self,
        records: &[serde_json::Value],
        classifications: &[ClassificationRow],
    ) -> Vec<CanonicalRecord> {
        self.normalize_at(records, classifications, Utc::now())
    }
}

/// Parses and validates a [`SiteDefinition`] from a TOML string.
///
/// # Errors
///
/// Returns [`SourceError::Config`] if the TOML is malformed, missing
/// required fields, or describes an empty query window.
pub fn parse_site_toml(toml_str: &str) -> Result<SiteDefinition, SourceError> {
    let site: SiteDefinition = toml::de::from_str(toml_str).map_err(|e| SourceError::Config {
        message: e.to_string(),
    })?;
    site.window
        .validate()
        .map_err(|message| SourceError::Config {
            message: format!("{}: {message}", site.id),
        })?;
    Ok(site)
}
