#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Harvest configuration and result types.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Configuration for harvesting one site.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HarvestOptions {
    /// Maximum number of records to fetch (useful for testing).
    pub limit: Option<u64>,
    /// Moment the query window ends at and records are stamped with.
    /// `None` means the current time.
    pub at: Option<DateTime<Utc>>,
}

impl HarvestOptions {
    /// Returns the configured moment, or the current time.
    #[must_use]
    pub fn at_or_now(&self) -> DateTime<Utc> {
        self.at.unwrap_or_else(Utc::now)
    }
}

/// Result of harvesting one site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarvestSummary {
    /// Registry id of the harvested site.
    pub site_id: String,
    /// Number of raw records fetched from the feed.
    pub fetched: u64,
    /// Number of records that survived normalization.
    pub normalized: u64,
    /// Number of records the sink reported as written.
    pub written: u64,
    /// How long the harvest took.
    pub duration: Duration,
}

impl HarvestSummary {
    /// Number of raw records dropped during normalization.
    #[must_use]
    pub const fn dropped(&self) -> u64 {
        self.fetched.saturating_sub(self.normalized)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn fixed_moment_is_used() {
        let at = Utc.with_ymd_and_hms(2017, 7, 3, 0, 0, 0).unwrap();
        let options = HarvestOptions {
            limit: None,
            at: Some(at),
        };
        assert_eq!(options.at_or_now(), at);
    }

    #[test]
    fn counts_dropped_records() {
        let summary = HarvestSummary {
            site_id: "vegas".to_string(),
            fetched: 10,
            normalized: 7,
            written: 7,
            duration: Duration::from_millis(5),
        };
        assert_eq!(summary.dropped(), 3);

        let value = serde_json::to_value(&summary).unwrap();
        assert_eq!(value["site_id"], "vegas");
        assert_eq!(value["written"], 7);
    }
}
