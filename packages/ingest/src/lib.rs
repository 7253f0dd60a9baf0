#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Library for harvesting city crime feeds into normalized `GeoJSON`.
//!
//! [`harvest_site`] runs one site end to end: fetch raw records, load the
//! city's classification table, normalize, and hand the result to a sink.

pub mod local;
pub mod progress;
pub mod sink;

use std::time::Instant;

use crime_harvest_ingest_models::{HarvestOptions, HarvestSummary};
use crime_harvest_source::registry;
use crime_harvest_source::site_def::SiteDefinition;
use crime_harvest_source::{MappingLoader, RecordFetcher, RecordSink, SourceError};

/// Environment variable holding a comma-separated list of site ids to
/// harvest when no CLI filter is given.
pub const SITES_ENV_VAR: &str = "CRIME_HARVEST_SITES";

/// Returns all configured sites from the TOML registry, including
/// disabled ones.
#[must_use]
pub fn all_sites() -> Vec<SiteDefinition> {
    registry::all_sites()
}

/// Returns the sites to harvest, filtered by the `--sites` CLI flag or the
/// `CRIME_HARVEST_SITES` environment variable. If neither is set, the
/// enabled sites are returned.
///
/// An explicit filter may name disabled sites.
#[must_use]
pub fn enabled_sites(cli_filter: Option<String>) -> Vec<SiteDefinition> {
    let filter = cli_filter.or_else(|| std::env::var(SITES_ENV_VAR).ok());

    let Some(filter_str) = filter else {
        return registry::active_sites();
    };

    let ids = parse_site_filter(&filter_str);
    if ids.is_empty() {
        return registry::active_sites();
    }

    let filtered: Vec<SiteDefinition> = all_sites()
        .into_iter()
        .filter(|s| ids.contains(&s.id()))
        .collect();

    if filtered.is_empty() {
        log::warn!(
            "No matching sites found for filter {:?}. Available: {}",
            ids,
            all_sites()
                .iter()
                .map(|s| s.id().to_string())
                .collect::<Vec<_>>()
                .join(", ")
        );
    }

    filtered
}

/// Splits a comma-separated site filter, dropping blank entries.
#[must_use]
pub fn parse_site_filter(filter: &str) -> Vec<&str> {
    filter
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .collect()
}

/// Harvests a single site: fetch, load the classification table, normalize,
/// and write.
///
/// # Errors
///
/// Returns [`SourceError`] if fetching, table loading, or writing fails.
/// Normalization itself never fails.
pub async fn harvest_site(
    site: &SiteDefinition,
    fetcher: &dyn RecordFetcher,
    loader: &dyn MappingLoader,
    sink: &dyn RecordSink,
    options: &HarvestOptions,
) -> Result<HarvestSummary, SourceError> {
    let start = Instant::now();
    log::info!("Harvesting site: {} ({})", site.name(), site.id());

    let request = match options.at {
        Some(at) => site.fetch_request_at(at, options.limit),
        None => site.fetch_request(options.limit),
    };
    log::debug!("{}: query window {}", site.id(), request.filter);

    let raw = fetcher.fetch(&request).await?;
    let classifications = loader.load(&site.mapping_source).await?;
    let records = site.normalize_at(&raw, &classifications, options.at_or_now());
    let written = sink.write(site, &records).await?;

    let summary = HarvestSummary {
        site_id: site.id().to_string(),
        fetched: raw.len() as u64,
        normalized: records.len() as u64,
        written,
        duration: start.elapsed(),
    };

    log::info!(
        "{}: fetched {}, normalized {}, wrote {} in {:.1}s",
        site.id(),
        summary.fetched,
        summary.normalized,
        summary.written,
        summary.duration.as_secs_f64()
    );

    Ok(summary)
}
