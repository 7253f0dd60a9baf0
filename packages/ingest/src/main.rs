#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the crime feed harvester.

use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use crime_harvest_ingest::local::FileFetcher;
use crime_harvest_ingest::progress::{init_logger, sites_bar};
use crime_harvest_ingest::sink::GeoJsonFileSink;
use crime_harvest_ingest::{all_sites, enabled_sites, harvest_site};
use crime_harvest_ingest_models::HarvestOptions;
use crime_harvest_source::mapping::CsvMappingLoader;
use crime_harvest_source::registry::find_site;
use crime_harvest_source::site_def::SiteDefinition;
use crime_harvest_source::socrata::SocrataFetcher;

#[derive(Parser)]
#[command(name = "crime_harvest_ingest", about = "City crime feed harvester")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all configured sites
    Sites,
    /// Print the query filter a site would use
    Window {
        /// Site identifier (e.g., "`baton_rouge`")
        site: String,
        /// Compute the window as of this date (YYYY-MM-DD) instead of now
        #[arg(long)]
        at: Option<NaiveDate>,
    },
    /// Fetch, normalize, and write records for the selected sites
    Harvest {
        /// Comma-separated list of site IDs (overrides `CRIME_HARVEST_SITES` env var)
        #[arg(long)]
        sites: Option<String>,
        /// Maximum number of records per site (for testing)
        #[arg(long)]
        limit: Option<u64>,
        /// Directory the `GeoJSON` files are written to
        #[arg(long, default_value = "data")]
        output_dir: PathBuf,
    },
    /// Normalize previously downloaded records from local files
    Normalize {
        /// Site identifier whose adapter should be used
        site: String,
        /// JSON file holding an array of raw records
        #[arg(long)]
        records: PathBuf,
        /// Classification table (local path or URL)
        #[arg(long)]
        mapping: String,
        /// Directory the `GeoJSON` file is written to
        #[arg(long, default_value = "data")]
        output_dir: PathBuf,
    },
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}

fn lookup_site(id: &str) -> Result<SiteDefinition, String> {
    find_site(id).ok_or_else(|| format!("Unknown site: {id}"))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = init_logger();
    let cli = Cli::parse();

    match cli.command {
        Commands::Sites => {
            println!("{:<14} {:<12} {:<8} WINDOW", "ID", "CITY", "ENABLED");
            println!("{}", "-".repeat(80));
            for site in &all_sites() {
                println!(
                    "{:<14} {:<12} {:<8} {}",
                    site.id(),
                    site.city(),
                    site.enabled,
                    site.query_window_at(Utc::now())
                );
            }
        }
        Commands::Window { site, at } => {
            let site = lookup_site(&site)?;
            let filter = match at {
                Some(date) => site.query_window_at(start_of_day(date)),
                None => site.query_window(),
            };
            println!("{filter}");
        }
        Commands::Harvest {
            sites,
            limit,
            output_dir,
        } => {
            let sites = enabled_sites(sites);
            log::info!(
                "Harvesting {} site(s): {}",
                sites.len(),
                sites
                    .iter()
                    .map(SiteDefinition::id)
                    .collect::<Vec<_>>()
                    .join(", ")
            );

            let fetcher = SocrataFetcher::new();
            let loader = CsvMappingLoader::new();
            let sink = GeoJsonFileSink::new(output_dir);
            let options = HarvestOptions { limit, at: None };
            let bar = sites_bar(&multi, sites.len() as u64);

            let mut failed = 0usize;
            for site in &sites {
                bar.set_message(format!("Harvesting {}", site.id()));
                if let Err(e) = harvest_site(site, &fetcher, &loader, &sink, &options).await {
                    log::error!("Failed to harvest {}: {e}", site.id());
                    failed += 1;
                }
                bar.inc(1);
            }
            bar.finish_with_message(format!(
                "Harvested {} site(s), {failed} failed",
                sites.len() - failed
            ));
        }
        Commands::Normalize {
            site,
            records,
            mapping,
            output_dir,
        } => {
            let mut site = lookup_site(&site)?;
            site.mapping_source = mapping;

            let summary = harvest_site(
                &site,
                &FileFetcher::new(records),
                &CsvMappingLoader::new(),
                &GeoJsonFileSink::new(output_dir),
                &HarvestOptions::default(),
            )
            .await?;
            println!(
                "{}: {} raw, {} normalized, {} written",
                summary.site_id, summary.fetched, summary.normalized, summary.written
            );
        }
    }

    Ok(())
}
