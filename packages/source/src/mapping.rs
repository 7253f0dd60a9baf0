//! Classification table loading.
//!
//! Each city publishes its classification table as a CSV file whose header
//! row names the columns (e.g. `UCR,CDSNV,CDSDV,CDSSTREET`). Tables are
//! read from an `http(s)` URL or a local path and kept in file order, since
//! lookups take the first matching row.

use std::path::Path;

use async_trait::async_trait;
use crime_harvest_crime_models::ClassificationRow;
use serde_json::Value;

use crate::{MappingLoader, SourceError, retry};

/// Loads classification tables from CSV files.
pub struct CsvMappingLoader {
    client: reqwest::Client,
}

impl CsvMappingLoader {
    /// Creates a new CSV mapping loader.
    #[must_use]
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for CsvMappingLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MappingLoader for CsvMappingLoader {
    async fn load(&self, locator: &str) -> Result<Vec<ClassificationRow>, SourceError> {
        let text = if is_remote(locator) {
            retry::send_text(|| self.client.get(locator)).await?
        } else {
            tokio::fs::read_to_string(Path::new(locator)).await?
        };

        let rows = parse_classification_csv(&text)?;
        log::info!("Loaded {} classification rows from {locator}", rows.len());
        Ok(rows)
    }
}

fn is_remote(locator: &str) -> bool {
    locator.starts_with("http://") || locator.starts_with("https://")
}

/// Parses a classification table.
///
/// Header names and cell text are trimmed and every value is kept as a
/// JSON string. Short rows fill their missing cells with empty strings.
///
/// # Errors
///
/// Returns [`SourceError::Csv`] if the CSV is malformed, or
/// [`SourceError::Config`] if it has no header row.
pub fn parse_classification_csv(text: &str) -> Result<Vec<ClassificationRow>, SourceError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_owned())
        .collect();

    if headers.iter().all(String::is_empty) {
        return Err(SourceError::Config {
            message: "classification table contains no header row".to_owned(),
        });
    }

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        let row: ClassificationRow = headers
            .iter()
            .enumerate()
            .filter(|(_, header)| !header.is_empty())
            .map(|(i, header)| {
                let value = record.get(i).unwrap_or("").trim().to_owned();
                (header.clone(), Value::String(value))
            })
            .collect();
        rows.push(row);
    }

    Ok(rows)
}
