//! Socrata SODA API fetcher.
//!
//! Every shipped city publishes on a Socrata portal, so one fetcher serves
//! them all. Records are requested with `$select`, `$where`, `$limit`, and
//! `$offset` and paged until a short page comes back.

use async_trait::async_trait;
use serde_json::Value;

use crate::{FetchRequest, RecordFetcher, SourceError, retry};

/// Default page size for pagination.
pub const DEFAULT_PAGE_SIZE: u64 = 50_000;

/// Fetches raw records from a Socrata dataset.
pub struct SocrataFetcher {
    client: reqwest::Client,
    page_size: u64,
}

impl SocrataFetcher {
    /// Creates a fetcher with the default page size.
    #[must_use]
    pub fn new() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }

    /// Creates a fetcher requesting at most `page_size` records per call.
    #[must_use]
    pub fn with_page_size(page_size: u64) -> Self {
        Self {
            client: reqwest::Client::new(),
            page_size: page_size.max(1),
        }
    }
}

impl Default for SocrataFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordFetcher for SocrataFetcher {
    async fn fetch(&self, request: &FetchRequest) -> Result<Vec<Value>, SourceError> {
        let url = build_request_url(&request.host, &request.resource_id);
        let fetch_limit = request.limit.unwrap_or(u64::MAX);
        let mut all_records: Vec<Value> = Vec::new();
        let mut offset: u64 = 0;

        loop {
            let remaining = fetch_limit.saturating_sub(offset);
            if remaining == 0 {
                break;
            }
            let page_limit = remaining.min(self.page_size);
            let params = query_params(request, offset, page_limit);

            log::info!("Fetching {url}: offset={offset}, limit={page_limit}");
            let body = retry::send_json(|| self.client.get(&url).query(&params)).await?;
            let Value::Array(records) = body else {
                return Err(SourceError::Fetch {
                    message: format!("{url}: expected a JSON array of records"),
                });
            };

            let count = records.len() as u64;
            all_records.extend(records);
            offset += count;

            if count < page_limit {
                break;
            }
        }

        log::info!("Downloaded {} records from {url}", all_records.len());
        Ok(all_records)
    }
}

/// Builds the SODA resource endpoint for a dataset.
///
/// Trailing slashes on the host are dropped and `.json` is appended when
/// the resource id carries no extension.
#[must_use]
pub fn build_request_url(host: &str, resource_id: &str) -> String {
    let host = host.trim_end_matches('/');
    let resource_id = resource_id.trim_start_matches('/');
    if resource_id.ends_with(".json") {
        format!("{host}/resource/{resource_id}")
    } else {
        format!("{host}/resource/{resource_id}.json")
    }
}

/// Query parameters for one page of a request.
#[must_use]
pub fn query_params(
    request: &FetchRequest,
    offset: u64,
    page_limit: u64,
) -> Vec<(&'static str, String)> {
    let mut params = Vec::with_capacity(4);
    if !request.select.is_empty() {
        params.push(("$select", request.select.join(",")));
    }
    if !request.filter.is_empty() {
        params.push(("$where", request.filter.clone()));
    }
    params.push(("$limit", page_limit.to_string()));
    params.push(("$offset", offset.to_string()));
    params
}
