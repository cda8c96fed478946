use std::time::Duration;
use tracing::{debug, info};
use url::Url;

use crate::error::{Error, Result};
use crate::types::{LogQuery, LogResponse};

const FILTER_PATH: &str = "logs/filter";

/// Point an API root at its `/logs/filter` endpoint.
pub fn filter_url(api_root: &Url) -> Result<Url> {
    let trimmed = api_root.path().trim_end_matches('/');
    if trimmed.ends_with(FILTER_PATH) {
        let mut url = api_root.clone();
        url.set_path(trimmed);
        return Ok(url);
    }
    let mut root = api_root.clone();
    if !root.path().ends_with('/') {
        let path = format!("{}/", root.path());
        root.set_path(&path);
    }
    root.join(FILTER_PATH).map_err(|source| Error::InvalidUrl {
        url: api_root.to_string(),
        source,
    })
}

/// Query pairs for the filter endpoint, in the order the API documents them.
fn query_pairs(query: &LogQuery) -> Vec<(&'static str, String)> {
    let fields = [
        ("podname", query.podname.clone()),
        ("namespace", query.namespace.clone()),
        ("tail", query.tail.clone()),
        ("starttime", query.start_time.clone()),
        ("endtime", query.end_time.clone()),
        ("level", query.level.clone()),
        (
            "maxlogs",
            query
                .limit
                .filter(|l| !l.is_unlimited())
                .map(|l| l.get().to_string()),
        ),
    ];
    fields
        .into_iter()
        .filter_map(|(key, value)| value.filter(|v| !v.is_empty()).map(|v| (key, v)))
        .collect()
}

/// Build the request url. Without any filters `base` is returned unchanged.
pub fn build_request_url(base: &Url, query: &LogQuery) -> Url {
    let mut url = base.clone();
    let pairs = query_pairs(query);
    if !pairs.is_empty() {
        url.query_pairs_mut().extend_pairs(pairs);
    }
    url
}

/// Client for the log exploration API.
pub struct LogsClient {
    client: reqwest::Client,
    base: Url,
}

impl LogsClient {
    pub fn new(base: Url, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Fetch the log lines matching `query`.
    pub async fn fetch(&self, query: &LogQuery) -> Result<Vec<String>> {
        let url = build_request_url(&self.base, query);
        info!("Fetching logs from {}", url);

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status {
                status,
                url: url.to_string(),
            });
        }

        let body = response.json::<LogResponse>().await?;
        debug!("Received {} log line(s)", body.logs.len());
        Ok(body.logs)
    }
}
