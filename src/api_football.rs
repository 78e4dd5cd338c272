use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use serde::Deserialize;
use tracing::{error, info, info_span, warn};

use crate::model::fixture::FixtureRecord;

const FIXTURES_URL: &str = "https://v3.football.api-sports.io/fixtures";
const API_KEY_HEADER: &str = "x-apisports-key";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors from a single fixtures request. These collapse to an empty fixture list at
/// the `FixtureSource` boundary; they stay distinct here so the diagnostic path can
/// be asserted on without a network.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("fixtures request failed: {0}")]
    Transport(#[from] ureq::Error),
    #[error("failed to decode fixtures response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// One day's worth of fixtures, in the provider's terms. Built fresh per invocation
/// and discarded with it.
#[derive(Debug, Clone)]
pub struct FixtureQuery {
    pub date: NaiveDate,
    pub timezone: Tz,
}

impl FixtureQuery {
    /// The current calendar date as observed in `tz`.
    pub fn today(tz: Tz) -> Self {
        Self {
            date: Utc::now().with_timezone(&tz).date_naive(),
            timezone: tz,
        }
    }
}

/// Source of raw fixture records. The lambda wires in `ApiFootball`; tests substitute
/// counting stubs.
#[async_trait]
pub trait FixtureSource {
    /// Fetch fixtures for `query`, degrading to an empty list on any failure.
    async fn fetch(&self, query: &FixtureQuery) -> Vec<FixtureRecord>;
}

/// API-Football client holding the credential and a pre-configured agent.
#[derive(Clone)]
pub struct ApiFootball {
    agent: ureq::Agent,
    api_key: String,
}

/// The provider wraps the fixture collection in a `response` field alongside paging
/// and error envelopes we have no use for.
#[derive(Debug, Default, Deserialize)]
struct FixturesDocument {
    #[serde(default)]
    response: Vec<serde_json::Value>,
}

impl ApiFootball {
    pub fn new(api_key: String) -> Self {
        // Deliberate timeout rather than an unbounded default.
        let agent = ureq::Agent::config_builder()
            .timeout_global(Some(REQUEST_TIMEOUT))
            .build()
            .new_agent();
        Self { agent, api_key }
    }

    /// Issue the single fixtures request for `query`. Exactly one attempt, no retry.
    pub fn try_fetch(&self, query: &FixtureQuery) -> Result<Vec<FixtureRecord>, FetchError> {
        let response = {
            let _span = info_span!(
                "fixtures_fetch",
                date = %query.date,
                timezone = query.timezone.name()
            )
            .entered();
            self.agent
                .get(FIXTURES_URL)
                .query("date", &query.date.to_string())
                .query("timezone", query.timezone.name())
                .header(API_KEY_HEADER, &self.api_key)
                .call()?
        };
        let mut body_reader = response.into_body();
        let body = body_reader.read_to_string()?;
        Self::parse_response(&body)
    }

    /// Decode a fixtures response body (no network). A record that fails to decode is
    /// skipped with a diagnostic; it does not fail the batch.
    pub fn parse_response(body: &str) -> Result<Vec<FixtureRecord>, FetchError> {
        let doc: FixturesDocument = serde_json::from_str(body)?;
        let mut fixtures = Vec::with_capacity(doc.response.len());
        for value in doc.response {
            match serde_json::from_value::<FixtureRecord>(value) {
                Ok(record) => fixtures.push(record),
                Err(e) => warn!(error = %e, "Skipping fixture record that failed to decode"),
            }
        }
        Ok(fixtures)
    }
}

#[async_trait]
impl FixtureSource for ApiFootball {
    async fn fetch(&self, query: &FixtureQuery) -> Vec<FixtureRecord> {
        // Clone because spawn_blocking's 'move' closure requires 'static owned data.
        let client = self.clone();
        let query = query.clone();
        match tokio::task::spawn_blocking(move || client.try_fetch(&query)).await {
            Ok(Ok(fixtures)) => {
                info!(count = fixtures.len(), "Fetched fixtures for today");
                fixtures
            }
            // Fail open: a provider outage must not fail the invocation.
            Ok(Err(e)) => {
                error!(error = %e, "Fixtures fetch failed, continuing with no fixtures");
                Vec::new()
            }
            Err(e) => {
                error!(error = %e, "Fixtures fetch task failed, continuing with no fixtures");
                Vec::new()
            }
        }
    }
}
