//! Client for the Jolpica (Ergast-compatible) results API.

use crate::api::error::ApiError;
use crate::api::responses::{Envelope, MrData, QualifyingRecord, RaceTable};
use crate::models::RaceResultRecord;
use std::time::Duration;
use tracing::{debug, info};

/// Configuration for the results client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
    /// Rows requested per page.
    pub page_limit: usize,
}

impl From<&crate::config::ApiConfig> for ClientConfig {
    fn from(config: &crate::config::ApiConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            timeout_seconds: config.timeout_seconds,
            page_limit: config.page_limit,
        }
    }
}

/// Fetches race results and flattens them into records.
pub struct JolpicaClient {
    config: ClientConfig,
    http_client: reqwest::Client,
}

impl JolpicaClient {
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("gridstats/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ApiError::ClientBuild)?;

        Ok(Self {
            config,
            http_client,
        })
    }

    /// Endpoint path for a driver's results, optionally within one season.
    pub fn results_endpoint(driver_id: &str, season: Option<&str>) -> String {
        driver_endpoint(driver_id, season, "results")
    }

    /// Endpoint path for a driver's qualifying sessions.
    pub fn qualifying_endpoint(driver_id: &str, season: Option<&str>) -> String {
        driver_endpoint(driver_id, season, "qualifying")
    }

    /// Full URL for one page of an endpoint.
    pub fn page_url(&self, endpoint: &str, offset: usize) -> String {
        format!(
            "{}{}?limit={}&offset={}",
            self.config.base_url.trim_end_matches('/'),
            endpoint,
            self.config.page_limit,
            offset
        )
    }

    /// Fetch every result for a driver, following pagination.
    pub async fn driver_results(
        &self,
        driver_id: &str,
        season: Option<&str>,
    ) -> Result<Vec<RaceResultRecord>, ApiError> {
        let endpoint = Self::results_endpoint(driver_id, season);
        info!("Fetching results for {} from {}", driver_id, endpoint);

        let records = self.fetch_race_table(&endpoint).await?.into_records();

        info!("Fetched {} results for {}", records.len(), driver_id);
        Ok(records)
    }

    /// Fetch every qualifying classification for a driver.
    pub async fn driver_qualifying(
        &self,
        driver_id: &str,
        season: Option<&str>,
    ) -> Result<Vec<QualifyingRecord>, ApiError> {
        let endpoint = Self::qualifying_endpoint(driver_id, season);
        info!("Fetching qualifying for {} from {}", driver_id, endpoint);

        let qualifying = self.fetch_race_table(&endpoint).await?.into_qualifying();

        debug!("Fetched {} qualifying rows for {}", qualifying.len(), driver_id);
        Ok(qualifying)
    }

    /// Fetch a driver's results with their qualifying positions attached.
    pub async fn driver_records(
        &self,
        driver_id: &str,
        season: Option<&str>,
    ) -> Result<Vec<RaceResultRecord>, ApiError> {
        let (mut records, qualifying) = futures::try_join!(
            self.driver_results(driver_id, season),
            self.driver_qualifying(driver_id, season)
        )?;

        let matched = super::attach_qualifying(&mut records, qualifying);
        debug!(
            "Matched qualifying for {} of {} races for {}",
            matched,
            records.len(),
            driver_id
        );

        Ok(records)
    }

    /// Fetch every page of an endpoint and merge the race tables.
    async fn fetch_race_table(&self, endpoint: &str) -> Result<RaceTable, ApiError> {
        let mut table = RaceTable::default();
        let mut offset = 0;

        loop {
            let page = self.fetch_page(endpoint, offset).await?;
            let rows = page.result_count();
            let next = next_page_offset(
                offset,
                page.limit(),
                self.config.page_limit,
                rows,
                page.total(),
            );

            debug!(
                "Fetched {} rows at offset {} ({} total)",
                rows,
                page.offset(),
                page.total()
            );
            table.races.extend(page.race_table.races);

            match next {
                Some(next) => offset = next,
                None => break,
            }
        }

        Ok(table)
    }

    async fn fetch_page(&self, endpoint: &str, offset: usize) -> Result<MrData, ApiError> {
        let url = self.page_url(endpoint, offset);

        let response = self.http_client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                ApiError::Timeout(self.config.timeout_seconds)
            } else if e.is_connect() {
                ApiError::Connection(self.config.base_url.clone())
            } else {
                ApiError::Request(e)
            }
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status { status, body });
        }

        let envelope: Envelope = response
            .json()
            .await
            .map_err(|e| ApiError::Deserialization(e.to_string()))?;

        Ok(envelope.mr_data)
    }
}

fn driver_endpoint(driver_id: &str, season: Option<&str>, resource: &str) -> String {
    match season {
        Some(season) => format!("/{}/drivers/{}/{}.json", season, driver_id, resource),
        None => format!("/drivers/{}/{}.json", driver_id, resource),
    }
}

/// Offset of the page after the one requested at `offset`, or `None` once
/// every row is in.
///
/// A page without a usable `limit` advances by `page_limit`. An empty page
/// or a missing `total` ends the walk.
pub fn next_page_offset(
    offset: usize,
    limit: usize,
    page_limit: usize,
    rows: usize,
    total: usize,
) -> Option<usize> {
    let step = if limit == 0 { page_limit } else { limit };
    let next = offset + step;
    (rows > 0 && step > 0 && next < total).then_some(next)
}
