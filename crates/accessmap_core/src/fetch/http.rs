//! HTTP implementation of the place fetcher.
//!
//! # Responsibility
//! - Issue the single nearby-places GET against the configured service.
//! - Decode the JSON array body into typed place records.
//!
//! # Invariants
//! - Exactly one request per `fetch_nearby` call; failures are returned,
//!   never retried here.
//! - The client is constructed once per fetcher and injected into the
//!   session, not shared through process globals.

use super::{FetchError, FetchResult, PlaceFetcher, PlaceQuery};
use crate::model::place::PlaceRecord;
use log::{error, info};
use std::time::{Duration, Instant};

const PLACES_PATH: &str = "nearby-places-with-accessibility";
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Blocking HTTP fetcher for the accessibility places service.
pub struct HttpPlaceFetcher {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl HttpPlaceFetcher {
    /// Creates a fetcher for one service base URL (scheme + host + port).
    pub fn new(base_url: impl Into<String>) -> FetchResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|err| FetchError::Transport(err.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }
}

impl PlaceFetcher for HttpPlaceFetcher {
    fn fetch_nearby(&self, query: &PlaceQuery) -> FetchResult<Vec<PlaceRecord>> {
        let started_at = Instant::now();
        let url = places_url(&self.base_url);
        info!(
            "event=places_fetch module=fetch status=start lat={} lon={} radius_m={}",
            query.center.lat, query.center.lon, query.radius_m
        );

        let outcome = self.request(&url, query);
        match &outcome {
            Ok(records) => info!(
                "event=places_fetch module=fetch status=ok count={} duration_ms={}",
                records.len(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=places_fetch module=fetch status=error duration_ms={} error={}",
                started_at.elapsed().as_millis(),
                err
            ),
        }
        outcome
    }
}

impl HttpPlaceFetcher {
    fn request(&self, url: &str, query: &PlaceQuery) -> FetchResult<Vec<PlaceRecord>> {
        let response = self
            .client
            .get(url)
            .query(&query_pairs(query))
            .send()
            .map_err(|err| FetchError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                code: status.as_u16(),
            });
        }

        response
            .json::<Vec<PlaceRecord>>()
            .map_err(|err| FetchError::Decode(err.to_string()))
    }
}

fn places_url(base_url: &str) -> String {
    format!("{}/{PLACES_PATH}", base_url.trim_end_matches('/'))
}

fn query_pairs(query: &PlaceQuery) -> [(&'static str, String); 4] {
    [
        ("lat", query.center.lat.to_string()),
        ("lon", query.center.lon.to_string()),
        ("types", query.types.join(",")),
        ("radius", query.radius_m.to_string()),
    ]
}
