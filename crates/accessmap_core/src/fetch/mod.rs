//! Remote place fetching contracts.
//!
//! # Responsibility
//! - Define the query shape and the fetcher seam the pipeline depends on.
//! - Keep transport details behind the trait so sessions and tests can
//!   inject their own implementations.
//!
//! # Invariants
//! - One `fetch_nearby` call performs at most one outbound request; there
//!   is no retry and no caching at this layer.
//! - Errors are explicit values; mapping failures to an empty result is the
//!   caller's policy, not the fetcher's.

use crate::model::geo::GeoPoint;
use crate::model::place::PlaceRecord;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod http;

pub use http::HttpPlaceFetcher;

pub type FetchResult<T> = Result<T, FetchError>;

/// Fetch-layer error for transport, response status and body decoding.
#[derive(Debug)]
pub enum FetchError {
    /// Connection, TLS or timeout failure before a response arrived.
    Transport(String),
    /// Response arrived with a non-success status code.
    Status { code: u16 },
    /// Response body was not the expected JSON array.
    Decode(String),
}

impl Display for FetchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport(message) => write!(f, "place fetch transport failed: {message}"),
            Self::Status { code } => write!(f, "place fetch returned status {code}"),
            Self::Decode(message) => write!(f, "place response could not be decoded: {message}"),
        }
    }
}

impl Error for FetchError {}

/// One nearby-places query.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceQuery {
    /// Search center in decimal degrees.
    pub center: GeoPoint,
    /// Search radius in meters; expected to be positive.
    pub radius_m: u32,
    /// Place categories to search, sent comma-joined.
    pub types: Vec<String>,
}

/// Fetcher seam between the aggregation pipeline and the remote dataset.
pub trait PlaceFetcher {
    /// Issues one nearby-places query and returns records in response order.
    fn fetch_nearby(&self, query: &PlaceQuery) -> FetchResult<Vec<PlaceRecord>>;
}
