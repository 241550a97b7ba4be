//! Core domain logic for AccessMap.
//! This crate is the single source of truth for business invariants.

pub mod classify;
pub mod db;
pub mod fetch;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use classify::{marker_hue, MarkerHue};
pub use fetch::{FetchError, FetchResult, HttpPlaceFetcher, PlaceFetcher, PlaceQuery};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::feedback::{FeedbackFlags, FeedbackRecord};
pub use model::geo::{GeoPoint, GeoPointError};
pub use model::place::{PlaceRecord, WheelchairFlags};
pub use model::point::{AnnotatedPoint, PointSource};
pub use repo::feedback_repo::{FeedbackStore, SqliteFeedbackStore, StoreError, StoreResult};
pub use service::session::{
    FeedbackSubmission, MapSession, SessionConfig, SessionError, SessionPhase, SessionResult,
    SessionSnapshot,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
