//! Map screen session: the state machine that turns permission updates,
//! location updates and feedback submissions into one published point set.
//!
//! # Responsibility
//! - Trigger exactly one nearby-place fetch per session, once a granted
//!   permission and a device coordinate are both known.
//! - Filter fetched records down to the ones worth rendering, classify
//!   them, and merge them with locally stored feedback.
//! - Accept feedback submissions at any time, persist the grown
//!   collection as a whole, and republish without another fetch.
//!
//! # Invariants
//! - The fetch latch is set before the fetcher runs; no later permission
//!   or location update can trigger a second fetch.
//! - A fetch failure degrades the remote contribution to empty and the
//!   session still reaches `Merged`.
//! - Published order is fetched records in response order, then feedback
//!   records in insertion order. Nothing is deduplicated; a place present
//!   both remotely and in feedback is published twice.
//! - A submission whose persistence fails leaves the session exactly as
//!   it was before the call.

use std::error::Error;
use std::fmt;

use log::{info, warn};

use crate::classify::{
    feedback_summary, feedback_tier, wheelchair_summary, wheelchair_tier,
};
use crate::fetch::{PlaceFetcher, PlaceQuery};
use crate::model::feedback::{FeedbackFlags, FeedbackRecord};
use crate::model::geo::{GeoPoint, GeoPointError};
use crate::model::place::PlaceRecord;
use crate::model::point::{AnnotatedPoint, PointSource};
use crate::repo::feedback_repo::{FeedbackStore, StoreError};

/// Title shown for a fetched place that carries no name.
pub const REMOTE_TITLE_FALLBACK: &str = "Unknown place";

/// Title shown for a locally submitted report that carries no place name.
pub const FEEDBACK_TITLE_FALLBACK: &str = "User report";

/// Default search radius in meters.
pub const DEFAULT_RADIUS_M: u32 = 2_000;

/// Default place categories requested from the remote service.
pub const DEFAULT_PLACE_TYPES: [&str; 6] =
    ["cafe", "restaurant", "store", "park", "museum", "hospital"];

/// Errors surfaced by session operations.
#[derive(Debug)]
pub enum SessionError {
    /// Submitted coordinate is non-finite or out of range.
    InvalidCoordinate(GeoPointError),
    /// The feedback store failed to load or persist the collection.
    Store(StoreError),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::InvalidCoordinate(err) => {
                write!(f, "invalid feedback coordinate: {err}")
            }
            SessionError::Store(err) => write!(f, "feedback store error: {err}"),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SessionError::InvalidCoordinate(err) => Some(err),
            SessionError::Store(err) => Some(err),
        }
    }
}

impl From<GeoPointError> for SessionError {
    fn from(err: GeoPointError) -> Self {
        SessionError::InvalidCoordinate(err)
    }
}

impl From<StoreError> for SessionError {
    fn from(err: StoreError) -> Self {
        SessionError::Store(err)
    }
}

pub type SessionResult<T> = Result<T, SessionError>;

/// Lifecycle phase of the session pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No fetch triggered yet; only stored feedback is published.
    Idle,
    /// The one-shot fetch is underway.
    FetchPending,
    /// Remote and feedback points have been merged at least once.
    Merged,
}

impl SessionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionPhase::Idle => "idle",
            SessionPhase::FetchPending => "fetch_pending",
            SessionPhase::Merged => "merged",
        }
    }
}

/// Tunables fixed at session construction.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub radius_m: u32,
    pub place_types: Vec<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            radius_m: DEFAULT_RADIUS_M,
            place_types: DEFAULT_PLACE_TYPES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// One feedback form as handed over by the UI layer.
#[derive(Debug, Clone)]
pub struct FeedbackSubmission {
    pub lat: f64,
    pub lon: f64,
    pub place_name: Option<String>,
    pub note: Option<String>,
    pub flags: FeedbackFlags,
}

/// Immutable view of the session handed to rendering layers.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    pub device_location: Option<GeoPoint>,
    pub points: Vec<AnnotatedPoint>,
}

/// Aggregation pipeline for one map screen session.
pub struct MapSession<F: PlaceFetcher, S: FeedbackStore> {
    fetcher: F,
    store: S,
    config: SessionConfig,
    phase: SessionPhase,
    fetch_attempted: bool,
    permission_granted: bool,
    device_location: Option<GeoPoint>,
    remote_points: Vec<AnnotatedPoint>,
    feedback: Vec<FeedbackRecord>,
    points: Vec<AnnotatedPoint>,
}

impl<F: PlaceFetcher, S: FeedbackStore> MapSession<F, S> {
    /// Builds a session over injected collaborators and loads the stored
    /// feedback collection so it is published before any fetch happens.
    pub fn new(fetcher: F, store: S, config: SessionConfig) -> SessionResult<Self> {
        let feedback = store.load()?;
        let mut session = MapSession {
            fetcher,
            store,
            config,
            phase: SessionPhase::Idle,
            fetch_attempted: false,
            permission_granted: false,
            device_location: None,
            remote_points: Vec::new(),
            feedback,
            points: Vec::new(),
        };
        session.republish();
        Ok(session)
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn device_location(&self) -> Option<GeoPoint> {
        self.device_location
    }

    /// Currently published points, remote first then feedback.
    pub fn points(&self) -> &[AnnotatedPoint] {
        &self.points
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.phase,
            device_location: self.device_location,
            points: self.points.clone(),
        }
    }

    /// Records the latest location-permission answer. A grant may arm the
    /// one-shot fetch if a device coordinate is already known.
    pub fn update_permission(&mut self, granted: bool) {
        self.permission_granted = granted;
        self.maybe_fetch();
    }

    /// Records the latest device coordinate; the newest value wins.
    /// The first update that coincides with a granted permission triggers
    /// the session's single fetch.
    pub fn update_location(&mut self, location: GeoPoint) {
        if let Err(err) = location.validate() {
            warn!(
                "event=session_location module=service status=ignored error={err}"
            );
            return;
        }
        self.device_location = Some(location);
        self.maybe_fetch();
    }

    /// Validates and appends one feedback record, persists the whole
    /// collection, and republishes the merged set without re-fetching.
    ///
    /// On persistence failure the in-memory collection is rolled back so
    /// the failed submission is not observable anywhere.
    pub fn submit_feedback(
        &mut self,
        submission: FeedbackSubmission,
    ) -> SessionResult<AnnotatedPoint> {
        let coordinate = GeoPoint::validated(submission.lat, submission.lon)?;
        let record = FeedbackRecord::new(
            coordinate,
            normalize_text(submission.place_name),
            normalize_text(submission.note),
            submission.flags,
        );
        let point = feedback_point(&record);
        self.feedback.push(record);
        if let Err(err) = self.store.save(&self.feedback) {
            self.feedback.pop();
            return Err(SessionError::Store(err));
        }
        self.republish();
        info!(
            "event=session_feedback module=service status=ok total={} phase={}",
            self.feedback.len(),
            self.phase.as_str()
        );
        Ok(point)
    }

    /// Runs the one-shot fetch when permission, coordinate and latch all
    /// allow it. The latch is set before the fetcher is called.
    fn maybe_fetch(&mut self) {
        if self.fetch_attempted || !self.permission_granted {
            return;
        }
        let Some(center) = self.device_location else {
            return;
        };
        self.fetch_attempted = true;
        self.phase = SessionPhase::FetchPending;
        let query = PlaceQuery {
            center,
            radius_m: self.config.radius_m,
            types: self.config.place_types.clone(),
        };
        let fetched = match self.fetcher.fetch_nearby(&query) {
            Ok(records) => records,
            Err(err) => {
                warn!(
                    "event=session_fetch module=service status=degraded error={err}"
                );
                Vec::new()
            }
        };
        let fetched_total = fetched.len();
        self.remote_points = remote_points(&fetched);
        self.phase = SessionPhase::Merged;
        self.republish();
        info!(
            "event=session_merge module=service status=ok fetched={} kept={} feedback={}",
            fetched_total,
            self.remote_points.len(),
            self.feedback.len()
        );
    }

    /// Rebuilds the published set: remote points in response order, then
    /// feedback points in insertion order.
    fn republish(&mut self) {
        let mut points = self.remote_points.clone();
        points.extend(self.feedback.iter().map(feedback_point));
        self.points = points;
    }
}

/// Filters fetched records down to renderable ones and classifies them.
///
/// A record survives only if the backend declared at least one true
/// accessibility feature for it and it carries a usable coordinate.
fn remote_points(records: &[PlaceRecord]) -> Vec<AnnotatedPoint> {
    records
        .iter()
        .filter(|record| record.has_declared_accessibility())
        .filter_map(|record| {
            let coordinate = record.coordinate()?;
            let flags = record.wheelchair_flags();
            Some(AnnotatedPoint {
                coordinate,
                title: record
                    .name
                    .clone()
                    .unwrap_or_else(|| REMOTE_TITLE_FALLBACK.to_string()),
                tier: wheelchair_tier(&flags),
                summary: wheelchair_summary(&flags),
                source: PointSource::Remote,
            })
        })
        .collect()
}

fn feedback_point(record: &FeedbackRecord) -> AnnotatedPoint {
    AnnotatedPoint {
        coordinate: record.coordinate,
        title: record
            .place_name
            .clone()
            .unwrap_or_else(|| FEEDBACK_TITLE_FALLBACK.to_string()),
        tier: feedback_tier(&record.flags),
        summary: feedback_summary(&record.flags),
        source: PointSource::Feedback,
    }
}

/// Trims free-text input; whitespace-only input collapses to `None`.
fn normalize_text(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}
