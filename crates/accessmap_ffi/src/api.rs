//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level functions to Dart via FRB.
//! - Hold the single map-screen session for the process lifetime.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Every call returns an envelope with `ok` and a diagnostic message.
//! - The session static is the only mutable state in this crate.

use accessmap_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, marker_hue,
    ping as ping_inner, AnnotatedPoint, FeedbackFlags, FeedbackSubmission, GeoPoint,
    HttpPlaceFetcher, MapSession, MarkerHue, PointSource, SessionConfig, SessionSnapshot,
    SqliteFeedbackStore,
};
use log::info;
use std::sync::{Mutex, MutexGuard};

type FfiSession = MapSession<HttpPlaceFetcher, SqliteFeedbackStore>;

static SESSION: Mutex<Option<FfiSession>> = Mutex::new(None);

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - UI-thread safe for current implementation.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - UI-thread safe for current implementation.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Sync call; may perform small file-system setup work.
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Reconfiguration attempts with different level or directory return error.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Generic action response envelope for map commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapActionResponse {
    /// Whether operation succeeded.
    pub ok: bool,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl MapActionResponse {
    fn success(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
        }
    }
}

/// One renderable marker as consumed by the map widget.
#[derive(Debug, Clone, PartialEq)]
pub struct MapPointView {
    pub lat: f64,
    pub lon: f64,
    /// Marker title (place name or a fixed fallback).
    pub title: String,
    /// Count of declared accessible features.
    pub tier: u8,
    /// Newline-separated feature lines or the no-features sentinel.
    pub summary: String,
    /// Point origin: `remote` or `feedback`.
    pub source: String,
    /// Marker color band: `violet|red|orange|yellow|green`.
    pub hue: String,
}

/// Session snapshot envelope for map rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct MapSnapshotResponse {
    /// Whether a session was open and the snapshot is meaningful.
    pub ok: bool,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
    /// Session phase: `idle|fetch_pending|merged`.
    pub phase: String,
    pub device_lat: Option<f64>,
    pub device_lon: Option<f64>,
    pub points: Vec<MapPointView>,
}

impl MapSnapshotResponse {
    fn from_snapshot(snapshot: SessionSnapshot) -> Self {
        Self {
            ok: true,
            message: String::new(),
            phase: snapshot.phase.as_str().to_string(),
            device_lat: snapshot.device_location.map(|point| point.lat),
            device_lon: snapshot.device_location.map(|point| point.lon),
            points: snapshot.points.iter().map(to_point_view).collect(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
            phase: String::new(),
            device_lat: None,
            device_lon: None,
            points: Vec::new(),
        }
    }
}

/// Feedback form as filled in by the report dialog.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackForm {
    pub lat: f64,
    pub lon: f64,
    pub place_name: Option<String>,
    pub note: Option<String>,
    pub accessible_entrance: bool,
    pub accessible_parking: bool,
    pub accessible_restroom: bool,
    pub accessible_seating: bool,
    pub has_ramp: bool,
    pub has_elevator: bool,
    pub has_braille: bool,
    pub has_sign_language: bool,
    pub suits_visually_impaired: bool,
    pub suits_physically_impaired: bool,
    pub suits_hearing_impaired: bool,
    pub staff_assistance: bool,
    pub accessible_menu: bool,
    pub generally_accessible: bool,
}

/// Opens the map-screen session over one database file and one service URL.
///
/// An already open session is replaced; its collaborators are dropped.
///
/// # FFI contract
/// - Sync call; opens the database and loads stored feedback.
/// - Never panics; failures are reported in the envelope.
#[flutter_rust_bridge::frb(sync)]
pub fn map_session_open(db_path: String, base_url: String) -> MapActionResponse {
    let fetcher = match HttpPlaceFetcher::new(base_url) {
        Ok(fetcher) => fetcher,
        Err(err) => return MapActionResponse::failure(format!("map_session_open failed: {err}")),
    };
    let store = match SqliteFeedbackStore::open(&db_path) {
        Ok(store) => store,
        Err(err) => return MapActionResponse::failure(format!("map_session_open failed: {err}")),
    };
    let session = match MapSession::new(fetcher, store, SessionConfig::default()) {
        Ok(session) => session,
        Err(err) => return MapActionResponse::failure(format!("map_session_open failed: {err}")),
    };

    let replaced = session_slot().replace(session).is_some();
    info!(
        "event=ffi_session_open module=ffi status=ok replaced={}",
        replaced
    );
    MapActionResponse::success(if replaced {
        "Session reopened."
    } else {
        "Session opened."
    })
}

/// Closes the map-screen session and drops its collaborators.
///
/// # FFI contract
/// - Sync call; performs no I/O, but may wait for an in-flight fetch to
///   release the session lock.
/// - Never panics; closing without an open session reports failure.
#[flutter_rust_bridge::frb(sync)]
pub fn map_session_close() -> MapActionResponse {
    match session_slot().take() {
        Some(_) => {
            info!("event=ffi_session_close module=ffi status=ok");
            MapActionResponse::success("Session closed.")
        }
        None => MapActionResponse::failure("No open session."),
    }
}

/// Records the latest location-permission answer and returns the snapshot.
///
/// A grant completes the fetch inputs whenever a device coordinate arrived
/// first, so this call can block on the network exactly like
/// `map_update_location`. It is intentionally not marked `frb(sync)`; FRB
/// dispatches it off the UI thread.
///
/// # FFI contract
/// - May block for up to the HTTP timeout on the fetching call.
/// - Never panics; a fetch failure degrades to a feedback-only snapshot.
pub fn map_update_permission(granted: bool) -> MapSnapshotResponse {
    with_session(|session| {
        session.update_permission(granted);
        session.snapshot()
    })
}

/// Records the latest device coordinate and returns the snapshot.
///
/// The first update that coincides with a granted permission runs the
/// session's single place fetch, so this call can block on the network.
/// It is intentionally not marked `frb(sync)`; FRB dispatches it off the
/// UI thread.
///
/// # FFI contract
/// - May block for up to the HTTP timeout on the fetching call.
/// - Never panics; a fetch failure degrades to a feedback-only snapshot.
pub fn map_update_location(lat: f64, lon: f64) -> MapSnapshotResponse {
    with_session(|session| {
        session.update_location(GeoPoint::new(lat, lon));
        session.snapshot()
    })
}

/// Persists one feedback report and merges it into the published points.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics; validation and storage failures are reported in the
///   envelope and leave the session unchanged.
#[flutter_rust_bridge::frb(sync)]
pub fn map_submit_feedback(form: FeedbackForm) -> MapActionResponse {
    let mut guard = session_slot();
    let Some(session) = guard.as_mut() else {
        return MapActionResponse::failure("No open session.");
    };
    match session.submit_feedback(to_submission(form)) {
        Ok(point) => MapActionResponse::success(format!("Feedback saved: {}.", point.title)),
        Err(err) => MapActionResponse::failure(format!("map_submit_feedback failed: {err}")),
    }
}

/// Returns the current session snapshot without mutating anything.
///
/// # FFI contract
/// - Sync call; performs no I/O, but may wait for an in-flight fetch to
///   release the session lock.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn map_snapshot() -> MapSnapshotResponse {
    match session_slot().as_ref() {
        Some(session) => MapSnapshotResponse::from_snapshot(session.snapshot()),
        None => MapSnapshotResponse::failure("No open session."),
    }
}

/// Locks the session slot, recovering the guard if a panicking thread
/// poisoned the mutex.
fn session_slot() -> MutexGuard<'static, Option<FfiSession>> {
    match SESSION.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

fn with_session(f: impl FnOnce(&mut FfiSession) -> SessionSnapshot) -> MapSnapshotResponse {
    let mut guard = session_slot();
    match guard.as_mut() {
        Some(session) => MapSnapshotResponse::from_snapshot(f(session)),
        None => MapSnapshotResponse::failure("No open session."),
    }
}

fn to_point_view(point: &AnnotatedPoint) -> MapPointView {
    MapPointView {
        lat: point.coordinate.lat,
        lon: point.coordinate.lon,
        title: point.title.clone(),
        tier: point.tier,
        summary: point.summary.clone(),
        source: source_label(point.source).to_string(),
        hue: hue_label(marker_hue(point.tier)).to_string(),
    }
}

fn source_label(source: PointSource) -> &'static str {
    match source {
        PointSource::Remote => "remote",
        PointSource::Feedback => "feedback",
    }
}

fn hue_label(hue: MarkerHue) -> &'static str {
    match hue {
        MarkerHue::Violet => "violet",
        MarkerHue::Red => "red",
        MarkerHue::Orange => "orange",
        MarkerHue::Yellow => "yellow",
        MarkerHue::Green => "green",
    }
}

fn to_submission(form: FeedbackForm) -> FeedbackSubmission {
    FeedbackSubmission {
        lat: form.lat,
        lon: form.lon,
        place_name: form.place_name,
        note: form.note,
        flags: FeedbackFlags {
            accessible_entrance: form.accessible_entrance,
            accessible_parking: form.accessible_parking,
            accessible_restroom: form.accessible_restroom,
            accessible_seating: form.accessible_seating,
            has_ramp: form.has_ramp,
            has_elevator: form.has_elevator,
            has_braille: form.has_braille,
            has_sign_language: form.has_sign_language,
            suits_visually_impaired: form.suits_visually_impaired,
            suits_physically_impaired: form.suits_physically_impaired,
            suits_hearing_impaired: form.suits_hearing_impaired,
            staff_assistance: form.staff_assistance,
            accessible_menu: form.accessible_menu,
            generally_accessible: form.generally_accessible,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::{
        core_version, init_logging, map_session_close, map_session_open, map_snapshot,
        map_submit_feedback, map_update_location, map_update_permission, ping, FeedbackForm,
    };
    use rusqlite::Connection;
    use std::net::TcpListener;

    /// URL of a localhost port that was just closed, so fetches fail fast.
    fn unreachable_base_url() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{addr}")
    }

    fn empty_form(lat: f64, lon: f64) -> FeedbackForm {
        FeedbackForm {
            lat,
            lon,
            place_name: None,
            note: None,
            accessible_entrance: false,
            accessible_parking: false,
            accessible_restroom: false,
            accessible_seating: false,
            has_ramp: false,
            has_elevator: false,
            has_braille: false,
            has_sign_language: false,
            suits_visually_impaired: false,
            suits_physically_impaired: false,
            suits_hearing_impaired: false,
            staff_assistance: false,
            accessible_menu: false,
            generally_accessible: false,
        }
    }

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    // The session static is process-global, so its whole lifecycle lives in
    // one test to keep the suite order-independent.
    #[test]
    fn session_lifecycle_via_envelopes() {
        assert!(!map_session_close().ok);
        assert!(!map_snapshot().ok);
        assert!(!map_update_permission(true).ok);
        assert!(!map_submit_feedback(empty_form(41.0, 29.0)).ok);

        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("map.db");
        let db_path_str = db_path.to_str().unwrap().to_string();
        let base_url = unreachable_base_url();

        let opened = map_session_open(db_path_str.clone(), base_url.clone());
        assert!(opened.ok, "{}", opened.message);

        let snapshot = map_snapshot();
        assert!(snapshot.ok);
        assert_eq!(snapshot.phase, "idle");
        assert!(snapshot.points.is_empty());

        // No coordinate is cached yet, so the grant cannot complete the
        // fetch inputs.
        let snapshot = map_update_permission(true);
        assert!(snapshot.ok);
        assert_eq!(snapshot.phase, "idle");

        let mut form = empty_form(41.0, 29.0);
        form.place_name = Some("Park gate".to_string());
        form.has_ramp = true;
        let submitted = map_submit_feedback(form);
        assert!(submitted.ok, "{}", submitted.message);
        assert!(submitted.message.contains("Park gate"));

        let rejected = map_submit_feedback(empty_form(95.0, 29.0));
        assert!(!rejected.ok);

        let snapshot = map_snapshot();
        assert_eq!(snapshot.points.len(), 1);
        assert_eq!(snapshot.points[0].title, "Park gate");
        assert_eq!(snapshot.points[0].source, "feedback");
        assert_eq!(snapshot.points[0].tier, 1);
        assert_eq!(snapshot.points[0].hue, "red");

        let conn = Connection::open(&db_path).unwrap();
        let raw: String = conn
            .query_row(
                "SELECT value FROM slots WHERE name = 'feedback_entries';",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert!(raw.contains("Park gate"));
        drop(conn);

        // Reopening replaces the session; persisted feedback survives.
        let reopened = map_session_open(db_path_str.clone(), base_url.clone());
        assert!(reopened.ok, "{}", reopened.message);
        let snapshot = map_snapshot();
        assert_eq!(snapshot.phase, "idle");
        assert_eq!(snapshot.points.len(), 1);

        // The unreachable service degrades the fetch to an empty remote set;
        // the session still reaches merged with the feedback point intact.
        map_update_permission(true);
        let snapshot = map_update_location(41.0, 29.0);
        assert!(snapshot.ok);
        assert_eq!(snapshot.phase, "merged");
        assert_eq!(snapshot.device_lat, Some(41.0));
        assert_eq!(snapshot.device_lon, Some(29.0));
        assert_eq!(snapshot.points.len(), 1);
        assert_eq!(snapshot.points[0].source, "feedback");

        // Opposite arrival order: a coordinate cached while permission is
        // denied makes the later grant the call that completes the fetch
        // inputs and runs the fetch.
        let reopened = map_session_open(db_path_str, base_url);
        assert!(reopened.ok, "{}", reopened.message);
        let snapshot = map_update_location(40.5, 29.5);
        assert!(snapshot.ok);
        assert_eq!(snapshot.phase, "idle");
        assert_eq!(snapshot.device_lat, Some(40.5));
        let snapshot = map_update_permission(true);
        assert!(snapshot.ok);
        assert_eq!(snapshot.phase, "merged");
        assert_eq!(snapshot.points.len(), 1);
        assert_eq!(snapshot.points[0].source, "feedback");

        assert!(map_session_close().ok);
        assert!(!map_session_close().ok);
    }
}
