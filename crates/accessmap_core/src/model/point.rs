//! Renderable annotated point derived by the aggregation pipeline.
//!
//! # Responsibility
//! - Carry everything a map layer needs to draw one classified marker.
//!
//! # Invariants
//! - Every point has a usable coordinate; unrenderable records are dropped
//!   before this type is built.
//! - Points are recomputed snapshots, never persisted.

use crate::model::geo::GeoPoint;

/// Which input set produced a point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointSource {
    /// Fetched from the remote accessibility dataset.
    Remote,
    /// Submitted by the user on this device.
    Feedback,
}

/// One classified, renderable map point.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedPoint {
    pub coordinate: GeoPoint,
    /// Marker title; falls back to a fixed label when the source has no name.
    pub title: String,
    /// Count of true accessibility flags on the source record.
    pub tier: u8,
    /// Multi-line feature summary, one ✔️ line per declared feature.
    pub summary: String,
    pub source: PointSource,
}
