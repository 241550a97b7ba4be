//! User-submitted accessibility feedback record.
//!
//! # Responsibility
//! - Define the persisted shape of one crowd-sourced feedback entry.
//! - Keep decoding forward-compatible with newer persisted payloads.
//!
//! # Invariants
//! - `coordinate` is required; a feedback entry without one is malformed.
//! - Records are append-only: created once, never edited, never deleted.
//! - Identity is positional, `(coordinate, insertion order)`, so the
//!   containing sequence order is part of the data.

use crate::model::geo::GeoPoint;
use serde::{Deserialize, Serialize};

/// Accessibility and suitability flags a user can report for a location.
///
/// Every flag defaults to `false` when absent from the persisted payload,
/// and unknown payload fields are ignored. Declaration order is the fixed
/// summary-line order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackFlags {
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

/// One user-submitted feedback entry for a map location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    /// Reported location. Required; feedback is always anchored to a point.
    pub coordinate: GeoPoint,
    /// Optional user-entered place name.
    pub place_name: Option<String>,
    /// Optional free-text note.
    pub note: Option<String>,
    /// Reported accessibility flags, persisted inline on the object.
    #[serde(flatten)]
    pub flags: FeedbackFlags,
}

impl FeedbackRecord {
    /// Creates a feedback entry for an already validated coordinate.
    pub fn new(
        coordinate: GeoPoint,
        place_name: Option<String>,
        note: Option<String>,
        flags: FeedbackFlags,
    ) -> Self {
        Self {
            coordinate,
            place_name,
            note,
            flags,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{FeedbackFlags, FeedbackRecord};

    #[test]
    fn decodes_with_flag_defaults_and_ignores_unknown_fields() {
        let record: FeedbackRecord = serde_json::from_str(
            r#"{
                "coordinate": {"lat": 39.92, "lon": 32.85},
                "has_ramp": true,
                "reported_at": "2024-06-01"
            }"#,
        )
        .expect("payload should decode");
        assert!(record.flags.has_ramp);
        assert!(!record.flags.accessible_entrance);
        assert!(record.place_name.is_none());
        assert!(record.note.is_none());
    }

    #[test]
    fn round_trips_through_json() {
        let record = FeedbackRecord::new(
            crate::model::geo::GeoPoint::new(1.5, 2.5),
            Some("Corner cafe".to_string()),
            None,
            FeedbackFlags {
                accessible_entrance: true,
                generally_accessible: true,
                ..FeedbackFlags::default()
            },
        );
        let encoded = serde_json::to_string(&record).unwrap();
        let decoded: FeedbackRecord = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, record);
    }

    #[test]
    fn rejects_payload_without_coordinate() {
        let result = serde_json::from_str::<FeedbackRecord>(r#"{"has_ramp": true}"#);
        assert!(result.is_err());
    }
}
