//! Remote place record as served by the accessibility places API.
//!
//! # Responsibility
//! - Mirror the wire shape of the remote JSON array element.
//! - Expose the derived helpers the pipeline filters on.
//!
//! # Invariants
//! - `place_id` is the only required wire field; everything else is
//!   optional or nullable.
//! - Unknown wire fields are ignored so older cores can read newer payloads.
//! - Records are never mutated after decoding; a new fetch replaces the
//!   whole set.

use crate::model::geo::GeoPoint;
use serde::{Deserialize, Serialize};

/// Wheelchair accessibility flags declared by the remote source.
///
/// `None` means the source did not declare the flag; only `Some(true)`
/// counts as an accessible feature.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WheelchairFlags {
    #[serde(rename = "wheelchairAccessibleEntrance")]
    pub entrance: Option<bool>,
    #[serde(rename = "wheelchairAccessibleParking")]
    pub parking: Option<bool>,
    #[serde(rename = "wheelchairAccessibleRestroom")]
    pub restroom: Option<bool>,
    #[serde(rename = "wheelchairAccessibleSeating")]
    pub seating: Option<bool>,
}

/// One place element from the remote response array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceRecord {
    /// Opaque identifier assigned by the remote source.
    pub place_id: String,
    pub name: Option<String>,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(rename = "accessibilityOptions")]
    pub accessibility: Option<WheelchairFlags>,
    /// Server-derived "at least one flag is true" marker used for filtering.
    #[serde(rename = "hasAtLeastOneTrueAccessibilityFeature")]
    pub has_accessibility_feature: Option<bool>,
    #[serde(rename = "googlePlaceTypes")]
    pub place_types: Option<Vec<String>>,
    pub searched_as_type: Option<String>,
    pub vicinity: Option<String>,
    pub rating: Option<f32>,
    pub user_ratings_total: Option<u32>,
    pub business_status: Option<String>,
    pub icon: Option<String>,
}

impl PlaceRecord {
    /// Returns the record coordinate when both components are present and
    /// usable. Records without one are unrenderable and get dropped by the
    /// pipeline.
    pub fn coordinate(&self) -> Option<GeoPoint> {
        let point = GeoPoint::new(self.latitude?, self.longitude?);
        point.validate().ok()?;
        Some(point)
    }

    /// Returns whether the source declared at least one true flag.
    ///
    /// Absent (`None`) and `Some(false)` both read as "not declared".
    pub fn has_declared_accessibility(&self) -> bool {
        self.has_accessibility_feature == Some(true)
    }

    /// Returns the declared flag set, defaulting to all-unknown.
    pub fn wheelchair_flags(&self) -> WheelchairFlags {
        self.accessibility.unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::PlaceRecord;

    #[test]
    fn decodes_minimal_payload_and_ignores_unknown_fields() {
        let record: PlaceRecord = serde_json::from_str(
            r#"{"place_id":"p1","rankingHint":3,"openNow":true}"#,
        )
        .expect("minimal payload should decode");
        assert_eq!(record.place_id, "p1");
        assert!(record.name.is_none());
        assert!(record.coordinate().is_none());
        assert!(!record.has_declared_accessibility());
    }

    #[test]
    fn decodes_wire_names_for_flags_and_filter_field() {
        let record: PlaceRecord = serde_json::from_str(
            r#"{
                "place_id": "p2",
                "latitude": 1.0,
                "longitude": 2.0,
                "hasAtLeastOneTrueAccessibilityFeature": true,
                "accessibilityOptions": {
                    "wheelchairAccessibleEntrance": true,
                    "wheelchairAccessibleSeating": false
                }
            }"#,
        )
        .expect("payload should decode");
        assert!(record.has_declared_accessibility());
        let flags = record.wheelchair_flags();
        assert_eq!(flags.entrance, Some(true));
        assert_eq!(flags.parking, None);
        assert_eq!(flags.seating, Some(false));
        let coord = record.coordinate().expect("coordinate should exist");
        assert_eq!(coord.lat, 1.0);
        assert_eq!(coord.lon, 2.0);
    }

    #[test]
    fn coordinate_requires_both_components() {
        let record: PlaceRecord =
            serde_json::from_str(r#"{"place_id":"p3","latitude":41.0}"#).unwrap();
        assert!(record.coordinate().is_none());
    }
}
