//! Geographic coordinate type shared by all data sources.
//!
//! # Responsibility
//! - Carry a latitude/longitude pair in decimal degrees.
//! - Validate that a coordinate is usable for rendering and querying.
//!
//! # Invariants
//! - Validated coordinates are finite and inside WGS84 bounds.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

/// Validation error for user-provided or decoded coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GeoPointError {
    /// Latitude or longitude is NaN or infinite.
    NonFinite { lat: f64, lon: f64 },
    /// Coordinate is finite but outside WGS84 bounds.
    OutOfRange { lat: f64, lon: f64 },
}

impl Display for GeoPointError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonFinite { lat, lon } => {
                write!(f, "coordinate is not finite: lat={lat}, lon={lon}")
            }
            Self::OutOfRange { lat, lon } => {
                write!(f, "coordinate out of range: lat={lat}, lon={lon}")
            }
        }
    }
}

impl Error for GeoPointError {}

impl GeoPoint {
    /// Creates a coordinate without validating it.
    ///
    /// Use [`GeoPoint::validated`] for user-provided input.
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Creates a coordinate after bounds validation.
    pub fn validated(lat: f64, lon: f64) -> Result<Self, GeoPointError> {
        let point = Self { lat, lon };
        point.validate()?;
        Ok(point)
    }

    /// Checks the coordinate for finiteness and WGS84 bounds.
    pub fn validate(&self) -> Result<(), GeoPointError> {
        if !self.lat.is_finite() || !self.lon.is_finite() {
            return Err(GeoPointError::NonFinite {
                lat: self.lat,
                lon: self.lon,
            });
        }
        if !(-90.0..=90.0).contains(&self.lat) || !(-180.0..=180.0).contains(&self.lon) {
            return Err(GeoPointError::OutOfRange {
                lat: self.lat,
                lon: self.lon,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{GeoPoint, GeoPointError};

    #[test]
    fn accepts_ordinary_coordinates() {
        assert!(GeoPoint::validated(41.0082, 28.9784).is_ok());
        assert!(GeoPoint::validated(-90.0, 180.0).is_ok());
    }

    #[test]
    fn rejects_non_finite_values() {
        let err = GeoPoint::validated(f64::NAN, 0.0).unwrap_err();
        assert!(matches!(err, GeoPointError::NonFinite { .. }));
    }

    #[test]
    fn rejects_out_of_range_values() {
        let err = GeoPoint::validated(91.0, 0.0).unwrap_err();
        assert!(matches!(err, GeoPointError::OutOfRange { .. }));
        let err = GeoPoint::validated(0.0, -180.5).unwrap_err();
        assert!(matches!(err, GeoPointError::OutOfRange { .. }));
    }
}
