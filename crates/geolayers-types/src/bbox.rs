//! Geographic bounding box in degrees.

use serde::{Deserialize, Serialize};

/// A WGS84 bounding box in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    /// The whole world.
    pub const WORLD: BoundingBox = BoundingBox {
        min_lon: -180.0,
        min_lat: -90.0,
        max_lon: 180.0,
        max_lat: 90.0,
    };

    pub fn new(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Self {
        Self {
            min_lon,
            min_lat,
            max_lon,
            max_lat,
        }
    }

    /// Parse a `"minLon,minLat,maxLon,maxLat"` string.
    pub fn from_query_string(s: &str) -> Result<Self, BboxParseError> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(BboxParseError::InvalidFormat(s.to_string()));
        }

        let parse = |p: &str| -> Result<f64, BboxParseError> {
            p.parse()
                .map_err(|_| BboxParseError::InvalidNumber(p.to_string()))
        };

        let bbox = Self::new(
            parse(parts[0])?,
            parse(parts[1])?,
            parse(parts[2])?,
            parse(parts[3])?,
        );
        bbox.validate()?;
        Ok(bbox)
    }

    /// Check coordinate ranges and corner ordering.
    pub fn validate(&self) -> Result<(), BboxParseError> {
        for lon in [self.min_lon, self.max_lon] {
            if !(-180.0..=180.0).contains(&lon) {
                return Err(BboxParseError::OutOfRange(format!("longitude {}", lon)));
            }
        }
        for lat in [self.min_lat, self.max_lat] {
            if !(-90.0..=90.0).contains(&lat) {
                return Err(BboxParseError::OutOfRange(format!("latitude {}", lat)));
            }
        }
        if self.min_lat > self.max_lat {
            return Err(BboxParseError::Inverted);
        }
        Ok(())
    }

    /// Check if a point is inside this bbox (edges included).
    pub fn contains_point(&self, lon: f64, lat: f64) -> bool {
        lon >= self.min_lon && lon <= self.max_lon && lat >= self.min_lat && lat <= self.max_lat
    }

    /// `[minLon, minLat, maxLon, maxLat]`, the GeoJSON `bbox` order.
    pub fn to_array(&self) -> [f64; 4] {
        [self.min_lon, self.min_lat, self.max_lon, self.max_lat]
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::WORLD
    }
}

impl From<[f64; 4]> for BoundingBox {
    fn from(values: [f64; 4]) -> Self {
        Self::new(values[0], values[1], values[2], values[3])
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum BboxParseError {
    #[error("Invalid bbox format: {0}. Expected 'minLon,minLat,maxLon,maxLat'")]
    InvalidFormat(String),

    #[error("Invalid number in bbox: {0}")]
    InvalidNumber(String),

    #[error("Bbox coordinate out of range: {0}")]
    OutOfRange(String),

    #[error("Bbox min latitude is greater than max latitude")]
    Inverted,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_query_bbox() {
        let bbox = BoundingBox::from_query_string("-80.5, 30.0, -70.25, 40.0").unwrap();
        assert_eq!(bbox.min_lon, -80.5);
        assert_eq!(bbox.min_lat, 30.0);
        assert_eq!(bbox.max_lon, -70.25);
        assert_eq!(bbox.max_lat, 40.0);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            BoundingBox::from_query_string("1,2,3"),
            Err(BboxParseError::InvalidFormat(_))
        ));
        assert!(matches!(
            BoundingBox::from_query_string("a,2,3,4"),
            Err(BboxParseError::InvalidNumber(_))
        ));
        assert!(matches!(
            BoundingBox::from_query_string("0,95,10,96"),
            Err(BboxParseError::OutOfRange(_))
        ));
        assert_eq!(
            BoundingBox::from_query_string("0,50,10,40"),
            Err(BboxParseError::Inverted)
        );
    }

    #[test]
    fn test_contains_point() {
        let bbox = BoundingBox::new(-10.0, -10.0, 10.0, 10.0);
        assert!(bbox.contains_point(0.0, 0.0));
        assert!(bbox.contains_point(10.0, -10.0));
        assert!(!bbox.contains_point(10.1, 0.0));
    }

    #[test]
    fn test_world_is_default() {
        let bbox = BoundingBox::default();
        assert_eq!(bbox.to_array(), [-180.0, -90.0, 180.0, 90.0]);
        assert!(bbox.validate().is_ok());
    }
}
