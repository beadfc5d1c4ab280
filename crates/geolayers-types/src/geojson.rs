//! GeoJSON geometry, feature and feature collection types.
//!
//! Features are generic over their properties so each data domain can
//! plug in its own property schema (earthquakes, flights, stations, ...).
//!
//! See: <https://datatracker.ietf.org/doc/html/rfc7946>

use serde::{Deserialize, Serialize};

/// A single position: `[longitude, latitude]` with optional extra
/// values (elevation and beyond).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct Position(Vec<f64>);

impl Position {
    /// Create a 2D position.
    pub fn new(lon: f64, lat: f64) -> Self {
        Self(vec![lon, lat])
    }

    /// Create a 3D position with elevation.
    pub fn with_elevation(lon: f64, lat: f64, elevation: f64) -> Self {
        Self(vec![lon, lat, elevation])
    }

    pub fn lon(&self) -> f64 {
        self.0[0]
    }

    pub fn lat(&self) -> f64 {
        self.0[1]
    }

    /// Elevation, if the position carries a third value.
    pub fn elevation(&self) -> Option<f64> {
        self.0.get(2).copied()
    }

    /// All values of the position in wire order.
    pub fn values(&self) -> &[f64] {
        &self.0
    }
}

impl TryFrom<Vec<f64>> for Position {
    type Error = String;

    fn try_from(values: Vec<f64>) -> Result<Self, Self::Error> {
        if values.len() < 2 {
            return Err(format!(
                "position must have at least 2 values, got {}",
                values.len()
            ));
        }
        Ok(Self(values))
    }
}

impl From<Position> for Vec<f64> {
    fn from(position: Position) -> Self {
        position.0
    }
}

/// GeoJSON geometry. The kind fixes the coordinate nesting depth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    /// A single position.
    Point { coordinates: Position },

    /// Two or more connected positions.
    LineString { coordinates: Vec<Position> },

    /// Linear rings; the first is the exterior, the rest are holes.
    Polygon { coordinates: Vec<Vec<Position>> },

    MultiPoint { coordinates: Vec<Position> },

    MultiLineString { coordinates: Vec<Vec<Position>> },

    MultiPolygon {
        coordinates: Vec<Vec<Vec<Position>>>,
    },
}

impl Geometry {
    /// Create a point geometry.
    pub fn point(lon: f64, lat: f64) -> Self {
        Geometry::Point {
            coordinates: Position::new(lon, lat),
        }
    }

    /// Create a line string geometry from `[lon, lat]` pairs.
    pub fn line_string(coordinates: Vec<[f64; 2]>) -> Self {
        Geometry::LineString {
            coordinates: coordinates
                .into_iter()
                .map(|[lon, lat]| Position::new(lon, lat))
                .collect(),
        }
    }

    /// Name of the geometry kind as it appears on the wire.
    pub fn kind(&self) -> &'static str {
        match self {
            Geometry::Point { .. } => "Point",
            Geometry::LineString { .. } => "LineString",
            Geometry::Polygon { .. } => "Polygon",
            Geometry::MultiPoint { .. } => "MultiPoint",
            Geometry::MultiLineString { .. } => "MultiLineString",
            Geometry::MultiPolygon { .. } => "MultiPolygon",
        }
    }

    /// The point coordinates, if this is a Point.
    pub fn as_point(&self) -> Option<&Position> {
        match self {
            Geometry::Point { coordinates } => Some(coordinates),
            _ => None,
        }
    }
}

/// Marker for the `"type": "Feature"` tag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureTag {
    #[default]
    Feature,
}

/// Marker for the `"type": "FeatureCollection"` tag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureCollectionTag {
    #[default]
    FeatureCollection,
}

/// Feature identifier: providers use either strings or numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureId {
    String(String),
    Number(serde_json::Number),
}

impl From<&str> for FeatureId {
    fn from(id: &str) -> Self {
        FeatureId::String(id.to_string())
    }
}

impl From<String> for FeatureId {
    fn from(id: String) -> Self {
        FeatureId::String(id)
    }
}

impl From<i64> for FeatureId {
    fn from(id: i64) -> Self {
        FeatureId::Number(id.into())
    }
}

impl std::fmt::Display for FeatureId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeatureId::String(s) => write!(f, "{}", s),
            FeatureId::Number(n) => write!(f, "{}", n),
        }
    }
}

/// A GeoJSON Feature with typed properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature<P> {
    /// Type identifier (always "Feature").
    #[serde(rename = "type")]
    pub type_: FeatureTag,

    /// The geometry of this feature. Decoding requires a geometry; `None`
    /// only comes from collections rebuilt client-side, and serializes as
    /// GeoJSON `null`.
    #[serde(deserialize_with = "required_geometry")]
    pub geometry: Option<Geometry>,

    /// Provider-specific properties.
    pub properties: P,

    /// Optional feature identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<FeatureId>,
}

impl<P> Feature<P> {
    /// Create a feature from a geometry and its properties.
    pub fn new(geometry: Geometry, properties: P) -> Self {
        Self {
            type_: FeatureTag::Feature,
            geometry: Some(geometry),
            properties,
            id: None,
        }
    }

    /// A feature with a `null` geometry.
    pub fn without_geometry(properties: P) -> Self {
        Self {
            type_: FeatureTag::Feature,
            geometry: None,
            properties,
            id: None,
        }
    }

    /// Set the feature ID.
    pub fn with_id(mut self, id: impl Into<FeatureId>) -> Self {
        self.id = Some(id.into());
        self
    }
}

fn required_geometry<'de, D>(deserializer: D) -> Result<Option<Geometry>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Geometry::deserialize(deserializer).map(Some)
}

/// A GeoJSON FeatureCollection with typed feature properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection<P> {
    /// Type identifier (always "FeatureCollection").
    #[serde(rename = "type")]
    pub type_: FeatureCollectionTag,

    /// Ordered features.
    pub features: Vec<Feature<P>>,

    /// Optional bounding box of the whole collection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<Vec<f64>>,
}

impl<P> FeatureCollection<P> {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::from_features(Vec::new())
    }

    /// Wrap an ordered list of features.
    pub fn from_features(features: Vec<Feature<P>>) -> Self {
        Self {
            type_: FeatureCollectionTag::FeatureCollection,
            features,
            bbox: None,
        }
    }

    /// Add a feature to the collection.
    pub fn with_feature(mut self, feature: Feature<P>) -> Self {
        self.features.push(feature);
        self
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

impl<P> Default for FeatureCollection<P> {
    fn default() -> Self {
        Self::new()
    }
}
