#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! The canonical record format produced by every city feed.
//!
//! Each raw feed row is normalized into a [`CanonicalRecord`]: a
//! GeoJSON-like `Feature` whose properties carry the shared fields
//! (source, offense type, description, timestamps, classification flags)
//! plus any city-specific extras.

use std::collections::BTreeMap;

use crime_harvest_crime_models::ClassificationFlags;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The GeoJSON object kind of a [`CanonicalRecord`]. Always `Feature`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeatureKind {
    /// GeoJSON `Feature`
    #[default]
    Feature,
}

/// Location attached to a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordGeometry {
    /// A `GeoJSON` Point with `[longitude, latitude]` coordinates.
    Point(geojson::Geometry),
    /// A location object copied verbatim from the upstream feed.
    Verbatim(Value),
}

impl RecordGeometry {
    /// Builds a Point geometry from WGS84 degrees.
    #[must_use]
    pub fn point(longitude: f64, latitude: f64) -> Self {
        Self::Point(geojson::Geometry::new(geojson::Value::Point(vec![
            longitude, latitude,
        ])))
    }

    /// Returns `[longitude, latitude]` for Point geometries.
    #[must_use]
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match self {
            Self::Point(geometry) => match &geometry.value {
                geojson::Value::Point(position) if position.len() >= 2 => {
                    Some((position[0], position[1]))
                }
                _ => None,
            },
            Self::Verbatim(_) => None,
        }
    }
}

/// Properties of a [`CanonicalRecord`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordProperties {
    /// City identifier of the feed the record came from.
    pub source: String,
    /// City-specific offense code or category.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub offense_type: Option<String>,
    /// Free-text offense description.
    #[serde(rename = "desc", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// When the incident occurred, in epoch milliseconds. `None` when the
    /// feed's date field is missing or unparseable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    /// When the record was normalized, in epoch milliseconds.
    pub updated: i64,
    /// Standardized classification flags.
    #[serde(flatten)]
    pub flags: ClassificationFlags,
    /// City-specific extra fields, copied from the raw record.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// A crime incident in the unified cross-city format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalRecord {
    /// `city` followed by the city's native record identifier.
    pub id: String,
    /// Always [`FeatureKind::Feature`].
    #[serde(rename = "type")]
    pub kind: FeatureKind,
    /// Record properties.
    pub properties: RecordProperties,
    /// Location, when the feed provided a usable one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<RecordGeometry>,
}

impl CanonicalRecord {
    /// Creates a record whose id is `city` concatenated with `native_id`.
    #[must_use]
    pub fn new(city: &str, native_id: &str, properties: RecordProperties) -> Self {
        Self {
            id: format!("{city}{native_id}"),
            kind: FeatureKind::Feature,
            properties,
            geometry: None,
        }
    }

    /// Attaches a geometry.
    #[must_use]
    pub fn with_geometry(mut self, geometry: Option<RecordGeometry>) -> Self {
        self.geometry = geometry;
        self
    }
}
