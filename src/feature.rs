//! Input data model for canal feature collections.
//!
//! The input is a single GeoJSON-shaped document: a `features` array whose
//! entries carry a `geometry` (`type` + `coordinates`) and a free-form
//! `properties` bag. The model here is deliberately permissive: unknown
//! geometry types, missing geometries, and arbitrary extra keys all
//! deserialize cleanly and round-trip unchanged, because features are
//! embedded verbatim in the compiled link records. The only hard requirement
//! is the `features` key itself; a document without it is a fatal input
//! error, not a degraded run.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single named geometric record (canal, lock, bridge) from the input
/// dataset.
///
/// Inclusion in compilation is decided by [`name`](Self::name): features
/// without a usable name are skipped silently. Everything else (geometry
/// shape, extra properties, extra top-level keys) is carried along as-is.
///
/// # Examples
///
/// ```
/// use canalgraph::feature::Feature;
///
/// let feature: Feature = serde_json::from_str(r#"{
///     "geometry": {"type": "Point", "coordinates": [4.89, 52.37]},
///     "properties": {"name": "Singel", "oneway": true}
/// }"#)?;
///
/// assert_eq!(feature.name(), Some("Singel"));
/// assert!(feature.oneway());
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    /// The feature's geometry, when present. Absent geometry is not an
    /// error; it compiles to zero graph nodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<Geometry>,
    /// Property bag. `name` and `oneway` are interpreted; the rest is
    /// carried through untouched.
    #[serde(default)]
    pub properties: Map<String, Value>,
    /// Any further top-level keys, preserved for round-tripping.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Feature {
    /// The feature's name, when it is a non-empty string.
    ///
    /// An empty-string name counts as no name at all: such features are
    /// excluded from compilation entirely.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.properties
            .get("name")
            .and_then(Value::as_str)
            .filter(|name| !name.is_empty())
    }

    /// Whether traffic along this feature is one-directional.
    ///
    /// Only a literal JSON `true` marks a feature one-way; anything else
    /// (absent, `false`, non-boolean) means bidirectional.
    #[must_use]
    pub fn oneway(&self) -> bool {
        matches!(self.properties.get("oneway"), Some(Value::Bool(true)))
    }

    /// Reassembles the feature as a plain JSON value.
    ///
    /// This is the input to content hashing (see
    /// [`identity`](crate::identity)); building the value by hand keeps id
    /// derivation infallible.
    #[must_use]
    pub fn to_value(&self) -> Value {
        let mut object = self.extra.clone();
        if let Some(geometry) = &self.geometry {
            object.insert("geometry".to_string(), geometry.to_value());
        }
        object.insert(
            "properties".to_string(),
            Value::Object(self.properties.clone()),
        );
        Value::Object(object)
    }
}

/// A feature's geometry: a `type` tag plus free-form `coordinates`.
///
/// `coordinates` is kept as a raw JSON value because its nesting depth
/// depends on the type, and because unknown types must still be readable as
/// flat coordinate sequences (see [`geometry`](crate::geometry)).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    /// The geometry type tag (`"Point"`, `"Polygon"`, …), when present.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// The raw coordinates value; shape depends on `kind`.
    #[serde(default)]
    pub coordinates: Value,
    /// Any further geometry keys, preserved for round-tripping.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Geometry {
    /// Reassembles the geometry as a plain JSON value (see
    /// [`Feature::to_value`]).
    #[must_use]
    pub fn to_value(&self) -> Value {
        let mut object = self.extra.clone();
        if let Some(kind) = &self.kind {
            object.insert("type".to_string(), Value::String(kind.clone()));
        }
        object.insert("coordinates".to_string(), self.coordinates.clone());
        Value::Object(object)
    }
}

/// The top-level input document: a collection of features.
///
/// The `features` key is required: its absence is the one input-shape error
/// the compiler refuses to paper over.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    /// All features, in input order. Order matters for tie-breaking: the
    /// first occurrence of a name wins the locator entry.
    pub features: Vec<Feature>,
    /// Any further top-level keys, preserved for round-tripping.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
