//! Coordinate values and geometry normalization.
//!
//! Graph construction only ever sees an ordered sequence of [`Coordinate`]s
//! per feature. [`flatten_geometry`] produces that sequence from whatever
//! shape the input geometry takes, and [`PosListCache`] memoizes the result
//! for the duration of one compilation run, because both the spatial index
//! build and the compile pass walk the same sequences and must observe
//! identical data.
//!
//! Normalization never fails. Unknown geometry types are read as flat
//! coordinate sequences, absent geometry yields an empty sequence, and
//! entries that are not `[number, number, ..]`-shaped are skipped. Leniency
//! here is a contract: a half-broken dataset still compiles, it just
//! contributes fewer nodes.

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use serde::ser::SerializeTuple;
use serde::{Serialize, Serializer};
use serde_json::Value;
use tracing::trace;

use crate::feature::Feature;
use crate::identity::FeatureId;

/// A longitude/latitude pair in input units.
///
/// Coordinates are not unique: the same value may appear in several features
/// (shared junction points) or several times within one feature (closed
/// rings). Serializes as a two-element JSON array, and displays as `"x,y"`,
/// the exact textual form node ids are built from.
///
/// # Examples
///
/// ```
/// use canalgraph::geometry::Coordinate;
///
/// let c = Coordinate::new(4.89, 52.37);
/// assert_eq!(c.to_string(), "4.89,52.37");
/// assert_eq!(serde_json::to_string(&c).unwrap(), "[4.89,52.37]");
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Coordinate {
    /// Longitude (first input component).
    pub x: f64,
    /// Latitude (second input component).
    pub y: f64,
}

impl Coordinate {
    /// Creates a coordinate from its two components.
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Bit-exact identity key, usable where `f64` cannot be a map key.
    #[must_use]
    pub fn bits(&self) -> (u64, u64) {
        (self.x.to_bits(), self.y.to_bits())
    }

    /// Euclidean distance to `other`, in input units.
    #[must_use]
    pub fn distance(&self, other: Coordinate) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Reads a coordinate from a JSON `[x, y, ..]` entry.
    ///
    /// Components past the second (altitude and friends) are ignored;
    /// anything that does not start with two numbers is rejected.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        let components = value.as_array()?;
        let x = components.first()?.as_f64()?;
        let y = components.get(1)?.as_f64()?;
        Some(Self { x, y })
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

impl Serialize for Coordinate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(2)?;
        tuple.serialize_element(&self.x)?;
        tuple.serialize_element(&self.y)?;
        tuple.end()
    }
}

/// Flattens a feature's geometry into the ordered coordinate sequence
/// relevant to graph construction.
///
/// - `Point` → a single-element sequence.
/// - `Polygon` → every ring's vertices, concatenated in ring order.
/// - `MultiPolygon` → every polygon's every ring, in declaration order.
/// - anything else (line-string style arrays, unknown types, missing type
///   tag) → the raw `coordinates` value read as a flat sequence.
///
/// Absent geometry and ill-shaped coordinate values produce an empty
/// sequence rather than an error.
#[must_use]
pub fn flatten_geometry(feature: &Feature) -> Vec<Coordinate> {
    let Some(geometry) = &feature.geometry else {
        return Vec::new();
    };
    match geometry.kind.as_deref() {
        Some("Point") => Coordinate::from_value(&geometry.coordinates)
            .into_iter()
            .collect(),
        Some("Polygon") => ring_pairs(&geometry.coordinates),
        Some("MultiPolygon") => geometry
            .coordinates
            .as_array()
            .map(|polygons| polygons.iter().flat_map(ring_pairs).collect())
            .unwrap_or_default(),
        other => {
            if let Some(kind) = other {
                trace!(kind, "reading unrecognized geometry type as a raw coordinate sequence");
            }
            pairs(&geometry.coordinates)
        }
    }
}

fn pairs(value: &Value) -> Vec<Coordinate> {
    value
        .as_array()
        .map(|entries| entries.iter().filter_map(Coordinate::from_value).collect())
        .unwrap_or_default()
}

fn ring_pairs(value: &Value) -> Vec<Coordinate> {
    value
        .as_array()
        .map(|rings| rings.iter().flat_map(pairs).collect())
        .unwrap_or_default()
}

/// Per-run cache of normalized coordinate sequences, keyed by [`FeatureId`].
///
/// Owned by the compiler and scoped to exactly one compilation, which keeps
/// the engine reentrant: two concurrent compilations never share cache
/// state. Keys are the precomputed content-derived ids, so identical feature
/// content maps to the identical (shared) sequence.
#[derive(Debug, Default)]
pub struct PosListCache {
    entries: FxHashMap<FeatureId, Arc<[Coordinate]>>,
}

impl PosListCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The normalized coordinate sequence for `feature`, computing and
    /// caching it on first request.
    pub fn pos_list(&mut self, id: &FeatureId, feature: &Feature) -> Arc<[Coordinate]> {
        if let Some(hit) = self.entries.get(id) {
            return Arc::clone(hit);
        }
        let coords: Arc<[Coordinate]> = flatten_geometry(feature).into();
        self.entries.insert(id.clone(), Arc::clone(&coords));
        coords
    }

    /// Number of cached sequences.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when nothing has been cached yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
