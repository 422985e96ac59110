//! Deterministic identity for features and coordinate occurrences.
//!
//! Every feature gets a [`FeatureId`] derived from its content: a short hex
//! digest of the feature's canonical (recursively key-sorted) JSON
//! rendering, prefixed with its name. The same logical dataset therefore
//! always compiles to the same ids, run after run, which is what makes the
//! compiled artifacts diffable and the downstream locator system stable.
//!
//! Identity assignment is pure. There is no counter, no mutation of the
//! input record, and no failure path: two structurally identical features
//! receive the same id by construction (duplicate inputs are expected to be
//! deduplicated upstream).

use std::fmt;
use std::fmt::Write as _;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::feature::Feature;
use crate::geometry::Coordinate;

/// Hex digits kept from the content digest when deriving a [`FeatureId`].
pub const CONTENT_HASH_LEN: usize = 7;

/// Stable, content-derived identifier for one feature.
///
/// Format: `"{name-or-'node'}#{hash}"` where `hash` is the truncated
/// SHA-256 digest of the feature's canonical serialization. Unnamed
/// features fall back to the literal `node` prefix.
///
/// # Examples
///
/// ```
/// use canalgraph::feature::Feature;
/// use canalgraph::identity::FeatureId;
///
/// let feature: Feature = serde_json::from_str(r#"{
///     "geometry": {"type": "Point", "coordinates": [1.0, 2.0]},
///     "properties": {"name": "Singel"}
/// }"#)?;
///
/// let id = FeatureId::derive(&feature);
/// assert!(id.as_str().starts_with("Singel#"));
/// assert_eq!(id, FeatureId::derive(&feature));
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FeatureId(String);

impl FeatureId {
    /// Derives the id for a feature from its content.
    #[must_use]
    pub fn derive(feature: &Feature) -> Self {
        let name = feature.name().unwrap_or("node");
        let hash = stable_hash(&feature.to_value(), CONTENT_HASH_LEN);
        Self(format!("{name}#{hash}"))
    }

    /// The id's string form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier for one (feature, coordinate) occurrence.
///
/// Format: `"{FeatureId};{x},{y}"`, using [`Coordinate`]'s display form, so
/// identical coordinate values on the same feature always produce identical
/// node ids. Two different features touching the same coordinate produce two
/// distinct ids referencing the same physical location.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(String);

impl NodeId {
    /// Derives the node id for a coordinate on a feature.
    #[must_use]
    pub fn derive(feature: &FeatureId, coordinate: Coordinate) -> Self {
        Self(format!("{feature};{coordinate}"))
    }

    /// The id's string form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fixed-length hex digest of a JSON value's canonical serialization.
///
/// Canonical means object keys are emitted in sorted order at every nesting
/// level, so insertion order (which the runtime otherwise preserves) never
/// leaks into identity.
#[must_use]
pub fn stable_hash(value: &Value, length: usize) -> String {
    let mut canonical = String::new();
    write_canonical(value, &mut canonical);
    let digest = Sha256::digest(canonical.as_bytes());
    let mut hex = String::with_capacity(length);
    for byte in digest {
        if hex.len() >= length {
            break;
        }
        let _ = write!(hex, "{byte:02x}");
    }
    hex.truncate(length);
    hex
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(entries) => {
            let mut keys: Vec<&String> = entries.keys().collect();
            keys.sort_unstable();
            out.push('{');
            for (position, key) in keys.into_iter().enumerate() {
                if position > 0 {
                    out.push(',');
                }
                // Value's Display emits compact JSON with proper escaping.
                let _ = write!(out, "{}:", Value::String(key.clone()));
                write_canonical(&entries[key.as_str()], out);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (position, item) in items.iter().enumerate() {
                if position > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        leaf => {
            let _ = write!(out, "{leaf}");
        }
    }
}
