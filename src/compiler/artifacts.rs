//! The artifact types one compilation produces.

use indexmap::IndexMap;
use serde::Serialize;

use crate::feature::Feature;
use crate::geometry::Coordinate;
use crate::identity::{FeatureId, NodeId};

/// One node of the compiled routing graph: a coordinate occurrence plus its
/// adjacency.
///
/// Neighbors are `(feature id, node id)` pairs, in a fixed order: the
/// forward sequential neighbor (when a successor exists), the backward
/// sequential neighbor (when the feature is not one-way), then all junction
/// neighbors sorted by their position in the input.
#[derive(Clone, Debug, Serialize)]
pub struct GraphNode {
    /// This node's id, equal to its key in the graph map.
    pub id: NodeId,
    /// The coordinate this node sits on.
    pub pos: Coordinate,
    /// Adjacent nodes, as `(feature id, node id)` pairs.
    pub neighbors: Vec<(FeatureId, NodeId)>,
}

/// Per-feature link record: the feature's identity, name, normalized
/// coordinate sequence, and the original feature verbatim.
#[derive(Clone, Debug, Serialize)]
pub struct LinkRecord {
    /// The feature's id, equal to its key in the links map.
    pub id: FeatureId,
    /// The feature's name.
    pub name: String,
    /// The normalized coordinate sequence, the same one the graph nodes
    /// were built from.
    pub coordinates: Vec<Coordinate>,
    /// The original input feature, embedded for downstream consumers.
    pub feature: Feature,
}

/// Name-keyed lookup entry: maps a feature name to one representative node.
///
/// The representative is the first node emitted for that name; a reappearing
/// name does not update its locator.
#[derive(Clone, Debug, Serialize)]
pub struct Locator {
    /// The feature name.
    pub name: String,
    /// A node id belonging to the named feature.
    pub value: NodeId,
}

/// Everything one compilation run produces.
///
/// Both maps preserve insertion order, which makes first-write-wins and
/// last-write-wins ties (and serialized output) reproducible across runs.
#[derive(Debug, Default)]
pub struct CompiledGraph {
    /// Node id → graph node.
    pub graph: IndexMap<NodeId, GraphNode>,
    /// Feature id → link record.
    pub links: IndexMap<FeatureId, LinkRecord>,
    /// One locator per distinct feature name, in first-seen order.
    pub locators: Vec<Locator>,
}
