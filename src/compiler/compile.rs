//! The single-pass compile driver.

use std::sync::Arc;

use indexmap::IndexMap;
use tracing::{debug, info};

use super::artifacts::{CompiledGraph, GraphNode, LinkRecord, Locator};
use crate::feature::{Feature, FeatureCollection};
use crate::geometry::{Coordinate, PosListCache};
use crate::identity::{FeatureId, NodeId};
use crate::spatial::{CoordIndex, Occurrence};

/// Default junction distance tolerance, in input coordinate units: a tiny
/// geographic tolerance sized for near-colinear GPS noise.
pub const DEFAULT_TOLERANCE: f64 = 0.000005;

/// Options for one compilation run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CompilerOptions {
    /// Coordinates strictly closer than this are junction neighbors.
    pub tolerance: f64,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

/// Compiles feature collections into routing graphs.
///
/// A `Compiler` holds only configuration; every [`compile`](Self::compile)
/// call owns its own caches and index, so one compiler can serve any number
/// of independent runs.
///
/// # Examples
///
/// ```
/// use canalgraph::compiler::Compiler;
/// use canalgraph::feature::FeatureCollection;
///
/// let collection: FeatureCollection =
///     serde_json::from_str(r#"{"features": []}"#)?;
/// let compiled = Compiler::new().with_tolerance(0.0001).compile(&collection);
/// assert!(compiled.graph.is_empty());
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct Compiler {
    options: CompilerOptions,
}

/// A feature admitted to compilation, with everything derived up front.
struct Included<'a> {
    feature: &'a Feature,
    id: FeatureId,
    name: &'a str,
    oneway: bool,
    coords: Arc<[Coordinate]>,
}

impl Compiler {
    /// Creates a compiler with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the junction distance tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.options.tolerance = tolerance;
        self
    }

    /// Compiles a feature collection into its graph, link, and locator
    /// artifacts.
    ///
    /// Features are processed in input order; order only affects which
    /// entry wins a locator (first) or a colliding link record (last),
    /// never graph correctness.
    #[must_use]
    pub fn compile(&self, collection: &FeatureCollection) -> CompiledGraph {
        let mut cache = PosListCache::new();

        // Ids are assigned eagerly, before the cache or the index see the
        // feature, so neither can ever key on stale identity.
        let mut included: Vec<Included<'_>> = Vec::new();
        for feature in &collection.features {
            let Some(name) = feature.name() else {
                continue;
            };
            let id = FeatureId::derive(feature);
            let coords = cache.pos_list(&id, feature);
            included.push(Included {
                feature,
                id,
                name,
                oneway: feature.oneway(),
                coords,
            });
        }
        let dropped = collection.features.len() - included.len();
        if dropped > 0 {
            debug!(dropped, "skipped features without a usable name");
        }

        let index = CoordIndex::build(included.iter().map(|entry| entry.coords.as_ref()));

        let mut graph: IndexMap<NodeId, GraphNode> = IndexMap::new();
        let mut links: IndexMap<FeatureId, LinkRecord> = IndexMap::new();
        let mut locators: IndexMap<&str, Locator> = IndexMap::new();
        let mut junction_edges = 0usize;

        for (ordinal, entry) in included.iter().enumerate() {
            debug!(feature = %entry.id, coords = entry.coords.len(), "compiling feature");

            for (position, &coord) in entry.coords.iter().enumerate() {
                let mut neighbors: Vec<(FeatureId, NodeId)> = Vec::new();

                // Forward sequential edge, when a successor exists.
                if let Some(&next) = entry.coords.get(position + 1) {
                    neighbors.push((entry.id.clone(), NodeId::derive(&entry.id, next)));
                }

                // Backward sequential edge, unless traffic is one-way.
                if !entry.oneway && position > 0 {
                    let previous = entry.coords[position - 1];
                    neighbors.push((entry.id.clone(), NodeId::derive(&entry.id, previous)));
                }

                // Junction edges from the spatial index. The symmetric edge
                // is emitted when the counterpart coordinate takes its own
                // turn as the query point.
                let origin = Occurrence {
                    feature: ordinal,
                    index: position,
                };
                for occurrence in index.neighbors_within(origin, coord, self.options.tolerance) {
                    let other = &included[occurrence.feature];
                    let other_coord = other.coords[occurrence.index];
                    neighbors.push((other.id.clone(), NodeId::derive(&other.id, other_coord)));
                    junction_edges += 1;
                }

                let node_id = NodeId::derive(&entry.id, coord);
                if !locators.contains_key(entry.name) {
                    locators.insert(
                        entry.name,
                        Locator {
                            name: entry.name.to_string(),
                            value: node_id.clone(),
                        },
                    );
                }
                // Duplicate occurrences of one coordinate value share a node
                // id; the later occurrence's node wins the map slot.
                graph.insert(
                    node_id.clone(),
                    GraphNode {
                        id: node_id,
                        pos: coord,
                        neighbors,
                    },
                );
            }

            links.insert(
                entry.id.clone(),
                LinkRecord {
                    id: entry.id.clone(),
                    name: entry.name.to_string(),
                    coordinates: entry.coords.to_vec(),
                    feature: entry.feature.clone(),
                },
            );
        }

        info!(
            features = included.len(),
            nodes = graph.len(),
            junction_edges,
            "compiled feature collection"
        );

        CompiledGraph {
            graph,
            links,
            locators: locators.into_values().collect(),
        }
    }
}
