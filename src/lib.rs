//! # Canalgraph: Waterway Routing-Graph Compiler
//!
//! Canalgraph turns a collection of named geometric waterway features
//! (canals, locks, bridges, as points, lines, or polygons) into a navigable
//! routing graph: one node per coordinate occurrence, sequential adjacency
//! along each feature, and inferred junctions wherever coordinates from any
//! features fall within a distance tolerance of each other.
//!
//! ## Core Concepts
//!
//! - **Features**: named geometric input records; unnamed features are
//!   excluded from compilation entirely
//! - **Identity**: deterministic content-derived ids, so identical input
//!   always compiles to identical, diffable output
//! - **Junctions**: inferred adjacency between coordinates closer than the
//!   tolerance, found through a spatial index rather than pairwise scans
//! - **Artifacts**: three output documents (graph nodes, per-feature links,
//!   and name-keyed locators)
//!
//! ## Quick Start
//!
//! ```
//! use canalgraph::compiler::Compiler;
//! use canalgraph::feature::FeatureCollection;
//!
//! let collection: FeatureCollection = serde_json::from_str(r#"{"features": [
//!     {"geometry": {"type": "LineString",
//!                   "coordinates": [[4.89, 52.37], [4.90, 52.38]]},
//!      "properties": {"name": "Herengracht"}}
//! ]}"#)?;
//!
//! let compiled = Compiler::new().compile(&collection);
//!
//! // One node per coordinate, linked both ways along the feature.
//! assert_eq!(compiled.graph.len(), 2);
//! assert_eq!(compiled.links.len(), 1);
//! assert_eq!(compiled.locators[0].name, "Herengracht");
//! # Ok::<(), serde_json::Error>(())
//! ```
//!
//! ## One-Way Features
//!
//! A feature whose `oneway` property is `true` only links forward:
//!
//! ```
//! use canalgraph::compiler::Compiler;
//! use canalgraph::feature::FeatureCollection;
//!
//! let collection: FeatureCollection = serde_json::from_str(r#"{"features": [
//!     {"geometry": {"type": "LineString",
//!                   "coordinates": [[0.0, 0.0], [1.0, 0.0]]},
//!      "properties": {"name": "Sluice", "oneway": true}}
//! ]}"#)?;
//!
//! let compiled = Compiler::new().compile(&collection);
//! let last = &compiled.graph[1];
//! assert!(last.neighbors.is_empty()); // no backward edge
//! # Ok::<(), serde_json::Error>(())
//! ```
//!
//! ## Module Guide
//!
//! - [`feature`] - Input data model: features, geometries, collections
//! - [`geometry`] - Coordinates, geometry normalization, per-run caching
//! - [`identity`] - Content-derived feature and node ids
//! - [`spatial`] - Spatial index and junction resolution
//! - [`compiler`] - The compile pass and its artifacts
//! - [`document`] - Output document envelopes and writers
//! - [`chunk`] - Chunk planning for oversized JSON documents

pub mod chunk;
pub mod compiler;
pub mod document;
pub mod feature;
pub mod geometry;
pub mod identity;
pub mod spatial;
