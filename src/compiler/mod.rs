//! Graph compilation: from a feature collection to routing artifacts.
//!
//! The compiler drives the other components (identity assignment, geometry
//! normalization, the spatial index) through a single pass over the input
//! and produces three artifacts:
//!
//! - **graph**: one [`GraphNode`] per coordinate occurrence, keyed by node
//!   id, carrying sequential and junction adjacency.
//! - **links**: one [`LinkRecord`] per feature, keyed by feature id, with
//!   the normalized coordinate sequence and the original feature embedded.
//! - **locators**: one [`Locator`] per distinct feature name, pointing at
//!   a representative node.
//!
//! Compilation never fails: unnamed features are skipped, empty geometries
//! contribute nothing, and everything else degrades per the leniency policy
//! in [`geometry`](crate::geometry).
//!
//! # Quick Start
//!
//! ```
//! use canalgraph::compiler::Compiler;
//! use canalgraph::feature::FeatureCollection;
//!
//! let collection: FeatureCollection = serde_json::from_str(r#"{"features": [
//!     {"geometry": {"type": "Point", "coordinates": [4.89, 52.37]},
//!      "properties": {"name": "Singel"}}
//! ]}"#)?;
//!
//! let compiled = Compiler::new().compile(&collection);
//! assert_eq!(compiled.graph.len(), 1);
//! assert_eq!(compiled.locators[0].name, "Singel");
//! # Ok::<(), serde_json::Error>(())
//! ```

mod artifacts;
mod compile;

pub use artifacts::{CompiledGraph, GraphNode, LinkRecord, Locator};
pub use compile::{Compiler, CompilerOptions, DEFAULT_TOLERANCE};
