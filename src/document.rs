//! Output document envelopes and writers.
//!
//! Every compiler output is wrapped in the same envelope (`name`,
//! `createdAt`, `schemaVersion`) with the payload flattened beside it. The
//! three payloads are the graph map (`graph`), the link map (`tree`), and
//! the locator list (`locators`).
//!
//! Writing is all-or-nothing at the serialization boundary: all three
//! documents are rendered to strings before the first byte hits disk, so a
//! serialization failure leaves no partial output behind.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use miette::Diagnostic;
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::compiler::{CompiledGraph, GraphNode, LinkRecord, Locator};
use crate::identity::{FeatureId, NodeId};

/// Schema version stamped into every output document.
pub const SCHEMA_VERSION: f32 = 1.0;

/// Errors that can occur while writing output documents.
#[derive(Debug, Error, Diagnostic)]
pub enum DocumentError {
    /// The rendered document could not be written to disk.
    #[error("failed to write '{path}': {source}")]
    #[diagnostic(
        code(canalgraph::document::io),
        help("check that the target directory exists and is writable")
    )]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document could not be rendered as JSON.
    #[error("failed to serialize '{path}': {source}")]
    #[diagnostic(code(canalgraph::document::serialize))]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// The envelope wrapped around every compiler output document.
///
/// # Examples
///
/// ```
/// use canalgraph::document::{Document, LocatorsPayload};
///
/// let doc = Document::new("graph_locators.json", LocatorsPayload { locators: vec![] });
/// let value = serde_json::to_value(&doc).unwrap();
/// assert_eq!(value["name"], "graph_locators.json");
/// assert_eq!(value["schemaVersion"], 1.0);
/// assert!(value["locators"].as_array().unwrap().is_empty());
/// ```
#[derive(Debug, Serialize)]
pub struct Document<P> {
    /// The output file the document was written as.
    pub name: String,
    /// Creation timestamp, ISO-8601 UTC.
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    /// Envelope schema version.
    #[serde(rename = "schemaVersion")]
    pub schema_version: f32,
    /// The payload, flattened beside the envelope fields.
    #[serde(flatten)]
    pub payload: P,
}

impl<P: Serialize> Document<P> {
    /// Wraps a payload in an envelope stamped with the current time.
    #[must_use]
    pub fn new(name: impl Into<String>, payload: P) -> Self {
        Self {
            name: name.into(),
            created_at: Utc::now(),
            schema_version: SCHEMA_VERSION,
            payload,
        }
    }

    /// Renders the document as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// The graph document payload: node id → graph node.
#[derive(Debug, Serialize)]
pub struct GraphPayload {
    pub graph: IndexMap<NodeId, GraphNode>,
}

/// The links document payload: feature id → link record.
#[derive(Debug, Serialize)]
pub struct LinksPayload {
    pub tree: IndexMap<FeatureId, LinkRecord>,
}

/// The locators document payload.
#[derive(Debug, Serialize)]
pub struct LocatorsPayload {
    pub locators: Vec<Locator>,
}

/// Writes the three compiled documents to their paths.
///
/// Each document's `name` field is the path it was asked to be written to,
/// as given.
pub fn write_compiled(
    compiled: CompiledGraph,
    graph_path: &Path,
    links_path: &Path,
    locators_path: &Path,
) -> Result<(), DocumentError> {
    let CompiledGraph {
        graph,
        links,
        locators,
    } = compiled;

    let rendered = [
        (graph_path, render(graph_path, GraphPayload { graph })?),
        (links_path, render(links_path, LinksPayload { tree: links })?),
        (
            locators_path,
            render(locators_path, LocatorsPayload { locators })?,
        ),
    ];

    for (path, json) in rendered {
        fs::write(path, json).map_err(|source| DocumentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "wrote output document");
    }
    Ok(())
}

fn render<P: Serialize>(path: &Path, payload: P) -> Result<String, DocumentError> {
    Document::new(path.display().to_string(), payload)
        .to_json()
        .map_err(|source| DocumentError::Serialize {
            path: path.to_path_buf(),
            source,
        })
}
