//! Chunk planning for oversized JSON documents.
//!
//! Some compiled outputs are too large for downstream consumers to load in
//! one piece. The chunker splits one field of a document (or a bare array)
//! into bounded chunks and rewrites the document into an index that
//! references them by file name.
//!
//! Planning is pure: [`plan`] computes the rewritten index and the chunk
//! bodies without touching the filesystem. The `canalgraph-chunk` binary
//! owns all I/O (backups, chunk files, stdin/stdout), so every splitting
//! rule here is testable without a disk.

use miette::Diagnostic;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::info;

/// Errors that can occur while planning a chunked rewrite.
#[derive(Debug, Error, Diagnostic)]
pub enum ChunkError {
    /// A chunk target key was supplied for an array document.
    #[error("can't use a chunk target with an array document")]
    #[diagnostic(
        code(canalgraph::chunk::target_on_array),
        help("arrays are chunked directly; omit the target key")
    )]
    TargetOnArray,

    /// The requested chunk target key is not present in the document.
    #[error("invalid chunk target '{target}': not present in the document")]
    #[diagnostic(code(canalgraph::chunk::missing_target))]
    MissingTarget { target: String },

    /// The chunk target is neither an array nor an object.
    #[error("can't chunk a {kind} value")]
    #[diagnostic(
        code(canalgraph::chunk::unchunkable),
        help("only arrays and objects can be split into chunks")
    )]
    Unchunkable { kind: &'static str },

    /// Post-split row accounting failed; nothing may be written.
    #[error("chunking error: expected {expected} rows, but only got {actual}")]
    #[diagnostic(code(canalgraph::chunk::count_mismatch))]
    CountMismatch { expected: usize, actual: usize },
}

/// Outcome of planning a chunked rewrite.
#[derive(Clone, Debug, PartialEq)]
pub enum ChunkPlan {
    /// The target fits within the limit; the document is unchanged.
    Unchanged(Value),
    /// The target was split into chunks.
    Split {
        /// The rewritten document referencing the chunks, present when the
        /// input was an object (a bare array leaves no index to rewrite).
        index: Option<Value>,
        /// Chunk bodies, in order.
        chunks: Vec<Value>,
        /// File names the index references; `names[i]` holds `chunks[i]`.
        names: Vec<String>,
    },
}

/// Plans the chunked rewrite of `document`.
///
/// Arrays are split by position; objects have the `chunk_target` field's
/// value split (arrays by position, objects by insertion-order key runs)
/// into chunks of at most `chunk_limit` elements. `file_name` only
/// determines the chunk file names.
///
/// # Errors
///
/// See [`ChunkError`]; all variants are fatal to the run.
///
/// # Examples
///
/// ```
/// use canalgraph::chunk::{plan, ChunkPlan};
/// use serde_json::json;
///
/// let doc = json!({"schemaVersion": 1.0, "rows": [1, 2, 3, 4, 5]});
/// let plan = plan("out.json", doc, "rows", 2)?;
///
/// let ChunkPlan::Split { index, chunks, names } = plan else {
///     unreachable!("five rows with limit two must split");
/// };
/// assert_eq!(chunks.len(), 3);
/// assert_eq!(names, ["out.0.json", "out.1.json", "out.2.json"]);
/// let index = index.unwrap();
/// assert_eq!(index["chunkTarget"], "rows");
/// assert!(index.get("rows").is_none());
/// # Ok::<(), canalgraph::chunk::ChunkError>(())
/// ```
pub fn plan(
    file_name: &str,
    document: Value,
    chunk_target: &str,
    chunk_limit: usize,
) -> Result<ChunkPlan, ChunkError> {
    match document {
        Value::Array(rows) => {
            if !chunk_target.is_empty() {
                return Err(ChunkError::TargetOnArray);
            }
            if rows.len() <= chunk_limit {
                return Ok(ChunkPlan::Unchanged(Value::Array(rows)));
            }
            let expected = rows.len();
            let chunks = split_rows(rows, chunk_limit);
            verify_counts(expected, &chunks)?;
            let names = chunk_names(file_name, chunks.len());
            info!(rows = expected, chunks = chunks.len(), "planned chunked array");
            Ok(ChunkPlan::Split {
                index: None,
                chunks,
                names,
            })
        }
        Value::Object(mut document) => {
            if chunk_target.is_empty() {
                return Ok(ChunkPlan::Unchanged(Value::Object(document)));
            }
            let fits = match document.get(chunk_target) {
                None => {
                    return Err(ChunkError::MissingTarget {
                        target: chunk_target.to_string(),
                    });
                }
                Some(Value::Array(rows)) => rows.len() <= chunk_limit,
                Some(Value::Object(entries)) => entries.len() <= chunk_limit,
                Some(other) => {
                    return Err(ChunkError::Unchunkable {
                        kind: json_kind(other),
                    });
                }
            };
            if fits {
                return Ok(ChunkPlan::Unchanged(Value::Object(document)));
            }

            let (expected, chunks) = match document.shift_remove(chunk_target) {
                Some(Value::Array(rows)) => (rows.len(), split_rows(rows, chunk_limit)),
                Some(Value::Object(entries)) => (entries.len(), split_entries(entries, chunk_limit)),
                // Guarded by the shape check above.
                _ => (0, Vec::new()),
            };
            verify_counts(expected, &chunks)?;

            let names = chunk_names(file_name, chunks.len());
            document.insert(
                "chunkTarget".to_string(),
                Value::String(chunk_target.to_string()),
            );
            document.insert(
                "chunks".to_string(),
                Value::Array(names.iter().cloned().map(Value::String).collect()),
            );
            info!(
                rows = expected,
                chunks = chunks.len(),
                target = chunk_target,
                "planned chunked rewrite"
            );
            Ok(ChunkPlan::Split {
                index: Some(Value::Object(document)),
                chunks,
                names,
            })
        }
        // Scalars have nothing to split and pass through untouched.
        other => Ok(ChunkPlan::Unchanged(other)),
    }
}

fn split_rows(rows: Vec<Value>, limit: usize) -> Vec<Value> {
    let mut chunks = Vec::new();
    let mut chunk = Vec::new();
    for row in rows {
        chunk.push(row);
        if chunk.len() >= limit {
            chunks.push(Value::Array(std::mem::take(&mut chunk)));
        }
    }
    if !chunk.is_empty() {
        chunks.push(Value::Array(chunk));
    }
    chunks
}

fn split_entries(entries: Map<String, Value>, limit: usize) -> Vec<Value> {
    let mut chunks = Vec::new();
    let mut chunk = Map::new();
    for (key, value) in entries {
        chunk.insert(key, value);
        if chunk.len() >= limit {
            chunks.push(Value::Object(std::mem::take(&mut chunk)));
        }
    }
    if !chunk.is_empty() {
        chunks.push(Value::Object(chunk));
    }
    chunks
}

fn verify_counts(expected: usize, chunks: &[Value]) -> Result<(), ChunkError> {
    let actual = chunks
        .iter()
        .map(|chunk| match chunk {
            Value::Array(rows) => rows.len(),
            Value::Object(entries) => entries.len(),
            _ => 0,
        })
        .sum();
    if actual != expected {
        return Err(ChunkError::CountMismatch { expected, actual });
    }
    Ok(())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// File names for `count` chunks of `file_name`:
/// `"graph_nodes.json"` → `"graph_nodes.0.json"`, `"graph_nodes.1.json"`, …
///
/// Only the final path component is used; chunk files live beside the
/// original.
#[must_use]
pub fn chunk_names(file_name: &str, count: usize) -> Vec<String> {
    let base = file_name.rsplit('/').next().unwrap_or(file_name);
    let (stem, extension) = split_extension(base);
    (0..count)
        .map(|position| format!("{stem}.{position}{extension}"))
        .collect()
}

/// Backup name for an in-place rewrite:
/// `"graph_nodes.json"` → `"graph_nodes.bak.{unix_seconds}.json"`.
#[must_use]
pub fn backup_name(file_name: &str, unix_seconds: u64) -> String {
    let (stem, extension) = split_extension(file_name);
    format!("{stem}.bak.{unix_seconds}{extension}")
}

/// Splits a file name into stem and extension:
/// `"graph_nodes.json"` → `("graph_nodes", ".json")`.
#[must_use]
pub fn split_extension(file_name: &str) -> (&str, &str) {
    match file_name.rfind('.') {
        Some(dot) if dot > 0 => file_name.split_at(dot),
        _ => (file_name, ""),
    }
}
