//! Split an oversized JSON document into bounded chunks with an index.

use std::fs;
use std::io::{IsTerminal, Read};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use clap::Parser;
use miette::{Context, IntoDiagnostic, Result, miette};
use serde_json::Value;
use tracing::info;

use canalgraph::chunk::{self, ChunkPlan};

/// Compress a JSON document, optionally splitting one field into chunks.
#[derive(Debug, Parser)]
#[command(
    name = "canalgraph-chunk",
    version,
    about = "Compresses a JSON document, optionally creating chunks."
)]
struct Cli {
    /// Input JSON file path, or '-' to read from stdin.
    #[arg(default_value = "-")]
    input: String,

    /// Target key to chunk.
    #[arg(default_value = "")]
    chunk_target: String,

    /// Max number of rows per chunk.
    #[arg(default_value_t = 10_000)]
    chunk_limit: usize,
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "canalgraph=info".into());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let (document, source) = load_input(&cli.input)?;

    // Stdin has no file name to derive chunk names from; fall back to the
    // target key (or a plain "chunk" for bare arrays).
    let file_name = match &source {
        Some(path) => path.display().to_string(),
        None if !cli.chunk_target.is_empty() => format!("{}.json", cli.chunk_target),
        None => "chunk.json".to_string(),
    };

    match chunk::plan(&file_name, document, &cli.chunk_target, cli.chunk_limit)? {
        ChunkPlan::Unchanged(document) => match &source {
            Some(path) => rewrite_in_place(path, &document)?,
            None => print_document(&document)?,
        },
        ChunkPlan::Split {
            index,
            chunks,
            names,
        } => {
            if let Some(index) = &index {
                match &source {
                    Some(path) => rewrite_in_place(path, index)?,
                    None => print_document(index)?,
                }
            }
            let directory = source
                .as_deref()
                .and_then(Path::parent)
                .map(Path::to_path_buf)
                .unwrap_or_default();
            for (name, body) in names.iter().zip(&chunks) {
                write_document(&directory.join(name), body)?;
            }
        }
    }
    Ok(())
}

fn load_input(input: &str) -> Result<(Value, Option<PathBuf>)> {
    if input == "-" {
        if std::io::stdin().is_terminal() {
            return Err(miette!("no input provided via stdin"));
        }
        let mut raw = String::new();
        std::io::stdin()
            .read_to_string(&mut raw)
            .into_diagnostic()
            .wrap_err("failed to read stdin")?;
        let document = serde_json::from_str(&raw)
            .into_diagnostic()
            .wrap_err("failed to parse JSON from stdin")?;
        Ok((document, None))
    } else {
        let path = PathBuf::from(input);
        if !path.is_file() {
            return Err(miette!("input file '{}' does not exist", path.display()));
        }
        let raw = fs::read_to_string(&path)
            .into_diagnostic()
            .wrap_err_with(|| format!("failed to read '{}'", path.display()))?;
        let document = serde_json::from_str(&raw)
            .into_diagnostic()
            .wrap_err_with(|| format!("failed to parse JSON from '{}'", path.display()))?;
        Ok((document, Some(path)))
    }
}

/// Backs the original file up with a timestamped name, then overwrites it.
///
/// Not transactional: a crash between the two writes leaves the backup as
/// the only intact copy.
fn rewrite_in_place(path: &Path, document: &Value) -> Result<()> {
    let original = fs::read(path)
        .into_diagnostic()
        .wrap_err_with(|| format!("failed to re-read '{}' for backup", path.display()))?;
    let seconds = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or(0);
    let backup = chunk::backup_name(&path.display().to_string(), seconds);
    fs::write(&backup, original)
        .into_diagnostic()
        .wrap_err_with(|| format!("failed to write backup '{backup}'"))?;
    info!(backup = %backup, "backed up original before rewrite");

    write_document(path, document)
}

fn write_document(path: &Path, document: &Value) -> Result<()> {
    let compact = serde_json::to_string(document)
        .into_diagnostic()
        .wrap_err("failed to serialize document")?;
    info!(path = %path.display(), "writing output");
    fs::write(path, compact)
        .into_diagnostic()
        .wrap_err_with(|| format!("failed to write '{}'", path.display()))
}

fn print_document(document: &Value) -> Result<()> {
    let compact = serde_json::to_string(document)
        .into_diagnostic()
        .wrap_err("failed to serialize document")?;
    println!("{compact}");
    Ok(())
}
