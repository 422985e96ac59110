//! Build a junction/link graph from canal feature data.

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use miette::{Context, IntoDiagnostic, Result, miette};

use canalgraph::compiler::{Compiler, DEFAULT_TOLERANCE};
use canalgraph::document::write_compiled;
use canalgraph::feature::FeatureCollection;

/// Build junction/link graph from canal data.
#[derive(Debug, Parser)]
#[command(name = "canalgraph", version, about = "Build junction/link graph from canal data.")]
struct Cli {
    /// Input JSON file with canal features.
    input: PathBuf,

    /// Output JSON file for the graph.
    #[arg(default_value = "graph_nodes.json")]
    graph_output: PathBuf,

    /// Output JSON file for the links.
    #[arg(default_value = "graph_links.json")]
    links_output: PathBuf,

    /// Output JSON file for the locators.
    #[arg(default_value = "graph_locators.json")]
    locators_output: PathBuf,

    /// Distance tolerance for detecting junctions.
    #[arg(long = "dist-tolerance", default_value_t = DEFAULT_TOLERANCE)]
    dist_tolerance: f64,
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

    if !cli.input.is_file() {
        return Err(miette!(
            "input file '{}' does not exist",
            cli.input.display()
        ));
    }
    let raw = fs::read_to_string(&cli.input)
        .into_diagnostic()
        .wrap_err_with(|| format!("failed to read '{}'", cli.input.display()))?;
    let collection: FeatureCollection = serde_json::from_str(&raw)
        .into_diagnostic()
        .wrap_err_with(|| {
            format!(
                "'{}' is not a canal feature collection",
                cli.input.display()
            )
        })?;

    let compiled = Compiler::new()
        .with_tolerance(cli.dist_tolerance)
        .compile(&collection);
    write_compiled(
        compiled,
        &cli.graph_output,
        &cli.links_output,
        &cli.locators_output,
    )?;

    println!("Graph saved to {}", cli.graph_output.display());
    println!("Links saved to {}", cli.links_output.display());
    println!("Locators saved to {}", cli.locators_output.display());
    Ok(())
}
