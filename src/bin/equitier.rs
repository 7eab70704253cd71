//! Equal-size hierarchical clustering CLI.
//!
//! Reads precomputed embeddings as JSON and writes the hierarchy as JSON.
//!
//! ## Usage
//!
//! ```bash
//! # Teams of 5, teams into groups of 3, groups into blocks of 2
//! equitier --input embeddings.json --sizes 5,3,2 --output clustering_result.json
//!
//! # Record arrays with custom columns, read from stdin
//! cat rows.json | equitier --input - --sizes 4 --primary-key student_id --vector-field vec
//! ```
//!
//! Logs go to stderr; set `RUST_LOG` for finer control than `--log-level`.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use equitier::{EmbeddingDocument, HierarchyBuilder, HierarchyConfig, Linkage, SourceConfig};

#[derive(Parser, Debug)]
#[command(name = "equitier", version)]
#[command(about = "Cluster embeddings into fixed-size groups, level by level")]
struct Args {
    /// Embeddings JSON file (`-` for stdin).
    #[arg(long, short)]
    input: PathBuf,

    /// Cluster size per level, comma separated (e.g. 5,3,2).
    #[arg(long, short, env = "EQUITIER_SIZES", value_parser = parse_sizes)]
    sizes: HierarchyConfig,

    /// Primary key column when the input is an array of records.
    #[arg(long, env = "EQUITIER_PRIMARY_KEY", default_value = "id")]
    primary_key: String,

    /// Vector column when the input is an array of records.
    #[arg(long, env = "EQUITIER_VECTOR_FIELD", default_value = "embedding")]
    vector_field: String,

    /// Linkage method: single, complete or average.
    #[arg(long, default_value = "average", value_parser = parse_linkage)]
    linkage: Linkage,

    /// Output path (stdout if omitted).
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Log level when RUST_LOG is unset.
    #[arg(long, env = "EQUITIER_LOG_LEVEL", default_value = "info")]
    log_level: String,
}

fn parse_sizes(s: &str) -> std::result::Result<HierarchyConfig, String> {
    s.parse().map_err(|e: equitier::Error| e.to_string())
}

fn parse_linkage(s: &str) -> std::result::Result<Linkage, String> {
    s.parse().map_err(|e: equitier::Error| e.to_string())
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn read_input(args: &Args) -> Result<EmbeddingDocument> {
    let source = SourceConfig::new()
        .with_primary_key(&args.primary_key)
        .with_vector_field(&args.vector_field);

    let doc = if args.input.as_os_str() == "-" {
        source.parse_reader(io::stdin().lock())
    } else {
        let file = File::open(&args.input)
            .with_context(|| format!("opening {}", args.input.display()))?;
        source.parse_reader(BufReader::new(file))
    };
    doc.with_context(|| format!("reading embeddings from {}", args.input.display()))
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level);

    let doc = read_input(&args)?;
    let mode = doc
        .mode
        .map_or_else(|| "unspecified".to_string(), |m| m.to_string());
    info!(
        entities = doc.entities.len(),
        dim = doc.entities.dim(),
        mode = %mode,
        "loaded embeddings"
    );

    let config = args.sizes.clone().with_linkage(args.linkage);
    let hierarchy = HierarchyBuilder::new(config)
        .build(doc.entities)
        .context("building hierarchy")?;
    let json = hierarchy.to_json_pretty()?;

    match &args.output {
        Some(path) => {
            let file =
                File::create(path).with_context(|| format!("creating {}", path.display()))?;
            let mut out = BufWriter::new(file);
            writeln!(out, "{json}")?;
            out.flush()?;
            info!(path = %path.display(), levels = hierarchy.depth(), "wrote hierarchy");
        }
        None => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            writeln!(out, "{json}")?;
        }
    }

    Ok(())
}
