//! Zod Schema Generator CLI
//!
//! Reads a type-graph JSON document and writes the generated TypeScript
//! module with all schema declarations in dependency order.

use std::path::PathBuf;

use clap::Parser;
use sha2::{Digest, Sha256};
use tracing_subscriber::EnvFilter;

use zodgen::graph::loader;
use zodgen::{generate, render_module, EmitOptions};

#[derive(Parser)]
#[command(name = "zodgen")]
#[command(about = "Generate Zod schema declarations from a type-graph document")]
struct Cli {
    /// Path to the type-graph JSON document
    input: PathBuf,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Emit schemas only, without z.infer type bindings
    #[arg(long)]
    schema_only: bool,

    /// Export the reference graph to a GraphViz DOT file
    #[arg(long)]
    graph: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let content = std::fs::read_to_string(&cli.input)?;
    let digest = format!("{:x}", Sha256::digest(content.as_bytes()));
    tracing::info!(input = %cli.input.display(), %digest, "loading type graph");

    let graph = loader::load_from_str(&content)?;
    println!(
        "Loaded {} object types, {} enums",
        graph.object_count(),
        graph.enum_count()
    );

    if let Some(dot_path) = &cli.graph {
        std::fs::write(dot_path, graph.to_dot())?;
        println!("Exported reference graph to {:?}", dot_path);
    }

    let options = EmitOptions {
        type_bindings: !cli.schema_only,
        ..EmitOptions::default()
    };
    let declarations = generate(&graph, &options)?;
    let module = render_module(&declarations);

    match &cli.output {
        Some(path) => {
            std::fs::write(path, module)?;
            println!("Wrote {} declarations to {:?}", declarations.len(), path);
        }
        None => print!("{}", module),
    }

    Ok(())
}
