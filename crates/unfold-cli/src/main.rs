use std::error::Error;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use clap::Parser;

use unfold_core::graph::write_routes;
use unfold_core::{Config, TypeGraph};

#[derive(Parser)]
#[command(name = "unfold")]
#[command(
    about = "Derive every reachable navigation route of an API surface from its CSDL schema",
    long_about = None
)]
struct Cli {
    /// Path to the CSDL schema document
    schema: PathBuf,

    /// Maximum collection hops before traversal stops descending
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    max_hops: Option<u32>,

    /// Output directory (overrides config)
    #[arg(long)]
    out: Option<PathBuf>,

    /// Skip writing the graph dump
    #[arg(long)]
    no_graph: bool,

    /// Skip writing the route list
    #[arg(long)]
    no_paths: bool,

    /// Write the graph dump as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Load configuration from a specific file
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::load()?,
    };
    if let Some(out) = &cli.out {
        config.output.dir = out.to_string_lossy().into_owned();
    }
    let max_hops = cli.max_hops.unwrap_or(config.traversal.max_collection_hops);

    let size = fs::metadata(&cli.schema)?.len();
    println!("loading schema: {} ({} bytes)", cli.schema.display(), size);
    let model = unfold_core::schema::csdl::parse_file(&cli.schema)?;
    println!(
        "loaded {} structured types, {} container members",
        model.types.len(),
        model.container.members.len()
    );

    let build = TypeGraph::from_model(&model);
    for warning in &build.warnings {
        println!("warning: {warning}");
    }
    let graph = build.graph;
    println!(
        "schema graph: {} nodes, {} edges",
        graph.node_count(),
        graph.edge_count()
    );

    for violation in graph.validate() {
        println!("warning: {violation}");
    }

    fs::create_dir_all(&config.output.dir)?;

    if !cli.no_graph {
        let mut path = config.output.graph_path(&cli.schema);
        if cli.json {
            path.set_extension("json");
            let mut writer = BufWriter::new(File::create(&path)?);
            serde_json::to_writer_pretty(&mut writer, &graph)?;
            writer.flush()?;
        } else {
            fs::write(&path, graph.to_text())?;
        }
        println!("wrote graph to {}", path.display());
    }

    if !cli.no_paths {
        let path = config.output.routes_path(&cli.schema);
        let mut writer = BufWriter::new(File::create(&path)?);
        let count = write_routes(&graph, max_hops, &mut writer)?;
        writer.flush()?;
        println!("wrote {} routes to {}", count, path.display());
    }

    Ok(())
}
