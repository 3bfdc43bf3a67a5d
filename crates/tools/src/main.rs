use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;
use tilegraph::{
    DungeonGenerator, DungeonGraph, GenerationReport, GeneratorConfig, GraphDefect, TileCatalog,
    load_catalog_from_file, main_path_nodes, route_count, shortest_path_length, validate,
};

const ROUTE_LIMIT: usize = 32;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Summary,
    Json,
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    /// Tile catalog (.toml or .json). Defaults to the built-in starter set.
    #[arg(short, long)]
    catalog: Option<PathBuf>,
    /// Generator config TOML. Missing keys take their defaults.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Extra seeds (seed + 1, seed + 2, ...) to try when a graph fails validation.
    #[arg(short, long, default_value_t = 0)]
    retries: u32,
    #[arg(short, long, value_enum, default_value_t = Format::Summary)]
    format: Format,
}

#[derive(Serialize)]
struct Output<'a> {
    requested_seed: u64,
    seed: u64,
    catalog_hash: String,
    fingerprint: String,
    valid: bool,
    graph: &'a DungeonGraph,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let catalog = match &args.catalog {
        Some(path) => load_catalog_from_file(path)
            .with_context(|| format!("Failed to load catalog: {}", path.display()))?,
        None => TileCatalog::starter(),
    };
    let config = match &args.config {
        Some(path) => GeneratorConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => GeneratorConfig::default(),
    };

    let generator = DungeonGenerator::new(&catalog, config);
    let (graph, report, outcome) = generate_with_retries(&generator, args.seed, args.retries);

    match args.format {
        Format::Summary => print_summary(&catalog, &graph, &report, outcome),
        Format::Json => {
            let output = Output {
                requested_seed: args.seed,
                seed: report.seed,
                catalog_hash: format!("{:016x}", catalog.content_hash()),
                fingerprint: format!("{:016x}", graph.fingerprint()),
                valid: outcome.is_ok(),
                graph: &graph,
            };
            let json = serde_json::to_string_pretty(&output)
                .with_context(|| "Failed to serialize graph JSON")?;
            println!("{json}");
        }
    }

    outcome.with_context(|| format!("No valid dungeon for seeds {}..={}", args.seed, report.seed))
}

/// Regenerates with consecutive seeds until one validates; keeps the last attempt otherwise.
fn generate_with_retries(
    generator: &DungeonGenerator<'_>,
    seed: u64,
    retries: u32,
) -> (DungeonGraph, GenerationReport, Result<(), GraphDefect>) {
    let mut attempt = 0;
    loop {
        let candidate = seed.wrapping_add(u64::from(attempt));
        let (graph, report) = generator.generate_with_report(candidate);
        let outcome = validate(&graph);
        match outcome {
            Err(defect) if attempt < retries => {
                log::info!("seed {candidate} rejected: {defect}, retrying");
                attempt += 1;
            }
            _ => return (graph, report, outcome),
        }
    }
}

fn print_summary(
    catalog: &TileCatalog,
    graph: &DungeonGraph,
    report: &GenerationReport,
    outcome: Result<(), GraphDefect>,
) {
    println!("Seed: {}", report.seed);
    println!("Catalog: {} templates, hash {:016x}", catalog.len(), catalog.content_hash());
    println!("Nodes: {} ({} edges)", graph.nodes.len(), graph.edges.len());
    println!("Main path: {} nodes", graph.main_path_length);
    println!(
        "Branches: {} placed of {} attempted",
        report.branches_placed, report.branch_attempts
    );
    println!(
        "Attempts: {} used, {} unmatched, {} rejected by collision",
        report.attempts_used, report.unmatched_attempts, report.collisions_rejected
    );
    println!("End room: {:?}", report.end_placement);
    match outcome {
        Ok(()) => println!("Valid: yes"),
        Err(defect) => println!("Valid: no ({defect})"),
    }
    println!("Routes: {}", route_count(graph, ROUTE_LIMIT));
    if let Some(length) = shortest_path_length(graph, ROUTE_LIMIT) {
        println!("Shortest route: {length} nodes");
    }
    println!("Fingerprint: {:016x}", graph.fingerprint());

    for node in main_path_nodes(graph) {
        println!(
            "  {:>8} {:<18} at ({}, {}, {}) rot {} dist {}",
            node.id,
            node.tile_id,
            node.position.x,
            node.position.y,
            node.position.z,
            node.rotation.quarter_turns(),
            node.distance_from_start
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn retries_stop_at_the_first_valid_seed() {
        let catalog = TileCatalog::starter();
        let generator = DungeonGenerator::new(&catalog, GeneratorConfig::default());
        let (graph, report, outcome) = generate_with_retries(&generator, 10, 32);

        assert_eq!(outcome, Ok(()));
        assert_eq!(validate(&graph), Ok(()));
        for earlier in 10..report.seed {
            assert!(validate(&generator.generate(earlier)).is_err(), "seed {earlier} was valid");
        }
    }

    #[test]
    fn empty_catalog_exhausts_every_retry() {
        let catalog = TileCatalog::default();
        let generator = DungeonGenerator::new(&catalog, GeneratorConfig::default());
        let (graph, report, outcome) = generate_with_retries(&generator, 5, 3);

        assert!(graph.nodes.is_empty());
        assert_eq!(report.seed, 8);
        assert_eq!(outcome, Err(GraphDefect::NoNodes));
    }

    proptest! {
        #[test]
        fn retry_seed_stays_within_the_requested_window(seed in any::<u64>(), retries in 0u32..8) {
            let catalog = TileCatalog::starter();
            let generator = DungeonGenerator::new(&catalog, GeneratorConfig::default());
            let (_, report, _) = generate_with_retries(&generator, seed, retries);
            let offset = report.seed.wrapping_sub(seed);
            prop_assert!(offset <= u64::from(retries));
        }
    }
}
