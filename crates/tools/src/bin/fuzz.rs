use anyhow::{Result, bail, ensure};
use clap::Parser;
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};
use std::collections::BTreeSet;
use tilegraph::{
    DungeonGenerator, DungeonGraph, EndPlacement, GeneratorConfig, TileCatalog, all_paths, tags,
    validate,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(short, long, default_value_t = 1000)]
    runs: u32,
}

fn draw(rng: &mut ChaCha8Rng, low: u64, high: u64) -> u64 {
    low + rng.next_u64() % (high - low + 1)
}

fn random_config(rng: &mut ChaCha8Rng) -> GeneratorConfig {
    GeneratorConfig {
        target_size: draw(rng, 1, 40) as usize,
        max_attempts: draw(rng, 1, 800) as u32,
        min_path_length: draw(rng, 0, 16) as usize,
        max_branches: draw(rng, 0, 8) as usize,
    }
}

fn check_invariants(graph: &DungeonGraph, config: &GeneratorConfig) -> Result<()> {
    for (i, a) in graph.nodes.iter().enumerate() {
        for b in &graph.nodes[i + 1..] {
            ensure!(!a.bounds.intersects(&b.bounds), "{} overlaps {}", a.id, b.id);
        }
    }

    for node in &graph.nodes {
        let mut faces = Vec::new();
        for edge in &graph.edges {
            if edge.from == node.id {
                faces.push(edge.from_direction);
            }
            if edge.to == node.id {
                faces.push(edge.to_direction);
            }
        }
        let distinct: BTreeSet<_> = faces.iter().copied().collect();
        ensure!(distinct.len() == faces.len(), "{} reuses a face", node.id);
        ensure!(
            distinct == node.used_connector_directions,
            "{} used directions disagree with its edges",
            node.id
        );
    }

    let main_path = graph.nodes.iter().filter(|node| node.is_main_path()).count();
    ensure!(main_path == graph.main_path_length, "main path length mismatch");
    let branches = graph.nodes.iter().filter(|node| node.has_tag(tags::BRANCH)).count();
    ensure!(branches <= config.max_branches, "{branches} branches over cap");

    if graph.end_node_id.is_some() {
        let Some(path) = all_paths(graph, 1).into_iter().next() else {
            bail!("end room is unreachable");
        };
        let mut last = 0;
        for id in &path {
            let Some(node) = graph.node(id) else { bail!("path visits missing node {id}") };
            ensure!(node.is_main_path(), "shortest route leaves the main path at {id}");
            ensure!(node.distance_from_start >= last, "distance drops at {id}");
            last = node.distance_from_start;
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    println!("Starting fuzz harness on seed {} for {} runs...", args.seed, args.runs);
    let catalog = TileCatalog::starter();
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let mut valid = 0;
    let mut ends_from_pool = 0;

    for run in 0..args.runs {
        let seed = rng.next_u64();
        let config = random_config(&mut rng);
        let generator = DungeonGenerator::new(&catalog, config);
        let (graph, report) = generator.generate_with_report(seed);

        if let Err(err) = check_invariants(&graph, &config) {
            bail!("Invariant failed on run {run} (seed {seed}, {config:?}): {err}");
        }
        ensure!(
            generator.generate(seed) == graph,
            "Seed {seed} produced two different graphs"
        );

        if validate(&graph).is_ok() {
            valid += 1;
        }
        if report.end_placement == EndPlacement::BranchPool {
            ends_from_pool += 1;
        }
    }

    println!(
        "Fuzzing completed successfully: {valid}/{} valid, {ends_from_pool} end rooms from the branch pool.",
        args.runs
    );
    Ok(())
}
