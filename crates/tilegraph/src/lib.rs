//! Seeded dungeon-layout graphs grown from modular tile templates.

pub mod catalog;
pub mod catalog_file;
pub mod collision;
pub mod config;
pub mod generator;
pub mod graph;
pub mod placement;
pub mod query;
pub mod rng;
pub mod types;

pub use catalog::{CatalogError, Connector, TileCatalog, TileTemplate, tags};
pub use catalog_file::{CatalogFormat, CatalogLoadError, load_catalog_from_file, parse_catalog};
pub use config::{ConfigError, GeneratorConfig};
pub use generator::{DungeonGenerator, EndPlacement, GenerationReport};
pub use graph::{DungeonGraph, GraphEdge, GraphNode};
pub use query::{
    GraphDefect, adjacency, all_paths, main_path_nodes, nodes_with_tag, route_count,
    shortest_path_length, validate,
};
pub use rng::SeededRng;
pub use types::{Bounds, Direction, GridVec, Rotation};

/// Same seed, catalog, and config always give the same graph.
pub fn generate(seed: u64, catalog: &TileCatalog, config: &GeneratorConfig) -> DungeonGraph {
    DungeonGenerator::new(catalog, *config).generate(seed)
}
