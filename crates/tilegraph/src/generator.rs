//! Graph-generation orchestration: start room, main path, end room, then side branches.

mod branches;
mod main_path;

use std::collections::BTreeSet;

use crate::catalog::{TileCatalog, TileTemplate, tags};
use crate::config::GeneratorConfig;
use crate::graph::{DungeonGraph, GraphEdge, GraphNode};
use crate::placement::{OpenConnector, Placement};
use crate::rng::SeededRng;
use crate::types::{GridVec, Rotation};

/// How the end room got attached, if at all.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EndPlacement {
    Frontier,
    BranchPool,
    #[default]
    Unplaced,
}

/// Bookkeeping from one generation run. Not part of the graph itself.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GenerationReport {
    pub seed: u64,
    pub attempts_used: u32,
    pub unmatched_attempts: u32,
    pub collisions_rejected: u32,
    pub reached_min_path_length: bool,
    pub end_placement: EndPlacement,
    pub branch_attempts: usize,
    pub branches_placed: usize,
}

pub struct DungeonGenerator<'a> {
    catalog: &'a TileCatalog,
    config: GeneratorConfig,
}

impl<'a> DungeonGenerator<'a> {
    pub fn new(catalog: &'a TileCatalog, config: GeneratorConfig) -> Self {
        Self { catalog, config }
    }

    pub fn generate(&self, seed: u64) -> DungeonGraph {
        self.generate_with_report(seed).0
    }

    pub fn generate_with_report(&self, seed: u64) -> (DungeonGraph, GenerationReport) {
        let mut build = GraphBuild::new(self.catalog, &self.config, seed);
        if build.place_start() {
            build.grow_main_path();
            build.report.end_placement = build.place_end();
            build.grow_branches();
        }
        let (graph, report) = build.finish();

        log::info!(
            "seed {seed}: {} nodes, main path {}, end {:?}, {} branches, {} attempts",
            graph.nodes.len(),
            graph.main_path_length,
            report.end_placement,
            report.branches_placed,
            report.attempts_used
        );
        if graph.end_node_id.is_none() && !graph.nodes.is_empty() {
            log::warn!("seed {seed}: no end room could be placed");
        }
        (graph, report)
    }
}

/// Mutable state of a single run. Nothing here outlives the call that created it.
struct GraphBuild<'a> {
    config: &'a GeneratorConfig,
    rng: SeededRng,
    start_tiles: Vec<&'a TileTemplate>,
    growth_tiles: Vec<&'a TileTemplate>,
    corridor_tiles: Vec<&'a TileTemplate>,
    room_tiles: Vec<&'a TileTemplate>,
    end_tiles: Vec<&'a TileTemplate>,
    branch_tiles: Vec<&'a TileTemplate>,
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
    frontier: Vec<OpenConnector>,
    branch_pool: Vec<OpenConnector>,
    main_path_nodes: usize,
    end_node_index: Option<usize>,
    report: GenerationReport,
}

impl<'a> GraphBuild<'a> {
    fn new(catalog: &'a TileCatalog, config: &'a GeneratorConfig, seed: u64) -> Self {
        let mut start_tiles: Vec<&TileTemplate> = catalog.with_tag(tags::START).collect();
        if start_tiles.is_empty() {
            start_tiles = catalog.iter().collect();
        }
        let growth_tiles: Vec<&TileTemplate> = catalog
            .iter()
            .filter(|template| {
                !template.has_tag(tags::START)
                    && !template.has_tag(tags::END)
                    && template.connectors.len() >= 2
            })
            .collect();
        let corridor_tiles = growth_tiles.iter().copied().filter(|t| t.is_corridor()).collect();
        let room_tiles = growth_tiles.iter().copied().filter(|t| t.is_room()).collect();

        Self {
            config,
            rng: SeededRng::new(seed),
            start_tiles,
            growth_tiles,
            corridor_tiles,
            room_tiles,
            end_tiles: catalog.with_tag(tags::END).collect(),
            branch_tiles: catalog.iter().filter(|t| !t.has_tag(tags::END)).collect(),
            nodes: Vec::new(),
            edges: Vec::new(),
            frontier: Vec::new(),
            branch_pool: Vec::new(),
            main_path_nodes: 0,
            end_node_index: None,
            report: GenerationReport { seed, ..GenerationReport::default() },
        }
    }

    /// Places the start room at the origin and opens exactly one of its connectors. The
    /// others stay sealed for the whole run. Returns `false` for an empty catalog.
    fn place_start(&mut self) -> bool {
        let Some(&template) = self.rng.pick(&self.start_tiles) else {
            return false;
        };
        let rotation = Rotation::default();
        let mut node_tags = template.tags.clone();
        node_tags.insert(tags::MAIN_PATH.to_string());
        node_tags.insert(tags::START_ROOM.to_string());
        self.nodes.push(GraphNode {
            id: node_id(0),
            tile_id: template.id.clone(),
            position: GridVec::ZERO,
            rotation,
            bounds: Placement { position: GridVec::ZERO, rotation, connector_index: 0 }
                .bounds(template),
            tags: node_tags,
            distance_from_start: 0,
            used_connector_directions: BTreeSet::new(),
        });
        self.main_path_nodes = 1;

        if let Some(connector) = self.rng.pick(&template.connectors) {
            self.frontier.push(OpenConnector::on_node(0, 0, connector, GridVec::ZERO, rotation));
        }
        log::debug!("start room '{}' placed with {} open exit(s)", template.id, self.frontier.len());
        true
    }

    /// Appends a node mated to `source` and the edge between them, marking the consumed
    /// face on both ends. Returns the new node index.
    fn attach(
        &mut self,
        source: &OpenConnector,
        template: &TileTemplate,
        placement: Placement,
        role_tag: &str,
        distance_from_start: i32,
    ) -> usize {
        let index = self.nodes.len();
        let to_direction = placement.mating_direction(template);
        let mut node_tags = template.tags.clone();
        node_tags.insert(role_tag.to_string());
        self.nodes.push(GraphNode {
            id: node_id(index),
            tile_id: template.id.clone(),
            position: placement.position,
            rotation: placement.rotation,
            bounds: placement.bounds(template),
            tags: node_tags,
            distance_from_start,
            used_connector_directions: BTreeSet::from([to_direction]),
        });

        let from = &mut self.nodes[source.node_index];
        from.used_connector_directions.insert(source.direction);
        let from_id = from.id.clone();
        self.edges.push(GraphEdge {
            from: from_id,
            to: node_id(index),
            connector_type: source.connector_type.clone(),
            from_direction: source.direction,
            to_direction,
        });
        index
    }

    /// Connectors of a freshly placed node other than the one it was mated through.
    fn unused_connectors(
        &self,
        node_index: usize,
        template: &TileTemplate,
        placement: Placement,
    ) -> Vec<OpenConnector> {
        let distance = self.nodes[node_index].distance_from_start;
        template
            .connectors
            .iter()
            .enumerate()
            .filter(|&(connector_index, _)| connector_index != placement.connector_index)
            .map(|(_, connector)| {
                OpenConnector::on_node(
                    node_index,
                    distance,
                    connector,
                    placement.position,
                    placement.rotation,
                )
            })
            .collect()
    }

    fn finish(self) -> (DungeonGraph, GenerationReport) {
        let main_path_length = self.nodes.iter().filter(|node| node.is_main_path()).count();
        debug_assert_eq!(main_path_length, self.main_path_nodes);
        let graph = DungeonGraph {
            start_node_id: self.nodes.first().map(|node| node.id.clone()).unwrap_or_default(),
            end_node_id: self.end_node_index.map(|index| self.nodes[index].id.clone()),
            main_path_length,
            nodes: self.nodes,
            edges: self.edges,
        };
        (graph, self.report)
    }
}

fn node_id(index: usize) -> String {
    format!("node-{index}")
}
