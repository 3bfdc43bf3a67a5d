//! Read-only queries over a finished graph: routes, validation, and main-path extraction.
//! Edges are traversable in both directions.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use thiserror::Error;

use crate::catalog::tags;
use crate::graph::{DungeonGraph, GraphNode};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum GraphDefect {
    #[error("no nodes")]
    NoNodes,
    #[error("no end room placed")]
    NoEndRoom,
    #[error("no path from start to end")]
    NoPath,
}

/// Neighbour lists keyed by node id, in edge insertion order.
pub fn adjacency(graph: &DungeonGraph) -> BTreeMap<&str, Vec<&str>> {
    let mut neighbours: BTreeMap<&str, Vec<&str>> =
        graph.nodes.iter().map(|node| (node.id.as_str(), Vec::new())).collect();
    for edge in &graph.edges {
        neighbours.entry(edge.from.as_str()).or_default().push(edge.to.as_str());
        neighbours.entry(edge.to.as_str()).or_default().push(edge.from.as_str());
    }
    neighbours
}

/// Breadth-first enumeration of simple start-to-end paths, shortest first, stopping after
/// `max_paths`. Empty when the graph has no end room.
pub fn all_paths(graph: &DungeonGraph, max_paths: usize) -> Vec<Vec<String>> {
    let Some(end) = graph.end_node_id.as_deref() else {
        return Vec::new();
    };
    if max_paths == 0 || graph.start_node().is_none() {
        return Vec::new();
    }

    let neighbours = adjacency(graph);
    let start = graph.start_node_id.as_str();
    let mut found = Vec::new();
    let mut queue = VecDeque::from([(vec![start], BTreeSet::from([start]))]);

    while let Some((path, visited)) = queue.pop_front() {
        let Some(&current) = path.last() else {
            continue;
        };
        if current == end {
            found.push(path.iter().map(|id| id.to_string()).collect());
            if found.len() >= max_paths {
                break;
            }
            continue;
        }
        for &next in neighbours.get(current).into_iter().flatten() {
            if visited.contains(next) {
                continue;
            }
            let mut next_path = path.clone();
            next_path.push(next);
            let mut next_visited = visited.clone();
            next_visited.insert(next);
            queue.push_back((next_path, next_visited));
        }
    }

    found
}

/// Decides whether a generated graph is usable. Callers typically regenerate with another
/// seed on failure.
pub fn validate(graph: &DungeonGraph) -> Result<(), GraphDefect> {
    if graph.nodes.is_empty() {
        return Err(GraphDefect::NoNodes);
    }
    if graph.end_node_id.is_none() {
        return Err(GraphDefect::NoEndRoom);
    }
    if all_paths(graph, 1).is_empty() {
        return Err(GraphDefect::NoPath);
    }
    Ok(())
}

pub fn route_count(graph: &DungeonGraph, max_paths: usize) -> usize {
    all_paths(graph, max_paths).len()
}

/// Node count (start and end included) of the shortest start-to-end path.
pub fn shortest_path_length(graph: &DungeonGraph, max_paths: usize) -> Option<usize> {
    all_paths(graph, max_paths).iter().map(Vec::len).min()
}

pub fn main_path_nodes(graph: &DungeonGraph) -> Vec<&GraphNode> {
    nodes_with_tag(graph, tags::MAIN_PATH)
}

pub fn nodes_with_tag<'g>(graph: &'g DungeonGraph, tag: &str) -> Vec<&'g GraphNode> {
    graph.nodes.iter().filter(|node| node.has_tag(tag)).collect()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::graph::GraphEdge;
    use crate::types::{Bounds, Direction, GridVec, Rotation};

    fn node(id: &str, node_tags: &[&str]) -> GraphNode {
        GraphNode {
            id: id.to_string(),
            tile_id: "tile".to_string(),
            position: GridVec::ZERO,
            rotation: Rotation::default(),
            bounds: Bounds { min: GridVec::ZERO, max: GridVec::new(1, 1, 1) },
            tags: node_tags.iter().map(|tag| tag.to_string()).collect(),
            distance_from_start: 0,
            used_connector_directions: BTreeSet::new(),
        }
    }

    fn edge(from: &str, to: &str) -> GraphEdge {
        GraphEdge {
            from: from.to_string(),
            to: to.to_string(),
            connector_type: "Hall".to_string(),
            from_direction: Direction::North,
            to_direction: Direction::South,
        }
    }

    /// a - b - d and a - c - d, plus a dangling e off b.
    fn diamond(end: Option<&str>) -> DungeonGraph {
        DungeonGraph {
            nodes: vec![
                node("a", &[tags::MAIN_PATH]),
                node("b", &[tags::MAIN_PATH]),
                node("c", &[tags::MAIN_PATH]),
                node("d", &[tags::MAIN_PATH]),
                node("e", &[]),
            ],
            edges: vec![
                edge("a", "b"),
                edge("a", "c"),
                edge("b", "d"),
                edge("d", "c"),
                edge("b", "e"),
            ],
            start_node_id: "a".to_string(),
            end_node_id: end.map(str::to_string),
            main_path_length: 4,
        }
    }

    #[test]
    fn adjacency_is_bidirectional_in_edge_order() {
        let graph = diamond(Some("d"));
        let neighbours = adjacency(&graph);
        assert_eq!(neighbours["a"], ["b", "c"]);
        assert_eq!(neighbours["b"], ["a", "d", "e"]);
        assert_eq!(neighbours["c"], ["a", "d"]);
        assert_eq!(neighbours["e"], ["b"]);
    }

    #[test]
    fn all_paths_enumerates_both_routes_around_the_diamond() {
        let graph = diamond(Some("d"));
        let paths = all_paths(&graph, 10);
        assert_eq!(paths, vec![vec!["a", "b", "d"], vec!["a", "c", "d"]]);
        assert_eq!(route_count(&graph, 10), 2);
        assert_eq!(route_count(&graph, 1), 1);
        assert_eq!(shortest_path_length(&graph, 10), Some(3));
    }

    #[test]
    fn all_paths_is_empty_without_end() {
        let graph = diamond(None);
        assert!(all_paths(&graph, 10).is_empty());
        assert_eq!(shortest_path_length(&graph, 10), None);
    }

    #[test]
    fn validate_reports_each_defect() {
        assert_eq!(validate(&DungeonGraph::default()), Err(GraphDefect::NoNodes));
        assert_eq!(validate(&diamond(None)), Err(GraphDefect::NoEndRoom));

        let mut disconnected = diamond(Some("d"));
        disconnected.edges.retain(|edge| edge.to != "d" && edge.from != "d");
        assert_eq!(validate(&disconnected), Err(GraphDefect::NoPath));

        assert_eq!(validate(&diamond(Some("d"))), Ok(()));
    }

    #[test]
    fn defect_messages_are_stable() {
        assert_eq!(GraphDefect::NoNodes.to_string(), "no nodes");
        assert_eq!(GraphDefect::NoEndRoom.to_string(), "no end room placed");
        assert_eq!(GraphDefect::NoPath.to_string(), "no path from start to end");
    }

    #[test]
    fn start_equal_to_end_is_a_single_node_path() {
        let mut graph = diamond(Some("a"));
        graph.edges.clear();
        assert_eq!(all_paths(&graph, 5), vec![vec!["a".to_string()]]);
        assert_eq!(shortest_path_length(&graph, 5), Some(1));
    }

    #[test]
    fn main_path_filter_skips_untagged_nodes() {
        let graph = diamond(Some("d"));
        let ids: Vec<&str> = main_path_nodes(&graph).iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c", "d"]);
    }
}
