//! Finished dungeon graph handed to scene instantiation and encounter population.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use xxhash_rust::xxh3::xxh3_64;

use crate::catalog::tags;
use crate::types::{Bounds, Direction, GridVec, Rotation};

/// One placed tile instance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub tile_id: String,
    pub position: GridVec,
    pub rotation: Rotation,
    pub bounds: Bounds,
    pub tags: BTreeSet<String>,
    /// Hops from the start room along the main path, `-1` off the main path.
    pub distance_from_start: i32,
    /// World-space faces that carry an edge. Every other connector face is sealed.
    pub used_connector_directions: BTreeSet<Direction>,
}

impl GraphNode {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    pub fn is_main_path(&self) -> bool {
        self.has_tag(tags::MAIN_PATH)
    }

    pub fn is_face_open(&self, direction: Direction) -> bool {
        self.used_connector_directions.contains(&direction)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub from: String,
    pub to: String,
    pub connector_type: String,
    pub from_direction: Direction,
    pub to_direction: Direction,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DungeonGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    /// Empty only when the catalog was empty.
    pub start_node_id: String,
    pub end_node_id: Option<String>,
    pub main_path_length: usize,
}

impl DungeonGraph {
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn start_node(&self) -> Option<&GraphNode> {
        self.node(&self.start_node_id)
    }

    pub fn end_node(&self) -> Option<&GraphNode> {
        self.end_node_id.as_deref().and_then(|id| self.node(id))
    }

    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend((self.nodes.len() as u32).to_le_bytes());
        for node in &self.nodes {
            extend_str(&mut bytes, &node.id);
            extend_str(&mut bytes, &node.tile_id);
            node.position.extend_bytes(&mut bytes);
            bytes.push(u8::from(node.rotation));
            node.bounds.min.extend_bytes(&mut bytes);
            node.bounds.max.extend_bytes(&mut bytes);
            bytes.extend((node.tags.len() as u32).to_le_bytes());
            for tag in &node.tags {
                extend_str(&mut bytes, tag);
            }
            bytes.extend(node.distance_from_start.to_le_bytes());
            bytes.push(
                node.used_connector_directions
                    .iter()
                    .fold(0_u8, |mask, direction| mask | (1 << direction.code())),
            );
        }

        bytes.extend((self.edges.len() as u32).to_le_bytes());
        for edge in &self.edges {
            extend_str(&mut bytes, &edge.from);
            extend_str(&mut bytes, &edge.to);
            extend_str(&mut bytes, &edge.connector_type);
            bytes.push(edge.from_direction.code());
            bytes.push(edge.to_direction.code());
        }

        extend_str(&mut bytes, &self.start_node_id);
        match &self.end_node_id {
            Some(id) => {
                bytes.push(1);
                extend_str(&mut bytes, id);
            }
            None => bytes.push(0),
        }
        bytes.extend((self.main_path_length as u32).to_le_bytes());
        bytes
    }

    /// Stable structural hash, equal exactly when `canonical_bytes` are equal.
    pub fn fingerprint(&self) -> u64 {
        xxh3_64(&self.canonical_bytes())
    }
}

fn extend_str(bytes: &mut Vec<u8>, value: &str) {
    bytes.extend((value.len() as u32).to_le_bytes());
    bytes.extend(value.as_bytes());
}
