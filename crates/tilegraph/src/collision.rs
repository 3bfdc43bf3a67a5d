//! Overlap tests between a tentative tile and the nodes already placed.

use crate::graph::GraphNode;
use crate::types::Bounds;

/// First placed node whose box overlaps `bounds`. Shared faces are not collisions, since
/// mated tiles meet exactly on their connector faces.
pub fn first_collision<'a>(bounds: &Bounds, placed: &'a [GraphNode]) -> Option<&'a GraphNode> {
    placed.iter().find(|node| node.bounds.intersects(bounds))
}

pub fn collides(bounds: &Bounds, placed: &[GraphNode]) -> bool {
    first_collision(bounds, placed).is_some()
}
