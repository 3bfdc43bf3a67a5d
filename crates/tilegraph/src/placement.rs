//! Connector matching: every way a template can mate with one open connector.

use crate::catalog::{Connector, TileTemplate};
use crate::types::{Bounds, Direction, GridVec, Rotation};

/// An unconsumed connector already fixed in world space.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OpenConnector {
    /// Index of the owning node in insertion order.
    pub node_index: usize,
    pub direction: Direction,
    pub connector_type: String,
    pub world_position: GridVec,
    /// `distance_from_start` of the owning node.
    pub distance: i32,
}

impl OpenConnector {
    pub(crate) fn on_node(
        node_index: usize,
        distance: i32,
        connector: &Connector,
        position: GridVec,
        rotation: Rotation,
    ) -> Self {
        Self {
            node_index,
            direction: rotation.apply(connector.direction),
            connector_type: connector.connector_type.clone(),
            world_position: position.add(connector.local_position.rotated(rotation)),
            distance,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
    pub position: GridVec,
    pub rotation: Rotation,
    /// Which template connector lands on the open connector.
    pub connector_index: usize,
}

impl Placement {
    pub fn bounds(&self, template: &TileTemplate) -> Bounds {
        Bounds::for_placement(template.size, self.position, self.rotation)
    }

    /// World direction of the mating connector once placed.
    pub fn mating_direction(&self, template: &TileTemplate) -> Direction {
        self.rotation.apply(template.connectors[self.connector_index].direction)
    }
}

/// Lists placements in connector order, then rotation order. The list is empty when nothing
/// fits, which is an ordinary outcome. Placements whose box would leave the `i32` grid are
/// skipped.
pub fn solve_placements(source: &OpenConnector, template: &TileTemplate) -> Vec<Placement> {
    let required = source.direction.opposite();
    let mut placements = Vec::new();
    for (connector_index, connector) in template.connectors.iter().enumerate() {
        if connector.connector_type != source.connector_type {
            continue;
        }
        for rotation in Rotation::ALL {
            if rotation.apply(connector.direction) != required {
                continue;
            }
            let offset = connector.local_position.rotated(rotation);
            let Some(position) = source.world_position.checked_sub(offset) else {
                continue;
            };
            if Bounds::checked_for_placement(template.size, position, rotation).is_none() {
                continue;
            }
            placements.push(Placement { position, rotation, connector_index });
        }
    }
    placements
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::tags;

    fn hall(direction: Direction, x: i32, z: i32) -> Connector {
        Connector::new(direction, "Hall", GridVec::new(x, 0, z))
    }

    fn corridor() -> TileTemplate {
        TileTemplate::new(
            "corridor",
            GridVec::new(2, 1, 4),
            vec![hall(Direction::North, 1, 0), hall(Direction::South, 1, 4)],
            &[tags::CORRIDOR],
        )
    }

    fn north_exit_at_origin_room() -> OpenConnector {
        OpenConnector {
            node_index: 0,
            direction: Direction::North,
            connector_type: "Hall".to_string(),
            world_position: GridVec::new(2, 0, 0),
            distance: 0,
        }
    }

    #[test]
    fn straight_corridor_mates_through_either_end() {
        let placements = solve_placements(&north_exit_at_origin_room(), &corridor());
        assert_eq!(
            placements,
            vec![
                Placement {
                    position: GridVec::new(3, 0, 0),
                    rotation: Rotation::from_quarter_turns(2),
                    connector_index: 0,
                },
                Placement {
                    position: GridVec::new(1, 0, -4),
                    rotation: Rotation::from_quarter_turns(0),
                    connector_index: 1,
                },
            ]
        );

        let template = corridor();
        for placement in &placements {
            assert_eq!(placement.mating_direction(&template), Direction::South);
            assert_eq!(
                placement.bounds(&template),
                Bounds { min: GridVec::new(1, 0, -4), max: GridVec::new(3, 1, 0) }
            );
        }
    }

    #[test]
    fn mating_connector_lands_on_the_open_connector() {
        let source = OpenConnector {
            direction: Direction::East,
            world_position: GridVec::new(7, 0, -3),
            ..north_exit_at_origin_room()
        };
        let bend = TileTemplate::new(
            "bend",
            GridVec::new(2, 1, 2),
            vec![hall(Direction::North, 1, 0), hall(Direction::East, 2, 1)],
            &[],
        );

        let placements = solve_placements(&source, &bend);
        assert_eq!(placements.len(), 2);
        for placement in placements {
            let connector = &bend.connectors[placement.connector_index];
            let landed =
                placement.position.add(connector.local_position.rotated(placement.rotation));
            assert_eq!(landed, source.world_position);
            assert_eq!(placement.mating_direction(&bend), Direction::West);
        }
    }

    #[test]
    fn mismatched_connector_types_never_mate() {
        let mut source = north_exit_at_origin_room();
        source.connector_type = "Door".to_string();
        assert!(solve_placements(&source, &corridor()).is_empty());
    }

    #[test]
    fn placements_past_the_grid_edge_are_skipped() {
        let long_corridor = TileTemplate::new(
            "long",
            GridVec::new(1, 1, 1 << 30),
            vec![hall(Direction::North, 0, 0), hall(Direction::South, 0, 1 << 30)],
            &[tags::CORRIDOR],
        );
        let source = OpenConnector {
            world_position: GridVec::new(0, 0, -(1 << 30)),
            ..north_exit_at_origin_room()
        };
        assert_eq!(
            solve_placements(&source, &long_corridor),
            vec![
                Placement {
                    position: GridVec::new(0, 0, -(1 << 30)),
                    rotation: Rotation::from_quarter_turns(2),
                    connector_index: 0,
                },
                Placement {
                    position: GridVec::new(0, 0, i32::MIN),
                    rotation: Rotation::default(),
                    connector_index: 1,
                },
            ]
        );

        let at_edge = OpenConnector { world_position: GridVec::new(0, 0, i32::MIN), ..source };
        assert!(solve_placements(&at_edge, &long_corridor).is_empty());
    }

    #[test]
    fn open_connector_on_rotated_node_is_in_world_space() {
        let connector = hall(Direction::East, 4, 2);
        let open = OpenConnector::on_node(
            3,
            5,
            &connector,
            GridVec::new(10, 0, 10),
            Rotation::from_quarter_turns(1),
        );
        assert_eq!(open.direction, Direction::South);
        assert_eq!(open.world_position, GridVec::new(8, 0, 14));
        assert_eq!(open.node_index, 3);
        assert_eq!(open.distance, 5);
    }
}
