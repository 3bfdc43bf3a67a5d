//! Immutable tile templates and the validated catalog handed to the generator.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use xxhash_rust::xxh3::xxh3_64;

use crate::types::{Direction, GridVec};

pub mod tags {
    pub const START: &str = "Start";
    pub const END: &str = "End";
    pub const CORRIDOR: &str = "Corridor";
    pub const ROOM: &str = "Room";

    pub const MAIN_PATH: &str = "MainPath";
    pub const START_ROOM: &str = "StartRoom";
    pub const BOSS_ROOM: &str = "BossRoom";
    pub const BRANCH: &str = "Branch";
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connector {
    pub direction: Direction,
    #[serde(rename = "type")]
    pub connector_type: String,
    pub local_position: GridVec,
}

impl Connector {
    pub fn new(direction: Direction, connector_type: &str, local_position: GridVec) -> Self {
        Self { direction, connector_type: connector_type.to_string(), local_position }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileTemplate {
    pub id: String,
    pub size: GridVec,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(default)]
    pub connectors: Vec<Connector>,
}

impl TileTemplate {
    pub fn new(id: &str, size: GridVec, connectors: Vec<Connector>, tags: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            size,
            tags: tags.iter().map(|tag| tag.to_string()).collect(),
            connectors,
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    pub fn is_corridor(&self) -> bool {
        self.connectors.len() == 2
    }

    pub fn is_room(&self) -> bool {
        self.connectors.len() >= 3
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("tile template at index {index} has an empty id")]
    EmptyId { index: usize },
    #[error("tile template id '{id}' is defined more than once")]
    DuplicateId { id: String },
    #[error("tile template '{id}' has a non-positive size {size:?}")]
    InvalidSize { id: String, size: GridVec },
    #[error("tile template '{id}' has more than one {direction:?} connector")]
    DuplicateConnectorDirection { id: String, direction: Direction },
    #[error("tile template '{id}' has a connector with an empty type")]
    EmptyConnectorType { id: String },
    #[error("tile template '{id}' has a connector at {position:?} outside its footprint")]
    ConnectorOutsideFootprint { id: String, position: GridVec },
}

/// Read-only template collection. Safe to share between concurrent generation runs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TileCatalog {
    templates: Vec<TileTemplate>,
    index_by_id: BTreeMap<String, usize>,
}

impl TileCatalog {
    pub fn new(templates: Vec<TileTemplate>) -> Result<Self, CatalogError> {
        let mut index_by_id = BTreeMap::new();
        for (index, template) in templates.iter().enumerate() {
            validate_template(index, template)?;
            if index_by_id.insert(template.id.clone(), index).is_some() {
                return Err(CatalogError::DuplicateId { id: template.id.clone() });
            }
        }
        Ok(Self { templates, index_by_id })
    }

    pub fn get(&self, id: &str) -> Option<&TileTemplate> {
        self.index_by_id.get(id).map(|&index| &self.templates[index])
    }

    pub fn templates(&self) -> &[TileTemplate] {
        &self.templates
    }

    pub fn iter(&self) -> impl Iterator<Item = &TileTemplate> {
        self.templates.iter()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn with_tag<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a TileTemplate> + 'a {
        self.templates.iter().filter(move |template| template.has_tag(tag))
    }

    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend((self.templates.len() as u32).to_le_bytes());
        for template in &self.templates {
            extend_str(&mut bytes, &template.id);
            template.size.extend_bytes(&mut bytes);
            bytes.extend((template.connectors.len() as u32).to_le_bytes());
            for connector in &template.connectors {
                bytes.push(connector.direction.code());
                extend_str(&mut bytes, &connector.connector_type);
                connector.local_position.extend_bytes(&mut bytes);
            }
            bytes.extend((template.tags.len() as u32).to_le_bytes());
            for tag in &template.tags {
                extend_str(&mut bytes, tag);
            }
        }
        bytes
    }

    pub fn content_hash(&self) -> u64 {
        xxh3_64(&self.canonical_bytes())
    }

    /// Small built-in catalog: one entry hall, corridors, junction rooms, a dead-end nook,
    /// and a boss chamber. Every connector is a "Hall".
    pub fn starter() -> Self {
        let hall = |direction, x, z| Connector::new(direction, "Hall", GridVec::new(x, 0, z));
        let templates = vec![
            TileTemplate::new(
                "entry_hall",
                GridVec::new(4, 2, 4),
                vec![hall(Direction::North, 2, 0)],
                &[tags::START, tags::ROOM],
            ),
            TileTemplate::new(
                "corridor_straight",
                GridVec::new(2, 2, 4),
                vec![hall(Direction::North, 1, 0), hall(Direction::South, 1, 4)],
                &[tags::CORRIDOR],
            ),
            TileTemplate::new(
                "corridor_bend",
                GridVec::new(2, 2, 2),
                vec![hall(Direction::North, 1, 0), hall(Direction::East, 2, 1)],
                &[tags::CORRIDOR],
            ),
            TileTemplate::new(
                "junction_tee",
                GridVec::new(4, 2, 4),
                vec![
                    hall(Direction::South, 2, 4),
                    hall(Direction::East, 4, 2),
                    hall(Direction::West, 0, 2),
                ],
                &[tags::ROOM],
            ),
            TileTemplate::new(
                "crossroads",
                GridVec::new(4, 2, 4),
                vec![
                    hall(Direction::North, 2, 0),
                    hall(Direction::East, 4, 2),
                    hall(Direction::South, 2, 4),
                    hall(Direction::West, 0, 2),
                ],
                &[tags::ROOM],
            ),
            TileTemplate::new(
                "guard_room",
                GridVec::new(6, 2, 6),
                vec![
                    hall(Direction::North, 3, 0),
                    hall(Direction::East, 6, 3),
                    hall(Direction::South, 3, 6),
                ],
                &[tags::ROOM],
            ),
            TileTemplate::new(
                "treasure_nook",
                GridVec::new(2, 2, 2),
                vec![hall(Direction::South, 1, 2)],
                &["DeadEnd"],
            ),
            TileTemplate::new(
                "boss_chamber",
                GridVec::new(8, 3, 8),
                vec![hall(Direction::South, 4, 8)],
                &[tags::END, tags::ROOM],
            ),
        ];
        Self::new(templates).expect("starter catalog is valid")
    }
}

fn validate_template(index: usize, template: &TileTemplate) -> Result<(), CatalogError> {
    if template.id.is_empty() {
        return Err(CatalogError::EmptyId { index });
    }
    let size = template.size;
    if size.x <= 0 || size.y <= 0 || size.z <= 0 {
        return Err(CatalogError::InvalidSize { id: template.id.clone(), size });
    }

    let mut seen = BTreeSet::new();
    for connector in &template.connectors {
        if !seen.insert(connector.direction) {
            return Err(CatalogError::DuplicateConnectorDirection {
                id: template.id.clone(),
                direction: connector.direction,
            });
        }
        if connector.connector_type.is_empty() {
            return Err(CatalogError::EmptyConnectorType { id: template.id.clone() });
        }
        let position = connector.local_position;
        let inside = (0..=size.x).contains(&position.x)
            && (0..=size.y).contains(&position.y)
            && (0..=size.z).contains(&position.z);
        if !inside {
            return Err(CatalogError::ConnectorOutsideFootprint {
                id: template.id.clone(),
                position,
            });
        }
    }
    Ok(())
}

fn extend_str(bytes: &mut Vec<u8>, value: &str) {
    bytes.extend((value.len() as u32).to_le_bytes());
    bytes.extend(value.as_bytes());
}
