//! Grid-space primitives shared by the catalog, the placement solver, and the graph model.
//!
//! Compass convention: North is -Z, East is +X, South is +Z, West is -X. Y is vertical and
//! never changes under rotation.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    /// Clockwise order; rotation steps walk this array.
    pub const ALL: [Direction; 4] =
        [Direction::North, Direction::East, Direction::South, Direction::West];

    pub fn index(self) -> usize {
        match self {
            Self::North => 0,
            Self::East => 1,
            Self::South => 2,
            Self::West => 3,
        }
    }

    /// Turns clockwise by `quarter_turns` multiples of 90 degrees. Negative values turn
    /// counter-clockwise.
    pub fn rotate(self, quarter_turns: i32) -> Self {
        let step = (self.index() as i32 + quarter_turns).rem_euclid(4);
        Self::ALL[step as usize]
    }

    pub fn opposite(self) -> Self {
        self.rotate(2)
    }

    pub(crate) fn code(self) -> u8 {
        self.index() as u8
    }
}

/// Integer grid vector used for positions, offsets, and footprint sizes.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(from = "[i32; 3]", into = "[i32; 3]")]
pub struct GridVec {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl GridVec {
    pub const ZERO: GridVec = GridVec { x: 0, y: 0, z: 0 };

    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Rotates on the horizontal plane, `(x, z) -> (-z, x)` per clockwise quarter turn.
    pub fn rotated(self, rotation: Rotation) -> Self {
        let mut x = self.x;
        let mut z = self.z;
        for _ in 0..rotation.quarter_turns() {
            (x, z) = (-z, x);
        }
        Self { x, y: self.y, z }
    }

    pub fn add(self, other: Self) -> Self {
        Self { x: self.x + other.x, y: self.y + other.y, z: self.z + other.z }
    }

    pub fn sub(self, other: Self) -> Self {
        Self { x: self.x - other.x, y: self.y - other.y, z: self.z - other.z }
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        Some(Self {
            x: self.x.checked_add(other.x)?,
            y: self.y.checked_add(other.y)?,
            z: self.z.checked_add(other.z)?,
        })
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        Some(Self {
            x: self.x.checked_sub(other.x)?,
            y: self.y.checked_sub(other.y)?,
            z: self.z.checked_sub(other.z)?,
        })
    }

    pub fn min(self, other: Self) -> Self {
        Self { x: self.x.min(other.x), y: self.y.min(other.y), z: self.z.min(other.z) }
    }

    pub fn max(self, other: Self) -> Self {
        Self { x: self.x.max(other.x), y: self.y.max(other.y), z: self.z.max(other.z) }
    }

    pub(crate) fn extend_bytes(self, bytes: &mut Vec<u8>) {
        bytes.extend(self.x.to_le_bytes());
        bytes.extend(self.y.to_le_bytes());
        bytes.extend(self.z.to_le_bytes());
    }
}

impl From<[i32; 3]> for GridVec {
    fn from([x, y, z]: [i32; 3]) -> Self {
        Self { x, y, z }
    }
}

impl From<GridVec> for [i32; 3] {
    fn from(value: GridVec) -> Self {
        [value.x, value.y, value.z]
    }
}

/// One of the four discrete clockwise quarter-turn rotations.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rotation(u8);

impl Rotation {
    pub const ALL: [Rotation; 4] = [Rotation(0), Rotation(1), Rotation(2), Rotation(3)];

    /// Wraps any quarter-turn count into `0..4`.
    pub fn from_quarter_turns(quarter_turns: i32) -> Self {
        Self(quarter_turns.rem_euclid(4) as u8)
    }

    pub fn quarter_turns(self) -> i32 {
        i32::from(self.0)
    }

    pub fn apply(self, direction: Direction) -> Direction {
        direction.rotate(self.quarter_turns())
    }
}

impl TryFrom<u8> for Rotation {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value < 4 {
            Ok(Self(value))
        } else {
            Err(format!("rotation {value} must be in 0..=3"))
        }
    }
}

impl From<Rotation> for u8 {
    fn from(value: Rotation) -> Self {
        value.0
    }
}

/// World-space axis-aligned box, `min` inclusive and `max` exclusive on every axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bounds {
    pub min: GridVec,
    pub max: GridVec,
}

impl Bounds {
    /// Footprint `[0, size]` rotated about the tile origin and moved to `position`.
    pub fn for_placement(size: GridVec, position: GridVec, rotation: Rotation) -> Self {
        let a = GridVec::ZERO.rotated(rotation);
        let b = size.rotated(rotation);
        Self { min: a.min(b).add(position), max: a.max(b).add(position) }
    }

    /// Like [`Bounds::for_placement`], but `None` when a corner leaves the `i32` grid.
    pub fn checked_for_placement(
        size: GridVec,
        position: GridVec,
        rotation: Rotation,
    ) -> Option<Self> {
        let a = GridVec::ZERO.rotated(rotation);
        let b = size.rotated(rotation);
        Some(Self { min: a.min(b).checked_add(position)?, max: a.max(b).checked_add(position)? })
    }

    /// Strict overlap on all three axes. Boxes sharing only a face, edge, or corner do not
    /// intersect.
    pub fn intersects(&self, other: &Self) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
            && self.min.z < other.max.z
            && other.min.z < self.max.z
    }

    pub fn size(&self) -> GridVec {
        self.max.sub(self.min)
    }
}
