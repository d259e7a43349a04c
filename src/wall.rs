use crate::direction::Direction;
use serde::{Deserialize, Serialize};

const WALL_BITS: u8 = 0b11;

/// Observed state of a single wall.
///
/// The discriminants are the 2-bit codes stored in a packed cell byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum WallState {
    /// No wall, the edge can be travelled
    Absent = 0,
    /// A real wall
    Present = 1,
    /// Not yet seen
    Unknown = 2,
    /// Blocker placed by the controller, behaves like a wall
    Virtual = 3,
}

impl WallState {
    pub fn bits(self) -> u8 {
        self as u8
    }

    pub fn from_bits(bits: u8) -> WallState {
        match bits & WALL_BITS {
            0 => WallState::Absent,
            1 => WallState::Present,
            2 => WallState::Unknown,
            _ => WallState::Virtual,
        }
    }

    pub fn is_known(self) -> bool {
        self != WallState::Unknown
    }
}

/// How unknown walls are read when testing for an exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mask {
    /// Unknown walls are treated as open. Used while exploring.
    #[default]
    Open,
    /// Unknown walls are treated as present. Used to find a guaranteed route.
    Closed,
}

impl Mask {
    /// Whether a wall in `state` can be crossed under this mask
    pub fn is_exit(self, state: WallState) -> bool {
        match state {
            WallState::Absent => true,
            WallState::Unknown => self == Mask::Open,
            WallState::Present | WallState::Virtual => false,
        }
    }

    pub fn toggled(self) -> Mask {
        match self {
            Mask::Open => Mask::Closed,
            Mask::Closed => Mask::Open,
        }
    }
}

/// The four walls of one cell packed two bits per direction.
/// North occupies the low bits, then east, south and west.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellWalls(u8);

impl CellWalls {
    pub const ALL_UNKNOWN: CellWalls = CellWalls(0b1010_1010);

    pub fn from_byte(byte: u8) -> CellWalls {
        CellWalls(byte)
    }

    pub fn byte(self) -> u8 {
        self.0
    }

    pub fn get(self, direction: Direction) -> WallState {
        WallState::from_bits(self.0 >> (direction.index() * 2))
    }

    pub fn set(&mut self, direction: Direction, state: WallState) {
        let shift = direction.index() * 2;
        self.0 &= !(WALL_BITS << shift);
        self.0 |= state.bits() << shift;
    }

    /// True if any side has not been observed yet
    pub fn has_unknown(self) -> bool {
        Direction::ALL
            .iter()
            .any(|&dir| self.get(dir) == WallState::Unknown)
    }
}

impl Default for CellWalls {
    fn default() -> Self {
        CellWalls::ALL_UNKNOWN
    }
}
