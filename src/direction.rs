use serde::{Deserialize, Serialize};

/// Absolute compass direction in the maze.
///
/// Directions never depend on which way the mouse is facing. North is +y and
/// east is +x, so cell (0, 0) sits in the south-west corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Index 0..4 in clockwise order starting at north
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Direction {
        Direction::ALL[index % 4]
    }

    /// Rotated +90 degrees
    pub fn right(self) -> Direction {
        Direction::from_index(self.index() + 1)
    }

    /// Rotated -90 degrees
    pub fn left(self) -> Direction {
        Direction::from_index(self.index() + 3)
    }

    /// Rotated 180 degrees
    pub fn behind(self) -> Direction {
        Direction::from_index(self.index() + 2)
    }

    /// The direction of the shared wall as seen from the neighbouring cell
    pub fn opposite(self) -> Direction {
        self.behind()
    }

    /// Candidate order for a mouse facing this way: ahead, right, left, behind.
    pub fn search_order(self) -> [Direction; 4] {
        [self, self.right(), self.left(), self.behind()]
    }

    pub fn arrow(self) -> char {
        match self {
            Direction::North => '^',
            Direction::East => '>',
            Direction::South => 'v',
            Direction::West => '<',
        }
    }
}
