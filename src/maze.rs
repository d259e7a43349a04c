use crate::direction::Direction;
use crate::wall::{CellWalls, Mask, WallState};
use log::{debug, warn};
use thiserror::Error;

/// Cell id in `0..size * size`. Cell (x, y) has id `y + x * size`.
pub type Cell = usize;

pub const DEFAULT_SIZE: usize = 16;
/// Largest maze whose sentinel cost still fits in a u16
pub const MAX_SIZE: usize = 255;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MazeError {
    #[error("maze size {0} is too small, a maze needs at least 2x2 cells")]
    TooSmall(usize),
    #[error("maze size {0} is too large, the limit is 255x255 cells")]
    TooLarge(usize),
}

/// Wall store for a square maze.
///
/// Every interior wall is stored twice, once in each cell that shares it, and
/// both copies are always written together. Outward walls on the border are
/// present from construction and cannot be changed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Maze {
    size: usize,
    walls: Vec<CellWalls>,
    goal: Cell,
    mask: Mask,
    /// Incremented whenever a wall write changes stored state
    revision: u64,
}

impl Maze {
    /// Create a maze with all walls unknown apart from the border and the
    /// start cell, which is open to the north and closed to the east.
    pub fn new(size: usize) -> Result<Self, MazeError> {
        if size < 2 {
            return Err(MazeError::TooSmall(size));
        }
        if size > MAX_SIZE {
            return Err(MazeError::TooLarge(size));
        }

        let mut maze = Maze {
            size,
            walls: vec![CellWalls::ALL_UNKNOWN; size * size],
            goal: Maze::default_goal(size),
            mask: Mask::Open,
            revision: 0,
        };
        maze.init_walls();
        Ok(maze)
    }

    /// Forget everything observed and return to the freshly built state.
    /// The goal and mask are kept.
    pub fn reset(&mut self) {
        self.init_walls();
        self.revision += 1;
    }

    fn init_walls(&mut self) {
        let last = self.size - 1;
        self.walls.fill(CellWalls::ALL_UNKNOWN);
        for i in 0..self.size {
            let bottom = self.cell_id(i, 0);
            let top = self.cell_id(i, last);
            let left = self.cell_id(0, i);
            let right = self.cell_id(last, i);
            self.walls[bottom].set(Direction::South, WallState::Present);
            self.walls[top].set(Direction::North, WallState::Present);
            self.walls[left].set(Direction::West, WallState::Present);
            self.walls[right].set(Direction::East, WallState::Present);
        }

        let start = self.start();
        self.write_pair(start, Direction::North, WallState::Absent);
        self.write_pair(start, Direction::East, WallState::Present);
    }

    /// Centre cell used as the goal when none is configured
    pub fn default_goal(size: usize) -> Cell {
        let centre = size.saturating_sub(1) / 2;
        centre + centre * size
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn cell_count(&self) -> usize {
        self.size * self.size
    }

    /// Cost marking a cell that a flood could not reach
    pub fn max_cost(&self) -> u16 {
        self.cell_count() as u16
    }

    pub fn start(&self) -> Cell {
        0
    }

    pub fn goal(&self) -> Cell {
        self.goal
    }

    /// Move the goal. Out of range cells are ignored.
    pub fn set_goal(&mut self, cell: Cell) -> bool {
        if !self.contains(cell) {
            debug!("ignoring goal outside the maze: cell {}", cell);
            return false;
        }
        self.goal = cell;
        true
    }

    pub fn mask(&self) -> Mask {
        self.mask
    }

    pub fn set_mask(&mut self, mask: Mask) {
        self.mask = mask;
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn cell_id(&self, x: usize, y: usize) -> Cell {
        y + x * self.size
    }

    pub fn cell_xy(&self, cell: Cell) -> (usize, usize) {
        (cell / self.size, cell % self.size)
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell < self.cell_count()
    }

    /// Adjacent cell in `direction`, or None when that would leave the maze
    pub fn neighbour(&self, cell: Cell, direction: Direction) -> Option<Cell> {
        if !self.contains(cell) {
            return None;
        }
        let (x, y) = self.cell_xy(cell);
        let last = self.size - 1;
        match direction {
            Direction::North if y < last => Some(cell + 1),
            Direction::East if x < last => Some(cell + self.size),
            Direction::South if y > 0 => Some(cell - 1),
            Direction::West if x > 0 => Some(cell - self.size),
            _ => None,
        }
    }

    /// Stored state of a wall. Cells outside the maze read as walled in.
    pub fn wall(&self, cell: Cell, direction: Direction) -> WallState {
        match self.walls.get(cell) {
            Some(walls) => walls.get(direction),
            None => WallState::Present,
        }
    }

    pub fn walls(&self, cell: Cell) -> Option<CellWalls> {
        self.walls.get(cell).copied()
    }

    /// Unconditionally set a wall and its partner in the neighbouring cell.
    ///
    /// Meant for initialisation and authoritative corrections such as loading
    /// a known map. Writes to cells outside the maze and to outward border
    /// walls are ignored. Returns true if stored state changed.
    pub fn set_wall(&mut self, cell: Cell, direction: Direction, state: WallState) -> bool {
        if !self.contains(cell) {
            debug!("ignoring wall write outside the maze: cell {}", cell);
            return false;
        }
        if self.neighbour(cell, direction).is_none() {
            if state != WallState::Present {
                warn!(
                    "border wall {:?} of cell {:?} stays present, ignoring {:?}",
                    direction,
                    self.cell_xy(cell),
                    state
                );
            }
            return false;
        }
        if self.wall(cell, direction) == state {
            return false;
        }

        self.write_pair(cell, direction, state);
        self.revision += 1;
        true
    }

    /// Record an observed wall while exploring.
    ///
    /// Only unknown walls are written. Once a wall has been seen its state is
    /// kept for the rest of the run, so later conflicting reports are dropped.
    pub fn update_wall(&mut self, cell: Cell, direction: Direction, state: WallState) -> bool {
        if self.wall(cell, direction).is_known() {
            return false;
        }
        self.set_wall(cell, direction, state)
    }

    fn write_pair(&mut self, cell: Cell, direction: Direction, state: WallState) {
        self.walls[cell].set(direction, state);
        if let Some(next) = self.neighbour(cell, direction) {
            self.walls[next].set(direction.opposite(), state);
        }
    }

    /// True if the wall can be crossed when unknown walls are read through `mask`
    pub fn has_exit(&self, cell: Cell, direction: Direction, mask: Mask) -> bool {
        self.contains(cell) && mask.is_exit(self.wall(cell, direction))
    }

    pub fn has_wall(&self, cell: Cell, direction: Direction, mask: Mask) -> bool {
        !self.has_exit(cell, direction, mask)
    }

    /// True once all four walls of the cell have been observed
    pub fn is_visited(&self, cell: Cell) -> bool {
        self.walls(cell).map_or(false, |walls| !walls.has_unknown())
    }

    pub fn has_unknown_walls(&self, cell: Cell) -> bool {
        self.walls(cell).map_or(false, |walls| walls.has_unknown())
    }

    /// Number of cells with every wall observed
    pub fn visited_count(&self) -> usize {
        self.walls.iter().filter(|walls| !walls.has_unknown()).count()
    }

    /// Packed wall bytes in cell id order
    pub fn wall_bytes(&self) -> Vec<u8> {
        self.walls.iter().map(|walls| walls.byte()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_degenerate_sizes() {
        assert_eq!(Maze::new(0), Err(MazeError::TooSmall(0)));
        assert_eq!(Maze::new(1), Err(MazeError::TooSmall(1)));
        assert_eq!(Maze::new(256), Err(MazeError::TooLarge(256)));
        assert!(Maze::new(2).is_ok());
        assert!(Maze::new(MAX_SIZE).is_ok());
    }

    #[test]
    fn test_cell_id() {
        let maze = Maze::new(16).unwrap();
        assert_eq!(maze.cell_id(0, 0), 0);
        assert_eq!(maze.cell_id(0, 1), 1);
        assert_eq!(maze.cell_id(1, 0), 16);
        assert_eq!(maze.cell_id(1, 1), 17);
        assert_eq!(maze.cell_xy(18), (1, 2));
    }

    #[test]
    fn test_neighbour() {
        let maze = Maze::new(16).unwrap();
        let cell = maze.cell_id(1, 1);
        assert_eq!(maze.neighbour(cell, Direction::North), Some(cell + 1));
        assert_eq!(maze.neighbour(cell, Direction::East), Some(cell + 16));
        assert_eq!(maze.neighbour(cell, Direction::South), Some(cell - 1));
        assert_eq!(maze.neighbour(cell, Direction::West), Some(cell - 16));

        assert_eq!(maze.neighbour(0, Direction::South), None);
        assert_eq!(maze.neighbour(0, Direction::West), None);
        let corner = maze.cell_id(15, 15);
        assert_eq!(maze.neighbour(corner, Direction::North), None);
        assert_eq!(maze.neighbour(corner, Direction::East), None);
    }

    #[test]
    fn test_initial_walls() {
        let maze = Maze::new(16).unwrap();
        let start = maze.start();
        assert!(maze.has_exit(start, Direction::North, Mask::Closed));
        assert!(!maze.has_exit(start, Direction::East, Mask::Open));
        assert!(!maze.has_exit(start, Direction::South, Mask::Open));
        assert!(!maze.has_exit(start, Direction::West, Mask::Open));
        assert_eq!(maze.wall(maze.cell_id(1, 0), Direction::West), WallState::Present);

        // interior walls start unknown
        let middle = maze.cell_id(4, 4);
        for dir in Direction::ALL {
            assert_eq!(maze.wall(middle, dir), WallState::Unknown);
        }

        for i in 0..16 {
            assert_eq!(maze.wall(maze.cell_id(i, 0), Direction::South), WallState::Present);
            assert_eq!(maze.wall(maze.cell_id(i, 15), Direction::North), WallState::Present);
            assert_eq!(maze.wall(maze.cell_id(0, i), Direction::West), WallState::Present);
            assert_eq!(maze.wall(maze.cell_id(15, i), Direction::East), WallState::Present);
        }
        assert_eq!(maze.goal(), maze.cell_id(7, 7));
        assert_eq!(maze.revision(), 0);
    }

    #[test]
    fn test_set_wall_writes_both_sides() {
        let mut maze = Maze::new(16).unwrap();
        let cell = maze.cell_id(0, 0);
        let north = maze.cell_id(0, 1);
        assert!(maze.has_exit(north, Direction::South, Mask::Open));

        assert!(maze.set_wall(cell, Direction::North, WallState::Present));
        assert!(!maze.has_exit(cell, Direction::North, Mask::Open));
        assert!(!maze.has_exit(north, Direction::South, Mask::Open));
        assert_eq!(maze.revision(), 1);

        // same state again is not a change
        assert!(!maze.set_wall(north, Direction::South, WallState::Present));
        assert_eq!(maze.revision(), 1);
    }

    #[test]
    fn test_border_walls_cannot_be_opened() {
        let mut maze = Maze::new(4).unwrap();
        let corner = maze.cell_id(3, 3);
        assert!(!maze.set_wall(corner, Direction::North, WallState::Absent));
        assert!(!maze.update_wall(corner, Direction::East, WallState::Absent));
        assert_eq!(maze.wall(corner, Direction::North), WallState::Present);
        assert_eq!(maze.wall(corner, Direction::East), WallState::Present);
    }

    #[test]
    fn test_out_of_range_writes_are_ignored() {
        let mut maze = Maze::new(4).unwrap();
        let before = maze.clone();
        assert!(!maze.set_wall(16, Direction::North, WallState::Present));
        assert!(!maze.update_wall(99, Direction::South, WallState::Absent));
        assert_eq!(maze, before);
        assert!(!maze.has_exit(16, Direction::North, Mask::Open));
        assert!(!maze.set_goal(16));
    }

    #[test]
    fn test_update_wall_only_once() {
        let mut maze = Maze::new(16).unwrap();
        let cell = maze.cell_id(8, 8);
        assert!(maze.has_exit(cell, Direction::South, Mask::Open));
        assert!(maze.update_wall(cell, Direction::South, WallState::Present));
        assert!(!maze.has_exit(cell, Direction::South, Mask::Open));
        assert!(!maze.update_wall(cell, Direction::South, WallState::Absent));
        assert!(!maze.has_exit(cell, Direction::South, Mask::Open));

        // the partner side is known too, so it cannot be changed from there either
        let below = maze.cell_id(8, 7);
        assert!(!maze.update_wall(below, Direction::North, WallState::Absent));
        assert_eq!(maze.wall(below, Direction::North), WallState::Present);
    }

    #[test]
    fn test_mask_views() {
        let mut maze = Maze::new(16).unwrap();
        let cell = maze.cell_id(4, 4);
        assert!(maze.has_exit(cell, Direction::North, Mask::Open));
        assert!(!maze.has_exit(cell, Direction::North, Mask::Closed));

        maze.set_wall(cell, Direction::North, WallState::Present);
        assert!(!maze.has_exit(cell, Direction::North, Mask::Open));
        assert!(!maze.has_exit(cell, Direction::North, Mask::Closed));

        maze.set_wall(cell, Direction::North, WallState::Absent);
        assert!(maze.has_exit(cell, Direction::North, Mask::Open));
        assert!(maze.has_exit(cell, Direction::North, Mask::Closed));

        maze.set_wall(cell, Direction::North, WallState::Virtual);
        assert!(maze.has_wall(cell, Direction::North, Mask::Open));
        assert!(maze.has_wall(cell, Direction::North, Mask::Closed));
    }

    #[test]
    fn test_is_visited() {
        let mut maze = Maze::new(16).unwrap();
        assert!(maze.is_visited(0));
        assert!(!maze.is_visited(1));
        assert!(maze.has_unknown_walls(1));

        let cell = maze.cell_id(5, 5);
        for dir in Direction::ALL {
            maze.update_wall(cell, dir, WallState::Absent);
        }
        assert!(maze.is_visited(cell));
        assert_eq!(maze.visited_count(), 2);
    }

    #[test]
    fn test_reset_keeps_goal() {
        let mut maze = Maze::new(8).unwrap();
        maze.set_goal(maze.cell_id(5, 2));
        maze.set_wall(maze.cell_id(2, 2), Direction::East, WallState::Present);
        maze.reset();
        assert_eq!(maze.goal(), maze.cell_id(5, 2));
        assert_eq!(maze.wall(maze.cell_id(2, 2), Direction::East), WallState::Unknown);
        assert_eq!(maze.wall_bytes(), Maze::new(8).unwrap().wall_bytes());
    }
}
