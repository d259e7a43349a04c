use crate::direction::Direction;
use crate::maze::{Maze, MazeError};
use crate::wall::CellWalls;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("failed to access save file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode or decode save file: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Maze(#[from] MazeError),
    #[error("save file holds {actual} wall records, expected {expected}")]
    WallCount { expected: usize, actual: usize },
    #[error("goal ({x}, {y}) is outside a {size}x{size} maze")]
    GoalOutOfRange { x: usize, y: usize, size: usize },
}

/// Snapshot of a maze: size, goal and one packed wall byte per cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveState {
    pub size: usize,
    pub goal_x: usize,
    pub goal_y: usize,
    /// Packed wall bytes in cell id order
    pub walls: Vec<u8>,
}

impl SaveState {
    pub fn from_maze(maze: &Maze) -> Self {
        let (goal_x, goal_y) = maze.cell_xy(maze.goal());
        SaveState {
            size: maze.size(),
            goal_x,
            goal_y,
            walls: maze.wall_bytes(),
        }
    }

    /// Save to file
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), SaveError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load from file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, SaveError> {
        let json = fs::read_to_string(path)?;
        let save_state: SaveState = serde_json::from_str(&json)?;
        Ok(save_state)
    }

    /// Rebuild the maze.
    ///
    /// Walls go back in through `set_wall`, so a hand-edited file cannot break
    /// wall pairing or open the border. Where the two copies of a wall
    /// disagree, the one written later in cell order wins.
    pub fn restore_maze(&self) -> Result<Maze, SaveError> {
        let mut maze = Maze::new(self.size)?;

        let expected = maze.cell_count();
        if self.walls.len() != expected {
            return Err(SaveError::WallCount {
                expected,
                actual: self.walls.len(),
            });
        }
        if self.goal_x >= self.size || self.goal_y >= self.size {
            return Err(SaveError::GoalOutOfRange {
                x: self.goal_x,
                y: self.goal_y,
                size: self.size,
            });
        }

        for (cell, &byte) in self.walls.iter().enumerate() {
            let walls = CellWalls::from_byte(byte);
            for direction in Direction::ALL {
                maze.set_wall(cell, direction, walls.get(direction));
            }
        }
        maze.set_goal(maze.cell_id(self.goal_x, self.goal_y));

        Ok(maze)
    }
}
