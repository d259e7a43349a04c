pub mod config;
pub mod direction;
pub mod explorer;
pub mod flood;
pub mod map_text;
pub mod maze;
pub mod run_log;
pub mod save_state;
pub mod wall;

pub use direction::Direction;
pub use explorer::Explorer;
pub use flood::{CostField, FloodEngine};
pub use maze::{Cell, Maze, MazeError};
pub use wall::{CellWalls, Mask, WallState};
