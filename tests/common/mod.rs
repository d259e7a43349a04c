#![allow(dead_code)]

use floodmaze::map_text::load_map_file;
use floodmaze::{Direction, Maze, WallState};
use std::fs;
use std::path::PathBuf;

/// Path of a file under test_data
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test_data").join(name)
}

pub fn fixture_text(name: &str) -> String {
    fs::read_to_string(fixture_path(name))
        .unwrap_or_else(|e| panic!("failed to read fixture {}: {}", name, e))
}

/// Load a text map fixture
pub fn load_fixture(name: &str) -> Maze {
    load_map_file(fixture_path(name)).unwrap_or_else(|e| panic!("failed to load fixture {}: {}", name, e))
}

/// Blank out the start and goal markers of a plain render
pub fn strip_markers(text: &str) -> String {
    text.replace(" S ", "   ").replace(" G ", "   ")
}

/// Every shared wall agrees on both sides and the border is closed
pub fn assert_walls_consistent(maze: &Maze) {
    for cell in 0..maze.cell_count() {
        for direction in Direction::ALL {
            let state = maze.wall(cell, direction);
            match maze.neighbour(cell, direction) {
                Some(next) => assert_eq!(
                    state,
                    maze.wall(next, direction.opposite()),
                    "wall {:?} of {:?} disagrees with its partner",
                    direction,
                    maze.cell_xy(cell)
                ),
                None => assert_eq!(
                    state,
                    WallState::Present,
                    "border wall {:?} of {:?} is open",
                    direction,
                    maze.cell_xy(cell)
                ),
            }
        }
    }
}

/// Costs of a field as rows, top row (largest y) first
pub fn cost_rows(maze: &Maze, costs: &[u16]) -> Vec<Vec<u16>> {
    let size = maze.size();
    (0..size)
        .rev()
        .map(|y| (0..size).map(|x| costs[maze.cell_id(x, y)]).collect())
        .collect()
}
