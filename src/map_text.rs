//! Text form of a maze.
//!
//! A maze of size N is written as `2N + 1` lines, top row first:
//!
//! ```text
//! +---+---+
//! |       |
//! +   +---+
//! |   |   |
//! +---+---+
//! ```
//!
//! Even lines hold posts and the north walls of a row (the last one is the
//! south border). Odd lines hold the west wall of each cell followed by a
//! three character cell body, then the east wall of the last cell.
//! Unknown walls are ` . ` / `:` and virtual walls `###` / `#`.

use crate::direction::Direction;
use crate::flood::FloodEngine;
use crate::maze::{Maze, MazeError};
use crate::wall::WallState;
use std::fs;
use std::path::Path;
use thiserror::Error;

const POST: char = '+';
const H_WALL: &str = "---";
const H_EXIT: &str = "   ";
const H_UNKNOWN: &str = " . ";
const H_VIRTUAL: &str = "###";
const V_WALL: char = '|';
const V_EXIT: char = ' ';
const V_UNKNOWN: char = ':';
const V_VIRTUAL: char = '#';

#[derive(Debug, Error)]
pub enum MapError {
    #[error("map text is empty")]
    Empty,
    #[error("map has {0} lines, expected 2 * size + 1")]
    LineCount(usize),
    #[error("unexpected wall glyph {glyph:?} at line {line}, column {column}")]
    BadGlyph { glyph: char, line: usize, column: usize },
    #[error(transparent)]
    Maze(#[from] MazeError),
    #[error("failed to read map file: {0}")]
    Io(#[from] std::io::Error),
}

/// What to draw inside each cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Start and goal markers only
    Plain,
    /// Flood cost of every reached cell
    Costs,
    /// Arrow toward the cheapest neighbour
    Directions,
}

fn horizontal_state(glyph: char) -> Option<WallState> {
    match glyph {
        '-' => Some(WallState::Present),
        ' ' => Some(WallState::Absent),
        '.' => Some(WallState::Unknown),
        '#' => Some(WallState::Virtual),
        _ => None,
    }
}

fn vertical_state(glyph: char) -> Option<WallState> {
    match glyph {
        '|' => Some(WallState::Present),
        ' ' => Some(WallState::Absent),
        ':' => Some(WallState::Unknown),
        '#' => Some(WallState::Virtual),
        _ => None,
    }
}

/// Read the glyph at `column`, treating a short (trimmed) line as spaces
fn wall_at(
    line: &[char],
    line_no: usize,
    column: usize,
    read: fn(char) -> Option<WallState>,
) -> Result<WallState, MapError> {
    let glyph = line.get(column).copied().unwrap_or(' ');
    read(glyph).ok_or(MapError::BadGlyph {
        glyph,
        line: line_no + 1,
        column: column + 1,
    })
}

/// Build a maze from its text form. Every wall is written with `set_wall`,
/// so the map is taken as authoritative.
pub fn parse_map(text: &str) -> Result<Maze, MapError> {
    let lines: Vec<Vec<char>> = text
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .map(|line| line.chars().collect())
        .collect();

    if lines.is_empty() {
        return Err(MapError::Empty);
    }
    if lines.len() % 2 == 0 {
        return Err(MapError::LineCount(lines.len()));
    }

    let size = (lines.len() - 1) / 2;
    let mut maze = Maze::new(size)?;

    for (line_no, line) in lines.iter().enumerate() {
        let row = line_no / 2;
        if line_no % 2 == 0 {
            // north walls of row y, or the south border after the last row
            for x in 0..size {
                let state = wall_at(line, line_no, x * 4 + 2, horizontal_state)?;
                if row < size {
                    let y = size - 1 - row;
                    maze.set_wall(maze.cell_id(x, y), Direction::North, state);
                } else {
                    maze.set_wall(maze.cell_id(x, 0), Direction::South, state);
                }
            }
        } else {
            let y = size - 1 - row;
            for x in 0..size {
                let state = wall_at(line, line_no, x * 4, vertical_state)?;
                maze.set_wall(maze.cell_id(x, y), Direction::West, state);
            }
            let state = wall_at(line, line_no, size * 4, vertical_state)?;
            maze.set_wall(maze.cell_id(size - 1, y), Direction::East, state);
        }
    }

    Ok(maze)
}

pub fn load_map_file(path: impl AsRef<Path>) -> Result<Maze, MapError> {
    let text = fs::read_to_string(path)?;
    parse_map(&text)
}

fn h_wall(state: WallState) -> &'static str {
    match state {
        WallState::Absent => H_EXIT,
        WallState::Present => H_WALL,
        WallState::Unknown => H_UNKNOWN,
        WallState::Virtual => H_VIRTUAL,
    }
}

fn v_wall(state: WallState) -> char {
    match state {
        WallState::Absent => V_EXIT,
        WallState::Present => V_WALL,
        WallState::Unknown => V_UNKNOWN,
        WallState::Virtual => V_VIRTUAL,
    }
}

fn cell_body(maze: &Maze, view: View, engine: Option<&FloodEngine>, x: usize, y: usize) -> String {
    let cell = maze.cell_id(x, y);
    match (view, engine) {
        (View::Costs, Some(engine)) => {
            let field = engine.field();
            if field.is_reached(cell) {
                format!("{:>3}", field.cost(cell))
            } else {
                "   ".to_string()
            }
        }
        (View::Directions, Some(engine)) => {
            if cell == engine.field().target() {
                return " * ".to_string();
            }
            match engine.direction_to_smallest(maze, cell, Direction::North) {
                Some(direction) => format!(" {} ", direction.arrow()),
                None => "   ".to_string(),
            }
        }
        _ => {
            if cell == maze.start() {
                " S ".to_string()
            } else if cell == maze.goal() {
                " G ".to_string()
            } else {
                "   ".to_string()
            }
        }
    }
}

/// Render the maze as text.
///
/// Walls are drawn from their stored state, independent of any mask, so the
/// output parses back to the same walls. Cost and direction views read the
/// engine's latest flood and fall back to the plain view without one.
pub fn render(maze: &Maze, view: View, engine: Option<&FloodEngine>) -> String {
    let size = maze.size();
    let mut result = String::new();

    for y in (0..size).rev() {
        result.push(POST);
        for x in 0..size {
            result.push_str(h_wall(maze.wall(maze.cell_id(x, y), Direction::North)));
            result.push(POST);
        }
        result.push('\n');

        for x in 0..size {
            result.push(v_wall(maze.wall(maze.cell_id(x, y), Direction::West)));
            result.push_str(&cell_body(maze, view, engine, x, y));
        }
        result.push(v_wall(maze.wall(maze.cell_id(size - 1, y), Direction::East)));
        result.push('\n');
    }

    result.push(POST);
    for x in 0..size {
        result.push_str(h_wall(maze.wall(maze.cell_id(x, 0), Direction::South)));
        result.push(POST);
    }
    result.push('\n');

    result
}
