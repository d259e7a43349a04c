use crate::maze::{Maze, MazeError, DEFAULT_SIZE};
use crate::wall::Mask;
use log::{info, warn};
use serde::Deserialize;
use std::fs;

/// Gap around the maze in the viewer, in pixels
pub const MARGIN: f32 = 20.0;
pub const PANEL_WIDTH: f32 = 330.0;
/// Tall enough for the key help in the side panel
const MIN_WINDOW_HEIGHT: f32 = 420.0;

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub maze: MazeConfig,
    #[serde(default)]
    pub explorer: ExplorerConfig,
    #[serde(default)]
    pub viewer: ViewerConfig,
    #[serde(default)]
    pub default_map_file: DefaultMapFileConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize)]
pub struct MazeConfig {
    #[serde(default = "default_size")]
    pub size: usize,
    /// Goal column; the centre is used when either coordinate is missing
    #[serde(default)]
    pub goal_x: Option<usize>,
    #[serde(default)]
    pub goal_y: Option<usize>,
    /// Mask used by the viewer's flood
    #[serde(default)]
    pub mask: Mask,
}

#[derive(Debug, Deserialize)]
pub struct ExplorerConfig {
    #[serde(default = "default_max_runs")]
    pub max_runs: usize,
    #[serde(default = "default_max_steps_per_run")]
    pub max_steps_per_run: usize,
}

#[derive(Debug, Deserialize)]
pub struct ViewerConfig {
    #[serde(default = "default_window_title")]
    pub window_title: String,
    #[serde(default = "default_cell_size")]
    pub cell_size: f32,
    #[serde(default = "default_bg_r")]
    pub background_r: u8,
    #[serde(default = "default_bg_g")]
    pub background_g: u8,
    #[serde(default = "default_bg_b")]
    pub background_b: u8,
    #[serde(default = "default_show_costs")]
    pub show_costs: bool,
    #[serde(default)]
    pub show_arrows: bool,
}

#[derive(Debug, Deserialize)]
pub struct DefaultMapFileConfig {
    #[serde(default = "default_map_file_path")]
    pub path: String,
}

#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_enable_run_log")]
    pub enable_run_log: bool,
    #[serde(default = "default_run_log_path")]
    pub run_log_path: String,
    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: String,
}

// Default values
fn default_size() -> usize { DEFAULT_SIZE }
fn default_max_runs() -> usize { 20 }
fn default_max_steps_per_run() -> usize { 4096 }
fn default_window_title() -> String { "Floodmaze - Flood Fill Viewer".to_string() }
fn default_cell_size() -> f32 { 40.0 }
fn default_bg_r() -> u8 { 30 }
fn default_bg_g() -> u8 { 30 }
fn default_bg_b() -> u8 { 30 }
fn default_show_costs() -> bool { true }
fn default_map_file_path() -> String { "test_data/reference_16.txt".to_string() }
fn default_enable_run_log() -> bool { true }
fn default_run_log_path() -> String { "run_log.json".to_string() }
fn default_snapshot_path() -> String { "maze_state.json".to_string() }

impl Default for MazeConfig {
    fn default() -> Self {
        Self {
            size: default_size(),
            goal_x: None,
            goal_y: None,
            mask: Mask::default(),
        }
    }
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            max_runs: default_max_runs(),
            max_steps_per_run: default_max_steps_per_run(),
        }
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            window_title: default_window_title(),
            cell_size: default_cell_size(),
            background_r: default_bg_r(),
            background_g: default_bg_g(),
            background_b: default_bg_b(),
            show_costs: default_show_costs(),
            show_arrows: false,
        }
    }
}

impl Default for DefaultMapFileConfig {
    fn default() -> Self {
        Self {
            path: default_map_file_path(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enable_run_log: default_enable_run_log(),
            run_log_path: default_run_log_path(),
            snapshot_path: default_snapshot_path(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            maze: MazeConfig::default(),
            explorer: ExplorerConfig::default(),
            viewer: ViewerConfig::default(),
            default_map_file: DefaultMapFileConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file, or use defaults if file doesn't exist
    pub fn load() -> Self {
        match fs::read_to_string("config.toml") {
            Ok(contents) => match Config::from_toml_str(&contents) {
                Ok(config) => {
                    info!("Loaded configuration from config.toml");
                    config
                }
                Err(e) => {
                    warn!("Failed to parse config.toml: {}", e);
                    warn!("Using default configuration");
                    Config::default()
                }
            },
            Err(_) => {
                info!("No config.toml found, using default configuration");
                Config::default()
            }
        }
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Build an empty maze with the configured size, goal and mask.
    /// A goal outside the maze is ignored with a warning.
    pub fn build_maze(&self) -> Result<Maze, MazeError> {
        let mut maze = Maze::new(self.maze.size)?;
        self.apply_to(&mut maze);
        Ok(maze)
    }

    /// Apply the configured mask and goal to a maze built elsewhere, such as
    /// a loaded map. A goal that does not fit keeps the maze's own goal.
    pub fn apply_to(&self, maze: &mut Maze) {
        maze.set_mask(self.maze.mask);
        if let (Some(x), Some(y)) = (self.maze.goal_x, self.maze.goal_y) {
            if x < maze.size() && y < maze.size() {
                maze.set_goal(maze.cell_id(x, y));
            } else {
                warn!("configured goal ({}, {}) is outside the maze, keeping the current one", x, y);
            }
        }
    }

    /// Window size in pixels for a maze of `size` cells per side
    pub fn window_size(&self, size: usize) -> (f32, f32) {
        let side = size as f32 * self.viewer.cell_size + 2.0 * MARGIN;
        (side + PANEL_WIDTH, side.max(MIN_WINDOW_HEIGHT))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.maze.size, 16);
        assert_eq!(config.maze.mask, Mask::Open);
        assert_eq!(config.explorer.max_runs, 20);
        assert!(config.viewer.show_costs);
        assert!(!config.viewer.show_arrows);
        assert_eq!(config.logging.run_log_path, "run_log.json");

        let maze = config.build_maze().unwrap();
        assert_eq!(maze.cell_xy(maze.goal()), (7, 7));
    }

    #[test]
    fn test_partial_override() {
        let config = Config::from_toml_str(
            r#"
            [maze]
            size = 8
            goal_x = 2
            goal_y = 5
            mask = "closed"

            [viewer]
            show_arrows = true
            "#,
        )
        .unwrap();
        assert_eq!(config.maze.size, 8);
        assert_eq!(config.explorer.max_steps_per_run, 4096);
        assert!(config.viewer.show_arrows);
        assert_eq!(config.viewer.cell_size, 40.0);

        let maze = config.build_maze().unwrap();
        assert_eq!(maze.cell_xy(maze.goal()), (2, 5));
        assert_eq!(maze.mask(), Mask::Closed);
    }

    #[test]
    fn test_bad_values() {
        assert!(Config::from_toml_str("[maze]\nsize = \"big\"\n").is_err());

        let config = Config::from_toml_str("[maze]\nsize = 1\n").unwrap();
        assert_eq!(config.build_maze(), Err(MazeError::TooSmall(1)));

        let config = Config::from_toml_str("[maze]\nsize = 4\ngoal_x = 9\ngoal_y = 0\n").unwrap();
        let maze = config.build_maze().unwrap();
        assert_eq!(maze.goal(), Maze::default_goal(4));
    }

    #[test]
    fn test_apply_to_loaded_map() {
        let config = Config::from_toml_str("[maze]\ngoal_x = 3\ngoal_y = 2\nmask = \"closed\"\n").unwrap();
        // the map is smaller than the configured size
        let mut maze = Maze::new(4).unwrap();
        config.apply_to(&mut maze);
        assert_eq!(maze.cell_xy(maze.goal()), (3, 2));
        assert_eq!(maze.mask(), Mask::Closed);

        let config = Config::from_toml_str("[maze]\ngoal_x = 5\ngoal_y = 5\n").unwrap();
        let mut maze = Maze::new(4).unwrap();
        maze.set_mask(Mask::Closed);
        config.apply_to(&mut maze);
        assert_eq!(maze.goal(), Maze::default_goal(4));
        assert_eq!(maze.mask(), Mask::Open);
    }

    #[test]
    fn test_window_size_follows_maze() {
        let config = Config::default();
        let (w16, h16) = config.window_size(16);
        let (w4, h4) = config.window_size(4);
        assert_eq!(w16 - w4, 12.0 * 40.0);
        assert_eq!(h16, 16.0 * 40.0 + 2.0 * MARGIN);
        // small mazes keep room for the side panel text
        assert_eq!(h4, MIN_WINDOW_HEIGHT);
    }
}
