use arboard::Clipboard;
use floodmaze::config::{Config, MARGIN};
use floodmaze::direction::Direction;
use floodmaze::explorer::{Explorer, StepOutcome};
use floodmaze::flood::FloodEngine;
use floodmaze::map_text::{self, View};
use floodmaze::maze::{Maze, MazeError};
use floodmaze::run_log::{Event, RunLog};
use floodmaze::save_state::SaveState;
use floodmaze::wall::WallState;
use log::{error, info, warn};
use macroquad::prelude::*;
use std::path::Path;

/// Clicks closer than this fraction of a cell to an edge pick that wall
const WALL_PICK: f32 = 0.3;

fn next_state(state: WallState) -> WallState {
    match state {
        WallState::Unknown => WallState::Absent,
        WallState::Absent => WallState::Present,
        WallState::Present => WallState::Virtual,
        WallState::Virtual => WallState::Unknown,
    }
}

/// Visualization state
struct VisState {
    config: Config,
    maze: Maze,
    engine: FloodEngine,
    /// Replaces the edited maze on screen while a search is under way
    explorer: Option<Explorer>,
    run_log: RunLog,
    show_costs: bool,
    show_arrows: bool,
    status: String,
}

impl VisState {
    fn new(config: Config, maze: Maze) -> Self {
        let mut run_log = RunLog::new();
        run_log.log(Event::MapLoaded { size: maze.size() });
        let mut state = VisState {
            engine: FloodEngine::for_maze(&maze),
            show_costs: config.viewer.show_costs,
            show_arrows: config.viewer.show_arrows,
            config,
            maze,
            explorer: None,
            run_log,
            status: String::new(),
        };
        state.fit_window();
        state.update_flood();
        state
    }

    fn fit_window(&self) {
        let (width, height) = self.config.window_size(self.maze.size());
        request_new_screen_size(width, height);
    }

    fn cell_size(&self) -> f32 {
        self.config.viewer.cell_size
    }

    /// Maze and engine currently on screen
    fn displayed(&self) -> (&Maze, &FloodEngine) {
        match &self.explorer {
            Some(explorer) => (explorer.map(), explorer.engine()),
            None => (&self.maze, &self.engine),
        }
    }

    fn update_flood(&mut self) {
        self.engine.flood_to_goal(&self.maze);
        let (target_x, target_y) = self.maze.cell_xy(self.maze.goal());
        let start_cost = self.engine.cost(self.maze.start());
        self.run_log.log(Event::Flooded { target_x, target_y, mask: self.maze.mask(), start_cost });
    }

    fn replace_maze(&mut self, maze: Maze) {
        self.run_log.log(Event::MapLoaded { size: maze.size() });
        self.maze = maze;
        self.explorer = None;
        self.fit_window();
        self.update_flood();
    }

    /// Screen position to (x, y, local x, local y) with local coordinates in 0..1
    fn cell_at(&self, mouse_x: f32, mouse_y: f32) -> Option<(usize, usize, f32, f32)> {
        let size = self.maze.size();
        let fx = (mouse_x - MARGIN) / self.cell_size();
        let fy = (mouse_y - MARGIN) / self.cell_size();
        if fx < 0.0 || fy < 0.0 || fx >= size as f32 || fy >= size as f32 {
            return None;
        }
        let x = fx as usize;
        let row = fy as usize;
        Some((x, size - 1 - row, fx - x as f32, fy - row as f32))
    }

    fn handle_click(&mut self, mouse_x: f32, mouse_y: f32) {
        if self.explorer.is_some() {
            self.status = "Editing is disabled while exploring (E to stop)".to_string();
            return;
        }
        let Some((x, y, lx, ly)) = self.cell_at(mouse_x, mouse_y) else {
            return;
        };
        let cell = self.maze.cell_id(x, y);

        // Right click: move goal
        if is_mouse_button_pressed(MouseButton::Right) {
            if self.maze.set_goal(cell) {
                self.run_log.log(Event::GoalChanged { x, y });
                self.update_flood();
            }
            return;
        }

        // Left click near an edge: cycle that wall
        let edges = [
            (Direction::North, ly),
            (Direction::South, 1.0 - ly),
            (Direction::West, lx),
            (Direction::East, 1.0 - lx),
        ];
        let Some(&(direction, distance)) = edges.iter().min_by(|a, b| a.1.total_cmp(&b.1)) else {
            return;
        };
        if distance > WALL_PICK {
            return;
        }
        let state = next_state(self.maze.wall(cell, direction));
        if self.maze.set_wall(cell, direction, state) {
            self.run_log.log(Event::WallEdited { x, y, direction, state });
            self.update_flood();
        }
    }

    fn toggle_mask(&mut self) {
        let mask = self.maze.mask().toggled();
        self.maze.set_mask(mask);
        self.status = format!("Mask: {:?}", mask);
        self.update_flood();
    }

    fn toggle_explorer(&mut self) {
        if self.explorer.take().is_some() {
            self.status = "Explorer stopped".to_string();
            return;
        }
        self.explorer = Some(Explorer::new(self.maze.clone()));
        self.status = "Explorer placed at start".to_string();
    }

    fn step_explorer(&mut self) {
        let Some(explorer) = self.explorer.as_mut() else {
            self.status = "Press E to place the explorer first".to_string();
            return;
        };
        let goal = explorer.map().goal();
        let outcome = explorer.step(goal);
        self.status = match outcome {
            StepOutcome::Arrived => "Explorer is at the goal".to_string(),
            StepOutcome::Moved(direction) => format!("Moved {:?}", direction),
            StepOutcome::Blocked => "Explorer is blocked".to_string(),
        };
    }

    fn run_search(&mut self) {
        let max_runs = self.config.explorer.max_runs;
        let max_steps = self.config.explorer.max_steps_per_run;
        let log = std::mem::take(&mut self.run_log);
        let mut explorer = Explorer::new(self.maze.clone()).with_log(log);

        let result = explorer.search(max_runs, max_steps);
        let route = explorer.speed_run_route();
        if let Some(log) = explorer.take_log() {
            self.run_log = log;
        }
        self.status = match result {
            Ok(runs) => {
                let steps: usize = runs.iter().map(|run| run.steps).sum();
                format!("Search done: {} runs, {} steps, route {} cells", runs.len(), steps, route.len())
            }
            Err(e) => format!("Search failed: {}", e),
        };
        info!("{}", self.status);
        self.explorer = Some(explorer);
    }

    fn copy_to_clipboard(&mut self) {
        let (maze, _) = self.displayed();
        let text = map_text::render(maze, View::Plain, None);
        match Clipboard::new() {
            Ok(mut clipboard) => {
                if let Err(e) = clipboard.set_text(&text) {
                    warn!("Failed to copy to clipboard: {}", e);
                } else {
                    self.status = "Maze copied to clipboard".to_string();
                    // Keep clipboard alive for a moment to ensure clipboard managers can capture it
                    std::thread::sleep(std::time::Duration::from_millis(100));
                }
            }
            Err(e) => warn!("Failed to access clipboard: {}", e),
        }
    }

    fn paste_from_clipboard(&mut self) {
        let text = match Clipboard::new().and_then(|mut clipboard| clipboard.get_text()) {
            Ok(text) => text,
            Err(e) => {
                warn!("Failed to read clipboard: {}", e);
                return;
            }
        };
        match map_text::parse_map(&text) {
            Ok(mut maze) => {
                self.config.apply_to(&mut maze);
                self.status = format!("Pasted {}x{} maze", maze.size(), maze.size());
                self.replace_maze(maze);
            }
            Err(e) => self.status = format!("Clipboard is not a maze: {}", e),
        }
    }

    fn save_snapshot(&mut self) {
        let path = &self.config.logging.snapshot_path;
        match SaveState::from_maze(&self.maze).save_to_file(path) {
            Ok(()) => self.status = format!("Saved to {}", path),
            Err(e) => self.status = format!("Save failed: {}", e),
        }
    }

    fn load_snapshot(&mut self) {
        let path = self.config.logging.snapshot_path.clone();
        match SaveState::load_from_file(&path).and_then(|state| state.restore_maze()) {
            Ok(maze) => {
                self.status = format!("Loaded {}", path);
                self.replace_maze(maze);
            }
            Err(e) => self.status = format!("Load failed: {}", e),
        }
    }

    fn save_run_log(&self) {
        if !self.config.logging.enable_run_log {
            return;
        }
        let path = &self.config.logging.run_log_path;
        match self.run_log.save_to_file(path) {
            Ok(()) => info!("Run log saved to {}", path),
            Err(e) => error!("Failed to save run log: {}", e),
        }
    }

    fn wall_color(state: WallState) -> Option<Color> {
        match state {
            WallState::Absent => None,
            WallState::Present => Some(WHITE),
            WallState::Unknown => Some(Color::from_rgba(70, 70, 70, 255)),
            WallState::Virtual => Some(ORANGE),
        }
    }

    fn draw(&self) {
        let viewer = &self.config.viewer;
        clear_background(Color::from_rgba(viewer.background_r, viewer.background_g, viewer.background_b, 255));

        let (maze, engine) = self.displayed();
        let size = maze.size();
        let cs = self.cell_size();
        let field = engine.field();

        for x in 0..size {
            for y in 0..size {
                let cell = maze.cell_id(x, y);
                let px = MARGIN + x as f32 * cs;
                let py = MARGIN + (size - 1 - y) as f32 * cs;

                let fill = if cell == maze.goal() {
                    Color::from_rgba(40, 110, 40, 255)
                } else if cell == maze.start() {
                    Color::from_rgba(40, 60, 120, 255)
                } else if maze.is_visited(cell) {
                    Color::from_rgba(55, 55, 65, 255)
                } else {
                    Color::from_rgba(45, 45, 45, 255)
                };
                draw_rectangle(px, py, cs, cs, fill);

                if self.show_costs && field.is_reached(cell) {
                    let text = field.cost(cell).to_string();
                    draw_text(&text, px + 4.0, py + cs * 0.45, cs * 0.4, LIGHTGRAY);
                }
                if self.show_arrows && cell != field.target() {
                    if let Some(direction) = engine.direction_to_smallest(maze, cell, Direction::North) {
                        let text = direction.arrow().to_string();
                        draw_text(&text, px + cs * 0.6, py + cs * 0.9, cs * 0.45, YELLOW);
                    }
                }

                // North and west edges of every cell, plus the outer east/south
                let mut edges = vec![
                    (Direction::North, px, py, px + cs, py),
                    (Direction::West, px, py, px, py + cs),
                ];
                if x == size - 1 {
                    edges.push((Direction::East, px + cs, py, px + cs, py + cs));
                }
                if y == 0 {
                    edges.push((Direction::South, px, py + cs, px + cs, py + cs));
                }
                for (direction, x1, y1, x2, y2) in edges {
                    if let Some(color) = VisState::wall_color(maze.wall(cell, direction)) {
                        draw_line(x1, y1, x2, y2, 3.0, color);
                    }
                }
            }
        }

        if let Some(explorer) = &self.explorer {
            let (x, y) = maze.cell_xy(explorer.position());
            let cx = MARGIN + (x as f32 + 0.5) * cs;
            let cy = MARGIN + ((size - 1 - y) as f32 + 0.5) * cs;
            draw_circle(cx, cy, cs * 0.25, RED);
        }

        let panel_x = MARGIN * 2.0 + size as f32 * cs;
        let start_cost = field.cost(maze.start());
        let lines = [
            format!("Maze {}x{}  goal {:?}", size, size, maze.cell_xy(maze.goal())),
            format!("Mask: {:?}", field.mask()),
            if field.is_reached(maze.start()) {
                format!("Start cost: {}", start_cost)
            } else {
                "Start cost: unreachable".to_string()
            },
            format!("Cells seen: {}", maze.visited_count()),
            String::new(),
            "Left click edge: cycle wall".to_string(),
            "Right click: move goal".to_string(),
            "M: toggle mask  F: re-flood".to_string(),
            "Tab: costs  A: arrows".to_string(),
            "E: explorer on/off  N: step".to_string(),
            "R: search until speed run".to_string(),
            "C/V: copy/paste text map".to_string(),
            "S/L: save/load snapshot".to_string(),
            "P: print run log  Esc: quit".to_string(),
            String::new(),
            self.status.clone(),
        ];
        for (i, line) in lines.iter().enumerate() {
            draw_text(line, panel_x, MARGIN + 18.0 + i as f32 * 22.0, 20.0, WHITE);
        }
    }
}

/// Map from the command line, then the configured default file, then an empty maze
fn initial_maze(config: &Config) -> Result<Maze, MazeError> {
    let from_args = std::env::args().nth(1);
    let path = from_args.unwrap_or_else(|| config.default_map_file.path.clone());
    if Path::new(&path).exists() {
        match map_text::load_map_file(&path) {
            Ok(mut maze) => {
                info!("Loaded map from {}", path);
                config.apply_to(&mut maze);
                return Ok(maze);
            }
            Err(e) => warn!("Failed to load map {}: {}", path, e),
        }
    }

    config.build_maze()
}

fn window_conf() -> Conf {
    let config = Config::load();
    let (width, height) = config.window_size(config.maze.size);
    Conf {
        window_title: config.viewer.window_title.clone(),
        window_width: width as i32,
        window_height: height as i32,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::load();
    let maze = match initial_maze(&config) {
        Ok(maze) => maze,
        Err(e) => {
            error!("Cannot build the configured maze: {}", e);
            return;
        }
    };
    let mut state = VisState::new(config, maze);

    loop {
        // Handle input
        if is_mouse_button_pressed(MouseButton::Left) || is_mouse_button_pressed(MouseButton::Right) {
            let (mouse_x, mouse_y) = mouse_position();
            state.handle_click(mouse_x, mouse_y);
        }

        if is_key_pressed(KeyCode::M) {
            state.toggle_mask();
        }
        if is_key_pressed(KeyCode::F) {
            state.update_flood();
        }
        if is_key_pressed(KeyCode::Tab) {
            state.show_costs = !state.show_costs;
        }
        if is_key_pressed(KeyCode::A) {
            state.show_arrows = !state.show_arrows;
        }
        if is_key_pressed(KeyCode::E) {
            state.toggle_explorer();
        }
        if is_key_pressed(KeyCode::N) {
            state.step_explorer();
        }
        if is_key_pressed(KeyCode::R) {
            state.run_search();
        }
        if is_key_pressed(KeyCode::C) {
            state.copy_to_clipboard();
        }
        if is_key_pressed(KeyCode::V) {
            state.paste_from_clipboard();
        }
        if is_key_pressed(KeyCode::S) {
            state.save_snapshot();
        }
        if is_key_pressed(KeyCode::L) {
            state.load_snapshot();
        }
        if is_key_pressed(KeyCode::P) {
            state.run_log.print();
            println!("{}", state.run_log.summary());
        }

        // Close window on Escape
        if is_key_pressed(KeyCode::Escape) {
            state.save_run_log();
            break;
        }

        state.draw();

        next_frame().await
    }
}
