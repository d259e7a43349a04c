use crate::direction::Direction;
use crate::wall::{Mask, WallState};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Things that happen to a maze while it is explored or edited
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// A sensor reading that filled in an unknown wall (x, y, direction, state)
    WallObserved { x: usize, y: usize, direction: Direction, state: WallState },
    /// A wall overwritten by hand in the viewer
    WallEdited { x: usize, y: usize, direction: Direction, state: WallState },
    /// Flood finished; `start_cost` is the cost found for the start cell
    Flooded { target_x: usize, target_y: usize, mask: Mask, start_cost: u16 },
    /// Mouse moved into cell (x, y)
    Moved { x: usize, y: usize, direction: Direction },
    /// Search run reached its target after `steps` moves
    RunFinished { target_x: usize, target_y: usize, steps: usize },
    GoalChanged { x: usize, y: usize },
    MapLoaded { size: usize },
    SpeedRunChecked { possible: bool },
}

/// Logged event with timestamp
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoggedEvent {
    /// Milliseconds since the log was created
    pub timestamp_ms: u64,
    pub event: Event,
}

/// Event logger
pub struct RunLog {
    start_time: Instant,
    events: Vec<LoggedEvent>,
}

impl RunLog {
    pub fn new() -> Self {
        RunLog {
            start_time: Instant::now(),
            events: Vec::new(),
        }
    }

    /// Log an event with the current timestamp
    pub fn log(&mut self, event: Event) {
        let timestamp_ms = self.start_time.elapsed().as_millis() as u64;
        self.events.push(LoggedEvent { timestamp_ms, event });
    }

    pub fn events(&self) -> &[LoggedEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Save log to JSON file
    pub fn save_to_file(&self, path: &str) -> Result<(), Box<dyn std::error::Error>> {
        let json = serde_json::to_string_pretty(&self.events)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Print log to console
    pub fn print(&self) {
        println!("\n=== Run Log ({} events) ===", self.events.len());
        for (i, logged) in self.events.iter().enumerate() {
            println!("[{:6}ms] #{:4} {:?}", logged.timestamp_ms, i + 1, logged.event);
        }
        println!("=== End of Log ===\n");
    }

    /// Get summary statistics
    pub fn summary(&self) -> String {
        let mut walls_observed = 0;
        let mut walls_edited = 0;
        let mut floods = 0;
        let mut moves = 0;
        let mut runs = 0;
        let mut speed_run_ready = false;

        for logged in &self.events {
            match &logged.event {
                Event::WallObserved { .. } => walls_observed += 1,
                Event::WallEdited { .. } => walls_edited += 1,
                Event::Flooded { .. } => floods += 1,
                Event::Moved { .. } => moves += 1,
                Event::RunFinished { .. } => runs += 1,
                Event::SpeedRunChecked { possible } => speed_run_ready = *possible,
                _ => {}
            }
        }

        let duration = self.events.last().map_or(0, |last| last.timestamp_ms);

        format!(
            "Session Duration: {}ms\n\
             Total Events: {}\n\
             Walls: {} observed, {} edited\n\
             Search: {} moves over {} runs, {} floods\n\
             Speed run ready: {}",
            duration,
            self.events.len(),
            walls_observed,
            walls_edited,
            moves,
            runs,
            floods,
            speed_run_ready
        )
    }
}

impl Default for RunLog {
    fn default() -> Self {
        RunLog::new()
    }
}
