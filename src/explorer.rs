use crate::direction::Direction;
use crate::flood::FloodEngine;
use crate::maze::{Cell, Maze};
use crate::run_log::{Event, RunLog};
use crate::wall::Mask;
use log::{debug, info};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExploreError {
    #[error("mouse at {cell:?} has no way toward {target:?}")]
    Blocked { cell: (usize, usize), target: (usize, usize) },
    #[error("no arrival at {target:?} within {max_steps} steps")]
    StepLimit { target: (usize, usize), max_steps: usize },
    #[error("no provable speed run after {0} search rounds")]
    RunLimit(usize),
}

/// Result of a single step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Already standing on the target
    Arrived,
    Moved(Direction),
    /// Every neighbour is walled off or no closer to the target
    Blocked,
}

/// One search run from one cell to another
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub from: Cell,
    pub target: Cell,
    pub steps: usize,
    /// Unknown walls that were filled in during the run
    pub walls_learned: usize,
}

/// A simulated mouse exploring a maze it cannot see.
///
/// The reference maze stands in for the sensors. The mouse only learns the
/// walls of the cell it stands in and keeps them in its own map, which it
/// floods after every observation.
pub struct Explorer {
    reference: Maze,
    map: Maze,
    engine: FloodEngine,
    position: Cell,
    heading: Direction,
    walls_learned: usize,
    log: Option<RunLog>,
}

impl Explorer {
    pub fn new(reference: Maze) -> Self {
        let mut map = reference.clone();
        map.reset();
        map.set_mask(Mask::Open);
        let position = map.start();
        Explorer {
            engine: FloodEngine::for_maze(&map),
            reference,
            map,
            position,
            heading: Direction::North,
            walls_learned: 0,
            log: None,
        }
    }

    /// Record events into `log` while exploring
    pub fn with_log(mut self, log: RunLog) -> Self {
        self.log = Some(log);
        self
    }

    pub fn take_log(&mut self) -> Option<RunLog> {
        self.log.take()
    }

    pub fn reference(&self) -> &Maze {
        &self.reference
    }

    /// Walls learned so far
    pub fn map(&self) -> &Maze {
        &self.map
    }

    pub fn engine(&self) -> &FloodEngine {
        &self.engine
    }

    pub fn position(&self) -> Cell {
        self.position
    }

    pub fn heading(&self) -> Direction {
        self.heading
    }

    fn record(&mut self, event: Event) {
        if let Some(log) = self.log.as_mut() {
            log.log(event);
        }
    }

    /// Copy the walls around the current cell from the reference into the map
    fn observe(&mut self) -> usize {
        let here = self.position;
        let mut learned = 0;
        for direction in Direction::ALL {
            let state = self.reference.wall(here, direction);
            if self.map.update_wall(here, direction, state) {
                learned += 1;
                let (x, y) = self.map.cell_xy(here);
                self.record(Event::WallObserved { x, y, direction, state });
            }
        }
        self.walls_learned += learned;
        learned
    }

    /// Sense, re-flood toward `target` and move one cell
    pub fn step(&mut self, target: Cell) -> StepOutcome {
        self.observe();
        if self.position == target {
            return StepOutcome::Arrived;
        }

        self.engine.flood(&self.map, target, Mask::Open);
        let Some(direction) = self.engine.direction_to_smallest(&self.map, self.position, self.heading) else {
            return StepOutcome::Blocked;
        };
        let Some(next) = self.map.neighbour(self.position, direction) else {
            return StepOutcome::Blocked;
        };

        self.position = next;
        self.heading = direction;
        let (x, y) = self.map.cell_xy(next);
        debug!("mouse moved {:?} to ({}, {})", direction, x, y);
        self.record(Event::Moved { x, y, direction });
        StepOutcome::Moved(direction)
    }

    /// Step until the mouse stands on `target`
    pub fn run_to(&mut self, target: Cell, max_steps: usize) -> Result<RunSummary, ExploreError> {
        let from = self.position;
        let learned_before = self.walls_learned;
        let mut steps = 0;

        loop {
            // a mouse already on the target still gets one last look around
            if steps >= max_steps && self.position != target {
                return Err(ExploreError::StepLimit {
                    target: self.map.cell_xy(target),
                    max_steps,
                });
            }
            match self.step(target) {
                StepOutcome::Arrived => break,
                StepOutcome::Moved(_) => steps += 1,
                StepOutcome::Blocked => {
                    return Err(ExploreError::Blocked {
                        cell: self.map.cell_xy(self.position),
                        target: self.map.cell_xy(target),
                    });
                }
            }
        }

        let (target_x, target_y) = self.map.cell_xy(target);
        self.record(Event::RunFinished { target_x, target_y, steps });
        Ok(RunSummary {
            from,
            target,
            steps,
            walls_learned: self.walls_learned - learned_before,
        })
    }

    /// Alternate runs to the goal and back until the known walls prove a
    /// shortest route.
    pub fn search(&mut self, max_runs: usize, max_steps: usize) -> Result<Vec<RunSummary>, ExploreError> {
        let mut runs = Vec::new();

        for round in 1..=max_runs {
            runs.push(self.run_to(self.map.goal(), max_steps)?);
            runs.push(self.run_to(self.map.start(), max_steps)?);

            let possible = self.speed_run_possible();
            info!(
                "search round {}: {} cells fully seen, speed run {}",
                round,
                self.map.visited_count(),
                if possible { "ready" } else { "not ready" }
            );
            if possible {
                return Ok(runs);
            }
        }

        Err(ExploreError::RunLimit(max_runs))
    }

    /// Compare open and closed floods of the learned map. Leaves the closed
    /// field in the engine.
    pub fn speed_run_possible(&mut self) -> bool {
        let possible = self.engine.speed_run_possible(&self.map);
        let (target_x, target_y) = self.map.cell_xy(self.map.goal());
        let start_cost = self.engine.cost(self.map.start());
        self.record(Event::Flooded { target_x, target_y, mask: Mask::Closed, start_cost });
        self.record(Event::SpeedRunChecked { possible });
        possible
    }

    /// Cells of the fastest route through known passages, from the start to
    /// the goal. Empty when no such route is known yet.
    pub fn speed_run_route(&mut self) -> Vec<Cell> {
        let start = self.map.start();
        self.engine.flood(&self.map, self.map.goal(), Mask::Closed);
        if !self.engine.field().is_reached(start) {
            return Vec::new();
        }
        self.engine.route(&self.map, start, Direction::North)
    }
}
