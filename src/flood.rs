use crate::direction::Direction;
use crate::maze::{Cell, Maze};
use crate::wall::Mask;
use log::trace;
use std::collections::VecDeque;

/// Hop counts from every cell to a flood target.
///
/// Cells the flood could not reach hold the sentinel `size * size`, one more
/// than the longest possible path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CostField {
    size: usize,
    costs: Vec<u16>,
    target: Cell,
    mask: Mask,
}

impl CostField {
    fn unreached(size: usize) -> Self {
        let sentinel = (size * size) as u16;
        CostField {
            size,
            costs: vec![sentinel; size * size],
            target: 0,
            mask: Mask::Open,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn sentinel(&self) -> u16 {
        (self.size * self.size) as u16
    }

    /// Cost of a cell, or the sentinel when it is unreached or out of range
    pub fn cost(&self, cell: Cell) -> u16 {
        self.costs.get(cell).copied().unwrap_or_else(|| self.sentinel())
    }

    pub fn is_reached(&self, cell: Cell) -> bool {
        self.cost(cell) < self.sentinel()
    }

    pub fn reached_count(&self) -> usize {
        let sentinel = self.sentinel();
        self.costs.iter().filter(|&&cost| cost < sentinel).count()
    }

    pub fn target(&self) -> Cell {
        self.target
    }

    /// The mask the field was flooded under
    pub fn mask(&self) -> Mask {
        self.mask
    }

    pub fn costs(&self) -> &[u16] {
        &self.costs
    }
}

/// Breadth-first flood over a maze plus the move choice built on its result.
///
/// The engine keeps its cost field and queue between calls so that repeated
/// floods of the same maze do not allocate.
pub struct FloodEngine {
    field: CostField,
    queue: VecDeque<Cell>,
}

impl FloodEngine {
    pub fn new(size: usize) -> Self {
        FloodEngine {
            field: CostField::unreached(size),
            queue: VecDeque::with_capacity(size * size),
        }
    }

    pub fn for_maze(maze: &Maze) -> Self {
        FloodEngine::new(maze.size())
    }

    /// Result of the most recent flood
    pub fn field(&self) -> &CostField {
        &self.field
    }

    pub fn cost(&self, cell: Cell) -> u16 {
        self.field.cost(cell)
    }

    /// Flood the maze outward from `target`, reading unknown walls through `mask`.
    ///
    /// Every cell is queued at most once, when its cost drops from the
    /// sentinel to a finite value. Since all edges cost one, queue order is
    /// also cost order and the first cost written is the shortest.
    pub fn flood(&mut self, maze: &Maze, target: Cell, mask: Mask) -> &CostField {
        let size = maze.size();
        if self.field.size != size {
            self.field = CostField::unreached(size);
            self.queue = VecDeque::with_capacity(size * size);
        }

        let sentinel = maze.max_cost();
        self.field.costs.fill(sentinel);
        self.field.target = target;
        self.field.mask = mask;
        self.queue.clear();

        if !maze.contains(target) {
            trace!("flood target {} is outside the maze", target);
            return &self.field;
        }

        self.field.costs[target] = 0;
        self.queue.push_back(target);

        while let Some(here) = self.queue.pop_front() {
            let next_cost = self.field.costs[here] + 1;
            for direction in Direction::ALL {
                if !maze.has_exit(here, direction, mask) {
                    continue;
                }
                let Some(next) = maze.neighbour(here, direction) else {
                    continue;
                };
                if self.field.costs[next] == sentinel {
                    self.field.costs[next] = next_cost;
                    self.queue.push_back(next);
                }
            }
        }

        trace!(
            "flooded to {:?} under {:?} mask, {} cells reached",
            maze.cell_xy(target),
            mask,
            self.field.reached_count()
        );
        &self.field
    }

    /// Flood toward the maze's goal using the maze's own mask
    pub fn flood_to_goal(&mut self, maze: &Maze) -> &CostField {
        self.flood(maze, maze.goal(), maze.mask())
    }

    /// Pick the neighbour with the smallest cost, looking ahead, right, left
    /// and then behind relative to `heading`.
    ///
    /// A neighbour is only chosen when it is strictly cheaper than the cell
    /// itself and than every candidate already looked at, so ties go to the
    /// earlier direction. Returns None at the target or when cut off.
    pub fn direction_to_smallest(&self, maze: &Maze, cell: Cell, heading: Direction) -> Option<Direction> {
        let mask = self.field.mask;
        let mut best_cost = self.field.cost(cell);
        let mut best_direction = None;

        for direction in heading.search_order() {
            if !maze.has_exit(cell, direction, mask) {
                continue;
            }
            let Some(next) = maze.neighbour(cell, direction) else {
                continue;
            };
            let cost = self.field.cost(next);
            if cost < best_cost {
                best_cost = cost;
                best_direction = Some(direction);
            }
        }

        best_direction
    }

    /// Cells visited when following `direction_to_smallest` from `from` to
    /// the flood target, including both ends.
    pub fn route(&self, maze: &Maze, from: Cell, heading: Direction) -> Vec<Cell> {
        let mut route = vec![from];
        let mut here = from;
        let mut heading = heading;

        while let Some(direction) = self.direction_to_smallest(maze, here, heading) {
            match maze.neighbour(here, direction) {
                Some(next) => {
                    here = next;
                    heading = direction;
                    route.push(here);
                }
                None => break,
            }
        }

        route
    }

    /// True when the walls seen so far already prove a shortest route from
    /// the start to the goal.
    ///
    /// The open flood treats unknown walls as passable and gives a lower
    /// bound; the closed flood only uses confirmed passages. The answer is
    /// whether the two start costs are equal, including when both are the
    /// sentinel. The closed field is left in the engine afterwards.
    pub fn speed_run_possible(&mut self, maze: &Maze) -> bool {
        let start = maze.start();
        let optimistic = self.flood(maze, maze.goal(), Mask::Open).cost(start);
        let confirmed = self.flood(maze, maze.goal(), Mask::Closed).cost(start);
        optimistic == confirmed
    }
}
