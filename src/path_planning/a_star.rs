//! A* search over the editable board
//!
//! One engine core drives both animation modes: stepped drivers call
//! [`AStarSearch::step`] once per timer tick, instant drivers call
//! [`AStarSearch::run_to_completion`]. The engine borrows the grid per call
//! and never mutates it.
//!
//! State machine: Idle -> Searching -> {PathFound | PathNotFound}. A new
//! `begin` or a `reset` returns the engine to the start of the cycle.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use log::{debug, trace, warn};
use ordered_float::OrderedFloat;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::common::{
    CellRecord, GridNode, GridPath, GridPathPlanner, PathfindingError, PathfindingResult,
    SearchObserver,
};
use crate::path_planning::heuristic::Heuristic;
use crate::utils::Grid;

const ORTHOGONAL_MOVES: [(i32, i32); 4] = [(1, 0), (0, 1), (-1, 0), (0, -1)];
const DIAGONAL_MOVES: [(i32, i32); 4] = [(1, 1), (-1, 1), (-1, -1), (1, -1)];

/// Configuration for the A* engine
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SearchConfig {
    /// Allow the four diagonal moves
    pub diagonal: bool,
    /// Distance estimate used for ordering
    pub heuristic: Heuristic,
    /// Keep searching after reaching the end until the open set is empty
    pub optimal: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            diagonal: false,
            heuristic: Heuristic::Manhattan,
            optimal: false,
        }
    }
}

impl SearchConfig {
    pub fn with_diagonal(mut self, diagonal: bool) -> Self {
        self.diagonal = diagonal;
        self
    }

    pub fn with_heuristic(mut self, heuristic: Heuristic) -> Self {
        self.heuristic = heuristic;
        self
    }

    pub fn with_optimal(mut self, optimal: bool) -> Self {
        self.optimal = optimal;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SearchState {
    Idle,
    Searching,
    PathFound,
    PathNotFound,
}

/// Terminal result of a search
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SearchOutcome {
    PathFound(GridPath),
    PathNotFound,
}

impl SearchOutcome {
    pub fn path(&self) -> Option<&GridPath> {
        match self {
            SearchOutcome::PathFound(path) => Some(path),
            SearchOutcome::PathNotFound => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, SearchOutcome::PathFound(_))
    }
}

/// Result of a single engine step
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    Expanded(GridNode),
    Finished(SearchOutcome),
}

/// Open set entry (min-heap on f, then h, then insertion order)
#[derive(Debug)]
struct PriorityNode {
    f: OrderedFloat<f64>,
    h: OrderedFloat<f64>,
    seq: u64,
    g: f64,
    node: GridNode,
}

impl Eq for PriorityNode {}

impl PartialEq for PriorityNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Ord for PriorityNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap behavior
        other
            .f
            .cmp(&self.f)
            .then_with(|| other.h.cmp(&self.h))
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for PriorityNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Incremental A* engine
#[derive(Debug)]
pub struct AStarSearch {
    config: SearchConfig,
    state: SearchState,
    size: usize,
    start: Option<GridNode>,
    goal: Option<GridNode>,
    records: Vec<CellRecord>,
    open_marks: Vec<bool>,
    closed_marks: Vec<bool>,
    open_set: BinaryHeap<PriorityNode>,
    seq: u64,
    expansions: usize,
    goal_reached: bool,
    outcome: Option<SearchOutcome>,
}

impl AStarSearch {
    pub fn new(config: SearchConfig) -> Self {
        Self {
            config,
            state: SearchState::Idle,
            size: 0,
            start: None,
            goal: None,
            records: Vec::new(),
            open_marks: Vec::new(),
            closed_marks: Vec::new(),
            open_set: BinaryHeap::new(),
            seq: 0,
            expansions: 0,
            goal_reached: false,
            outcome: None,
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Replace the configuration. Ignored while a search is running.
    pub fn set_config(&mut self, config: SearchConfig) -> bool {
        if self.state == SearchState::Searching {
            warn!("search configuration change ignored while searching");
            return false;
        }
        self.config = config;
        true
    }

    pub fn state(&self) -> SearchState {
        self.state
    }

    pub fn is_searching(&self) -> bool {
        self.state == SearchState::Searching
    }

    pub fn outcome(&self) -> Option<&SearchOutcome> {
        self.outcome.as_ref()
    }

    pub fn path(&self) -> Option<&GridPath> {
        self.outcome.as_ref().and_then(|o| o.path())
    }

    pub fn expansions(&self) -> usize {
        self.expansions
    }

    pub fn open_len(&self) -> usize {
        self.open_marks.iter().filter(|m| **m).count()
    }

    pub fn record(&self, node: GridNode) -> Option<&CellRecord> {
        self.index(node).map(|i| &self.records[i])
    }

    pub fn is_open(&self, node: GridNode) -> bool {
        self.index(node).map_or(false, |i| self.open_marks[i])
    }

    pub fn is_closed(&self, node: GridNode) -> bool {
        self.index(node).map_or(false, |i| self.closed_marks[i])
    }

    /// Start a new search on `grid`.
    ///
    /// Both markers must be set; otherwise the engine keeps its current
    /// state and `NotConfigured` is returned.
    pub fn begin(&mut self, grid: &Grid) -> PathfindingResult<()> {
        let (start, goal) = match (grid.start(), grid.end()) {
            (Some(s), Some(e)) => (s, e),
            (None, _) => {
                return Err(PathfindingError::NotConfigured(
                    "start cell is not set".to_string(),
                ))
            }
            (_, None) => {
                return Err(PathfindingError::NotConfigured(
                    "end cell is not set".to_string(),
                ))
            }
        };

        if !self.config.heuristic.is_admissible(self.config.diagonal) {
            warn!(
                "{:?} heuristic overestimates with diagonal moves; paths may be longer than necessary",
                self.config.heuristic
            );
        }

        let cells = grid.size() * grid.size();
        self.size = grid.size();
        self.start = Some(start);
        self.goal = Some(goal);
        self.records = vec![CellRecord::unvisited(); cells];
        self.open_marks = vec![false; cells];
        self.closed_marks = vec![false; cells];
        self.open_set.clear();
        self.seq = 0;
        self.expansions = 0;
        self.goal_reached = false;
        self.outcome = None;

        let h = self.config.heuristic.distance(start, goal);
        if let Some(i) = self.index(start) {
            self.records[i] = CellRecord { g: 0.0, h, parent: None };
        }
        self.push(start, 0.0, h);
        self.state = SearchState::Searching;
        debug!(
            "search started from {} to {} with {:?}",
            start, goal, self.config
        );
        Ok(())
    }

    /// Perform exactly one expansion. Returns `None` unless searching.
    pub fn step<O: SearchObserver + ?Sized>(
        &mut self,
        grid: &Grid,
        observer: &mut O,
    ) -> Option<StepOutcome> {
        if self.state != SearchState::Searching {
            return None;
        }

        let current = match self.pop_live() {
            Some(node) => node,
            None => {
                let outcome = if self.goal_reached {
                    self.reconstruct()
                } else {
                    SearchOutcome::PathNotFound
                };
                return Some(self.finish(outcome, observer));
            }
        };

        self.expansions += 1;
        if let Some(i) = self.index(current) {
            self.closed_marks[i] = true;
        }

        if Some(current) == self.goal {
            observer.on_expand(current);
            if !self.config.optimal {
                let outcome = self.reconstruct();
                return Some(self.finish(outcome, observer));
            }
            self.goal_reached = true;
            trace!("end reached at {}, continuing for optimal path", current);
            return Some(StepOutcome::Expanded(current));
        }

        trace!("expanding {}", current);
        self.relax_neighbors(grid, current);
        observer.on_expand(current);
        Some(StepOutcome::Expanded(current))
    }

    /// Step until the search leaves the Searching state
    pub fn run_to_completion<O: SearchObserver + ?Sized>(
        &mut self,
        grid: &Grid,
        observer: &mut O,
    ) -> SearchOutcome {
        while let Some(outcome) = self.step(grid, observer) {
            if let StepOutcome::Finished(result) = outcome {
                return result;
            }
        }
        self.outcome.clone().unwrap_or(SearchOutcome::PathNotFound)
    }

    /// Stop a running search. Partial records stay visible until reset.
    pub fn cancel(&mut self) {
        if self.state == SearchState::Searching {
            debug!("search cancelled after {} expansions", self.expansions);
            self.state = SearchState::Idle;
            self.open_set.clear();
        }
    }

    /// Return to Idle and drop every record
    pub fn reset(&mut self) {
        self.state = SearchState::Idle;
        self.start = None;
        self.goal = None;
        self.records.clear();
        self.open_marks.clear();
        self.closed_marks.clear();
        self.open_set.clear();
        self.seq = 0;
        self.expansions = 0;
        self.goal_reached = false;
        self.outcome = None;
    }

    fn relax_neighbors(&mut self, grid: &Grid, current: GridNode) {
        let current_g = match self.index(current) {
            Some(i) => self.records[i].g,
            None => return,
        };
        let goal = match self.goal {
            Some(goal) => goal,
            None => return,
        };

        for neighbor in self.neighbors(grid, current) {
            let i = match self.index(neighbor) {
                Some(i) => i,
                None => continue,
            };
            let g = current_g + current.step_cost(&neighbor);
            if g < self.records[i].g {
                let h = self.config.heuristic.distance(neighbor, goal);
                self.records[i] = CellRecord { g, h, parent: Some(current) };
                self.closed_marks[i] = false;
                self.push(neighbor, g, h);
            }
        }
    }

    fn neighbors(&self, grid: &Grid, node: GridNode) -> Vec<GridNode> {
        let mut result: Vec<GridNode> = ORTHOGONAL_MOVES
            .iter()
            .map(|&(dx, dy)| node.offset(dx, dy))
            .filter(|n| !grid.is_wall(*n))
            .collect();

        if self.config.diagonal {
            for &(dx, dy) in DIAGONAL_MOVES.iter() {
                let target = node.offset(dx, dy);
                if !grid.is_wall(target) {
                    result.push(target);
                }
            }
        }
        result
    }

    fn push(&mut self, node: GridNode, g: f64, h: f64) {
        if let Some(i) = self.index(node) {
            self.open_marks[i] = true;
        }
        self.seq += 1;
        self.open_set.push(PriorityNode {
            f: OrderedFloat(g + h),
            h: OrderedFloat(h),
            seq: self.seq,
            g,
            node,
        });
    }

    /// Pop the best entry whose cost still matches the cell's record
    fn pop_live(&mut self) -> Option<GridNode> {
        while let Some(entry) = self.open_set.pop() {
            let i = match self.index(entry.node) {
                Some(i) => i,
                None => continue,
            };
            if entry.g > self.records[i].g {
                continue;
            }
            self.open_marks[i] = false;
            return Some(entry.node);
        }
        None
    }

    fn reconstruct(&self) -> SearchOutcome {
        let goal = match self.goal {
            Some(goal) => goal,
            None => return SearchOutcome::PathNotFound,
        };

        let mut cells = vec![goal];
        let mut current = goal;
        // parents strictly decrease in g, so the walk is bounded by the cell count
        for _ in 0..self.records.len() {
            match self.record(current).and_then(|r| r.parent) {
                Some(parent) => {
                    cells.push(parent);
                    current = parent;
                }
                None => break,
            }
        }

        if Some(current) != self.start {
            return SearchOutcome::PathNotFound;
        }
        cells.reverse();
        SearchOutcome::PathFound(GridPath::from_cells(cells))
    }

    fn finish<O: SearchObserver + ?Sized>(
        &mut self,
        outcome: SearchOutcome,
        observer: &mut O,
    ) -> StepOutcome {
        self.state = match outcome {
            SearchOutcome::PathFound(_) => SearchState::PathFound,
            SearchOutcome::PathNotFound => SearchState::PathNotFound,
        };
        match outcome.path() {
            Some(path) => debug!(
                "path found: {} cells, cost {:.3}, {} expansions",
                path.len(),
                path.total_cost(),
                self.expansions
            ),
            None => debug!("no path after {} expansions", self.expansions),
        }
        self.outcome = Some(outcome.clone());
        observer.on_finish(&outcome);
        StepOutcome::Finished(outcome)
    }

    fn index(&self, node: GridNode) -> Option<usize> {
        let size = self.size as i32;
        if node.x < 0 || node.y < 0 || node.x >= size || node.y >= size {
            return None;
        }
        let i = node.y as usize * self.size + node.x as usize;
        if i < self.records.len() {
            Some(i)
        } else {
            None
        }
    }
}

impl Default for AStarSearch {
    fn default() -> Self {
        Self::new(SearchConfig::default())
    }
}

/// One-shot planner running a fresh engine to completion
#[derive(Debug, Clone, Default)]
pub struct AStarPlanner {
    config: SearchConfig,
}

impl AStarPlanner {
    pub fn new(config: SearchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }
}

impl GridPathPlanner for AStarPlanner {
    fn plan(&self, grid: &Grid) -> Result<SearchOutcome, PathfindingError> {
        let mut search = AStarSearch::new(self.config);
        search.begin(grid)?;
        Ok(search.run_to_completion(grid, &mut ()))
    }
}
