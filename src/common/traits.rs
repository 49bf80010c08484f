//! Common traits defining the seams between grid, engine and drivers

use crate::common::error::PathfindingError;
use crate::common::types::GridNode;
use crate::path_planning::SearchOutcome;
use crate::utils::Grid;

/// Trait for one-shot grid path planners
pub trait GridPathPlanner {
    /// Plan a path between the grid's start and end markers
    fn plan(&self, grid: &Grid) -> Result<SearchOutcome, PathfindingError>;
}

/// Receives notifications while a search runs.
///
/// Stepped drivers redraw on `on_expand`; instant drivers usually pass `()`.
pub trait SearchObserver {
    /// Called once per expanded cell
    fn on_expand(&mut self, _node: GridNode) {}

    /// Called once when the search leaves the Searching state
    fn on_finish(&mut self, _outcome: &SearchOutcome) {}
}

impl SearchObserver for () {}

/// Observer that records every notification, handy for replaying a search
#[derive(Debug, Default, Clone)]
pub struct ExpansionLog {
    pub expanded: Vec<GridNode>,
    pub outcome: Option<SearchOutcome>,
}

impl SearchObserver for ExpansionLog {
    fn on_expand(&mut self, node: GridNode) {
        self.expanded.push(node);
    }

    fn on_finish(&mut self, outcome: &SearchOutcome) {
        self.outcome = Some(outcome.clone());
    }
}
