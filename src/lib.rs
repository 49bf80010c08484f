//! Cyder Pathfinder - grid A* search with animated stepping
//!
//! This crate provides an editable square board, an incremental A* engine
//! with selectable heuristic, diagonal movement and optimal mode, and
//! cooperative drivers that step the search or replay its path on timers.

// Core modules
pub mod common;
pub mod utils;

// Search and animation
pub mod path_planning;
pub mod animation;
pub mod session;

// Re-export common types for convenience
pub use common::{CellView, GridNode, GridPath, Tile};
pub use common::{GridPathPlanner, SearchObserver};
pub use common::{PathfindingError, PathfindingResult};
pub use path_planning::{AStarPlanner, AStarSearch, Heuristic, SearchConfig, SearchOutcome, SearchState};
pub use animation::{AnimationConfig, AnimationDriver, AnimationEvent, DriverMode};
pub use session::{Session, SessionConfig};
pub use utils::Grid;
