// Path Planning module: heuristics and the incremental A* engine

pub mod heuristic;
pub mod a_star;

pub use heuristic::*;
pub use a_star::*;
