//! Common types used throughout cyder_pathfinder

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Cost of one orthogonal move
pub const ORTHOGONAL_COST: f64 = 1.0;
/// Cost of one diagonal move
pub const DIAGONAL_COST: f64 = std::f64::consts::SQRT_2;

/// Grid cell coordinate. Two nodes are equal iff their coordinates match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GridNode {
    pub x: i32,
    pub y: i32,
}

impl GridNode {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(&self, dx: i32, dy: i32) -> Self {
        Self { x: self.x + dx, y: self.y + dy }
    }

    /// True when the two nodes differ in both coordinates by exactly one
    pub fn is_diagonal_to(&self, other: &GridNode) -> bool {
        (self.x - other.x).abs() == 1 && (self.y - other.y).abs() == 1
    }

    /// Cost of a single move between two adjacent nodes
    pub fn step_cost(&self, other: &GridNode) -> f64 {
        if self.is_diagonal_to(other) {
            DIAGONAL_COST
        } else {
            ORTHOGONAL_COST
        }
    }
}

impl From<(i32, i32)> for GridNode {
    fn from(tuple: (i32, i32)) -> Self {
        Self { x: tuple.0, y: tuple.1 }
    }
}

impl fmt::Display for GridNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Stored classification of a lattice cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Tile {
    Free,
    Wall,
}

impl Default for Tile {
    fn default() -> Self {
        Tile::Free
    }
}

/// What a renderer should draw for a cell.
///
/// Markers win over everything, then the path, then walls and search marks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CellView {
    Free,
    Wall,
    Start,
    End,
    Open,
    Closed,
    Path,
}

impl CellView {
    pub fn symbol(&self) -> char {
        match self {
            CellView::Free => '.',
            CellView::Wall => '#',
            CellView::Start => 'S',
            CellView::End => 'E',
            CellView::Open => 'o',
            CellView::Closed => 'x',
            CellView::Path => '*',
        }
    }
}

/// Per-cell search bookkeeping
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellRecord {
    /// Cost so far
    pub g: f64,
    /// Heuristic estimate to the goal
    pub h: f64,
    /// Predecessor on the best route found so far
    pub parent: Option<GridNode>,
}

impl CellRecord {
    pub fn unvisited() -> Self {
        Self { g: f64::INFINITY, h: f64::INFINITY, parent: None }
    }

    pub fn f(&self) -> f64 {
        self.g + self.h
    }

    pub fn is_visited(&self) -> bool {
        self.g.is_finite()
    }
}

impl Default for CellRecord {
    fn default() -> Self {
        Self::unvisited()
    }
}

/// Ordered cell sequence from start to end
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GridPath {
    pub cells: Vec<GridNode>,
}

impl GridPath {
    pub fn new() -> Self {
        Self { cells: Vec::new() }
    }

    pub fn from_cells(cells: Vec<GridNode>) -> Self {
        Self { cells }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of moves, one less than the number of cells
    pub fn moves(&self) -> usize {
        self.cells.len().saturating_sub(1)
    }

    pub fn contains(&self, node: &GridNode) -> bool {
        self.cells.contains(node)
    }

    pub fn first(&self) -> Option<&GridNode> {
        self.cells.first()
    }

    pub fn last(&self) -> Option<&GridNode> {
        self.cells.last()
    }

    pub fn total_cost(&self) -> f64 {
        self.cells.windows(2).map(|w| w[0].step_cost(&w[1])).sum()
    }

    pub fn x_coords(&self) -> Vec<f64> {
        self.cells.iter().map(|n| n.x as f64).collect()
    }

    pub fn y_coords(&self) -> Vec<f64> {
        self.cells.iter().map(|n| n.y as f64).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_equality_by_coordinates() {
        assert_eq!(GridNode::new(3, 4), GridNode::from((3, 4)));
        assert_ne!(GridNode::new(3, 4), GridNode::new(4, 3));
    }

    #[test]
    fn test_step_cost() {
        let a = GridNode::new(1, 1);
        assert_eq!(a.step_cost(&a.offset(1, 0)), ORTHOGONAL_COST);
        assert!((a.step_cost(&a.offset(-1, 1)) - 2f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_path_cost_and_moves() {
        let path = GridPath::from_cells(vec![
            GridNode::new(0, 0),
            GridNode::new(1, 0),
            GridNode::new(2, 1),
        ]);
        assert_eq!(path.moves(), 2);
        assert!((path.total_cost() - (1.0 + DIAGONAL_COST)).abs() < 1e-12);
        assert_eq!(GridPath::new().moves(), 0);
    }

    #[test]
    fn test_unvisited_record() {
        let rec = CellRecord::unvisited();
        assert!(!rec.is_visited());
        assert!(rec.f().is_infinite());
    }
}
