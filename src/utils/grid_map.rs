// grid map definition for the pathfinding board

use std::fmt;

use itertools::iproduct;
use log::debug;
use rand::Rng;
extern crate nalgebra as na;

use crate::common::{GridNode, PathfindingError, PathfindingResult, Tile};

/// Square lattice of free/wall tiles with optional start and end markers.
///
/// Tiles are stored row-major as `(y, x)` in an `nalgebra` matrix.
/// A marker never sits on a wall: placing one clears the wall, and
/// walling a marked cell drops the marker.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    tiles: na::DMatrix<Tile>,
    start: Option<GridNode>,
    end: Option<GridNode>,
}

impl Grid {
    pub fn new(size: usize) -> PathfindingResult<Self> {
        if size == 0 {
            return Err(PathfindingError::InvalidParameter(
                "grid size must be >= 1".to_string(),
            ));
        }
        Ok(Self {
            tiles: na::DMatrix::from_element(size, size, Tile::Free),
            start: None,
            end: None,
        })
    }

    /// Parse a square board drawn with `.` free, `#` wall, `S` start and `E` end
    pub fn from_ascii(text: &str) -> PathfindingResult<Self> {
        let rows: Vec<&str> = text
            .lines()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
            .collect();
        let size = rows.len();
        if rows.iter().any(|r| r.chars().count() != size) {
            return Err(PathfindingError::InvalidParameter(
                "board rows must form a square".to_string(),
            ));
        }

        let mut grid = Grid::new(size)?;
        for (y, row) in rows.iter().enumerate() {
            for (x, c) in row.chars().enumerate() {
                let (x, y) = (x as i32, y as i32);
                match c {
                    '.' => {}
                    '#' => {
                        grid.set_wall(x, y, true);
                    }
                    'S' => {
                        grid.set_start(x, y);
                    }
                    'E' => {
                        grid.set_end(x, y);
                    }
                    other => {
                        return Err(PathfindingError::InvalidParameter(format!(
                            "unknown board symbol '{}' at ({}, {})",
                            other, x, y
                        )))
                    }
                }
            }
        }
        Ok(grid)
    }

    pub fn size(&self) -> usize {
        self.tiles.nrows()
    }

    pub fn in_bounds(&self, node: GridNode) -> bool {
        let size = self.size() as i32;
        node.x >= 0 && node.y >= 0 && node.x < size && node.y < size
    }

    pub fn tile(&self, node: GridNode) -> Option<Tile> {
        if self.in_bounds(node) {
            Some(self.tiles[(node.y as usize, node.x as usize)])
        } else {
            None
        }
    }

    /// Out-of-bounds cells count as blocked
    pub fn is_wall(&self, node: GridNode) -> bool {
        self.tile(node).map_or(true, |t| t == Tile::Wall)
    }

    pub fn start(&self) -> Option<GridNode> {
        self.start
    }

    pub fn end(&self) -> Option<GridNode> {
        self.end
    }

    /// Flip the tile at (x, y). Returns false for out-of-bounds coordinates.
    pub fn toggle_wall(&mut self, x: i32, y: i32) -> bool {
        let node = GridNode::new(x, y);
        match self.tile(node) {
            Some(Tile::Wall) => self.set_wall(x, y, false),
            Some(Tile::Free) => self.set_wall(x, y, true),
            None => false,
        }
    }

    pub fn set_wall(&mut self, x: i32, y: i32, wall: bool) -> bool {
        let node = GridNode::new(x, y);
        if !self.in_bounds(node) {
            return false;
        }
        if wall {
            self.drop_markers_at(node);
            self.put(node, Tile::Wall);
        } else {
            self.put(node, Tile::Free);
        }
        true
    }

    pub fn set_start(&mut self, x: i32, y: i32) -> bool {
        let node = GridNode::new(x, y);
        if !self.in_bounds(node) {
            return false;
        }
        self.put(node, Tile::Free);
        self.start = Some(node);
        true
    }

    pub fn set_end(&mut self, x: i32, y: i32) -> bool {
        let node = GridNode::new(x, y);
        if !self.in_bounds(node) {
            return false;
        }
        self.put(node, Tile::Free);
        self.end = Some(node);
        true
    }

    pub fn clear_start(&mut self) {
        self.start = None;
    }

    pub fn clear_end(&mut self) {
        self.end = None;
    }

    /// Remove every wall and both markers
    pub fn reset(&mut self) {
        self.tiles.fill(Tile::Free);
        self.start = None;
        self.end = None;
    }

    pub fn clear_walls(&mut self) {
        self.tiles.fill(Tile::Free);
    }

    /// Turn each free unmarked cell into a wall with probability `density`
    pub fn fill_random<R: Rng + ?Sized>(&mut self, density: f64, rng: &mut R) -> PathfindingResult<usize> {
        if !(0.0..=1.0).contains(&density) {
            return Err(PathfindingError::InvalidParameter(format!(
                "wall density {} outside [0, 1]",
                density
            )));
        }
        let mut placed = 0;
        for node in self.nodes().collect::<Vec<_>>() {
            if self.is_marker(node) || self.is_wall(node) {
                continue;
            }
            if rng.gen_bool(density) {
                self.put(node, Tile::Wall);
                placed += 1;
            }
        }
        debug!("placed {} random walls at density {}", placed, density);
        Ok(placed)
    }

    /// Every coordinate on the board, row by row
    pub fn nodes(&self) -> impl Iterator<Item = GridNode> {
        let size = self.size() as i32;
        iproduct!(0..size, 0..size).map(|(y, x)| GridNode::new(x, y))
    }

    pub fn walls(&self) -> impl Iterator<Item = GridNode> + '_ {
        self.nodes().filter(move |n| self.is_wall(*n))
    }

    pub fn wall_count(&self) -> usize {
        self.tiles.iter().filter(|t| **t == Tile::Wall).count()
    }

    fn is_marker(&self, node: GridNode) -> bool {
        self.start == Some(node) || self.end == Some(node)
    }

    fn drop_markers_at(&mut self, node: GridNode) {
        if self.start == Some(node) {
            self.start = None;
        }
        if self.end == Some(node) {
            self.end = None;
        }
    }

    fn put(&mut self, node: GridNode, tile: Tile) {
        self.tiles[(node.y as usize, node.x as usize)] = tile;
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let size = self.size() as i32;
        for y in 0..size {
            for x in 0..size {
                let node = GridNode::new(x, y);
                let c = if self.start == Some(node) {
                    'S'
                } else if self.end == Some(node) {
                    'E'
                } else if self.is_wall(node) {
                    '#'
                } else {
                    '.'
                };
                write!(f, "{}", c)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_zero_size_rejected() {
        assert!(matches!(Grid::new(0), Err(PathfindingError::InvalidParameter(_))));
    }

    #[test]
    fn test_toggle_wall_round_trip() {
        let mut grid = Grid::new(4).unwrap();
        assert!(grid.toggle_wall(1, 2));
        assert!(grid.is_wall(GridNode::new(1, 2)));
        assert!(grid.toggle_wall(1, 2));
        assert!(!grid.is_wall(GridNode::new(1, 2)));
    }

    #[test]
    fn test_out_of_bounds_edits_are_noops() {
        let mut grid = Grid::new(3).unwrap();
        let before = grid.clone();
        assert!(!grid.toggle_wall(-1, 0));
        assert!(!grid.toggle_wall(3, 0));
        assert!(!grid.set_start(0, 5));
        assert!(!grid.set_end(7, 7));
        assert_eq!(grid, before);
    }

    #[test]
    fn test_wall_on_marker_clears_marker() {
        let mut grid = Grid::new(5).unwrap();
        grid.set_start(0, 0);
        grid.set_end(4, 4);
        grid.toggle_wall(0, 0);
        assert_eq!(grid.start(), None);
        assert!(grid.is_wall(GridNode::new(0, 0)));
        grid.toggle_wall(4, 4);
        assert_eq!(grid.end(), None);
    }

    #[test]
    fn test_marker_clears_wall() {
        let mut grid = Grid::new(5).unwrap();
        grid.set_wall(2, 2, true);
        grid.set_end(2, 2);
        assert!(!grid.is_wall(GridNode::new(2, 2)));
        assert_eq!(grid.end(), Some(GridNode::new(2, 2)));
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut grid = Grid::new(5).unwrap();
        grid.set_wall(1, 1, true);
        grid.set_start(0, 0);
        grid.set_end(4, 4);
        grid.reset();
        assert_eq!(grid.wall_count(), 0);
        assert_eq!(grid.start(), None);
        assert_eq!(grid.end(), None);
    }

    #[test]
    fn test_ascii_round_trip() {
        let board = "S..\n.#.\n..E\n";
        let grid = Grid::from_ascii(board).unwrap();
        assert_eq!(grid.size(), 3);
        assert_eq!(grid.start(), Some(GridNode::new(0, 0)));
        assert_eq!(grid.end(), Some(GridNode::new(2, 2)));
        assert_eq!(grid.walls().collect::<Vec<_>>(), vec![GridNode::new(1, 1)]);
        assert_eq!(grid.to_string(), board);
    }

    #[test]
    fn test_ascii_rejects_ragged_board() {
        assert!(Grid::from_ascii("...\n..\n...").is_err());
        assert!(Grid::from_ascii("..\n.?").is_err());
    }

    #[test]
    fn test_fill_random_skips_markers() {
        let mut grid = Grid::new(10).unwrap();
        grid.set_start(0, 0);
        grid.set_end(9, 9);
        let mut rng = StdRng::seed_from_u64(7);
        let placed = grid.fill_random(1.0, &mut rng).unwrap();
        assert_eq!(placed, 98);
        assert_eq!(grid.start(), Some(GridNode::new(0, 0)));
        assert!(!grid.is_wall(GridNode::new(9, 9)));
        assert!(grid.fill_random(1.5, &mut rng).is_err());
    }
}
