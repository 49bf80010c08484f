//! Pathfinding session: one board, one engine, one driver.
//!
//! The UI layer holds a `Session` and forwards edits, search requests and
//! elapsed time to it. Edits are refused while a search is running so the
//! frontier never sees a changing board.

use std::time::Duration;

use log::{info, warn};
use rand::Rng;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::animation::{AnimationConfig, AnimationDriver, AnimationEvent, DriverMode};
use crate::common::{CellView, GridNode, PathfindingError, PathfindingResult};
use crate::path_planning::{AStarSearch, SearchConfig, SearchState};
use crate::utils::Grid;

/// Default board edge length
pub const DEFAULT_SIZE: usize = 25;

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SessionConfig {
    pub size: usize,
    pub search: SearchConfig,
    pub animation: AnimationConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_SIZE,
            search: SearchConfig::default(),
            animation: AnimationConfig::default(),
        }
    }
}

impl SessionConfig {
    pub fn with_size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    pub fn with_search(mut self, search: SearchConfig) -> Self {
        self.search = search;
        self
    }

    pub fn with_animation(mut self, animation: AnimationConfig) -> Self {
        self.animation = animation;
        self
    }
}

#[derive(Debug)]
pub struct Session {
    grid: Grid,
    search: AStarSearch,
    driver: AnimationDriver,
}

impl Session {
    pub fn new(config: SessionConfig) -> PathfindingResult<Self> {
        Ok(Self {
            grid: Grid::new(config.size)?,
            search: AStarSearch::new(config.search),
            driver: AnimationDriver::new(config.animation)?,
        })
    }

    /// Wrap an existing board, e.g. one parsed with [`Grid::from_ascii`]
    pub fn with_grid(grid: Grid, search: SearchConfig, animation: AnimationConfig) -> PathfindingResult<Self> {
        Ok(Self {
            grid,
            search: AStarSearch::new(search),
            driver: AnimationDriver::new(animation)?,
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn search(&self) -> &AStarSearch {
        &self.search
    }

    pub fn driver(&self) -> &AnimationDriver {
        &self.driver
    }

    pub fn state(&self) -> SearchState {
        self.search.state()
    }

    pub fn toggle_wall(&mut self, x: i32, y: i32) -> PathfindingResult<bool> {
        self.ensure_idle()?;
        let changed = self.grid.toggle_wall(x, y);
        if changed {
            self.clear_search();
        }
        Ok(changed)
    }

    pub fn set_start(&mut self, x: i32, y: i32) -> PathfindingResult<bool> {
        self.ensure_idle()?;
        let changed = self.grid.set_start(x, y);
        if changed {
            self.clear_search();
        }
        Ok(changed)
    }

    pub fn set_end(&mut self, x: i32, y: i32) -> PathfindingResult<bool> {
        self.ensure_idle()?;
        let changed = self.grid.set_end(x, y);
        if changed {
            self.clear_search();
        }
        Ok(changed)
    }

    pub fn randomize_walls<R: Rng + ?Sized>(&mut self, density: f64, rng: &mut R) -> PathfindingResult<usize> {
        self.ensure_idle()?;
        self.clear_search();
        self.grid.clear_walls();
        self.grid.fill_random(density, rng)
    }

    /// Clear the board, markers, search marks and playback. Always allowed.
    pub fn reset(&mut self) {
        self.driver.reset();
        self.search.reset();
        self.grid.reset();
        info!("session reset");
    }

    pub fn set_search_config(&mut self, config: SearchConfig) -> PathfindingResult<()> {
        self.ensure_idle()?;
        self.search.set_config(config);
        Ok(())
    }

    pub fn set_animation_config(&mut self, config: AnimationConfig) -> PathfindingResult<()> {
        self.driver.set_config(config)
    }

    pub fn start_search(&mut self, mode: DriverMode) -> PathfindingResult<Vec<AnimationEvent>> {
        match self.driver.start(mode, &mut self.search, &self.grid) {
            Ok(events) => Ok(events),
            Err(e) => {
                if e.is_recoverable() {
                    warn!("cannot start search: {}", e);
                }
                Err(e)
            }
        }
    }

    pub fn tick(&mut self, dt: Duration) -> Vec<AnimationEvent> {
        self.driver.advance(dt, &mut self.search, &self.grid)
    }

    /// Stop animation and cancel a running search; marks stay on the board
    pub fn stop(&mut self) {
        self.driver.stop(&mut self.search);
    }

    pub fn cell_view(&self, x: i32, y: i32) -> Option<CellView> {
        let node = GridNode::new(x, y);
        if !self.grid.in_bounds(node) {
            return None;
        }
        let view = if self.grid.start() == Some(node) {
            CellView::Start
        } else if self.grid.end() == Some(node) {
            CellView::End
        } else if self.driver.revealed_path(&self.search).contains(&node) {
            CellView::Path
        } else if self.grid.is_wall(node) {
            CellView::Wall
        } else if self.search.is_closed(node) {
            CellView::Closed
        } else if self.search.is_open(node) {
            CellView::Open
        } else {
            CellView::Free
        };
        Some(view)
    }

    /// Text frame of the current board, one symbol per cell
    pub fn render_ascii(&self) -> String {
        let size = self.grid.size() as i32;
        let mut out = String::with_capacity((size as usize + 1) * size as usize);
        for y in 0..size {
            for x in 0..size {
                if let Some(view) = self.cell_view(x, y) {
                    out.push(view.symbol());
                }
            }
            out.push('\n');
        }
        out
    }

    fn ensure_idle(&self) -> PathfindingResult<()> {
        if self.search.is_searching() {
            warn!("board edit refused while searching");
            return Err(PathfindingError::SearchInProgress);
        }
        Ok(())
    }

    fn clear_search(&mut self) {
        self.driver.reset();
        self.search.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path_planning::SearchOutcome;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn session(size: usize) -> Session {
        Session::new(SessionConfig::default().with_size(size)).unwrap()
    }

    #[test]
    fn test_default_board_size() {
        let s = Session::new(SessionConfig::default()).unwrap();
        assert_eq!(s.grid().size(), DEFAULT_SIZE);
    }

    #[test]
    fn test_search_without_markers_is_recoverable() {
        let mut s = session(5);
        let err = s.start_search(DriverMode::Instant).unwrap_err();
        assert!(matches!(err, PathfindingError::NotConfigured(_)));
        assert_eq!(s.state(), SearchState::Idle);
    }

    #[test]
    fn test_edits_refused_while_searching() {
        let mut s = session(6);
        s.set_start(0, 0).unwrap();
        s.set_end(5, 5).unwrap();
        s.start_search(DriverMode::Stepped).unwrap();
        assert!(matches!(s.toggle_wall(2, 2), Err(PathfindingError::SearchInProgress)));
        assert!(matches!(s.set_start(1, 1), Err(PathfindingError::SearchInProgress)));
        s.stop();
        assert_eq!(s.toggle_wall(2, 2).unwrap(), true);
    }

    #[test]
    fn test_moving_marker_clears_path() {
        let mut s = session(5);
        s.set_start(0, 0).unwrap();
        s.set_end(4, 4).unwrap();
        s.start_search(DriverMode::Instant).unwrap();
        assert!(s.search().path().is_some());
        s.set_end(3, 3).unwrap();
        assert!(s.search().path().is_none());
        assert!(!s.driver().is_animating());
        assert_eq!(s.state(), SearchState::Idle);
    }

    #[test]
    fn test_out_of_bounds_edit_is_noop() {
        let mut s = session(5);
        assert_eq!(s.toggle_wall(9, 9).unwrap(), false);
        assert_eq!(s.cell_view(9, 9), None);
    }

    #[test]
    fn test_stepped_render_shows_progress_and_path() {
        let mut s = session(5);
        s.set_start(0, 0).unwrap();
        s.set_end(4, 0).unwrap();
        s.start_search(DriverMode::Stepped).unwrap();
        s.tick(Duration::from_millis(25));
        assert_eq!(s.cell_view(0, 1), Some(CellView::Open));
        assert_eq!(s.cell_view(0, 0), Some(CellView::Start));

        let events = s.tick(Duration::from_secs(1));
        assert!(events
            .iter()
            .any(|e| matches!(e, AnimationEvent::Finished(SearchOutcome::PathFound(_)))));
        s.tick(Duration::from_millis(120));
        assert_eq!(s.cell_view(1, 0), Some(CellView::Path));
        let frame = s.render_ascii();
        assert_eq!(frame.lines().count(), 5);
        assert!(frame.starts_with("S*"));
    }

    #[test]
    fn test_reset_clears_board_and_marks() {
        let mut s = session(5);
        s.set_start(0, 0).unwrap();
        s.set_end(4, 4).unwrap();
        s.toggle_wall(2, 2).unwrap();
        s.start_search(DriverMode::Instant).unwrap();
        s.reset();
        assert_eq!(s.grid().wall_count(), 0);
        assert_eq!(s.grid().start(), None);
        assert_eq!(s.render_ascii(), ".....\n".repeat(5));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_config_from_json() {
        let config = SessionConfig::default().with_size(12);
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"size\":12"));
        let parsed: SessionConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_randomize_walls_keeps_markers() {
        let mut s = session(8);
        s.set_start(0, 0).unwrap();
        s.set_end(7, 7).unwrap();
        let mut rng = StdRng::seed_from_u64(11);
        s.randomize_walls(0.4, &mut rng).unwrap();
        assert_eq!(s.grid().start(), Some(GridNode::new(0, 0)));
        assert_eq!(s.grid().end(), Some(GridNode::new(7, 7)));
        assert!(s.grid().wall_count() > 0);
    }
}
