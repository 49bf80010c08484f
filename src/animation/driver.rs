//! Drivers that feed the A* engine from timer ticks.
//!
//! Stepped mode performs one expansion per step tick. Instant mode runs the
//! search to completion up front. Either way a found path is then replayed
//! cell by cell on a second timer, looping until stopped or reset.

use std::time::Duration;

use log::{debug, info};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::animation::timer::Timer;
use crate::common::{GridNode, PathfindingResult};
use crate::path_planning::{AStarSearch, SearchOutcome, StepOutcome};
use crate::utils::Grid;

/// Timer intervals for both animation phases
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AnimationConfig {
    /// Delay between two expansions in stepped mode
    pub step_interval: Duration,
    /// Delay between two revealed path cells
    pub playback_interval: Duration,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            step_interval: Duration::from_millis(25),
            playback_interval: Duration::from_millis(60),
        }
    }
}

impl AnimationConfig {
    pub fn with_step_interval(mut self, interval: Duration) -> Self {
        self.step_interval = interval;
        self
    }

    pub fn with_playback_interval(mut self, interval: Duration) -> Self {
        self.playback_interval = interval;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DriverMode {
    /// One expansion per tick
    Stepped,
    /// Whole search at once, then playback
    Instant,
}

/// Something the caller should redraw
#[derive(Debug, Clone, PartialEq)]
pub enum AnimationEvent {
    Expanded(GridNode),
    Finished(SearchOutcome),
    PlaybackFrame { cursor: usize, node: GridNode },
}

#[derive(Debug, Clone)]
pub struct AnimationDriver {
    config: AnimationConfig,
    mode: Option<DriverMode>,
    step_timer: Timer,
    playback_timer: Timer,
    playback_cursor: Option<usize>,
}

impl AnimationDriver {
    pub fn new(config: AnimationConfig) -> PathfindingResult<Self> {
        Ok(Self {
            config,
            mode: None,
            step_timer: Timer::new(config.step_interval)?,
            playback_timer: Timer::new(config.playback_interval)?,
            playback_cursor: None,
        })
    }

    pub fn config(&self) -> &AnimationConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: AnimationConfig) -> PathfindingResult<()> {
        self.step_timer.set_interval(config.step_interval)?;
        self.playback_timer.set_interval(config.playback_interval)?;
        self.config = config;
        Ok(())
    }

    pub fn mode(&self) -> Option<DriverMode> {
        self.mode
    }

    pub fn is_animating(&self) -> bool {
        self.step_timer.is_running() || self.playback_timer.is_running()
    }

    pub fn is_playing_back(&self) -> bool {
        self.playback_timer.is_running()
    }

    pub fn playback_cursor(&self) -> Option<usize> {
        self.playback_cursor
    }

    /// Path cells revealed so far by playback
    pub fn revealed_path<'a>(&self, search: &'a AStarSearch) -> &'a [GridNode] {
        match (self.playback_cursor, search.path()) {
            (Some(cursor), Some(path)) if !path.is_empty() => {
                let end = cursor.min(path.len() - 1);
                &path.cells[..=end]
            }
            _ => &[],
        }
    }

    /// Begin a new search in `mode`.
    ///
    /// Instant mode returns the `Finished` event right away; stepped mode
    /// returns nothing and reports progress through [`AnimationDriver::advance`].
    pub fn start(
        &mut self,
        mode: DriverMode,
        search: &mut AStarSearch,
        grid: &Grid,
    ) -> PathfindingResult<Vec<AnimationEvent>> {
        search.begin(grid)?;
        self.reset();
        self.mode = Some(mode);

        match mode {
            DriverMode::Stepped => {
                self.step_timer.start();
                Ok(Vec::new())
            }
            DriverMode::Instant => {
                let outcome = search.run_to_completion(grid, &mut ());
                info!(
                    "instant search finished after {} expansions",
                    search.expansions()
                );
                if outcome.is_found() {
                    self.start_playback();
                }
                Ok(vec![AnimationEvent::Finished(outcome)])
            }
        }
    }

    /// Feed elapsed time and run every tick that became due
    pub fn advance(
        &mut self,
        dt: Duration,
        search: &mut AStarSearch,
        grid: &Grid,
    ) -> Vec<AnimationEvent> {
        let mut events = Vec::new();
        let was_playing = self.playback_timer.is_running();

        let steps = self.step_timer.advance(dt);
        for _ in 0..steps {
            match search.step(grid, &mut ()) {
                Some(StepOutcome::Expanded(node)) => events.push(AnimationEvent::Expanded(node)),
                Some(StepOutcome::Finished(outcome)) => {
                    self.step_timer.stop();
                    info!("stepped search finished after {} expansions", search.expansions());
                    if outcome.is_found() {
                        self.start_playback();
                    }
                    events.push(AnimationEvent::Finished(outcome));
                    break;
                }
                None => {
                    self.step_timer.stop();
                    break;
                }
            }
        }

        if was_playing {
            let frames = self.playback_timer.advance(dt) as usize;
            let len = search.path().map_or(0, |p| p.len());
            if frames > 0 && len == 0 {
                self.playback_timer.stop();
            } else if frames > 0 {
                // at most one full loop is reported; older frames are skipped
                let skipped = frames.saturating_sub(len);
                if skipped > 0 {
                    let cursor = self.playback_cursor.unwrap_or(0);
                    self.playback_cursor = Some((cursor + skipped) % len);
                }
                for _ in 0..frames.min(len) {
                    let cursor = self.playback_cursor.map_or(0, |c| (c + 1) % len);
                    self.playback_cursor = Some(cursor);
                    if let Some(node) = search.path().and_then(|p| p.cells.get(cursor)) {
                        events.push(AnimationEvent::PlaybackFrame { cursor, node: *node });
                    }
                }
            }
        }

        events
    }

    /// Stop both timers and cancel a running search. Nothing is rolled back.
    pub fn stop(&mut self, search: &mut AStarSearch) {
        self.step_timer.stop();
        self.playback_timer.stop();
        search.cancel();
    }

    /// Stop timers and forget playback progress
    pub fn reset(&mut self) {
        self.step_timer.stop();
        self.playback_timer.stop();
        self.playback_cursor = None;
        self.mode = None;
    }

    fn start_playback(&mut self) {
        debug!("path playback started");
        self.playback_cursor = Some(0);
        self.playback_timer.start();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::PathfindingError;
    use crate::path_planning::{Heuristic, SearchConfig, SearchState};

    fn board() -> Grid {
        let mut grid = Grid::new(5).unwrap();
        grid.set_start(0, 0);
        grid.set_end(4, 0);
        grid
    }

    fn driver() -> AnimationDriver {
        AnimationDriver::new(
            AnimationConfig::default()
                .with_step_interval(Duration::from_millis(10))
                .with_playback_interval(Duration::from_millis(20)),
        )
        .unwrap()
    }

    #[test]
    fn test_zero_interval_rejected() {
        let config = AnimationConfig::default().with_step_interval(Duration::ZERO);
        assert!(AnimationDriver::new(config).is_err());
    }

    #[test]
    fn test_stepped_mode_one_expansion_per_tick() {
        let grid = board();
        let mut search = AStarSearch::default();
        let mut driver = driver();
        assert!(driver.start(DriverMode::Stepped, &mut search, &grid).unwrap().is_empty());

        let events = driver.advance(Duration::from_millis(10), &mut search, &grid);
        assert_eq!(events, vec![AnimationEvent::Expanded(GridNode::new(0, 0))]);
        assert_eq!(search.expansions(), 1);

        let events = driver.advance(Duration::from_millis(25), &mut search, &grid);
        assert_eq!(events.len(), 2);
        assert_eq!(search.expansions(), 3);
        assert_eq!(search.state(), SearchState::Searching);
    }

    #[test]
    fn test_stepped_mode_finishes_then_plays_back() {
        let grid = board();
        let mut search = AStarSearch::default();
        let mut driver = driver();
        driver.start(DriverMode::Stepped, &mut search, &grid).unwrap();

        let events = driver.advance(Duration::from_secs(1), &mut search, &grid);
        let finished = events
            .iter()
            .filter(|e| matches!(e, AnimationEvent::Finished(SearchOutcome::PathFound(_))))
            .count();
        assert_eq!(finished, 1);
        assert!(driver.is_playing_back());
        assert_eq!(driver.revealed_path(&search), &[GridNode::new(0, 0)][..]);
    }

    #[test]
    fn test_instant_mode_playback_loops() {
        let grid = board();
        let mut search = AStarSearch::default();
        let mut driver = driver();
        let events = driver.start(DriverMode::Instant, &mut search, &grid).unwrap();
        assert!(matches!(events.as_slice(), [AnimationEvent::Finished(SearchOutcome::PathFound(_))]));
        assert_eq!(search.path().unwrap().len(), 5);
        assert_eq!(driver.playback_cursor(), Some(0));

        let events = driver.advance(Duration::from_millis(80), &mut search, &grid);
        let cursors: Vec<usize> = events
            .iter()
            .filter_map(|e| match e {
                AnimationEvent::PlaybackFrame { cursor, .. } => Some(*cursor),
                _ => None,
            })
            .collect();
        assert_eq!(cursors, vec![1, 2, 3, 4]);
        assert_eq!(driver.revealed_path(&search).len(), 5);

        let events = driver.advance(Duration::from_millis(20), &mut search, &grid);
        assert_eq!(
            events,
            vec![AnimationEvent::PlaybackFrame { cursor: 0, node: GridNode::new(0, 0) }]
        );
    }

    #[test]
    fn test_long_pause_reports_one_loop_of_playback() {
        let grid = board();
        let mut search = AStarSearch::default();
        let mut driver = driver();
        driver.start(DriverMode::Instant, &mut search, &grid).unwrap();

        let frames = 1_000_003u32;
        let events = driver.advance(Duration::from_millis(20) * frames, &mut search, &grid);
        assert_eq!(events.len(), 5);
        assert!(events.iter().all(|e| matches!(e, AnimationEvent::PlaybackFrame { .. })));
        assert_eq!(driver.playback_cursor(), Some(frames as usize % 5));
        assert_eq!(
            events.last(),
            Some(&AnimationEvent::PlaybackFrame { cursor: 3, node: GridNode::new(3, 0) })
        );
    }

    #[test]
    fn test_stepped_optimal_mode_runs_until_open_set_is_empty() {
        let grid = board();
        let config = SearchConfig::default()
            .with_heuristic(Heuristic::Euclidean)
            .with_optimal(true);
        let mut search = AStarSearch::new(config);
        let mut driver = driver();
        driver.start(DriverMode::Stepped, &mut search, &grid).unwrap();

        let mut end_reached_at = None;
        let mut finished = None;
        for tick in 0..100 {
            let events = driver.advance(Duration::from_millis(10), &mut search, &grid);
            assert!(events.len() <= 1);
            match events.first() {
                Some(AnimationEvent::Expanded(node)) if *node == GridNode::new(4, 0) => {
                    end_reached_at = Some(tick);
                    assert_eq!(search.state(), SearchState::Searching);
                    assert!(driver.is_animating());
                }
                Some(AnimationEvent::Finished(outcome)) => {
                    finished = Some((tick, outcome.clone()));
                    break;
                }
                _ => {}
            }
        }

        let end_tick = end_reached_at.expect("end should be expanded");
        let (finish_tick, outcome) = finished.expect("search should finish");
        assert!(finish_tick > end_tick + 1);
        assert_eq!(search.expansions(), 25);
        assert_eq!(outcome.path().map(|p| p.len()), Some(5));
        assert_eq!(search.state(), SearchState::PathFound);
        assert!(driver.is_playing_back());
    }

    #[test]
    fn test_instant_mode_without_path_does_not_play_back() {
        let mut grid = board();
        grid.set_wall(1, 0, true);
        grid.set_wall(0, 1, true);
        let mut search = AStarSearch::default();
        let mut driver = driver();
        let events = driver.start(DriverMode::Instant, &mut search, &grid).unwrap();
        assert_eq!(events, vec![AnimationEvent::Finished(SearchOutcome::PathNotFound)]);
        assert!(!driver.is_animating());
        assert!(driver.revealed_path(&search).is_empty());
    }

    #[test]
    fn test_not_configured_leaves_driver_idle() {
        let grid = Grid::new(5).unwrap();
        let mut search = AStarSearch::default();
        let mut driver = driver();
        let err = driver.start(DriverMode::Stepped, &mut search, &grid).unwrap_err();
        assert!(matches!(err, PathfindingError::NotConfigured(_)));
        assert!(!driver.is_animating());
        assert_eq!(driver.mode(), None);
    }

    #[test]
    fn test_stop_cancels_search() {
        let grid = board();
        let mut search = AStarSearch::default();
        let mut driver = driver();
        driver.start(DriverMode::Stepped, &mut search, &grid).unwrap();
        driver.advance(Duration::from_millis(20), &mut search, &grid);
        driver.stop(&mut search);
        assert_eq!(search.state(), SearchState::Idle);
        assert!(search.is_closed(GridNode::new(0, 0)));
        assert!(driver.advance(Duration::from_secs(1), &mut search, &grid).is_empty());
    }
}
