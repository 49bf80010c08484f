//! Visualization utilities for cyder_pathfinder
//!
//! Renders board snapshots with gnuplot: walls, search marks, the revealed
//! path and both markers.

use gnuplot::{AutoOption, AxesCommon, Caption, Color, Figure, LineWidth, PointSize, PointSymbol};

use crate::common::{GridNode, PathfindingError, PathfindingResult};
use crate::session::Session;
use crate::utils::Grid;

/// Color palette for consistent styling
pub mod colors {
    pub const BLACK: &str = "#000000";
    pub const RED: &str = "#FF0000";
    pub const GREEN: &str = "#00FF00";
    pub const BLUE: &str = "#0000FF";
    pub const CYAN: &str = "#00FFFF";
    pub const GRAY: &str = "#808080";

    // Semantic colors
    pub const WALL: &str = BLACK;
    pub const START: &str = GREEN;
    pub const END: &str = BLUE;
    pub const PATH: &str = RED;
    pub const OPEN: &str = CYAN;
    pub const CLOSED: &str = GRAY;
}

/// Style for path rendering
#[derive(Debug, Clone)]
pub struct PathStyle {
    pub color: String,
    pub line_width: f64,
    pub caption: String,
}

impl PathStyle {
    pub fn new(color: &str, caption: &str) -> Self {
        Self {
            color: color.to_string(),
            line_width: 2.0,
            caption: caption.to_string(),
        }
    }

    pub fn with_line_width(mut self, width: f64) -> Self {
        self.line_width = width;
        self
    }
}

impl Default for PathStyle {
    fn default() -> Self {
        Self::new(colors::PATH, "Path")
    }
}

/// Style for cell markers
#[derive(Debug, Clone)]
pub struct PointStyle {
    pub color: String,
    pub size: f64,
    pub symbol: char,
    pub caption: String,
}

impl PointStyle {
    pub fn new(color: &str, caption: &str) -> Self {
        Self {
            color: color.to_string(),
            size: 1.0,
            symbol: 'S',
            caption: caption.to_string(),
        }
    }

    pub fn with_size(mut self, size: f64) -> Self {
        self.size = size;
        self
    }

    pub fn with_symbol(mut self, symbol: char) -> Self {
        self.symbol = symbol;
        self
    }
}

/// Board plotter
pub struct Visualizer {
    figure: Figure,
    title: String,
    range: Option<(f64, f64)>,
}

impl Visualizer {
    pub fn new() -> Self {
        Self {
            figure: Figure::new(),
            title: String::new(),
            range: None,
        }
    }

    pub fn set_title(&mut self, title: &str) -> &mut Self {
        self.title = title.to_string();
        self
    }

    /// Fix both axes to cover a board of `size` cells
    pub fn set_board_size(&mut self, size: usize) -> &mut Self {
        self.range = Some((-1.0, size as f64));
        self
    }

    pub fn plot_cells(&mut self, cells: &[GridNode], style: &PointStyle) -> &mut Self {
        if cells.is_empty() {
            return self;
        }
        let x: Vec<f64> = cells.iter().map(|n| n.x as f64).collect();
        let y: Vec<f64> = cells.iter().map(|n| n.y as f64).collect();
        self.figure.axes2d().points(&x, &y, &[
            Caption(&style.caption),
            Color(&style.color),
            PointSymbol(style.symbol),
            PointSize(style.size),
        ]);
        self
    }

    pub fn plot_walls(&mut self, grid: &Grid) -> &mut Self {
        let walls: Vec<GridNode> = grid.walls().collect();
        self.plot_cells(&walls, &PointStyle::new(colors::WALL, "Walls").with_size(1.2))
    }

    pub fn plot_path(&mut self, cells: &[GridNode], style: &PathStyle) -> &mut Self {
        if cells.is_empty() {
            return self;
        }
        let x: Vec<f64> = cells.iter().map(|n| n.x as f64).collect();
        let y: Vec<f64> = cells.iter().map(|n| n.y as f64).collect();
        self.figure.axes2d().lines(&x, &y, &[
            Caption(&style.caption),
            Color(&style.color),
            LineWidth(style.line_width),
        ]);
        self
    }

    pub fn plot_start(&mut self, node: GridNode) -> &mut Self {
        let style = PointStyle::new(colors::START, "Start").with_symbol('O').with_size(1.5);
        self.plot_cells(&[node], &style)
    }

    pub fn plot_end(&mut self, node: GridNode) -> &mut Self {
        let style = PointStyle::new(colors::END, "End").with_symbol('O').with_size(1.5);
        self.plot_cells(&[node], &style)
    }

    /// Draw everything a session currently shows
    pub fn plot_session(&mut self, session: &Session) -> &mut Self {
        let grid = session.grid();
        let search = session.search();
        let closed: Vec<GridNode> = grid.nodes().filter(|n| search.is_closed(*n)).collect();
        let open: Vec<GridNode> = grid.nodes().filter(|n| search.is_open(*n)).collect();

        self.set_board_size(grid.size());
        self.plot_walls(grid);
        self.plot_cells(&closed, &PointStyle::new(colors::CLOSED, "Closed").with_symbol('x'));
        self.plot_cells(&open, &PointStyle::new(colors::OPEN, "Open").with_symbol('o'));
        self.plot_path(session.driver().revealed_path(search), &PathStyle::default());
        if let Some(start) = grid.start() {
            self.plot_start(start);
        }
        if let Some(end) = grid.end() {
            self.plot_end(end);
        }
        self
    }

    pub fn show(&mut self) -> PathfindingResult<()> {
        self.apply_settings();
        self.figure
            .show()
            .map(|_| ())
            .map_err(|e| PathfindingError::VisualizationError(e.to_string()))
    }

    pub fn save_png(&mut self, path: &str, width: u32, height: u32) -> PathfindingResult<()> {
        self.apply_settings();
        self.figure
            .save_to_png(path, width, height)
            .map_err(|e| PathfindingError::VisualizationError(e.to_string()))
    }

    pub fn save_svg(&mut self, path: &str) -> PathfindingResult<()> {
        self.apply_settings();
        self.figure
            .save_to_svg(path, 800, 800)
            .map_err(|e| PathfindingError::VisualizationError(e.to_string()))
    }

    fn apply_settings(&mut self) {
        let axes = self.figure.axes2d();

        if !self.title.is_empty() {
            axes.set_title(&self.title, &[]);
        }
        axes.set_x_label("x", &[]);
        axes.set_y_label("y", &[]);
        if let Some((min, max)) = self.range {
            axes.set_x_range(AutoOption::Fix(min), AutoOption::Fix(max));
            // row 0 at the top, as on screen
            axes.set_y_range(AutoOption::Fix(max), AutoOption::Fix(min));
        }
        axes.set_aspect_ratio(AutoOption::Fix(1.0));
    }
}

impl Default for Visualizer {
    fn default() -> Self {
        Self::new()
    }
}
