//! Error types for cyder_pathfinder

use std::fmt;

/// Main error type for grid editing, searching and rendering
#[derive(Debug)]
pub enum PathfindingError {
    /// Start or end marker missing; the search was not started
    NotConfigured(String),
    /// Operation requires an idle engine
    SearchInProgress,
    /// Invalid parameter
    InvalidParameter(String),
    /// I/O error
    IoError(std::io::Error),
    /// Visualization error
    VisualizationError(String),
}

impl fmt::Display for PathfindingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathfindingError::NotConfigured(msg) => write!(f, "Not configured: {}", msg),
            PathfindingError::SearchInProgress => write!(f, "A search is in progress"),
            PathfindingError::InvalidParameter(msg) => write!(f, "Invalid parameter: {}", msg),
            PathfindingError::IoError(e) => write!(f, "I/O error: {}", e),
            PathfindingError::VisualizationError(msg) => write!(f, "Visualization error: {}", msg),
        }
    }
}

impl std::error::Error for PathfindingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PathfindingError::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for PathfindingError {
    fn from(e: std::io::Error) -> Self {
        PathfindingError::IoError(e)
    }
}

impl PathfindingError {
    /// Errors the user can fix by editing the board
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            PathfindingError::NotConfigured(_) | PathfindingError::SearchInProgress
        )
    }
}

/// Result type alias for pathfinding operations
pub type PathfindingResult<T> = Result<T, PathfindingError>;
