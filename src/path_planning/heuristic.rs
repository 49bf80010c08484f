//! Distance estimates used to order the open set

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::common::GridNode;

/// Heuristic selector.
///
/// Manhattan overestimates once diagonal moves are allowed; that pairing
/// is accepted as-is and only reported with a warning by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Heuristic {
    /// |dx| + |dy|
    Manhattan,
    /// sqrt(dx^2 + dy^2)
    Euclidean,
}

impl Heuristic {
    pub fn distance(&self, a: GridNode, b: GridNode) -> f64 {
        let dx = (a.x - b.x).abs() as f64;
        let dy = (a.y - b.y).abs() as f64;
        match self {
            Heuristic::Manhattan => dx + dy,
            Heuristic::Euclidean => dx.hypot(dy),
        }
    }

    pub fn is_admissible(&self, diagonal: bool) -> bool {
        !(diagonal && *self == Heuristic::Manhattan)
    }
}

impl Default for Heuristic {
    fn default() -> Self {
        Heuristic::Manhattan
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distances() {
        let a = GridNode::new(0, 0);
        let b = GridNode::new(3, 4);
        assert_eq!(Heuristic::Manhattan.distance(a, b), 7.0);
        assert!((Heuristic::Euclidean.distance(a, b) - 5.0).abs() < 1e-12);
        assert_eq!(Heuristic::Euclidean.distance(b, b), 0.0);
    }

    #[test]
    fn test_admissibility() {
        assert!(Heuristic::Manhattan.is_admissible(false));
        assert!(!Heuristic::Manhattan.is_admissible(true));
        assert!(Heuristic::Euclidean.is_admissible(true));
    }
}
