//! Common types, traits, and error definitions for cyder_pathfinder
//!
//! This module provides the foundational building blocks shared by the
//! grid model, the search engine and the animation drivers.

pub mod types;
pub mod traits;
pub mod error;

pub use types::*;
pub use traits::*;
pub use error::*;
