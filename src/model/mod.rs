//! Data model for the navigation core
//!
//! Spatial primitives plus the navigation graph built from them.

pub mod geometry;
pub mod graph;

pub use geometry::{Junction, Path, SpatialPoint, Waypoint};
pub use graph::{NavGraph, NavNode, NodeId};
