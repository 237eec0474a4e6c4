// Re-export key components
pub use crate::algo::snap::snap_to_paths;
pub use crate::engine::{Command, NavEngine};
pub use crate::error::Error;
pub use crate::input::{InputEvent, TimerToken};
pub use crate::loading::{GeometryBundle, NavConfig, build_navigation_graph};
pub use crate::model::{Junction, NavGraph, NodeId, Path, SpatialPoint, Waypoint};
pub use crate::movement::Direction;
pub use crate::visibility::{LayerHost, LayerId, VisibilityEngine};
