//! Movement and connectivity core for a map-based exploration game.
//!
//! Turns raw geographic primitives (road paths, junction points, waypoint
//! points) into a traversable graph, snaps free-form positions onto it, and
//! answers discrete 8-way movement queries by picking the best-aligned graph
//! edge. Rendering, input sources, and geometry derivation are external
//! collaborators, wired up through typed events and commands.

pub mod algo;
pub mod engine;
mod error;
pub mod input;
pub mod loading;
pub mod model;
pub mod movement;
pub mod prelude;
pub mod visibility;

pub use engine::{Command, NavEngine};
pub use error::Error;
