//! Discrete directional movement over the navigation graph.

mod direction;
mod selector;

pub use direction::Direction;
pub use selector::resolve;
