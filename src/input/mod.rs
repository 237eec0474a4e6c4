//! Merging raw key events into single directional intents.

mod aggregator;
mod keys;

pub use aggregator::{InputAggregator, InputEffect, InputEvent, TimerToken};
pub use keys::NavKey;
