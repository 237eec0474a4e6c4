//! Geometric algorithms over the raw path primitives.

pub mod snap;
