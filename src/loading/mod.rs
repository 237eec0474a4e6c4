//! Inbound geometry snapshots and navigation graph construction.

mod builder;
mod config;

pub use builder::build_navigation_graph;
pub use config::NavConfig;

use serde::{Deserialize, Serialize};

use crate::Error;
use crate::model::{Junction, Path, Waypoint};

/// One snapshot of the visible region's geometry, as supplied by the
/// external fetch/derivation pipeline. Supplied once per graph build and
/// immutable afterwards.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeometryBundle {
    #[serde(default)]
    pub junctions: Vec<Junction>,
    #[serde(default)]
    pub waypoints: Vec<Waypoint>,
    #[serde(default)]
    pub paths: Vec<Path>,
}

impl GeometryBundle {
    /// Parses the geometry source's JSON document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not valid JSON of the expected
    /// shape. Individually bad records inside a well-formed document are the
    /// builder's concern, not the parser's.
    pub fn from_json(raw: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(raw)?)
    }
}
