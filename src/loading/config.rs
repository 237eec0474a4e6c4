use std::time::Duration;

use crate::Error;
use crate::model::geometry::METERS_PER_DEGREE;

/// Tunable policy values for graph construction, snapping, and input
/// debouncing. The defaults are the empirically tuned values; distance
/// tunables are meters and get converted to degree space internally.
#[derive(Debug, Clone)]
pub struct NavConfig {
    /// Radius within which two supplied coordinates are the same node.
    pub merge_epsilon_m: f64,
    /// How far a waypoint may sit from a path and still be detected as
    /// lying on it (geometric fallback only).
    pub on_path_threshold_m: f64,
    /// Distance budget for snapping a live position onto a road.
    pub snap_threshold_m: f64,
    /// How long the input aggregator waits for a near-simultaneous second
    /// key before resolving a directional intent.
    pub debounce_window: Duration,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            merge_epsilon_m: 1.0,
            on_path_threshold_m: 5.0,
            snap_threshold_m: 50.0,
            debounce_window: Duration::from_millis(100),
        }
    }
}

impl NavConfig {
    pub fn validate(&self) -> Result<(), Error> {
        for (name, value) in [
            ("merge_epsilon_m", self.merge_epsilon_m),
            ("on_path_threshold_m", self.on_path_threshold_m),
            ("snap_threshold_m", self.snap_threshold_m),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "{name} must be a positive finite number, got {value}"
                )));
            }
        }
        if self.debounce_window.is_zero() {
            return Err(Error::InvalidConfig(
                "debounce_window must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    pub(crate) fn merge_epsilon_degrees(&self) -> f64 {
        self.merge_epsilon_m / METERS_PER_DEGREE
    }

    pub(crate) fn on_path_threshold_degrees(&self) -> f64 {
        self.on_path_threshold_m / METERS_PER_DEGREE
    }

    pub(crate) fn snap_threshold_degrees(&self) -> f64 {
        self.snap_threshold_m / METERS_PER_DEGREE
    }
}
