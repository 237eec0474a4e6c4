//! Coordinator owning the shared gameplay state: the active graph, the
//! retained path snapshot, and the player's current position. Everything
//! runs on one logical thread; external effects leave as typed commands the
//! host applies in arrival order.

use std::time::Duration;

use log::{debug, info};

use crate::Error;
use crate::algo::snap::snap_to_paths;
use crate::input::{InputAggregator, InputEffect, InputEvent, TimerToken};
use crate::loading::{GeometryBundle, NavConfig, build_navigation_graph};
use crate::model::{NavGraph, Path, SpatialPoint};
use crate::movement::{self, Direction};

/// Outbound command to the rendering/input host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Recenter the viewport on this point, keeping the current zoom.
    Recenter(SpatialPoint),
    /// The player's resolved position changed. `direction` is set for
    /// directional moves and absent for snap corrections.
    PositionChanged {
        point: SpatialPoint,
        direction: Option<Direction>,
    },
    /// Schedule the input debounce callback.
    ScheduleDebounce { token: TimerToken, delay: Duration },
    /// Cancel a previously scheduled debounce callback.
    CancelDebounce { token: TimerToken },
}

pub struct NavEngine {
    config: NavConfig,
    graph: NavGraph,
    /// Paths of the installed snapshot, retained for live snapping.
    paths: Vec<Path>,
    position: Option<SpatialPoint>,
    input: InputAggregator,
    input_armed: bool,
}

impl NavEngine {
    /// # Errors
    ///
    /// Returns an error for an invalid configuration. The engine must not
    /// proceed half-initialized.
    pub fn new(config: NavConfig) -> Result<Self, Error> {
        config.validate()?;
        Ok(Self {
            graph: NavGraph::new(config.merge_epsilon_degrees()),
            paths: Vec::new(),
            position: None,
            input: InputAggregator::new(config.debounce_window),
            input_armed: false,
            config,
        })
    }

    /// Builds a graph from `bundle` and replaces the previous one
    /// wholesale. Arms input handling the first time a non-empty graph is
    /// installed; re-arming is a no-op.
    pub fn install_graph(&mut self, bundle: &GeometryBundle) {
        self.graph = build_navigation_graph(bundle, &self.config);
        self.paths = bundle.paths.clone();
        if !self.input_armed && !self.graph.is_empty() {
            self.input.reset();
            self.input_armed = true;
            info!("Input handling armed");
        }
    }

    pub fn graph(&self) -> &NavGraph {
        &self.graph
    }

    pub fn position(&self) -> Option<SpatialPoint> {
        self.position
    }

    pub fn is_armed(&self) -> bool {
        self.input_armed
    }

    /// First fix. Deliberately not snapped: an out-of-range reading must
    /// not be silently relocated onto a distant road.
    pub fn set_initial_position(&mut self, point: SpatialPoint) {
        self.position = Some(point);
    }

    /// Live position update, snapped against the retained paths. Emits a
    /// notification only when the corrected position actually moved, so a
    /// stream of identical on-road fixes causes no redundant marker
    /// redraws.
    pub fn update_live_position(&mut self, point: SpatialPoint) -> Option<Command> {
        let corrected = snap_to_paths(point, &self.paths, self.config.snap_threshold_degrees());
        if self.position == Some(corrected) {
            return None;
        }
        self.position = Some(corrected);
        Some(Command::PositionChanged {
            point: corrected,
            direction: None,
        })
    }

    /// Resolves one directional query. A dead end (or no position yet)
    /// produces no commands; "no movement happened" is the only feedback.
    pub fn move_towards(&mut self, direction: Direction) -> Vec<Command> {
        let Some(position) = self.position else {
            return Vec::new();
        };
        let Some(target) = movement::resolve(&self.graph, position, direction) else {
            debug!("Dead end towards {direction:?}");
            return Vec::new();
        };

        // Directional moves land exactly on a graph node; no re-snapping
        let point = self.graph.node(target).point();
        self.position = Some(point);
        vec![
            Command::Recenter(point),
            Command::PositionChanged {
                point,
                direction: Some(direction),
            },
        ]
    }

    /// Feeds one raw input event through the aggregator. Ignored until a
    /// non-empty graph has armed input handling.
    pub fn handle_input(&mut self, event: InputEvent<'_>) -> Vec<Command> {
        if !self.input_armed {
            return Vec::new();
        }
        let mut commands = Vec::new();
        for effect in self.input.handle(event) {
            match effect {
                InputEffect::Schedule { token, delay } => {
                    commands.push(Command::ScheduleDebounce { token, delay });
                }
                InputEffect::Cancel { token } => {
                    commands.push(Command::CancelDebounce { token });
                }
                InputEffect::Dispatch(direction) => {
                    commands.extend(self.move_towards(direction));
                }
            }
        }
        commands
    }
}
