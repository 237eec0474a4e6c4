//! Zoom-driven show/hide rules for renderable layers.
//!
//! Independent of the navigation graph: rules are registered once at setup
//! and live for the session; only their show/hide state changes with zoom.

use log::warn;

/// Opaque handle of one renderable layer owned by the rendering
/// collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayerId(pub u64);

/// The rendering surface the engine drives. `contains` is queried before
/// every mutation, so repeated evaluations on the same side of a zoom bound
/// cause no add/remove churn.
pub trait LayerHost {
    fn contains(&self, layer: LayerId) -> bool;
    fn show(&mut self, layer: LayerId);
    fn hide(&mut self, layer: LayerId);
}

#[derive(Debug, Clone, Copy)]
pub struct VisibilityRule {
    pub layer: LayerId,
    pub min_zoom: Option<f64>,
    pub max_zoom: Option<f64>,
}

impl VisibilityRule {
    fn visible_at(&self, zoom: f64) -> bool {
        self.min_zoom.is_none_or(|min| zoom >= min) && self.max_zoom.is_none_or(|max| zoom <= max)
    }
}

pub struct VisibilityEngine {
    rules: Vec<VisibilityRule>,
    zoom: f64,
}

impl VisibilityEngine {
    pub fn new(initial_zoom: f64) -> Self {
        Self {
            rules: Vec::new(),
            zoom: initial_zoom,
        }
    }

    /// Registers a rule and immediately evaluates it at the current zoom.
    pub fn add_rule(
        &mut self,
        host: &mut dyn LayerHost,
        layer: LayerId,
        min_zoom: Option<f64>,
        max_zoom: Option<f64>,
    ) {
        if min_zoom.is_none() && max_zoom.is_none() {
            warn!("Visibility rule for {layer:?} has no zoom bounds and will never hide it");
        }
        let rule = VisibilityRule {
            layer,
            min_zoom,
            max_zoom,
        };
        Self::apply(host, &rule, self.zoom);
        self.rules.push(rule);
    }

    /// Re-evaluates every rule against the new zoom level.
    pub fn on_zoom_changed(&mut self, host: &mut dyn LayerHost, zoom: f64) {
        self.zoom = zoom;
        for rule in &self.rules {
            Self::apply(host, rule, zoom);
        }
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    fn apply(host: &mut dyn LayerHost, rule: &VisibilityRule, zoom: f64) {
        let should_show = rule.visible_at(zoom);
        let present = host.contains(rule.layer);
        if should_show && !present {
            host.show(rule.layer);
        } else if !should_show && present {
            host.hide(rule.layer);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hashbrown::HashSet;

    #[derive(Default)]
    struct RecordingHost {
        present: HashSet<LayerId>,
        shows: usize,
        hides: usize,
    }

    impl LayerHost for RecordingHost {
        fn contains(&self, layer: LayerId) -> bool {
            self.present.contains(&layer)
        }

        fn show(&mut self, layer: LayerId) {
            self.present.insert(layer);
            self.shows += 1;
        }

        fn hide(&mut self, layer: LayerId) {
            self.present.remove(&layer);
            self.hides += 1;
        }
    }

    #[test]
    fn rule_is_evaluated_on_registration() {
        let mut host = RecordingHost::default();
        let mut engine = VisibilityEngine::new(12.0);

        engine.add_rule(&mut host, LayerId(1), Some(10.0), None);
        assert!(host.contains(LayerId(1)));

        engine.add_rule(&mut host, LayerId(2), Some(14.0), None);
        assert!(!host.contains(LayerId(2)));
    }

    #[test]
    fn zoom_changes_toggle_layers_at_bounds() {
        let mut host = RecordingHost::default();
        let mut engine = VisibilityEngine::new(12.0);
        engine.add_rule(&mut host, LayerId(1), Some(10.0), Some(15.0));

        engine.on_zoom_changed(&mut host, 9.0);
        assert!(!host.contains(LayerId(1)));
        engine.on_zoom_changed(&mut host, 10.0); // inclusive lower bound
        assert!(host.contains(LayerId(1)));
        engine.on_zoom_changed(&mut host, 15.0); // inclusive upper bound
        assert!(host.contains(LayerId(1)));
        engine.on_zoom_changed(&mut host, 15.5);
        assert!(!host.contains(LayerId(1)));
    }

    #[test]
    fn repeated_evaluation_does_not_churn() {
        let mut host = RecordingHost::default();
        let mut engine = VisibilityEngine::new(12.0);
        engine.add_rule(&mut host, LayerId(1), Some(10.0), None);

        for zoom in [12.5, 13.0, 14.0] {
            engine.on_zoom_changed(&mut host, zoom);
        }
        assert_eq!(host.shows, 1);
        assert_eq!(host.hides, 0);
    }

    #[test]
    fn unbounded_rule_is_always_visible() {
        let mut host = RecordingHost::default();
        let mut engine = VisibilityEngine::new(1.0);
        engine.add_rule(&mut host, LayerId(1), None, None);

        engine.on_zoom_changed(&mut host, 99.0);
        assert!(host.contains(LayerId(1)));
        assert_eq!(host.shows, 1);
    }
}
