//! Debounce/hold state machine over raw key events.
//!
//! The aggregator owns no real timer. It emits schedule/cancel effects and
//! the host event loop feeds the elapsed callback back in as an event.
//! Timer tokens are monotonic, so a callback from an already-canceled timer
//! identifies itself as stale instead of racing the current one; at most
//! one token is live at any time.

use std::time::Duration;

use hashbrown::HashMap;
use log::trace;

use super::keys::{NavKey, combine};
use crate::movement::Direction;

/// Identifies one scheduled debounce callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerToken(u64);

/// Inbound raw events from the input/host collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent<'a> {
    KeyDown(&'a str),
    KeyUp(&'a str),
    /// The debounce timer scheduled under this token fired.
    DebounceElapsed(TimerToken),
    /// The window lost input focus. Hard cancellation boundary: held keys
    /// are forgotten so a stuck key cannot cause runaway movement.
    FocusLost,
}

/// Outbound effects for the host event loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEffect {
    Schedule { token: TimerToken, delay: Duration },
    Cancel { token: TimerToken },
    Dispatch(Direction),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// No navigation keys held.
    Idle,
    /// First key(s) of a new sequence held; debounce timer pending.
    Collecting { pending: TimerToken },
    /// Debounce resolved; every repeat key-down dispatches immediately.
    Holding,
}

pub struct InputAggregator {
    window: Duration,
    /// Physical keys currently held (normalized id → intent).
    held: HashMap<String, NavKey>,
    phase: Phase,
    next_token: u64,
}

impl InputAggregator {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            held: HashMap::new(),
            phase: Phase::Idle,
            next_token: 0,
        }
    }

    /// Forgets all held keys and cancels any pending timer.
    pub fn reset(&mut self) -> Vec<InputEffect> {
        self.held.clear();
        let effects = match self.phase {
            Phase::Collecting { pending } => vec![InputEffect::Cancel { token: pending }],
            _ => Vec::new(),
        };
        self.phase = Phase::Idle;
        effects
    }

    pub fn is_idle(&self) -> bool {
        self.phase == Phase::Idle && self.held.is_empty()
    }

    pub fn handle(&mut self, event: InputEvent<'_>) -> Vec<InputEffect> {
        match event {
            InputEvent::KeyDown(key) => self.key_down(key),
            InputEvent::KeyUp(key) => self.key_up(key),
            InputEvent::DebounceElapsed(token) => self.debounce_elapsed(token),
            InputEvent::FocusLost => self.reset(),
        }
    }

    fn key_down(&mut self, key: &str) -> Vec<InputEffect> {
        let Some(intent) = NavKey::from_key_id(key) else {
            return Vec::new();
        };
        let repeat = self.held.insert(key.to_ascii_lowercase(), intent).is_some();

        match self.phase {
            Phase::Idle => {
                let token = self.fresh_token();
                self.phase = Phase::Collecting { pending: token };
                vec![InputEffect::Schedule {
                    token,
                    delay: self.window,
                }]
            }
            // An OS key-repeat means the real debounce window already
            // passed; resolve now instead of restarting the timer forever
            Phase::Collecting { pending } if repeat => {
                self.phase = Phase::Holding;
                let mut effects = vec![InputEffect::Cancel { token: pending }];
                effects.extend(self.dispatch());
                effects
            }
            // Restart the window to absorb a near-simultaneous diagonal combo
            Phase::Collecting { pending } => {
                let token = self.fresh_token();
                self.phase = Phase::Collecting { pending: token };
                vec![
                    InputEffect::Cancel { token: pending },
                    InputEffect::Schedule {
                        token,
                        delay: self.window,
                    },
                ]
            }
            // Covers OS key-repeat and a new key joining a sustained hold:
            // either way the combined intent dispatches immediately
            Phase::Holding => self.dispatch(),
        }
    }

    fn key_up(&mut self, key: &str) -> Vec<InputEffect> {
        if NavKey::from_key_id(key).is_none() {
            return Vec::new();
        }
        self.held.remove(&key.to_ascii_lowercase());
        if self.held.is_empty() {
            return self.reset();
        }
        Vec::new()
    }

    fn debounce_elapsed(&mut self, token: TimerToken) -> Vec<InputEffect> {
        match self.phase {
            Phase::Collecting { pending } if pending == token => {
                self.phase = Phase::Holding;
                self.dispatch()
            }
            _ => {
                trace!("Ignoring stale debounce timer {token:?}");
                Vec::new()
            }
        }
    }

    fn dispatch(&self) -> Vec<InputEffect> {
        combine(self.held.values().copied())
            .map(InputEffect::Dispatch)
            .into_iter()
            .collect()
    }

    fn fresh_token(&mut self) -> TimerToken {
        self.next_token += 1;
        TimerToken(self.next_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(100);

    fn schedule_token(effects: &[InputEffect]) -> TimerToken {
        effects
            .iter()
            .find_map(|e| match e {
                InputEffect::Schedule { token, .. } => Some(*token),
                _ => None,
            })
            .expect("a timer was scheduled")
    }

    #[test]
    fn single_key_dispatches_once_after_window() {
        let mut input = InputAggregator::new(WINDOW);

        let effects = input.handle(InputEvent::KeyDown("ArrowUp"));
        assert_eq!(effects.len(), 1);
        let token = schedule_token(&effects);

        let effects = input.handle(InputEvent::DebounceElapsed(token));
        assert_eq!(effects, vec![InputEffect::Dispatch(Direction::Up)]);

        // Held for another 200 ms with no repeats: nothing else happens
        assert!(input.handle(InputEvent::KeyUp("ArrowUp")).is_empty());
        assert!(input.is_idle());
    }

    #[test]
    fn near_simultaneous_combo_resolves_diagonally() {
        let mut input = InputAggregator::new(WINDOW);

        let first = input.handle(InputEvent::KeyDown("ArrowUp"));
        let first_token = schedule_token(&first);

        let second = input.handle(InputEvent::KeyDown("ArrowRight"));
        assert!(second.contains(&InputEffect::Cancel { token: first_token }));
        let second_token = schedule_token(&second);

        let effects = input.handle(InputEvent::DebounceElapsed(second_token));
        assert_eq!(effects, vec![InputEffect::Dispatch(Direction::UpRight)]);
    }

    #[test]
    fn stale_timer_is_ignored() {
        let mut input = InputAggregator::new(WINDOW);

        let effects = input.handle(InputEvent::KeyDown("ArrowUp"));
        let stale = schedule_token(&effects);
        input.handle(InputEvent::KeyDown("ArrowRight"));

        assert!(input.handle(InputEvent::DebounceElapsed(stale)).is_empty());
    }

    #[test]
    fn key_repeat_during_collection_resolves_immediately() {
        // A window longer than the OS key-repeat delay: the repeat itself
        // must end the collection phase, not push it out forever
        let mut input = InputAggregator::new(Duration::from_millis(600));

        let effects = input.handle(InputEvent::KeyDown("ArrowUp"));
        let token = schedule_token(&effects);

        let effects = input.handle(InputEvent::KeyDown("ArrowUp"));
        assert_eq!(
            effects,
            vec![
                InputEffect::Cancel { token },
                InputEffect::Dispatch(Direction::Up),
            ]
        );

        // Further repeats keep dispatching from Holding
        let effects = input.handle(InputEvent::KeyDown("ArrowUp"));
        assert_eq!(effects, vec![InputEffect::Dispatch(Direction::Up)]);
    }

    #[test]
    fn key_repeat_drives_continuous_movement() {
        let mut input = InputAggregator::new(WINDOW);

        let effects = input.handle(InputEvent::KeyDown("ArrowUp"));
        let token = schedule_token(&effects);
        input.handle(InputEvent::DebounceElapsed(token));

        // OS key-repeat while Holding
        let effects = input.handle(InputEvent::KeyDown("ArrowUp"));
        assert_eq!(effects, vec![InputEffect::Dispatch(Direction::Up)]);
        let effects = input.handle(InputEvent::KeyDown("ArrowUp"));
        assert_eq!(effects, vec![InputEffect::Dispatch(Direction::Up)]);
    }

    #[test]
    fn releasing_all_keys_returns_to_idle_and_cancels() {
        let mut input = InputAggregator::new(WINDOW);

        let effects = input.handle(InputEvent::KeyDown("ArrowUp"));
        let token = schedule_token(&effects);

        let effects = input.handle(InputEvent::KeyUp("ArrowUp"));
        assert_eq!(effects, vec![InputEffect::Cancel { token }]);
        assert!(input.is_idle());
    }

    #[test]
    fn focus_loss_is_a_hard_cancellation_boundary() {
        let mut input = InputAggregator::new(WINDOW);

        let effects = input.handle(InputEvent::KeyDown("ArrowUp"));
        let token = schedule_token(&effects);

        let effects = input.handle(InputEvent::FocusLost);
        assert_eq!(effects, vec![InputEffect::Cancel { token }]);
        assert!(input.is_idle());

        // The key-up for the cleared key arrives later; it must not
        // trigger any further resolution
        assert!(input.handle(InputEvent::KeyUp("ArrowUp")).is_empty());
        assert!(input.handle(InputEvent::DebounceElapsed(token)).is_empty());
        assert!(input.is_idle());
    }

    #[test]
    fn non_navigation_keys_are_ignored() {
        let mut input = InputAggregator::new(WINDOW);
        assert!(input.handle(InputEvent::KeyDown("Escape")).is_empty());
        assert!(input.handle(InputEvent::KeyUp("Escape")).is_empty());
        assert!(input.is_idle());
    }

    #[test]
    fn opposite_keys_cancel_into_no_dispatch() {
        let mut input = InputAggregator::new(WINDOW);

        input.handle(InputEvent::KeyDown("ArrowUp"));
        let effects = input.handle(InputEvent::KeyDown("ArrowDown"));
        let token = schedule_token(&effects);

        assert!(input.handle(InputEvent::DebounceElapsed(token)).is_empty());
    }

    #[test]
    fn new_key_during_hold_redirects_immediately() {
        let mut input = InputAggregator::new(WINDOW);

        let effects = input.handle(InputEvent::KeyDown("ArrowUp"));
        let token = schedule_token(&effects);
        input.handle(InputEvent::DebounceElapsed(token));

        let effects = input.handle(InputEvent::KeyDown("ArrowRight"));
        assert_eq!(effects, vec![InputEffect::Dispatch(Direction::UpRight)]);
    }

    #[test]
    fn wasd_aliases_share_the_physical_key_space() {
        let mut input = InputAggregator::new(WINDOW);

        let effects = input.handle(InputEvent::KeyDown("W"));
        let token = schedule_token(&effects);
        input.handle(InputEvent::DebounceElapsed(token));

        // Shift released mid-hold: "w" key-up must clear the same entry
        let effects = input.handle(InputEvent::KeyUp("w"));
        assert!(effects.is_empty());
        assert!(input.is_idle());
    }
}
