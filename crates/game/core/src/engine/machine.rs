//! Stack-based combat state machine.
//!
//! States are driven by explicit [`StateMachine::update`] calls from the
//! engine; nothing here depends on a frame loop.

use core::fmt;

/// Identifies a state on the stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StateName {
    Idle,
    Attack,
    Cast,
}

impl fmt::Display for StateName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.into())
    }
}

/// Result of advancing a state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StateUpdate {
    Continue,
    Complete,
}

/// Lifecycle hooks of a combat state.
pub trait CombatState: Send + fmt::Debug {
    fn name(&self) -> StateName;

    fn on_enter(&mut self) {}

    /// Advances the state by `dt` combat-clock seconds.
    fn on_update(&mut self, _dt: f64) -> StateUpdate {
        StateUpdate::Continue
    }

    fn on_exit(&mut self) {}
}

/// Waiting for the next action.
#[derive(Clone, Copy, Debug, Default)]
pub struct IdleState;

impl CombatState for IdleState {
    fn name(&self) -> StateName {
        StateName::Idle
    }
}

/// Resolving an instant skill.
#[derive(Clone, Copy, Debug, Default)]
pub struct AttackState;

impl CombatState for AttackState {
    fn name(&self) -> StateName {
        StateName::Attack
    }

    fn on_update(&mut self, _dt: f64) -> StateUpdate {
        StateUpdate::Complete
    }
}

/// Channelling a skill with a cast time.
#[derive(Clone, Copy, Debug)]
pub struct CastState {
    cast_time: f64,
    elapsed: f64,
}

impl CastState {
    pub fn new(cast_time: f64) -> Self {
        Self {
            cast_time,
            elapsed: 0.0,
        }
    }

    pub fn remaining(&self) -> f64 {
        (self.cast_time - self.elapsed).max(0.0)
    }
}

impl CombatState for CastState {
    fn name(&self) -> StateName {
        StateName::Cast
    }

    fn on_enter(&mut self) {
        self.elapsed = 0.0;
    }

    fn on_update(&mut self, dt: f64) -> StateUpdate {
        self.elapsed += dt;
        if self.elapsed >= self.cast_time {
            StateUpdate::Complete
        } else {
            StateUpdate::Continue
        }
    }
}

/// Stack of states. The bottom is always [`IdleState`], so there is always
/// exactly one current state.
#[derive(Debug)]
pub struct StateMachine {
    stack: Vec<Box<dyn CombatState>>,
}

impl StateMachine {
    pub fn new() -> Self {
        let mut idle: Box<dyn CombatState> = Box::new(IdleState);
        idle.on_enter();
        Self { stack: vec![idle] }
    }

    /// Exits the current state, then pushes and enters `state`.
    pub fn push(&mut self, state: Box<dyn CombatState>) {
        let mut state = state;
        if let Some(top) = self.stack.last_mut() {
            top.on_exit();
        }
        state.on_enter();
        self.stack.push(state);
    }

    /// Exits and removes the current state, then re-enters the one below.
    ///
    /// The bottom state is never removed; popping it returns `None`.
    pub fn pop(&mut self) -> Option<StateName> {
        if self.stack.len() <= 1 {
            return None;
        }
        let mut popped = self.stack.pop()?;
        popped.on_exit();
        if let Some(top) = self.stack.last_mut() {
            top.on_enter();
        }
        Some(popped.name())
    }

    /// Pops everything above the bottom state.
    pub fn reset(&mut self) {
        while self.pop().is_some() {}
    }

    pub fn update(&mut self, dt: f64) -> StateUpdate {
        match self.stack.last_mut() {
            Some(top) => top.on_update(dt),
            None => StateUpdate::Continue,
        }
    }

    pub fn current(&self) -> StateName {
        self.stack
            .last()
            .map_or(StateName::Idle, |state| state.name())
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    #[derive(Debug)]
    struct Recording {
        label: &'static str,
        log: Arc<Mutex<Vec<String>>>,
    }

    impl Recording {
        fn record(&self, hook: &str) {
            self.log
                .lock()
                .expect("log lock")
                .push(format!("{}:{hook}", self.label));
        }
    }

    impl CombatState for Recording {
        fn name(&self) -> StateName {
            StateName::Attack
        }

        fn on_enter(&mut self) {
            self.record("enter");
        }

        fn on_exit(&mut self) {
            self.record("exit");
        }
    }

    #[test]
    fn bottom_state_is_never_popped() {
        let mut machine = StateMachine::new();
        assert_eq!(machine.current(), StateName::Idle);
        assert_eq!(machine.pop(), None);
        assert_eq!(machine.depth(), 1);
    }

    #[test]
    fn push_and_pop_run_hooks_in_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut machine = StateMachine::new();
        machine.push(Box::new(Recording {
            label: "a",
            log: Arc::clone(&log),
        }));
        machine.push(Box::new(Recording {
            label: "b",
            log: Arc::clone(&log),
        }));
        assert_eq!(machine.pop(), Some(StateName::Attack));
        assert_eq!(machine.pop(), Some(StateName::Attack));
        assert_eq!(machine.current(), StateName::Idle);

        let log = log.lock().expect("log lock").clone();
        assert_eq!(
            log,
            vec!["a:enter", "a:exit", "b:enter", "b:exit", "a:enter", "a:exit"]
        );
    }

    #[test]
    fn cast_completes_after_cast_time() {
        let mut machine = StateMachine::new();
        machine.push(Box::new(CastState::new(1.5)));
        assert_eq!(machine.current(), StateName::Cast);
        assert_eq!(machine.update(1.0), StateUpdate::Continue);
        assert_eq!(machine.update(0.5), StateUpdate::Complete);

        machine.reset();
        assert_eq!(machine.current(), StateName::Idle);
    }

    #[test]
    fn attack_completes_immediately() {
        let mut machine = StateMachine::new();
        machine.push(Box::new(AttackState));
        assert_eq!(machine.update(0.0), StateUpdate::Complete);
    }
}
