use statig::{blocking::IntoStateMachineExt as _, prelude::*};

use crate::types::elapsed_ms;

#[derive(Clone, Copy, Debug)]
enum DebounceEvent {
    Sample {
        now_ms: u32,
        active: bool,
        debounce_ms: u16,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum DebounceEdge {
    Activated,
    Released,
}

#[derive(Clone, Copy, Debug, Default)]
struct DispatchContext {
    edge: Option<DebounceEdge>,
}

/// Per-sensor debounce: a differing sample is committed only when the last
/// committed change is at least `debounce_ms` old. Rejected samples are
/// dropped, not retried.
pub(crate) struct Debouncer {
    machine: statig::blocking::StateMachine<DebounceHsm>,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new()
    }
}

impl Debouncer {
    pub(crate) fn new() -> Self {
        Self {
            machine: DebounceHsm::new().state_machine(),
        }
    }

    pub(crate) fn sample(
        &mut self,
        now_ms: u32,
        active: bool,
        debounce_ms: u16,
    ) -> Option<DebounceEdge> {
        let mut context = DispatchContext::default();
        self.machine.handle_with_context(
            &DebounceEvent::Sample {
                now_ms,
                active,
                debounce_ms,
            },
            &mut context,
        );
        context.edge
    }

    pub(crate) fn is_active(&self) -> bool {
        self.machine.inner().committed_active
    }

    pub(crate) fn last_change_ms(&self) -> u32 {
        self.machine.inner().last_change_ms
    }
}

struct DebounceHsm {
    committed_active: bool,
    last_change_ms: u32,
}

impl DebounceHsm {
    fn new() -> Self {
        Self {
            committed_active: false,
            last_change_ms: 0,
        }
    }

    fn quiet_since_last_change(&self, now_ms: u32, debounce_ms: u16) -> bool {
        elapsed_ms(now_ms, self.last_change_ms) >= debounce_ms as u32
    }

    fn commit(&mut self, context: &mut DispatchContext, now_ms: u32, active: bool) {
        self.committed_active = active;
        self.last_change_ms = now_ms;
        context.edge = Some(if active {
            DebounceEdge::Activated
        } else {
            DebounceEdge::Released
        });
    }
}

#[state_machine(initial = "State::inactive()")]
impl DebounceHsm {
    #[state]
    fn inactive(&mut self, context: &mut DispatchContext, event: &DebounceEvent) -> Outcome<State> {
        match event {
            DebounceEvent::Sample {
                now_ms,
                active,
                debounce_ms,
            } => {
                if *active && self.quiet_since_last_change(*now_ms, *debounce_ms) {
                    self.commit(context, *now_ms, true);
                    Transition(State::active())
                } else {
                    Handled
                }
            }
        }
    }

    #[state]
    fn active(&mut self, context: &mut DispatchContext, event: &DebounceEvent) -> Outcome<State> {
        match event {
            DebounceEvent::Sample {
                now_ms,
                active,
                debounce_ms,
            } => {
                if !*active && self.quiet_since_last_change(*now_ms, *debounce_ms) {
                    self.commit(context, *now_ms, false);
                    Transition(State::inactive())
                } else {
                    Handled
                }
            }
        }
    }
}
