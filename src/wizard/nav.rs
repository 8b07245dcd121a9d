//! Step navigation for the wizard.
//!
//! [`WizardNav`] owns the current step and the navigation ceiling.
//! Transitions are pure: no I/O happens here, and nothing else moves the
//! wizard between steps. Completion of a step is derived from state, not
//! tracked separately.

use crate::wizard::session::{WizardState, FIRST_STEP, LAST_STEP};

#[derive(Debug, Clone, Copy)]
pub struct WizardNav {
    current: u8,
    /// Highest step reached so far; jumps may not go past it.
    highest_visited: u8,
}

impl WizardNav {
    pub fn new() -> Self {
        Self {
            current: FIRST_STEP,
            highest_visited: FIRST_STEP,
        }
    }

    /// Positions the wizard for a restored session. The stored step wins
    /// when it is usable; otherwise the deepest step that already holds
    /// entities, so the user lands next to their most recent work.
    pub fn resume(state: &WizardState) -> Self {
        let step = resume_step(state);
        Self {
            current: step,
            highest_visited: step,
        }
    }

    pub fn current(&self) -> u8 {
        self.current
    }

    pub fn highest_visited(&self) -> u8 {
        self.highest_visited
    }

    pub fn is_first(&self) -> bool {
        self.current == FIRST_STEP
    }

    pub fn is_last(&self) -> bool {
        self.current == LAST_STEP
    }

    /// Advances one step. From step 1 this is refused until the init ids
    /// exist; from the last step there is nowhere to go.
    pub fn next(&mut self, state: &WizardState) -> bool {
        if self.current == FIRST_STEP && !state.initialized() {
            return false;
        }
        if self.current >= LAST_STEP {
            return false;
        }
        self.current += 1;
        self.highest_visited = self.highest_visited.max(self.current);
        true
    }

    /// Steps back one, floored at step 1. The ceiling is unaffected.
    pub fn back(&mut self) -> bool {
        if self.current <= FIRST_STEP {
            return false;
        }
        self.current -= 1;
        true
    }

    pub fn can_goto(&self, step: u8) -> bool {
        (FIRST_STEP..=LAST_STEP).contains(&step) && step <= self.highest_visited
    }

    /// Jumps straight to a previously visited step. Unvisited steps are
    /// unreachable and the call is a no-op.
    pub fn goto(&mut self, step: u8) -> bool {
        if !self.can_goto(step) || step == self.current {
            return false;
        }
        self.current = step;
        true
    }

    /// Step 1 is done once the ids exist; list steps count as done once
    /// the user has moved past them. Content is optional there, so being
    /// left behind is the only signal. The summary step is never "done".
    pub fn is_completed(&self, step: u8, state: &WizardState) -> bool {
        match step {
            1 => state.initialized(),
            2..=7 => step < self.highest_visited,
            _ => false,
        }
    }
}

impl Default for WizardNav {
    fn default() -> Self {
        Self::new()
    }
}

fn resume_step(state: &WizardState) -> u8 {
    if !state.initialized() {
        return FIRST_STEP;
    }
    if (2..=LAST_STEP).contains(&state.last_step) {
        return state.last_step;
    }
    // stored step is unusable; fall back to the deepest populated step
    for step in (2..=7).rev() {
        if state.step_has_items(step) {
            return step;
        }
    }
    2
}
