use crate::fsm::error::{TransitionError, TransitionResult};
use crate::model::{TicketHandle, TicketState};
use std::collections::{HashMap, HashSet};
use strum::IntoEnumIterator;

/// Configurable transition table over ticket states
///
/// The default rules mirror the desk workflow: queued work can be taken up,
/// escalated, or parked on missing documents; parked work re-enters the
/// queue or goes straight back into attention; completion is terminal.
/// Rules can be edited at runtime, so validity is always a table lookup.
#[derive(Debug, Clone)]
pub struct StateMachine {
    edges: HashMap<TicketState, HashSet<TicketState>>,
    descriptions: HashMap<(TicketState, TicketState), String>,
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl StateMachine {
    pub fn new() -> Self {
        let mut machine = Self {
            edges: HashMap::new(),
            descriptions: HashMap::new(),
        };
        machine.install_default_rules();
        machine
    }

    fn install_default_rules(&mut self) {
        use TicketState::*;
        self.add_transition(Queued, InProgress, Some("ticket taken up for attention"));
        self.add_transition(Queued, Urgent, Some("ticket escalated while waiting"));
        self.add_transition(Queued, PendingDocs, Some("documentation found missing"));
        self.add_transition(Urgent, InProgress, Some("urgent ticket taken up"));
        self.add_transition(Urgent, PendingDocs, Some("documentation found missing"));
        self.add_transition(InProgress, Completed, Some("attention finished"));
        self.add_transition(InProgress, PendingDocs, Some("attention paused for documents"));
        self.add_transition(PendingDocs, Queued, Some("documents delivered, back in line"));
        self.add_transition(PendingDocs, InProgress, Some("documents delivered at the desk"));
    }

    /// Discard any runtime edits and restore the built-in rules
    pub fn reset_to_defaults(&mut self) {
        self.edges.clear();
        self.descriptions.clear();
        self.install_default_rules();
    }

    pub fn is_valid_transition(&self, from: TicketState, to: TicketState) -> bool {
        self.edges
            .get(&from)
            .is_some_and(|targets| targets.contains(&to))
    }

    pub fn validate(&self, from: TicketState, to: TicketState) -> TransitionResult<()> {
        if self.is_valid_transition(from, to) {
            Ok(())
        } else {
            Err(TransitionError::Invalid { from, to })
        }
    }

    /// States reachable from `from`, in declaration order
    pub fn allowed_next_states(&self, from: TicketState) -> Vec<TicketState> {
        TicketState::iter()
            .filter(|to| self.is_valid_transition(from, *to))
            .collect()
    }

    pub fn add_transition(
        &mut self,
        from: TicketState,
        to: TicketState,
        description: Option<&str>,
    ) {
        self.edges.entry(from).or_default().insert(to);
        if let Some(text) = description {
            self.descriptions.insert((from, to), text.to_string());
        }
    }

    /// Remove a rule, reporting whether it was present
    pub fn remove_transition(&mut self, from: TicketState, to: TicketState) -> bool {
        self.descriptions.remove(&(from, to));
        self.edges
            .get_mut(&from)
            .is_some_and(|targets| targets.remove(&to))
    }

    /// Custom description of a rule, or a generic permitted/not-permitted text
    pub fn describe_transition(&self, from: TicketState, to: TicketState) -> String {
        if let Some(text) = self.descriptions.get(&(from, to)) {
            return text.clone();
        }
        if self.is_valid_transition(from, to) {
            format!("{from} -> {to} is permitted")
        } else {
            format!("{from} -> {to} is not permitted")
        }
    }

    /// Validate and apply a transition under a single write lock
    ///
    /// The check and the state change happen without releasing the guard, so
    /// no other holder of the handle can observe or race the half-done step.
    /// Returns the state the ticket held before the change.
    pub fn apply_if_valid(
        &self,
        handle: &TicketHandle,
        to: TicketState,
    ) -> TransitionResult<TicketState> {
        let mut ticket = handle.write(|message| TransitionError::Sync { message })?;
        let from = ticket.state();
        self.validate(from, to)?;
        ticket.set_state(to);
        Ok(from)
    }
}
