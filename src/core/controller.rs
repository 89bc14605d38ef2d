//! The desk session: one controller owning queues, rules, journal, and store

use crate::collections::CollectionError;
use crate::core::error_handling::ContextualError;
use crate::core::time::Clock;
use crate::core::validation::{require_non_empty, ValidationError};
use crate::dispatch::{AttentionQueue, DispatchError, QueueSide};
use crate::fsm::{StateMachine, TransitionError};
use crate::journal::{
    ActionStack, AddNoteCommand, AddTicketCommand, CloseCaseCommand, JournalError,
};
use crate::model::{Note, ProcedureType, Ticket, TicketHandle, TicketState};
use crate::persist::{CsvStore, PersistError};
use log::{info, warn};
use std::sync::{Arc, Mutex, MutexGuard};
use strum::IntoEnumIterator;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("ticket #{id} was not found")]
    TicketNotFound { id: u32 },

    #[error("ticket #{id} is not waiting in any line")]
    NotWaiting { id: u32 },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Transition(#[from] TransitionError),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    #[error(transparent)]
    Journal(#[from] JournalError),

    #[error(transparent)]
    Collection(#[from] CollectionError),

    #[error(transparent)]
    Persist(#[from] PersistError),

    #[error("session synchronization failure: {message}")]
    Sync { message: String },
}

impl ContextualError for SessionError {
    fn is_user_actionable(&self) -> bool {
        match self {
            SessionError::TicketNotFound { .. }
            | SessionError::NotWaiting { .. }
            | SessionError::Validation(_)
            | SessionError::Dispatch(DispatchError::NoTicketAvailable)
            | SessionError::Transition(TransitionError::Invalid { .. })
            | SessionError::Journal(JournalError::TicketNotWaiting { .. }) => true,
            _ => false,
        }
    }

    fn user_message(&self) -> Option<String> {
        if self.is_user_actionable() {
            Some(self.to_string())
        } else {
            None
        }
    }
}

pub type SessionResult<T> = Result<T, SessionError>;

/// Controller shared across threads through one mutual-exclusion domain
pub type SharedController = Arc<Mutex<DeskController>>;

fn sync_err(message: String) -> SessionError {
    SessionError::Sync { message }
}

/// Lock a shared controller, surfacing poison as a session error
pub fn lock_shared(shared: &SharedController) -> SessionResult<MutexGuard<'_, DeskController>> {
    crate::core::sync::handle_mutex_poison(shared.lock(), sync_err)
}

/// Coordinates every desk operation over one set of queues
///
/// The controller is the only writer of the queues, the transition rules,
/// and the journal, so components stay plain `&mut` values with no internal
/// locking. Sharing across threads wraps the whole controller in a single
/// mutex via [`DeskController::into_shared`].
///
/// Changes are persisted eagerly after each mutating operation; a storage
/// failure is logged and the in-memory session continues.
pub struct DeskController {
    queues: AttentionQueue,
    machine: StateMachine,
    journal: ActionStack,
    next_ticket_id: u32,
    clock: Arc<dyn Clock>,
    store: Option<CsvStore>,
}

impl DeskController {
    pub fn new(clock: Arc<dyn Clock>, store: Option<CsvStore>) -> Self {
        Self {
            queues: AttentionQueue::new(),
            machine: StateMachine::new(),
            journal: ActionStack::new(),
            next_ticket_id: 1,
            clock,
            store,
        }
    }

    /// Rebuild the session from the store, returning how many tickets loaded
    ///
    /// The id counter resumes above the highest id seen, so new tickets never
    /// collide with reloaded ones. The journal starts empty: persisted steps
    /// are settled facts, not undoable ones.
    pub fn load(&mut self) -> SessionResult<usize> {
        let Some(store) = &self.store else {
            return Ok(0);
        };
        let loaded = store.load()?;
        let mut highest = 0u32;
        let mut count = 0usize;
        for ticket in loaded.pending {
            highest = highest.max(ticket.id());
            count += 1;
            self.queues.add_ticket(TicketHandle::new(ticket))?;
        }
        for ticket in loaded.history {
            highest = highest.max(ticket.id());
            count += 1;
            self.queues.move_to_history(TicketHandle::new(ticket));
        }
        self.next_ticket_id = highest + 1;
        info!("loaded {count} tickets, next id {}", self.next_ticket_id);
        Ok(count)
    }

    /// Register a new procedure request and place it in line
    pub fn create_ticket(
        &mut self,
        student: &str,
        procedure: ProcedureType,
        urgent: bool,
    ) -> SessionResult<TicketHandle> {
        let student = require_non_empty("student name", student)?;
        let state = if urgent {
            TicketState::Urgent
        } else {
            TicketState::Queued
        };
        let id = self.next_ticket_id;
        let handle = TicketHandle::new(Ticket::new(id, student, procedure, state));

        self.journal
            .register_action(Box::new(AddTicketCommand::new(handle.clone())), &mut self.queues)?;
        self.next_ticket_id += 1;
        info!("ticket #{id} created ({state})");
        self.persist_queues();
        Ok(handle)
    }

    /// Take up the next ticket for attention
    ///
    /// The ticket stays in its line while being attended; it only leaves the
    /// line when the case is closed or re-routed.
    pub fn attend_next(&mut self) -> SessionResult<TicketHandle> {
        let handle = self.queues.next_ticket()?.clone();
        self.machine.apply_if_valid(&handle, TicketState::InProgress)?;
        info!("attending ticket #{}", handle.id());
        self.persist_queues();
        Ok(handle)
    }

    /// Close a waiting case: completed, off its line, into the history
    pub fn finalize_ticket(&mut self, id: u32) -> SessionResult<TicketHandle> {
        let handle = self
            .queues
            .find_by_id(id)
            .ok_or(SessionError::TicketNotFound { id })?;
        if self.queues.side_of(id).is_none() {
            return Err(SessionError::NotWaiting { id });
        }
        let current = handle.read(sync_err)?.state();
        self.machine.validate(current, TicketState::Completed)?;

        self.journal
            .register_action(Box::new(CloseCaseCommand::new(handle.clone())), &mut self.queues)?;
        info!("ticket #{id} completed");
        self.persist_queues();
        Ok(handle)
    }

    /// Record an observation against a ticket, timestamped now
    pub fn add_note(&mut self, id: u32, observation: &str) -> SessionResult<Note> {
        let observation = require_non_empty("observation", observation)?;
        let handle = self
            .queues
            .find_by_id(id)
            .ok_or(SessionError::TicketNotFound { id })?;
        let note = handle
            .write(sync_err)?
            .compose_note(observation, self.clock.now());

        self.journal.register_action(
            Box::new(AddNoteCommand::new(handle.clone(), note.clone())),
            &mut self.queues,
        )?;
        info!("note {} added to ticket #{id}", note.seq());
        self.persist_notes(&handle);
        Ok(note)
    }

    /// Move a ticket to another state, re-routing its line when needed
    ///
    /// A move to the completed state is a case closure and goes through
    /// [`DeskController::finalize_ticket`], so it lands in the history and
    /// the journal like any other closure. Returns the previous state.
    pub fn change_state(&mut self, id: u32, to: TicketState) -> SessionResult<TicketState> {
        if to == TicketState::Completed {
            let handle = self
                .queues
                .find_by_id(id)
                .ok_or(SessionError::TicketNotFound { id })?;
            let previous = handle.read(sync_err)?.state();
            self.finalize_ticket(id)?;
            return Ok(previous);
        }

        let handle = self
            .queues
            .find_by_id(id)
            .ok_or(SessionError::TicketNotFound { id })?;
        let previous = self.machine.apply_if_valid(&handle, to)?;
        self.reroute_waiting(id, to)?;
        info!("ticket #{id} moved {previous} -> {to}");
        self.persist_queues();
        Ok(previous)
    }

    /// Keep a waiting ticket on the line its state calls for
    fn reroute_waiting(&mut self, id: u32, state: TicketState) -> SessionResult<()> {
        let Some(current_side) = self.queues.side_of(id) else {
            return Ok(());
        };
        let desired_side = if state == TicketState::Urgent {
            QueueSide::Urgent
        } else {
            QueueSide::Normal
        };
        if current_side != desired_side {
            let handle = self
                .queues
                .queue_mut(current_side)
                .remove_by(|h| h.id() == id)?;
            self.queues.queue_mut(desired_side).enqueue(handle);
        }
        Ok(())
    }

    /// Revert the most recent journaled step, if any, returning its label
    pub fn undo(&mut self) -> SessionResult<Option<String>> {
        let label = self.journal.undo_last(&mut self.queues)?;
        if let Some(label) = &label {
            info!("undid: {label}");
            self.persist_all();
        }
        Ok(label)
    }

    /// Replay the most recently undone step, if any, returning its label
    pub fn redo(&mut self) -> SessionResult<Option<String>> {
        let label = self.journal.redo_last(&mut self.queues)?;
        if let Some(label) = &label {
            info!("redid: {label}");
            self.persist_all();
        }
        Ok(label)
    }

    pub fn can_undo(&self) -> bool {
        self.journal.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.journal.can_redo()
    }

    /// Labels of undoable steps, most recent first
    pub fn journal_labels(&self) -> Vec<String> {
        self.journal.undo_labels()
    }

    pub fn find_by_id(&self, id: u32) -> SessionResult<TicketHandle> {
        self.queues
            .find_by_id(id)
            .ok_or(SessionError::TicketNotFound { id })
    }

    /// The ticket that would be attended next, without taking it up
    pub fn next_in_line(&self) -> SessionResult<TicketHandle> {
        Ok(self.queues.next_ticket()?.clone())
    }

    /// Waiting tickets in dispatch order, urgent line first
    pub fn list_pending(&self) -> Vec<TicketHandle> {
        self.queues.pending_snapshot()
    }

    /// Completed tickets in completion order
    pub fn list_history(&self) -> Vec<TicketHandle> {
        self.queues.history().iter().cloned().collect()
    }

    pub fn total_waiting(&self) -> usize {
        self.queues.total_waiting()
    }

    /// Waiting-ticket counts per procedure type, in declaration order
    pub fn pending_by_type(&self) -> SessionResult<Vec<(ProcedureType, usize)>> {
        let mut counts: Vec<(ProcedureType, usize)> =
            ProcedureType::iter().map(|p| (p, 0)).collect();
        for handle in self.queues.pending_snapshot() {
            let procedure = handle.read(sync_err)?.procedure();
            if let Some(entry) = counts.iter_mut().find(|(p, _)| *p == procedure) {
                entry.1 += 1;
            }
        }
        Ok(counts)
    }

    /// The tickets carrying the most notes, waiting and completed alike
    ///
    /// Sorted by note count descending, ties by ticket id, truncated to
    /// `limit` entries.
    pub fn top_by_notes(&self, limit: usize) -> SessionResult<Vec<(TicketHandle, usize)>> {
        let mut rows = Vec::new();
        for handle in self
            .queues
            .pending_snapshot()
            .into_iter()
            .chain(self.queues.history().iter().cloned())
        {
            let count = handle.read(sync_err)?.notes().size();
            rows.push((handle, count));
        }
        rows.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.id().cmp(&b.0.id())));
        rows.truncate(limit);
        Ok(rows)
    }

    /// States a ticket may move to next under the current rules
    pub fn allowed_next_states(&self, id: u32) -> SessionResult<Vec<TicketState>> {
        let handle = self.find_by_id(id)?;
        let current = handle.read(sync_err)?.state();
        Ok(self.machine.allowed_next_states(current))
    }

    pub fn machine(&self) -> &StateMachine {
        &self.machine
    }

    /// Rule editing; validity of future moves follows immediately
    pub fn machine_mut(&mut self) -> &mut StateMachine {
        &mut self.machine
    }

    /// Persist the full session, failing loudly on storage errors
    pub fn shutdown(&mut self) -> SessionResult<()> {
        let Some(store) = &self.store else {
            return Ok(());
        };
        store.save_pending(&self.queues.pending_snapshot())?;
        store.save_history(&self.list_history())?;
        for handle in self
            .queues
            .pending_snapshot()
            .iter()
            .chain(self.queues.history().iter())
        {
            store.save_notes(handle)?;
        }
        info!("session persisted to {}", store.base_dir().display());
        Ok(())
    }

    /// Wrap the whole controller in one mutex for cross-thread sharing
    pub fn into_shared(self) -> SharedController {
        Arc::new(Mutex::new(self))
    }

    fn persist_queues(&self) {
        let Some(store) = &self.store else {
            return;
        };
        if let Err(error) = store.save_pending(&self.queues.pending_snapshot()) {
            warn!("could not persist pending tickets: {error}");
        }
        let history = self.list_history();
        if let Err(error) = store.save_history(&history) {
            warn!("could not persist completed history: {error}");
        }
    }

    fn persist_notes(&self, handle: &TicketHandle) {
        let Some(store) = &self.store else {
            return;
        };
        if let Err(error) = store.save_notes(handle) {
            warn!("could not persist notes for ticket #{}: {error}", handle.id());
        }
    }

    fn persist_all(&self) {
        self.persist_queues();
        let Some(store) = &self.store else {
            return;
        };
        for handle in self
            .queues
            .pending_snapshot()
            .iter()
            .chain(self.queues.history().iter())
        {
            if let Err(error) = store.save_notes(handle) {
                warn!("could not persist notes for ticket #{}: {error}", handle.id());
            }
        }
    }
}
