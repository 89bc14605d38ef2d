//! Ticket record and its shared handle

use crate::collections::{CollectionResult, SeqList};
use crate::core::sync::{handle_rwlock_read, handle_rwlock_write};
use crate::model::note::Note;
use crate::model::state::{ProcedureType, TicketState};
use chrono::NaiveDateTime;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A student procedure request tracked through its lifecycle
///
/// The id is assigned once at creation and never changes; all queue and
/// history bookkeeping keys on it. Notes are held in insertion order and are
/// append-only in the normal flow (undo may remove one by its seq token).
#[derive(Debug)]
pub struct Ticket {
    id: u32,
    student: String,
    procedure: ProcedureType,
    state: TicketState,
    notes: SeqList<Note>,
    next_note_seq: u64,
}

impl Ticket {
    pub fn new(id: u32, student: String, procedure: ProcedureType, state: TicketState) -> Self {
        Self {
            id,
            student,
            procedure,
            state,
            notes: SeqList::new(),
            next_note_seq: 1,
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn student(&self) -> &str {
        &self.student
    }

    pub fn procedure(&self) -> ProcedureType {
        self.procedure
    }

    pub fn state(&self) -> TicketState {
        self.state
    }

    pub(crate) fn set_state(&mut self, state: TicketState) {
        self.state = state;
    }

    pub fn notes(&self) -> &SeqList<Note> {
        &self.notes
    }

    /// Build a note carrying this ticket's next seq token.
    ///
    /// The note is not appended; the add-note command owns appending so the
    /// addition stays reversible.
    pub fn compose_note(&mut self, observation: String, timestamp: NaiveDateTime) -> Note {
        let seq = self.next_note_seq;
        self.next_note_seq += 1;
        Note::new(seq, observation, timestamp)
    }

    /// Append a note to the history
    pub fn append_note(&mut self, note: Note) {
        self.notes.push_back(note);
    }

    /// Remove a note by its seq token
    pub fn remove_note(&mut self, seq: u64) -> CollectionResult<Note> {
        self.notes.remove_by(|note| note.seq() == seq)
    }
}

/// Shared, clonable handle to a ticket
///
/// The immutable id is carried outside the lock so membership checks and
/// removals compare ids without locking; all mutable ticket state sits
/// behind the `RwLock`. Handle equality is id equality.
#[derive(Debug, Clone)]
pub struct TicketHandle {
    id: u32,
    body: Arc<RwLock<Ticket>>,
}

impl TicketHandle {
    pub fn new(ticket: Ticket) -> Self {
        Self {
            id: ticket.id(),
            body: Arc::new(RwLock::new(ticket)),
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    /// Acquire a read guard, mapping lock poisoning into the caller's error type
    pub fn read<E>(
        &self,
        error_constructor: impl FnOnce(String) -> E,
    ) -> Result<RwLockReadGuard<'_, Ticket>, E> {
        handle_rwlock_read(self.body.read(), error_constructor)
    }

    /// Acquire a write guard, mapping lock poisoning into the caller's error type
    pub fn write<E>(
        &self,
        error_constructor: impl FnOnce(String) -> E,
    ) -> Result<RwLockWriteGuard<'_, Ticket>, E> {
        handle_rwlock_write(self.body.write(), error_constructor)
    }
}

impl PartialEq for TicketHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TicketHandle {}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample_timestamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 10)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    fn sample_ticket() -> Ticket {
        Ticket::new(
            1,
            "Ana Pérez".to_string(),
            ProcedureType::Certificate,
            TicketState::Queued,
        )
    }

    #[test]
    fn test_new_ticket_fields() {
        let ticket = sample_ticket();
        assert_eq!(ticket.id(), 1);
        assert_eq!(ticket.student(), "Ana Pérez");
        assert_eq!(ticket.procedure(), ProcedureType::Certificate);
        assert_eq!(ticket.state(), TicketState::Queued);
        assert!(ticket.notes().is_empty());
    }

    #[test]
    fn test_compose_note_assigns_increasing_seq() {
        let mut ticket = sample_ticket();
        let first = ticket.compose_note("first".to_string(), sample_timestamp());
        let second = ticket.compose_note("second".to_string(), sample_timestamp());
        assert_eq!(first.seq(), 1);
        assert_eq!(second.seq(), 2);
        // composing does not append
        assert!(ticket.notes().is_empty());
    }

    #[test]
    fn test_append_and_remove_note_by_seq() {
        let mut ticket = sample_ticket();
        let first = ticket.compose_note("first".to_string(), sample_timestamp());
        let second = ticket.compose_note("second".to_string(), sample_timestamp());
        ticket.append_note(first.clone());
        ticket.append_note(second.clone());

        let removed = ticket.remove_note(first.seq()).unwrap();
        assert_eq!(removed, first);

        let remaining: Vec<_> = ticket.notes().iter().cloned().collect();
        assert_eq!(remaining, vec![second]);

        assert!(ticket.remove_note(99).is_err());
    }

    #[test]
    fn test_handle_equality_is_id_equality() {
        let a = TicketHandle::new(sample_ticket());
        let b = a.clone();
        let c = TicketHandle::new(Ticket::new(
            2,
            "Luis Gómez".to_string(),
            ProcedureType::Other,
            TicketState::Urgent,
        ));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_handle_guards_expose_ticket() {
        #[derive(Debug)]
        struct GuardError(String);

        let handle = TicketHandle::new(sample_ticket());
        {
            let guard = handle.read(GuardError).unwrap();
            assert_eq!(guard.student(), "Ana Pérez");
        }
        {
            let mut guard = handle.write(GuardError).unwrap();
            guard.set_state(TicketState::InProgress);
        }
        assert_eq!(
            handle.read(GuardError).unwrap().state(),
            TicketState::InProgress
        );
    }
}
