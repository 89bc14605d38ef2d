use crate::dispatch::AttentionQueue;
use crate::journal::error::{JournalError, JournalResult};
use crate::model::{Note, TicketHandle, TicketState};

/// A reversible desk operation
///
/// Commands receive the queues they act on explicitly, so a command stays a
/// pure description of one step and the journal owns nothing but ordering.
/// `undo` must exactly invert the most recent `execute`; `execute` after an
/// `undo` replays the step and may re-capture its effect.
pub trait Action: Send {
    /// Short human-readable description for logs and the journal view
    fn label(&self) -> String;

    fn execute(&mut self, queues: &mut AttentionQueue) -> JournalResult<()>;

    fn undo(&mut self, queues: &mut AttentionQueue) -> JournalResult<()>;
}

/// Enqueue a ticket on the side its state calls for
pub struct AddTicketCommand {
    handle: TicketHandle,
}

impl AddTicketCommand {
    pub fn new(handle: TicketHandle) -> Self {
        Self { handle }
    }
}

impl Action for AddTicketCommand {
    fn label(&self) -> String {
        format!("add ticket #{}", self.handle.id())
    }

    fn execute(&mut self, queues: &mut AttentionQueue) -> JournalResult<()> {
        queues.add_ticket(self.handle.clone())?;
        Ok(())
    }

    fn undo(&mut self, queues: &mut AttentionQueue) -> JournalResult<()> {
        let id = self.handle.id();
        let side = queues
            .side_of(id)
            .ok_or(JournalError::TicketNotWaiting { id })?;
        queues.queue_mut(side).remove_by(|h| h.id() == id)?;
        Ok(())
    }
}

/// Append a note to a ticket's history
pub struct AddNoteCommand {
    handle: TicketHandle,
    note: Note,
}

impl AddNoteCommand {
    pub fn new(handle: TicketHandle, note: Note) -> Self {
        Self { handle, note }
    }
}

impl Action for AddNoteCommand {
    fn label(&self) -> String {
        format!("add note to ticket #{}", self.handle.id())
    }

    fn execute(&mut self, _queues: &mut AttentionQueue) -> JournalResult<()> {
        self.handle
            .write(|message| JournalError::Sync { message })?
            .append_note(self.note.clone());
        Ok(())
    }

    fn undo(&mut self, _queues: &mut AttentionQueue) -> JournalResult<()> {
        self.handle
            .write(|message| JournalError::Sync { message })?
            .remove_note(self.note.seq())?;
        Ok(())
    }
}

/// Close a waiting ticket: pull it from its line, mark it completed, and
/// record it in the history
pub struct CloseCaseCommand {
    handle: TicketHandle,
    captured: Option<Captured>,
}

struct Captured {
    previous_state: TicketState,
    side: crate::dispatch::QueueSide,
    position: usize,
}

impl CloseCaseCommand {
    pub fn new(handle: TicketHandle) -> Self {
        Self {
            handle,
            captured: None,
        }
    }
}

impl Action for CloseCaseCommand {
    fn label(&self) -> String {
        format!("close case #{}", self.handle.id())
    }

    fn execute(&mut self, queues: &mut AttentionQueue) -> JournalResult<()> {
        let id = self.handle.id();
        let side = queues
            .side_of(id)
            .ok_or(JournalError::TicketNotWaiting { id })?;
        let position = queues
            .queue(side)
            .iter()
            .position(|h| h.id() == id)
            .ok_or(JournalError::TicketNotWaiting { id })?;
        queues.queue_mut(side).remove_by(|h| h.id() == id)?;

        let previous_state = {
            let mut ticket = self
                .handle
                .write(|message| JournalError::Sync { message })?;
            let previous = ticket.state();
            ticket.set_state(TicketState::Completed);
            previous
        };
        queues.move_to_history(self.handle.clone());
        self.captured = Some(Captured {
            previous_state,
            side,
            position,
        });
        Ok(())
    }

    fn undo(&mut self, queues: &mut AttentionQueue) -> JournalResult<()> {
        let Captured {
            previous_state,
            side,
            position,
        } = self
            .captured
            .take()
            .ok_or(JournalError::NoRecordedEffect { label: "close case" })?;

        let id = self.handle.id();
        queues.history_mut().remove_by(|h| h.id() == id)?;
        self.handle
            .write(|message| JournalError::Sync { message })?
            .set_state(previous_state);
        // the reopened case returns to the exact slot it was pulled from
        queues.queue_mut(side).insert_at(position, self.handle.clone());
        Ok(())
    }
}
