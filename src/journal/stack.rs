use crate::collections::LinkedStack;
use crate::dispatch::AttentionQueue;
use crate::journal::command::Action;
use crate::journal::error::JournalResult;
use log::debug;

/// Undo-redo journal over executed commands
///
/// Every command enters the journal through `register_action`, which runs it
/// first; a command that fails is never recorded. Registering a new command
/// discards the redo line, so redo only ever replays steps undone since the
/// last fresh action.
#[derive(Default)]
pub struct ActionStack {
    done: LinkedStack<Box<dyn Action>>,
    undone: LinkedStack<Box<dyn Action>>,
}

impl ActionStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Execute a command and record it for undo
    pub fn register_action(
        &mut self,
        mut action: Box<dyn Action>,
        queues: &mut AttentionQueue,
    ) -> JournalResult<()> {
        action.execute(queues)?;
        debug!("registered action: {}", action.label());
        self.done.push(action);
        self.undone.clear();
        Ok(())
    }

    /// Revert the most recent action, returning its label, or `None` when
    /// there is nothing to undo
    pub fn undo_last(&mut self, queues: &mut AttentionQueue) -> JournalResult<Option<String>> {
        let mut action = match self.done.pop() {
            Ok(action) => action,
            Err(_) => return Ok(None),
        };
        if let Err(error) = action.undo(queues) {
            // the action remains current; keep the journal consistent
            self.done.push(action);
            return Err(error);
        }
        let label = action.label();
        self.undone.push(action);
        Ok(Some(label))
    }

    /// Replay the most recently undone action, returning its label, or
    /// `None` when there is nothing to redo
    pub fn redo_last(&mut self, queues: &mut AttentionQueue) -> JournalResult<Option<String>> {
        let mut action = match self.undone.pop() {
            Ok(action) => action,
            Err(_) => return Ok(None),
        };
        if let Err(error) = action.execute(queues) {
            self.undone.push(action);
            return Err(error);
        }
        let label = action.label();
        self.done.push(action);
        Ok(Some(label))
    }

    pub fn can_undo(&self) -> bool {
        !self.done.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.undone.is_empty()
    }

    /// Labels of undoable actions, most recent first
    pub fn undo_labels(&self) -> Vec<String> {
        self.done.iter().map(|action| action.label()).collect()
    }
}
