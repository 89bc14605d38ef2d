//! Reversible desk operations and their undo-redo journal

mod command;
mod error;
mod stack;

pub use command::{Action, AddNoteCommand, AddTicketCommand, CloseCaseCommand};
pub use error::{JournalError, JournalResult};
pub use stack::ActionStack;
