//! Domain records: tickets, notes, and their closed enumerations

mod note;
mod state;
mod ticket;

pub use note::Note;
pub use state::{ProcedureType, TicketState};
pub use ticket::{Ticket, TicketHandle};
