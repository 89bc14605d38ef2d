//! Ticket lifecycle states and procedure types
//!
//! Both enumerations serialize as SCREAMING_SNAKE_CASE in the CSV snapshot
//! files. Declaration order of `TicketState` is load-bearing: the state
//! machine reports allowed successor states in this order.

use strum_macros::{Display, EnumIter, EnumString};

/// Lifecycle state of a ticket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketState {
    Queued,
    Urgent,
    InProgress,
    Completed,
    PendingDocs,
}

impl TicketState {
    /// Completed tickets accept no further transitions or queue membership.
    pub fn is_terminal(self) -> bool {
        matches!(self, TicketState::Completed)
    }
}

/// The closed set of student procedures a ticket can request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ProcedureType {
    Certificate,
    Enrollment,
    CreditTransfer,
    CourseWithdrawal,
    Other,
}
