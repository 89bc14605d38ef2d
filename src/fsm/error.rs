use crate::model::TicketState;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("transition from {from} to {to} is not allowed")]
    Invalid { from: TicketState, to: TicketState },

    #[error("state synchronization failure: {message}")]
    Sync { message: String },
}

pub type TransitionResult<T> = Result<T, TransitionError>;
