use crate::collections::CollectionError;
use crate::dispatch::DispatchError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JournalError {
    #[error("ticket #{id} is not waiting in any line")]
    TicketNotWaiting { id: u32 },

    #[error("no recorded effect to revert for {label}")]
    NoRecordedEffect { label: &'static str },

    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    #[error(transparent)]
    Collection(#[from] CollectionError),

    #[error("journal synchronization failure: {message}")]
    Sync { message: String },
}

pub type JournalResult<T> = Result<T, JournalError>;
