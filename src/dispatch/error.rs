use crate::collections::CollectionError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("no ticket is waiting for attention")]
    NoTicketAvailable,

    #[error(transparent)]
    Collection(#[from] CollectionError),

    #[error("dispatch synchronization failure: {message}")]
    Sync { message: String },
}

pub type DispatchResult<T> = Result<T, DispatchError>;
