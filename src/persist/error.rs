use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("storage I/O failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage synchronization failure: {message}")]
    Sync { message: String },
}

pub type PersistResult<T> = Result<T, PersistError>;
