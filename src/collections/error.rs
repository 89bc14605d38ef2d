//! Collection Error Types

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CollectionError {
    #[error("{structure} is empty")]
    Empty { structure: &'static str },

    #[error("no matching element in {structure}")]
    NotFound { structure: &'static str },
}

/// Result type for linked-structure operations
pub type CollectionResult<T> = Result<T, CollectionError>;
