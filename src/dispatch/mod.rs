//! Dual-priority dispatch of waiting tickets

mod error;
mod manager;

pub use error::{DispatchError, DispatchResult};
pub use manager::{AttentionQueue, QueueSide};
