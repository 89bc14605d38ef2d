//! Ticket state transition rules

mod error;
mod machine;

pub use error::{TransitionError, TransitionResult};
pub use machine::StateMachine;
