//! Cross-cutting services and the desk session controller

mod controller;
pub mod error_handling;
pub mod logging;
pub mod sync;
pub mod time;
pub mod validation;

pub use controller::{lock_shared, DeskController, SessionError, SessionResult, SharedController};
