//! CSV persistence for tickets, history, and notes

mod csv;
mod error;
mod store;

pub use csv::escape_field;
pub use error::{PersistError, PersistResult};
pub use store::{CsvStore, LoadedDesk, TIMESTAMP_FORMAT};
