//! Timestamped free-text annotations

use chrono::NaiveDateTime;
use std::fmt;

/// A note attached to a ticket
///
/// `seq` is the note's identity token, unique within its owning ticket and
/// assigned by [`crate::model::Ticket::compose_note`]. Undoing a note
/// addition removes by `seq`, never by comparing text or timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    seq: u64,
    observation: String,
    timestamp: NaiveDateTime,
}

impl Note {
    pub(crate) fn new(seq: u64, observation: String, timestamp: NaiveDateTime) -> Self {
        Self {
            seq,
            observation,
            timestamp,
        }
    }

    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn observation(&self) -> &str {
        &self.observation
    }

    pub fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
            self.observation
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample_timestamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 10)
            .unwrap()
            .and_hms_opt(14, 5, 0)
            .unwrap()
    }

    #[test]
    fn test_accessors() {
        let note = Note::new(3, "documents received".to_string(), sample_timestamp());
        assert_eq!(note.seq(), 3);
        assert_eq!(note.observation(), "documents received");
        assert_eq!(note.timestamp(), sample_timestamp());
    }

    #[test]
    fn test_display_includes_timestamp_and_text() {
        let note = Note::new(1, "called student".to_string(), sample_timestamp());
        assert_eq!(note.to_string(), "[2024-05-10 14:05:00] called student");
    }
}
