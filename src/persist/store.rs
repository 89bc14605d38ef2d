use crate::model::{ProcedureType, Ticket, TicketHandle, TicketState};
use crate::persist::csv::{escape_field, parse_line, split_records};
use crate::persist::error::{PersistError, PersistResult};
use chrono::NaiveDateTime;
use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

const PENDING_FILE: &str = "pending_tickets.csv";
const HISTORY_FILE: &str = "completed_history.csv";
const TICKET_HEADER: &str = "id,student,procedure,state";
const NOTES_HEADER: &str = "timestamp,observation";

/// Tickets reconstructed from disk at startup
#[derive(Debug, Default)]
pub struct LoadedDesk {
    pub pending: Vec<Ticket>,
    pub history: Vec<Ticket>,
}

/// File-per-concern CSV store rooted at one directory
///
/// Pending tickets and completed history each live in a single file; every
/// ticket with notes gets its own `notes_ticket_<id>.csv`. Loading is
/// tolerant: a malformed row is logged and skipped, a missing file reads as
/// empty, so a damaged store never blocks startup.
#[derive(Debug, Clone)]
pub struct CsvStore {
    base_dir: PathBuf,
}

impl CsvStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn notes_path(&self, id: u32) -> PathBuf {
        self.base_dir.join(format!("notes_ticket_{id}.csv"))
    }

    pub fn save_pending(&self, tickets: &[TicketHandle]) -> PersistResult<()> {
        self.save_ticket_file(PENDING_FILE, tickets)
    }

    pub fn save_history(&self, tickets: &[TicketHandle]) -> PersistResult<()> {
        self.save_ticket_file(HISTORY_FILE, tickets)
    }

    fn save_ticket_file(&self, name: &str, tickets: &[TicketHandle]) -> PersistResult<()> {
        fs::create_dir_all(&self.base_dir)?;
        let mut out = String::from(TICKET_HEADER);
        out.push('\n');
        for handle in tickets {
            let ticket = handle.read(|message| PersistError::Sync { message })?;
            out.push_str(&format!(
                "{},{},{},{}\n",
                ticket.id(),
                escape_field(ticket.student()),
                ticket.procedure(),
                ticket.state()
            ));
        }
        let path = self.base_dir.join(name);
        fs::write(&path, out)?;
        debug!("wrote {} tickets to {}", tickets.len(), path.display());
        Ok(())
    }

    /// Write the notes file for one ticket, removing it when no notes remain
    pub fn save_notes(&self, handle: &TicketHandle) -> PersistResult<()> {
        fs::create_dir_all(&self.base_dir)?;
        let ticket = handle.read(|message| PersistError::Sync { message })?;
        let path = self.notes_path(ticket.id());
        if ticket.notes().is_empty() {
            if path.exists() {
                fs::remove_file(&path)?;
            }
            return Ok(());
        }
        let mut out = String::from(NOTES_HEADER);
        out.push('\n');
        for note in ticket.notes().iter() {
            out.push_str(&format!(
                "{},{}\n",
                note.timestamp().format(TIMESTAMP_FORMAT),
                escape_field(note.observation())
            ));
        }
        fs::write(&path, out)?;
        Ok(())
    }

    pub fn load(&self) -> PersistResult<LoadedDesk> {
        Ok(LoadedDesk {
            pending: self.load_ticket_file(PENDING_FILE)?,
            history: self.load_ticket_file(HISTORY_FILE)?,
        })
    }

    fn load_ticket_file(&self, name: &str) -> PersistResult<Vec<Ticket>> {
        let path = self.base_dir.join(name);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                debug!("{} not found, starting empty", path.display());
                return Ok(Vec::new());
            }
            Err(error) => return Err(error.into()),
        };

        let mut tickets = Vec::new();
        // records, not physical lines: a quoted field may span line breaks
        for (index, record) in split_records(&content).iter().enumerate().skip(1) {
            if record.trim().is_empty() {
                continue;
            }
            match self.parse_ticket_row(record) {
                Some(mut ticket) => {
                    self.load_notes_into(&mut ticket)?;
                    tickets.push(ticket);
                }
                None => {
                    warn!(
                        "skipping malformed record {} in {}: {record}",
                        index + 1,
                        path.display()
                    );
                }
            }
        }
        Ok(tickets)
    }

    fn parse_ticket_row(&self, line: &str) -> Option<Ticket> {
        let fields = parse_line(line);
        let [id, student, procedure, state] = fields.as_slice() else {
            return None;
        };
        let id: u32 = id.parse().ok()?;
        let procedure = ProcedureType::from_str(procedure).ok()?;
        let state = TicketState::from_str(state).ok()?;
        Some(Ticket::new(id, student.clone(), procedure, state))
    }

    fn load_notes_into(&self, ticket: &mut Ticket) -> PersistResult<()> {
        let path = self.notes_path(ticket.id());
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(error) => return Err(error.into()),
        };
        for (index, record) in split_records(&content).iter().enumerate().skip(1) {
            if record.trim().is_empty() {
                continue;
            }
            let fields = parse_line(record);
            let parsed = match fields.as_slice() {
                [timestamp, observation] => {
                    NaiveDateTime::parse_from_str(timestamp, TIMESTAMP_FORMAT)
                        .ok()
                        .map(|ts| (ts, observation.clone()))
                }
                _ => None,
            };
            match parsed {
                Some((timestamp, observation)) => {
                    let note = ticket.compose_note(observation, timestamp);
                    ticket.append_note(note);
                }
                None => warn!(
                    "skipping malformed note record {} in {}: {record}",
                    index + 1,
                    path.display()
                ),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn sync_err(message: String) -> PersistError {
        PersistError::Sync { message }
    }

    fn handle(id: u32, student: &str, state: TicketState) -> TicketHandle {
        TicketHandle::new(Ticket::new(
            id,
            student.to_string(),
            ProcedureType::Certificate,
            state,
        ))
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = CsvStore::new(dir.path());

        let waiting = handle(1, "Ana Pérez", TicketState::Queued);
        let timestamp = NaiveDate::from_ymd_opt(2024, 5, 10)
            .unwrap()
            .and_hms_opt(9, 15, 0)
            .unwrap();
        {
            let mut ticket = waiting.write(sync_err).unwrap();
            let note = ticket.compose_note("brought ID, missing form".to_string(), timestamp);
            ticket.append_note(note);
        }
        let finished = handle(2, "Luis Gómez", TicketState::Completed);

        store.save_pending(&[waiting.clone()]).unwrap();
        store.save_history(&[finished]).unwrap();
        store.save_notes(&waiting).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.pending.len(), 1);
        assert_eq!(loaded.history.len(), 1);

        let ticket = &loaded.pending[0];
        assert_eq!(ticket.id(), 1);
        assert_eq!(ticket.student(), "Ana Pérez");
        assert_eq!(ticket.state(), TicketState::Queued);
        assert_eq!(ticket.notes().size(), 1);
        let note = ticket.notes().iter().next().unwrap();
        assert_eq!(note.observation(), "brought ID, missing form");
        assert_eq!(note.timestamp(), timestamp);

        assert_eq!(loaded.history[0].student(), "Luis Gómez");
    }

    #[test]
    fn test_line_break_in_field_survives_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = CsvStore::new(dir.path());

        let waiting = handle(1, "Ana\nPérez", TicketState::Queued);
        let timestamp = NaiveDate::from_ymd_opt(2024, 5, 10)
            .unwrap()
            .and_hms_opt(9, 15, 0)
            .unwrap();
        {
            let mut ticket = waiting.write(sync_err).unwrap();
            let note = ticket.compose_note("first line\nsecond line".to_string(), timestamp);
            ticket.append_note(note);
        }
        store.save_pending(&[waiting.clone()]).unwrap();
        store.save_notes(&waiting).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.pending.len(), 1);
        assert_eq!(loaded.pending[0].student(), "Ana\nPérez");
        let note = loaded.pending[0].notes().iter().next().unwrap();
        assert_eq!(note.observation(), "first line\nsecond line");
    }

    #[test]
    fn test_missing_files_load_empty() {
        let dir = TempDir::new().unwrap();
        let loaded = CsvStore::new(dir.path().join("nowhere")).load().unwrap();
        assert!(loaded.pending.is_empty());
        assert!(loaded.history.is_empty());
    }

    #[test]
    fn test_malformed_rows_are_skipped() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pending_tickets.csv");
        fs::write(
            &path,
            "id,student,procedure,state\n\
             not-a-number,Ana,CERTIFICATE,QUEUED\n\
             3,Luis Gómez,ENROLLMENT,URGENT\n\
             4,Missing Fields\n",
        )
        .unwrap();

        let loaded = CsvStore::new(dir.path()).load().unwrap();
        assert_eq!(loaded.pending.len(), 1);
        assert_eq!(loaded.pending[0].id(), 3);
        assert_eq!(loaded.pending[0].state(), TicketState::Urgent);
    }

    #[test]
    fn test_note_seq_resumes_after_load() {
        let dir = TempDir::new().unwrap();
        let store = CsvStore::new(dir.path());
        let waiting = handle(7, "Ana Pérez", TicketState::Queued);
        let timestamp = NaiveDate::from_ymd_opt(2024, 5, 10)
            .unwrap()
            .and_hms_opt(9, 15, 0)
            .unwrap();
        {
            let mut ticket = waiting.write(sync_err).unwrap();
            for text in ["first", "second"] {
                let note = ticket.compose_note(text.to_string(), timestamp);
                ticket.append_note(note);
            }
        }
        store.save_pending(&[waiting.clone()]).unwrap();
        store.save_notes(&waiting).unwrap();

        let mut loaded = store.load().unwrap();
        let ticket = &mut loaded.pending[0];
        let next = ticket.compose_note("third".to_string(), timestamp);
        assert_eq!(next.seq(), 3);
    }

    #[test]
    fn test_empty_notes_remove_stale_file() {
        let dir = TempDir::new().unwrap();
        let store = CsvStore::new(dir.path());
        let waiting = handle(5, "Ana Pérez", TicketState::Queued);
        let timestamp = NaiveDate::from_ymd_opt(2024, 5, 10)
            .unwrap()
            .and_hms_opt(9, 15, 0)
            .unwrap();
        {
            let mut ticket = waiting.write(sync_err).unwrap();
            let note = ticket.compose_note("temp".to_string(), timestamp);
            ticket.append_note(note);
        }
        store.save_notes(&waiting).unwrap();
        assert!(dir.path().join("notes_ticket_5.csv").exists());

        {
            let mut ticket = waiting.write(sync_err).unwrap();
            ticket.remove_note(1).unwrap();
        }
        store.save_notes(&waiting).unwrap();
        assert!(!dir.path().join("notes_ticket_5.csv").exists());
    }
}
