//! Table and status-line formatting for the interactive session

use crate::core::{SessionError, SessionResult};
use crate::model::{ProcedureType, TicketHandle, TicketState};
use crate::persist::escape_field;
use colored::Colorize;
use prettytable::{format, row, Table};

fn sync_err(message: String) -> SessionError {
    SessionError::Sync { message }
}

/// Human label for a state, colored when enabled
pub fn state_tag(state: TicketState, use_color: bool) -> String {
    let text = state.to_string();
    if !use_color {
        return text;
    }
    match state {
        TicketState::Queued => text.cyan().to_string(),
        TicketState::Urgent => text.red().bold().to_string(),
        TicketState::InProgress => text.yellow().to_string(),
        TicketState::Completed => text.green().to_string(),
        TicketState::PendingDocs => text.magenta().to_string(),
    }
}

/// Confirmation text, green when color is enabled
pub fn paint(text: &str, use_color: bool) -> String {
    if use_color {
        text.green().to_string()
    } else {
        text.to_string()
    }
}

fn base_table() -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_CLEAN);
    table
}

/// Waiting or completed tickets as a listing table
pub fn ticket_table(tickets: &[TicketHandle], use_color: bool) -> SessionResult<Table> {
    let mut table = base_table();
    table.set_titles(row!["#", "Student", "Procedure", "State", "Notes"]);
    for handle in tickets {
        let ticket = handle.read(sync_err)?;
        table.add_row(row![
            ticket.id(),
            ticket.student(),
            ticket.procedure(),
            state_tag(ticket.state(), use_color),
            ticket.notes().size()
        ]);
    }
    Ok(table)
}

/// All notes on one ticket, oldest first
pub fn notes_table(handle: &TicketHandle) -> SessionResult<Table> {
    let mut table = base_table();
    table.set_titles(row!["Seq", "When", "Observation"]);
    let ticket = handle.read(sync_err)?;
    for note in ticket.notes().iter() {
        table.add_row(row![
            note.seq(),
            note.timestamp().format("%Y-%m-%d %H:%M:%S"),
            note.observation()
        ]);
    }
    Ok(table)
}

/// Waiting-ticket counts per procedure type
pub fn report_table(counts: &[(ProcedureType, usize)]) -> Table {
    let mut table = base_table();
    table.set_titles(row!["Procedure", "Waiting"]);
    for (procedure, count) in counts {
        table.add_row(row![procedure, count]);
    }
    table
}

/// Tickets ranked by note count
pub fn top_notes_table(rows: &[(TicketHandle, usize)], use_color: bool) -> SessionResult<Table> {
    let mut table = base_table();
    table.set_titles(row!["#", "Student", "Procedure", "State", "Notes"]);
    for (handle, count) in rows {
        let ticket = handle.read(sync_err)?;
        table.add_row(row![
            ticket.id(),
            ticket.student(),
            ticket.procedure(),
            state_tag(ticket.state(), use_color),
            count
        ]);
    }
    Ok(table)
}

/// The per-procedure report as CSV text
pub fn report_csv(counts: &[(ProcedureType, usize)]) -> String {
    let mut out = String::from("procedure,waiting\n");
    for (procedure, count) in counts {
        out.push_str(&format!("{procedure},{count}\n"));
    }
    out
}

/// The note-count ranking as CSV text
pub fn top_notes_csv(rows: &[(TicketHandle, usize)]) -> SessionResult<String> {
    let mut out = String::from("id,student,procedure,state,notes\n");
    for (handle, count) in rows {
        let ticket = handle.read(sync_err)?;
        out.push_str(&format!(
            "{},{},{},{},{count}\n",
            ticket.id(),
            escape_field(ticket.student()),
            ticket.procedure(),
            ticket.state()
        ));
    }
    Ok(out)
}
