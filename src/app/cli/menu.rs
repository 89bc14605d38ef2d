//! Interactive menu loop for the desk session

use crate::app::cli::display::{
    notes_table, paint, report_csv, report_table, state_tag, ticket_table, top_notes_csv,
    top_notes_table,
};
use crate::core::error_handling::{log_error_with_context, ContextualError};
use crate::core::validation::parse_positive_int;
use crate::core::{DeskController, SessionError};
use crate::model::{ProcedureType, TicketState};
use colored::Colorize;
use std::io::{BufRead, Write};
use std::str::FromStr;

const MENU: &str = "\
 1) New ticket          6) List waiting
 2) Attend next         7) Completed history
 3) Close case          8) Report by procedure
 4) Add note            t) Top tickets by notes
 5) Show ticket         9) Change state
 u) Undo   r) Redo   j) Journal   l) Log level
 0) Exit";

/// Run the interactive session until exit or end of input
///
/// Every session error is reported and the loop continues; only I/O trouble
/// on the terminal ends the session early.
pub fn run_menu<R: BufRead>(
    desk: &mut DeskController,
    mut input: R,
    use_color: bool,
) -> std::io::Result<()> {
    loop {
        println!("\n{MENU}");
        let Some(choice) = prompt_line(&mut input, "> ")? else {
            return Ok(());
        };
        match choice.as_str() {
            "1" => {
                if let Err(e) = create_ticket(desk, &mut input, use_color)? {
                    report_error(&e, "create ticket", use_color);
                }
            }
            "2" => match desk.attend_next() {
                Ok(handle) => announce_ticket(desk, handle.id(), "now attending", use_color),
                Err(e) => report_error(&e, "attend next", use_color),
            },
            "3" => close_case(desk, &mut input, use_color)?,
            "4" => {
                if let Err(e) = add_note(desk, &mut input)? {
                    report_error(&e, "add note", use_color);
                }
            }
            "5" => {
                if let Err(e) = show_ticket(desk, &mut input, use_color)? {
                    report_error(&e, "show ticket", use_color);
                }
            }
            "6" => match ticket_table(&desk.list_pending(), use_color) {
                Ok(table) => {
                    println!("{} waiting", desk.total_waiting());
                    table.printstd();
                }
                Err(e) => report_error(&e, "list waiting", use_color),
            },
            "7" => match ticket_table(&desk.list_history(), use_color) {
                Ok(table) => table.printstd(),
                Err(e) => report_error(&e, "completed history", use_color),
            },
            "8" => match desk.pending_by_type() {
                Ok(counts) => {
                    report_table(&counts).printstd();
                    offer_export(&mut input, report_csv(&counts))?;
                }
                Err(e) => report_error(&e, "report", use_color),
            },
            "t" => {
                if let Err(e) = top_notes_report(desk, &mut input, use_color)? {
                    report_error(&e, "top tickets by notes", use_color);
                }
            }
            "9" => {
                if let Err(e) = change_state(desk, &mut input)? {
                    report_error(&e, "change state", use_color);
                }
            }
            "u" => match desk.undo() {
                Ok(Some(label)) => println!("undone: {label}"),
                Ok(None) => println!("nothing to undo"),
                Err(e) => report_error(&e, "undo", use_color),
            },
            "r" => match desk.redo() {
                Ok(Some(label)) => println!("redone: {label}"),
                Ok(None) => println!("nothing to redo"),
                Err(e) => report_error(&e, "redo", use_color),
            },
            "j" => {
                let labels = desk.journal_labels();
                if labels.is_empty() {
                    println!("journal is empty");
                } else {
                    for (index, label) in labels.iter().enumerate() {
                        println!("{:>3}  {label}", index + 1);
                    }
                }
            }
            "l" => {
                let Some(level) = prompt_line(&mut input, "Log level (error, warn, info, debug, trace): ")?
                else {
                    return Ok(());
                };
                match crate::core::logging::set_log_level(&level) {
                    Ok(()) => println!("log level set to {level}"),
                    Err(error) => eprintln!("could not change log level: {error}"),
                }
            }
            "0" | "q" | "exit" => return Ok(()),
            "" => {}
            other => println!("unknown option: {other}"),
        }
    }
}

fn create_ticket<R: BufRead>(
    desk: &mut DeskController,
    input: &mut R,
    use_color: bool,
) -> std::io::Result<Result<(), SessionError>> {
    let Some(student) = prompt_line(input, "Student name: ")? else {
        return Ok(Ok(()));
    };
    let Some(procedure_text) = prompt_line(input, "Procedure (CERTIFICATE, ENROLLMENT, CREDIT_TRANSFER, COURSE_WITHDRAWAL, OTHER): ")?
    else {
        return Ok(Ok(()));
    };
    let procedure = match ProcedureType::from_str(&procedure_text.to_uppercase()) {
        Ok(procedure) => procedure,
        Err(_) if procedure_text.is_empty() => ProcedureType::Other,
        Err(_) => {
            return Ok(Err(SessionError::Validation(
                crate::core::validation::ValidationError::new(format!(
                    "'{procedure_text}' is not a known procedure type"
                )),
            )))
        }
    };
    let Some(urgent_text) = prompt_line(input, "Urgent? [y/N]: ")? else {
        return Ok(Ok(()));
    };
    let urgent = matches!(urgent_text.as_str(), "y" | "Y" | "yes");

    Ok(desk.create_ticket(&student, procedure, urgent).map(|handle| {
        announce_ticket(desk, handle.id(), "ticket registered", use_color);
    }))
}

fn add_note<R: BufRead>(
    desk: &mut DeskController,
    input: &mut R,
) -> std::io::Result<Result<(), SessionError>> {
    let Some(id_text) = prompt_line(input, "Ticket #: ")? else {
        return Ok(Ok(()));
    };
    let Some(observation) = prompt_line(input, "Observation: ")? else {
        return Ok(Ok(()));
    };
    Ok(parse_positive_int(&id_text)
        .map_err(SessionError::from)
        .and_then(|id| desk.add_note(id, &observation))
        .map(|note| println!("note {} recorded", note.seq())))
}

fn show_ticket<R: BufRead>(
    desk: &mut DeskController,
    input: &mut R,
    use_color: bool,
) -> std::io::Result<Result<(), SessionError>> {
    let Some(id_text) = prompt_line(input, "Ticket #: ")? else {
        return Ok(Ok(()));
    };
    let result = parse_positive_int(&id_text)
        .map_err(SessionError::from)
        .and_then(|id| {
            announce_ticket(desk, id, "ticket", use_color);
            let handle = desk.find_by_id(id)?;
            notes_table(&handle).map(|table| table.printstd())
        });
    Ok(result)
}

fn change_state<R: BufRead>(
    desk: &mut DeskController,
    input: &mut R,
) -> std::io::Result<Result<(), SessionError>> {
    let Some(id_text) = prompt_line(input, "Ticket #: ")? else {
        return Ok(Ok(()));
    };
    let id = match parse_positive_int(&id_text) {
        Ok(id) => id,
        Err(e) => return Ok(Err(e.into())),
    };
    match desk.allowed_next_states(id) {
        Ok(states) => {
            let options: Vec<String> = states.iter().map(|s| s.to_string()).collect();
            println!("allowed: {}", options.join(", "));
        }
        Err(e) => return Ok(Err(e)),
    }
    let Some(state_text) = prompt_line(input, "New state: ")? else {
        return Ok(Ok(()));
    };
    let to = match TicketState::from_str(&state_text.to_uppercase()) {
        Ok(state) => state,
        Err(_) => {
            return Ok(Err(SessionError::Validation(
                crate::core::validation::ValidationError::new(format!(
                    "'{state_text}' is not a known state"
                )),
            )))
        }
    };
    Ok(desk
        .change_state(id, to)
        .map(|previous| println!("moved {previous} -> {to}")))
}

fn announce_ticket(desk: &DeskController, id: u32, prefix: &str, use_color: bool) {
    if let Ok(handle) = desk.find_by_id(id) {
        if let Ok(ticket) = handle.read(|message| SessionError::Sync { message }) {
            println!(
                "{prefix}: #{} {} ({}) [{}]",
                ticket.id(),
                ticket.student(),
                ticket.procedure(),
                state_tag(ticket.state(), use_color)
            );
        }
    }
}

fn close_case<R: BufRead>(
    desk: &mut DeskController,
    input: &mut R,
    use_color: bool,
) -> std::io::Result<()> {
    let Some(id_text) = prompt_line(input, "Ticket #: ")? else {
        return Ok(());
    };
    let result = parse_positive_int(&id_text)
        .map_err(SessionError::from)
        .and_then(|id| desk.finalize_ticket(id));
    match result {
        Ok(_) => println!("{}", paint("case closed", use_color)),
        Err(e) => report_error(&e, "close case", use_color),
    }
    Ok(())
}

fn top_notes_report<R: BufRead>(
    desk: &mut DeskController,
    input: &mut R,
    use_color: bool,
) -> std::io::Result<Result<(), SessionError>> {
    let Some(count_text) = prompt_line(input, "How many tickets: ")? else {
        return Ok(Ok(()));
    };
    let limit = match parse_positive_int(&count_text) {
        Ok(limit) => limit as usize,
        Err(e) => return Ok(Err(e.into())),
    };
    let rows = match desk.top_by_notes(limit) {
        Ok(rows) => rows,
        Err(e) => return Ok(Err(e)),
    };
    match top_notes_table(&rows, use_color) {
        Ok(table) => table.printstd(),
        Err(e) => return Ok(Err(e)),
    }
    let csv = match top_notes_csv(&rows) {
        Ok(csv) => csv,
        Err(e) => return Ok(Err(e)),
    };
    offer_export(input, csv)?;
    Ok(Ok(()))
}

/// Write a rendered report to a file when the user names one
fn offer_export<R: BufRead>(input: &mut R, csv: String) -> std::io::Result<()> {
    let Some(path) = prompt_line(input, "Export to file (blank to skip): ")? else {
        return Ok(());
    };
    if path.is_empty() {
        return Ok(());
    }
    match std::fs::write(&path, csv) {
        Ok(()) => println!("report written to {path}"),
        Err(error) => eprintln!("could not write {path}: {error}"),
    }
    Ok(())
}

fn report_error(error: &SessionError, context: &str, use_color: bool) {
    log_error_with_context(error, context);
    let message = error
        .user_message()
        .unwrap_or_else(|| format!("{context} failed"));
    if use_color {
        eprintln!("{}", message.red());
    } else {
        eprintln!("{message}");
    }
}

/// Print a prompt and read one trimmed line; `None` means end of input
fn prompt_line<R: BufRead>(input: &mut R, prompt: &str) -> std::io::Result<Option<String>> {
    print!("{prompt}");
    std::io::stdout().flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::time::SystemClock;
    use std::io::Cursor;
    use std::sync::Arc;

    fn desk() -> DeskController {
        DeskController::new(Arc::new(SystemClock), None)
    }

    fn run(desk: &mut DeskController, script: &str) {
        run_menu(desk, Cursor::new(script.to_string()), false).unwrap();
    }

    #[test]
    fn test_scripted_session_creates_and_closes_a_ticket() {
        let mut desk = desk();
        // create, attend, close, exit
        run(
            &mut desk,
            "1\nAna Pérez\nCERTIFICATE\nn\n2\n3\n1\n0\n",
        );
        assert_eq!(desk.total_waiting(), 0);
        assert_eq!(desk.list_history().len(), 1);
    }

    #[test]
    fn test_scripted_undo_after_create() {
        let mut desk = desk();
        run(&mut desk, "1\nLuis Gómez\nENROLLMENT\ny\nu\n0\n");
        assert_eq!(desk.total_waiting(), 0);
        assert!(desk.can_redo());
    }

    #[test]
    fn test_unknown_option_and_eof_end_cleanly() {
        let mut desk = desk();
        run(&mut desk, "zz\n");
        assert_eq!(desk.total_waiting(), 0);
    }

    #[test]
    fn test_invalid_procedure_is_reported_not_fatal() {
        let mut desk = desk();
        run(&mut desk, "1\nAna Pérez\nNOPE\nn\n0\n");
        assert_eq!(desk.total_waiting(), 0);
    }

    #[test]
    fn test_close_cancelled_at_prompt_changes_nothing() {
        let mut desk = desk();
        // input ends at the ticket-id prompt of the close option
        run(&mut desk, "1\nAna Pérez\nCERTIFICATE\nn\n2\n3\n");
        assert_eq!(desk.total_waiting(), 1);
        assert!(desk.list_history().is_empty());
    }

    #[test]
    fn test_report_export_writes_csv() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("by_procedure.csv");
        let mut desk = desk();
        run(
            &mut desk,
            &format!(
                "1\nAna Pérez\nCERTIFICATE\nn\n8\n{}\n0\n",
                path.display()
            ),
        );
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("procedure,waiting\n"));
        assert!(written.contains("CERTIFICATE,1"));
    }

    #[test]
    fn test_top_tickets_by_notes_through_menu() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("top_notes.csv");
        let mut desk = desk();
        run(
            &mut desk,
            &format!(
                "1\nAna Pérez\nOTHER\nn\n4\n1\nmissing signature\nt\n5\n{}\n0\n",
                path.display()
            ),
        );
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("1,Ana Pérez,OTHER,QUEUED,1"));
    }

    #[test]
    fn test_log_level_prompt_keeps_the_session_going() {
        let mut desk = desk();
        run(&mut desk, "l\ndebug\n1\nAna Pérez\nOTHER\nn\n0\n");
        assert_eq!(desk.total_waiting(), 1);
    }

    #[test]
    fn test_add_note_through_menu() {
        let mut desk = desk();
        run(
            &mut desk,
            "1\nAna Pérez\nOTHER\nn\n4\n1\nmissing signature\n0\n",
        );
        let handle = desk.find_by_id(1).unwrap();
        let notes = handle
            .read(|m| SessionError::Sync { message: m })
            .unwrap()
            .notes()
            .size();
        assert_eq!(notes, 1);
    }
}
