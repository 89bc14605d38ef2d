//! Session persistence across controller restarts

use attendq::core::time::SystemClock;
use attendq::core::{DeskController, SessionError};
use attendq::model::{ProcedureType, TicketState};
use attendq::persist::CsvStore;
use std::sync::Arc;
use tempfile::TempDir;

fn sync_err(message: String) -> SessionError {
    SessionError::Sync { message }
}

fn desk_at(dir: &TempDir) -> DeskController {
    DeskController::new(Arc::new(SystemClock), Some(CsvStore::new(dir.path())))
}

#[test]
fn test_session_survives_restart() {
    let dir = TempDir::new().unwrap();

    {
        let mut desk = desk_at(&dir);
        desk.create_ticket("Ana Pérez", ProcedureType::Certificate, false)
            .unwrap();
        let luis = desk
            .create_ticket("Luis Gómez, Jr.", ProcedureType::Enrollment, true)
            .unwrap();
        desk.add_note(luis.id(), "missing \"official\" stamp, will return")
            .unwrap();
        desk.attend_next().unwrap();
        desk.finalize_ticket(luis.id()).unwrap();
        desk.shutdown().unwrap();
    }

    let mut desk = desk_at(&dir);
    assert_eq!(desk.load().unwrap(), 2);
    assert_eq!(desk.total_waiting(), 1);
    assert_eq!(desk.list_history().len(), 1);

    let luis = desk.find_by_id(2).unwrap();
    let guard = luis.read(sync_err).unwrap();
    assert_eq!(guard.student(), "Luis Gómez, Jr.");
    assert_eq!(guard.state(), TicketState::Completed);
    assert_eq!(guard.notes().size(), 1);
    assert_eq!(
        guard.notes().iter().next().unwrap().observation(),
        "missing \"official\" stamp, will return"
    );
}

#[test]
fn test_eager_persistence_without_shutdown() {
    let dir = TempDir::new().unwrap();
    {
        let mut desk = desk_at(&dir);
        desk.create_ticket("Eva Ruiz", ProcedureType::CourseWithdrawal, false)
            .unwrap();
        // no shutdown: the create itself must have hit the store
    }

    let mut desk = desk_at(&dir);
    assert_eq!(desk.load().unwrap(), 1);
    let eva = desk.find_by_id(1).unwrap();
    assert_eq!(eva.read(sync_err).unwrap().student(), "Eva Ruiz");
}

#[test]
fn test_missing_store_starts_empty() {
    let dir = TempDir::new().unwrap();
    let mut desk = DeskController::new(
        Arc::new(SystemClock),
        Some(CsvStore::new(dir.path().join("fresh"))),
    );
    assert_eq!(desk.load().unwrap(), 0);
    assert_eq!(desk.total_waiting(), 0);
}

#[test]
fn test_new_ids_never_collide_after_restart() {
    let dir = TempDir::new().unwrap();
    {
        let mut desk = desk_at(&dir);
        for _ in 0..3 {
            desk.create_ticket("Someone", ProcedureType::Other, false)
                .unwrap();
        }
        desk.shutdown().unwrap();
    }

    let mut desk = desk_at(&dir);
    desk.load().unwrap();
    let fresh = desk
        .create_ticket("Newcomer", ProcedureType::Other, false)
        .unwrap();
    assert_eq!(fresh.id(), 4);
}
