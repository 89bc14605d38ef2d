use crate::collections::{LinkedQueue, SeqList};
use crate::dispatch::error::{DispatchError, DispatchResult};
use crate::model::{TicketHandle, TicketState};
use std::fmt;

/// Which of the two waiting lines a ticket sits in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueSide {
    Urgent,
    Normal,
}

impl fmt::Display for QueueSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueueSide::Urgent => write!(f, "urgent"),
            QueueSide::Normal => write!(f, "normal"),
        }
    }
}

/// Two waiting lines plus the record of finished cases
///
/// Dispatch order is strict: the urgent line drains before the normal line
/// is consulted. Within a line the order is arrival order. Finished tickets
/// leave the lines and accumulate in the history in completion order.
#[derive(Debug, Default)]
pub struct AttentionQueue {
    urgent: LinkedQueue<TicketHandle>,
    normal: LinkedQueue<TicketHandle>,
    history: SeqList<TicketHandle>,
}

impl AttentionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue a ticket on the side its current state calls for
    pub fn add_ticket(&mut self, handle: TicketHandle) -> DispatchResult<QueueSide> {
        let state = handle
            .read(|message| DispatchError::Sync { message })?
            .state();
        let side = if state == TicketState::Urgent {
            QueueSide::Urgent
        } else {
            QueueSide::Normal
        };
        self.queue_mut(side).enqueue(handle);
        Ok(side)
    }

    /// The ticket that would be attended next, without removing it
    pub fn next_ticket(&self) -> DispatchResult<&TicketHandle> {
        self.urgent
            .peek()
            .or_else(|_| self.normal.peek())
            .map_err(|_| DispatchError::NoTicketAvailable)
    }

    /// Remove and return the next ticket along with the side it came from
    pub fn take_next(&mut self) -> DispatchResult<(TicketHandle, QueueSide)> {
        if let Ok(handle) = self.urgent.dequeue() {
            return Ok((handle, QueueSide::Urgent));
        }
        self.normal
            .dequeue()
            .map(|handle| (handle, QueueSide::Normal))
            .map_err(|_| DispatchError::NoTicketAvailable)
    }

    pub fn move_to_history(&mut self, handle: TicketHandle) {
        self.history.push_back(handle);
    }

    pub fn total_waiting(&self) -> usize {
        self.urgent.size() + self.normal.size()
    }

    pub fn queue(&self, side: QueueSide) -> &LinkedQueue<TicketHandle> {
        match side {
            QueueSide::Urgent => &self.urgent,
            QueueSide::Normal => &self.normal,
        }
    }

    pub fn queue_mut(&mut self, side: QueueSide) -> &mut LinkedQueue<TicketHandle> {
        match side {
            QueueSide::Urgent => &mut self.urgent,
            QueueSide::Normal => &mut self.normal,
        }
    }

    pub fn history(&self) -> &SeqList<TicketHandle> {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut SeqList<TicketHandle> {
        &mut self.history
    }

    /// Which side a waiting ticket is on, if it is waiting at all
    pub fn side_of(&self, id: u32) -> Option<QueueSide> {
        if self.urgent.iter().any(|handle| handle.id() == id) {
            Some(QueueSide::Urgent)
        } else if self.normal.iter().any(|handle| handle.id() == id) {
            Some(QueueSide::Normal)
        } else {
            None
        }
    }

    /// Look a ticket up by id across both lines and the history
    pub fn find_by_id(&self, id: u32) -> Option<TicketHandle> {
        self.urgent
            .iter()
            .chain(self.normal.iter())
            .chain(self.history.iter())
            .find(|handle| handle.id() == id)
            .cloned()
    }

    /// Waiting tickets in dispatch order, urgent line first
    pub fn pending_snapshot(&self) -> Vec<TicketHandle> {
        self.urgent
            .iter()
            .chain(self.normal.iter())
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ProcedureType, Ticket};

    fn handle(id: u32, state: TicketState) -> TicketHandle {
        TicketHandle::new(Ticket::new(
            id,
            format!("Student {id}"),
            ProcedureType::Enrollment,
            state,
        ))
    }

    #[test]
    fn test_add_ticket_routes_by_state() {
        let mut queue = AttentionQueue::new();
        assert_eq!(
            queue.add_ticket(handle(1, TicketState::Queued)).unwrap(),
            QueueSide::Normal
        );
        assert_eq!(
            queue.add_ticket(handle(2, TicketState::Urgent)).unwrap(),
            QueueSide::Urgent
        );
        assert_eq!(queue.queue(QueueSide::Normal).size(), 1);
        assert_eq!(queue.queue(QueueSide::Urgent).size(), 1);
        assert_eq!(queue.total_waiting(), 2);
    }

    #[test]
    fn test_urgent_line_drains_first() {
        let mut queue = AttentionQueue::new();
        queue.add_ticket(handle(1, TicketState::Queued)).unwrap();
        queue.add_ticket(handle(2, TicketState::Urgent)).unwrap();
        queue.add_ticket(handle(3, TicketState::Urgent)).unwrap();
        queue.add_ticket(handle(4, TicketState::Queued)).unwrap();

        let order: Vec<u32> = std::iter::from_fn(|| queue.take_next().ok())
            .map(|(h, _)| h.id())
            .collect();
        assert_eq!(order, vec![2, 3, 1, 4]);
    }

    #[test]
    fn test_next_ticket_peeks_without_removing() {
        let mut queue = AttentionQueue::new();
        queue.add_ticket(handle(1, TicketState::Queued)).unwrap();
        assert_eq!(queue.next_ticket().unwrap().id(), 1);
        assert_eq!(queue.total_waiting(), 1);
    }

    #[test]
    fn test_empty_dispatch_reports_no_ticket() {
        let mut queue = AttentionQueue::new();
        assert_eq!(
            queue.next_ticket().unwrap_err(),
            DispatchError::NoTicketAvailable
        );
        assert_eq!(
            queue.take_next().unwrap_err(),
            DispatchError::NoTicketAvailable
        );
    }

    #[test]
    fn test_side_of_and_find_by_id() {
        let mut queue = AttentionQueue::new();
        queue.add_ticket(handle(1, TicketState::Queued)).unwrap();
        queue.add_ticket(handle(2, TicketState::Urgent)).unwrap();
        queue.move_to_history(handle(3, TicketState::Completed));

        assert_eq!(queue.side_of(1), Some(QueueSide::Normal));
        assert_eq!(queue.side_of(2), Some(QueueSide::Urgent));
        assert_eq!(queue.side_of(3), None);

        assert_eq!(queue.find_by_id(3).unwrap().id(), 3);
        assert!(queue.find_by_id(99).is_none());
    }

    #[test]
    fn test_pending_snapshot_orders_urgent_first() {
        let mut queue = AttentionQueue::new();
        queue.add_ticket(handle(1, TicketState::Queued)).unwrap();
        queue.add_ticket(handle(2, TicketState::Urgent)).unwrap();
        queue.add_ticket(handle(3, TicketState::Queued)).unwrap();

        let ids: Vec<u32> = queue.pending_snapshot().iter().map(|h| h.id()).collect();
        assert_eq!(ids, vec![2, 1, 3]);
        // snapshot leaves the lines untouched
        assert_eq!(queue.total_waiting(), 3);
    }
}
