//! Per-view state objects.
//!
//! Every network action of a view is split in two: `begin_*` checks the view's
//! preconditions and hands out a [`Ticket`] (or `None` when the action is not
//! currently offered), and `finish_*` applies the response for that ticket. A ticket
//! whose generation no longer matches the view is discarded, so late responses for a
//! task the user navigated away from never touch the state. Each view also exposes an
//! `async` driver doing both halves against a [`crate::CodeBrainApi`].

mod playbooks;
mod task_creator;
mod task_monitor;

pub use playbooks::{PlaybookEditor, PlaybookListView, EMPTY_PLAYBOOKS, FILL_ALL_FIELDS};
pub use task_creator::{TaskCreator, EMPTY_DESCRIPTION};
pub use task_monitor::{MonitorPhase, TaskMonitor, TASK_NOT_FOUND};

use std::collections::HashSet;
use std::fmt;

use crate::operation::Operation;

/// Navigation targets of the application.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    TaskInput,
    Playbooks,
    NewPlaybook,
    Task(String),
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::TaskInput => "/".to_string(),
            Route::Playbooks => "/playbooks".to_string(),
            Route::NewPlaybook => "/playbooks/new".to_string(),
            Route::Task(id) => format!("/tasks/{}", id),
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::TaskInput => "New Task",
            Route::Playbooks => "Playbooks",
            Route::NewPlaybook => "New Playbook",
            Route::Task(_) => "Task",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path())
    }
}

/// Claim on one outstanding request of a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket {
    generation: u64,
    operation: Operation,
}

impl Ticket {
    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Outstanding operations of a view plus the generation tickets are checked against.
#[derive(Debug, Default)]
pub struct InFlight {
    generation: u64,
    pending: HashSet<Operation>,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `operation` unless a request for it is already outstanding.
    pub fn begin(&mut self, operation: Operation) -> Option<Ticket> {
        if !self.pending.insert(operation) {
            return None;
        }
        Some(Ticket {
            generation: self.generation,
            operation,
        })
    }

    /// Claim `operation` only if nothing at all is outstanding.
    pub fn begin_exclusive(&mut self, operation: Operation) -> Option<Ticket> {
        if !self.pending.is_empty() {
            return None;
        }
        self.begin(operation)
    }

    /// Release a ticket. Returns false if the ticket is stale and its result must be
    /// ignored.
    pub fn finish(&mut self, ticket: Ticket) -> bool {
        if ticket.generation != self.generation {
            return false;
        }
        self.pending.remove(&ticket.operation)
    }

    pub fn is_pending(&self, operation: Operation) -> bool {
        self.pending.contains(&operation)
    }

    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }

    /// Invalidate every outstanding ticket.
    pub fn reset(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.pending.clear();
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_paths() {
        assert_eq!(Route::TaskInput.path(), "/");
        assert_eq!(Route::NewPlaybook.to_string(), "/playbooks/new");
        assert_eq!(Route::Task("t1".to_string()).path(), "/tasks/t1");
    }

    #[test]
    fn test_duplicate_operation_refused() {
        let mut in_flight = InFlight::new();
        let ticket = in_flight.begin(Operation::LoadPlaybooks).unwrap();
        assert!(in_flight.begin(Operation::LoadPlaybooks).is_none());
        assert!(in_flight.begin(Operation::DeletePlaybook).is_some());
        assert!(in_flight.finish(ticket));
        assert!(!in_flight.is_pending(Operation::LoadPlaybooks));
    }

    #[test]
    fn test_exclusive_waits_for_idle() {
        let mut in_flight = InFlight::new();
        let ticket = in_flight.begin(Operation::LoadTask).unwrap();
        assert!(in_flight.begin_exclusive(Operation::ConfirmTask).is_none());
        in_flight.finish(ticket);
        assert!(in_flight.begin_exclusive(Operation::ConfirmTask).is_some());
    }

    #[test]
    fn test_reset_makes_tickets_stale() {
        let mut in_flight = InFlight::new();
        let ticket = in_flight.begin(Operation::LoadTask).unwrap();
        in_flight.reset();
        assert!(in_flight.is_idle());
        assert!(!in_flight.finish(ticket));

        let fresh = in_flight.begin(Operation::LoadTask).unwrap();
        assert_ne!(fresh.generation(), ticket.generation());
        assert!(in_flight.finish(fresh));
    }

    #[test]
    fn test_finishing_twice_is_refused() {
        let mut in_flight = InFlight::new();
        let ticket = in_flight.begin(Operation::CreateTask).unwrap();
        assert!(in_flight.finish(ticket));
        assert!(!in_flight.finish(ticket));
    }
}
