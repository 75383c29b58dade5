use tracing::{info, warn};

use super::{InFlight, Route, Ticket};
use crate::client::CodeBrainApi;
use crate::error::{CodeBrainError, CodeBrainResult};
use crate::lifetime::ViewLifetime;
use crate::models::{Playbook, Task, TaskCreate};
use crate::operation::Operation;

pub const EMPTY_DESCRIPTION: &str = "Please describe the task";

/// The home view: describe a task, optionally pick a playbook, submit.
#[derive(Debug, Default)]
pub struct TaskCreator {
    pub description: String,
    pub playbook_id: Option<String>,
    playbooks: Vec<Playbook>,
    error: Option<String>,
    in_flight: InFlight,
    lifetime: ViewLifetime,
}

impl TaskCreator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options for the playbook selector. Stays empty if loading them failed.
    pub fn playbooks(&self) -> &[Playbook] {
        &self.playbooks
    }

    pub fn selected_playbook(&self) -> Option<&Playbook> {
        let id = self.playbook_id.as_deref()?;
        self.playbooks.iter().find(|p| p.id == id)
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.is_pending(Operation::CreateTask)
    }

    pub fn lifetime(&self) -> &ViewLifetime {
        &self.lifetime
    }

    pub fn close(&self) {
        self.lifetime.close();
    }

    pub fn begin_load_playbooks(&mut self) -> Option<Ticket> {
        self.in_flight.begin(Operation::LoadPlaybooks)
    }

    /// A failure here only leaves the selector empty.
    pub fn finish_load_playbooks(
        &mut self,
        ticket: Ticket,
        result: CodeBrainResult<Vec<Playbook>>,
    ) -> bool {
        if !self.in_flight.finish(ticket) {
            return false;
        }
        match result {
            Ok(playbooks) => {
                if let Some(id) = self.playbook_id.as_deref() {
                    if !playbooks.iter().any(|p| p.id == id) {
                        warn!("Selected playbook {} is no longer available", id);
                        self.playbook_id = None;
                    }
                }
                self.playbooks = playbooks;
            }
            Err(e) => warn!("Could not load playbooks for selection: {}", e),
        }
        true
    }

    pub fn validate(&self) -> CodeBrainResult<TaskCreate> {
        if self.description.trim().is_empty() {
            return Err(CodeBrainError::validation(EMPTY_DESCRIPTION));
        }
        let body = TaskCreate::new(self.description.clone());
        Ok(match &self.playbook_id {
            Some(id) => body.with_playbook(id.clone()),
            None => body,
        })
    }

    pub fn begin_create(&mut self) -> Option<(Ticket, TaskCreate)> {
        if self.is_submitting() {
            return None;
        }
        match self.validate() {
            Ok(body) => {
                self.error = None;
                let ticket = self.in_flight.begin(Operation::CreateTask)?;
                Some((ticket, body))
            }
            Err(e) => {
                self.error = Some(e.user_message());
                None
            }
        }
    }

    /// Returns the monitor route of the new task.
    pub fn finish_create(
        &mut self,
        ticket: Ticket,
        result: CodeBrainResult<Task>,
    ) -> Option<Route> {
        if !self.in_flight.finish(ticket) {
            return None;
        }
        match result {
            Ok(task) => {
                info!("Created task {}", task.id);
                Some(Route::Task(task.id))
            }
            Err(e) => {
                e.log();
                self.error = Some(e.user_message());
                None
            }
        }
    }

    pub async fn load_playbooks(&mut self, api: &dyn CodeBrainApi) {
        let Some(ticket) = self.begin_load_playbooks() else {
            return;
        };
        if let Some(result) = self.lifetime.guard().run(api.fetch_playbooks()).await {
            self.finish_load_playbooks(ticket, result);
        }
    }

    pub async fn submit(&mut self, api: &dyn CodeBrainApi) -> Option<Route> {
        let (ticket, body) = self.begin_create()?;
        let result = self.lifetime.guard().run(api.create_task(&body)).await?;
        self.finish_create(ticket, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use crate::models::TaskStatus;
    use crate::models::TaskResults;

    fn task(id: &str) -> Task {
        Task {
            id: id.to_string(),
            description: "Audit login screen".to_string(),
            playbook_id: None,
            status: TaskStatus::Pending,
            created_at: Utc::now(),
            plan: None,
            results: TaskResults::None,
            messages: vec![],
        }
    }

    #[test]
    fn test_blank_description_rejected() {
        let mut creator = TaskCreator::new();
        creator.description = "  \n ".to_string();
        assert!(creator.begin_create().is_none());
        assert_eq!(creator.error(), Some(EMPTY_DESCRIPTION));
        assert!(!creator.is_submitting());
    }

    #[test]
    fn test_create_navigates_to_monitor() {
        let mut creator = TaskCreator::new();
        creator.description = "Audit login screen".to_string();

        let (ticket, body) = creator.begin_create().unwrap();
        assert_eq!(body, TaskCreate::new("Audit login screen"));
        assert!(creator.is_submitting());
        assert!(creator.begin_create().is_none());

        let route = creator.finish_create(ticket, Ok(task("t1")));
        assert_eq!(route, Some(Route::Task("t1".to_string())));
        assert!(!creator.is_submitting());
    }

    #[test]
    fn test_create_failure_message() {
        let mut creator = TaskCreator::new();
        creator.description = "x".to_string();
        let (ticket, _) = creator.begin_create().unwrap();
        let route = creator.finish_create(
            ticket,
            Err(CodeBrainError::request_failed(Operation::CreateTask, "refused")),
        );
        assert!(route.is_none());
        assert_eq!(
            creator.error(),
            Some("Failed to create task. Please try again.")
        );
    }

    #[test]
    fn test_playbook_reference_included() {
        let mut creator = TaskCreator::new();
        creator.description = "Audit".to_string();
        creator.playbook_id = Some("pb-1".to_string());
        let (_, body) = creator.begin_create().unwrap();
        assert_eq!(body.playbook_id.as_deref(), Some("pb-1"));
    }

    #[test]
    fn test_playbook_load_failure_is_silent() {
        let mut creator = TaskCreator::new();
        let ticket = creator.begin_load_playbooks().unwrap();
        creator.finish_load_playbooks(
            ticket,
            Err(CodeBrainError::request_failed(Operation::LoadPlaybooks, "down")),
        );
        assert!(creator.playbooks().is_empty());
        assert!(creator.error().is_none());
    }
}
