use tracing::{debug, info};

use super::{InFlight, Ticket};
use crate::client::CodeBrainApi;
use crate::error::CodeBrainResult;
use crate::lifetime::ViewLifetime;
use crate::models::Task;
use crate::operation::Operation;
use crate::report::AnalysisReport;

pub const TASK_NOT_FOUND: &str = "Task not found";

#[derive(Debug, Clone, PartialEq)]
pub enum MonitorPhase {
    Loading,
    /// The server does not know the task. Terminal.
    NotFound,
    /// The first load failed; a refresh may be attempted.
    Failed(String),
    Ready(Task),
}

/// Live view over a single task.
///
/// The task shown is always the last server response; nothing is updated
/// optimistically. Every action is refused while any request for the task is
/// outstanding.
#[derive(Debug)]
pub struct TaskMonitor {
    task_id: String,
    phase: MonitorPhase,
    error: Option<String>,
    input: String,
    in_flight: InFlight,
    lifetime: ViewLifetime,
}

impl TaskMonitor {
    pub fn new(task_id: impl Into<String>) -> Self {
        Self {
            task_id: task_id.into(),
            phase: MonitorPhase::Loading,
            error: None,
            input: String::new(),
            in_flight: InFlight::new(),
            lifetime: ViewLifetime::new(),
        }
    }

    pub fn task_id(&self) -> &str {
        &self.task_id
    }

    pub fn phase(&self) -> &MonitorPhase {
        &self.phase
    }

    pub fn task(&self) -> Option<&Task> {
        match &self.phase {
            MonitorPhase::Ready(task) => Some(task),
            _ => None,
        }
    }

    /// Banner for the last failed action on a displayed task.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, input: impl Into<String>) {
        self.input = input.into();
    }

    pub fn input_mut(&mut self) -> &mut String {
        &mut self.input
    }

    pub fn is_busy(&self) -> bool {
        !self.in_flight.is_idle()
    }

    pub fn is_pending(&self, operation: Operation) -> bool {
        self.in_flight.is_pending(operation)
    }

    pub fn can_refresh(&self) -> bool {
        !self.is_busy() && self.phase != MonitorPhase::NotFound
    }

    pub fn can_confirm(&self) -> bool {
        !self.is_busy() && self.task().is_some_and(Task::is_awaiting_confirmation)
    }

    /// The prompt to answer, when answering is currently possible.
    pub fn pending_prompt(&self) -> Option<&str> {
        self.task()?.pending_prompt()
    }

    pub fn can_interact(&self) -> bool {
        !self.is_busy() && self.pending_prompt().is_some()
    }

    /// Report projection, present only for a completed task with analysis results.
    pub fn report(&self) -> Option<AnalysisReport<'_>> {
        self.task()?.analysis().map(AnalysisReport::new)
    }

    /// Point the monitor at another task. Responses for the old one are dropped.
    pub fn switch_to(&mut self, task_id: impl Into<String>) {
        let task_id = task_id.into();
        debug!("Task monitor switching from {} to {}", self.task_id, task_id);
        self.in_flight.reset();
        self.task_id = task_id;
        self.phase = MonitorPhase::Loading;
        self.error = None;
        self.input.clear();
    }

    pub fn lifetime(&self) -> &ViewLifetime {
        &self.lifetime
    }

    /// Close the view and release every outstanding claim.
    pub fn close(&mut self) {
        self.lifetime.close();
        self.in_flight.reset();
    }

    /// Claim the initial load or a manual refresh.
    pub fn begin_load(&mut self) -> Option<Ticket> {
        if !self.can_refresh() {
            return None;
        }
        self.in_flight.begin_exclusive(Operation::LoadTask)
    }

    pub fn finish_load(&mut self, ticket: Ticket, result: CodeBrainResult<Task>) -> bool {
        if !self.in_flight.finish(ticket) {
            debug!("Dropping stale response for task {}", self.task_id);
            return false;
        }

        match result {
            Ok(task) => {
                debug!("Task {} is {}", task.id, task.status);
                self.phase = MonitorPhase::Ready(task);
                self.error = None;
            }
            Err(e) if e.is_not_found() => {
                info!("Task {} not found", self.task_id);
                self.phase = MonitorPhase::NotFound;
                self.error = None;
            }
            Err(e) => {
                e.log();
                let message = e.user_message();
                if matches!(self.phase, MonitorPhase::Ready(_)) {
                    self.error = Some(message);
                } else {
                    self.phase = MonitorPhase::Failed(message);
                }
            }
        }
        true
    }

    pub fn begin_confirm(&mut self) -> Option<Ticket> {
        if !self.can_confirm() {
            return None;
        }
        self.in_flight.begin_exclusive(Operation::ConfirmTask)
    }

    pub fn finish_confirm(&mut self, ticket: Ticket, result: CodeBrainResult<Task>) -> bool {
        if !self.in_flight.finish(ticket) {
            return false;
        }
        match result {
            Ok(task) => {
                info!("Confirmed plan for task {}", task.id);
                self.phase = MonitorPhase::Ready(task);
                self.error = None;
            }
            Err(e) => {
                e.log();
                self.error = Some(e.user_message());
            }
        }
        true
    }

    /// Claim an interaction carrying the current input. Blank input is never sent.
    pub fn begin_interaction(&mut self) -> Option<(Ticket, String)> {
        if !self.can_interact() || self.input.trim().is_empty() {
            return None;
        }
        let ticket = self.in_flight.begin_exclusive(Operation::SendInteraction)?;
        Some((ticket, self.input.clone()))
    }

    /// On success the input is cleared; on failure it is kept for another attempt.
    pub fn finish_interaction(&mut self, ticket: Ticket, result: CodeBrainResult<Task>) -> bool {
        if !self.in_flight.finish(ticket) {
            return false;
        }
        match result {
            Ok(task) => {
                debug!("Interaction accepted for task {}", task.id);
                self.phase = MonitorPhase::Ready(task);
                self.input.clear();
                self.error = None;
            }
            Err(e) => {
                e.log();
                self.error = Some(e.user_message());
            }
        }
        true
    }

    pub async fn load(&mut self, api: &dyn CodeBrainApi) {
        let Some(ticket) = self.begin_load() else {
            return;
        };
        let id = self.task_id.clone();
        match self.lifetime.guard().run(api.get_task(&id)).await {
            Some(result) => {
                self.finish_load(ticket, result);
            }
            None => {
                self.in_flight.finish(ticket);
            }
        }
    }

    pub async fn refresh(&mut self, api: &dyn CodeBrainApi) {
        self.load(api).await;
    }

    /// Returns true when the server accepted the confirmation.
    pub async fn confirm(&mut self, api: &dyn CodeBrainApi) -> bool {
        let Some(ticket) = self.begin_confirm() else {
            return false;
        };
        let id = self.task_id.clone();
        let Some(result) = self.lifetime.guard().run(api.confirm_task(&id)).await else {
            self.in_flight.finish(ticket);
            return false;
        };
        let accepted = result.is_ok();
        self.finish_confirm(ticket, result) && accepted
    }

    /// Returns true when the server accepted the input.
    pub async fn send_interaction(&mut self, api: &dyn CodeBrainApi) -> bool {
        let Some((ticket, input)) = self.begin_interaction() else {
            return false;
        };
        let id = self.task_id.clone();
        let Some(result) = self
            .lifetime
            .guard()
            .run(api.send_interaction(&id, &input))
            .await
        else {
            self.in_flight.finish(ticket);
            return false;
        };
        let accepted = result.is_ok();
        self.finish_interaction(ticket, result) && accepted
    }
}
