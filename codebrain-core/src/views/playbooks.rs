use tracing::{debug, info};

use super::{InFlight, Route, Ticket};
use crate::client::CodeBrainApi;
use crate::error::{CodeBrainError, CodeBrainResult};
use crate::lifetime::ViewLifetime;
use crate::models::{Playbook, PlaybookCreate};
use crate::operation::Operation;

pub const EMPTY_PLAYBOOKS: &str = "No playbooks found. Create one to get started.";
pub const FILL_ALL_FIELDS: &str = "Please fill in all fields";

/// The playbook list, with delete and single-playbook lookup.
#[derive(Debug, Default)]
pub struct PlaybookListView {
    playbooks: Vec<Playbook>,
    loaded: bool,
    selected: Option<Playbook>,
    error: Option<String>,
    deleting: Option<String>,
    delete_failed: bool,
    in_flight: InFlight,
    lifetime: ViewLifetime,
}

impl PlaybookListView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn playbooks(&self) -> &[Playbook] {
        &self.playbooks
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// A successful load that returned nothing. Not an error.
    pub fn is_empty_state(&self) -> bool {
        self.loaded && self.playbooks.is_empty()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    pub fn selected(&self) -> Option<&Playbook> {
        self.selected.as_ref()
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_pending(Operation::LoadPlaybooks)
    }

    /// Id of the playbook currently being deleted.
    pub fn deleting(&self) -> Option<&str> {
        self.deleting.as_deref()
    }

    pub fn lifetime(&self) -> &ViewLifetime {
        &self.lifetime
    }

    pub fn close(&self) {
        self.lifetime.close();
    }

    /// Refused while a delete is outstanding; the delete claims its own reload.
    pub fn begin_load(&mut self) -> Option<Ticket> {
        if self.in_flight.is_pending(Operation::DeletePlaybook) {
            return None;
        }
        self.in_flight.begin(Operation::LoadPlaybooks)
    }

    /// Apply a list response. On failure the previously shown list stays.
    pub fn finish_load(&mut self, ticket: Ticket, result: CodeBrainResult<Vec<Playbook>>) -> bool {
        if !self.in_flight.finish(ticket) {
            debug!("Dropping stale playbook list response");
            return false;
        }

        let delete_failed = std::mem::take(&mut self.delete_failed);
        match result {
            Ok(playbooks) => {
                debug!("Loaded {} playbooks", playbooks.len());
                self.playbooks = playbooks;
                self.loaded = true;
                self.error = delete_failed
                    .then(|| Operation::DeletePlaybook.failure_message().to_string());
            }
            Err(e) => {
                e.log();
                self.error = Some(if delete_failed {
                    Operation::DeletePlaybook.failure_message().to_string()
                } else {
                    e.user_message()
                });
            }
        }
        true
    }

    pub fn begin_delete(&mut self, id: &str) -> Option<Ticket> {
        if self.in_flight.is_pending(Operation::LoadPlaybooks) {
            return None;
        }
        let ticket = self.in_flight.begin(Operation::DeletePlaybook)?;
        self.deleting = Some(id.to_string());
        Some(ticket)
    }

    /// Apply a delete response and claim the reload that always follows it.
    ///
    /// Nothing is removed locally; the list only changes once the reload lands.
    pub fn finish_delete(&mut self, ticket: Ticket, result: CodeBrainResult<()>) -> Option<Ticket> {
        if !self.in_flight.finish(ticket) {
            return None;
        }

        let id = self.deleting.take().unwrap_or_default();
        match result {
            Ok(()) => {
                info!("Deleted playbook {}", id);
                self.delete_failed = false;
            }
            Err(e) => {
                e.log();
                self.delete_failed = true;
                self.error = Some(e.user_message());
            }
        }

        self.begin_load()
    }

    pub fn begin_show(&mut self, id: &str) -> Option<Ticket> {
        if self.selected.as_ref().is_some_and(|p| p.id != id) {
            self.selected = None;
        }
        self.in_flight.begin(Operation::LoadPlaybook)
    }

    pub fn finish_show(&mut self, ticket: Ticket, result: CodeBrainResult<Playbook>) -> bool {
        if !self.in_flight.finish(ticket) {
            return false;
        }
        match result {
            Ok(playbook) => {
                self.selected = Some(playbook);
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
        if let Some(result) = self.lifetime.guard().run(api.fetch_playbooks()).await {
            self.finish_load(ticket, result);
        }
    }

    /// Delete and re-fetch. Returns true when the delete itself succeeded.
    pub async fn delete(&mut self, api: &dyn CodeBrainApi, id: &str) -> bool {
        let Some(ticket) = self.begin_delete(id) else {
            return false;
        };
        let guard = self.lifetime.guard();

        let Some(result) = guard.clone().run(api.delete_playbook(id)).await else {
            return false;
        };
        let deleted = result.is_ok();

        if let Some(reload) = self.finish_delete(ticket, result) {
            if let Some(result) = guard.run(api.fetch_playbooks()).await {
                self.finish_load(reload, result);
            }
        }
        deleted
    }

    pub async fn show(&mut self, api: &dyn CodeBrainApi, id: &str) -> Option<&Playbook> {
        let ticket = self.begin_show(id)?;
        let result = self.lifetime.guard().run(api.get_playbook(id)).await?;
        self.finish_show(ticket, result);
        self.selected.as_ref()
    }
}

/// Create-only editor for a new playbook.
#[derive(Debug, Default)]
pub struct PlaybookEditor {
    pub name: String,
    pub content: String,
    error: Option<String>,
    saved: Option<Playbook>,
    in_flight: InFlight,
    lifetime: ViewLifetime,
}

impl PlaybookEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_saving(&self) -> bool {
        !self.in_flight.is_idle()
    }

    /// The playbook the server returned for the last successful save.
    pub fn saved(&self) -> Option<&Playbook> {
        self.saved.as_ref()
    }

    pub fn lifetime(&self) -> &ViewLifetime {
        &self.lifetime
    }

    pub fn close(&self) {
        self.lifetime.close();
    }

    /// Both fields must be non-blank. The body keeps the text exactly as typed.
    pub fn validate(&self) -> CodeBrainResult<PlaybookCreate> {
        if self.name.trim().is_empty() || self.content.trim().is_empty() {
            return Err(CodeBrainError::validation(FILL_ALL_FIELDS));
        }
        Ok(PlaybookCreate::new(self.name.clone(), self.content.clone()))
    }

    pub fn begin_save(&mut self) -> Option<(Ticket, PlaybookCreate)> {
        if self.is_saving() {
            return None;
        }
        match self.validate() {
            Ok(body) => {
                self.error = None;
                let ticket = self.in_flight.begin(Operation::CreatePlaybook)?;
                Some((ticket, body))
            }
            Err(e) => {
                self.error = Some(e.user_message());
                None
            }
        }
    }

    /// Returns the route to leave for when the playbook was created.
    pub fn finish_save(
        &mut self,
        ticket: Ticket,
        result: CodeBrainResult<Playbook>,
    ) -> Option<Route> {
        if !self.in_flight.finish(ticket) {
            return None;
        }
        match result {
            Ok(playbook) => {
                info!("Created playbook {} ({})", playbook.name, playbook.id);
                self.saved = Some(playbook);
                Some(Route::Playbooks)
            }
            Err(e) => {
                e.log();
                self.error = Some(e.user_message());
                None
            }
        }
    }

    pub async fn save(&mut self, api: &dyn CodeBrainApi) -> Option<Route> {
        let (ticket, body) = self.begin_save()?;
        let result = self.lifetime.guard().run(api.create_playbook(&body)).await?;
        self.finish_save(ticket, result)
    }
}
