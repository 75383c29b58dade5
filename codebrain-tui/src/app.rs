use std::collections::HashSet;

use codebrain_core::views::{
    MonitorPhase, PlaybookEditor, PlaybookListView, TaskCreator, TaskMonitor,
};
use codebrain_core::{CodeBrainConfig, Route, ViewLifetime};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::debug;

use crate::client::{ApiMsg, Pending, PlaybookTarget, Request};
use crate::theme::{select_theme, Theme};

/// Tabs in display order. The task tab only exists once a task has been opened.
pub fn tab_routes(last_task: Option<&str>) -> Vec<Route> {
    let mut routes = vec![Route::TaskInput, Route::Playbooks, Route::NewPlaybook];
    if let Some(id) = last_task {
        routes.push(Route::Task(id.to_string()));
    }
    routes
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    None,
    Description,
    PlaybookSelect,
    Name,
    Content,
    Answer,
}

impl Focus {
    pub fn is_text_input(&self) -> bool {
        matches!(
            self,
            Focus::Description | Focus::Name | Focus::Content | Focus::Answer
        )
    }
}

/// Everything the event loop has to act on after a key or a response.
#[derive(Debug, Default)]
pub struct Effects {
    pub requests: Vec<Pending>,
}

impl Effects {
    fn push(&mut self, pending: Option<Pending>) {
        if let Some(pending) = pending {
            self.requests.push(pending);
        }
    }

    fn extend(&mut self, other: Effects) {
        self.requests.extend(other.requests);
    }
}

pub struct App {
    pub should_quit: bool,
    pub route: Route,
    pub focus: Focus,
    pub creator: TaskCreator,
    pub playbooks: PlaybookListView,
    pub editor: PlaybookEditor,
    pub monitor: Option<TaskMonitor>,
    pub last_task: Option<String>,
    pub selected_index: usize,
    pub report_cursor: usize,
    pub collapsed: HashSet<String>,
    pub scroll: u16,
    pub status_message: Option<String>,
    pub endpoint: String,
    pub datetime_format: String,
    pub animation_tick: u64,
    /// Bumped on every navigation; responses from an earlier mount are dropped.
    pub mount: u64,
    theme: Box<dyn Theme>,
}

impl App {
    pub fn new(config: &CodeBrainConfig) -> Self {
        Self {
            should_quit: false,
            route: Route::TaskInput,
            focus: Focus::Description,
            creator: TaskCreator::new(),
            playbooks: PlaybookListView::new(),
            editor: PlaybookEditor::new(),
            monitor: None,
            last_task: None,
            selected_index: 0,
            report_cursor: 0,
            collapsed: HashSet::new(),
            scroll: 0,
            status_message: Some("Tab switches views, Esc leaves a field, q quits".to_string()),
            endpoint: config.api.endpoint_base(),
            datetime_format: config.display.datetime_format.clone(),
            animation_tick: 0,
            mount: 0,
            theme: select_theme(config.display.color),
        }
    }

    pub fn current_theme(&self) -> &dyn Theme {
        self.theme.as_ref()
    }

    /// Mount the first view.
    pub fn start(&mut self) -> Effects {
        self.navigate(Route::TaskInput)
    }

    pub fn on_tick(&mut self) {
        self.animation_tick = self.animation_tick.wrapping_add(1);
    }

    pub fn is_busy(&self) -> bool {
        match &self.route {
            Route::TaskInput => self.creator.is_submitting(),
            Route::Playbooks => self.playbooks.is_loading() || self.playbooks.deleting().is_some(),
            Route::NewPlaybook => self.editor.is_saving(),
            Route::Task(_) => self.monitor.as_ref().is_some_and(|m| m.is_busy()),
        }
    }

    /// Unmount the current view and mount a fresh one for `route`.
    pub fn navigate(&mut self, route: Route) -> Effects {
        debug!("Navigating to {}", route.path());
        self.close_current();
        self.mount = self.mount.wrapping_add(1);
        self.selected_index = 0;
        self.scroll = 0;

        self.route = route.clone();

        let mut effects = Effects::default();
        match route {
            Route::TaskInput => {
                self.creator = TaskCreator::new();
                self.focus = Focus::Description;
                if let Some(ticket) = self.creator.begin_load_playbooks() {
                    effects.push(Some(self.pending(Request::LoadPlaybooks {
                        target: PlaybookTarget::Creator,
                        ticket,
                    })));
                }
            }
            Route::Playbooks => {
                self.playbooks = PlaybookListView::new();
                self.focus = Focus::None;
                effects.push(self.load_playbook_list());
            }
            Route::NewPlaybook => {
                self.editor = PlaybookEditor::new();
                self.focus = Focus::Name;
            }
            Route::Task(id) => {
                let mut monitor = TaskMonitor::new(id.clone());
                self.focus = Focus::None;
                self.report_cursor = 0;
                self.collapsed.clear();
                let load = monitor.begin_load();
                self.monitor = Some(monitor);
                if let Some(ticket) = load {
                    effects.push(Some(self.pending(Request::LoadTask {
                        ticket,
                        id: id.clone(),
                    })));
                }
                self.last_task = Some(id);
            }
        }
        effects
    }

    fn close_current(&mut self) {
        match &self.route {
            Route::TaskInput => self.creator.close(),
            Route::Playbooks => self.playbooks.close(),
            Route::NewPlaybook => self.editor.close(),
            Route::Task(_) => {
                if let Some(mut monitor) = self.monitor.take() {
                    monitor.close();
                }
            }
        }
    }

    /// Tie a request to the lifetime of the view currently mounted.
    fn pending(&self, request: Request) -> Pending {
        let guard = match &self.route {
            Route::TaskInput => self.creator.lifetime().guard(),
            Route::Playbooks => self.playbooks.lifetime().guard(),
            Route::NewPlaybook => self.editor.lifetime().guard(),
            Route::Task(_) => match &self.monitor {
                Some(monitor) => monitor.lifetime().guard(),
                // the temporary lifetime closes on drop, so the request never runs
                None => ViewLifetime::new().guard(),
            },
        };
        Pending::new(request, guard, self.mount)
    }

    fn load_playbook_list(&mut self) -> Option<Pending> {
        let guard = self.playbooks.lifetime().guard();
        let ticket = self.playbooks.begin_load()?;
        Some(Pending::new(
            Request::LoadPlaybooks {
                target: PlaybookTarget::List,
                ticket,
            },
            guard,
            self.mount,
        ))
    }

    fn cycle_tab(&mut self, forward: bool) -> Effects {
        let routes = tab_routes(self.last_task.as_deref());
        let idx = routes.iter().position(|r| *r == self.route).unwrap_or(0);
        let next = if forward {
            (idx + 1) % routes.len()
        } else if idx == 0 {
            routes.len() - 1
        } else {
            idx - 1
        };
        self.navigate(routes[next].clone())
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Effects {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return Effects::default();
        }

        match key.code {
            KeyCode::Tab => return self.cycle_tab(true),
            KeyCode::BackTab => return self.cycle_tab(false),
            KeyCode::Char('s')
                if key.modifiers.contains(KeyModifiers::CONTROL)
                    && self.route == Route::NewPlaybook =>
            {
                return self.save_playbook();
            }
            _ => {}
        }

        if self.focus.is_text_input() {
            return self.handle_text_key(key);
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
                Effects::default()
            }
            _ => match self.route.clone() {
                Route::TaskInput => self.handle_task_input_key(key),
                Route::Playbooks => self.handle_playbooks_key(key),
                Route::NewPlaybook => self.handle_editor_key(key),
                Route::Task(_) => self.handle_monitor_key(key),
            },
        }
    }

    fn handle_text_key(&mut self, key: KeyEvent) -> Effects {
        let focus = self.focus;
        match key.code {
            KeyCode::Esc => {
                self.focus = Focus::None;
                Effects::default()
            }
            KeyCode::Enter => match focus {
                Focus::Description => self.submit_task(),
                Focus::Name => {
                    self.focus = Focus::Content;
                    Effects::default()
                }
                Focus::Content => {
                    self.editor.content.push('\n');
                    Effects::default()
                }
                Focus::Answer => self.send_answer(),
                _ => Effects::default(),
            },
            KeyCode::Down if focus == Focus::Description => {
                self.focus = Focus::PlaybookSelect;
                Effects::default()
            }
            KeyCode::Down if focus == Focus::Name => {
                self.focus = Focus::Content;
                Effects::default()
            }
            KeyCode::Up if focus == Focus::Content => {
                self.focus = Focus::Name;
                Effects::default()
            }
            KeyCode::Backspace => {
                if let Some(field) = self.text_field() {
                    field.pop();
                }
                Effects::default()
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                if let Some(field) = self.text_field() {
                    field.push(c);
                }
                Effects::default()
            }
            _ => Effects::default(),
        }
    }

    fn text_field(&mut self) -> Option<&mut String> {
        match self.focus {
            Focus::Description => Some(&mut self.creator.description),
            Focus::Name => Some(&mut self.editor.name),
            Focus::Content => Some(&mut self.editor.content),
            Focus::Answer => self.monitor.as_mut().map(|m| m.input_mut()),
            Focus::None | Focus::PlaybookSelect => None,
        }
    }

    fn handle_task_input_key(&mut self, key: KeyEvent) -> Effects {
        match key.code {
            KeyCode::Enter if self.focus == Focus::PlaybookSelect => return self.submit_task(),
            KeyCode::Enter | KeyCode::Char('i') => self.focus = Focus::Description,
            KeyCode::Up if self.focus == Focus::PlaybookSelect => self.focus = Focus::Description,
            KeyCode::Down if self.focus == Focus::None => self.focus = Focus::PlaybookSelect,
            KeyCode::Left | KeyCode::Char('h') if self.focus == Focus::PlaybookSelect => {
                self.cycle_playbook(false)
            }
            KeyCode::Right | KeyCode::Char('l') if self.focus == Focus::PlaybookSelect => {
                self.cycle_playbook(true)
            }
            _ => {}
        }
        Effects::default()
    }

    /// Step through "no playbook" followed by every loaded playbook.
    fn cycle_playbook(&mut self, forward: bool) {
        let ids: Vec<Option<String>> = std::iter::once(None)
            .chain(self.creator.playbooks().iter().map(|p| Some(p.id.clone())))
            .collect();
        let idx = ids
            .iter()
            .position(|id| *id == self.creator.playbook_id)
            .unwrap_or(0);
        let next = if forward {
            (idx + 1) % ids.len()
        } else if idx == 0 {
            ids.len() - 1
        } else {
            idx - 1
        };
        self.creator.playbook_id = ids[next].clone();
    }

    fn submit_task(&mut self) -> Effects {
        let mut effects = Effects::default();
        if let Some((ticket, body)) = self.creator.begin_create() {
            effects.push(Some(self.pending(Request::CreateTask { ticket, body })));
            self.status_message = Some("Creating task...".to_string());
        }
        effects
    }

    fn handle_playbooks_key(&mut self, key: KeyEvent) -> Effects {
        let mut effects = Effects::default();
        let count = self.playbooks.playbooks().len();
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                if self.selected_index + 1 < count {
                    self.selected_index += 1;
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.selected_index = self.selected_index.saturating_sub(1);
            }
            KeyCode::Char('r') if self.playbooks.deleting().is_none() => {
                effects.push(self.load_playbook_list())
            }
            KeyCode::Char('n') => return self.navigate(Route::NewPlaybook),
            KeyCode::Char('x') => self.playbooks.dismiss_error(),
            KeyCode::Enter => {
                if let Some(id) = self.selected_playbook_id() {
                    if let Some(ticket) = self.playbooks.begin_show(&id) {
                        effects.push(Some(self.pending(Request::GetPlaybook { ticket, id })));
                    }
                }
            }
            KeyCode::Char('d') => {
                if let Some(id) = self.selected_playbook_id() {
                    if let Some(ticket) = self.playbooks.begin_delete(&id) {
                        self.status_message = Some(format!("Deleting playbook {}...", id));
                        effects.push(Some(self.pending(Request::DeletePlaybook { ticket, id })));
                    }
                }
            }
            _ => {}
        }
        effects
    }

    fn selected_playbook_id(&self) -> Option<String> {
        self.playbooks
            .playbooks()
            .get(self.selected_index)
            .map(|p| p.id.clone())
    }

    fn handle_editor_key(&mut self, key: KeyEvent) -> Effects {
        match key.code {
            KeyCode::Enter | KeyCode::Char('i') => self.focus = Focus::Name,
            KeyCode::Char('b') => return self.navigate(Route::Playbooks),
            _ => {}
        }
        Effects::default()
    }

    fn save_playbook(&mut self) -> Effects {
        let mut effects = Effects::default();
        if let Some((ticket, body)) = self.editor.begin_save() {
            effects.push(Some(self.pending(Request::CreatePlaybook { ticket, body })));
            self.status_message = Some("Saving playbook...".to_string());
        }
        effects
    }

    fn handle_monitor_key(&mut self, key: KeyEvent) -> Effects {
        let mut effects = Effects::default();
        let Some(monitor) = self.monitor.as_mut() else {
            return effects;
        };
        let id = monitor.task_id().to_string();

        match key.code {
            KeyCode::Char('r') => {
                if let Some(ticket) = monitor.begin_load() {
                    effects.push(Some(self.pending(Request::LoadTask { ticket, id })));
                }
            }
            KeyCode::Char('c') => {
                if let Some(ticket) = monitor.begin_confirm() {
                    effects.push(Some(self.pending(Request::ConfirmTask { ticket, id })));
                }
            }
            KeyCode::Enter | KeyCode::Char('a') => {
                if monitor.pending_prompt().is_some() {
                    self.focus = Focus::Answer;
                }
            }
            KeyCode::Char('j') | KeyCode::Down => {
                let entries = self.impact_paths().len();
                if self.report_cursor + 1 < entries {
                    self.report_cursor += 1;
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.report_cursor = self.report_cursor.saturating_sub(1);
            }
            KeyCode::Char(' ') => {
                if let Some(path) = self.impact_paths().get(self.report_cursor).cloned() {
                    if !self.collapsed.remove(&path) {
                        self.collapsed.insert(path);
                    }
                }
            }
            KeyCode::PageDown => self.scroll = self.scroll.saturating_add(5),
            KeyCode::PageUp => self.scroll = self.scroll.saturating_sub(5),
            _ => {}
        }
        effects
    }

    /// File paths of the impacts section, in display order.
    pub fn impact_paths(&self) -> Vec<String> {
        self.monitor
            .as_ref()
            .and_then(|m| m.task())
            .and_then(|t| t.analysis())
            .map(|a| a.ui_impacts.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn send_answer(&mut self) -> Effects {
        let mut effects = Effects::default();
        let Some(monitor) = self.monitor.as_mut() else {
            return effects;
        };
        let id = monitor.task_id().to_string();
        if let Some((ticket, input)) = monitor.begin_interaction() {
            effects.push(Some(self.pending(Request::SendInteraction { ticket, id, input })));
        }
        effects
    }

    /// Apply a response. Responses for a view that is no longer mounted are dropped.
    pub fn apply(&mut self, mount: u64, msg: ApiMsg) -> Effects {
        if mount != self.mount {
            debug!("Dropping response for unmounted view");
            return Effects::default();
        }

        let mut effects = Effects::default();
        match msg {
            ApiMsg::Playbooks {
                target: PlaybookTarget::List,
                ticket,
                result,
            } => {
                if self.playbooks.finish_load(ticket, result) {
                    let count = self.playbooks.playbooks().len();
                    self.selected_index = self.selected_index.min(count.saturating_sub(1));
                }
            }
            ApiMsg::Playbooks {
                target: PlaybookTarget::Creator,
                ticket,
                result,
            } => {
                self.creator.finish_load_playbooks(ticket, result);
            }
            ApiMsg::Playbook { ticket, result } => {
                self.playbooks.finish_show(ticket, result);
            }
            ApiMsg::PlaybookDeleted { ticket, result } => {
                let deleted = result.is_ok();
                if let Some(reload) = self.playbooks.finish_delete(ticket, result) {
                    let guard = self.playbooks.lifetime().guard();
                    effects.push(Some(Pending::new(
                        Request::LoadPlaybooks {
                            target: PlaybookTarget::List,
                            ticket: reload,
                        },
                        guard,
                        self.mount,
                    )));
                }
                self.status_message = Some(if deleted {
                    "Playbook deleted".to_string()
                } else {
                    "Delete failed".to_string()
                });
            }
            ApiMsg::PlaybookCreated { ticket, result } => {
                if let Some(route) = self.editor.finish_save(ticket, result) {
                    self.status_message = Some("Playbook saved".to_string());
                    effects.extend(self.navigate(route));
                }
            }
            ApiMsg::TaskCreated { ticket, result } => {
                if let Some(route) = self.creator.finish_create(ticket, result) {
                    self.status_message = Some(format!("Opened {}", route.path()));
                    effects.extend(self.navigate(route));
                }
            }
            ApiMsg::TaskLoaded { ticket, result } => {
                if let Some(monitor) = self.monitor.as_mut() {
                    monitor.finish_load(ticket, result);
                }
            }
            ApiMsg::TaskConfirmed { ticket, result } => {
                if let Some(monitor) = self.monitor.as_mut() {
                    if monitor.finish_confirm(ticket, result) && monitor.error().is_none() {
                        self.status_message = Some("Plan confirmed".to_string());
                    }
                }
            }
            ApiMsg::InteractionSent { ticket, result } => {
                if let Some(monitor) = self.monitor.as_mut() {
                    if monitor.finish_interaction(ticket, result) && monitor.error().is_none() {
                        self.focus = Focus::None;
                        self.status_message = Some("Response sent".to_string());
                    }
                }
            }
        }
        effects
    }

    pub fn monitor_phase(&self) -> Option<&MonitorPhase> {
        self.monitor.as_ref().map(|m| m.phase())
    }
}
