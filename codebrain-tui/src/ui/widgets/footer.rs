use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use codebrain_core::Route;

use super::Spinner;
use crate::app::App;

pub struct Footer;

impl Footer {
    /// Key hints for the mounted view and the current focus.
    pub fn keybinds(app: &App) -> Vec<(&'static str, &'static str)> {
        if app.focus.is_text_input() {
            let mut hints = vec![("Esc", "Leave field"), ("Tab", "Next View")];
            match app.route {
                Route::TaskInput => hints.push(("Enter", "Create task")),
                Route::NewPlaybook => hints.push(("Ctrl-S", "Save")),
                Route::Task(_) => hints.push(("Enter", "Send")),
                Route::Playbooks => {}
            }
            return hints;
        }

        let mut hints = vec![("q", "Quit"), ("Tab", "Next View")];
        match app.route {
            Route::TaskInput => {
                hints.push(("i", "Edit"));
                hints.push(("←/→", "Playbook"));
                hints.push(("Enter", "Create task"));
            }
            Route::Playbooks => {
                hints.push(("j/k", "Navigate"));
                hints.push(("Enter", "Open"));
                hints.push(("d", "Delete"));
                hints.push(("n", "New"));
                hints.push(("r", "Refresh"));
            }
            Route::NewPlaybook => {
                hints.push(("i", "Edit"));
                hints.push(("Ctrl-S", "Save"));
                hints.push(("b", "Back"));
            }
            Route::Task(_) => {
                hints.push(("r", "Refresh"));
                hints.push(("c", "Confirm"));
                hints.push(("a", "Answer"));
                hints.push(("Space", "Fold"));
            }
        }
        hints
    }

    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = app.current_theme();

        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
            .split(area);

        let keybind_spans: Vec<Span> = Self::keybinds(app)
            .into_iter()
            .flat_map(|(key, desc)| {
                vec![
                    Span::styled(
                        format!(" {key}"),
                        Style::default()
                            .fg(theme.accent())
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(
                        format!(":{desc} "),
                        Style::default().fg(theme.foreground_dim()),
                    ),
                ]
            })
            .collect();

        let keybinds_widget = Paragraph::new(Line::from(keybind_spans))
            .block(Block::default().borders(Borders::NONE))
            .style(Style::default().bg(theme.surface()));
        frame.render_widget(keybinds_widget, chunks[0]);

        let status = app.status_message.as_deref().unwrap_or("Ready");
        let status = if app.is_busy() {
            format!("{} {}", Spinner::frame(app.animation_tick), status)
        } else {
            status.to_string()
        };
        let status_widget = Paragraph::new(Line::from(Span::styled(
            status,
            Style::default().fg(theme.foreground_dim()),
        )))
        .alignment(Alignment::Right)
        .block(Block::default().borders(Borders::NONE))
        .style(Style::default().bg(theme.surface()));
        frame.render_widget(status_widget, chunks[1]);
    }
}
