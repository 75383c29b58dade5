use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, Focus};
use crate::theme::border_style;
use crate::ui::{error_banner, input_text};

pub struct TaskInputView;

impl TaskInputView {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = app.current_theme();
        let creator = &app.creator;

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(6),
                Constraint::Length(3),
                Constraint::Length(2),
            ])
            .split(area);

        let title = if creator.is_submitting() {
            " Describe the task (creating...) "
        } else {
            " Describe the task "
        };
        let focused = app.focus == Focus::Description;
        let description = Paragraph::new(input_text(&creator.description, focused))
            .wrap(Wrap { trim: false })
            .style(text_style(app, creator.is_submitting()))
            .block(
                Block::default()
                    .title(title)
                    .borders(Borders::ALL)
                    .border_style(border_style(theme, focused))
                    .style(Style::default().bg(theme.surface())),
            );
        frame.render_widget(description, chunks[0]);

        let selected = creator
            .selected_playbook()
            .map(|p| p.name.as_str())
            .unwrap_or("None");
        let count = creator.playbooks().len();
        let selector_focused = app.focus == Focus::PlaybookSelect;
        let selector = Paragraph::new(Line::from(vec![
            Span::styled("‹ ", Style::default().fg(theme.foreground_dim())),
            Span::styled(
                selected,
                Style::default()
                    .fg(theme.foreground())
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" ›", Style::default().fg(theme.foreground_dim())),
            Span::styled(
                format!("   {} available", count),
                Style::default().fg(theme.foreground_dim()),
            ),
        ]))
        .block(
            Block::default()
                .title(" Playbook (optional) ")
                .borders(Borders::ALL)
                .border_style(border_style(theme, selector_focused))
                .style(Style::default().bg(theme.surface())),
        );
        frame.render_widget(selector, chunks[1]);

        if let Some(error) = creator.error() {
            frame.render_widget(error_banner(theme, error), chunks[2]);
        }
    }
}

fn text_style(app: &App, disabled: bool) -> Style {
    let theme = app.current_theme();
    if disabled {
        Style::default().fg(theme.foreground_dim())
    } else {
        Style::default().fg(theme.foreground())
    }
}
