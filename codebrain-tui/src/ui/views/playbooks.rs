use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

use codebrain_core::views::EMPTY_PLAYBOOKS;

use crate::app::App;
use crate::ui::error_banner;
use crate::ui::widgets::Spinner;

pub struct PlaybooksView;

impl PlaybooksView {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let view = &app.playbooks;

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(2), Constraint::Min(5)])
            .split(area);

        if let Some(error) = view.error() {
            frame.render_widget(error_banner(app.current_theme(), error), rows[0]);
        }

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(rows[1]);

        Self::render_list(frame, columns[0], app);
        Self::render_detail(frame, columns[1], app);
    }

    fn render_list(frame: &mut Frame, area: Rect, app: &App) {
        let theme = app.current_theme();
        let view = &app.playbooks;

        let block = Block::default()
            .title(format!(" Playbooks ({}) ", view.playbooks().len()))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.border()))
            .style(Style::default().bg(theme.surface()));

        if !view.is_loaded() {
            let text = if view.is_loading() {
                format!("{} Loading playbooks...", Spinner::frame(app.animation_tick))
            } else {
                "Press r to retry".to_string()
            };
            let loading = Paragraph::new(text)
            .style(Style::default().fg(theme.foreground_dim()))
            .block(block);
            frame.render_widget(loading, area);
            return;
        }

        if view.is_empty_state() {
            let empty = Paragraph::new(EMPTY_PLAYBOOKS)
                .wrap(Wrap { trim: true })
                .style(Style::default().fg(theme.foreground_dim()))
                .block(block);
            frame.render_widget(empty, area);
            return;
        }

        let items: Vec<ListItem> = view
            .playbooks()
            .iter()
            .enumerate()
            .map(|(idx, playbook)| {
                let selected = idx == app.selected_index;
                let deleting = view.deleting() == Some(playbook.id.as_str());
                let prefix = if selected { "> " } else { "  " };
                let name_style = if deleting {
                    Style::default()
                        .fg(theme.foreground_dim())
                        .add_modifier(Modifier::CROSSED_OUT)
                } else if selected {
                    Style::default()
                        .fg(theme.accent())
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(theme.foreground())
                };
                ListItem::new(Line::from(vec![
                    Span::styled(prefix, Style::default().fg(theme.accent())),
                    Span::styled(playbook.name.clone(), name_style),
                    Span::styled(
                        format!("  {}", playbook.created_at.format(&app.datetime_format)),
                        Style::default().fg(theme.foreground_dim()),
                    ),
                ]))
            })
            .collect();

        frame.render_widget(List::new(items).block(block), area);
    }

    fn render_detail(frame: &mut Frame, area: Rect, app: &App) {
        let theme = app.current_theme();

        let block = Block::default()
            .title(" Content ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.border()))
            .style(Style::default().bg(theme.surface()));

        // the fetched copy wins over the list entry once it has arrived
        let highlighted = app.playbooks.playbooks().get(app.selected_index);
        let playbook = match (app.playbooks.selected(), highlighted) {
            (Some(opened), Some(entry)) if opened.id == entry.id => Some(opened),
            (_, entry) => entry,
        };

        let Some(playbook) = playbook else {
            frame.render_widget(block, area);
            return;
        };

        let mut lines = vec![
            Line::from(Span::styled(
                playbook.name.clone(),
                Style::default()
                    .fg(theme.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                format!("id {}", playbook.id),
                Style::default().fg(theme.foreground_dim()),
            )),
            Line::default(),
        ];
        lines.extend(
            playbook
                .content
                .lines()
                .map(|line| Line::from(line.to_string())),
        );

        let detail = Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .style(Style::default().fg(theme.foreground()))
            .block(block);
        frame.render_widget(detail, area);
    }
}
