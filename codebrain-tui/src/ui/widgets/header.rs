use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

use codebrain_core::VERSION;

use crate::app::{tab_routes, App};

pub struct Header;

impl Header {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = app.current_theme();

        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(20),
                Constraint::Min(20),
                Constraint::Length(32),
            ])
            .split(area);

        let logo = Paragraph::new(Line::from(vec![
            Span::styled(
                "CodeBrain ",
                Style::default()
                    .fg(theme.accent())
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("v{}", VERSION),
                Style::default().fg(theme.foreground_dim()),
            ),
        ]))
        .block(Block::default().borders(Borders::NONE))
        .style(Style::default().bg(theme.background()));
        frame.render_widget(logo, chunks[0]);

        let routes = tab_routes(app.last_task.as_deref());
        let tab_titles: Vec<Line> = routes
            .iter()
            .map(|route| {
                let style = if *route == app.route {
                    Style::default()
                        .fg(theme.accent())
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(theme.foreground_dim())
                };
                Line::from(Span::styled(route.title(), style))
            })
            .collect();

        let tabs = Tabs::new(tab_titles)
            .block(Block::default().borders(Borders::NONE))
            .style(Style::default().bg(theme.background()))
            .highlight_style(Style::default().fg(theme.accent()))
            .select(routes.iter().position(|r| *r == app.route).unwrap_or(0))
            .divider(Span::raw(" │ "));
        frame.render_widget(tabs, chunks[1]);

        let endpoint = Paragraph::new(Line::from(Span::styled(
            app.endpoint.as_str(),
            Style::default().fg(theme.foreground_dim()),
        )))
        .alignment(Alignment::Right)
        .block(Block::default().borders(Borders::NONE))
        .style(Style::default().bg(theme.background()));
        frame.render_widget(endpoint, chunks[2]);
    }
}
