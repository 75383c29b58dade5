use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, Focus};
use crate::theme::border_style;
use crate::ui::{error_banner, input_text};

pub struct PlaybookEditorView;

impl PlaybookEditorView {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = app.current_theme();
        let editor = &app.editor;

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(6),
                Constraint::Length(2),
            ])
            .split(area);

        let text_style = if editor.is_saving() {
            Style::default().fg(theme.foreground_dim())
        } else {
            Style::default().fg(theme.foreground())
        };

        let name_focused = app.focus == Focus::Name;
        let name = Paragraph::new(input_text(&editor.name, name_focused))
            .style(text_style)
            .block(
                Block::default()
                    .title(" Name ")
                    .borders(Borders::ALL)
                    .border_style(border_style(theme, name_focused))
                    .style(Style::default().bg(theme.surface())),
            );
        frame.render_widget(name, chunks[0]);

        let content_title = if editor.is_saving() {
            " Content (markdown, saving...) "
        } else {
            " Content (markdown) "
        };
        let content_focused = app.focus == Focus::Content;
        let content = Paragraph::new(input_text(&editor.content, content_focused))
            .wrap(Wrap { trim: false })
            .style(text_style)
            .block(
                Block::default()
                    .title(content_title)
                    .borders(Borders::ALL)
                    .border_style(border_style(theme, content_focused))
                    .style(Style::default().bg(theme.surface())),
            );
        frame.render_widget(content, chunks[1]);

        if let Some(error) = editor.error() {
            frame.render_widget(error_banner(theme, error), chunks[2]);
        }
    }
}
