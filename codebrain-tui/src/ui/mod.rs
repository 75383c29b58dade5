pub mod views;
pub mod widgets;

use ratatui::{
    layout::{Constraint, Direction, Layout, Margin},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Paragraph, Wrap},
    Frame,
};

use codebrain_core::Route;

use crate::app::App;
use crate::theme::Theme;
use views::{PlaybookEditorView, PlaybooksView, TaskInputView, TaskMonitorView};
use widgets::{Footer, Header};

pub const CURSOR: &str = "▏";

pub fn draw(frame: &mut Frame, app: &App) {
    let theme = app.current_theme();
    let size = frame.area();

    frame.render_widget(
        Block::default().style(
            Style::default()
                .bg(theme.background())
                .fg(theme.foreground()),
        ),
        size,
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(8),
            Constraint::Length(1),
        ])
        .split(size);

    Header::render(frame, chunks[0], app);

    let content_area = chunks[1].inner(Margin::new(1, 0));
    match app.route {
        Route::TaskInput => TaskInputView::render(frame, content_area, app),
        Route::Playbooks => PlaybooksView::render(frame, content_area, app),
        Route::NewPlaybook => PlaybookEditorView::render(frame, content_area, app),
        Route::Task(_) => TaskMonitorView::render(frame, content_area, app),
    }

    Footer::render(frame, chunks[2], app);
}

pub fn error_banner<'a>(theme: &dyn Theme, message: &'a str) -> Paragraph<'a> {
    Paragraph::new(Line::from(vec![
        Span::styled(
            "✗ ",
            Style::default()
                .fg(theme.error())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(message, Style::default().fg(theme.error())),
    ]))
    .wrap(Wrap { trim: true })
}

/// Editable text with a cursor after the last character when focused.
pub fn input_text(value: &str, focused: bool) -> Text<'static> {
    let mut lines: Vec<Line<'static>> = value
        .split('\n')
        .map(|line| Line::from(line.to_string()))
        .collect();
    if focused {
        if let Some(last) = lines.last_mut() {
            last.push_span(Span::raw(CURSOR));
        }
    }
    Text::from(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use codebrain_core::{
        CodeBrainConfig, CodeBrainError, Operation, Playbook, Task, TaskMessage, TaskResults,
        TaskStatus,
    };
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    use crate::client::{ApiMsg, PlaybookTarget};

    fn render(app: &App, width: u16, height: u16) -> String {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| draw(frame, app)).unwrap();

        let buf = terminal.backend().buffer();
        let area = buf.area;
        let mut lines = Vec::new();
        for y in area.y..area.y + area.height {
            let mut line = String::new();
            for x in area.x..area.x + area.width {
                line.push_str(buf[(x, y)].symbol());
            }
            lines.push(line.trim_end().to_string());
        }
        lines.join("\n")
    }

    fn test_app() -> App {
        App::new(&CodeBrainConfig::default())
    }

    fn task(status: TaskStatus) -> Task {
        Task {
            id: "t1".to_string(),
            description: "Audit login screen".to_string(),
            playbook_id: None,
            status,
            created_at: Utc::now(),
            plan: None,
            results: TaskResults::None,
            messages: vec![],
        }
    }

    fn open_task(app: &mut App, result: Result<Task, CodeBrainError>) {
        let load = app
            .navigate(Route::Task("t1".to_string()))
            .requests
            .pop()
            .unwrap();
        app.apply(
            load.mount,
            ApiMsg::TaskLoaded {
                ticket: load.request.ticket(),
                result,
            },
        );
    }

    #[test]
    fn test_input_text_cursor_on_last_line() {
        let text = input_text("one\ntwo", true);
        assert_eq!(text.lines.len(), 2);
        assert_eq!(text.lines[1].to_string(), format!("two{}", CURSOR));
        assert_eq!(input_text("one", false).lines[0].to_string(), "one");
    }

    #[tokio::test]
    async fn test_renders_tabs_and_validation_error() {
        let mut app = test_app();
        app.start();
        app.handle_key(crossterm::event::KeyEvent::from(
            crossterm::event::KeyCode::Enter,
        ));

        let screen = render(&app, 100, 20);
        assert!(screen.contains("New Task"));
        assert!(screen.contains("Playbooks"));
        assert!(screen.contains("Please describe the task"));
    }

    #[tokio::test]
    async fn test_renders_empty_playbook_state() {
        let mut app = test_app();
        let load = app.navigate(Route::Playbooks).requests.pop().unwrap();
        app.apply(
            load.mount,
            ApiMsg::Playbooks {
                target: PlaybookTarget::List,
                ticket: load.request.ticket(),
                result: Ok(Vec::<Playbook>::new()),
            },
        );

        let screen = render(&app, 160, 20);
        assert!(screen.contains("No playbooks found. Create one to get started."));
    }

    #[tokio::test]
    async fn test_renders_not_found_task() {
        let mut app = test_app();
        open_task(
            &mut app,
            Err(CodeBrainError::status(Operation::LoadTask, 404, "missing")),
        );

        let screen = render(&app, 100, 20);
        assert!(screen.contains("Task not found"));
        assert!(!screen.contains("Confirm plan"));
    }

    #[tokio::test]
    async fn test_renders_prompt_and_confirm_action() {
        let mut app = test_app();
        let mut awaiting = task(TaskStatus::AwaitingConfirmation);
        awaiting.messages.push(TaskMessage {
            role: Some("assistant".to_string()),
            content: "Which platforms matter?".to_string(),
        });
        open_task(&mut app, Ok(awaiting));

        let screen = render(&app, 120, 30);
        assert!(screen.contains("Audit login screen"));
        assert!(screen.contains("Awaiting confirmation"));
        assert!(screen.contains("[c] Confirm plan"));
        assert!(screen.contains("Which platforms matter?"));
    }

    #[tokio::test]
    async fn test_renders_analysis_report() {
        let mut app = test_app();
        let mut done = task(TaskStatus::Completed);
        done.results = TaskResults::from_value(Some(serde_json::json!({
            "ui_impacts": {"src/Login.tsx": ["Button moved"]},
            "compatibility_requirements": {"screen_resolutions": ["1920x1080"]}
        })));
        open_task(&mut app, Ok(done));

        let screen = render(&app, 140, 40);
        assert!(screen.contains("UI changes detected - compatibility testing recommended"));
        assert!(screen.contains("src/Login.tsx"));
        assert!(screen.contains("Button moved"));
        assert!(screen.contains("Screen Resolutions"));
        assert!(screen.contains("1920x1080"));
    }

    #[tokio::test]
    async fn test_renders_placeholders_without_impacts() {
        let mut app = test_app();
        let mut done = task(TaskStatus::Completed);
        done.results = TaskResults::from_value(Some(serde_json::json!({
            "ui_impacts": {},
            "compatibility_requirements": {}
        })));
        open_task(&mut app, Ok(done));

        let screen = render(&app, 140, 40);
        assert!(screen.contains("No significant UI impacts detected"));
        assert!(screen.contains("No UI changes detected in the code."));
        assert!(screen.contains("No specific compatibility testing requirements identified."));
    }
}
