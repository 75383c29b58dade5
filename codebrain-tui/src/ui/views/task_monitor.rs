use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use codebrain_core::report::{
    ImpactSection, RequirementSection, IMPACTS_HEADING, REQUIREMENTS_HEADING,
};
use codebrain_core::views::{MonitorPhase, TaskMonitor, TASK_NOT_FOUND};
use codebrain_core::{AnalysisReport, Operation, Task, TaskResults};

use crate::app::{App, Focus};
use crate::theme::{border_style, status_color, step_color, Theme};
use crate::ui::widgets::Spinner;
use crate::ui::{error_banner, CURSOR};

pub struct TaskMonitorView;

impl TaskMonitorView {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = app.current_theme();
        let Some(monitor) = app.monitor.as_ref() else {
            return;
        };

        match monitor.phase() {
            MonitorPhase::Loading => {
                let loading = Paragraph::new(format!(
                    "{} Loading task {}...",
                    Spinner::frame(app.animation_tick),
                    monitor.task_id()
                ))
                .alignment(Alignment::Center)
                .style(Style::default().fg(theme.foreground_dim()));
                frame.render_widget(loading, centered_row(area));
            }
            MonitorPhase::NotFound => {
                let not_found = Paragraph::new(TASK_NOT_FOUND)
                    .alignment(Alignment::Center)
                    .style(
                        Style::default()
                            .fg(theme.error())
                            .add_modifier(Modifier::BOLD),
                    );
                frame.render_widget(not_found, centered_row(area));
            }
            MonitorPhase::Failed(message) => {
                let hint = if monitor.is_busy() {
                    "Retrying..."
                } else {
                    "Press r to retry"
                };
                let failed = Paragraph::new(vec![
                    Line::from(Span::styled(
                        message.clone(),
                        Style::default().fg(theme.error()),
                    )),
                    Line::from(Span::styled(hint, Style::default().fg(theme.foreground_dim()))),
                ])
                .alignment(Alignment::Center);
                frame.render_widget(failed, centered_row(area));
            }
            MonitorPhase::Ready(task) => Self::render_task(frame, area, app, monitor, task),
        }
    }

    fn render_task(frame: &mut Frame, area: Rect, app: &App, monitor: &TaskMonitor, task: &Task) {
        let theme = app.current_theme();

        let banner_height = if monitor.error().is_some() { 2 } else { 0 };
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5),
                Constraint::Length(banner_height),
                Constraint::Min(6),
            ])
            .split(area);

        Self::render_summary(frame, rows[0], app, task);
        if let Some(error) = monitor.error() {
            frame.render_widget(error_banner(theme, error), rows[1]);
        }

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(rows[2]);

        Self::render_plan(frame, columns[0], app, monitor, task);

        let right = if monitor.pending_prompt().is_some() {
            let split = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(7), Constraint::Min(4)])
                .split(columns[1]);
            Self::render_prompt(frame, split[0], app, monitor);
            split[1]
        } else {
            columns[1]
        };
        Self::render_results(frame, right, app, monitor, task);
    }

    fn render_summary(frame: &mut Frame, area: Rect, app: &App, task: &Task) {
        let theme = app.current_theme();
        let dim = Style::default().fg(theme.foreground_dim());

        let mut meta = vec![
            Span::styled("Status ", dim),
            Span::styled(
                task.status.label(),
                Style::default()
                    .fg(status_color(theme, task.status))
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("   Created {}", task.created_at.format(&app.datetime_format)),
                dim,
            ),
        ];
        if let Some(playbook_id) = &task.playbook_id {
            meta.push(Span::styled(format!("   Playbook {}", playbook_id), dim));
        }

        let summary = Paragraph::new(vec![
            Line::from(Span::styled(
                task.description.clone(),
                Style::default()
                    .fg(theme.foreground())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(meta),
        ])
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(format!(" Task {} ", task.id))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.border()))
                .style(Style::default().bg(theme.surface())),
        );
        frame.render_widget(summary, area);
    }

    fn render_plan(frame: &mut Frame, area: Rect, app: &App, monitor: &TaskMonitor, task: &Task) {
        let theme = app.current_theme();

        let mut lines: Vec<Line> = match &task.plan {
            Some(plan) if !plan.steps.is_empty() => plan
                .steps
                .iter()
                .map(|step| {
                    let state = step.state();
                    Line::from(vec![
                        Span::styled(
                            format!("{} ", state.icon()),
                            Style::default().fg(step_color(theme, state)),
                        ),
                        Span::styled(
                            step.description.clone(),
                            Style::default().fg(theme.foreground()),
                        ),
                    ])
                })
                .collect(),
            _ => vec![Line::from(Span::styled(
                "No plan yet",
                Style::default().fg(theme.foreground_dim()),
            ))],
        };

        if task.is_awaiting_confirmation() {
            lines.push(Line::default());
            lines.push(action_line(
                theme,
                "c",
                if monitor.is_pending(Operation::ConfirmTask) {
                    "Confirming..."
                } else {
                    "Confirm plan"
                },
                monitor.can_confirm(),
            ));
        }

        let title = match &task.plan {
            Some(plan) => format!(" Plan ({}/{}) ", plan.completed_steps(), plan.steps.len()),
            None => " Plan ".to_string(),
        };
        let plan = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.border()))
                .style(Style::default().bg(theme.surface())),
        );
        frame.render_widget(plan, area);
    }

    fn render_prompt(frame: &mut Frame, area: Rect, app: &App, monitor: &TaskMonitor) {
        let theme = app.current_theme();
        let focused = app.focus == Focus::Answer;

        let block = Block::default()
            .title(" Question ")
            .borders(Borders::ALL)
            .border_style(border_style(theme, focused))
            .style(Style::default().bg(theme.surface()));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(2)])
            .split(inner);

        let prompt = Paragraph::new(monitor.pending_prompt().unwrap_or_default().to_string())
            .wrap(Wrap { trim: true })
            .style(Style::default().fg(theme.warning()));
        frame.render_widget(prompt, rows[0]);

        let answer = if monitor.is_pending(Operation::SendInteraction) {
            Line::from(Span::styled(
                "Sending...",
                Style::default().fg(theme.foreground_dim()),
            ))
        } else if focused || !monitor.input().is_empty() {
            let cursor = if focused { CURSOR } else { "" };
            Line::from(vec![
                Span::styled("> ", Style::default().fg(theme.accent())),
                Span::styled(
                    format!("{}{}", monitor.input(), cursor),
                    Style::default().fg(theme.foreground()),
                ),
            ])
        } else {
            action_line(theme, "a", "Answer", monitor.can_interact())
        };
        frame.render_widget(Paragraph::new(answer), rows[1]);
    }

    fn render_results(
        frame: &mut Frame,
        area: Rect,
        app: &App,
        monitor: &TaskMonitor,
        task: &Task,
    ) {
        let theme = app.current_theme();

        let (title, lines) = match monitor.report() {
            Some(report) => (" Analysis ", report_lines(theme, &report, app)),
            None => match &task.results {
                TaskResults::Other(value) if task.status.is_terminal() => (
                    " Results ",
                    serde_json::to_string_pretty(value)
                        .unwrap_or_else(|_| value.to_string())
                        .lines()
                        .map(|line| Line::from(line.to_string()))
                        .collect(),
                ),
                _ => (
                    " Analysis ",
                    vec![Line::from(Span::styled(
                        "Results appear once the task has completed.",
                        Style::default().fg(theme.foreground_dim()),
                    ))],
                ),
            },
        };

        let results = Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .scroll((app.scroll, 0))
            .block(
                Block::default()
                    .title(title)
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(theme.border()))
                    .style(Style::default().bg(theme.surface())),
            );
        frame.render_widget(results, area);
    }
}

/// Lines of the analysis report: verdict, impacts per file, requirement groups.
pub fn report_lines<'a>(
    theme: &dyn Theme,
    report: &AnalysisReport<'a>,
    app: &App,
) -> Vec<Line<'a>> {
    let heading = Style::default()
        .fg(theme.accent())
        .add_modifier(Modifier::BOLD);
    let dim = Style::default().fg(theme.foreground_dim());
    let verdict_color = if report.has_ui_impacts {
        theme.warning()
    } else {
        theme.success()
    };

    let mut lines = vec![
        Line::from(Span::styled(
            report.verdict(),
            Style::default()
                .fg(verdict_color)
                .add_modifier(Modifier::BOLD),
        )),
        Line::default(),
        Line::from(Span::styled(IMPACTS_HEADING, heading)),
    ];

    match &report.impacts {
        ImpactSection::Entries(entries) => {
            for (idx, entry) in entries.iter().enumerate() {
                let collapsed = app.collapsed.contains(entry.path);
                let marker = if collapsed { "▸" } else { "▾" };
                let cursor = if idx == app.report_cursor { ">" } else { " " };
                lines.push(Line::from(vec![
                    Span::styled(format!("{cursor}{marker} "), Style::default().fg(theme.accent())),
                    Span::styled(
                        entry.path,
                        Style::default()
                            .fg(theme.foreground())
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(format!(" ({})", entry.impacts.len()), dim),
                ]));
                if !collapsed {
                    for impact in entry.impacts {
                        lines.push(Line::from(format!("    • {}", impact)));
                    }
                }
            }
        }
        ImpactSection::Placeholder(text) => lines.push(Line::from(Span::styled(*text, dim))),
    }

    lines.push(Line::default());
    lines.push(Line::from(Span::styled(REQUIREMENTS_HEADING, heading)));

    match &report.requirements {
        RequirementSection::Groups(groups) => {
            for group in groups {
                lines.push(Line::from(Span::styled(
                    group.title.clone(),
                    Style::default()
                        .fg(theme.foreground())
                        .add_modifier(Modifier::BOLD),
                )));
                for item in group.items {
                    lines.push(Line::from(format!("  • {}", item)));
                }
            }
        }
        RequirementSection::Placeholder(text) => lines.push(Line::from(Span::styled(*text, dim))),
    }

    lines
}

fn action_line(
    theme: &dyn Theme,
    key: &'static str,
    label: &'static str,
    enabled: bool,
) -> Line<'static> {
    let (key_style, label_style) = if enabled {
        (
            Style::default()
                .fg(theme.accent())
                .add_modifier(Modifier::BOLD),
            Style::default().fg(theme.foreground()),
        )
    } else {
        (
            Style::default().fg(theme.foreground_dim()),
            Style::default().fg(theme.foreground_dim()),
        )
    };
    Line::from(vec![
        Span::styled(format!("[{key}] "), key_style),
        Span::styled(label, label_style),
    ])
}

fn centered_row(area: Rect) -> Rect {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Length(2),
            Constraint::Min(0),
        ])
        .split(area);
    rows[1]
}
