mod colors;
mod tokyo_night;

pub use colors::hex_to_color;
pub use tokyo_night::{Monochrome, TokyoNight};

use codebrain_core::models::{StepState, TaskStatus};
use ratatui::style::{Color, Modifier, Style};

pub trait Theme: Send + Sync {
    fn name(&self) -> &'static str;

    fn background(&self) -> Color;
    fn foreground(&self) -> Color;
    fn foreground_dim(&self) -> Color;

    fn surface(&self) -> Color;
    fn border(&self) -> Color;
    fn selection(&self) -> Color;

    fn accent(&self) -> Color;

    fn success(&self) -> Color;
    fn warning(&self) -> Color;
    fn error(&self) -> Color;
}

pub fn select_theme(color: bool) -> Box<dyn Theme> {
    if color && std::env::var_os("NO_COLOR").is_none() {
        Box::new(TokyoNight)
    } else {
        Box::new(Monochrome)
    }
}

pub fn border_style(theme: &dyn Theme, focused: bool) -> Style {
    if focused {
        Style::default()
            .fg(theme.accent())
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.border())
    }
}

pub fn status_color(theme: &dyn Theme, status: TaskStatus) -> Color {
    match status {
        TaskStatus::Completed => theme.success(),
        TaskStatus::Failed => theme.error(),
        TaskStatus::AwaitingConfirmation => theme.warning(),
        TaskStatus::Pending | TaskStatus::Planning | TaskStatus::InProgress => theme.accent(),
    }
}

pub fn step_color(theme: &dyn Theme, state: StepState) -> Color {
    match state {
        StepState::Completed => theme.success(),
        StepState::Failed => theme.error(),
        StepState::Pending => theme.foreground_dim(),
    }
}
