mod playbook_editor;
mod playbooks;
mod task_input;
mod task_monitor;

pub use playbook_editor::PlaybookEditorView;
pub use playbooks::PlaybooksView;
pub use task_input::TaskInputView;
pub use task_monitor::{report_lines, TaskMonitorView};
