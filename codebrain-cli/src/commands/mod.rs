pub mod config;
pub mod playbooks;
pub mod report;
pub mod tasks;

pub use config::{handle_config_command, ConfigCommand};
pub use playbooks::{handle_playbooks_command, PlaybooksCommand};
pub use report::handle_report_command;
pub use tasks::{handle_tasks_command, TasksCommand};
