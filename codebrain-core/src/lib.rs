#![allow(
    clippy::needless_borrows_for_generic_args,
    clippy::derivable_impls,
    clippy::type_complexity,
    clippy::len_zero
)]

pub mod client;
pub mod config;
pub mod error;
pub mod lifetime;
pub mod models;
pub mod operation;
pub mod report;
pub mod views;

pub use client::{CodeBrainApi, DynCodeBrainApi, HttpApiClient};
pub use config::{
    default_config_file, get_config_dir, ApiConfig, CodeBrainConfig, ConfigLoadError,
    DisplayConfig, LoggingConfig, TuiConfig,
};
pub use error::{CliErrorDisplay, CodeBrainError, CodeBrainResult};
pub use lifetime::{LifetimeGuard, ViewLifetime};
pub use models::{
    AnalysisResults, CompatibilityCategory, CompatibilityRequirements, Plan, PlanStep, Playbook,
    PlaybookCreate, StepState, Task, TaskCreate, TaskMessage, TaskResults, TaskStatus,
};
pub use operation::Operation;
pub use report::AnalysisReport;
pub use views::{
    InFlight, MonitorPhase, PlaybookEditor, PlaybookListView, Route, TaskCreator, TaskMonitor,
    Ticket,
};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
