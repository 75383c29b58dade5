mod analysis;
mod playbook;
mod task;
pub(crate) mod timestamp;

pub use analysis::{AnalysisResults, CompatibilityCategory, CompatibilityRequirements};
pub use playbook::{Playbook, PlaybookCreate};
pub use task::{
    Plan, PlanStep, StepState, Task, TaskCreate, TaskMessage, TaskResults, TaskStatus,
};
pub use timestamp::parse_utc;
