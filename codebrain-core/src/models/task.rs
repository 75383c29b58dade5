use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::debug;

use super::analysis::AnalysisResults;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    Planning,
    AwaitingConfirmation,
    InProgress,
    Completed,
    Failed,
}

impl TaskStatus {
    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "Pending",
            TaskStatus::Planning => "Planning",
            TaskStatus::AwaitingConfirmation => "Awaiting confirmation",
            TaskStatus::InProgress => "In progress",
            TaskStatus::Completed => "Completed",
            TaskStatus::Failed => "Failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Failed)
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskStatus::Pending => write!(f, "pending"),
            TaskStatus::Planning => write!(f, "planning"),
            TaskStatus::AwaitingConfirmation => write!(f, "awaiting_confirmation"),
            TaskStatus::InProgress => write!(f, "in_progress"),
            TaskStatus::Completed => write!(f, "completed"),
            TaskStatus::Failed => write!(f, "failed"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepState {
    Completed,
    Failed,
    Pending,
}

impl StepState {
    pub fn icon(&self) -> &'static str {
        match self {
            StepState::Completed => "✓",
            StepState::Failed => "✗",
            StepState::Pending => "○",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanStep {
    pub id: String,
    pub description: String,
    #[serde(default = "default_step_status")]
    pub status: String,
}

impl PlanStep {
    /// Any status other than `completed` or `failed` is treated as pending.
    pub fn state(&self) -> StepState {
        match self.status.as_str() {
            "completed" => StepState::Completed,
            "failed" => StepState::Failed,
            _ => StepState::Pending,
        }
    }
}

fn default_step_status() -> String {
    "pending".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    #[serde(default)]
    pub steps: Vec<PlanStep>,
    #[serde(default = "default_step_status")]
    pub status: String,
}

impl Plan {
    pub fn completed_steps(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| s.state() == StepState::Completed)
            .count()
    }
}

/// One turn of the conversation between the service and the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub content: String,
}

/// The `results` payload of a task, classified once when the task is decoded.
///
/// A payload is [`TaskResults::Analysis`] only if it is an object carrying a
/// `ui_impacts` field and parses as [`AnalysisResults`]; anything else the server
/// sends is kept verbatim in [`TaskResults::Other`].
#[derive(Debug, Clone, PartialEq, Default)]
pub enum TaskResults {
    #[default]
    None,
    Analysis(AnalysisResults),
    Other(serde_json::Value),
}

impl TaskResults {
    pub fn from_value(value: Option<serde_json::Value>) -> Self {
        let value = match value {
            None | Some(serde_json::Value::Null) => return TaskResults::None,
            Some(value) => value,
        };

        if value.get("ui_impacts").is_none() {
            return TaskResults::Other(value);
        }

        match serde_json::from_value::<AnalysisResults>(value.clone()) {
            Ok(analysis) => TaskResults::Analysis(analysis),
            Err(e) => {
                debug!("results carry ui_impacts but do not parse as analysis: {}", e);
                TaskResults::Other(value)
            }
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, TaskResults::None)
    }
}

impl<'de> Deserialize<'de> for TaskResults {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<serde_json::Value>::deserialize(deserializer)?;
        Ok(TaskResults::from_value(value))
    }
}

impl Serialize for TaskResults {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            TaskResults::None => serializer.serialize_none(),
            TaskResults::Analysis(analysis) => analysis.serialize(serializer),
            TaskResults::Other(value) => value.serialize(serializer),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub playbook_id: Option<String>,
    pub status: TaskStatus,
    #[serde(deserialize_with = "super::timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan: Option<Plan>,
    #[serde(default, skip_serializing_if = "TaskResults::is_none")]
    pub results: TaskResults,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<TaskMessage>,
}

impl Task {
    /// Analysis results, readable only once the task has completed.
    pub fn analysis(&self) -> Option<&AnalysisResults> {
        match (&self.status, &self.results) {
            (TaskStatus::Completed, TaskResults::Analysis(analysis)) => Some(analysis),
            _ => None,
        }
    }

    /// The question the service is waiting on, if any.
    ///
    /// This is the last message of a task that has not completed.
    pub fn pending_prompt(&self) -> Option<&str> {
        if self.status == TaskStatus::Completed {
            return None;
        }
        self.messages.last().map(|m| m.content.as_str())
    }

    pub fn is_awaiting_confirmation(&self) -> bool {
        self.status == TaskStatus::AwaitingConfirmation
    }
}

/// Body of `POST /tasks`.
///
/// An absent playbook is left out of the JSON entirely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskCreate {
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub playbook_id: Option<String>,
}

impl TaskCreate {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            playbook_id: None,
        }
    }

    pub fn with_playbook(mut self, playbook_id: impl Into<String>) -> Self {
        self.playbook_id = Some(playbook_id.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn task_json(status: &str, results: serde_json::Value) -> serde_json::Value {
        json!({
            "id": "t1",
            "description": "Audit login screen",
            "status": status,
            "created_at": "2024-05-01T09:00:00",
            "results": results
        })
    }

    #[test]
    fn test_task_status_wire_names() {
        let status: TaskStatus = serde_json::from_value(json!("awaiting_confirmation")).unwrap();
        assert_eq!(status, TaskStatus::AwaitingConfirmation);
        assert_eq!(TaskStatus::InProgress.to_string(), "in_progress");
        assert_eq!(
            serde_json::to_value(TaskStatus::InProgress).unwrap(),
            json!("in_progress")
        );
    }

    #[test]
    fn test_minimal_task() {
        let task: Task = serde_json::from_value(json!({
            "id": "t1",
            "description": "Audit login screen",
            "status": "pending",
            "created_at": "2024-05-01T09:00:00Z"
        }))
        .unwrap();

        assert_eq!(task.status, TaskStatus::Pending);
        assert!(task.plan.is_none());
        assert!(task.results.is_none());
        assert!(task.messages.is_empty());
        assert!(task.analysis().is_none());
    }

    #[test]
    fn test_results_tagged_as_analysis() {
        let task: Task = serde_json::from_value(task_json(
            "completed",
            json!({
                "ui_impacts": {"src/Foo.tsx": ["changed layout"]},
                "compatibility_requirements": {},
                "status": "completed"
            }),
        ))
        .unwrap();

        assert!(matches!(task.results, TaskResults::Analysis(_)));
        let analysis = task.analysis().unwrap();
        assert_eq!(analysis.ui_impacts["src/Foo.tsx"], vec!["changed layout"]);
    }

    #[test]
    fn test_analysis_hidden_until_completed() {
        let task: Task = serde_json::from_value(task_json(
            "in_progress",
            json!({"ui_impacts": {}, "status": "running"}),
        ))
        .unwrap();

        assert!(matches!(task.results, TaskResults::Analysis(_)));
        assert!(task.analysis().is_none());
    }

    #[test]
    fn test_results_without_ui_impacts_are_other() {
        let task: Task =
            serde_json::from_value(task_json("completed", json!({"summary": "done"}))).unwrap();

        assert_eq!(task.results, TaskResults::Other(json!({"summary": "done"})));
        assert!(task.analysis().is_none());
    }

    #[test]
    fn test_malformed_analysis_is_other() {
        let task: Task = serde_json::from_value(task_json(
            "completed",
            json!({"ui_impacts": "not a map"}),
        ))
        .unwrap();

        assert!(matches!(task.results, TaskResults::Other(_)));
    }

    #[test]
    fn test_null_results_are_none() {
        let task: Task = serde_json::from_value(task_json("pending", json!(null))).unwrap();
        assert!(task.results.is_none());
    }

    #[test]
    fn test_plan_step_states() {
        let plan: Plan = serde_json::from_value(json!({
            "steps": [
                {"id": "1", "description": "Scan", "status": "completed"},
                {"id": "2", "description": "Analyze", "status": "failed"},
                {"id": "3", "description": "Report", "status": "running"},
                {"id": "4", "description": "Review"}
            ]
        }))
        .unwrap();

        let states: Vec<_> = plan.steps.iter().map(|s| s.state()).collect();
        assert_eq!(
            states,
            vec![
                StepState::Completed,
                StepState::Failed,
                StepState::Pending,
                StepState::Pending
            ]
        );
        assert_eq!(plan.status, "pending");
        assert_eq!(plan.completed_steps(), 1);
        assert_eq!(StepState::Failed.icon(), "✗");
    }

    #[test]
    fn test_pending_prompt() {
        let mut task: Task = serde_json::from_value(json!({
            "id": "t1",
            "description": "d",
            "status": "in_progress",
            "created_at": "2024-05-01T09:00:00Z",
            "messages": [
                {"role": "assistant", "content": "Which platform?"},
                {"role": "assistant", "content": "Which OS version?"}
            ]
        }))
        .unwrap();

        assert_eq!(task.pending_prompt(), Some("Which OS version?"));

        task.status = TaskStatus::Completed;
        assert_eq!(task.pending_prompt(), None);
    }

    #[test]
    fn test_task_create_omits_missing_playbook() {
        let body = serde_json::to_value(TaskCreate::new("Audit login screen")).unwrap();
        assert_eq!(body, json!({"description": "Audit login screen"}));

        let body =
            serde_json::to_value(TaskCreate::new("Audit").with_playbook("pb-1")).unwrap();
        assert_eq!(body, json!({"description": "Audit", "playbook_id": "pb-1"}));
    }

    #[test]
    fn test_task_serializes_results_verbatim() {
        let task: Task = serde_json::from_value(task_json(
            "completed",
            json!({"ui_impacts": {}, "compatibility_requirements": {}, "status": "done"}),
        ))
        .unwrap();

        let value = serde_json::to_value(&task).unwrap();
        assert_eq!(value["results"]["status"], json!("done"));
        assert!(value.get("plan").is_none());
    }
}
