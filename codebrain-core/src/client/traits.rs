use async_trait::async_trait;
use std::sync::Arc;

use crate::error::CodeBrainResult;
use crate::models::{Playbook, PlaybookCreate, Task, TaskCreate};

/// The remote CodeBrain service.
///
/// Each method is exactly one round trip. Implementations never retry or cache, and
/// every failure is a [`crate::CodeBrainError::RequestFailed`] naming the operation.
#[async_trait]
pub trait CodeBrainApi: Send + Sync {
    async fn fetch_playbooks(&self) -> CodeBrainResult<Vec<Playbook>>;

    async fn get_playbook(&self, id: &str) -> CodeBrainResult<Playbook>;

    async fn create_playbook(&self, playbook: &PlaybookCreate) -> CodeBrainResult<Playbook>;

    /// The response body of a delete carries no contract and is discarded.
    async fn delete_playbook(&self, id: &str) -> CodeBrainResult<()>;

    async fn create_task(&self, task: &TaskCreate) -> CodeBrainResult<Task>;

    async fn get_task(&self, id: &str) -> CodeBrainResult<Task>;

    async fn confirm_task(&self, id: &str) -> CodeBrainResult<Task>;

    /// Sends `input` verbatim as the user's answer to the pending prompt.
    async fn send_interaction(&self, id: &str, input: &str) -> CodeBrainResult<Task>;
}

pub type DynCodeBrainApi = Arc<dyn CodeBrainApi>;
