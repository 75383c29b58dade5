use std::fmt;

/// A single logical API operation.
///
/// Every request the client issues is tagged with one of these so failures can be
/// reported uniformly and views can track which of their operations are in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    LoadPlaybooks,
    LoadPlaybook,
    CreatePlaybook,
    DeletePlaybook,
    CreateTask,
    LoadTask,
    ConfirmTask,
    SendInteraction,
}

impl Operation {
    pub fn all() -> &'static [Operation] {
        &[
            Operation::LoadPlaybooks,
            Operation::LoadPlaybook,
            Operation::CreatePlaybook,
            Operation::DeletePlaybook,
            Operation::CreateTask,
            Operation::LoadTask,
            Operation::ConfirmTask,
            Operation::SendInteraction,
        ]
    }

    /// Stable snake_case name, used in logs and error codes.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::LoadPlaybooks => "fetch_playbooks",
            Operation::LoadPlaybook => "get_playbook",
            Operation::CreatePlaybook => "create_playbook",
            Operation::DeletePlaybook => "delete_playbook",
            Operation::CreateTask => "create_task",
            Operation::LoadTask => "get_task",
            Operation::ConfirmTask => "confirm_task",
            Operation::SendInteraction => "send_interaction",
        }
    }

    /// The message shown to the user when this operation fails.
    pub fn failure_message(&self) -> &'static str {
        match self {
            Operation::LoadPlaybooks => "Failed to load playbooks. Please try again.",
            Operation::LoadPlaybook => "Failed to load playbook. Please try again.",
            Operation::CreatePlaybook => "Failed to save playbook. Please try again.",
            Operation::DeletePlaybook => "Failed to delete playbook. Please try again.",
            Operation::CreateTask => "Failed to create task. Please try again.",
            Operation::LoadTask => "Failed to load task. Please try again.",
            Operation::ConfirmTask => "Failed to confirm task. Please try again.",
            Operation::SendInteraction => "Failed to send interaction. Please try again.",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
