use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A reusable, named set of markdown instructions a task can reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Playbook {
    pub id: String,
    pub name: String,
    pub content: String,
    #[serde(deserialize_with = "super::timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
}

impl Playbook {
    /// First non-empty line of the content, used as a one-line preview.
    pub fn summary(&self) -> Option<&str> {
        self.content
            .lines()
            .map(|line| line.trim().trim_start_matches('#').trim())
            .find(|line| !line.is_empty())
    }
}

/// Body of `POST /playbooks`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybookCreate {
    pub name: String,
    pub content: String,
}

impl PlaybookCreate {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_playbook_deserialize() {
        let playbook: Playbook = serde_json::from_value(serde_json::json!({
            "id": "pb-1",
            "name": "Mobile audit",
            "content": "# Steps\n\nCheck every screen",
            "created_at": "2024-03-01T10:15:00Z"
        }))
        .unwrap();

        assert_eq!(playbook.id, "pb-1");
        assert_eq!(playbook.name, "Mobile audit");
        assert_eq!(playbook.created_at.format("%Y-%m-%d").to_string(), "2024-03-01");
    }

    #[test]
    fn test_playbook_naive_timestamp() {
        let playbook: Playbook = serde_json::from_value(serde_json::json!({
            "id": "pb-2",
            "name": "n",
            "content": "c",
            "created_at": "2024-03-01T10:15:00.654321"
        }))
        .unwrap();
        assert_eq!(playbook.created_at.format("%H:%M").to_string(), "10:15");
    }

    #[test]
    fn test_playbook_summary() {
        let playbook = Playbook {
            id: "pb-1".to_string(),
            name: "x".to_string(),
            content: "\n\n## Check layout\nmore".to_string(),
            created_at: Utc::now(),
        };
        assert_eq!(playbook.summary(), Some("Check layout"));

        let empty = Playbook {
            content: "   \n".to_string(),
            ..playbook
        };
        assert_eq!(empty.summary(), None);
    }

    #[test]
    fn test_playbook_create_body() {
        let body = serde_json::to_value(PlaybookCreate::new("a", "b")).unwrap();
        assert_eq!(body, serde_json::json!({"name": "a", "content": "b"}));
    }
}
