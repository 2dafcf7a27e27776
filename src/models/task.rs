use serde::{Deserialize, Serialize};

/// Task completion state
///
/// A closed enumeration replacing the source system's loosely-typed status
/// strings. Every call site matches exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskState {
    NotStarted,
    InProgress,
    Completed,
}

impl TaskState {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskState::NotStarted => "not_started",
            TaskState::InProgress => "in_progress",
            TaskState::Completed => "completed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "not_started" => Some(TaskState::NotStarted),
            "in_progress" => Some(TaskState::InProgress),
            "completed" => Some(TaskState::Completed),
            _ => None,
        }
    }
}

/// Task model
///
/// Exclusively owned by its project. `seq_index` values are contiguous and
/// unique within a project and define the cascade order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: Option<i64>,
    pub uuid: String,
    pub project_id: i64,
    pub title: String,
    pub seq_index: i64,
    pub state: TaskState,
    pub created_ts: i64,
    pub modified_ts: i64,
}

impl Task {
    /// Create a new task in the NotStarted state
    pub fn new(project_id: i64, title: String, seq_index: i64) -> Self {
        let now = chrono::Utc::now().timestamp();
        Self {
            id: None,
            uuid: uuid::Uuid::new_v4().to_string(),
            project_id,
            title,
            seq_index,
            state: TaskState::NotStarted,
            created_ts: now,
            modified_ts: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_state_conversion() {
        assert_eq!(TaskState::NotStarted.as_str(), "not_started");
        assert_eq!(TaskState::from_str("not_started"), Some(TaskState::NotStarted));
        assert_eq!(TaskState::InProgress.as_str(), "in_progress");
        assert_eq!(TaskState::from_str("in_progress"), Some(TaskState::InProgress));
        assert_eq!(TaskState::Completed.as_str(), "completed");
        assert_eq!(TaskState::from_str("completed"), Some(TaskState::Completed));
        assert_eq!(TaskState::from_str("Not Started"), None);
        assert_eq!(TaskState::from_str("invalid"), None);
    }

    #[test]
    fn test_task_creation() {
        let task = Task::new(7, "Collect documents".to_string(), 0);
        assert_eq!(task.project_id, 7);
        assert_eq!(task.title, "Collect documents");
        assert_eq!(task.seq_index, 0);
        assert_eq!(task.state, TaskState::NotStarted);
        assert!(task.id.is_none());
        assert!(!task.uuid.is_empty());
    }
}
