use serde::{Deserialize, Serialize};

/// Workflow type model
///
/// A named workflow whose ordered stages form a pipeline. Projects are
/// instantiated against a workflow type and move along its stages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowType {
    pub id: Option<i64>,
    pub uuid: String,
    pub name: String,
    pub created_ts: i64,
}

impl WorkflowType {
    pub fn new(name: String) -> Self {
        Self {
            id: None,
            uuid: uuid::Uuid::new_v4().to_string(),
            name,
            created_ts: chrono::Utc::now().timestamp(),
        }
    }
}

/// Pipeline stage model
///
/// One Kanban column. Stages of a workflow type are totally ordered by
/// `position` (0-based, unique per workflow type). Created by workflow
/// administration and read-only to the synchronization engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineStage {
    pub id: Option<i64>,
    pub workflow_type_id: i64,
    pub name: String,
    pub position: i64,
    pub is_terminal: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workflow_type_creation() {
        let wt = WorkflowType::new("client-onboarding".to_string());
        assert_eq!(wt.name, "client-onboarding");
        assert!(wt.id.is_none());
        assert!(!wt.uuid.is_empty());
    }
}
