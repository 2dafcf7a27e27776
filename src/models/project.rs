use serde::{Deserialize, Serialize};

/// Project model
///
/// References its current pipeline stage and owns an ordered collection of
/// tasks. `current_stage_id` must always reference a stage belonging to
/// `workflow_type_id` and is mutated only via the transition coordinator.
///
/// When `sequential_mode` is set, task completion states are derived from
/// the current stage by the cascade resolver; when it is off, task states
/// are driven externally and stage moves leave them untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: Option<i64>,
    pub uuid: String,
    pub name: String,
    pub workflow_type_id: i64,
    pub current_stage_id: i64,
    pub sequential_mode: bool,
    pub created_ts: i64,
    pub modified_ts: i64,
}

impl Project {
    /// Create a new project at the given stage
    pub fn new(name: String, workflow_type_id: i64, current_stage_id: i64, sequential_mode: bool) -> Self {
        let now = chrono::Utc::now().timestamp();
        Self {
            id: None,
            uuid: uuid::Uuid::new_v4().to_string(),
            name,
            workflow_type_id,
            current_stage_id,
            sequential_mode,
            created_ts: now,
            modified_ts: now,
        }
    }
}
