use thiserror::Error;

/// Engine error taxonomy
///
/// `InvalidStage` and `NotFound` are caller errors (bad input or stale UI
/// state) and must never be retried. `Transaction` wraps persistence-layer
/// failures; the coordinator retries nothing itself, and because a move is
/// idempotent for identical inputs the caller may safely re-run the whole
/// operation.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Stage {stage_id} does not belong to workflow type {workflow_type_id}")]
    InvalidStage {
        stage_id: i64,
        workflow_type_id: i64,
    },

    #[error("{0} not found")]
    NotFound(String),

    #[error("Transaction failed: {0}")]
    Transaction(#[from] anyhow::Error),
}

impl EngineError {
    /// Whether the caller may retry the whole operation
    pub fn is_retryable(&self) -> bool {
        matches!(self, EngineError::Transaction(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryability() {
        let invalid = EngineError::InvalidStage {
            stage_id: 3,
            workflow_type_id: 1,
        };
        assert!(!invalid.is_retryable());
        assert!(!EngineError::NotFound("Project 9".to_string()).is_retryable());
        assert!(EngineError::Transaction(anyhow::anyhow!("db locked")).is_retryable());
    }

    #[test]
    fn test_messages_name_the_offender() {
        let err = EngineError::InvalidStage {
            stage_id: 3,
            workflow_type_id: 1,
        };
        assert!(err.to_string().contains("Stage 3"));
        assert!(err.to_string().contains("workflow type 1"));
    }
}
