use serde::Serialize;

use crate::engine::{ProgressSummary, TransitionResult};
use crate::models::{PipelineStage, Project};

/// Wire shape of a move response, as the web layer returns it
#[derive(Debug, Serialize)]
pub struct MovePayload {
    pub success: bool,
    pub progress_percentage: i64,
    pub completed_tasks: i64,
    pub total_tasks: i64,
    pub message: String,
}

impl MovePayload {
    pub fn from_result(result: &TransitionResult, stage_name: &str) -> Self {
        Self {
            success: true,
            progress_percentage: result.progress_percentage,
            completed_tasks: result.completed_tasks,
            total_tasks: result.total_tasks,
            message: format!("Moved to '{}'", stage_name),
        }
    }
}

/// Wire shape of a progress query response
#[derive(Debug, Serialize)]
pub struct ProgressPayload {
    pub progress_percentage: i64,
    pub completed_tasks: i64,
    pub total_tasks: i64,
}

impl From<ProgressSummary> for ProgressPayload {
    fn from(summary: ProgressSummary) -> Self {
        Self {
            progress_percentage: summary.progress_percentage,
            completed_tasks: summary.completed_tasks,
            total_tasks: summary.total_tasks,
        }
    }
}

/// Human-readable one-liner for a progress summary
pub fn format_progress(summary: &ProgressSummary) -> String {
    if summary.total_tasks == 0 {
        format!("{}% (no tasks)", summary.progress_percentage)
    } else {
        format!(
            "{}% ({}/{} tasks completed)",
            summary.progress_percentage, summary.completed_tasks, summary.total_tasks
        )
    }
}

/// Render the board: one line per stage, projects grouped under their column
pub fn format_board(stages: &[PipelineStage], projects: &[Project]) -> String {
    let mut out = String::new();
    for stage in stages {
        let names: Vec<&str> = projects
            .iter()
            .filter(|p| Some(p.current_stage_id) == stage.id)
            .map(|p| p.name.as_str())
            .collect();
        out.push_str(&format!("[{}] {}\n", stage.name, names.join(", ")));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_progress() {
        let summary = ProgressSummary {
            completed_tasks: 3,
            total_tasks: 5,
            progress_percentage: 60,
        };
        assert_eq!(format_progress(&summary), "60% (3/5 tasks completed)");

        let empty = ProgressSummary {
            completed_tasks: 0,
            total_tasks: 0,
            progress_percentage: 67,
        };
        assert_eq!(format_progress(&empty), "67% (no tasks)");
    }
}
