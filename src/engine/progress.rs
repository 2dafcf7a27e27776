use anyhow::Context;
use rusqlite::Connection;
use serde::Serialize;

use crate::engine::error::EngineError;
use crate::models::Project;
use crate::repo::{PipelineRepo, ProjectRepo, TaskRepo};

/// Aggregate progress of a project, derived from persisted task state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProgressSummary {
    pub completed_tasks: i64,
    pub total_tasks: i64,
    pub progress_percentage: i64,
}

/// Compute the displayed progress of a project.
///
/// Pure read. Always derives from current task states, including states set
/// by manual completion toggles outside the engine, so a board re-render is
/// accurate even when sequential mode is off. Projects without tasks fall
/// back to the stage position alone.
pub fn progress(conn: &Connection, project_id: i64) -> Result<ProgressSummary, EngineError> {
    let project = ProjectRepo::get_by_id(conn, project_id)?
        .ok_or_else(|| EngineError::NotFound(format!("Project {}", project_id)))?;
    aggregate(conn, &project)
}

/// Aggregate for an already-loaded project. Used by the transition
/// coordinator inside its transaction, where the stage reference may have
/// just been rewritten.
pub(crate) fn aggregate(conn: &Connection, project: &Project) -> Result<ProgressSummary, EngineError> {
    let project_id = project.id.context("Loaded project is missing its row id")?;
    let (completed_tasks, total_tasks) = TaskRepo::state_counts(conn, project_id)?;

    if total_tasks > 0 {
        return Ok(ProgressSummary {
            completed_tasks,
            total_tasks,
            progress_percentage: percentage(completed_tasks, total_tasks),
        });
    }

    // No tasks: progress is defined by stage position alone
    let stage = PipelineRepo::get_stage(conn, project.current_stage_id)?
        .ok_or_else(|| EngineError::NotFound(format!("Stage {}", project.current_stage_id)))?;
    let stage_count = PipelineRepo::stages_for(conn, project.workflow_type_id)?.len() as i64;

    let progress_percentage = if stage.is_terminal {
        100
    } else {
        let span = (stage_count - 1).max(1);
        (stage.position as f64 / span as f64 * 100.0).round() as i64
    };

    Ok(ProgressSummary {
        completed_tasks: 0,
        total_tasks: 0,
        progress_percentage,
    })
}

/// Rounded completion percentage; callers guarantee total > 0
pub(crate) fn percentage(completed: i64, total: i64) -> i64 {
    (completed as f64 / total as f64 * 100.0).round() as i64
}
