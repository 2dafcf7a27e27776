use anyhow::Context;
use log::debug;
use rusqlite::Connection;
use serde::Serialize;

use crate::engine::cascade;
use crate::engine::error::EngineError;
use crate::engine::progress::{self, ProgressSummary};
use crate::models::{Project, TaskState};
use crate::repo::{PipelineRepo, ProjectRepo, TaskRepo};

/// Result of a stage move, returned to the web layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TransitionResult {
    pub new_stage_id: i64,
    pub completed_tasks: i64,
    pub total_tasks: i64,
    pub progress_percentage: i64,
}

impl TransitionResult {
    fn new(new_stage_id: i64, summary: ProgressSummary) -> Self {
        Self {
            new_stage_id,
            completed_tasks: summary.completed_tasks,
            total_tasks: summary.total_tasks,
            progress_percentage: summary.progress_percentage,
        }
    }
}

/// Transition coordinator: move a project to a destination stage.
///
/// Validates the destination against the project's workflow type, resolves
/// the cascaded task states (sequential mode only), and persists the new
/// stage reference together with every changed task state as one
/// transaction. A failure anywhere rolls the whole unit back; the new stage
/// is never observable without its task states.
///
/// Moving to the current stage is a no-op that returns the live aggregate,
/// so repeated calls with the same destination are idempotent and a caller
/// that received `EngineError::Transaction` may blindly re-run the move.
pub fn move_project(
    conn: &Connection,
    project_id: i64,
    destination_stage_id: i64,
) -> Result<TransitionResult, EngineError> {
    let project = ProjectRepo::get_by_id(conn, project_id)?
        .ok_or_else(|| EngineError::NotFound(format!("Project {}", project_id)))?;

    let destination = PipelineRepo::get_stage(conn, destination_stage_id)?
        .ok_or_else(|| EngineError::NotFound(format!("Stage {}", destination_stage_id)))?;

    if destination.workflow_type_id != project.workflow_type_id {
        return Err(EngineError::InvalidStage {
            stage_id: destination_stage_id,
            workflow_type_id: project.workflow_type_id,
        });
    }

    // Idempotent no-op: already there, report the current aggregate
    if destination_stage_id == project.current_stage_id {
        let summary = progress::aggregate(conn, &project)?;
        return Ok(TransitionResult::new(destination_stage_id, summary));
    }

    let tx = conn
        .unchecked_transaction()
        .context("Failed to begin transaction")?;

    let stages = PipelineRepo::stages_for(&tx, project.workflow_type_id)?;
    let tasks = TaskRepo::list_for_project(&tx, project_id)?;

    // Non-sequential projects keep their task states exactly as found
    let assignments: Vec<(i64, TaskState)> = if project.sequential_mode {
        let states = cascade::resolve(
            stages.len(),
            destination.position as usize,
            destination.is_terminal,
            tasks.len(),
        );
        tasks
            .iter()
            .zip(states)
            .filter_map(|(task, state)| task.id.map(|id| (id, state)))
            .collect()
    } else {
        Vec::new()
    };

    ProjectRepo::set_stage(&tx, project_id, destination_stage_id)?;
    let changed = TaskRepo::set_states(&tx, &assignments)?;

    let moved = Project {
        current_stage_id: destination_stage_id,
        ..project
    };
    let summary = progress::aggregate(&tx, &moved)?;

    tx.commit().context("Failed to commit transition")?;

    debug!(
        "project {} moved to stage {} ({} task states rewritten, {}%)",
        project_id, destination_stage_id, changed, summary.progress_percentage
    );

    Ok(TransitionResult::new(destination_stage_id, summary))
}
