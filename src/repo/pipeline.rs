use rusqlite::{Connection, OptionalExtension};
use crate::models::{PipelineStage, WorkflowType};
use anyhow::{Context, Result};

/// Pipeline definition repository
///
/// Read side of the ordered stage list for a workflow type. Stage rows are
/// created by workflow administration and never mutated by the engine.
pub struct PipelineRepo;

impl PipelineRepo {
    /// Create a workflow type with its ordered stages.
    ///
    /// Stage names are assigned positions 0..n in the given order; the last
    /// stage is marked terminal (the "Completed" column).
    pub fn create_workflow(conn: &Connection, name: &str, stage_names: &[String]) -> Result<WorkflowType> {
        if stage_names.is_empty() {
            anyhow::bail!("Workflow '{}' must define at least one stage", name);
        }

        let workflow = WorkflowType::new(name.to_string());
        let tx = conn.unchecked_transaction()?;

        tx.execute(
            "INSERT INTO workflow_types (uuid, name, created_ts) VALUES (?1, ?2, ?3)",
            rusqlite::params![workflow.uuid, workflow.name, workflow.created_ts],
        )
        .with_context(|| format!("Failed to create workflow type: {}", name))?;

        let workflow_id = tx.last_insert_rowid();
        let last = stage_names.len() - 1;
        for (position, stage_name) in stage_names.iter().enumerate() {
            tx.execute(
                "INSERT INTO stages (workflow_type_id, name, position, is_terminal)
                 VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![workflow_id, stage_name, position as i64, position == last],
            )
            .with_context(|| format!("Failed to create stage: {}", stage_name))?;
        }

        tx.commit()?;
        Ok(WorkflowType {
            id: Some(workflow_id),
            ..workflow
        })
    }

    /// Get workflow type by name
    pub fn get_workflow_by_name(conn: &Connection, name: &str) -> Result<Option<WorkflowType>> {
        let mut stmt = conn.prepare(
            "SELECT id, uuid, name, created_ts FROM workflow_types WHERE name = ?1"
        )?;

        let workflow = stmt.query_row([name], |row| {
            Ok(WorkflowType {
                id: Some(row.get(0)?),
                uuid: row.get(1)?,
                name: row.get(2)?,
                created_ts: row.get(3)?,
            })
        }).optional()?;

        Ok(workflow)
    }

    /// List all workflow types ordered by name
    pub fn list_workflows(conn: &Connection) -> Result<Vec<WorkflowType>> {
        let mut stmt = conn.prepare(
            "SELECT id, uuid, name, created_ts FROM workflow_types ORDER BY name"
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(WorkflowType {
                id: Some(row.get(0)?),
                uuid: row.get(1)?,
                name: row.get(2)?,
                created_ts: row.get(3)?,
            })
        })?;

        let mut workflows = Vec::new();
        for row in rows {
            workflows.push(row?);
        }
        Ok(workflows)
    }

    /// All stages of a workflow type, ascending by position
    pub fn stages_for(conn: &Connection, workflow_type_id: i64) -> Result<Vec<PipelineStage>> {
        let mut stmt = conn.prepare(
            "SELECT id, workflow_type_id, name, position, is_terminal
             FROM stages WHERE workflow_type_id = ?1 ORDER BY position"
        )?;

        let rows = stmt.query_map([workflow_type_id], |row| {
            Ok(PipelineStage {
                id: Some(row.get(0)?),
                workflow_type_id: row.get(1)?,
                name: row.get(2)?,
                position: row.get(3)?,
                is_terminal: row.get::<_, i64>(4)? != 0,
            })
        })?;

        let mut stages = Vec::new();
        for row in rows {
            stages.push(row?);
        }
        Ok(stages)
    }

    /// Get a single stage by ID
    pub fn get_stage(conn: &Connection, stage_id: i64) -> Result<Option<PipelineStage>> {
        let mut stmt = conn.prepare(
            "SELECT id, workflow_type_id, name, position, is_terminal
             FROM stages WHERE id = ?1"
        )?;

        let stage = stmt.query_row([stage_id], |row| {
            Ok(PipelineStage {
                id: Some(row.get(0)?),
                workflow_type_id: row.get(1)?,
                name: row.get(2)?,
                position: row.get(3)?,
                is_terminal: row.get::<_, i64>(4)? != 0,
            })
        }).optional()?;

        Ok(stage)
    }

    /// Get a stage of a workflow type by its position
    pub fn get_stage_at(conn: &Connection, workflow_type_id: i64, position: i64) -> Result<Option<PipelineStage>> {
        let mut stmt = conn.prepare(
            "SELECT id, workflow_type_id, name, position, is_terminal
             FROM stages WHERE workflow_type_id = ?1 AND position = ?2"
        )?;

        let stage = stmt.query_row([workflow_type_id, position], |row| {
            Ok(PipelineStage {
                id: Some(row.get(0)?),
                workflow_type_id: row.get(1)?,
                name: row.get(2)?,
                position: row.get(3)?,
                is_terminal: row.get::<_, i64>(4)? != 0,
            })
        }).optional()?;

        Ok(stage)
    }

    /// Position of a stage within the given workflow type.
    ///
    /// Returns None when the stage does not exist or belongs to a different
    /// workflow type; the engine maps that to its own error taxonomy.
    pub fn position_of(conn: &Connection, stage_id: i64, workflow_type_id: i64) -> Result<Option<i64>> {
        let position = conn
            .query_row(
                "SELECT position FROM stages WHERE id = ?1 AND workflow_type_id = ?2",
                [stage_id, workflow_type_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(position)
    }
}
