use rusqlite::{Connection, OptionalExtension};
use crate::models::Project;
use crate::repo::{PipelineRepo, TaskRepo};
use anyhow::{Context, Result};

/// Project repository for database operations
///
/// Projects are instantiated against a workflow type, start at the stage
/// with position 0, and own an ordered list of tasks. Everything except
/// `current_stage_id` is managed here; stage moves go through the
/// transition coordinator.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Create a new project at the first stage of its workflow type,
    /// together with its initial task list (one row per title, seq_index
    /// assigned in order). The whole creation is one transaction.
    pub fn create(
        conn: &Connection,
        name: &str,
        workflow_type_id: i64,
        sequential_mode: bool,
        task_titles: &[String],
    ) -> Result<Project> {
        let first_stage = PipelineRepo::get_stage_at(conn, workflow_type_id, 0)?
            .with_context(|| format!("Workflow type {} has no stages", workflow_type_id))?;

        let project = Project::new(
            name.to_string(),
            workflow_type_id,
            first_stage.id.unwrap(),
            sequential_mode,
        );

        let tx = conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO projects (uuid, name, workflow_type_id, current_stage_id,
                    sequential_mode, created_ts, modified_ts)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            rusqlite::params![
                project.uuid,
                project.name,
                project.workflow_type_id,
                project.current_stage_id,
                project.sequential_mode,
                project.created_ts,
                project.modified_ts
            ],
        )
        .with_context(|| format!("Failed to create project: {}", name))?;

        let id = tx.last_insert_rowid();
        for (seq_index, title) in task_titles.iter().enumerate() {
            TaskRepo::create(&tx, id, title, seq_index as i64)?;
        }
        tx.commit()?;

        Ok(Project {
            id: Some(id),
            ..project
        })
    }

    /// Get project by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> Result<Option<Project>> {
        let mut stmt = conn.prepare(
            "SELECT id, uuid, name, workflow_type_id, current_stage_id,
                    sequential_mode, created_ts, modified_ts
             FROM projects WHERE id = ?1"
        )?;

        let project = stmt.query_row([id], |row| Self::from_row(row)).optional()?;
        Ok(project)
    }

    /// Get project by name
    pub fn get_by_name(conn: &Connection, name: &str) -> Result<Option<Project>> {
        let mut stmt = conn.prepare(
            "SELECT id, uuid, name, workflow_type_id, current_stage_id,
                    sequential_mode, created_ts, modified_ts
             FROM projects WHERE name = ?1"
        )?;

        let project = stmt.query_row([name], |row| Self::from_row(row)).optional()?;
        Ok(project)
    }

    /// List all projects ordered by name
    pub fn list(conn: &Connection) -> Result<Vec<Project>> {
        let mut stmt = conn.prepare(
            "SELECT id, uuid, name, workflow_type_id, current_stage_id,
                    sequential_mode, created_ts, modified_ts
             FROM projects ORDER BY name"
        )?;
        let rows = stmt.query_map([], |row| Self::from_row(row))?;

        let mut projects = Vec::new();
        for row in rows {
            projects.push(row?);
        }
        Ok(projects)
    }

    /// Write a project's current stage reference.
    ///
    /// Callers are expected to hold a transaction spanning this write and
    /// the accompanying task-state writes.
    pub fn set_stage(conn: &Connection, project_id: i64, stage_id: i64) -> Result<()> {
        let now = chrono::Utc::now().timestamp();
        let updated = conn.execute(
            "UPDATE projects SET current_stage_id = ?1, modified_ts = ?2 WHERE id = ?3",
            rusqlite::params![stage_id, now, project_id],
        )
        .with_context(|| format!("Failed to set stage for project {}", project_id))?;

        if updated == 0 {
            anyhow::bail!("No project found with id={}", project_id);
        }
        Ok(())
    }

    fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Project> {
        Ok(Project {
            id: Some(row.get(0)?),
            uuid: row.get(1)?,
            name: row.get(2)?,
            workflow_type_id: row.get(3)?,
            current_stage_id: row.get(4)?,
            sequential_mode: row.get::<_, i64>(5)? != 0,
            created_ts: row.get(6)?,
            modified_ts: row.get(7)?,
        })
    }
}
