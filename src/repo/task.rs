use rusqlite::{Connection, OptionalExtension};
use crate::models::{Task, TaskState};
use anyhow::{Context, Result};

/// Task repository for database operations
pub struct TaskRepo;

impl TaskRepo {
    /// Create a new task for a project at the given sequence index
    pub fn create(conn: &Connection, project_id: i64, title: &str, seq_index: i64) -> Result<Task> {
        let task = Task::new(project_id, title.to_string(), seq_index);

        conn.execute(
            "INSERT INTO tasks (uuid, project_id, title, seq_index, state, created_ts, modified_ts)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            rusqlite::params![
                task.uuid,
                task.project_id,
                task.title,
                task.seq_index,
                task.state.as_str(),
                task.created_ts,
                task.modified_ts
            ],
        )
        .with_context(|| format!("Failed to create task: {}", title))?;

        let id = conn.last_insert_rowid();
        Ok(Task {
            id: Some(id),
            ..task
        })
    }

    /// Get task by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> Result<Option<Task>> {
        let mut stmt = conn.prepare(
            "SELECT id, uuid, project_id, title, seq_index, state, created_ts, modified_ts
             FROM tasks WHERE id = ?1"
        )?;

        let task = stmt.query_row([id], |row| Self::from_row(row)).optional()?;
        Ok(task)
    }

    /// All tasks of a project sorted by seq_index
    pub fn list_for_project(conn: &Connection, project_id: i64) -> Result<Vec<Task>> {
        let mut stmt = conn.prepare(
            "SELECT id, uuid, project_id, title, seq_index, state, created_ts, modified_ts
             FROM tasks WHERE project_id = ?1 ORDER BY seq_index"
        )?;

        let rows = stmt.query_map([project_id], |row| Self::from_row(row))?;

        let mut tasks = Vec::new();
        for row in rows {
            tasks.push(row?);
        }
        Ok(tasks)
    }

    /// Set the state of a single task (manual completion toggle)
    pub fn set_state(conn: &Connection, task_id: i64, state: TaskState) -> Result<()> {
        let now = chrono::Utc::now().timestamp();
        let updated = conn.execute(
            "UPDATE tasks SET state = ?1, modified_ts = ?2 WHERE id = ?3",
            rusqlite::params![state.as_str(), now, task_id],
        )
        .with_context(|| format!("Failed to update task {}", task_id))?;

        if updated == 0 {
            anyhow::bail!("No task found with id={}", task_id);
        }
        Ok(())
    }

    /// Bulk-write task states; rows whose state already matches are skipped.
    /// Callers are expected to hold the enclosing transaction.
    pub fn set_states(conn: &Connection, assignments: &[(i64, TaskState)]) -> Result<usize> {
        let now = chrono::Utc::now().timestamp();
        let mut stmt = conn.prepare(
            "UPDATE tasks SET state = ?1, modified_ts = ?2 WHERE id = ?3 AND state != ?1"
        )?;

        let mut changed = 0;
        for (task_id, state) in assignments {
            changed += stmt
                .execute(rusqlite::params![state.as_str(), now, task_id])
                .with_context(|| format!("Failed to update task {}", task_id))?;
        }
        Ok(changed)
    }

    /// Completed and total counts for a project, straight from the store
    pub fn state_counts(conn: &Connection, project_id: i64) -> Result<(i64, i64)> {
        let counts = conn.query_row(
            "SELECT COALESCE(SUM(state = 'completed'), 0), COUNT(*)
             FROM tasks WHERE project_id = ?1",
            [project_id],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;
        Ok(counts)
    }

    fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Task> {
        let state_str: String = row.get(5)?;
        Ok(Task {
            id: Some(row.get(0)?),
            uuid: row.get(1)?,
            project_id: row.get(2)?,
            title: row.get(3)?,
            seq_index: row.get(4)?,
            // CHECK constraint guarantees a known value
            state: TaskState::from_str(&state_str).unwrap_or(TaskState::NotStarted),
            created_ts: row.get(6)?,
            modified_ts: row.get(7)?,
        })
    }
}
