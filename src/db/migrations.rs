use rusqlite::{Connection, Result};
use std::collections::HashMap;

/// Current database schema version
const CURRENT_VERSION: u32 = 1;

/// Migration system for managing database schema versions
pub struct MigrationManager;

impl MigrationManager {
    /// Initialize the database with the current schema
    /// This creates the schema_version table and applies all migrations
    pub fn initialize(conn: &Connection) -> Result<()> {
        // Create schema_version table to track migrations
        conn.execute(
            "CREATE TABLE IF NOT EXISTS schema_version (
                version INTEGER PRIMARY KEY
            )",
            [],
        )?;

        // Get current version
        let current_version: u32 = conn
            .query_row(
                "SELECT COALESCE(MAX(version), 0) FROM schema_version",
                [],
                |row| row.get(0),
            )
            .unwrap_or(0);

        // Apply migrations up to current version
        for version in (current_version + 1)..=CURRENT_VERSION {
            Self::apply_migration(conn, version)?;
        }

        Ok(())
    }

    /// Apply a specific migration by version number
    fn apply_migration(conn: &Connection, version: u32) -> Result<()> {
        let migrations = get_migrations();
        if let Some(migration) = migrations.get(&version) {
            // Execute migration in a transaction
            let tx = conn.unchecked_transaction()?;
            migration(&tx)?;
            tx.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                [version],
            )?;
            tx.commit()?;
            Ok(())
        } else {
            Err(rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_MISUSE),
                Some(format!("No migration found for version {}", version)),
            ))
        }
    }

    /// Get the current schema version
    pub fn get_version(conn: &Connection) -> Result<u32> {
        conn.query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_version",
            [],
            |row| row.get(0),
        )
    }
}

/// Get all migrations indexed by version
fn get_migrations() -> HashMap<u32, fn(&rusqlite::Transaction) -> Result<(), rusqlite::Error>> {
    let mut migrations: HashMap<u32, fn(&rusqlite::Transaction) -> Result<(), rusqlite::Error>> = HashMap::new();
    migrations.insert(1, migration_v1);
    migrations
}

/// Migration v1: Initial schema
fn migration_v1(tx: &rusqlite::Transaction) -> Result<(), rusqlite::Error> {
    // Enable foreign keys
    tx.execute("PRAGMA foreign_keys=ON", [])?;

    // Workflow types table
    tx.execute(
        "CREATE TABLE workflow_types (
            id INTEGER PRIMARY KEY,
            uuid TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL UNIQUE,
            created_ts INTEGER NOT NULL
        )",
        [],
    )?;

    // Stages table: the ordered pipeline definition for a workflow type.
    // position is 0-based and unique within a workflow type.
    tx.execute(
        "CREATE TABLE stages (
            id INTEGER PRIMARY KEY,
            workflow_type_id INTEGER NOT NULL REFERENCES workflow_types(id),
            name TEXT NOT NULL,
            position INTEGER NOT NULL,
            is_terminal INTEGER NOT NULL DEFAULT 0,
            UNIQUE(workflow_type_id, position)
        )",
        [],
    )?;

    // Projects table. current_stage_id must reference a stage belonging to
    // workflow_type_id; the transition coordinator is the only writer.
    tx.execute(
        "CREATE TABLE projects (
            id INTEGER PRIMARY KEY,
            uuid TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL,
            workflow_type_id INTEGER NOT NULL REFERENCES workflow_types(id),
            current_stage_id INTEGER NOT NULL REFERENCES stages(id),
            sequential_mode INTEGER NOT NULL DEFAULT 1,
            created_ts INTEGER NOT NULL,
            modified_ts INTEGER NOT NULL
        )",
        [],
    )?;

    // Tasks table. seq_index values are contiguous and unique per project.
    tx.execute(
        "CREATE TABLE tasks (
            id INTEGER PRIMARY KEY,
            uuid TEXT NOT NULL UNIQUE,
            project_id INTEGER NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
            title TEXT NOT NULL,
            seq_index INTEGER NOT NULL,
            state TEXT NOT NULL CHECK(state IN ('not_started','in_progress','completed')),
            created_ts INTEGER NOT NULL,
            modified_ts INTEGER NOT NULL,
            UNIQUE(project_id, seq_index)
        )",
        [],
    )?;

    // Create indexes on commonly queried columns
    tx.execute(
        "CREATE INDEX idx_stages_workflow_type_id ON stages(workflow_type_id)",
        [],
    )?;
    tx.execute(
        "CREATE INDEX idx_projects_workflow_type_id ON projects(workflow_type_id)",
        [],
    )?;
    tx.execute(
        "CREATE INDEX idx_tasks_project_id ON tasks(project_id)",
        [],
    )?;
    tx.execute(
        "CREATE INDEX idx_tasks_state ON tasks(state)",
        [],
    )?;

    Ok(())
}
