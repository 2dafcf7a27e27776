//! Stagesync - Pipeline Position Synchronization Engine
//!
//! Keeps three views of a project mutually consistent as it moves through an
//! ordered workflow: its pipeline stage (the Kanban column), its underlying
//! task-completion states, and its displayed progress percentage.
//!
//! This library provides:
//! - Database operations and migrations
//! - Data models for workflow types, stages, projects, and tasks
//! - Repository layer for data access
//! - The synchronization engine: cascade resolver, transition coordinator,
//!   and progress aggregator
//! - CLI command parsing and execution
//!
//! # Example
//!
//! ```no_run
//! use stagesync::db::DbConnection;
//! use stagesync::engine::{move_project, progress};
//!
//! let conn = DbConnection::connect().unwrap();
//! let result = move_project(&conn, 1, 7).unwrap();
//! assert_eq!(result.progress_percentage, progress(&conn, 1).unwrap().progress_percentage);
//! ```

pub mod db;
pub mod models;
pub mod repo;
pub mod engine;
pub mod cli;
