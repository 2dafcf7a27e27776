use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use rusqlite::Connection;

use crate::cli::output::{self, MovePayload, ProgressPayload};
use crate::db::DbConnection;
use crate::engine;
use crate::models::{PipelineStage, Project, TaskState};
use crate::repo::{PipelineRepo, ProjectRepo, TaskRepo};

/// Pipeline position synchronization engine
#[derive(Parser)]
#[command(name = "stagesync", version, about)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Manage workflow types and their stage pipelines
    #[command(subcommand)]
    Workflow(WorkflowCommand),

    /// Manage projects
    #[command(subcommand)]
    Project(ProjectCommand),

    /// Move a project to another pipeline stage
    Move {
        /// Project name
        project: String,
        /// Destination stage name
        stage: String,
        /// Emit the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a project's aggregate progress
    Progress {
        /// Project name
        project: String,
        /// Emit the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show all projects of a workflow grouped by stage
    Board {
        /// Workflow type name
        workflow: String,
    },

    /// Manually set a task's state (non-sequential projects)
    Task {
        /// Task id
        id: i64,
        /// New state: not_started, in_progress, or completed
        state: String,
    },
}

#[derive(Subcommand)]
enum WorkflowCommand {
    /// Create a workflow type with an ordered, comma-separated stage list
    Add {
        name: String,
        /// Stage names in pipeline order, e.g. "Intake,Review,Completed"
        #[arg(long)]
        stages: String,
    },
    /// List workflow types and their stages
    List,
}

#[derive(Subcommand)]
enum ProjectCommand {
    /// Create a project on a workflow (one task per stage unless --tasks given)
    Add {
        name: String,
        /// Workflow type name
        #[arg(long)]
        workflow: String,
        /// Comma-separated task titles; defaults to one task per stage
        #[arg(long)]
        tasks: Option<String>,
        /// Disable sequential mode (task states driven manually)
        #[arg(long)]
        manual: bool,
    },
    /// Show a project's stage, tasks, and progress
    Show { name: String },
}

/// Parse arguments and execute the requested command
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let conn = DbConnection::connect()?;
    execute(&conn, cli.command)
}

fn execute(conn: &Connection, command: Command) -> Result<()> {
    match command {
        Command::Workflow(WorkflowCommand::Add { name, stages }) => {
            let stage_names = split_list(&stages);
            let workflow = PipelineRepo::create_workflow(conn, &name, &stage_names)?;
            println!(
                "Created workflow '{}' with {} stages",
                workflow.name,
                stage_names.len()
            );
            Ok(())
        }
        Command::Workflow(WorkflowCommand::List) => {
            for workflow in PipelineRepo::list_workflows(conn)? {
                let workflow_id = workflow.id.context("Workflow is missing its row id")?;
                let stages = PipelineRepo::stages_for(conn, workflow_id)?;
                let names: Vec<&str> = stages.iter().map(|s| s.name.as_str()).collect();
                println!("{}: {}", workflow.name, names.join(" -> "));
            }
            Ok(())
        }
        Command::Project(ProjectCommand::Add {
            name,
            workflow,
            tasks,
            manual,
        }) => {
            let workflow = PipelineRepo::get_workflow_by_name(conn, &workflow)?
                .with_context(|| format!("Workflow '{}' not found", workflow))?;
            let workflow_id = workflow.id.context("Workflow is missing its row id")?;

            // Default: one task per stage, titled after it
            let task_titles = match tasks {
                Some(list) => split_list(&list),
                None => PipelineRepo::stages_for(conn, workflow_id)?
                    .iter()
                    .map(|s| s.name.clone())
                    .collect(),
            };

            let project = ProjectRepo::create(conn, &name, workflow_id, !manual, &task_titles)?;
            println!(
                "Created project '{}' with {} tasks ({} mode)",
                project.name,
                task_titles.len(),
                if project.sequential_mode { "sequential" } else { "manual" }
            );
            Ok(())
        }
        Command::Project(ProjectCommand::Show { name }) => {
            let project = find_project(conn, &name)?;
            let project_id = project.id.context("Project is missing its row id")?;
            let stage = PipelineRepo::get_stage(conn, project.current_stage_id)?
                .with_context(|| format!("Stage {} not found", project.current_stage_id))?;
            let summary = engine::progress(conn, project_id)?;

            println!("{} @ {}", project.name, stage.name);
            println!("{}", output::format_progress(&summary));
            for task in TaskRepo::list_for_project(conn, project_id)? {
                println!("  [{}] {}", task.state.as_str(), task.title);
            }
            Ok(())
        }
        Command::Move {
            project,
            stage,
            json,
        } => {
            let project = find_project(conn, &project)?;
            let project_id = project.id.context("Project is missing its row id")?;
            let destination = find_stage(conn, &project, &stage)?;
            let stage_id = destination.id.context("Stage is missing its row id")?;

            let result = engine::move_project(conn, project_id, stage_id)?;
            if json {
                let payload = MovePayload::from_result(&result, &destination.name);
                println!("{}", serde_json::to_string(&payload)?);
            } else {
                println!(
                    "Moved '{}' to '{}': {}% ({}/{} tasks completed)",
                    project.name,
                    destination.name,
                    result.progress_percentage,
                    result.completed_tasks,
                    result.total_tasks
                );
            }
            Ok(())
        }
        Command::Progress { project, json } => {
            let project = find_project(conn, &project)?;
            let project_id = project.id.context("Project is missing its row id")?;
            let summary = engine::progress(conn, project_id)?;

            if json {
                let payload = ProgressPayload::from(summary);
                println!("{}", serde_json::to_string(&payload)?);
            } else {
                println!("{}", output::format_progress(&summary));
            }
            Ok(())
        }
        Command::Board { workflow } => {
            let workflow = PipelineRepo::get_workflow_by_name(conn, &workflow)?
                .with_context(|| format!("Workflow '{}' not found", workflow))?;
            let workflow_id = workflow.id.context("Workflow is missing its row id")?;

            let stages = PipelineRepo::stages_for(conn, workflow_id)?;
            let projects: Vec<Project> = ProjectRepo::list(conn)?
                .into_iter()
                .filter(|p| p.workflow_type_id == workflow_id)
                .collect();
            print!("{}", output::format_board(&stages, &projects));
            Ok(())
        }
        Command::Task { id, state } => {
            let Some(state) = TaskState::from_str(&state) else {
                bail!(
                    "Invalid state '{}'. Expected not_started, in_progress, or completed.",
                    state
                );
            };
            TaskRepo::set_state(conn, id, state)?;
            println!("Task {} set to {}", id, state.as_str());
            Ok(())
        }
    }
}

fn find_project(conn: &Connection, name: &str) -> Result<Project> {
    ProjectRepo::get_by_name(conn, name)?
        .with_context(|| format!("Project '{}' not found", name))
}

fn find_stage(conn: &Connection, project: &Project, stage_name: &str) -> Result<PipelineStage> {
    let stages = PipelineRepo::stages_for(conn, project.workflow_type_id)?;
    stages
        .into_iter()
        .find(|s| s.name == stage_name)
        .with_context(|| {
            format!(
                "Stage '{}' not found in this project's workflow",
                stage_name
            )
        })
}

fn split_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_list() {
        assert_eq!(split_list("a, b ,c"), vec!["a", "b", "c"]);
        assert_eq!(split_list("one"), vec!["one"]);
        assert!(split_list(" , ").is_empty());
    }
}
