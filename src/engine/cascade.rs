use crate::models::TaskState;

/// Cascade resolver
///
/// Maps "the project is now at stage position `p`" to the full task-state
/// assignment it implies: everything before the cascade index is Completed,
/// the task at the index is InProgress, everything after is NotStarted.
/// Moving to the terminal stage means 100% done, so every task is Completed
/// regardless of the index.
///
/// Pure and deterministic: resolving the same inputs twice and persisting
/// leaves identical task states, so a failed move can be blindly retried.
///
/// The returned vector assigns states positionally to the project's tasks
/// sorted by seq_index; empty when the project has no tasks.
pub fn resolve(
    stage_count: usize,
    destination_position: usize,
    destination_is_terminal: bool,
    task_count: usize,
) -> Vec<TaskState> {
    if task_count == 0 {
        return Vec::new();
    }
    if destination_is_terminal {
        return vec![TaskState::Completed; task_count];
    }

    let k = cascade_index(stage_count, destination_position, task_count);
    (0..task_count)
        .map(|i| {
            if i < k {
                TaskState::Completed
            } else if i == k {
                TaskState::InProgress
            } else {
                TaskState::NotStarted
            }
        })
        .collect()
}

/// Index of the task that becomes InProgress at the given stage position.
///
/// When the task count equals the stage count (the common case: templates
/// create one task per stage) the mapping is the identity. Otherwise the
/// position is projected proportionally onto the task range, since tasks
/// may be added or removed independently of the pipeline.
fn cascade_index(stage_count: usize, position: usize, task_count: usize) -> usize {
    if task_count == stage_count {
        return position;
    }
    let stage_span = stage_count.saturating_sub(1).max(1);
    let task_span = task_count.saturating_sub(1);
    (position as f64 / stage_span as f64 * task_span as f64).round() as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use TaskState::{Completed, InProgress, NotStarted};

    #[test]
    fn test_one_task_per_stage() {
        // 5 stages, 5 tasks, moving to position 3
        let assignment = resolve(5, 3, false, 5);
        assert_eq!(
            assignment,
            vec![Completed, Completed, Completed, InProgress, NotStarted]
        );
    }

    #[test]
    fn test_first_stage_leaves_everything_ahead() {
        let assignment = resolve(4, 0, false, 4);
        assert_eq!(
            assignment,
            vec![InProgress, NotStarted, NotStarted, NotStarted]
        );
    }

    #[test]
    fn test_terminal_stage_completes_everything() {
        let assignment = resolve(4, 3, true, 6);
        assert_eq!(assignment, vec![Completed; 6]);
    }

    #[test]
    fn test_terminal_overrides_index_mismatch() {
        // Even with more tasks than stages, terminal means all done
        let assignment = resolve(3, 2, true, 10);
        assert!(assignment.iter().all(|s| *s == Completed));
    }

    #[test]
    fn test_proportional_mapping_more_tasks_than_stages() {
        // 4 stages, 7 tasks, position 2: k = round(2/3 * 6) = 4
        let assignment = resolve(4, 2, false, 7);
        assert_eq!(
            assignment,
            vec![
                Completed, Completed, Completed, Completed, InProgress, NotStarted, NotStarted
            ]
        );
    }

    #[test]
    fn test_proportional_mapping_fewer_tasks_than_stages() {
        // 6 stages, 3 tasks, position 3: k = round(3/5 * 2) = 1
        let assignment = resolve(6, 3, false, 3);
        assert_eq!(assignment, vec![Completed, InProgress, NotStarted]);
    }

    #[test]
    fn test_no_tasks() {
        assert!(resolve(5, 2, false, 0).is_empty());
        assert!(resolve(5, 4, true, 0).is_empty());
    }

    #[test]
    fn test_single_task() {
        // A lone task is in progress at every non-terminal stage
        assert_eq!(resolve(4, 0, false, 1), vec![InProgress]);
        assert_eq!(resolve(4, 2, false, 1), vec![InProgress]);
        assert_eq!(resolve(4, 3, true, 1), vec![Completed]);
    }

    #[test]
    fn test_single_stage_pipeline() {
        // N = 1 clamps the denominator; position 0 maps to index 0
        assert_eq!(resolve(1, 0, false, 3), vec![InProgress, NotStarted, NotStarted]);
        assert_eq!(resolve(1, 0, true, 3), vec![Completed, Completed, Completed]);
    }

    #[test]
    fn test_idempotent() {
        let first = resolve(5, 3, false, 8);
        let second = resolve(5, 3, false, 8);
        assert_eq!(first, second);
    }
}
