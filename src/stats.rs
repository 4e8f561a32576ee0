/*
Task statistics aggregation.
Kept free of HTTP / Axum so both the server and the client views can use it.
*/

use std::collections::BTreeMap;

use crate::models::{Priority, PriorityCount, StatusCount, Task, TaskStatus, TaskStats};

// Compute totals, completion rate and breakdowns over a task snapshot.
//
// Rules:
// - A task counts as completed when `is_completed` is true, whatever its status
// - Every record counts once, duplicates included
// - completion_rate is 100 * completed / total, 0 for an empty snapshot, unrounded
// - Breakdowns only list values that occur, in enum order
pub fn aggregate(tasks: &[Task]) -> TaskStats {
    let total = tasks.len();
    let completed = tasks.iter().filter(|t| t.is_completed).count();

    let mut by_priority: BTreeMap<Priority, usize> = BTreeMap::new();
    let mut by_status: BTreeMap<TaskStatus, usize> = BTreeMap::new();
    for t in tasks {
        *by_priority.entry(t.priority).or_default() += 1;
        *by_status.entry(t.status).or_default() += 1;
    }

    TaskStats {
        total_tasks: total,
        completed_tasks: completed,
        incomplete_tasks: total - completed,
        completion_rate: completion_rate(completed, total),
        priority_breakdown: by_priority
            .into_iter()
            .map(|(priority, count)| PriorityCount { priority, count })
            .collect(),
        status_breakdown: by_status
            .into_iter()
            .map(|(status, count)| StatusCount { status, count })
            .collect(),
    }
}

pub fn completion_rate(completed: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    completed as f64 / total as f64 * 100.0
}

// Rate as shown to the user: nearest whole percent.
pub fn display_rate(rate: f64) -> u32 {
    rate.round().clamp(0.0, 100.0) as u32
}
