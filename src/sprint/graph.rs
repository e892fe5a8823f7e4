//! Dependency checks for the task graph.

use super::Task;
use crate::error::{Result, SuperbeadsError};
use std::collections::HashMap;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    InStack,
    Done,
}

/// Check that every dependency names a task in `tasks` and that the graph has
/// no cycles. A task depending on itself is a cycle.
pub fn check_dependencies(tasks: &[Task]) -> Result<()> {
    let index: HashMap<&str, usize> = tasks
        .iter()
        .enumerate()
        .map(|(i, t)| (t.id.as_str(), i))
        .collect();

    for task in tasks {
        for dep in &task.depends_on {
            if !index.contains_key(dep.as_str()) {
                return Err(SuperbeadsError::UserError(format!(
                    "task '{}' depends on unknown task '{}'",
                    task.id, dep
                )));
            }
        }
    }

    let mut marks = vec![Mark::Unvisited; tasks.len()];
    let mut stack = Vec::new();
    for start in 0..tasks.len() {
        if marks[start] == Mark::Unvisited
            && let Some(cycle) = visit(start, tasks, &index, &mut marks, &mut stack)
        {
            return Err(SuperbeadsError::UserError(format!(
                "dependency cycle detected: {}",
                cycle.join(" -> ")
            )));
        }
    }

    Ok(())
}

/// Depth-first visit; returns the cycle path if one is reachable from `node`.
fn visit(
    node: usize,
    tasks: &[Task],
    index: &HashMap<&str, usize>,
    marks: &mut [Mark],
    stack: &mut Vec<usize>,
) -> Option<Vec<String>> {
    marks[node] = Mark::InStack;
    stack.push(node);

    for dep in &tasks[node].depends_on {
        let next = index[dep.as_str()];
        match marks[next] {
            Mark::InStack => {
                let from = stack.iter().position(|&n| n == next).unwrap_or(0);
                let mut cycle: Vec<String> =
                    stack[from..].iter().map(|&n| tasks[n].id.clone()).collect();
                cycle.push(tasks[next].id.clone());
                return Some(cycle);
            }
            Mark::Unvisited => {
                if let Some(cycle) = visit(next, tasks, index, marks, stack) {
                    return Some(cycle);
                }
            }
            Mark::Done => {}
        }
    }

    stack.pop();
    marks[node] = Mark::Done;
    None
}
