//! Report generator: aggregate and per-identity statistics derived from the
//! task and credential stores.
//!
//! `generate` renders two fixed-layout text artifacts (task overview, user
//! overview); both are regenerable at any time and never read back as
//! machine input. `display` echoes the artifacts verbatim and is gated to
//! the admin session.

use std::io::Write;

use chrono::NaiveDate;
use tracing::debug;

use crate::credential::CredentialStore;
use crate::error::{Error, Result};
use crate::session::Session;
use crate::storage::Storage;
use crate::task::{Task, TaskStore};

/// Aggregate statistics over the full task sequence
#[derive(Debug, Clone, PartialEq)]
pub struct TaskOverview {
    pub total: usize,
    pub completed: usize,
    pub uncompleted: usize,
    /// Uncompleted tasks whose due date is strictly before the current date
    pub overdue: usize,
    pub percentage_incomplete: f64,
    pub percentage_overdue: f64,
}

/// Statistics for one identity, scoped to its own tasks
#[derive(Debug, Clone, PartialEq)]
pub struct UserStats {
    pub name: String,
    pub total: usize,
    /// This identity's share of all tasks
    pub share_of_all: f64,
    pub completed_pct: f64,
    pub incomplete_pct: f64,
    pub overdue_pct: f64,
}

/// Per-identity breakdown over every known identity
#[derive(Debug, Clone, PartialEq)]
pub struct UserOverview {
    pub total_users: usize,
    pub total_tasks: usize,
    pub users: Vec<UserStats>,
}

/// Compute the task-level overview for `today`
pub fn task_overview(tasks: &[Task], today: NaiveDate) -> TaskOverview {
    let total = tasks.len();
    let completed = tasks.iter().filter(|task| task.completed).count();
    let uncompleted = total - completed;
    let overdue = tasks.iter().filter(|task| task.is_overdue(today)).count();

    TaskOverview {
        total,
        completed,
        uncompleted,
        overdue,
        percentage_incomplete: ratio_pct(uncompleted, total),
        percentage_overdue: ratio_pct(overdue, total),
    }
}

/// Compute the identity-level overview for `today`.
///
/// Every known identity gets an entry, including those with zero tasks; the
/// per-identity percentages are scoped to that identity's own tasks and are
/// all zero when it has none.
pub fn user_overview(tasks: &[Task], users: &CredentialStore, today: NaiveDate) -> UserOverview {
    let total_tasks = tasks.len();

    let users: Vec<UserStats> = users
        .names()
        .map(|name| {
            let mine: Vec<&Task> = tasks.iter().filter(|task| task.assignee == name).collect();
            let total = mine.len();
            let completed = mine.iter().filter(|task| task.completed).count();
            let overdue = mine.iter().filter(|task| task.is_overdue(today)).count();

            UserStats {
                name: name.to_string(),
                total,
                share_of_all: ratio_pct(total, total_tasks),
                completed_pct: ratio_pct(completed, total),
                incomplete_pct: ratio_pct(total - completed, total),
                overdue_pct: ratio_pct(overdue, total),
            }
        })
        .collect();

    UserOverview {
        total_users: users.len(),
        total_tasks,
        users,
    }
}

/// Render the task overview artifact
pub fn render_task_overview(overview: &TaskOverview) -> String {
    let mut out = String::new();
    out.push_str("=== Task Overview ===\n");
    out.push_str(&format!("Total tasks: {}\n", overview.total));
    out.push_str(&format!("Completed tasks: {}\n", overview.completed));
    out.push_str(&format!("Uncompleted tasks: {}\n", overview.uncompleted));
    out.push_str(&format!("Overdue tasks: {}\n", overview.overdue));
    out.push_str(&format!(
        "Percentage incomplete: {:.2}%\n",
        overview.percentage_incomplete
    ));
    out.push_str(&format!(
        "Percentage overdue: {:.2}%\n",
        overview.percentage_overdue
    ));
    out
}

/// Render the user overview artifact
pub fn render_user_overview(overview: &UserOverview) -> String {
    let mut out = String::new();
    out.push_str("=== User Overview ===\n");
    out.push_str(&format!("Total users: {}\n", overview.total_users));
    out.push_str(&format!("Total tasks: {}\n", overview.total_tasks));

    for user in &overview.users {
        out.push_str(&format!("User: {}\n", user.name));
        out.push_str(&format!("Total tasks: {}\n", user.total));
        out.push_str(&format!(
            "Percentage of all tasks: {:.2}%\n",
            user.share_of_all
        ));
        out.push_str(&format!("Completed: {:.2}%\n", user.completed_pct));
        out.push_str(&format!("Incomplete: {:.2}%\n", user.incomplete_pct));
        out.push_str(&format!("Overdue: {:.2}%\n", user.overdue_pct));
    }
    out
}

/// Compute both overviews and write the two report artifacts
pub fn generate(
    storage: &Storage,
    tasks: &TaskStore,
    users: &CredentialStore,
    today: NaiveDate,
) -> Result<()> {
    let task_report = render_task_overview(&task_overview(tasks.list_all(), today));
    let user_report = render_user_overview(&user_overview(tasks.list_all(), users, today));

    storage.write_atomic(&storage.task_overview_file(), task_report.as_bytes())?;
    storage.write_atomic(&storage.user_overview_file(), user_report.as_bytes())?;
    debug!("report artifacts written");
    Ok(())
}

/// Echo both report artifacts verbatim, regenerating them first if either
/// is missing.
///
/// Admin-gated: any other session is refused before anything is read or
/// generated.
pub fn display<W: Write>(
    storage: &Storage,
    session: &Session,
    tasks: &TaskStore,
    users: &CredentialStore,
    today: NaiveDate,
    out: &mut W,
) -> Result<()> {
    if !session.is_admin() {
        return Err(Error::AdminOnly);
    }

    let task_path = storage.task_overview_file();
    let user_path = storage.user_overview_file();
    if !task_path.exists() || !user_path.exists() {
        generate(storage, tasks, users, today)?;
    }

    out.write_all(std::fs::read_to_string(&task_path)?.as_bytes())?;
    out.write_all(std::fs::read_to_string(&user_path)?.as_bytes())?;
    Ok(())
}

fn ratio_pct(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        (numerator as f64 / denominator as f64) * 100.0
    }
}
