//! Task store: ordered task records with flat-file persistence.
//!
//! Tasks are stored one per line as six `;`-delimited fields in fixed order:
//! `assignee;title;description;due_date;assigned_date;completed` with
//! `YYYY-MM-DD` dates and a literal `Yes`/`No` completed flag. Free-text
//! fields are not escaped, so a `;` inside them corrupts parsing; this is a
//! documented limitation of the format.
//!
//! The store is loaded once at startup and fully rewritten after every
//! mutation. Tasks have no identifier beyond their position in the stored
//! sequence.

use chrono::NaiveDate;
use tracing::debug;

use crate::credential::CredentialStore;
use crate::error::{Error, Result};
use crate::storage::Storage;

/// Date format shared by backing artifacts and the interactive prompts
pub const DATE_FORMAT: &str = "%Y-%m-%d";

const FIELD_SEPARATOR: char = ';';
const FIELD_COUNT: usize = 6;
const COMPLETED_YES: &str = "Yes";
const COMPLETED_NO: &str = "No";

/// A single task record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    /// Name of an existing identity the task is assigned to
    pub assignee: String,
    pub title: String,
    pub description: String,
    pub due_date: NaiveDate,
    /// Set at creation, immutable afterwards
    pub assigned_date: NaiveDate,
    pub completed: bool,
}

impl Task {
    /// An incomplete task whose due date is strictly before `today`
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.completed && self.due_date < today
    }
}

/// Outcome of a mark-complete request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkOutcome {
    /// The task transitioned from incomplete to complete
    Completed,
    /// The task was already complete; nothing changed, nothing was written
    AlreadyComplete,
}

/// Parse a date in the fixed `YYYY-MM-DD` format
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    let trimmed = input.trim();
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .map_err(|_| Error::InvalidDate(trimmed.to_string()))
}

/// Render a date in the fixed `YYYY-MM-DD` format
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Serialize a task into its backing-artifact line
pub fn serialize_task(task: &Task) -> String {
    let completed = if task.completed {
        COMPLETED_YES
    } else {
        COMPLETED_NO
    };
    [
        task.assignee.as_str(),
        task.title.as_str(),
        task.description.as_str(),
        &format_date(task.due_date),
        &format_date(task.assigned_date),
        completed,
    ]
    .join(&FIELD_SEPARATOR.to_string())
}

/// Parse one backing-artifact line into a task
///
/// Returns the failure reason so the caller can report the offending line.
pub fn parse_task_line(line: &str) -> std::result::Result<Task, String> {
    let fields: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
    if fields.len() != FIELD_COUNT {
        return Err(format!(
            "expected {FIELD_COUNT} fields, found {}",
            fields.len()
        ));
    }

    let due_date = NaiveDate::parse_from_str(fields[3], DATE_FORMAT)
        .map_err(|_| format!("unparsable due date '{}'", fields[3]))?;
    let assigned_date = NaiveDate::parse_from_str(fields[4], DATE_FORMAT)
        .map_err(|_| format!("unparsable assigned date '{}'", fields[4]))?;

    // Only the literal "Yes" means complete; any other token reads as "No".
    Ok(Task {
        assignee: fields[0].to_string(),
        title: fields[1].to_string(),
        description: fields[2].to_string(),
        due_date,
        assigned_date,
        completed: fields[5] == COMPLETED_YES,
    })
}

/// In-memory task store with flat-file persistence
#[derive(Debug)]
pub struct TaskStore {
    storage: Storage,
    tasks: Vec<Task>,
}

impl TaskStore {
    /// Load the store from its backing artifact, creating an empty artifact
    /// if absent. A malformed line fails the whole load.
    pub fn load(storage: Storage) -> Result<Self> {
        let path = storage.task_file();
        storage.touch(&path)?;

        let lines = storage.read_lines(&path)?;
        let mut tasks = Vec::with_capacity(lines.len());
        for (idx, line) in lines.iter().enumerate() {
            let task = parse_task_line(line).map_err(|reason| Error::MalformedLine {
                path: path.clone(),
                line: idx + 1,
                reason,
            })?;
            tasks.push(task);
        }

        debug!(count = tasks.len(), "loaded task store");
        Ok(Self { storage, tasks })
    }

    /// Create a task and persist the store.
    ///
    /// The assignee must be a known identity at call time; `assigned_date`
    /// is set to `today` and the task starts incomplete.
    pub fn create(
        &mut self,
        users: &CredentialStore,
        assignee: &str,
        title: &str,
        description: &str,
        due_date: NaiveDate,
        today: NaiveDate,
    ) -> Result<()> {
        if !users.contains(assignee) {
            return Err(Error::UnknownUser(assignee.to_string()));
        }

        self.tasks.push(Task {
            assignee: assignee.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            due_date,
            assigned_date: today,
            completed: false,
        });
        self.save()?;
        debug!(assignee, title, "created task");
        Ok(())
    }

    /// Full sequence in stored order
    pub fn list_all(&self) -> &[Task] {
        &self.tasks
    }

    /// Tasks assigned to `name`, with their stored positions, preserving
    /// stored relative order
    pub fn list_for(&self, name: &str) -> Vec<(usize, &Task)> {
        self.tasks
            .iter()
            .enumerate()
            .filter(|(_, task)| task.assignee == name)
            .collect()
    }

    /// Task at a stored position
    pub fn get(&self, index: usize) -> Result<&Task> {
        self.tasks.get(index).ok_or(Error::TaskNotFound(index))
    }

    /// Mark the task at `index` complete.
    ///
    /// Idempotent: an already-complete task is left untouched and the
    /// backing artifact is not rewritten.
    pub fn mark_complete(&mut self, index: usize) -> Result<MarkOutcome> {
        let task = self.tasks.get_mut(index).ok_or(Error::TaskNotFound(index))?;
        if task.completed {
            return Ok(MarkOutcome::AlreadyComplete);
        }

        task.completed = true;
        self.save()?;
        Ok(MarkOutcome::Completed)
    }

    /// Reassign the incomplete task at `index` to another known identity
    pub fn reassign(
        &mut self,
        users: &CredentialStore,
        index: usize,
        new_assignee: &str,
    ) -> Result<()> {
        if !users.contains(new_assignee) {
            return Err(Error::UnknownUser(new_assignee.to_string()));
        }

        let task = self.tasks.get_mut(index).ok_or(Error::TaskNotFound(index))?;
        if task.completed {
            return Err(Error::TaskCompleted);
        }

        task.assignee = new_assignee.to_string();
        self.save()
    }

    /// Change the due date of the incomplete task at `index`
    pub fn redate(&mut self, index: usize, new_due_date: NaiveDate) -> Result<()> {
        let task = self.tasks.get_mut(index).ok_or(Error::TaskNotFound(index))?;
        if task.completed {
            return Err(Error::TaskCompleted);
        }

        task.due_date = new_due_date;
        self.save()
    }

    /// Number of stored tasks
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    fn save(&self) -> Result<()> {
        let lines: Vec<String> = self.tasks.iter().map(serialize_task).collect();
        self.storage.write_lines(&self.storage.task_file(), &lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StorageConfig;
    use std::fs;
    use std::path::Path;

    fn date(text: &str) -> NaiveDate {
        parse_date(text).expect("valid test date")
    }

    fn sample_task(assignee: &str, completed: bool) -> Task {
        Task {
            assignee: assignee.to_string(),
            title: "Write docs".to_string(),
            description: "Cover the storage format".to_string(),
            due_date: date("2024-03-01"),
            assigned_date: date("2024-02-01"),
            completed,
        }
    }

    fn storage(dir: &Path) -> Storage {
        Storage::new(dir.to_path_buf(), StorageConfig::default())
    }

    fn users(dir: &Path) -> CredentialStore {
        let mut store = CredentialStore::load(storage(dir), "admin", "password").expect("users");
        store.register("bob", "pw").expect("register bob");
        store
    }

    #[test]
    fn serialize_then_parse_round_trips() {
        let task = sample_task("bob", false);
        let line = serialize_task(&task);
        assert_eq!(line, "bob;Write docs;Cover the storage format;2024-03-01;2024-02-01;No");

        let parsed = parse_task_line(&line).expect("parse");
        assert_eq!(parsed, task);

        let done = sample_task("bob", true);
        assert_eq!(parse_task_line(&serialize_task(&done)).expect("parse"), done);
    }

    #[test]
    fn parse_rejects_wrong_field_count() {
        let err = parse_task_line("bob;only;five;2024-03-01;2024-02-01").unwrap_err();
        assert!(err.contains("expected 6 fields"));

        let err = parse_task_line("bob;a;semi;colon;in;text;2024-03-01").unwrap_err();
        assert!(err.contains("found 7"));
    }

    #[test]
    fn parse_rejects_unparsable_dates() {
        assert!(parse_task_line("bob;t;d;03-01-2024;2024-02-01;No").is_err());
        assert!(parse_task_line("bob;t;d;2024-03-01;not-a-date;No").is_err());
    }

    #[test]
    fn unknown_completed_token_reads_as_incomplete() {
        let task = parse_task_line("bob;t;d;2024-03-01;2024-02-01;maybe").expect("parse");
        assert!(!task.completed);
    }

    #[test]
    fn load_creates_empty_artifact_when_absent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = TaskStore::load(storage(dir.path())).expect("load");

        assert!(store.is_empty());
        assert!(dir.path().join("tasks.txt").exists());
    }

    #[test]
    fn load_fails_on_malformed_line() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(
            dir.path().join("tasks.txt"),
            "bob;t;d;2024-03-01;2024-02-01;No\nbroken\n",
        )
        .expect("write raw");

        let err = TaskStore::load(storage(dir.path())).unwrap_err();
        assert!(matches!(err, Error::MalformedLine { line: 2, .. }));
    }

    #[test]
    fn create_requires_known_assignee() {
        let dir = tempfile::tempdir().expect("tempdir");
        let users = users(dir.path());
        let mut store = TaskStore::load(storage(dir.path())).expect("load");

        let err = store
            .create(&users, "ghost", "t", "d", date("2024-03-01"), date("2024-02-01"))
            .unwrap_err();
        assert!(matches!(err, Error::UnknownUser(_)));
        assert!(store.is_empty());
    }

    #[test]
    fn create_sets_assigned_date_and_persists() {
        let dir = tempfile::tempdir().expect("tempdir");
        let users = users(dir.path());
        let mut store = TaskStore::load(storage(dir.path())).expect("load");

        store
            .create(&users, "bob", "t", "d", date("2024-03-01"), date("2024-02-01"))
            .expect("create");

        let task = store.get(0).expect("get");
        assert_eq!(task.assigned_date, date("2024-02-01"));
        assert!(!task.completed);

        let written = fs::read_to_string(dir.path().join("tasks.txt")).expect("read");
        assert_eq!(written, "bob;t;d;2024-03-01;2024-02-01;No\n");
    }

    #[test]
    fn list_for_preserves_stored_relative_order() {
        let dir = tempfile::tempdir().expect("tempdir");
        let users = users(dir.path());
        let mut store = TaskStore::load(storage(dir.path())).expect("load");

        for title in ["first", "second", "third"] {
            store
                .create(&users, "bob", title, "d", date("2024-03-01"), date("2024-02-01"))
                .expect("create");
        }
        store
            .create(&users, "admin", "other", "d", date("2024-03-01"), date("2024-02-01"))
            .expect("create");

        let mine = store.list_for("bob");
        let titles: Vec<&str> = mine.iter().map(|(_, task)| task.title.as_str()).collect();
        assert_eq!(titles, vec!["first", "second", "third"]);
        let indices: Vec<usize> = mine.iter().map(|(idx, _)| *idx).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn mark_complete_is_idempotent_and_skips_rewrite() {
        let dir = tempfile::tempdir().expect("tempdir");
        let users = users(dir.path());
        let mut store = TaskStore::load(storage(dir.path())).expect("load");
        store
            .create(&users, "bob", "t", "d", date("2024-03-01"), date("2024-02-01"))
            .expect("create");

        assert_eq!(store.mark_complete(0).expect("mark"), MarkOutcome::Completed);
        let before = sample_snapshot(dir.path());

        assert_eq!(
            store.mark_complete(0).expect("mark again"),
            MarkOutcome::AlreadyComplete
        );
        assert_eq!(store.get(0).expect("get"), &sample_snapshot_task(&before));
        assert_eq!(sample_snapshot(dir.path()), before);
    }

    #[test]
    fn reassign_rejects_unknown_and_completed() {
        let dir = tempfile::tempdir().expect("tempdir");
        let users = users(dir.path());
        let mut store = TaskStore::load(storage(dir.path())).expect("load");
        store
            .create(&users, "bob", "t", "d", date("2024-03-01"), date("2024-02-01"))
            .expect("create");

        assert!(matches!(
            store.reassign(&users, 0, "ghost").unwrap_err(),
            Error::UnknownUser(_)
        ));

        assert!(!store.get(0).expect("get").completed);
        store.reassign(&users, 0, "admin").expect("reassign");
        assert_eq!(store.get(0).expect("get").assignee, "admin");
        assert!(!store.get(0).expect("get").completed);

        store.mark_complete(0).expect("mark");
        assert!(matches!(
            store.reassign(&users, 0, "bob").unwrap_err(),
            Error::TaskCompleted
        ));
        assert_eq!(store.get(0).expect("get").assignee, "admin");
    }

    #[test]
    fn redate_on_completed_task_leaves_artifact_untouched() {
        let dir = tempfile::tempdir().expect("tempdir");
        let users = users(dir.path());
        let mut store = TaskStore::load(storage(dir.path())).expect("load");
        store
            .create(&users, "bob", "t", "d", date("2024-03-01"), date("2024-02-01"))
            .expect("create");
        store.mark_complete(0).expect("mark");

        let before = sample_snapshot(dir.path());
        let err = store.redate(0, date("2030-01-01")).unwrap_err();
        assert!(matches!(err, Error::TaskCompleted));
        assert_eq!(store.get(0).expect("get").due_date, date("2024-03-01"));
        assert_eq!(sample_snapshot(dir.path()), before);
    }

    #[test]
    fn redate_updates_incomplete_task() {
        let dir = tempfile::tempdir().expect("tempdir");
        let users = users(dir.path());
        let mut store = TaskStore::load(storage(dir.path())).expect("load");
        store
            .create(&users, "bob", "t", "d", date("2024-03-01"), date("2024-02-01"))
            .expect("create");

        assert!(!store.get(0).expect("get").completed);
        store.redate(0, date("2024-06-30")).expect("redate");
        assert_eq!(store.get(0).expect("get").due_date, date("2024-06-30"));
        assert!(!store.get(0).expect("get").completed);
    }

    #[test]
    fn overdue_requires_incomplete_and_strictly_past_due() {
        let today = date("2024-03-01");

        let mut task = sample_task("bob", false);
        task.due_date = date("2024-02-29");
        assert!(task.is_overdue(today));

        task.due_date = today;
        assert!(!task.is_overdue(today));

        task.due_date = date("2024-02-29");
        task.completed = true;
        assert!(!task.is_overdue(today));
    }

    fn sample_snapshot(dir: &Path) -> String {
        fs::read_to_string(dir.join("tasks.txt")).expect("read artifact")
    }

    fn sample_snapshot_task(snapshot: &str) -> Task {
        parse_task_line(snapshot.trim()).expect("parse snapshot")
    }
}
