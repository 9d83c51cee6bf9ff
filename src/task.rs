//! Task records and list policy.
//!
//! A task collection is an insertion-ordered `Vec<Task>`. Positions shown to
//! users are 1-based indices into that vector; filtering and sorting for
//! display never reorder the stored collection.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::error::{Error, Result};

pub const MIN_PRIORITY: i64 = 1;
pub const MAX_PRIORITY: i64 = 5;
pub const DEFAULT_PRIORITY: i64 = 3;
/// Priorities at or below this count as high priority in stats.
const HIGH_PRIORITY_MAX: i64 = 2;

const DUE_DATE_FORMAT: &str = "%Y-%m-%d";

fn default_priority() -> i64 {
    DEFAULT_PRIORITY
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    Completed,
}

impl TaskStatus {
    pub fn glyph(self) -> &'static str {
        match self {
            TaskStatus::Pending => "⏳",
            TaskStatus::Completed => "✅",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TaskStatus::Pending => "Pending",
            TaskStatus::Completed => "Completed",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            TaskStatus::Pending => TaskStatus::Completed,
            TaskStatus::Completed => TaskStatus::Pending,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub status: TaskStatus,
    #[serde(default, with = "due_date_format")]
    pub due_date: Option<NaiveDate>,
    /// Only checked where tasks are created; stored values load as-is.
    #[serde(default = "default_priority")]
    pub priority: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// A pending task with default priority and both timestamps at `now`.
    pub fn new(id: impl Into<String>, title: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            status: TaskStatus::Pending,
            due_date: None,
            priority: DEFAULT_PRIORITY,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    /// Refresh `updated_at`, never moving it before `created_at`.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now.max(self.created_at);
    }

    /// Mark completed. Returns `false` (and changes nothing) if it already was.
    pub fn complete(&mut self, now: DateTime<Utc>) -> bool {
        if self.is_completed() {
            return false;
        }
        self.status = TaskStatus::Completed;
        self.touch(now);
        true
    }

    /// Flip pending/completed and return the new status.
    pub fn toggle(&mut self, now: DateTime<Utc>) -> TaskStatus {
        self.status = self.status.toggled();
        self.touch(now);
        self.status
    }

    pub fn description_text(&self) -> Option<&str> {
        self.description
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.is_completed() && self.due_date.is_some_and(|due| due < today)
    }

    pub fn is_due_on(&self, day: NaiveDate) -> bool {
        !self.is_completed() && self.due_date == Some(day)
    }

    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(Error::InvalidArgument("title cannot be empty".to_string()));
        }
        validate_priority(self.priority)?;
        if self.updated_at < self.created_at {
            return Err(Error::InvalidArgument(format!(
                "task {} was updated before it was created",
                self.id
            )));
        }
        Ok(())
    }
}

pub fn validate_priority(priority: i64) -> Result<()> {
    if (MIN_PRIORITY..=MAX_PRIORITY).contains(&priority) {
        Ok(())
    } else {
        Err(Error::InvalidArgument(format!(
            "priority must be between {MIN_PRIORITY} and {MAX_PRIORITY} (got {priority})"
        )))
    }
}

/// Parse a due date given as `YYYY-MM-DD` or as an RFC 3339 timestamp.
pub fn parse_due_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, DUE_DATE_FORMAT)
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|stamp| stamp.date_naive())
        })
}

mod due_date_format {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(date) => serializer.serialize_str(&date.format(super::DUE_DATE_FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(value) => super::parse_due_date(value)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid due date '{value}'"))),
        }
    }
}

/// Generate a ULID that no task in `existing` already uses.
pub fn generate_task_id(existing: &[Task]) -> String {
    loop {
        let id = Ulid::new().to_string();
        if !existing.iter().any(|task| task.id == id) {
            return id;
        }
    }
}

/// Resolve a user reference to a 0-based index.
///
/// All-digit references are 1-based positions; anything else must equal a
/// task id (case-insensitive).
pub fn resolve_task_ref(tasks: &[Task], reference: &str) -> Result<usize> {
    let trimmed = reference.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidArgument(
            "task reference cannot be empty".to_string(),
        ));
    }

    if trimmed.chars().all(|ch| ch.is_ascii_digit()) {
        return trimmed
            .parse::<usize>()
            .ok()
            .filter(|number| (1..=tasks.len()).contains(number))
            .map(|number| number - 1)
            .ok_or_else(|| {
                Error::TaskNotFound(format!("#{trimmed} ({})", count_label(tasks.len())))
            });
    }

    tasks
        .iter()
        .position(|task| task.id.eq_ignore_ascii_case(trimmed))
        .ok_or_else(|| Error::TaskNotFound(trimmed.to_string()))
}

/// "1 task", "3 tasks"
pub fn count_label(count: usize) -> String {
    if count == 1 {
        "1 task".to_string()
    } else {
        format!("{count} tasks")
    }
}

/// Fields for a task created outside the conversation (CLI form).
#[derive(Debug, Clone)]
pub struct TaskDraft {
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub priority: i64,
    pub status: TaskStatus,
}

impl TaskDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            due_date: None,
            priority: DEFAULT_PRIORITY,
            status: TaskStatus::Pending,
        }
    }

    /// Validate and turn the draft into a task with a fresh id.
    pub fn build(self, existing: &[Task], now: DateTime<Utc>) -> Result<Task> {
        let title = self.title.trim().to_string();
        let mut task = Task::new(generate_task_id(existing), title, now);
        task.description = self
            .description
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty());
        task.due_date = self.due_date;
        task.priority = self.priority;
        task.status = self.status;
        task.validate()?;
        Ok(task)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum TaskFilter {
    #[default]
    All,
    Pending,
    Completed,
}

impl TaskFilter {
    pub fn matches(self, task: &Task) -> bool {
        match self {
            TaskFilter::All => true,
            TaskFilter::Pending => task.status == TaskStatus::Pending,
            TaskFilter::Completed => task.status == TaskStatus::Completed,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum TaskSort {
    /// Newest first
    #[default]
    Created,
    /// Earliest due date first, undated last
    Due,
    /// Priority 1 first
    Priority,
}

/// Filter and sort for display, keeping each task's 1-based position.
pub fn select_tasks(tasks: &[Task], filter: TaskFilter, sort: TaskSort) -> Vec<(usize, &Task)> {
    let mut selected: Vec<(usize, &Task)> = tasks
        .iter()
        .enumerate()
        .filter(|(_, task)| filter.matches(task))
        .map(|(idx, task)| (idx + 1, task))
        .collect();

    selected.sort_by(|(_, left), (_, right)| match sort {
        TaskSort::Created => right.created_at.cmp(&left.created_at),
        TaskSort::Due => match (left.due_date, right.due_date) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        },
        TaskSort::Priority => left.priority.cmp(&right.priority),
    });

    selected
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct TaskStats {
    pub total: usize,
    pub pending: usize,
    pub completed: usize,
    pub high_priority: usize,
    pub overdue: usize,
    pub due_today: usize,
    /// Whole percent of tasks completed
    pub completion_rate: u8,
}

impl TaskStats {
    pub fn compute(tasks: &[Task], today: NaiveDate) -> Self {
        let completed = tasks.iter().filter(|task| task.is_completed()).count();
        let total = tasks.len();
        let completion_rate = if total == 0 {
            0
        } else {
            ((completed * 100) / total) as u8
        };

        Self {
            total,
            pending: total - completed,
            completed,
            high_priority: tasks
                .iter()
                .filter(|task| !task.is_completed() && task.priority <= HIGH_PRIORITY_MAX)
                .count(),
            overdue: tasks.iter().filter(|task| task.is_overdue(today)).count(),
            due_today: tasks.iter().filter(|task| task.is_due_on(today)).count(),
            completion_rate,
        }
    }
}
