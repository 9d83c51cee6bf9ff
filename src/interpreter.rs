//! The command interpreter.
//!
//! `interpret` classifies one line of user text, performs at most one store
//! mutation, and returns the reply. Bad input is answered with text; the only
//! error is a failed store write.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::Verbosity;
use crate::error::Result;
use crate::format::{Replies, CLEAR_ALL_PROMPT};
use crate::intent::{self, first_task_number, Intent};
use crate::store::TaskStore;
use crate::task::{generate_task_id, Task, DEFAULT_PRIORITY};

/// Answers a yes/no question before a destructive command.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Result of one interpreted line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reply {
    pub intent: Intent,
    pub text: String,
    /// True if the store was written.
    pub mutated: bool,
}

impl Reply {
    fn read_only(intent: Intent, text: String) -> Self {
        Self {
            intent,
            text,
            mutated: false,
        }
    }

    fn mutated(intent: Intent, text: String) -> Self {
        Self {
            intent,
            text,
            mutated: true,
        }
    }
}

type Clock = Box<dyn FnMut() -> DateTime<Utc>>;

pub struct Interpreter<S> {
    store: S,
    replies: Replies,
    default_priority: i64,
    clock: Clock,
}

impl<S: TaskStore> Interpreter<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            replies: Replies::new(Verbosity::default()),
            default_priority: DEFAULT_PRIORITY,
            clock: Box::new(Utc::now),
        }
    }

    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.replies = Replies::new(verbosity);
        self
    }

    /// Priority given to tasks created by `add`.
    pub fn with_default_priority(mut self, priority: i64) -> Self {
        self.default_priority = priority;
        self
    }

    pub fn with_clock(mut self, clock: impl FnMut() -> DateTime<Utc> + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn replies(&self) -> Replies {
        self.replies
    }

    pub fn interpret(&mut self, raw: &str, confirm: &mut dyn Confirm) -> Result<Reply> {
        let normalized = intent::normalize(raw);
        let intent = intent::classify(&normalized);
        tracing::debug!(input = %normalized, ?intent, "classified input");

        match intent {
            Intent::Add => self.add(raw),
            Intent::List => Ok(Reply::read_only(intent, self.list())),
            Intent::Complete => self.complete(&normalized),
            Intent::Delete => self.delete(&normalized),
            Intent::ClearAll => self.clear_all(confirm),
            Intent::Help => Ok(Reply::read_only(intent, self.replies.help())),
            Intent::Greet => Ok(Reply::read_only(intent, self.replies.greeting())),
            Intent::Fallback => Ok(Reply::read_only(intent, self.replies.fallback(raw))),
        }
    }

    fn add(&mut self, raw: &str) -> Result<Reply> {
        let title = intent::extract_title(raw);
        if title.is_empty() {
            return Ok(Reply::read_only(Intent::Add, self.replies.missing_title()));
        }

        let mut tasks = self.store.load();
        let now = (self.clock)();
        let mut task = Task::new(generate_task_id(&tasks), title, now);
        task.priority = self.default_priority;
        let text = self.replies.added(&task);
        tracing::info!(id = %task.id, title = %task.title, "task added");

        tasks.push(task);
        self.store.save(&tasks)?;
        Ok(Reply::mutated(Intent::Add, text))
    }

    fn list(&self) -> String {
        let tasks = self.store.load();
        if tasks.is_empty() {
            self.replies.empty_list()
        } else {
            self.replies.task_list(&tasks)
        }
    }

    fn complete(&mut self, normalized: &str) -> Result<Reply> {
        let Some(number) = first_task_number(normalized) else {
            return Ok(Reply::read_only(
                Intent::Complete,
                self.replies.missing_number("complete"),
            ));
        };

        let mut tasks = self.store.load();
        let Some(idx) = number.index(tasks.len()) else {
            return Ok(Reply::read_only(
                Intent::Complete,
                self.replies.not_found(&number, tasks.len()),
            ));
        };

        let now = (self.clock)();
        let task = &mut tasks[idx];
        if !task.complete(now) {
            return Ok(Reply::read_only(
                Intent::Complete,
                self.replies.already_completed(idx + 1, task),
            ));
        }
        let text = self.replies.completed(idx + 1, task);
        tracing::info!(id = %task.id, position = idx + 1, "task completed");

        self.store.save(&tasks)?;
        Ok(Reply::mutated(Intent::Complete, text))
    }

    fn delete(&mut self, normalized: &str) -> Result<Reply> {
        let Some(number) = first_task_number(normalized) else {
            return Ok(Reply::read_only(
                Intent::Delete,
                self.replies.missing_number("delete"),
            ));
        };

        let mut tasks = self.store.load();
        let Some(idx) = number.index(tasks.len()) else {
            return Ok(Reply::read_only(
                Intent::Delete,
                self.replies.not_found(&number, tasks.len()),
            ));
        };

        let removed = tasks.remove(idx);
        let text = self.replies.deleted(idx + 1, &removed, tasks.len());
        tracing::info!(id = %removed.id, position = idx + 1, "task deleted");

        self.store.save(&tasks)?;
        Ok(Reply::mutated(Intent::Delete, text))
    }

    fn clear_all(&mut self, confirm: &mut dyn Confirm) -> Result<Reply> {
        if !confirm.confirm(CLEAR_ALL_PROMPT) {
            return Ok(Reply::read_only(
                Intent::ClearAll,
                self.replies.clear_cancelled(),
            ));
        }

        let removed = self.store.load().len();
        self.store.save(&[])?;
        tracing::info!(removed, "all tasks cleared");
        Ok(Reply::mutated(Intent::ClearAll, self.replies.cleared(removed)))
    }
}
