//! Direct task commands: new, list, toggle, rm, clear, stats.

use chrono::{Local, Utc};
use serde::Serialize;

use crate::cli::Context;
use crate::error::{Error, Result};
use crate::interpreter::Confirm;
use crate::output::{emit_success, HumanOutput};
use crate::store::TaskStore;
use crate::task::{
    count_label, parse_due_date, resolve_task_ref, select_tasks, validate_priority, Task,
    TaskDraft, TaskFilter, TaskSort, TaskStats, TaskStatus,
};

pub struct NewOptions {
    pub title: String,
    pub description: Option<String>,
    pub due: Option<String>,
    pub priority: Option<i64>,
    pub completed: bool,
}

pub struct ListOptions {
    pub filter: TaskFilter,
    pub sort: TaskSort,
}

#[derive(Serialize)]
struct NumberedTask<'a> {
    number: usize,
    #[serde(flatten)]
    task: &'a Task,
}

#[derive(Serialize)]
struct TaskListOutput<'a> {
    total: usize,
    shown: usize,
    filter: TaskFilter,
    sort: TaskSort,
    tasks: Vec<NumberedTask<'a>>,
}

#[derive(Serialize)]
struct TaskRemovedOutput {
    deleted: bool,
    number: usize,
    id: String,
    remaining: usize,
}

#[derive(Serialize)]
struct ClearOutput {
    cleared: bool,
    removed: usize,
}

fn task_line(number: usize, task: &Task) -> String {
    let mut line = format!(
        "{number}. {} {} [P{}]",
        task.status.glyph(),
        task.title,
        task.priority
    );
    if let Some(due) = task.due_date {
        line.push_str(&format!(" (due {due})"));
    }
    if let Some(description) = task.description_text() {
        line.push_str(&format!(" - {description}"));
    }
    line
}

pub fn run_new(ctx: &Context, options: NewOptions) -> Result<()> {
    let title = options.title.trim();
    if title.is_empty() {
        return Err(Error::InvalidArgument("title cannot be empty".to_string()));
    }

    let priority = options
        .priority
        .unwrap_or(ctx.config.tasks.default_priority);
    validate_priority(priority)?;

    let due_date = match options.due.as_deref() {
        Some(raw) => Some(parse_due_date(raw).ok_or_else(|| {
            Error::InvalidArgument(format!("invalid due date '{raw}' (expected YYYY-MM-DD)"))
        })?),
        None => None,
    };

    let store = ctx.open_store();
    let mut tasks = store.load();
    let draft = TaskDraft {
        title: title.to_string(),
        description: options.description,
        due_date,
        priority,
        status: if options.completed {
            TaskStatus::Completed
        } else {
            TaskStatus::Pending
        },
    };
    let task = draft.build(&tasks, Utc::now())?;
    tasks.push(task.clone());
    store.save(&tasks)?;
    tracing::info!(id = %task.id, "task created");

    let mut human = HumanOutput::new("Task created");
    human.push_summary("Number", tasks.len().to_string());
    human.push_summary("ID", task.id.clone());
    human.push_summary("Title", task.title.clone());
    human.push_summary("Status", task.status.label());
    human.push_summary("Priority", task.priority.to_string());
    if let Some(due) = task.due_date {
        human.push_summary("Due", due.to_string());
    }

    emit_success(ctx.output, "new", &task, Some(&human))
}

pub fn run_list(ctx: &Context, options: ListOptions) -> Result<()> {
    let tasks = ctx.open_store().load();
    let selected = select_tasks(&tasks, options.filter, options.sort);

    let mut human = HumanOutput::new("Tasks");
    human.push_summary("Total", tasks.len().to_string());
    human.push_summary("Shown", selected.len().to_string());
    for (number, task) in &selected {
        human.push_detail(task_line(*number, task));
    }
    if tasks.is_empty() {
        human.push_next_step("taskmate new \"<title>\"");
    }

    let output = TaskListOutput {
        total: tasks.len(),
        shown: selected.len(),
        filter: options.filter,
        sort: options.sort,
        tasks: selected
            .into_iter()
            .map(|(number, task)| NumberedTask { number, task })
            .collect(),
    };

    emit_success(ctx.output, "list", &output, Some(&human))
}

pub fn run_toggle(ctx: &Context, reference: &str) -> Result<()> {
    let store = ctx.open_store();
    let mut tasks = store.load();
    let idx = resolve_task_ref(&tasks, reference)?;

    let status = tasks[idx].toggle(Utc::now());
    store.save(&tasks)?;
    let task = &tasks[idx];
    tracing::info!(id = %task.id, status = task.status.label(), "task toggled");

    let mut human = HumanOutput::new(format!("Task {} is now {}", idx + 1, status.label()));
    human.push_detail(task_line(idx + 1, task));

    emit_success(
        ctx.output,
        "toggle",
        &NumberedTask {
            number: idx + 1,
            task,
        },
        Some(&human),
    )
}

pub fn run_rm(ctx: &Context, reference: &str, confirm: &mut dyn Confirm) -> Result<()> {
    let store = ctx.open_store();
    let mut tasks = store.load();
    let idx = resolve_task_ref(&tasks, reference)?;

    let prompt = format!("Delete task {} \"{}\"?", idx + 1, tasks[idx].title);
    if !confirm.confirm(&prompt) {
        let output = TaskRemovedOutput {
            deleted: false,
            number: idx + 1,
            id: tasks[idx].id.clone(),
            remaining: tasks.len(),
        };
        let human = HumanOutput::new("Deletion cancelled");
        return emit_success(ctx.output, "rm", &output, Some(&human));
    }

    let removed = tasks.remove(idx);
    store.save(&tasks)?;
    tracing::info!(id = %removed.id, "task deleted");

    let mut human = HumanOutput::new(format!("Task {} deleted", idx + 1));
    human.push_summary("Title", removed.title.clone());
    human.push_summary("Remaining", count_label(tasks.len()));

    let output = TaskRemovedOutput {
        deleted: true,
        number: idx + 1,
        id: removed.id,
        remaining: tasks.len(),
    };
    emit_success(ctx.output, "rm", &output, Some(&human))
}

pub fn run_clear(ctx: &Context, confirm: &mut dyn Confirm) -> Result<()> {
    let store = ctx.open_store();
    let count = store.load().len();

    if !confirm.confirm(&format!("Delete all {}?", count_label(count))) {
        let human = HumanOutput::new("Clear cancelled");
        return emit_success(
            ctx.output,
            "clear",
            &ClearOutput {
                cleared: false,
                removed: 0,
            },
            Some(&human),
        );
    }

    store.save(&[])?;
    tracing::info!(removed = count, "all tasks cleared");

    let human = HumanOutput::new(format!("Deleted {}", count_label(count)));
    emit_success(
        ctx.output,
        "clear",
        &ClearOutput {
            cleared: true,
            removed: count,
        },
        Some(&human),
    )
}

pub fn run_stats(ctx: &Context) -> Result<()> {
    let tasks = ctx.open_store().load();
    let stats = TaskStats::compute(&tasks, Local::now().date_naive());

    let mut human = HumanOutput::new("Task stats");
    human.push_summary("Total", stats.total.to_string());
    human.push_summary("Pending", stats.pending.to_string());
    human.push_summary("Completed", stats.completed.to_string());
    human.push_summary("High priority", stats.high_priority.to_string());
    human.push_summary("Overdue", stats.overdue.to_string());
    human.push_summary("Due today", stats.due_today.to_string());
    human.push_summary("Completion", format!("{}%", stats.completion_rate));

    emit_success(ctx.output, "stats", &stats, Some(&human))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};

    #[test]
    fn task_line_includes_optional_fields() {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 9, 0, 0).unwrap();
        let mut task = Task::new("01A", "buy milk", now);
        assert_eq!(task_line(1, &task), "1. ⏳ buy milk [P3]");

        task.due_date = NaiveDate::from_ymd_opt(2026, 10, 20);
        task.description = Some("  2 litres ".to_string());
        task.complete(now);
        assert_eq!(
            task_line(4, &task),
            "4. ✅ buy milk [P3] (due 2026-10-20) - 2 litres"
        );
    }
}
