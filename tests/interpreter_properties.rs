use taskmate::config::Verbosity;
use taskmate::intent::Intent;
use taskmate::store::{MemoryStore, TaskStore};
use taskmate::task::TaskStatus;
use taskmate::Interpreter;

fn yes(_: &str) -> bool {
    true
}

fn no(_: &str) -> bool {
    false
}

/// Title field of every numbered entry in a task list reply.
fn listed_titles(text: &str, verbosity: Verbosity) -> Vec<String> {
    let pending = TaskStatus::Pending.glyph();
    let completed = TaskStatus::Completed.glyph();
    text.lines()
        .filter_map(|line| {
            let (number, rest) = line.split_once(". ")?;
            if number.is_empty() || !number.chars().all(|ch| ch.is_ascii_digit()) {
                return None;
            }
            let title = match verbosity {
                Verbosity::Rich => rest
                    .strip_suffix(pending)
                    .or_else(|| rest.strip_suffix(completed))?
                    .trim_end()
                    .strip_prefix("**")?
                    .strip_suffix("**")?,
                Verbosity::Compact => {
                    let end = rest
                        .rfind(&format!(" [{pending}]"))
                        .or_else(|| rest.rfind(&format!(" [{completed}]")))?;
                    &rest[..end]
                }
            };
            Some(title.to_string())
        })
        .collect()
}

fn seeded(count: usize) -> MemoryStore {
    let store = MemoryStore::new();
    let mut interpreter = Interpreter::new(&store);
    for n in 0..count {
        interpreter
            .interpret(&format!("add task number {n}"), &mut yes)
            .expect("add");
    }
    store
}

#[test]
fn added_titles_are_listed_once_as_pending() {
    let titles = [
        "buy milk",
        "Renew passport before June",
        "email: follow up",
        "a",
        "review PR #128",
    ];
    for verbosity in [Verbosity::Rich, Verbosity::Compact] {
        for title in titles {
            let store = MemoryStore::new();
            let mut interpreter = Interpreter::new(&store).with_verbosity(verbosity);
            interpreter
                .interpret(&format!("add {title}"), &mut yes)
                .expect("add");

            let listed = interpreter.interpret("list tasks", &mut yes).expect("list");
            assert_eq!(
                listed_titles(&listed.text, verbosity),
                vec![title.to_string()],
                "{title}"
            );
            assert!(listed.text.contains(TaskStatus::Pending.glyph()));
        }
    }
}

#[test]
fn out_of_range_delete_reports_count_for_any_size() {
    for size in 0..5 {
        let store = seeded(size);
        let before = store.raw();
        let mut interpreter = Interpreter::new(&store);

        for k in [0, size + 1, size + 10] {
            let reply = interpreter
                .interpret(&format!("delete task {k}"), &mut yes)
                .expect("delete");
            assert!(!reply.mutated);
            let expected = if size == 1 {
                "1 task".to_string()
            } else {
                format!("{size} tasks")
            };
            assert!(reply.text.contains(&expected), "{}", reply.text);
            assert_eq!(store.raw(), before);
        }
    }
}

#[test]
fn complete_twice_keeps_first_timestamp() {
    for size in 1..4 {
        for k in 1..=size {
            let store = seeded(size);
            let mut interpreter = Interpreter::new(&store);
            let command = format!("complete task {k}");

            let first = interpreter.interpret(&command, &mut yes).expect("complete");
            assert!(first.mutated);
            let after_first = store.load()[k - 1].clone();
            assert_eq!(after_first.status, TaskStatus::Completed);
            assert!(after_first.updated_at >= after_first.created_at);

            let second = interpreter.interpret(&command, &mut yes).expect("complete");
            assert!(!second.mutated);
            assert_eq!(store.load()[k - 1].updated_at, after_first.updated_at);
        }
    }
}

#[test]
fn clear_all_confirmed_or_declined() {
    for size in 0..4 {
        let store = seeded(size);
        let before = store.raw();
        let mut interpreter = Interpreter::new(&store);

        let declined = interpreter.interpret("clear all", &mut no).expect("clear");
        assert_eq!(declined.intent, Intent::ClearAll);
        assert_eq!(store.raw(), before);

        interpreter.interpret("clear all", &mut yes).expect("clear");
        assert!(store.load().is_empty());
    }
}

#[test]
fn save_of_load_is_byte_identical() {
    let store = seeded(3);
    let mut interpreter = Interpreter::new(&store);
    interpreter.interpret("complete task 2", &mut yes).expect("complete");
    let raw = store.raw();

    store.save(&store.load()).expect("save");
    assert_eq!(store.raw(), raw);
}

#[test]
fn first_number_wins() {
    let store = seeded(3);
    let mut interpreter = Interpreter::new(&store);
    interpreter
        .interpret("complete task 1 and 2", &mut yes)
        .expect("complete");

    let statuses: Vec<_> = store.load().into_iter().map(|task| task.status).collect();
    assert_eq!(
        statuses,
        vec![TaskStatus::Completed, TaskStatus::Pending, TaskStatus::Pending]
    );

    let reply = interpreter
        .interpret("complete task 10 times", &mut yes)
        .expect("complete");
    assert!(reply.text.contains("Task 10 doesn't exist"));
}
