//! Intent classification for assistant commands.
//!
//! Input is normalized (trimmed, lower-cased) and tested against [`RULES`]
//! in order; the first matching rule wins and anything unmatched is
//! [`Intent::Fallback`]. Every predicate is a pure function of the
//! normalized text.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Add,
    List,
    Complete,
    Delete,
    ClearAll,
    Help,
    Greet,
    Fallback,
}

/// One classification rule.
#[derive(Clone, Copy)]
pub struct Rule {
    pub intent: Intent,
    pub matches: fn(&str) -> bool,
}

const ADD_WORDS: [&str; 3] = ["add", "create", "new"];
const LIST_PHRASES: [&str; 4] = ["list", "show", "view", "what tasks"];
const COMPLETE_WORDS: [&str; 3] = ["complete", "finish", "done"];
const DELETE_WORDS: [&str; 2] = ["delete", "remove"];
const CLEAR_PHRASES: [&str; 2] = ["clear all", "delete all"];
const HELP_PHRASES: [&str; 2] = ["help", "what can you do"];
const GREET_PHRASES: [&str; 3] = ["hello", "hi", "hey"];

/// Classification rules in priority order.
pub const RULES: [Rule; 7] = [
    Rule {
        intent: Intent::Add,
        matches: is_add,
    },
    Rule {
        intent: Intent::List,
        matches: is_list,
    },
    Rule {
        intent: Intent::Complete,
        matches: is_complete,
    },
    Rule {
        intent: Intent::Delete,
        matches: is_delete,
    },
    Rule {
        intent: Intent::ClearAll,
        matches: is_clear_all,
    },
    Rule {
        intent: Intent::Help,
        matches: is_help,
    },
    Rule {
        intent: Intent::Greet,
        matches: is_greeting,
    },
];

pub fn normalize(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Classify already-normalized input.
pub fn classify(normalized: &str) -> Intent {
    RULES
        .iter()
        .find(|rule| (rule.matches)(normalized))
        .map(|rule| rule.intent)
        .unwrap_or(Intent::Fallback)
}

fn first_word(text: &str) -> Option<&str> {
    text.split_whitespace().next()
}

fn starts_with_word(text: &str, words: &[&str]) -> bool {
    first_word(text).is_some_and(|word| words.contains(&word))
}

fn contains_any(text: &str, phrases: &[&str]) -> bool {
    phrases.iter().any(|phrase| text.contains(phrase))
}

fn is_add(text: &str) -> bool {
    starts_with_word(text, &ADD_WORDS)
}

fn is_list(text: &str) -> bool {
    contains_any(text, &LIST_PHRASES)
}

fn is_complete(text: &str) -> bool {
    starts_with_word(text, &COMPLETE_WORDS)
}

fn is_delete(text: &str) -> bool {
    starts_with_word(text, &DELETE_WORDS)
}

fn is_clear_all(text: &str) -> bool {
    contains_any(text, &CLEAR_PHRASES)
}

fn is_help(text: &str) -> bool {
    contains_any(text, &HELP_PHRASES)
}

fn is_greeting(text: &str) -> bool {
    contains_any(text, &GREET_PHRASES)
}

/// Text after the command word, trimmed, with original casing.
pub fn extract_title(raw: &str) -> &str {
    raw.trim()
        .split_once(char::is_whitespace)
        .map(|(_, rest)| rest.trim())
        .unwrap_or("")
}

/// A task number found in command text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskNumber {
    /// Fits in `usize`; may still be out of range for the collection.
    Value(usize),
    /// Digit run too large to represent.
    Overflow(String),
}

impl TaskNumber {
    /// 0-based index if the number addresses one of `len` tasks.
    pub fn index(&self, len: usize) -> Option<usize> {
        match self {
            TaskNumber::Value(n) if (1..=len).contains(n) => Some(n - 1),
            _ => None,
        }
    }
}

impl std::fmt::Display for TaskNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskNumber::Value(n) => write!(f, "{n}"),
            TaskNumber::Overflow(digits) => f.write_str(digits),
        }
    }
}

/// The first run of ASCII digits anywhere in `text`.
pub fn first_task_number(text: &str) -> Option<TaskNumber> {
    let start = text.find(|ch: char| ch.is_ascii_digit())?;
    let digits: &str = {
        let rest = &text[start..];
        let end = rest
            .find(|ch: char| !ch.is_ascii_digit())
            .unwrap_or(rest.len());
        &rest[..end]
    };
    Some(match digits.parse::<usize>() {
        Ok(value) => TaskNumber::Value(value),
        Err(_) => TaskNumber::Overflow(digits.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn intent_of(raw: &str) -> Intent {
        classify(&normalize(raw))
    }

    #[test]
    fn classifies_each_intent() {
        assert_eq!(intent_of("add buy milk"), Intent::Add);
        assert_eq!(intent_of("Create report"), Intent::Add);
        assert_eq!(intent_of("new thing"), Intent::Add);
        assert_eq!(intent_of("list tasks"), Intent::List);
        assert_eq!(intent_of("What tasks do I have?"), Intent::List);
        assert_eq!(intent_of("complete task 1"), Intent::Complete);
        assert_eq!(intent_of("done 2"), Intent::Complete);
        assert_eq!(intent_of("remove task 3"), Intent::Delete);
        assert_eq!(intent_of("please clear all"), Intent::ClearAll);
        assert_eq!(intent_of("help"), Intent::Help);
        assert_eq!(intent_of("what can you do"), Intent::Help);
        assert_eq!(intent_of("hey there"), Intent::Greet);
        assert_eq!(intent_of("buy milk"), Intent::Fallback);
        assert_eq!(intent_of(""), Intent::Fallback);
    }

    #[test]
    fn earlier_rules_win() {
        assert_eq!(intent_of("add help page"), Intent::Add);
        assert_eq!(intent_of("add list of groceries"), Intent::Add);
        assert_eq!(intent_of("done reviewing the list"), Intent::List);
        assert_eq!(intent_of("help me view things"), Intent::List);
        // "delete all" starts with a delete word, so Delete outranks ClearAll.
        assert_eq!(intent_of("delete all"), Intent::Delete);
        assert_eq!(intent_of("clear all and say hi"), Intent::ClearAll);
    }

    #[test]
    fn command_words_must_be_whole_first_words() {
        assert_eq!(intent_of("addition homework"), Intent::Fallback);
        assert_eq!(intent_of("add"), Intent::Add);
        assert_eq!(intent_of("   complete   task 1"), Intent::Complete);
        assert_eq!(intent_of("I want to add milk"), Intent::Fallback);
    }

    #[test]
    fn greeting_matches_substrings() {
        assert_eq!(intent_of("this is odd"), Intent::Greet);
        assert_eq!(intent_of("Hello!"), Intent::Greet);
    }

    #[test]
    fn extract_title_keeps_case_and_trims() {
        assert_eq!(extract_title("add Buy Milk"), "Buy Milk");
        assert_eq!(extract_title("  new   call   Mom  "), "call   Mom");
        assert_eq!(extract_title("add"), "");
        assert_eq!(extract_title("add   "), "");
    }

    #[test]
    fn first_number_uses_first_digit_run() {
        assert_eq!(
            first_task_number("complete task 1 and 2"),
            Some(TaskNumber::Value(1))
        );
        assert_eq!(
            first_task_number("complete task 10 times"),
            Some(TaskNumber::Value(10))
        );
        assert_eq!(first_task_number("task#007"), Some(TaskNumber::Value(7)));
        assert_eq!(first_task_number("complete task -3"), Some(TaskNumber::Value(3)));
        assert_eq!(first_task_number("complete the task"), None);
    }

    #[test]
    fn oversized_number_is_kept_verbatim() {
        let number = first_task_number("delete task 99999999999999999999999999").unwrap();
        assert_eq!(
            number,
            TaskNumber::Overflow("99999999999999999999999999".to_string())
        );
        assert_eq!(number.index(5), None);
        assert_eq!(number.to_string(), "99999999999999999999999999");
    }

    #[test]
    fn index_is_one_based() {
        assert_eq!(TaskNumber::Value(1).index(2), Some(0));
        assert_eq!(TaskNumber::Value(2).index(2), Some(1));
        assert_eq!(TaskNumber::Value(0).index(2), None);
        assert_eq!(TaskNumber::Value(3).index(2), None);
    }
}
