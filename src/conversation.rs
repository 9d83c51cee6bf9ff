//! Conversation log shared by the terminal chat and the plain REPL.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::error::Result;
use crate::interpreter::{Confirm, Interpreter, Reply};
use crate::store::TaskStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub id: Uuid,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// A canned prompt offered next to the input box.
#[derive(Debug, Clone, Copy)]
pub struct QuickAction {
    pub label: &'static str,
    pub prompt: &'static str,
}

pub const QUICK_ACTIONS: [QuickAction; 4] = [
    QuickAction {
        label: "Add Task",
        prompt: "add washing clothes",
    },
    QuickAction {
        label: "List Tasks",
        prompt: "list tasks",
    },
    QuickAction {
        label: "Complete",
        prompt: "complete task 1",
    },
    QuickAction {
        label: "Help",
        prompt: "help",
    },
];

/// Ordered user/assistant turns, always starting with the welcome message.
#[derive(Debug, Clone)]
pub struct Conversation {
    welcome: String,
    messages: Vec<Message>,
}

impl Conversation {
    pub fn new(welcome: impl Into<String>) -> Self {
        let welcome = welcome.into();
        Self {
            messages: vec![Message::new(Role::Assistant, welcome.clone())],
            welcome,
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.messages.push(Message::new(Role::User, content));
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.messages.push(Message::new(Role::Assistant, content));
    }

    /// Record the user turn, run the interpreter, record the reply.
    ///
    /// Blank input is ignored and returns `None`.
    pub fn submit<S: TaskStore>(
        &mut self,
        interpreter: &mut Interpreter<S>,
        input: &str,
        confirm: &mut dyn Confirm,
    ) -> Result<Option<Reply>> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(None);
        }
        self.push_user(input);
        let reply = interpreter.interpret(input, confirm)?;
        self.push_assistant(reply.text.clone());
        Ok(Some(reply))
    }

    /// Drop every turn except a fresh welcome message.
    pub fn clear(&mut self) {
        self.messages = vec![Message::new(Role::Assistant, self.welcome.clone())];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn yes(_: &str) -> bool {
        true
    }

    #[test]
    fn starts_with_welcome() {
        let conversation = Conversation::new("hi there");
        assert_eq!(conversation.messages().len(), 1);
        assert_eq!(conversation.messages()[0].role, Role::Assistant);
        assert_eq!(conversation.messages()[0].content, "hi there");
    }

    #[test]
    fn submit_appends_both_turns() {
        let store = MemoryStore::new();
        let mut interpreter = Interpreter::new(&store);
        let mut conversation = Conversation::new("welcome");

        let reply = conversation
            .submit(&mut interpreter, "  add buy milk ", &mut yes)
            .unwrap()
            .unwrap();
        assert!(reply.mutated);

        let messages = conversation.messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[1].role, Role::User);
        assert_eq!(messages[1].content, "add buy milk");
        assert_eq!(messages[2].role, Role::Assistant);
        assert_eq!(messages[2].content, reply.text);
        assert_ne!(messages[1].id, messages[2].id);
    }

    #[test]
    fn blank_input_is_ignored() {
        let store = MemoryStore::new();
        let mut interpreter = Interpreter::new(&store);
        let mut conversation = Conversation::new("welcome");

        assert!(conversation
            .submit(&mut interpreter, "   ", &mut yes)
            .unwrap()
            .is_none());
        assert_eq!(conversation.messages().len(), 1);
    }

    #[test]
    fn clear_resets_to_welcome_only() {
        let store = MemoryStore::new();
        let mut interpreter = Interpreter::new(&store);
        let mut conversation = Conversation::new("welcome");
        conversation.submit(&mut interpreter, "help", &mut yes).unwrap();

        conversation.clear();
        assert_eq!(conversation.messages().len(), 1);
        assert_eq!(conversation.messages()[0].content, "welcome");
        // Task data is untouched by clearing the log.
        assert!(store.raw().is_none());
    }

    #[test]
    fn quick_actions_are_commands() {
        let prompts: Vec<_> = QUICK_ACTIONS.iter().map(|action| action.prompt).collect();
        assert_eq!(
            prompts,
            vec!["add washing clothes", "list tasks", "complete task 1", "help"]
        );
    }
}
