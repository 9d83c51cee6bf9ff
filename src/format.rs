//! Assistant reply text.
//!
//! Both verbosity levels report the same facts. `Rich` adds markdown
//! emphasis, creation dates and priorities.

use chrono::{DateTime, Local, Utc};

use crate::config::Verbosity;
use crate::intent::TaskNumber;
use crate::task::{count_label, Task, MAX_PRIORITY};

/// Prompt shown before wiping every task.
pub const CLEAR_ALL_PROMPT: &str = "Are you sure you want to delete ALL tasks?";

fn local_time(stamp: DateTime<Utc>) -> String {
    stamp.with_timezone(&Local).format("%H:%M:%S").to_string()
}

fn local_date(stamp: DateTime<Utc>) -> String {
    stamp.with_timezone(&Local).format("%b %-d, %Y").to_string()
}

#[derive(Debug, Clone, Copy)]
pub struct Replies {
    verbosity: Verbosity,
}

impl Replies {
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }

    fn rich(&self) -> bool {
        self.verbosity == Verbosity::Rich
    }

    pub fn welcome(&self) -> String {
        if self.rich() {
            "✨ **Welcome to your task assistant!** ✨\n\n\
             I can manage your tasks right from here.\n\n\
             **💡 Commands:**\n\
             • `add [task]` - Add a new task\n\
             • `list tasks` - Show all tasks\n\
             • `complete task [number]` - Mark a task as done\n\
             • `delete task [number]` - Remove a task\n\
             • `clear all` - Delete all tasks\n\
             • `help` - Show all commands\n\n\
             Try a command below!"
                .to_string()
        } else {
            "Hello! I'm your task assistant. I can help you:\n\
             • Add tasks (e.g., \"add washing clothes tomorrow\")\n\
             • List tasks\n\
             • Complete tasks (e.g., \"complete task 1\")\n\
             • Delete tasks (e.g., \"delete task 2\")\n\n\
             How can I help you today?"
                .to_string()
        }
    }

    pub fn missing_title(&self) -> String {
        let text = "Please provide a task title. Example: 'add washing clothes'";
        if self.rich() {
            format!("❌ {text}")
        } else {
            text.to_string()
        }
    }

    pub fn added(&self, task: &Task) -> String {
        if self.rich() {
            format!(
                "✅ **Task Added Successfully!**\n\n\
                 📝 **Task:** {}\n\
                 ⏰ **Created:** {}\n\
                 📊 **Status:** {}\n\n\
                 Type 'list tasks' to see everything.",
                task.title,
                local_time(task.created_at),
                task.status.label()
            )
        } else {
            format!(
                "✅ Task added: \"{}\" ({})",
                task.title,
                local_time(task.created_at)
            )
        }
    }

    pub fn empty_list(&self) -> String {
        if self.rich() {
            "📭 **No Tasks Found**\n\n\
             You don't have any tasks yet. Use `add [task]` to create your first one!\n\n\
             Example: `add washing clothes`"
                .to_string()
        } else {
            "You don't have any tasks yet. Use 'add [task]' to create one!".to_string()
        }
    }

    /// Every task, numbered from 1 in stored order.
    pub fn task_list(&self, tasks: &[Task]) -> String {
        let mut out = String::new();
        if self.rich() {
            out.push_str("📋 **Your Tasks:**\n\n");
            for (idx, task) in tasks.iter().enumerate() {
                out.push_str(&format!(
                    "{}. **{}** {}\n",
                    idx + 1,
                    task.title,
                    task.status.glyph()
                ));
                if let Some(description) = task.description_text() {
                    out.push_str(&format!("   📝 {description}\n"));
                }
                out.push_str(&format!("   📅 Created: {}\n", local_date(task.created_at)));
                if let Some(due) = task.due_date {
                    out.push_str(&format!("   ⏰ Due: {}\n", due.format("%b %-d, %Y")));
                }
                out.push_str(&format!(
                    "   🎯 Priority: {}/{}\n\n",
                    task.priority, MAX_PRIORITY
                ));
            }
            out.push_str(
                "**💡 Quick Actions:**\n\
                 • Complete a task: `complete task [number]`\n\
                 • Delete a task: `delete task [number]`\n\
                 • Add new task: `add [task description]`",
            );
        } else {
            out.push_str("📋 Your Tasks:\n");
            for (idx, task) in tasks.iter().enumerate() {
                out.push_str(&format!(
                    "{}. {} [{}]",
                    idx + 1,
                    task.title,
                    task.status.glyph()
                ));
                if let Some(description) = task.description_text() {
                    out.push_str(&format!(" - {description}"));
                }
                if let Some(due) = task.due_date {
                    out.push_str(&format!(" (due {due})"));
                }
                out.push('\n');
            }
            out.push_str(
                "\nTo complete a task: 'complete task [number]'\n\
                 To delete a task: 'delete task [number]'",
            );
        }
        out
    }

    /// `verb` is the command word to show in the example ("complete", "delete").
    pub fn missing_number(&self, verb: &str) -> String {
        let mut text = format!("Please specify a task number. Example: '{verb} task 1'");
        if verb == "delete" {
            text.push_str("\nTo remove every task, type 'clear all'.");
        }
        if self.rich() {
            format!("❌ {text}")
        } else {
            text
        }
    }

    pub fn not_found(&self, number: &TaskNumber, count: usize) -> String {
        let text = format!(
            "Task {number} doesn't exist. You have {}.",
            count_label(count)
        );
        if self.rich() {
            format!("❌ **Task Not Found**\n\n{text}\nType 'list tasks' to see all your tasks.")
        } else {
            text
        }
    }

    pub fn already_completed(&self, number: usize, task: &Task) -> String {
        if self.rich() {
            format!(
                "ℹ️ **Task Already Completed**\n\n\
                 Task {number} \"{}\" is already marked as completed.",
                task.title
            )
        } else {
            format!("ℹ️ Task {number} \"{}\" is already completed.", task.title)
        }
    }

    pub fn completed(&self, number: usize, task: &Task) -> String {
        if self.rich() {
            format!(
                "🎉 **Task Completed!**\n\n\
                 ✅ Task {number} marked as completed:\n**\"{}\"**\n\nGreat job! 🎊",
                task.title
            )
        } else {
            format!("✅ Task {number} marked as completed: \"{}\"", task.title)
        }
    }

    pub fn deleted(&self, number: usize, task: &Task, remaining: usize) -> String {
        if self.rich() {
            format!(
                "🗑️ **Task Deleted**\n\n\
                 Task {number} has been removed:\n**\"{}\"**\n\n\
                 You now have {} remaining.",
                task.title,
                count_label(remaining)
            )
        } else {
            format!(
                "🗑️ Task {number} deleted: \"{}\". {} left.",
                task.title,
                count_label(remaining)
            )
        }
    }

    pub fn cleared(&self, removed: usize) -> String {
        if self.rich() {
            format!(
                "🧹 **All Tasks Cleared**\n\n\
                 Deleted {}. Start fresh with `add [new task]`!",
                count_label(removed)
            )
        } else {
            format!("🗑️ All tasks have been deleted ({}).", count_label(removed))
        }
    }

    pub fn clear_cancelled(&self) -> String {
        if self.rich() {
            "❌ **Operation Cancelled**\n\nYour tasks are safe. No changes were made.".to_string()
        } else {
            "Task deletion cancelled.".to_string()
        }
    }

    pub fn help(&self) -> String {
        if self.rich() {
            "🤖 **Task Assistant - Help Guide**\n\n\
             **📌 TASK MANAGEMENT:**\n\
             • `add [task]` - Add new task\n\
             • `list tasks` - Show all tasks\n\
             • `complete task [number]` - Mark as done\n\
             • `delete task [number]` - Remove task\n\
             • `clear all` - Delete all tasks\n\n\
             **🎯 EXAMPLES:**\n\
             • `add grocery shopping tomorrow`\n\
             • `complete task 1`\n\
             • `what tasks do I have?`\n\
             • `delete task 3`\n\n\
             Type a command to get started! 👇"
                .to_string()
        } else {
            "🤖 Available Commands:\n\n\
             • \"add [task]\" - Add a new task\n\
             • \"list tasks\" - Show all tasks\n\
             • \"complete task [number]\" - Mark task as done\n\
             • \"delete task [number]\" - Remove a task\n\
             • \"clear all\" - Delete all tasks\n\n\
             Examples: \"add washing clothes tomorrow\", \"complete task 1\", \"what tasks do I have?\""
                .to_string()
        }
    }

    pub fn greeting(&self) -> String {
        if self.rich() {
            "👋 **Hello there!**\n\n\
             I'm your task assistant. Try:\n\
             • `add washing clothes`\n\
             • `list tasks`\n\
             • `help` for all commands\n\n\
             How can I assist you today? 😊"
                .to_string()
        } else {
            "👋 Hello! Try 'add washing clothes', 'list tasks' or 'help'.".to_string()
        }
    }

    pub fn fallback(&self, raw: &str) -> String {
        let raw = raw.trim();
        if self.rich() {
            format!(
                "🤔 **I understand:** \"{raw}\"\n\n\
                 💡 **I can help you with:**\n\
                 • Adding tasks: `add [your task]`\n\
                 • Viewing tasks: `list tasks`\n\
                 • Completing tasks: `complete task 1`\n\
                 • Deleting tasks: `delete task 2`\n\n\
                 🔍 **Need help?** Type `help` for all commands."
            )
        } else {
            format!(
                "I understand you said: \"{raw}\"\n\n\
                 I can help you with:\n\
                 • Adding tasks: \"add washing clothes\"\n\
                 • Listing tasks: \"list tasks\"\n\
                 • Completing tasks: \"complete task 1\"\n\
                 • Deleting tasks: \"delete task 2\"\n\n\
                 Try one of these commands or type \"help\" for more options!"
            )
        }
    }
}
