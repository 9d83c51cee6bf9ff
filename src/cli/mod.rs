//! Command-line interface for taskmate
//!
//! This module defines the CLI structure using clap derive macros.
//! Each group of subcommands is implemented in its own submodule.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{self, Config, Verbosity};
use crate::error::{Error, Result};
use crate::interpreter::Confirm;
use crate::output::OutputOptions;
use crate::store::FileStore;
use crate::task::{TaskFilter, TaskSort};

mod chat;
mod init;
mod task;

/// taskmate - a conversational task list
///
/// Manage a local task list by typing commands like "add buy milk" or
/// "complete task 1", or through direct subcommands.
#[derive(Parser, Debug)]
#[command(name = "taskmate")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the config file
    #[arg(long, global = true, env = "TASKMATE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory holding the task store
    #[arg(long, global = true, env = "TASKMATE_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a default config file and an empty task store
    Init,

    /// Create a task
    New {
        /// Task title
        title: String,

        /// Longer description
        #[arg(short, long)]
        description: Option<String>,

        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,

        /// Priority from 1 (highest) to 5 (lowest)
        #[arg(short, long, allow_negative_numbers = true)]
        priority: Option<i64>,

        /// Create the task already completed
        #[arg(long)]
        completed: bool,
    },

    /// List tasks
    #[command(alias = "ls")]
    List {
        /// Which tasks to show
        #[arg(long, value_enum, default_value_t = TaskFilter::All)]
        filter: TaskFilter,

        /// Display order
        #[arg(long, value_enum, default_value_t = TaskSort::Created)]
        sort: TaskSort,
    },

    /// Flip a task between pending and completed
    Toggle {
        /// Task number or id
        task: String,
    },

    /// Delete one task
    Rm {
        /// Task number or id
        task: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Delete every task
    Clear {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Show task statistics
    Stats,

    /// Send one message to the assistant
    Say {
        /// Message text, e.g. "add buy milk"
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        text: Vec<String>,

        /// Answer yes to any confirmation
        #[arg(short, long)]
        yes: bool,

        /// Reply style (overrides chat.verbosity)
        #[arg(long, value_enum)]
        verbosity: Option<Verbosity>,
    },

    /// Chat with the assistant
    Chat {
        /// Line-based chat instead of the full-screen view
        #[arg(long)]
        plain: bool,

        /// Show replies immediately
        #[arg(long)]
        no_delay: bool,

        /// Reply style (overrides chat.verbosity)
        #[arg(long, value_enum)]
        verbosity: Option<Verbosity>,
    },
}

/// Resolved configuration and locations shared by every command.
pub(crate) struct Context {
    pub config: Config,
    pub config_path: PathBuf,
    pub data_dir: PathBuf,
    pub output: OutputOptions,
}

impl Context {
    pub fn open_store(&self) -> FileStore {
        FileStore::new(self.config.store_file(&self.data_dir))
            .with_lock_timeout(self.config.store.lock_timeout_ms)
    }
}

/// Load config and resolve the data directory.
///
/// An explicit config path must parse; the platform default falls back to
/// built-in defaults when broken. Data directory precedence: `--data-dir`,
/// then `store.dir`, then the platform data dir.
pub(crate) fn load_context(
    config_path: Option<PathBuf>,
    data_dir: Option<PathBuf>,
    output: OutputOptions,
) -> Result<Context> {
    let (config, config_path) = match config_path {
        Some(path) => {
            let config = if path.exists() {
                Config::load(&path)?
            } else {
                Config::default()
            };
            (config, path)
        }
        None => {
            let path = config::default_config_path().ok_or(Error::NoDataDir)?;
            (Config::load_or_default(&path), path)
        }
    };

    let data_dir = data_dir
        .or_else(|| config.store.dir.clone())
        .or_else(config::default_data_dir)
        .ok_or(Error::NoDataDir)?;

    tracing::debug!(
        config = %config_path.display(),
        data_dir = %data_dir.display(),
        "resolved context"
    );

    Ok(Context {
        config,
        config_path,
        data_dir,
        output,
    })
}

/// Asks on stderr and reads the answer from stdin; EOF means no.
pub(crate) struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&mut self, prompt: &str) -> bool {
        eprint!("{prompt} [y/N] ");
        let _ = io::stderr().flush();
        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(0) | Err(_) => false,
            Ok(_) => is_yes(&answer),
        }
    }
}

pub(crate) fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Confirmation for commands that take `--yes`.
pub(crate) fn confirmer(yes: bool) -> Box<dyn Confirm> {
    if yes {
        Box::new(|_: &str| true)
    } else {
        Box::new(StdinConfirm)
    }
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        let output = OutputOptions {
            json: self.json,
            quiet: self.quiet,
        };
        let ctx = load_context(self.config, self.data_dir, output)?;

        match self.command {
            Commands::Init => init::run(&ctx),
            Commands::New {
                title,
                description,
                due,
                priority,
                completed,
            } => task::run_new(
                &ctx,
                task::NewOptions {
                    title,
                    description,
                    due,
                    priority,
                    completed,
                },
            ),
            Commands::List { filter, sort } => {
                task::run_list(&ctx, task::ListOptions { filter, sort })
            }
            Commands::Toggle { task: reference } => task::run_toggle(&ctx, &reference),
            Commands::Rm {
                task: reference,
                yes,
            } => task::run_rm(&ctx, &reference, confirmer(yes).as_mut()),
            Commands::Clear { yes } => task::run_clear(&ctx, confirmer(yes).as_mut()),
            Commands::Stats => task::run_stats(&ctx),
            Commands::Say {
                text,
                yes,
                verbosity,
            } => chat::run_say(
                &ctx,
                chat::SayOptions {
                    text: text.join(" "),
                    verbosity,
                },
                confirmer(yes).as_mut(),
            ),
            Commands::Chat {
                plain,
                no_delay,
                verbosity,
            } => chat::run_chat(
                &ctx,
                chat::ChatOptions {
                    plain,
                    no_delay,
                    verbosity,
                },
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn say_collects_free_text() {
        let cli = Cli::try_parse_from(["taskmate", "say", "complete", "task", "-1"]).unwrap();
        match cli.command {
            Commands::Say { text, .. } => assert_eq!(text.join(" "), "complete task -1"),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn yes_answers() {
        assert!(is_yes("y\n"));
        assert!(is_yes(" YES "));
        assert!(!is_yes("n"));
        assert!(!is_yes(""));
    }

    #[test]
    fn data_dir_flag_beats_config() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        std::fs::write(&config_path, "[store]\ndir = \"/from/config\"\n").unwrap();
        let output = OutputOptions {
            json: false,
            quiet: false,
        };

        let ctx = load_context(Some(config_path.clone()), None, output).unwrap();
        assert_eq!(ctx.data_dir, PathBuf::from("/from/config"));

        let ctx = load_context(Some(config_path), Some(dir.path().to_path_buf()), output).unwrap();
        assert_eq!(ctx.data_dir, dir.path());
    }

    #[test]
    fn explicit_invalid_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        std::fs::write(&config_path, "[tasks]\ndefault_priority = 0\n").unwrap();
        let output = OutputOptions {
            json: false,
            quiet: false,
        };

        let err = load_context(Some(config_path), Some(dir.path().to_path_buf()), output)
            .err()
            .unwrap();
        assert_eq!(err.exit_code(), 2);
    }
}
