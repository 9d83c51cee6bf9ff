//! taskmate - a conversational task list
//!
//! Typed sentences such as "add buy milk" or "complete task 1" are
//! classified into a fixed set of intents and applied to a task collection
//! persisted as one JSON blob.
//!
//! # Module Organization
//!
//! - `task`: Task records, list policy and statistics
//! - `store`: The `TaskStore` trait with file and in-memory stores
//! - `intent`: Ordered intent rules and argument extraction
//! - `interpreter`: Runs one line of input against a store
//! - `format`: Reply text in compact and rich verbosity
//! - `conversation`: Message log used by the chat surfaces
//! - `cli`: Command-line interface using clap
//! - `ui`: Full-screen terminal chat
//! - `config`: Configuration loading from `config.toml`
//! - `lock`: File locking and atomic writes
//! - `output`: Human and JSON command output
//! - `error`: Error types and result aliases

pub mod cli;
pub mod config;
pub mod conversation;
pub mod error;
pub mod format;
pub mod intent;
pub mod interpreter;
pub mod lock;
pub mod output;
pub mod store;
pub mod task;
pub mod ui;

pub use error::{Error, Result};
pub use interpreter::{Confirm, Interpreter, Reply};
pub use store::{FileStore, MemoryStore, NotifyingStore, TaskStore};
