//! Full-screen terminal chat.

pub mod app;
pub mod view;

pub use app::{run, ChatSettings};
