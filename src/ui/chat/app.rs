use std::cell::Cell;
use std::io;
use std::rc::Rc;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use crate::config::Verbosity;
use crate::conversation::{Conversation, QUICK_ACTIONS};
use crate::error::Result;
use crate::intent::{self, Intent};
use crate::interpreter::Interpreter;
use crate::store::{NotifyingStore, TaskStore};
use crate::task::Task;

use super::view;

const EVENT_POLL_MS: u64 = 50;
const SCROLL_PAGE: u16 = 10;

/// Settings for one chat session.
#[derive(Debug, Clone, Copy)]
pub struct ChatSettings {
    pub verbosity: Verbosity,
    pub default_priority: i64,
    pub thinking_delay: Duration,
}

/// A computed reply waiting for the thinking delay to pass.
pub(crate) struct PendingReply {
    text: String,
    ready_at: Instant,
}

pub struct AppState<S> {
    pub(crate) conversation: Conversation,
    pub(crate) input: String,
    pub(crate) pending: Option<PendingReply>,
    /// Input awaiting a yes/no before all tasks are wiped.
    pub(crate) clear_confirm: Option<String>,
    /// Lines scrolled up from the bottom of the log.
    pub(crate) scroll: u16,
    task_count: Rc<Cell<usize>>,
    interpreter: Interpreter<S>,
    thinking_delay: Duration,
}

impl<S: TaskStore> AppState<S> {
    pub(crate) fn new(
        interpreter: Interpreter<S>,
        task_count: Rc<Cell<usize>>,
        thinking_delay: Duration,
    ) -> Self {
        let welcome = interpreter.replies().welcome();
        Self {
            conversation: Conversation::new(welcome),
            input: String::new(),
            pending: None,
            clear_confirm: None,
            scroll: 0,
            task_count,
            interpreter,
            thinking_delay,
        }
    }

    pub(crate) fn task_count(&self) -> usize {
        self.task_count.get()
    }

    pub(crate) fn is_thinking(&self) -> bool {
        self.pending.is_some()
    }

    /// Send the input box contents. Ignored while a reply is pending.
    fn submit_input(&mut self, now: Instant) {
        if self.pending.is_some() || self.clear_confirm.is_some() {
            return;
        }
        let input = std::mem::take(&mut self.input);
        let input = input.trim();
        if input.is_empty() {
            return;
        }
        self.scroll = 0;
        self.conversation.push_user(input);

        if intent::classify(&intent::normalize(input)) == Intent::ClearAll {
            self.clear_confirm = Some(input.to_string());
            return;
        }
        self.dispatch(input, false, now);
    }

    fn quick_action(&mut self, index: usize, now: Instant) {
        if self.pending.is_some() || self.clear_confirm.is_some() {
            return;
        }
        if let Some(action) = QUICK_ACTIONS.get(index) {
            self.input = action.prompt.to_string();
            self.submit_input(now);
        }
    }

    fn resolve_clear(&mut self, answer: bool, now: Instant) {
        if let Some(input) = self.clear_confirm.take() {
            self.dispatch(&input, answer, now);
        }
    }

    fn dispatch(&mut self, input: &str, answer: bool, now: Instant) {
        let mut confirm = |_: &str| answer;
        let text = match self.interpreter.interpret(input, &mut confirm) {
            Ok(reply) => reply.text,
            Err(err) => {
                tracing::warn!(error = %err, "store write failed");
                format!("⚠️ Could not save your tasks: {err}")
            }
        };
        self.pending = Some(PendingReply {
            text,
            ready_at: now + self.thinking_delay,
        });
    }

    /// Deliver the pending reply once its delay has passed.
    fn tick(&mut self, now: Instant) -> bool {
        let ready = self
            .pending
            .as_ref()
            .is_some_and(|pending| now >= pending.ready_at);
        if !ready {
            return false;
        }
        if let Some(pending) = self.pending.take() {
            self.conversation.push_assistant(pending.text);
            self.scroll = 0;
        }
        true
    }

    fn clear_conversation(&mut self) {
        self.conversation.clear();
        self.scroll = 0;
    }
}

pub fn run<S: TaskStore>(store: S, settings: ChatSettings) -> Result<()> {
    let task_count = Rc::new(Cell::new(store.load().len()));
    let counter = Rc::clone(&task_count);
    let store = NotifyingStore::new(store, move |tasks: &[Task]| counter.set(tasks.len()));

    let interpreter = Interpreter::new(store)
        .with_verbosity(settings.verbosity)
        .with_default_priority(settings.default_priority);
    let mut app = AppState::new(interpreter, task_count, settings.thinking_delay);
    run_terminal(&mut app)
}

fn run_terminal<S: TaskStore>(app: &mut AppState<S>) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_loop<S: TaskStore>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState<S>,
) -> Result<()> {
    let mut dirty = true;
    loop {
        if app.tick(Instant::now()) {
            dirty = true;
        }

        if dirty {
            terminal.draw(|frame| view::render(frame, app))?;
            dirty = false;
        }

        if event::poll(Duration::from_millis(EVENT_POLL_MS))? {
            match event::read()? {
                Event::Key(key) if key.kind != KeyEventKind::Release => {
                    if handle_key(app, key, Instant::now()) {
                        break;
                    }
                    dirty = true;
                }
                Event::Resize(_, _) => dirty = true,
                _ => {}
            }
        }
    }
    Ok(())
}

/// Returns true when the session should end.
fn handle_key<S: TaskStore>(app: &mut AppState<S>, key: KeyEvent, now: Instant) -> bool {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl && key.code == KeyCode::Char('c') {
        return true;
    }

    if app.clear_confirm.is_some() {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                app.resolve_clear(true, now)
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.resolve_clear(false, now)
            }
            _ => {}
        }
        return false;
    }

    match key.code {
        KeyCode::Esc => return true,
        KeyCode::Char('l') if ctrl => app.clear_conversation(),
        KeyCode::F(n @ 1..=4) => app.quick_action(usize::from(n - 1), now),
        KeyCode::Enter => app.submit_input(now),
        KeyCode::Backspace if !app.is_thinking() => {
            app.input.pop();
        }
        KeyCode::Char(ch) if !ctrl && !app.is_thinking() => app.input.push(ch),
        KeyCode::Up => app.scroll = app.scroll.saturating_add(1),
        KeyCode::Down => app.scroll = app.scroll.saturating_sub(1),
        KeyCode::PageUp => app.scroll = app.scroll.saturating_add(SCROLL_PAGE),
        KeyCode::PageDown => app.scroll = app.scroll.saturating_sub(SCROLL_PAGE),
        _ => {}
    }
    false
}
