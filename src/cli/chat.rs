//! Conversational commands: `say` and `chat`.

use std::io::{self, BufRead, IsTerminal, Write};
use std::thread;
use std::time::Duration;

use crate::cli::{is_yes, Context};
use crate::config::Verbosity;
use crate::conversation::Conversation;
use crate::error::{Error, Result};
use crate::interpreter::{Confirm, Interpreter};
use crate::output::{emit_success, HumanOutput};
use crate::store::TaskStore;
use crate::ui::chat::{self as chat_ui, ChatSettings};

pub struct SayOptions {
    pub text: String,
    pub verbosity: Option<Verbosity>,
}

pub struct ChatOptions {
    pub plain: bool,
    pub no_delay: bool,
    pub verbosity: Option<Verbosity>,
}

fn interpreter_for<S: TaskStore>(
    ctx: &Context,
    store: S,
    verbosity: Option<Verbosity>,
) -> Interpreter<S> {
    Interpreter::new(store)
        .with_verbosity(verbosity.unwrap_or(ctx.config.chat.verbosity))
        .with_default_priority(ctx.config.tasks.default_priority)
}

pub fn run_say(ctx: &Context, options: SayOptions, confirm: &mut dyn Confirm) -> Result<()> {
    let mut interpreter = interpreter_for(ctx, ctx.open_store(), options.verbosity);
    let reply = interpreter.interpret(&options.text, confirm)?;

    let human = HumanOutput::new(reply.text.clone());
    emit_success(ctx.output, "say", &reply, Some(&human))
}

pub fn run_chat(ctx: &Context, options: ChatOptions) -> Result<()> {
    if ctx.output.json {
        return Err(Error::InvalidArgument(
            "chat does not support --json; use `taskmate say --json`".to_string(),
        ));
    }

    let verbosity = options.verbosity.unwrap_or(ctx.config.chat.verbosity);
    let thinking_delay = if options.no_delay {
        Duration::ZERO
    } else {
        Duration::from_millis(ctx.config.chat.thinking_delay_ms)
    };
    let interactive = io::stdin().is_terminal() && io::stdout().is_terminal();

    if options.plain || !interactive {
        let interpreter = interpreter_for(ctx, ctx.open_store(), Some(verbosity));
        let stdin = io::stdin();
        let stdout = io::stdout();
        return run_repl(
            interpreter,
            &mut stdin.lock(),
            &mut stdout.lock(),
            ReplSettings {
                thinking_delay,
                show_prompt: interactive,
            },
        );
    }

    chat_ui::run(
        ctx.open_store(),
        ChatSettings {
            verbosity,
            default_priority: ctx.config.tasks.default_priority,
            thinking_delay,
        },
    )
}

struct ReplSettings {
    thinking_delay: Duration,
    show_prompt: bool,
}

fn is_exit(line: &str) -> bool {
    matches!(line.trim().to_lowercase().as_str(), "exit" | "quit")
}

/// Ask on `out` and read the answer as the next input line; EOF means no.
fn ask(prompt: &str, input: &mut dyn BufRead, out: &mut dyn Write) -> bool {
    if write!(out, "{prompt} [y/N] ").and_then(|_| out.flush()).is_err() {
        return false;
    }
    let mut answer = String::new();
    match input.read_line(&mut answer) {
        Ok(0) | Err(_) => false,
        Ok(_) => is_yes(&answer),
    }
}

/// Line-based chat. Ends on EOF, `exit` or `quit`.
fn run_repl<S: TaskStore>(
    mut interpreter: Interpreter<S>,
    input: &mut dyn BufRead,
    out: &mut dyn Write,
    settings: ReplSettings,
) -> Result<()> {
    let mut conversation = Conversation::new(interpreter.replies().welcome());
    if let Some(welcome) = conversation.messages().first() {
        writeln!(out, "{}\n", welcome.content)?;
    }

    let mut line = String::new();
    loop {
        if settings.show_prompt {
            write!(out, "> ")?;
        }
        out.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 || is_exit(&line) {
            break;
        }

        let mut confirm = |prompt: &str| ask(prompt, &mut *input, &mut *out);
        let submitted = conversation.submit(&mut interpreter, &line, &mut confirm);
        match submitted {
            Ok(Some(reply)) => {
                if !settings.thinking_delay.is_zero() {
                    thread::sleep(settings.thinking_delay);
                }
                writeln!(out, "{}\n", reply.text)?;
            }
            Ok(None) => {}
            Err(err) => {
                tracing::warn!(error = %err, "store write failed");
                writeln!(out, "⚠️ Could not save your tasks: {err}\n")?;
            }
        }
    }
    Ok(())
}
