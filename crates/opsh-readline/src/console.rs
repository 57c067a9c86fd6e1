//! rustyline-backed [`Console`].

use std::borrow::Cow::{self, Borrowed, Owned};
use std::io::Write;

use colored::Colorize;
use opsh_application::{Console, InputEvent, Prompt, Tone};
use opsh_core::exec::CommandOutput;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};

const BUILTINS: [&str; 5] = ["!help", "!version", "!credits", "!auth", "!uninstall"];

/// Completion and hints for `!` builtins.
#[derive(Clone, Default)]
struct CliHelper;

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];
        if !line.starts_with('!') {
            return Ok((0, vec![]));
        }

        let candidates = BUILTINS
            .iter()
            .filter(|cmd| cmd.starts_with(line))
            .map(|cmd| Pair {
                display: cmd.to_string(),
                replacement: cmd.to_string(),
            })
            .collect();
        Ok((0, candidates))
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if BUILTINS.contains(&line) {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Owned(hint.bright_black().to_string())
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];
        if !line.starts_with('!') || line.contains(' ') {
            return None;
        }
        BUILTINS
            .iter()
            .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
            .map(|cmd| cmd[line.len()..].to_string())
    }
}

impl Validator for CliHelper {}

/// Terminal console with line editing and in-session history.
pub struct ReadlineConsole {
    editor: Editor<CliHelper, DefaultHistory>,
    thinking: bool,
}

impl ReadlineConsole {
    pub fn new() -> rustyline::Result<Self> {
        let mut editor = Editor::new()?;
        editor.set_helper(Some(CliHelper));
        Ok(Self {
            editor,
            thinking: false,
        })
    }
}

fn render_prompt(prompt: Prompt<'_>) -> String {
    match prompt {
        Prompt::Command { location } => format!("{} > ", location.green()),
        Prompt::Confirm { command } => format!("{} [Enter] ", format!("→ {command}").yellow()),
        Prompt::Question { text } => format!("{} ", text.yellow()),
    }
}

impl Console for ReadlineConsole {
    fn read_line(&mut self, prompt: Prompt<'_>) -> InputEvent {
        match self.editor.readline(&render_prompt(prompt)) {
            Ok(line) => {
                // Only top-level input is worth recalling
                if matches!(prompt, Prompt::Command { .. }) && !line.trim().is_empty() {
                    let _ = self.editor.add_history_entry(line.as_str());
                }
                InputEvent::Line(line)
            }
            Err(ReadlineError::Interrupted) => InputEvent::Interrupted,
            Err(ReadlineError::Eof) => InputEvent::Eof,
            Err(err) => {
                tracing::warn!("Readline failed: {:?}", err);
                eprintln!("{}", format!("Error: {err}").red());
                InputEvent::Eof
            }
        }
    }

    fn print(&mut self, tone: Tone, text: &str) {
        let styled = match tone {
            Tone::Plain => text.normal(),
            Tone::Heading => text.bold(),
            Tone::Accent => text.cyan(),
            Tone::Success => text.green(),
            Tone::Warning => text.yellow(),
            Tone::Error => text.red(),
            Tone::Muted => text.bright_black(),
        };
        println!("{styled}");
    }

    fn write_output(&mut self, output: &CommandOutput) {
        let mut stdout = std::io::stdout().lock();
        let _ = stdout.write_all(output.stdout.as_bytes());
        let _ = stdout.write_all(output.stderr.as_bytes());
        let _ = stdout.flush();
    }

    fn set_thinking(&mut self, active: bool) {
        if active == self.thinking {
            return;
        }
        self.thinking = active;
        let mut stdout = std::io::stdout().lock();
        if active {
            let _ = write!(stdout, "{}", "Thinking...".bright_black());
        } else {
            // Erase the indicator line
            let _ = write!(stdout, "\r\x1b[K");
        }
        let _ = stdout.flush();
    }
}
