//! Terminal abstraction used by the session loop.

use opsh_core::exec::CommandOutput;

/// Result of reading one line.
///
/// Interrupts are a value, not an error: what they mean depends on which
/// prompt was showing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Line(String),
    /// The user pressed Ctrl-C.
    Interrupted,
    /// The input stream closed.
    Eof,
}

/// What the session is asking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prompt<'a> {
    /// Top-level prompt, labelled with the working directory's name.
    Command { location: &'a str },
    /// A translated command waiting for Enter.
    Confirm { command: &'a str },
    /// Setup and uninstall questions.
    Question { text: &'a str },
}

/// Styling hint for a message line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Plain,
    Heading,
    Accent,
    Success,
    Warning,
    Error,
    Muted,
}

/// Line-oriented terminal used by [`crate::SessionLoop`].
pub trait Console {
    fn read_line(&mut self, prompt: Prompt<'_>) -> InputEvent;

    /// Prints one message line.
    fn print(&mut self, tone: Tone, text: &str);

    /// Writes a command's captured output verbatim, stdout then stderr.
    fn write_output(&mut self, output: &CommandOutput);

    /// Shows or clears the indicator displayed while a translation is pending.
    fn set_thinking(&mut self, _active: bool) {}

    fn blank_line(&mut self) {
        self.print(Tone::Plain, "");
    }
}
