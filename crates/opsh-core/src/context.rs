//! Bounded command context.
//!
//! Recent commands and their (truncated) output are kept so the translator can
//! resolve requests like "do that again" or "delete the file I just created".

use std::collections::VecDeque;

/// Maximum number of retained entries.
pub const MAX_HISTORY_ENTRIES: usize = 10;
/// Maximum total characters (commands + outputs) retained.
pub const MAX_CONTEXT_CHARS: usize = 4000;
/// Output is truncated to this many characters when recorded.
pub const MAX_OUTPUT_CHARS: usize = 500;
/// Number of most recent entries rendered into a snapshot.
pub const SNAPSHOT_ENTRIES: usize = 5;
/// Output lines rendered per snapshot entry.
pub const SNAPSHOT_OUTPUT_LINES: usize = 2;
/// Snapshot text for an empty buffer.
pub const EMPTY_CONTEXT_SENTINEL: &str = "No previous commands.";

/// One executed command and its captured output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub command: String,
    pub output: String,
}

impl HistoryEntry {
    fn new(command: &str, output: &str) -> Self {
        Self {
            command: command.to_string(),
            output: output.chars().take(MAX_OUTPUT_CHARS).collect(),
        }
    }

    /// Characters this entry contributes to the context budget.
    pub fn char_mass(&self) -> usize {
        self.command.chars().count() + self.output.chars().count()
    }
}

/// Oldest-first log of executed commands, capped by entry count and size.
#[derive(Debug, Clone, Default)]
pub struct ContextBuffer {
    entries: VecDeque<HistoryEntry>,
}

impl ContextBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a command and its output, then evicts the oldest entries.
    ///
    /// The entry cap is always enforced. The size cap stops evicting once a
    /// single entry remains, so an oversized command is still remembered.
    pub fn append(&mut self, command: &str, output: &str) {
        self.entries.push_back(HistoryEntry::new(command, output));

        while self.entries.len() > MAX_HISTORY_ENTRIES {
            self.entries.pop_front();
        }
        while self.char_mass() > MAX_CONTEXT_CHARS && self.entries.len() > 1 {
            self.entries.pop_front();
        }
    }

    /// Renders the most recent entries for inclusion in a prompt.
    ///
    /// ```text
    /// 1. $ ls
    ///    a.txt
    ///    b.txt
    /// ```
    pub fn snapshot(&self) -> String {
        if self.entries.is_empty() {
            return EMPTY_CONTEXT_SENTINEL.to_string();
        }

        let skip = self.entries.len().saturating_sub(SNAPSHOT_ENTRIES);
        let mut lines = Vec::new();
        for (index, entry) in self.entries.iter().skip(skip).enumerate() {
            lines.push(format!("{}. $ {}", index + 1, entry.command));
            let output = entry.output.trim();
            if !output.is_empty() {
                for line in output.lines().take(SNAPSHOT_OUTPUT_LINES) {
                    lines.push(format!("   {line}"));
                }
            }
        }
        lines.join("\n")
    }

    /// Total characters currently retained.
    pub fn char_mass(&self) -> usize {
        self.entries.iter().map(HistoryEntry::char_mass).sum()
    }

    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&HistoryEntry> {
        self.entries.back()
    }
}
