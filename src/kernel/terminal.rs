//! User-facing terminal log and compiler output pane.

use std::collections::VecDeque;

pub type TerminalLineId = u64;

const DEFAULT_SCROLLBACK_LINES: usize = 5000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Info,
    Error,
    Success,
    Command,
}

impl LineKind {
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Info => "",
            Self::Error => "[error] ",
            Self::Success => "[ok] ",
            Self::Command => "$ ",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminalLine {
    pub id: TerminalLineId,
    pub kind: LineKind,
    pub content: String,
}

#[derive(Debug, Clone)]
pub struct TerminalLog {
    lines: VecDeque<TerminalLine>,
    next_id: TerminalLineId,
    scrollback_lines: usize,
    output: Vec<String>,
}

impl Default for TerminalLog {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_SCROLLBACK_LINES)
    }
}

impl TerminalLog {
    pub fn with_capacity(scrollback_lines: usize) -> Self {
        Self {
            lines: VecDeque::new(),
            next_id: 1,
            scrollback_lines: scrollback_lines.max(1),
            output: Vec::new(),
        }
    }

    /// Log seeded with the environment banner.
    pub fn with_banner() -> Self {
        let mut log = Self::default();
        log.info("Initializing Caspier Environment...");
        log.success("Casper Environment Ready.");
        log
    }

    pub fn lines(&self) -> impl Iterator<Item = &TerminalLine> {
        self.lines.iter()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn last(&self) -> Option<&TerminalLine> {
        self.lines.back()
    }

    /// Lines with an id greater than `after`.
    pub fn since(&self, after: TerminalLineId) -> impl Iterator<Item = &TerminalLine> {
        self.lines.iter().filter(move |line| line.id > after)
    }

    pub fn push(&mut self, kind: LineKind, content: impl Into<String>) -> TerminalLineId {
        let id = self.next_id;
        self.next_id += 1;
        self.lines.push_back(TerminalLine {
            id,
            kind,
            content: content.into(),
        });
        while self.lines.len() > self.scrollback_lines {
            self.lines.pop_front();
        }
        id
    }

    pub fn info(&mut self, content: impl Into<String>) -> TerminalLineId {
        self.push(LineKind::Info, content)
    }

    pub fn error(&mut self, content: impl Into<String>) -> TerminalLineId {
        self.push(LineKind::Error, content)
    }

    pub fn success(&mut self, content: impl Into<String>) -> TerminalLineId {
        self.push(LineKind::Success, content)
    }

    pub fn command(&mut self, content: impl Into<String>) -> TerminalLineId {
        self.push(LineKind::Command, content)
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn output(&self) -> &[String] {
        &self.output
    }

    pub fn reset_output(&mut self, lines: impl IntoIterator<Item = String>) {
        self.output = lines.into_iter().collect();
    }

    pub fn push_output(&mut self, line: impl Into<String>) {
        self.output.push(line.into());
    }

    pub fn clear_output(&mut self) {
        self.output.clear();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/terminal.rs"]
mod tests;
