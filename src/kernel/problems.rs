use crate::kernel::services::ports::{CompileDiagnostic, DiagnosticSeverity};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProblemSeverity {
    Error,
    Warning,
    Information,
}

impl ProblemSeverity {
    pub fn label(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Information => "info",
        }
    }
}

impl From<DiagnosticSeverity> for ProblemSeverity {
    fn from(value: DiagnosticSeverity) -> Self {
        match value {
            DiagnosticSeverity::Error => Self::Error,
            DiagnosticSeverity::Warning => Self::Warning,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProblemItem {
    pub id: u64,
    pub file: String,
    pub message: String,
    pub severity: ProblemSeverity,
    pub line: Option<u32>,
    pub column: Option<u32>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProblemCounts {
    pub errors: usize,
    pub warnings: usize,
    pub infos: usize,
}

impl ProblemCounts {
    pub fn total(&self) -> usize {
        self.errors + self.warnings + self.infos
    }
}

#[derive(Debug, Default)]
pub struct ProblemsState {
    items: Vec<ProblemItem>,
    selected_index: usize,
}

impl ProblemsState {
    pub fn items(&self) -> &[ProblemItem] {
        &self.items
    }

    pub fn selected_index(&self) -> usize {
        self.selected_index
    }

    pub fn selected(&self) -> Option<&ProblemItem> {
        self.items.get(self.selected_index)
    }

    pub fn counts(&self) -> ProblemCounts {
        let mut counts = ProblemCounts::default();
        for item in &self.items {
            match item.severity {
                ProblemSeverity::Error => counts.errors += 1,
                ProblemSeverity::Warning => counts.warnings += 1,
                ProblemSeverity::Information => counts.infos += 1,
            }
        }
        counts
    }

    pub fn move_selection(&mut self, delta: isize) -> bool {
        if self.items.is_empty() || delta == 0 {
            return false;
        }

        let prev = self.selected_index;
        let len = self.items.len();

        if delta < 0 {
            if self.selected_index > 0 {
                self.selected_index -= 1;
            } else {
                self.selected_index = len - 1;
            }
        } else if self.selected_index + 1 < len {
            self.selected_index += 1;
        } else {
            self.selected_index = 0;
        }

        self.selected_index != prev
    }

    pub fn click_row(&mut self, row: usize) -> bool {
        if row >= self.items.len() || self.selected_index == row {
            return false;
        }
        self.selected_index = row;
        true
    }

    /// Replaces the list with one item per diagnostic, in diagnostic order.
    pub fn replace_from_diagnostics(&mut self, file: &str, diagnostics: &[CompileDiagnostic]) -> bool {
        let items = diagnostics
            .iter()
            .enumerate()
            .map(|(idx, d)| ProblemItem {
                id: idx as u64 + 1,
                file: file.to_string(),
                message: d.message.clone(),
                severity: d.severity.into(),
                line: d.line,
                column: d.column,
            })
            .collect();
        self.replace(items)
    }

    pub fn replace(&mut self, items: Vec<ProblemItem>) -> bool {
        if self.items == items {
            return false;
        }
        self.items = items;
        self.selected_index = self
            .selected_index
            .min(self.items.len().saturating_sub(1));
        true
    }

    pub fn clear(&mut self) -> bool {
        self.replace(Vec::new())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/problems.rs"]
mod tests;
