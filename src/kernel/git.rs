use rustc_hash::{FxHashSet, FxHasher};
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::models::{next_sequence, NodeId};

pub const DEFAULT_BRANCH: &str = "main";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitError {
    EmptyMessage,
}

impl fmt::Display for GitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GitError::EmptyMessage => write!(f, "commit message must not be empty"),
        }
    }
}

impl std::error::Error for GitError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GitFileStatusKind {
    Modified,
    Staged,
}

impl GitFileStatusKind {
    pub fn marker(self) -> char {
        match self {
            Self::Modified => 'M',
            Self::Staged => 'A',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    pub id: String,
    pub message: String,
    pub timestamp_ms: u64,
    /// Six hex digits.
    pub hash: String,
    pub branch: String,
    pub parents: Vec<String>,
}

/// Modified/staged id sets plus an append-only commit log (newest first).
///
/// Not rolled back by tree undo/redo.
#[derive(Debug, Clone)]
pub struct GitState {
    modified: FxHashSet<NodeId>,
    staged: FxHashSet<NodeId>,
    commits: Vec<CommitRecord>,
    branch: String,
}

impl Default for GitState {
    fn default() -> Self {
        Self {
            modified: FxHashSet::default(),
            staged: FxHashSet::default(),
            commits: Vec::new(),
            branch: DEFAULT_BRANCH.to_string(),
        }
    }
}

impl GitState {
    pub fn modified(&self) -> &FxHashSet<NodeId> {
        &self.modified
    }

    pub fn staged(&self) -> &FxHashSet<NodeId> {
        &self.staged
    }

    pub fn commits(&self) -> &[CommitRecord] {
        &self.commits
    }

    pub fn branch(&self) -> &str {
        &self.branch
    }

    pub fn head(&self) -> Option<&CommitRecord> {
        self.commits.first()
    }

    pub fn status(&self, id: &NodeId) -> Option<GitFileStatusKind> {
        if self.staged.contains(id) {
            Some(GitFileStatusKind::Staged)
        } else if self.modified.contains(id) {
            Some(GitFileStatusKind::Modified)
        } else {
            None
        }
    }

    /// No-op when the id is already tracked in either set.
    pub fn mark_modified(&mut self, id: &NodeId) -> bool {
        if self.staged.contains(id) || self.modified.contains(id) {
            return false;
        }
        self.modified.insert(id.clone())
    }

    pub fn stage(&mut self, id: &NodeId) -> bool {
        if !self.modified.remove(id) {
            return false;
        }
        self.staged.insert(id.clone())
    }

    pub fn unstage(&mut self, id: &NodeId) -> bool {
        if !self.staged.remove(id) {
            return false;
        }
        self.modified.insert(id.clone())
    }

    pub fn forget<'a>(&mut self, ids: impl IntoIterator<Item = &'a NodeId>) -> bool {
        let mut changed = false;
        for id in ids {
            changed |= self.modified.remove(id);
            changed |= self.staged.remove(id);
        }
        changed
    }

    pub fn commit(&mut self, message: &str, now_ms: u64) -> Result<CommitRecord, GitError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(GitError::EmptyMessage);
        }

        let seq = next_sequence();
        let parents: Vec<String> = self.head().map(|h| h.id.clone()).into_iter().collect();
        let record = CommitRecord {
            id: format!("c-{}-{}", now_ms, seq),
            message: message.to_string(),
            timestamp_ms: now_ms,
            hash: short_hash(message, now_ms, parents.first().map(String::as_str), seq),
            branch: self.branch.clone(),
            parents,
        };
        self.staged.clear();
        self.commits.insert(0, record.clone());
        Ok(record)
    }

    /// Back to an empty `main` branch with nothing tracked.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

fn short_hash(message: &str, now_ms: u64, parent: Option<&str>, seq: u64) -> String {
    let mut hasher = FxHasher::default();
    message.hash(&mut hasher);
    now_ms.hash(&mut hasher);
    parent.hash(&mut hasher);
    seq.hash(&mut hasher);
    format!("{:06x}", hasher.finish() & 0xff_ffff)
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/git.rs"]
mod tests;
