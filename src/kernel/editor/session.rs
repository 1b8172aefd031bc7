use compact_str::CompactString;
use rustc_hash::FxHashSet;

use crate::models::file_tree::{self, Node, NodeId};

/// Open tabs, the active file and the live buffer bound to it.
///
/// `active` is always a member of `open` or `None`; `open` never holds duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditorSession {
    open: Vec<NodeId>,
    active: Option<NodeId>,
    buffer: String,
    language: CompactString,
}

impl EditorSession {
    pub fn open_ids(&self) -> &[NodeId] {
        &self.open
    }

    pub fn active(&self) -> Option<&NodeId> {
        self.active.as_ref()
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn is_open(&self, id: &NodeId) -> bool {
        self.open.contains(id)
    }

    /// Opens `id` if it resolves to a file and makes it active.
    pub fn open(&mut self, tree: &[Node], id: &NodeId) -> bool {
        if !file_tree::find(tree, id).is_some_and(Node::is_file) {
            return false;
        }
        if !self.is_open(id) {
            self.open.push(id.clone());
        }
        if self.active.as_ref() == Some(id) {
            return false;
        }
        self.active = Some(id.clone());
        self.reload_active(tree);
        true
    }

    pub fn close(&mut self, tree: &[Node], id: &NodeId) -> bool {
        let Some(index) = self.open.iter().position(|open| open == id) else {
            return false;
        };
        self.open.remove(index);
        if self.active.as_ref() == Some(id) {
            self.active = self.open.last().cloned();
            self.reload_active(tree);
        }
        true
    }

    /// Closes every tab in `ids`; the active tab falls back to the last survivor.
    pub fn close_many(&mut self, tree: &[Node], ids: &FxHashSet<NodeId>) -> bool {
        let before = self.open.len();
        self.open.retain(|id| !ids.contains(id));
        if self.open.len() == before {
            return false;
        }
        if self.active.as_ref().is_some_and(|active| ids.contains(active)) {
            self.active = self.open.last().cloned();
            self.reload_active(tree);
        }
        true
    }

    /// Activates an already open tab; `None` clears the selection.
    pub fn set_active(&mut self, tree: &[Node], id: Option<&NodeId>) -> bool {
        if let Some(id) = id {
            if !self.is_open(id) {
                return false;
            }
        }
        if self.active.as_ref() == id {
            return false;
        }
        self.active = id.cloned();
        self.reload_active(tree);
        true
    }

    /// Re-reads buffer and language from `tree`. Leaves them untouched when the
    /// active id no longer resolves to a file.
    pub fn reload_active(&mut self, tree: &[Node]) {
        let Some(active) = self.active.as_ref() else {
            self.buffer.clear();
            self.language = CompactString::default();
            return;
        };
        if let Some(node) = file_tree::find(tree, active).filter(|n| n.is_file()) {
            self.buffer = node.content().unwrap_or_default().to_string();
            self.language = CompactString::new(node.language().unwrap_or("plaintext"));
        }
    }

    pub fn set_buffer(&mut self, content: &str) {
        self.buffer.clear();
        self.buffer.push_str(content);
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/kernel/editor/session.rs"]
mod tests;
