use tracing::{debug, info};

use crate::kernel::Action;
use crate::models::file_tree::{self, Node, NodeKind, Snapshot};

impl super::Store {
    pub(super) fn reduce_tree_action(&mut self, action: Action) -> super::DispatchResult {
        match action {
            Action::CreateNode { parent, kind, name } => {
                let name = name.trim();
                if name.is_empty() {
                    return super::DispatchResult::unchanged();
                }
                let current = self.state.history.current().clone();
                if !file_tree::find(&current, &parent).is_some_and(Node::is_folder) {
                    return super::DispatchResult::unchanged();
                }

                let node = Node::create(kind, name);
                let id = node.id.clone();
                let next = Snapshot::new(file_tree::insert_child(&current, &parent, node));
                self.state.history.commit(next.clone());
                if kind == NodeKind::File {
                    self.state.editor.open(&next, &id);
                    self.state.git.mark_modified(&id);
                }
                info!(id = %id, parent = %parent, kind = kind.label(), "node created");
                super::DispatchResult::changed(true)
            }
            Action::RenameNode { id, name } => {
                let name = name.trim();
                let current = self.state.history.current().clone();
                if name.is_empty() || file_tree::find(&current, &id).is_none() {
                    return super::DispatchResult::unchanged();
                }

                let next = Snapshot::new(file_tree::rename(&current, &id, name));
                self.state.history.commit(next);
                info!(id = %id, name, "node renamed");
                super::DispatchResult::changed(true)
            }
            Action::DeleteNode { id } => {
                let current = self.state.history.current().clone();
                let Some(target) = file_tree::find(&current, &id) else {
                    return super::DispatchResult::unchanged();
                };

                let removed = file_tree::collect_subtree_ids(target);
                let next = Snapshot::new(file_tree::delete(&current, &id));
                self.state.history.commit(next.clone());
                self.state.editor.close_many(&next, &removed);
                self.state.git.forget(removed.iter());
                info!(id = %id, removed = removed.len(), "node deleted");
                super::DispatchResult::changed(true)
            }
            Action::Undo => {
                if !self.state.history.undo() {
                    return super::DispatchResult::unchanged();
                }
                let current = self.state.history.current().clone();
                self.state.editor.reload_active(&current);
                debug!(cursor = self.state.history.cursor(), "undo");
                super::DispatchResult::changed(true)
            }
            Action::Redo => {
                if !self.state.history.redo() {
                    return super::DispatchResult::unchanged();
                }
                let current = self.state.history.current().clone();
                self.state.editor.reload_active(&current);
                debug!(cursor = self.state.history.cursor(), "redo");
                super::DispatchResult::changed(true)
            }
            Action::EditActive { content } => {
                let Some(active) = self.state.active_file().map(|node| node.id.clone()) else {
                    return super::DispatchResult::unchanged();
                };

                self.state.editor.set_buffer(&content);
                let current = self.state.history.current().clone();
                let next = file_tree::update_content(&current, &active, &content);
                self.state.history.patch_current(Snapshot::new(next));
                self.state.git.mark_modified(&active);
                super::DispatchResult::changed(true)
            }
            _ => super::DispatchResult::unchanged(),
        }
    }
}
