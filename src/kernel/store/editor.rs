use crate::kernel::Action;

impl super::Store {
    pub(super) fn reduce_editor_action(&mut self, action: Action) -> super::DispatchResult {
        let tree = self.state.history.current().clone();
        let changed = match action {
            Action::OpenFile { id } => self.state.editor.open(&tree, &id),
            Action::CloseTab { id } => self.state.editor.close(&tree, &id),
            Action::SetActiveTab { id } => self.state.editor.set_active(&tree, id.as_ref()),
            _ => false,
        };
        super::DispatchResult::changed(changed)
    }
}
