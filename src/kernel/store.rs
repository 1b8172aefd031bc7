use tracing::debug;

use super::{Action, AppState, Effect};

mod editor;
mod git;
mod services;
mod tree;
mod workspace;

#[derive(Debug)]
pub struct DispatchResult {
    pub effects: Vec<Effect>,
    pub state_changed: bool,
}

impl DispatchResult {
    pub(crate) fn unchanged() -> Self {
        Self {
            effects: Vec::new(),
            state_changed: false,
        }
    }

    pub(crate) fn changed(state_changed: bool) -> Self {
        Self {
            effects: Vec::new(),
            state_changed,
        }
    }
}

pub type SubscriberId = u64;

type Subscriber = Box<dyn FnMut(&AppState) + Send>;

pub struct Store {
    state: AppState,
    subscribers: Vec<(SubscriberId, Subscriber)>,
    next_subscriber: SubscriberId,
}

impl Store {
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            subscribers: Vec::new(),
            next_subscriber: 1,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Registers an observer called after every dispatch that changed state.
    pub fn subscribe(&mut self, callback: impl FnMut(&AppState) + Send + 'static) -> SubscriberId {
        let id = self.next_subscriber;
        self.next_subscriber += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub, _)| *sub != id);
        self.subscribers.len() != before
    }

    pub fn dispatch(&mut self, action: Action) -> DispatchResult {
        let result = self.reduce(action);
        if result.state_changed {
            for (_, subscriber) in &mut self.subscribers {
                subscriber(&self.state);
            }
        }
        if !result.effects.is_empty() {
            debug!(effects = result.effects.len(), "dispatch produced effects");
        }
        result
    }

    fn reduce(&mut self, action: Action) -> DispatchResult {
        match action {
            action @ (Action::CreateNode { .. }
            | Action::RenameNode { .. }
            | Action::DeleteNode { .. }
            | Action::Undo
            | Action::Redo
            | Action::EditActive { .. }) => self.reduce_tree_action(action),
            action @ (Action::OpenFile { .. }
            | Action::CloseTab { .. }
            | Action::SetActiveTab { .. }) => self.reduce_editor_action(action),
            action @ (Action::CreateWorkspace { .. }
            | Action::RenameWorkspace { .. }
            | Action::SwitchWorkspace { .. }
            | Action::ExportWorkspace
            | Action::ArchiveSaved { .. }
            | Action::ArchiveSaveFailed { .. }) => self.reduce_workspace_action(action),
            action @ (Action::GitStage { .. }
            | Action::GitUnstage { .. }
            | Action::GitCommit { .. }
            | Action::GitPush) => self.reduce_git_action(action),
            action @ (Action::Compile
            | Action::CompileFinished { .. }
            | Action::ConnectWallet
            | Action::WalletConnected(_)
            | Action::WalletConnectFailed(_)
            | Action::Deploy { .. }
            | Action::DeployFinished { .. }
            | Action::ChatSend { .. }
            | Action::ChatReplied { .. }) => self.reduce_service_action(action),
            Action::UpdateSettings(settings) => {
                if self.state.settings == settings {
                    return DispatchResult::unchanged();
                }
                self.state.settings = settings.clone();
                DispatchResult {
                    effects: vec![Effect::SaveSettings(settings)],
                    state_changed: true,
                }
            }
            Action::ProblemsMoveSelection { delta } => {
                DispatchResult::changed(self.state.problems.move_selection(delta))
            }
            Action::ProblemsClickRow { row } => {
                DispatchResult::changed(self.state.problems.click_row(row))
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/store.rs"]
mod tests;
