use crate::kernel::services::ports::{
    ContractMetadata, EntryPoint, Network, ProjectSettings, WalletAccount,
};
use crate::models::file_tree::{self, Node, NodeId, Snapshot};
use crate::models::TreeHistory;

use super::chat::ChatState;
use super::editor::EditorSession;
use super::git::GitState;
use super::problems::ProblemsState;
use super::terminal::TerminalLog;
use super::workspace::{default_open_file, default_tree, WorkspaceRegistry, DEFAULT_WORKSPACE};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalletState {
    pub account: Option<WalletAccount>,
    pub connecting: bool,
}

/// Output of the last successful compile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildArtifact {
    pub file_id: NodeId,
    pub contract_name: String,
    pub wasm: Vec<u8>,
    pub metadata: ContractMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentRecord {
    pub id: String,
    pub name: String,
    pub deploy_hash: String,
    pub contract_hash: Option<String>,
    pub network: Network,
    pub timestamp_ms: u64,
    pub entry_points: Vec<EntryPoint>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingCompile {
    pub request_id: u64,
    pub file_id: NodeId,
    pub file_name: String,
}

#[derive(Debug, Clone, Default)]
pub struct BuildState {
    pub pending_compile: Option<PendingCompile>,
    pub artifact: Option<BuildArtifact>,
    pub pending_deploy: Option<PendingDeploy>,
    pub deployments: Vec<DeploymentRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDeploy {
    pub request_id: u64,
    pub contract_name: String,
    pub network: Network,
    pub entry_points: Vec<EntryPoint>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusSnapshot {
    pub workspace: String,
    pub branch: String,
    pub problems: usize,
    pub language: Option<String>,
    pub can_undo: bool,
    pub can_redo: bool,
}

#[derive(Debug)]
pub struct AppState {
    pub workspaces: WorkspaceRegistry,
    pub history: TreeHistory,
    pub editor: EditorSession,
    pub git: GitState,
    pub problems: ProblemsState,
    pub terminal: TerminalLog,
    pub chat: ChatState,
    pub settings: ProjectSettings,
    pub wallet: WalletState,
    pub build: BuildState,
    next_request_id: u64,
}

impl AppState {
    /// Default workspace with the sample contract open.
    pub fn new(settings: ProjectSettings) -> Self {
        let mut state = Self::with_tree(DEFAULT_WORKSPACE, default_tree(), settings);
        let tree = state.history.current().clone();
        state.editor.open(&tree, &default_open_file());
        state.terminal = TerminalLog::with_banner();
        state
    }

    /// A single workspace holding `tree`, nothing open.
    pub fn with_tree(name: &str, tree: Vec<Node>, settings: ProjectSettings) -> Self {
        let snapshot = Snapshot::new(tree);
        Self {
            workspaces: WorkspaceRegistry::new(name, snapshot.clone()),
            history: TreeHistory::new(snapshot),
            editor: EditorSession::default(),
            git: GitState::default(),
            problems: ProblemsState::default(),
            terminal: TerminalLog::default(),
            chat: ChatState::default(),
            settings,
            wallet: WalletState::default(),
            build: BuildState::default(),
            next_request_id: 1,
        }
    }

    pub fn current_tree(&self) -> &Snapshot {
        self.history.current()
    }

    pub fn active_file(&self) -> Option<&Node> {
        let id = self.editor.active()?;
        file_tree::find(self.current_tree(), id).filter(|node| node.is_file())
    }

    pub fn status(&self) -> StatusSnapshot {
        StatusSnapshot {
            workspace: self.workspaces.active().to_string(),
            branch: self.git.branch().to_string(),
            problems: self.problems.counts().total(),
            language: self
                .active_file()
                .map(|_| self.editor.language().to_string()),
            can_undo: self.history.can_undo(),
            can_redo: self.history.can_redo(),
        }
    }

    pub(crate) fn next_request_id(&mut self) -> u64 {
        let id = self.next_request_id;
        self.next_request_id += 1;
        id
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/state.rs"]
mod tests;
