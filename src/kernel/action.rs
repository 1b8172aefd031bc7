use std::path::PathBuf;

use crate::kernel::services::ports::{
    AssistantError, CompileOutput, DeployOutcome, ProjectSettings, ServiceError, WalletAccount,
    WalletError,
};
use crate::models::{NodeId, NodeKind};

#[derive(Debug, Clone)]
pub enum Action {
    // Tree
    CreateNode {
        parent: NodeId,
        kind: NodeKind,
        name: String,
    },
    RenameNode {
        id: NodeId,
        name: String,
    },
    DeleteNode {
        id: NodeId,
    },
    Undo,
    Redo,

    // Editor
    OpenFile {
        id: NodeId,
    },
    CloseTab {
        id: NodeId,
    },
    SetActiveTab {
        id: Option<NodeId>,
    },
    EditActive {
        content: String,
    },

    // Workspaces
    CreateWorkspace {
        name: String,
    },
    RenameWorkspace {
        from: String,
        to: String,
    },
    SwitchWorkspace {
        name: String,
    },
    ExportWorkspace,
    ArchiveSaved {
        path: PathBuf,
    },
    ArchiveSaveFailed {
        message: String,
    },

    // Version control
    GitStage {
        id: NodeId,
    },
    GitUnstage {
        id: NodeId,
    },
    GitCommit {
        message: String,
    },
    GitPush,

    // External services
    Compile,
    CompileFinished {
        request_id: u64,
        result: Result<CompileOutput, ServiceError>,
    },
    ConnectWallet,
    WalletConnected(WalletAccount),
    WalletConnectFailed(WalletError),
    Deploy {
        args: Vec<(String, String)>,
        payment_amount: Option<u64>,
    },
    DeployFinished {
        request_id: u64,
        outcome: DeployOutcome,
    },
    ChatSend {
        text: String,
    },
    ChatReplied {
        request_id: u64,
        result: Result<String, AssistantError>,
    },

    // Settings / views
    UpdateSettings(ProjectSettings),
    ProblemsMoveSelection {
        delta: isize,
    },
    ProblemsClickRow {
        row: usize,
    },
}
