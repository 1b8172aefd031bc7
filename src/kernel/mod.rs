//! Headless IDE core (state/action/effect).

pub mod action;
pub mod archive;
pub mod chat;
pub mod editor;
pub mod effect;
pub mod git;
pub mod problems;
pub mod services;
pub mod state;
pub mod store;
pub mod terminal;
pub mod workspace;

pub use action::Action;
pub use archive::{archive_file_name, export_workspace, ArchiveError};
pub use chat::{ChatMessage, ChatState, MessagePart};
pub use editor::EditorSession;
pub use effect::Effect;
pub use git::{CommitRecord, GitError, GitFileStatusKind, GitState};
pub use problems::{ProblemCounts, ProblemItem, ProblemSeverity, ProblemsState};
pub use state::{AppState, BuildArtifact, DeploymentRecord, StatusSnapshot, WalletState};
pub use store::{DispatchResult, Store, SubscriberId};
pub use terminal::{LineKind, TerminalLine, TerminalLog};
pub use workspace::{WorkspaceError, WorkspaceRegistry, DEFAULT_WORKSPACE};
