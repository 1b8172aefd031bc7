use super::*;
use crate::kernel::chat::MISSING_CREDENTIAL_REPLY;
use crate::kernel::services::adapters::compile_source;
use crate::kernel::services::ports::{
    AssistantError, ChatRole, CompileRequest, DeployOutcome, DeployReceipt, ProjectSettings,
    RuntimeArgValue, ServiceError, WalletAccount, WalletError, DEFAULT_PAYMENT_MOTES,
};
use crate::kernel::terminal::LineKind;
use crate::kernel::workspace::{seed_tree, DEFAULT_WORKSPACE, SAMPLE_CONTRACT};
use crate::models::file_tree::{find, find_file_by_name};
use crate::models::{NodeId, NodeKind};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn new_store() -> Store {
    Store::new(AppState::new(ProjectSettings::default()))
}

fn main_rs() -> NodeId {
    NodeId::from("main.rs")
}

fn last_line(store: &Store) -> (LineKind, String) {
    let line = store.state().terminal.last().expect("terminal line");
    (line.kind, line.content.clone())
}

fn content_of(store: &Store, id: &NodeId) -> String {
    find(store.state().current_tree(), id)
        .and_then(|node| node.content())
        .unwrap_or_default()
        .to_string()
}

fn compile_request(store: &mut Store) -> CompileRequest {
    let result = store.dispatch(Action::Compile);
    match result.effects.as_slice() {
        [Effect::Compile(request)] => request.clone(),
        other => panic!("expected one compile effect, got {:?}", other),
    }
}

fn compile_and_finish(store: &mut Store) {
    let request = compile_request(store);
    let output = compile_source(&request);
    store.dispatch(Action::CompileFinished {
        request_id: request.request_id,
        result: Ok(output),
    });
}

fn connect(store: &mut Store, public_key: &str) {
    store.dispatch(Action::ConnectWallet);
    store.dispatch(Action::WalletConnected(WalletAccount {
        public_key: public_key.to_string(),
    }));
}

#[test]
fn test_initial_state() {
    let store = new_store();
    let state = store.state();
    assert_eq!(state.workspaces.active(), DEFAULT_WORKSPACE);
    assert_eq!(state.editor.active(), Some(&main_rs()));
    assert_eq!(state.editor.buffer(), SAMPLE_CONTRACT);
    assert_eq!(state.editor.language(), "rust");
    assert_eq!(state.history.len(), 1);
    assert_eq!(state.terminal.len(), 2);
    assert_eq!(state.chat.messages().len(), 1);
}

#[test]
fn test_create_file_commits_opens_and_marks_modified() {
    let mut store = new_store();
    let result = store.dispatch(Action::CreateNode {
        parent: NodeId::from("src"),
        kind: NodeKind::File,
        name: "  lib.rs ".to_string(),
    });
    assert!(result.state_changed);
    assert!(result.effects.is_empty());

    let state = store.state();
    assert_eq!(state.history.len(), 2);
    let active = state.editor.active().cloned().unwrap();
    assert!(active.as_str().starts_with("lib.rs-"));
    let node = find(state.current_tree(), &active).unwrap();
    assert_eq!(node.name, "lib.rs");
    assert_eq!(node.content(), Some(""));
    assert_eq!(state.editor.language(), "rust");
    assert!(state.git.modified().contains(&active));
    assert_eq!(state.editor.open_ids().len(), 2);
}

#[test]
fn test_create_folder_does_not_open_or_track() {
    let mut store = new_store();
    store.dispatch(Action::CreateNode {
        parent: NodeId::from("root"),
        kind: NodeKind::Folder,
        name: "scripts".to_string(),
    });
    let state = store.state();
    assert_eq!(state.history.len(), 2);
    assert_eq!(state.editor.active(), Some(&main_rs()));
    assert!(state.git.modified().is_empty());
    assert!(find_file_by_name(state.current_tree(), "scripts").is_none());
}

#[test]
fn test_create_rejects_blank_name_and_file_parent() {
    let mut store = new_store();
    let blank = store.dispatch(Action::CreateNode {
        parent: NodeId::from("src"),
        kind: NodeKind::File,
        name: "   ".to_string(),
    });
    let under_file = store.dispatch(Action::CreateNode {
        parent: main_rs(),
        kind: NodeKind::File,
        name: "x.rs".to_string(),
    });
    let missing_parent = store.dispatch(Action::CreateNode {
        parent: NodeId::from("nope"),
        kind: NodeKind::Folder,
        name: "x".to_string(),
    });
    assert!(!blank.state_changed);
    assert!(!under_file.state_changed);
    assert!(!missing_parent.state_changed);
    assert_eq!(store.state().history.len(), 1);
}

#[test]
fn test_rename_commits_once_and_ignores_unknown_ids() {
    let mut store = new_store();
    assert!(store
        .dispatch(Action::RenameNode {
            id: main_rs(),
            name: "contract.rs".to_string(),
        })
        .state_changed);
    assert_eq!(store.state().history.len(), 2);
    let node = find(store.state().current_tree(), &main_rs()).unwrap();
    assert_eq!(node.name, "contract.rs");

    let missing = store.dispatch(Action::RenameNode {
        id: NodeId::from("ghost"),
        name: "x".to_string(),
    });
    assert!(!missing.state_changed);
    assert_eq!(store.state().history.len(), 2);
}

#[test]
fn test_delete_closes_subtree_tabs_and_forgets_git_state() {
    let mut store = new_store();
    store.dispatch(Action::EditActive {
        content: "changed".to_string(),
    });
    store.dispatch(Action::OpenFile {
        id: NodeId::from("README.txt"),
    });
    store.dispatch(Action::SetActiveTab {
        id: Some(main_rs()),
    });
    assert!(store.state().git.modified().contains(&main_rs()));

    store.dispatch(Action::DeleteNode {
        id: NodeId::from("contract"),
    });
    let state = store.state();
    assert!(find(state.current_tree(), &main_rs()).is_none());
    assert_eq!(state.editor.open_ids(), &[NodeId::from("README.txt")]);
    assert_eq!(state.editor.active(), Some(&NodeId::from("README.txt")));
    assert!(state.editor.buffer().starts_with("Welcome to Caspier."));
    assert!(state.git.modified().is_empty());
    assert_eq!(state.history.len(), 2);

    let missing = store.dispatch(Action::DeleteNode {
        id: NodeId::from("contract"),
    });
    assert!(!missing.state_changed);
}

#[test]
fn test_edit_patches_current_entry_without_history() {
    let mut store = new_store();
    store.dispatch(Action::EditActive {
        content: "v1".to_string(),
    });
    assert_eq!(store.state().history.len(), 1);
    assert_eq!(store.state().editor.buffer(), "v1");
    assert_eq!(content_of(&store, &main_rs()), "v1");
    assert!(!store.state().history.can_undo());
}

#[test]
fn test_edit_without_active_file_is_noop() {
    let mut store = Store::new(AppState::with_tree(
        "demo",
        seed_tree("demo"),
        ProjectSettings::default(),
    ));
    let result = store.dispatch(Action::EditActive {
        content: "x".to_string(),
    });
    assert!(!result.state_changed);
    assert!(store.state().git.modified().is_empty());
}

#[test]
fn test_edit_ignored_when_active_file_was_undone() {
    let mut store = new_store();
    store.dispatch(Action::CreateNode {
        parent: NodeId::from("src"),
        kind: NodeKind::File,
        name: "x.rs".to_string(),
    });
    let created = store.state().editor.active().cloned().unwrap();
    store.dispatch(Action::Undo);
    assert!(find(store.state().current_tree(), &created).is_none());
    assert_eq!(store.state().editor.active(), Some(&created));

    let before = store.state().current_tree().clone();
    let result = store.dispatch(Action::EditActive {
        content: "typed".to_string(),
    });
    assert!(!result.state_changed);
    assert_eq!(store.state().editor.buffer(), "");
    assert_eq!(store.state().current_tree(), &before);

    store.dispatch(Action::Redo);
    assert_eq!(content_of(&store, &created), "");
    assert_eq!(store.state().editor.buffer(), "");
}

#[test]
fn test_undo_redo_reload_active_buffer() {
    let mut store = new_store();
    store.dispatch(Action::EditActive {
        content: "v1".to_string(),
    });
    store.dispatch(Action::CreateNode {
        parent: NodeId::from("root"),
        kind: NodeKind::Folder,
        name: "docs".to_string(),
    });
    store.dispatch(Action::EditActive {
        content: "v2".to_string(),
    });

    assert!(store.dispatch(Action::Undo).state_changed);
    assert_eq!(store.state().editor.buffer(), "v1");
    assert!(!store.dispatch(Action::Undo).state_changed);

    assert!(store.dispatch(Action::Redo).state_changed);
    assert_eq!(store.state().editor.buffer(), "v2");
    assert!(!store.dispatch(Action::Redo).state_changed);
}

#[test]
fn test_undo_after_delete_keeps_tabs_pruned() {
    let mut store = new_store();
    store.dispatch(Action::DeleteNode { id: main_rs() });
    assert!(store.state().editor.active().is_none());

    store.dispatch(Action::Undo);
    let state = store.state();
    assert!(find(state.current_tree(), &main_rs()).is_some());
    assert!(state.editor.open_ids().is_empty());
}

#[test]
fn test_open_close_tabs() {
    let mut store = new_store();
    assert!(!store.dispatch(Action::OpenFile { id: main_rs() }).state_changed);
    assert!(!store
        .dispatch(Action::OpenFile {
            id: NodeId::from("src"),
        })
        .state_changed);

    assert!(store
        .dispatch(Action::OpenFile {
            id: NodeId::from("Cargo.toml"),
        })
        .state_changed);
    assert_eq!(store.state().editor.language(), "toml");

    store.dispatch(Action::CloseTab {
        id: NodeId::from("Cargo.toml"),
    });
    assert_eq!(store.state().editor.active(), Some(&main_rs()));
    assert_eq!(store.state().editor.buffer(), SAMPLE_CONTRACT);
}

#[test]
fn test_create_workspace_switches_and_resets_session() {
    let mut store = new_store();
    store.dispatch(Action::EditActive {
        content: "edited".to_string(),
    });
    store.dispatch(Action::GitStage { id: main_rs() });
    store.dispatch(Action::GitCommit {
        message: "first".to_string(),
    });

    let result = store.dispatch(Action::CreateWorkspace {
        name: "demo".to_string(),
    });
    assert!(result.state_changed);
    let state = store.state();
    assert_eq!(state.workspaces.active(), "demo");
    assert_eq!(state.current_tree().nodes(), seed_tree("demo").as_slice());
    assert_eq!(state.history.len(), 1);
    assert!(state.editor.active().is_none());
    assert!(state.editor.open_ids().is_empty());
    assert!(state.git.commits().is_empty());
    assert_eq!(
        last_line(&store),
        (
            LineKind::Success,
            "Created and switched to workspace: demo".to_string()
        )
    );

    // outgoing workspace kept its edit
    let stored = store.state().workspaces.snapshot(DEFAULT_WORKSPACE).unwrap();
    assert_eq!(
        find(stored, &main_rs()).and_then(|n| n.content()),
        Some("edited")
    );
}

#[test]
fn test_create_workspace_duplicate_reports_error() {
    let mut store = new_store();
    let before = store.state().current_tree().clone();
    let result = store.dispatch(Action::CreateWorkspace {
        name: DEFAULT_WORKSPACE.to_string(),
    });
    assert!(result.state_changed);
    assert_eq!(store.state().workspaces.len(), 1);
    assert_eq!(store.state().current_tree(), &before);
    assert_eq!(
        last_line(&store),
        (
            LineKind::Error,
            format!("workspace '{}' already exists", DEFAULT_WORKSPACE)
        )
    );
}

#[test]
fn test_switch_round_trip_preserves_edits() {
    let mut store = new_store();
    store.dispatch(Action::CreateWorkspace {
        name: "demo".to_string(),
    });
    let readme = NodeId::from("README.md");
    store.dispatch(Action::OpenFile { id: readme.clone() });
    store.dispatch(Action::EditActive {
        content: "notes".to_string(),
    });

    store.dispatch(Action::SwitchWorkspace {
        name: DEFAULT_WORKSPACE.to_string(),
    });
    assert_eq!(content_of(&store, &main_rs()), SAMPLE_CONTRACT);
    assert_eq!(
        last_line(&store),
        (
            LineKind::Info,
            format!("Switched to workspace: {}", DEFAULT_WORKSPACE)
        )
    );

    store.dispatch(Action::SwitchWorkspace {
        name: "demo".to_string(),
    });
    assert_eq!(content_of(&store, &readme), "notes");
    assert_eq!(store.state().history.len(), 1);
}

#[test]
fn test_switch_to_same_or_unknown_is_noop() {
    let mut store = new_store();
    let same = store.dispatch(Action::SwitchWorkspace {
        name: DEFAULT_WORKSPACE.to_string(),
    });
    let unknown = store.dispatch(Action::SwitchWorkspace {
        name: "nope".to_string(),
    });
    assert!(!same.state_changed);
    assert!(!unknown.state_changed);
    assert_eq!(store.state().editor.active(), Some(&main_rs()));
}

#[test]
fn test_rename_active_workspace() {
    let mut store = new_store();
    store.dispatch(Action::EditActive {
        content: "kept".to_string(),
    });
    store.dispatch(Action::CreateNode {
        parent: NodeId::from("root"),
        kind: NodeKind::Folder,
        name: "docs".to_string(),
    });

    store.dispatch(Action::RenameWorkspace {
        from: DEFAULT_WORKSPACE.to_string(),
        to: "project".to_string(),
    });
    let state = store.state();
    assert_eq!(state.workspaces.active(), "project");
    assert!(!state.workspaces.contains(DEFAULT_WORKSPACE));
    assert_eq!(state.current_tree()[0].name, "project");
    assert_eq!(state.history.len(), 1);
    assert_eq!(state.editor.buffer(), "kept");
    assert_eq!(
        last_line(&store),
        (LineKind::Success, "Renamed workspace to: project".to_string())
    );

    let unchanged = store.dispatch(Action::RenameWorkspace {
        from: "project".to_string(),
        to: "project".to_string(),
    });
    assert!(!unchanged.state_changed);
}

#[test]
fn test_git_stage_commit_cycle() {
    let mut store = new_store();
    assert!(!store.dispatch(Action::GitStage { id: main_rs() }).state_changed);

    store.dispatch(Action::EditActive {
        content: "x".to_string(),
    });
    assert!(store.dispatch(Action::GitStage { id: main_rs() }).state_changed);
    assert!(store.state().git.staged().contains(&main_rs()));
    assert!(!store.state().git.modified().contains(&main_rs()));

    store.dispatch(Action::EditActive {
        content: "y".to_string(),
    });
    assert!(store.state().git.staged().contains(&main_rs()));
    assert!(!store.state().git.modified().contains(&main_rs()));

    store.dispatch(Action::GitCommit {
        message: "  initial  ".to_string(),
    });
    let state = store.state();
    assert_eq!(state.git.commits().len(), 1);
    assert_eq!(state.git.commits()[0].message, "initial");
    assert!(state.git.staged().is_empty());
    assert_eq!(
        last_line(&store),
        (LineKind::Success, "Committed: initial".to_string())
    );

    store.dispatch(Action::GitCommit {
        message: " ".to_string(),
    });
    assert_eq!(store.state().git.commits().len(), 1);
    assert_eq!(last_line(&store).0, LineKind::Error);
}

#[test]
fn test_git_push_reports_progress_and_success() {
    let mut store = new_store();
    let before = store.state().terminal.len();
    assert!(store.dispatch(Action::GitPush).state_changed);

    let lines: Vec<_> = store
        .state()
        .terminal
        .lines()
        .skip(before)
        .map(|line| (line.kind, line.content.clone()))
        .collect();
    assert_eq!(
        lines,
        vec![
            (LineKind::Info, "Pushing to origin/main...".to_string()),
            (LineKind::Success, "Push successful.".to_string()),
        ]
    );
    assert!(store.state().git.commits().is_empty());
}

#[test]
fn test_compile_emits_request_and_resets_output() {
    let mut store = new_store();
    let request = compile_request(&mut store);
    assert_eq!(request.file_id, main_rs());
    assert_eq!(request.language, "rust");
    assert_eq!(request.source, SAMPLE_CONTRACT);
    assert!(request.optimize);

    let state = store.state();
    assert_eq!(
        state.terminal.output(),
        &[
            "> Compiling main.rs...".to_string(),
            "> Optimization: Enabled".to_string(),
            "> Compiler starting...".to_string(),
        ]
    );
    assert_eq!(
        last_line(&store),
        (
            LineKind::Command,
            "cargo build --release -p main.rs".to_string()
        )
    );
}

#[test]
fn test_compile_without_active_file_is_noop() {
    let mut store = Store::new(AppState::with_tree(
        "demo",
        seed_tree("demo"),
        ProjectSettings::default(),
    ));
    let result = store.dispatch(Action::Compile);
    assert!(!result.state_changed);
    assert!(result.effects.is_empty());
}

#[test]
fn test_compile_success_stores_artifact() {
    let mut store = new_store();
    compile_and_finish(&mut store);

    let state = store.state();
    let artifact = state.build.artifact.as_ref().unwrap();
    assert_eq!(artifact.contract_name, "main");
    assert_eq!(artifact.file_id, main_rs());
    assert_eq!(artifact.metadata.entry_points[0].name, "call");
    assert!(state.problems.items().is_empty());
    assert!(state.build.pending_compile.is_none());
    assert_eq!(
        state.terminal.output().last().map(String::as_str),
        Some("> Compilation completed successfully.")
    );
    assert_eq!(
        last_line(&store),
        (LineKind::Success, "Compilation successful!".to_string())
    );
}

#[test]
fn test_compile_failure_fills_problems() {
    let mut store = new_store();
    store.dispatch(Action::EditActive {
        content: "fn helper() {}".to_string(),
    });
    compile_and_finish(&mut store);

    let state = store.state();
    assert!(state.build.artifact.is_none());
    let counts = state.problems.counts();
    assert_eq!(counts.errors, 1);
    assert_eq!(counts.warnings, 3);
    assert_eq!(state.problems.items()[0].file, "main.rs");
    assert_eq!(state.status().problems, 4);
    assert_eq!(
        state.terminal.output().last().map(String::as_str),
        Some("Error: Compilation failed with 1 error.")
    );
    assert_eq!(
        last_line(&store),
        (
            LineKind::Error,
            "Compilation failed. See Output and Problems for details.".to_string()
        )
    );
}

#[test]
fn test_compile_transport_failure_becomes_single_problem() {
    let mut store = new_store();
    let request = compile_request(&mut store);
    store.dispatch(Action::CompileFinished {
        request_id: request.request_id,
        result: Err(ServiceError::new("compiler", "backend offline")),
    });
    let items = store.state().problems.items();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].message, "backend offline");
    assert_eq!(last_line(&store).0, LineKind::Error);
}

#[test]
fn test_stale_compile_result_is_ignored() {
    let mut store = new_store();
    let request = compile_request(&mut store);
    let stale = store.dispatch(Action::CompileFinished {
        request_id: request.request_id + 100,
        result: Ok(compile_source(&request)),
    });
    assert!(!stale.state_changed);
    assert!(store.state().build.pending_compile.is_some());

    store.dispatch(Action::CreateWorkspace {
        name: "demo".to_string(),
    });
    let after_switch = store.dispatch(Action::CompileFinished {
        request_id: request.request_id,
        result: Ok(compile_source(&request)),
    });
    assert!(!after_switch.state_changed);
    assert!(store.state().build.artifact.is_none());
}

#[test]
fn test_connect_wallet_lifecycle() {
    let mut store = new_store();
    let first = store.dispatch(Action::ConnectWallet);
    assert!(matches!(first.effects.as_slice(), [Effect::ConnectWallet]));
    let again = store.dispatch(Action::ConnectWallet);
    assert!(!again.state_changed);

    store.dispatch(Action::WalletConnectFailed(WalletError::Cancelled));
    assert!(!store.state().wallet.connecting);
    assert_eq!(
        last_line(&store),
        (LineKind::Info, "Wallet connection cancelled.".to_string())
    );

    connect(&mut store, "01ab");
    assert_eq!(
        store.state().wallet.account.as_ref().map(|a| a.public_key.as_str()),
        Some("01ab")
    );
    assert_eq!(
        last_line(&store),
        (LineKind::Success, "Wallet connected: 01ab".to_string())
    );
}

#[test]
fn test_deploy_preconditions() {
    let mut store = new_store();
    let result = store.dispatch(Action::Deploy {
        args: Vec::new(),
        payment_amount: None,
    });
    assert!(result.effects.is_empty());
    assert_eq!(
        last_line(&store),
        (LineKind::Error, "Please compile the contract first".to_string())
    );

    compile_and_finish(&mut store);
    let result = store.dispatch(Action::Deploy {
        args: Vec::new(),
        payment_amount: None,
    });
    assert!(result.effects.is_empty());
    assert_eq!(
        last_line(&store),
        (LineKind::Error, "Please connect a wallet first".to_string())
    );
}

#[test]
fn test_deploy_builds_typed_request() {
    let mut store = new_store();
    compile_and_finish(&mut store);
    connect(&mut store, "01ab");

    let result = store.dispatch(Action::Deploy {
        args: vec![("message".to_string(), "hello".to_string())],
        payment_amount: None,
    });
    let request = match result.effects.as_slice() {
        [Effect::Deploy(request)] => request.clone(),
        other => panic!("expected deploy effect, got {:?}", other),
    };
    assert_eq!(request.contract_name, "main");
    assert_eq!(request.deploy.chain_name, "casper-test");
    assert_eq!(request.deploy.account.public_key, "01ab");
    assert_eq!(request.deploy.payment_amount, DEFAULT_PAYMENT_MOTES);
    assert_eq!(request.deploy.runtime_args.len(), 1);
    assert_eq!(
        request.deploy.runtime_args[0].value,
        RuntimeArgValue::String("hello".to_string())
    );

    store.dispatch(Action::DeployFinished {
        request_id: request.request_id,
        outcome: DeployOutcome::Deployed(DeployReceipt {
            deploy_hash: "abc123".to_string(),
            contract_hash: None,
        }),
    });
    let state = store.state();
    assert_eq!(state.build.deployments.len(), 1);
    assert_eq!(state.build.deployments[0].name, "main");
    assert_eq!(state.build.deployments[0].deploy_hash, "abc123");
    assert_eq!(
        last_line(&store),
        (LineKind::Success, "Deploy successful! Hash: abc123".to_string())
    );
}

#[test]
fn test_deploy_rejects_undeclared_argument() {
    let mut store = new_store();
    compile_and_finish(&mut store);
    connect(&mut store, "01ab");

    let result = store.dispatch(Action::Deploy {
        args: vec![("amount".to_string(), "10".to_string())],
        payment_amount: Some(1),
    });
    assert!(result.effects.is_empty());
    assert!(store.state().build.pending_deploy.is_none());
    assert_eq!(
        last_line(&store),
        (
            LineKind::Error,
            "Deployment failed: unknown runtime argument 'amount'".to_string()
        )
    );
}

#[test]
fn test_deploy_cancel_and_failure_outcomes() {
    let mut store = new_store();
    compile_and_finish(&mut store);
    connect(&mut store, "01ab");

    let deploy = |store: &mut Store| -> u64 {
        match store
            .dispatch(Action::Deploy {
                args: Vec::new(),
                payment_amount: None,
            })
            .effects
            .as_slice()
        {
            [Effect::Deploy(request)] => request.request_id,
            other => panic!("expected deploy effect, got {:?}", other),
        }
    };

    let id = deploy(&mut store);
    store.dispatch(Action::DeployFinished {
        request_id: id,
        outcome: DeployOutcome::Cancelled,
    });
    assert_eq!(
        last_line(&store),
        (LineKind::Info, "Deploy cancelled by user.".to_string())
    );

    let id = deploy(&mut store);
    store.dispatch(Action::DeployFinished {
        request_id: id,
        outcome: DeployOutcome::Failed("node rejected".to_string()),
    });
    assert_eq!(
        last_line(&store),
        (
            LineKind::Error,
            "Deployment failed: node rejected".to_string()
        )
    );
    assert!(store.state().build.deployments.is_empty());
}

#[test]
fn test_chat_send_builds_context_and_history() {
    let mut store = new_store();
    assert!(!store
        .dispatch(Action::ChatSend {
            text: "   ".to_string(),
        })
        .state_changed);

    let result = store.dispatch(Action::ChatSend {
        text: "check @Cargo.toml please".to_string(),
    });
    let request = match result.effects.as_slice() {
        [Effect::Chat(request)] => request.clone(),
        other => panic!("expected chat effect, got {:?}", other),
    };
    assert!(request
        .context
        .starts_with("Active File (Currently Open):\n#![no_std]"));
    assert!(request
        .context
        .contains("--- START OF FILE Cargo.toml ---\n[package]"));
    assert_eq!(request.history.len(), 1);
    assert_eq!(request.history[0].role, ChatRole::Model);

    let messages = store.state().chat.messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[1].role, ChatRole::User);
    assert_eq!(store.state().chat.pending(), Some(request.request_id));

    let stale = store.dispatch(Action::ChatReplied {
        request_id: request.request_id + 1,
        result: Ok("ignored".to_string()),
    });
    assert!(!stale.state_changed);

    store.dispatch(Action::ChatReplied {
        request_id: request.request_id,
        result: Err(AssistantError::MissingCredential),
    });
    let chat = &store.state().chat;
    assert_eq!(chat.messages().len(), 3);
    assert_eq!(chat.messages()[2].text, MISSING_CREDENTIAL_REPLY);
    assert!(chat.credential_missing());
    assert!(chat.pending().is_none());
}

#[test]
fn test_export_emits_archive_effect() {
    let mut store = new_store();
    let result = store.dispatch(Action::ExportWorkspace);
    match result.effects.as_slice() {
        [Effect::SaveArchive { file_name, bytes }] => {
            assert_eq!(file_name, "default_workspace.zip");
            assert_eq!(&bytes[..2], b"PK");
        }
        other => panic!("expected archive effect, got {:?}", other),
    }
    assert_eq!(last_line(&store).0, LineKind::Success);

    store.dispatch(Action::ArchiveSaveFailed {
        message: "disk full".to_string(),
    });
    assert_eq!(
        last_line(&store),
        (
            LineKind::Error,
            "Failed to save workspace archive: disk full".to_string()
        )
    );
}

#[test]
fn test_update_settings_persists_only_changes() {
    let mut store = new_store();
    let same = store.dispatch(Action::UpdateSettings(ProjectSettings::default()));
    assert!(!same.state_changed);
    assert!(same.effects.is_empty());

    let settings = ProjectSettings {
        enable_optimization: false,
        ..ProjectSettings::default()
    };
    let result = store.dispatch(Action::UpdateSettings(settings.clone()));
    assert!(matches!(
        result.effects.as_slice(),
        [Effect::SaveSettings(saved)] if *saved == settings
    ));

    compile_request(&mut store);
    assert_eq!(
        store.state().terminal.output()[1],
        "> Optimization: Disabled"
    );
}

#[test]
fn test_problem_selection_actions() {
    let mut store = new_store();
    store.dispatch(Action::EditActive {
        content: "fn helper() {}".to_string(),
    });
    compile_and_finish(&mut store);

    assert!(store
        .dispatch(Action::ProblemsMoveSelection { delta: -1 })
        .state_changed);
    assert_eq!(store.state().problems.selected_index(), 3);
    assert!(store
        .dispatch(Action::ProblemsClickRow { row: 1 })
        .state_changed);
    assert!(!store
        .dispatch(Action::ProblemsClickRow { row: 9 })
        .state_changed);
    assert_eq!(store.state().problems.selected_index(), 1);
}

#[test]
fn test_subscribers_see_only_changes() {
    let mut store = new_store();
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&calls);
    let id = store.subscribe(move |_state| {
        seen.fetch_add(1, Ordering::SeqCst);
    });

    store.dispatch(Action::Undo);
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    store.dispatch(Action::EditActive {
        content: "x".to_string(),
    });
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    assert!(store.unsubscribe(id));
    assert!(!store.unsubscribe(id));
    store.dispatch(Action::EditActive {
        content: "y".to_string(),
    });
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}
