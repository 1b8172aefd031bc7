use tracing::{error, info, warn};

use crate::kernel::archive::{archive_file_name, export_workspace};
use crate::kernel::{Action, Effect};
use crate::models::Snapshot;

impl super::Store {
    pub(super) fn reduce_workspace_action(&mut self, action: Action) -> super::DispatchResult {
        match action {
            Action::CreateWorkspace { name } => {
                let outgoing = self.state.history.current().clone();
                match self.state.workspaces.create(&name, outgoing) {
                    Ok(snapshot) => {
                        let name = self.state.workspaces.active().to_string();
                        self.load_workspace(snapshot);
                        self.state
                            .terminal
                            .success(format!("Created and switched to workspace: {}", name));
                        info!(workspace = %name, "workspace created");
                    }
                    Err(err) => {
                        warn!(error = %err, "create workspace rejected");
                        self.state.terminal.error(err.to_string());
                    }
                }
                super::DispatchResult::changed(true)
            }
            Action::RenameWorkspace { from, to } => {
                if from == to.trim() {
                    return super::DispatchResult::unchanged();
                }
                let is_active = self.state.workspaces.active() == from;
                if is_active {
                    let current = self.state.history.current().clone();
                    self.state.workspaces.persist(current);
                }
                match self.state.workspaces.rename(&from, &to) {
                    Ok(renamed) => {
                        if is_active {
                            self.state.history.reset(renamed);
                            let current = self.state.history.current().clone();
                            self.state.editor.reload_active(&current);
                        }
                        self.state
                            .terminal
                            .success(format!("Renamed workspace to: {}", to.trim()));
                        info!(from = %from, to = %to.trim(), "workspace renamed");
                    }
                    Err(err) => {
                        warn!(error = %err, "rename workspace rejected");
                        self.state.terminal.error(err.to_string());
                    }
                }
                super::DispatchResult::changed(true)
            }
            Action::SwitchWorkspace { name } => {
                if self.state.workspaces.active() == name {
                    return super::DispatchResult::unchanged();
                }
                let outgoing = self.state.history.current().clone();
                let Some(incoming) = self.state.workspaces.switch(&name, outgoing) else {
                    return super::DispatchResult::unchanged();
                };
                self.load_workspace(incoming);
                self.state
                    .terminal
                    .info(format!("Switched to workspace: {}", name));
                info!(workspace = %name, "workspace switched");
                super::DispatchResult::changed(true)
            }
            Action::ExportWorkspace => {
                let workspace = self.state.workspaces.active().to_string();
                match export_workspace(self.state.history.current()) {
                    Ok(bytes) => {
                        self.state.terminal.success(format!(
                            "Workspace '{}' archived ({} bytes).",
                            workspace,
                            bytes.len()
                        ));
                        super::DispatchResult {
                            effects: vec![Effect::SaveArchive {
                                file_name: archive_file_name(&workspace),
                                bytes,
                            }],
                            state_changed: true,
                        }
                    }
                    Err(err) => {
                        error!(workspace = %workspace, error = %err, "workspace export failed");
                        self.state
                            .terminal
                            .error(format!("Failed to download workspace: {}", err));
                        super::DispatchResult::changed(true)
                    }
                }
            }
            Action::ArchiveSaved { path } => {
                self.state
                    .terminal
                    .info(format!("Archive saved to {}", path.display()));
                super::DispatchResult::changed(true)
            }
            Action::ArchiveSaveFailed { message } => {
                self.state
                    .terminal
                    .error(format!("Failed to save workspace archive: {}", message));
                super::DispatchResult::changed(true)
            }
            _ => super::DispatchResult::unchanged(),
        }
    }

    /// Fresh single-entry history and an empty session for the incoming tree.
    fn load_workspace(&mut self, snapshot: Snapshot) {
        self.state.history.reset(snapshot);
        self.state.editor.clear();
        self.state.git.reset();
        self.state.problems.clear();
        self.state.terminal.clear_output();
        self.state.build.pending_compile = None;
        self.state.build.pending_deploy = None;
        self.state.build.artifact = None;
    }
}
