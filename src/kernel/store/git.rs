use tracing::{info, warn};

use crate::kernel::Action;
use crate::models::now_millis;

impl super::Store {
    pub(super) fn reduce_git_action(&mut self, action: Action) -> super::DispatchResult {
        match action {
            Action::GitStage { id } => super::DispatchResult::changed(self.state.git.stage(&id)),
            Action::GitUnstage { id } => {
                super::DispatchResult::changed(self.state.git.unstage(&id))
            }
            Action::GitCommit { message } => match self.state.git.commit(&message, now_millis()) {
                Ok(record) => {
                    info!(id = %record.id, hash = %record.hash, "commit recorded");
                    self.state
                        .terminal
                        .success(format!("Committed: {}", record.message));
                    super::DispatchResult::changed(true)
                }
                Err(err) => {
                    warn!(error = %err, "commit rejected");
                    self.state.terminal.error(err.to_string());
                    super::DispatchResult::changed(true)
                }
            },
            Action::GitPush => {
                let branch = self.state.git.branch().to_string();
                self.state
                    .terminal
                    .info(format!("Pushing to origin/{}...", branch));
                self.state.terminal.success("Push successful.");
                info!(branch = %branch, commits = self.state.git.commits().len(), "push recorded");
                super::DispatchResult::changed(true)
            }
            _ => super::DispatchResult::unchanged(),
        }
    }
}
