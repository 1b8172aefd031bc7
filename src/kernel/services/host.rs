use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{RecvTimeoutError, TryRecvError};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use super::adapters::settings::save_settings_to;
use super::bus::{kernel_bus, KernelBusReceiver, KernelBusSender, KernelMessage};
use super::ports::{
    AssistantPort, AsyncExecutor, BoxFuture, CompilerPort, DeployOutcome, DeployRequest,
    NetworkPort, ServiceError, SignedDeploy, WalletError, WalletPort,
};
use crate::kernel::{Action, Effect};

/// The external collaborators effects are executed against.
#[derive(Clone)]
pub struct ServicePorts {
    pub compiler: Arc<dyn CompilerPort>,
    pub network: Arc<dyn NetworkPort>,
    pub wallet: Arc<dyn WalletPort>,
    pub assistant: Arc<dyn AssistantPort>,
}

pub struct KernelServiceHost {
    ports: ServicePorts,
    bus: KernelBusSender,
    rx: KernelBusReceiver,
    executor: Arc<dyn AsyncExecutor>,
    export_dir: PathBuf,
    settings_path: Option<PathBuf>,
}

#[derive(Clone)]
pub struct KernelServiceContext {
    bus: KernelBusSender,
    executor: Arc<dyn AsyncExecutor>,
}

impl KernelServiceHost {
    pub fn new(executor: Arc<dyn AsyncExecutor>, ports: ServicePorts, export_dir: PathBuf) -> Self {
        let (bus, rx) = kernel_bus();
        Self {
            ports,
            bus,
            rx,
            executor,
            export_dir,
            settings_path: None,
        }
    }

    /// Settings changes are persisted here; without a path they stay in memory.
    pub fn with_settings_path(mut self, path: PathBuf) -> Self {
        self.settings_path = Some(path);
        self
    }

    pub fn context(&self) -> KernelServiceContext {
        KernelServiceContext {
            bus: self.bus.clone(),
            executor: Arc::clone(&self.executor),
        }
    }

    pub fn export_dir(&self) -> &Path {
        &self.export_dir
    }

    pub fn try_recv(&mut self) -> Result<KernelMessage, TryRecvError> {
        self.rx.try_recv()
    }

    pub fn recv_timeout(&mut self, timeout: Duration) -> Result<KernelMessage, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }

    /// Every effect ends in exactly one result action on the bus, except
    /// `SaveSettings`, which only logs.
    pub fn run_effect(&self, effect: Effect) {
        let ctx = self.context();
        match effect {
            Effect::Compile(request) => {
                let compiler = Arc::clone(&self.ports.compiler);
                debug!(request_id = request.request_id, "compile dispatched");
                let done = ctx.clone();
                ctx.spawn_future(async move {
                    let request_id = request.request_id;
                    let result = compiler.compile(request).await;
                    done.dispatch(Action::CompileFinished { request_id, result });
                });
            }
            Effect::ConnectWallet => {
                let wallet = Arc::clone(&self.ports.wallet);
                let done = ctx.clone();
                ctx.spawn_future(async move {
                    let action = match wallet.connect().await {
                        Ok(account) => Action::WalletConnected(account),
                        Err(err) => Action::WalletConnectFailed(err),
                    };
                    done.dispatch(action);
                });
            }
            Effect::Deploy(request) => {
                let wallet = Arc::clone(&self.ports.wallet);
                let network = Arc::clone(&self.ports.network);
                let done = ctx.clone();
                ctx.spawn_future(async move {
                    let request_id = request.request_id;
                    let outcome = sign_and_submit(wallet, network, request).await;
                    done.dispatch(Action::DeployFinished {
                        request_id,
                        outcome,
                    });
                });
            }
            Effect::Chat(request) => {
                let assistant = Arc::clone(&self.ports.assistant);
                let done = ctx.clone();
                ctx.spawn_future(async move {
                    let request_id = request.request_id;
                    let result = assistant.respond(request).await;
                    done.dispatch(Action::ChatReplied { request_id, result });
                });
            }
            Effect::SaveArchive { file_name, bytes } => {
                let action = match write_archive(&self.export_dir, &file_name, &bytes) {
                    Ok(path) => {
                        info!(path = %path.display(), size = bytes.len(), "archive saved");
                        Action::ArchiveSaved { path }
                    }
                    Err(err) => {
                        warn!(file = %file_name, error = %err, "archive save failed");
                        Action::ArchiveSaveFailed {
                            message: err.to_string(),
                        }
                    }
                };
                ctx.dispatch(action);
            }
            Effect::SaveSettings(settings) => {
                let Some(path) = self.settings_path.as_deref() else {
                    return;
                };
                if let Err(err) = save_settings_to(path, &settings) {
                    warn!(path = %path.display(), error = %err, "settings save failed");
                }
            }
        }
    }
}

impl KernelServiceContext {
    pub fn dispatch(&self, action: Action) {
        let _ = self.bus.send_action(action);
    }

    pub fn spawn(&self, task: BoxFuture) {
        self.executor.spawn(task);
    }

    pub fn spawn_future<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.executor.spawn(Box::pin(task));
    }
}

async fn sign_and_submit(
    wallet: Arc<dyn WalletPort>,
    network: Arc<dyn NetworkPort>,
    request: DeployRequest,
) -> DeployOutcome {
    let DeployRequest {
        network: target,
        deploy,
        ..
    } = request;
    let signature = match wallet.sign(deploy.clone()).await {
        Ok(signature) => signature,
        Err(WalletError::Cancelled) => return DeployOutcome::Cancelled,
        Err(WalletError::Failed(message)) => return DeployOutcome::Failed(message),
    };
    let signed = SignedDeploy { deploy, signature };
    match network.submit(signed, target.rpc_url().to_string()).await {
        Ok(receipt) => DeployOutcome::Deployed(receipt),
        Err(ServiceError { message, .. }) => DeployOutcome::Failed(message),
    }
}

fn write_archive(dir: &Path, file_name: &str, bytes: &[u8]) -> std::io::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(file_name);
    std::fs::write(&path, bytes)?;
    Ok(path)
}

#[cfg(test)]
#[path = "../../../tests/unit/kernel/services/host.rs"]
mod tests;
