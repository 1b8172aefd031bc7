use tracing::{info, warn};

use crate::kernel::chat::build_context;
use crate::kernel::services::ports::{
    ChatRequest, ChatRole, CompileDiagnostic, CompileOutput, CompileRequest, DeployOutcome,
    DeployRequest, NamedArg, RuntimeArgError, RuntimeArgValue, ServiceError, UnsignedDeploy,
    WalletError, DEFAULT_GAS_PRICE, DEFAULT_PAYMENT_MOTES, DEFAULT_TTL_MS,
};
use crate::kernel::state::{BuildArtifact, DeploymentRecord, PendingCompile, PendingDeploy};
use crate::kernel::{Action, Effect};
use crate::models::{now_millis, unique_id};

impl super::Store {
    pub(super) fn reduce_service_action(&mut self, action: Action) -> super::DispatchResult {
        match action {
            Action::Compile => self.start_compile(),
            Action::CompileFinished { request_id, result } => {
                let matches = self
                    .state
                    .build
                    .pending_compile
                    .as_ref()
                    .is_some_and(|p| p.request_id == request_id);
                if !matches {
                    return super::DispatchResult::unchanged();
                }
                let Some(pending) = self.state.build.pending_compile.take() else {
                    return super::DispatchResult::unchanged();
                };
                self.finish_compile(pending, result);
                super::DispatchResult::changed(true)
            }
            Action::ConnectWallet => {
                if self.state.wallet.connecting {
                    return super::DispatchResult::unchanged();
                }
                self.state.wallet.connecting = true;
                self.state.terminal.info("Connecting wallet...");
                super::DispatchResult {
                    effects: vec![Effect::ConnectWallet],
                    state_changed: true,
                }
            }
            Action::WalletConnected(account) => {
                self.state.wallet.connecting = false;
                self.state
                    .terminal
                    .success(format!("Wallet connected: {}", account.public_key));
                info!(public_key = %account.public_key, "wallet connected");
                self.state.wallet.account = Some(account);
                super::DispatchResult::changed(true)
            }
            Action::WalletConnectFailed(err) => {
                self.state.wallet.connecting = false;
                match err {
                    WalletError::Cancelled => {
                        self.state.terminal.info("Wallet connection cancelled.");
                    }
                    WalletError::Failed(message) => {
                        warn!(error = %message, "wallet connection failed");
                        self.state
                            .terminal
                            .error(format!("Wallet connection failed: {}", message));
                    }
                }
                super::DispatchResult::changed(true)
            }
            Action::Deploy {
                args,
                payment_amount,
            } => self.start_deploy(args, payment_amount),
            Action::DeployFinished {
                request_id,
                outcome,
            } => {
                let matches = self
                    .state
                    .build
                    .pending_deploy
                    .as_ref()
                    .is_some_and(|p| p.request_id == request_id);
                if !matches {
                    return super::DispatchResult::unchanged();
                }
                let Some(pending) = self.state.build.pending_deploy.take() else {
                    return super::DispatchResult::unchanged();
                };
                self.finish_deploy(pending, outcome);
                super::DispatchResult::changed(true)
            }
            Action::ChatSend { text } => {
                if text.trim().is_empty() {
                    return super::DispatchResult::unchanged();
                }
                let context = build_context(
                    self.state.editor.buffer(),
                    &text,
                    self.state.history.current(),
                );
                let history = self.state.chat.history();
                self.state.chat.push(ChatRole::User, text.clone());
                let request_id = self.state.next_request_id();
                self.state.chat.set_pending(Some(request_id));
                super::DispatchResult {
                    effects: vec![Effect::Chat(ChatRequest {
                        request_id,
                        message: text,
                        context,
                        history,
                    })],
                    state_changed: true,
                }
            }
            Action::ChatReplied { request_id, result } => {
                if self.state.chat.pending() != Some(request_id) {
                    return super::DispatchResult::unchanged();
                }
                self.state.chat.set_pending(None);
                self.state.chat.push_reply(result);
                super::DispatchResult::changed(true)
            }
            _ => super::DispatchResult::unchanged(),
        }
    }

    fn start_compile(&mut self) -> super::DispatchResult {
        let Some(file) = self.state.active_file() else {
            return super::DispatchResult::unchanged();
        };
        let file_id = file.id.clone();
        let file_name = file.name.clone();
        let language = file.language().unwrap_or("plaintext").to_string();
        let source = file.content().unwrap_or_default().to_string();
        let optimize = self.state.settings.enable_optimization;

        self.state
            .terminal
            .command(format!("cargo build --release -p {}", file_name));
        self.state.terminal.reset_output([
            format!("> Compiling {}...", file_name),
            format!(
                "> Optimization: {}",
                if optimize { "Enabled" } else { "Disabled" }
            ),
            "> Compiler starting...".to_string(),
        ]);
        self.state.problems.clear();

        let request_id = self.state.next_request_id();
        self.state.build.pending_compile = Some(PendingCompile {
            request_id,
            file_id: file_id.clone(),
            file_name: file_name.clone(),
        });
        info!(request_id, file = %file_name, optimize, "compile requested");

        super::DispatchResult {
            effects: vec![Effect::Compile(CompileRequest {
                request_id,
                file_id,
                file_name,
                source,
                language,
                optimize,
            })],
            state_changed: true,
        }
    }

    fn finish_compile(
        &mut self,
        pending: PendingCompile,
        result: Result<CompileOutput, ServiceError>,
    ) {
        let output = match result {
            Ok(output) => output,
            Err(err) => {
                warn!(error = %err, "compiler unavailable");
                CompileOutput::failed(vec![CompileDiagnostic::error(err.message)])
            }
        };

        self.state
            .problems
            .replace_from_diagnostics(&pending.file_name, &output.diagnostics);

        if !output.success {
            let errors = output.error_count().max(1);
            self.state
                .terminal
                .error("Compilation failed. See Output and Problems for details.");
            self.state.terminal.push_output(format!(
                "Error: Compilation failed with {} error{}.",
                errors,
                if errors == 1 { "" } else { "s" }
            ));
            info!(request_id = pending.request_id, errors, "compile failed");
            return;
        }

        self.state.terminal.success("Compilation successful!");
        self.state
            .terminal
            .push_output("> Compilation completed successfully.");
        if let Some(wasm) = output.artifact {
            let metadata = output.metadata.unwrap_or_default();
            let contract_name = metadata
                .contract_package
                .clone()
                .unwrap_or_else(|| contract_name_for(&pending.file_name));
            self.state.build.artifact = Some(BuildArtifact {
                file_id: pending.file_id,
                contract_name,
                wasm,
                metadata,
            });
        }
        info!(request_id = pending.request_id, "compile succeeded");
    }

    fn start_deploy(
        &mut self,
        args: Vec<(String, String)>,
        payment_amount: Option<u64>,
    ) -> super::DispatchResult {
        let Some(artifact) = self.state.build.artifact.clone() else {
            self.state.terminal.error("Please compile the contract first");
            return super::DispatchResult::changed(true);
        };
        let Some(account) = self.state.wallet.account.clone() else {
            self.state.terminal.error("Please connect a wallet first");
            return super::DispatchResult::changed(true);
        };

        let runtime_args = match convert_args(&artifact, args) {
            Ok(runtime_args) => runtime_args,
            Err(err) => {
                self.state
                    .terminal
                    .error(format!("Deployment failed: {}", err));
                return super::DispatchResult::changed(true);
            }
        };

        let network = self.state.settings.network;
        let request_id = self.state.next_request_id();
        let entry_points = artifact.metadata.entry_points.clone();
        self.state.build.pending_deploy = Some(PendingDeploy {
            request_id,
            contract_name: artifact.contract_name.clone(),
            network,
            entry_points: entry_points.clone(),
        });
        self.state.terminal.info(format!(
            "Deploying {} to {}...",
            artifact.contract_name,
            network.label()
        ));
        info!(request_id, network = network.label(), "deploy requested");

        let deploy = UnsignedDeploy {
            chain_name: network.chain_name().to_string(),
            account,
            module_bytes: artifact.wasm,
            runtime_args,
            payment_amount: payment_amount.unwrap_or(DEFAULT_PAYMENT_MOTES),
            gas_price: DEFAULT_GAS_PRICE,
            ttl_ms: DEFAULT_TTL_MS,
            timestamp_ms: now_millis(),
        };
        super::DispatchResult {
            effects: vec![Effect::Deploy(DeployRequest {
                request_id,
                contract_name: artifact.contract_name,
                network,
                entry_points,
                deploy,
            })],
            state_changed: true,
        }
    }

    fn finish_deploy(&mut self, pending: PendingDeploy, outcome: DeployOutcome) {
        match outcome {
            DeployOutcome::Deployed(receipt) => {
                self.state.terminal.success(format!(
                    "Deploy successful! Hash: {}",
                    receipt.deploy_hash
                ));
                info!(deploy_hash = %receipt.deploy_hash, "deploy accepted");
                self.state.build.deployments.insert(
                    0,
                    DeploymentRecord {
                        id: unique_id("deploy"),
                        name: pending.contract_name,
                        deploy_hash: receipt.deploy_hash,
                        contract_hash: receipt.contract_hash,
                        network: pending.network,
                        timestamp_ms: now_millis(),
                        entry_points: pending.entry_points,
                    },
                );
            }
            DeployOutcome::Cancelled => {
                self.state.terminal.info("Deploy cancelled by user.");
            }
            DeployOutcome::Failed(message) => {
                warn!(error = %message, "deploy failed");
                self.state
                    .terminal
                    .error(format!("Deployment failed: {}", message));
            }
        }
    }
}

/// Each value is typed by the parameter the compiler declared for its name.
fn convert_args(
    artifact: &BuildArtifact,
    args: Vec<(String, String)>,
) -> Result<Vec<NamedArg>, RuntimeArgError> {
    args.into_iter()
        .map(|(name, text)| {
            let cl_type = artifact
                .metadata
                .declared_type(&name)
                .ok_or_else(|| RuntimeArgError::UnknownArgument(name.clone()))?;
            let value = RuntimeArgValue::from_declared(&name, cl_type, &text)?;
            Ok(NamedArg { name, value })
        })
        .collect()
}

fn contract_name_for(file_name: &str) -> String {
    match file_name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem.to_string(),
        _ => file_name.to_string(),
    }
}
