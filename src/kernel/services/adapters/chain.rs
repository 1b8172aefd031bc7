//! Offline stand-ins for the Casper node and the browser wallet.

use std::fmt::Write as _;
use std::hash::{Hash, Hasher};

use rustc_hash::FxHasher;

use crate::kernel::services::ports::{
    DeployReceipt, NamedArg, NetworkPort, PortFuture, RuntimeArgValue, ServiceError, Signature,
    SignedDeploy, UnsignedDeploy, WalletAccount, WalletError, WalletPort,
};

const ED25519_TAG: &str = "01";
const DEFAULT_KEY_SEED: &[u8] = b"caspier-simulated-wallet";

/// 64 hex chars derived from `parts`; stable within a build.
fn digest_hex(parts: &[&[u8]]) -> String {
    let mut out = String::with_capacity(64);
    for round in 0u64..4 {
        let mut hasher = FxHasher::default();
        round.hash(&mut hasher);
        for part in parts {
            part.hash(&mut hasher);
        }
        let _ = write!(out, "{:016x}", hasher.finish());
    }
    out
}

fn deploy_body(deploy: &UnsignedDeploy) -> Vec<u8> {
    let mut body = Vec::with_capacity(deploy.module_bytes.len() + 128);
    body.extend_from_slice(deploy.chain_name.as_bytes());
    body.extend_from_slice(deploy.account.public_key.as_bytes());
    body.extend_from_slice(&deploy.module_bytes);
    for NamedArg { name, value } in &deploy.runtime_args {
        body.extend_from_slice(name.as_bytes());
        match value {
            RuntimeArgValue::String(s) => body.extend_from_slice(s.as_bytes()),
            RuntimeArgValue::UnsignedInt(n) => body.extend_from_slice(&n.to_le_bytes()),
            RuntimeArgValue::Boolean(b) => body.push(u8::from(*b)),
        }
    }
    for n in [
        deploy.payment_amount,
        deploy.gas_price,
        deploy.ttl_ms,
        deploy.timestamp_ms,
    ] {
        body.extend_from_slice(&n.to_le_bytes());
    }
    body
}

/// Accepts every deploy and answers with a content-derived hash.
#[derive(Debug, Clone)]
pub struct SimulatedNetwork {
    reachable: bool,
}

impl Default for SimulatedNetwork {
    fn default() -> Self {
        Self { reachable: true }
    }
}

impl SimulatedNetwork {
    /// Every submission fails at the transport level.
    pub fn unreachable() -> Self {
        Self { reachable: false }
    }

    pub fn deploy_hash(deploy: &SignedDeploy) -> String {
        let body = deploy_body(&deploy.deploy);
        digest_hex(&[&body, deploy.signature.0.as_bytes()])
    }
}

impl NetworkPort for SimulatedNetwork {
    fn submit(
        &self,
        deploy: SignedDeploy,
        rpc_url: String,
    ) -> PortFuture<Result<DeployReceipt, ServiceError>> {
        let result = if self.reachable {
            let deploy_hash = Self::deploy_hash(&deploy);
            tracing::debug!(rpc = %rpc_url, deploy_hash = %deploy_hash, "simulated submit");
            Ok(DeployReceipt {
                deploy_hash,
                contract_hash: None,
            })
        } else {
            Err(ServiceError::new(
                "network",
                format!("failed to reach {}", rpc_url),
            ))
        };
        Box::pin(async move { result })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Approval {
    Approve,
    Decline,
}

/// Holds one key; approves or declines every request.
#[derive(Debug, Clone)]
pub struct SimulatedWallet {
    public_key: String,
    approval: Approval,
}

impl Default for SimulatedWallet {
    fn default() -> Self {
        Self::with_public_key(format!(
            "{}{}",
            ED25519_TAG,
            digest_hex(&[DEFAULT_KEY_SEED])
        ))
    }
}

impl SimulatedWallet {
    pub fn with_public_key(public_key: impl Into<String>) -> Self {
        Self {
            public_key: public_key.into(),
            approval: Approval::Approve,
        }
    }

    /// The user rejects every prompt.
    pub fn declining() -> Self {
        Self {
            approval: Approval::Decline,
            ..Self::default()
        }
    }

    pub fn public_key(&self) -> &str {
        &self.public_key
    }

    fn sign_now(&self, deploy: &UnsignedDeploy) -> Result<Signature, WalletError> {
        if self.approval == Approval::Decline {
            return Err(WalletError::Cancelled);
        }
        if deploy.account.public_key != self.public_key {
            return Err(WalletError::Failed(format!(
                "deploy account {} is not held by this wallet",
                deploy.account.public_key
            )));
        }
        let body = deploy_body(deploy);
        Ok(Signature(format!(
            "{}{}",
            ED25519_TAG,
            digest_hex(&[self.public_key.as_bytes(), &body])
        )))
    }
}

impl WalletPort for SimulatedWallet {
    fn connect(&self) -> PortFuture<Result<WalletAccount, WalletError>> {
        let result = match self.approval {
            Approval::Approve => Ok(WalletAccount {
                public_key: self.public_key.clone(),
            }),
            Approval::Decline => Err(WalletError::Cancelled),
        };
        Box::pin(async move { result })
    }

    fn sign(&self, deploy: UnsignedDeploy) -> PortFuture<Result<Signature, WalletError>> {
        let result = self.sign_now(&deploy);
        Box::pin(async move { result })
    }
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/adapters/chain.rs"]
mod tests;
