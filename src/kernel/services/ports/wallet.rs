use std::fmt;

use super::network::UnsignedDeploy;
use super::runtime::PortFuture;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletAccount {
    pub public_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature(pub String);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletError {
    /// The user declined; not a failure.
    Cancelled,
    Failed(String),
}

impl fmt::Display for WalletError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WalletError::Cancelled => write!(f, "request cancelled by user"),
            WalletError::Failed(msg) => write!(f, "wallet error: {}", msg),
        }
    }
}

impl std::error::Error for WalletError {}

pub trait WalletPort: Send + Sync {
    fn connect(&self) -> PortFuture<Result<WalletAccount, WalletError>>;

    fn sign(&self, deploy: UnsignedDeploy) -> PortFuture<Result<Signature, WalletError>>;
}
