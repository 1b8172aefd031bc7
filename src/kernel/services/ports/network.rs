//! Deploy/query network contracts.

use std::fmt;

use super::compiler::{ClType, EntryPoint};
use super::runtime::{PortFuture, ServiceError};
use super::settings::Network;
use super::wallet::{Signature, WalletAccount};

pub const DEFAULT_PAYMENT_MOTES: u64 = 5_000_000_000;
pub const DEFAULT_GAS_PRICE: u64 = 1;
pub const DEFAULT_TTL_MS: u64 = 30 * 60 * 1000;

/// Runtime argument value, typed by the parameter the contract declares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeArgValue {
    String(String),
    UnsignedInt(u64),
    Boolean(bool),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeArgError {
    UnknownArgument(String),
    UnsupportedType { name: String, cl_type: String },
    InvalidValue { name: String, expected: &'static str, text: String },
}

impl fmt::Display for RuntimeArgError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeArgError::UnknownArgument(name) => {
                write!(f, "unknown runtime argument '{}'", name)
            }
            RuntimeArgError::UnsupportedType { name, cl_type } => {
                write!(f, "argument '{}' has unsupported type {}", name, cl_type)
            }
            RuntimeArgError::InvalidValue {
                name,
                expected,
                text,
            } => write!(f, "argument '{}' expects {}, got '{}'", name, expected, text),
        }
    }
}

impl std::error::Error for RuntimeArgError {}

impl RuntimeArgValue {
    /// The declared type decides the variant; the text is never sniffed.
    pub fn from_declared(name: &str, cl_type: &ClType, text: &str) -> Result<Self, RuntimeArgError> {
        let text = text.trim();
        match cl_type {
            ClType::String | ClType::Key => Ok(Self::String(text.to_string())),
            ClType::U8 | ClType::U32 | ClType::U64 | ClType::U128 | ClType::U256 | ClType::U512 => {
                let value = text.parse::<u64>().map_err(|_| RuntimeArgError::InvalidValue {
                    name: name.to_string(),
                    expected: "an unsigned integer",
                    text: text.to_string(),
                })?;
                let fits = match cl_type {
                    ClType::U8 => value <= u8::MAX as u64,
                    ClType::U32 => value <= u32::MAX as u64,
                    _ => true,
                };
                if !fits {
                    return Err(RuntimeArgError::InvalidValue {
                        name: name.to_string(),
                        expected: "a value within the declared width",
                        text: text.to_string(),
                    });
                }
                Ok(Self::UnsignedInt(value))
            }
            ClType::Bool => match text {
                "true" => Ok(Self::Boolean(true)),
                "false" => Ok(Self::Boolean(false)),
                _ => Err(RuntimeArgError::InvalidValue {
                    name: name.to_string(),
                    expected: "true or false",
                    text: text.to_string(),
                }),
            },
            ClType::Unit | ClType::Other(_) => Err(RuntimeArgError::UnsupportedType {
                name: name.to_string(),
                cl_type: cl_type.name().to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedArg {
    pub name: String,
    pub value: RuntimeArgValue,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsignedDeploy {
    pub chain_name: String,
    pub account: WalletAccount,
    pub module_bytes: Vec<u8>,
    pub runtime_args: Vec<NamedArg>,
    pub payment_amount: u64,
    pub gas_price: u64,
    pub ttl_ms: u64,
    pub timestamp_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedDeploy {
    pub deploy: UnsignedDeploy,
    pub signature: Signature,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployRequest {
    pub request_id: u64,
    pub contract_name: String,
    pub network: Network,
    pub entry_points: Vec<EntryPoint>,
    pub deploy: UnsignedDeploy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployReceipt {
    pub deploy_hash: String,
    pub contract_hash: Option<String>,
}

/// Cancellation is a distinct, non-error outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeployOutcome {
    Deployed(DeployReceipt),
    Cancelled,
    Failed(String),
}

pub trait NetworkPort: Send + Sync {
    fn submit(
        &self,
        deploy: SignedDeploy,
        rpc_url: String,
    ) -> PortFuture<Result<DeployReceipt, ServiceError>>;
}
