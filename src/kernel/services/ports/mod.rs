//! Service ports: traits + data contracts.

pub mod assistant;
pub mod compiler;
pub mod network;
pub mod runtime;
pub mod settings;
pub mod wallet;

pub use assistant::{AssistantError, AssistantPort, ChatRequest, ChatRole, ChatTurn};
pub use compiler::{
    ClType, CompileDiagnostic, CompileOutput, CompileRequest, CompilerPort, ContractMetadata,
    DiagnosticSeverity, EntryPoint, EntryPointAccess, EntryPointArg,
};
pub use network::{
    DeployOutcome, DeployReceipt, DeployRequest, NamedArg, NetworkPort, RuntimeArgError,
    RuntimeArgValue, SignedDeploy, UnsignedDeploy, DEFAULT_GAS_PRICE, DEFAULT_PAYMENT_MOTES,
    DEFAULT_TTL_MS,
};
pub use runtime::{AsyncExecutor, BoxFuture, PortFuture, ServiceError};
pub use settings::{Network, ProjectSettings, WordWrap};
pub use wallet::{Signature, WalletAccount, WalletError, WalletPort};
