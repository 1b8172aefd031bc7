//! Chat assistant contracts.

use std::fmt;

use super::runtime::PortFuture;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Model,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRequest {
    pub request_id: u64,
    pub message: String,
    /// Active file plus every `@name` file the message references.
    pub context: String,
    pub history: Vec<ChatTurn>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssistantError {
    MissingCredential,
    Failed(String),
}

impl fmt::Display for AssistantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssistantError::MissingCredential => write!(f, "assistant credential is missing"),
            AssistantError::Failed(msg) => write!(f, "assistant error: {}", msg),
        }
    }
}

impl std::error::Error for AssistantError {}

pub trait AssistantPort: Send + Sync {
    fn respond(&self, request: ChatRequest) -> PortFuture<Result<String, AssistantError>>;
}
