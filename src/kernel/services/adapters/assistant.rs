use crate::kernel::services::ports::{AssistantError, AssistantPort, ChatRequest, PortFuture};

/// Assistant used when no model credential is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineAssistant;

impl AssistantPort for OfflineAssistant {
    fn respond(&self, request: ChatRequest) -> PortFuture<Result<String, AssistantError>> {
        tracing::debug!(
            request_id = request.request_id,
            history = request.history.len(),
            "assistant offline"
        );
        Box::pin(async { Err(AssistantError::MissingCredential) })
    }
}
