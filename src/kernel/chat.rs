//! Assistant transcript and the context payload sent with each message.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::kernel::services::ports::{AssistantError, ChatRole, ChatTurn};
use crate::models::file_tree::{self, Node};

pub const GREETING: &str = "Hello! I am Caspier AI. You can mention files using @filename to ask me to review them or find errors. How can I assist you today?";
pub const MISSING_CREDENTIAL_REPLY: &str =
    "Error: API Key is missing. Please check your environment configuration.";
pub const FAILED_REPLY: &str =
    "I encountered an error processing your request. Please try again.";

static MENTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"@([a-zA-Z0-9_.-]+)").expect("valid mention pattern"));
static CODE_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"```(\w*)\n?((?s:.*?))```").expect("valid code block pattern")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: u64,
    pub role: ChatRole,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct ChatState {
    messages: Vec<ChatMessage>,
    next_id: u64,
    pending: Option<u64>,
    credential_missing: bool,
}

impl Default for ChatState {
    fn default() -> Self {
        let mut state = Self {
            messages: Vec::new(),
            next_id: 1,
            pending: None,
            credential_missing: false,
        };
        state.push(ChatRole::Model, GREETING);
        state
    }
}

impl ChatState {
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn pending(&self) -> Option<u64> {
        self.pending
    }

    pub fn set_pending(&mut self, request_id: Option<u64>) {
        self.pending = request_id;
    }

    pub fn credential_missing(&self) -> bool {
        self.credential_missing
    }

    pub fn history(&self) -> Vec<ChatTurn> {
        self.messages
            .iter()
            .map(|m| ChatTurn {
                role: m.role,
                text: m.text.clone(),
            })
            .collect()
    }

    pub fn push(&mut self, role: ChatRole, text: impl Into<String>) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.messages.push(ChatMessage {
            id,
            role,
            text: text.into(),
        });
        id
    }

    /// Appends the model reply, mapping failures to their fixed sentinel text.
    pub fn push_reply(&mut self, result: Result<String, AssistantError>) -> u64 {
        let text = match result {
            Ok(text) => text,
            Err(AssistantError::MissingCredential) => {
                self.credential_missing = true;
                MISSING_CREDENTIAL_REPLY.to_string()
            }
            Err(AssistantError::Failed(_)) => FAILED_REPLY.to_string(),
        };
        self.push(ChatRole::Model, text)
    }
}

/// Every `@name` mention in order of appearance, duplicates included.
pub fn mentioned_names(text: &str) -> Vec<&str> {
    MENTION
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .collect()
}

pub fn build_context(active_buffer: &str, message: &str, tree: &[Node]) -> String {
    let mut payload = format!("Active File (Currently Open):\n{}\n\n", active_buffer);
    let mentions = mentioned_names(message);
    if mentions.is_empty() {
        return payload;
    }

    payload.push_str("Referenced Files:\n");
    for name in mentions {
        let content = file_tree::find_file_by_name(tree, name)
            .and_then(Node::content)
            .filter(|content| !content.is_empty());
        if let Some(content) = content {
            payload.push_str(&format!(
                "--- START OF FILE {} ---\n{}\n--- END OF FILE ---\n\n",
                name, content
            ));
        }
    }
    payload
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessagePart<'a> {
    Text(&'a str),
    Code { language: &'a str, body: &'a str },
}

/// Splits a reply into prose and fenced code blocks.
pub fn split_message(text: &str) -> Vec<MessagePart<'_>> {
    let mut parts = Vec::new();
    let mut last = 0;
    for caps in CODE_BLOCK.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        if whole.start() > last {
            parts.push(MessagePart::Text(&text[last..whole.start()]));
        }
        parts.push(MessagePart::Code {
            language: caps.get(1).map_or("", |m| m.as_str()),
            body: caps.get(2).map_or("", |m| m.as_str()),
        });
        last = whole.end();
    }
    if last < text.len() {
        parts.push(MessagePart::Text(&text[last..]));
    }
    parts
}

pub fn code_blocks(text: &str) -> Vec<(&str, &str)> {
    split_message(text)
        .into_iter()
        .filter_map(|part| match part {
            MessagePart::Code { language, body } => Some((language, body)),
            MessagePart::Text(_) => None,
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/chat.rs"]
mod tests;
