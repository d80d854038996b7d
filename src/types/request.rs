//! Chat completion request body

use serde::{Deserialize, Serialize};

use super::message::Message;
use super::tool::ToolDefinition;

/// Request body for `POST /v1/chat/completions`.
///
/// `tools` and `tool_choice` are skipped entirely when unset; the API treats
/// an empty `tools` array differently from an absent one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub max_tokens: u32,
    pub temperature: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<ToolDefinition>>,
    /// OpenAI-style tool choice, e.g. "auto" or "none".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<String>,
}

impl ChatRequest {
    pub fn tool_count(&self) -> usize {
        self.tools.as_ref().map(Vec::len).unwrap_or(0)
    }

    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
