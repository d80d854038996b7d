//! Request builder: prompt text + tool descriptors -> chat completion request.

use crate::types::{ChatRequest, Message, ToolDefinition, ToolDescriptor};

pub const DEFAULT_MODEL: &str = "gpt-4";
pub const DEFAULT_MAX_TOKENS: u32 = 1500;
pub const DEFAULT_TEMPERATURE: f64 = 0.3;

/// Steers the model towards direct answers; tools are a last resort.
pub const SYSTEM_PROMPT: &str = "You are a helpful AI assistant. For general knowledge questions and simple queries, provide direct, helpful answers. Only use MCP tools when specifically needed for file operations, system commands, or web searches. For most questions, give informative responses without calling tools. Be conversational and helpful.";

/// Tool choice sent whenever at least one tool is advertised.
pub const TOOL_CHOICE_AUTO: &str = "auto";

/// Fixed request parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatParams {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f64,
    pub system_prompt: String,
}

impl Default for ChatParams {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            system_prompt: SYSTEM_PROMPT.to_string(),
        }
    }
}

/// Builds [`ChatRequest`]s. Pure: no I/O, output depends only on the inputs.
#[derive(Debug, Clone, Default)]
pub struct RequestBuilder {
    params: ChatParams,
}

impl RequestBuilder {
    pub fn new(params: ChatParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &ChatParams {
        &self.params
    }

    pub fn build(&self, prompt: &str, tools: &[ToolDescriptor]) -> ChatRequest {
        let messages = vec![
            Message::system(self.params.system_prompt.clone()),
            Message::user(prompt),
        ];

        let (tools, tool_choice) = if tools.is_empty() {
            (None, None)
        } else {
            let defs = tools.iter().map(ToolDefinition::from_descriptor).collect();
            (Some(defs), Some(TOOL_CHOICE_AUTO.to_string()))
        };

        ChatRequest {
            model: self.params.model.clone(),
            messages,
            max_tokens: self.params.max_tokens,
            temperature: self.params.temperature,
            tools,
            tool_choice,
        }
    }
}

/// Build a request with the default parameters.
pub fn build(prompt: &str, tools: &[ToolDescriptor]) -> ChatRequest {
    RequestBuilder::default().build(prompt, tools)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MessageRole;

    #[test]
    fn test_build_without_tools() {
        let req = build("What is 2 + 2?", &[]);
        assert_eq!(req.model, "gpt-4");
        assert_eq!(req.max_tokens, 1500);
        assert_eq!(req.temperature, 0.3);
        assert_eq!(req.messages.len(), 2);
        assert_eq!(req.messages[0].role, MessageRole::System);
        assert_eq!(req.messages[0].content, SYSTEM_PROMPT);
        assert_eq!(req.messages[1].role, MessageRole::User);
        assert_eq!(req.messages[1].content, "What is 2 + 2?");
        assert!(req.tools.is_none());
        assert!(req.tool_choice.is_none());
    }

    #[test]
    fn test_build_with_tools_keeps_order() {
        let tools = vec![
            ToolDescriptor::new("read_file", "Read a file"),
            ToolDescriptor::new("web_search", "Search the web"),
        ];
        let req = build("", &tools);
        let defs = req.tools.as_ref().unwrap();
        assert_eq!(defs.len(), 2);
        assert_eq!(defs[0].function.name, "read_file");
        assert_eq!(defs[1].function.description, "Search the web");
        assert_eq!(req.tool_choice.as_deref(), Some("auto"));
        assert_eq!(req.messages[1].content, "");
    }

    #[test]
    fn test_custom_params() {
        let builder = RequestBuilder::new(ChatParams {
            model: "gpt-4o-mini".into(),
            max_tokens: 256,
            ..ChatParams::default()
        });
        let req = builder.build("hi", &[]);
        assert_eq!(req.model, "gpt-4o-mini");
        assert_eq!(req.max_tokens, 256);
        assert_eq!(req.temperature, DEFAULT_TEMPERATURE);
    }
}
