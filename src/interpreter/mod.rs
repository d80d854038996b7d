//! 响应解释模块：将 chat completion 响应映射为最终文本与控制台输出。
//!
//! # Response Interpreter
//!
//! Turns an untrusted chat completion response into a tagged outcome plus the
//! console output that should accompany it. Interpretation is pure: nothing is
//! written here, the [`OutputEvent`]s are handed to [`crate::render`].
//!
//! | Shape | Condition | Outcome |
//! |-------|-----------|---------|
//! | [`ResponseShape::ToolRequested`] | `choices[0].message.tool_calls` non-empty | placeholder reply |
//! | [`ResponseShape::PlainAnswer`] | `choices[0].message.content` non-empty | the content |
//! | [`ResponseShape::Empty`] | neither | [`NO_CONTENT`] |
//! | [`ResponseShape::ApiError`] | `choices` missing or empty | `Error: <error.message>` |
//!
//! Tools are never executed; a tool request yields a canned reply.

pub mod pacing;

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::QueryFailure;
use crate::types::ToolCall;

pub use pacing::{AdaptiveDelay, FixedDelay, NoDelay, Pacer, PacingConfig};

/// Result string when the model answered with neither content nor tool calls.
pub const NO_CONTENT: &str = "No response content";
/// Console notice for the same case.
pub const NO_CONTENT_NOTICE: &str = "No response content available";
/// Used when the API reports an error without a message.
pub const DEFAULT_API_ERROR: &str = "API error";

/// How many entries of `tool_calls` are honored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolCallMode {
    /// Only the first requested call; the rest are dropped.
    #[default]
    Single,
    /// Every requested call gets diagnostics and a placeholder.
    All,
}

impl std::str::FromStr for ToolCallMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "single" => Ok(ToolCallMode::Single),
            "all" | "multi" => Ok(ToolCallMode::All),
            other => Err(format!("unknown tool call mode: {other}")),
        }
    }
}

/// MCP server a tool name would be routed to. Informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerKind {
    Web,
    System,
    Filesystem,
}

impl ServerKind {
    pub fn classify(tool_name: &str) -> Self {
        if tool_name.contains("web") {
            ServerKind::Web
        } else if tool_name.contains("command") || tool_name.contains("system") {
            ServerKind::System
        } else {
            ServerKind::Filesystem
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ServerKind::Web => "web",
            ServerKind::System => "system",
            ServerKind::Filesystem => "filesystem",
        }
    }
}

impl fmt::Display for ServerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A console write produced while interpreting a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputEvent {
    /// Tool-call trace line.
    Diagnostic(String),
    /// Status or error line.
    Notice(String),
    /// Placeholder reply line.
    Reply(String),
    /// Model answer, written one character at a time and closed with a newline.
    Typewriter(String),
}

/// Final result of one round trip plus the console output that goes with it.
#[derive(Debug, Clone, PartialEq)]
pub struct Interpretation {
    pub outcome: Result<String, QueryFailure>,
    pub events: Vec<OutputEvent>,
}

impl Interpretation {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }

    /// The result as a single human-readable string.
    pub fn display_text(&self) -> String {
        match &self.outcome {
            Ok(text) => text.clone(),
            Err(failure) => failure.display_text(),
        }
    }

    pub fn diagnostics(&self) -> impl Iterator<Item = &str> {
        self.events.iter().filter_map(|e| match e {
            OutputEvent::Diagnostic(line) => Some(line.as_str()),
            _ => None,
        })
    }

    /// The external HTTP client failed.
    pub fn transport_failure(detail: impl Into<String>) -> Self {
        let detail = detail.into();
        Self {
            events: vec![OutputEvent::Notice(format!("API request failed: {detail}"))],
            outcome: Err(QueryFailure::transport(detail)),
        }
    }

    /// The response could not be decoded or had an unexpected structure.
    pub fn malformed_response(detail: impl Into<String>) -> Self {
        let detail = detail.into();
        Self {
            events: vec![OutputEvent::Notice(format!(
                "Error processing response: {detail}"
            ))],
            outcome: Err(QueryFailure::malformed(detail)),
        }
    }
}

/// The four shapes a response can take.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseShape<'a> {
    ToolRequested(Vec<ToolCall>),
    PlainAnswer(&'a str),
    Empty,
    ApiError(String),
}

#[derive(Debug, Clone, Default)]
pub struct Interpreter {
    mode: ToolCallMode,
}

impl Interpreter {
    pub fn new(mode: ToolCallMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> ToolCallMode {
        self.mode
    }

    /// Interpret a parsed response. Never panics on hostile input; structural
    /// problems become a [`crate::FailureKind::MalformedResponse`] outcome.
    pub fn interpret(&self, response: &Value) -> Interpretation {
        match self.classify(response) {
            Ok(shape) => self.resolve(shape),
            Err(detail) => {
                tracing::warn!(%detail, "unexpected response structure");
                Interpretation::malformed_response(detail)
            }
        }
    }

    /// Decide which shape `response` has.
    pub fn classify<'a>(&self, response: &'a Value) -> Result<ResponseShape<'a>, String> {
        let first_choice = response
            .get("choices")
            .and_then(Value::as_array)
            .and_then(|choices| choices.first());
        let Some(choice) = first_choice else {
            return Ok(ResponseShape::ApiError(api_error_message(response)));
        };

        let message = choice
            .get("message")
            .filter(|m| m.is_object())
            .ok_or_else(|| "missing field `choices[0].message`".to_string())?;

        match message.get("tool_calls") {
            None | Some(Value::Null) => {}
            Some(Value::Array(calls)) if calls.is_empty() => {}
            Some(value) if is_falsy(value) => {}
            Some(Value::Array(calls)) => {
                let limit = match self.mode {
                    ToolCallMode::Single => 1,
                    ToolCallMode::All => calls.len(),
                };
                if calls.len() > limit {
                    tracing::debug!(
                        requested = calls.len(),
                        honored = limit,
                        "dropping extra tool calls"
                    );
                }
                let parsed = calls
                    .iter()
                    .take(limit)
                    .enumerate()
                    .map(|(i, call)| parse_tool_call(i, call))
                    .collect::<Result<Vec<_>, _>>()?;
                return Ok(ResponseShape::ToolRequested(parsed));
            }
            Some(_) => {
                return Err("field `choices[0].message.tool_calls` is not an array".to_string())
            }
        }

        match message.get("content") {
            None | Some(Value::Null) => Ok(ResponseShape::Empty),
            Some(Value::String(s)) if s.is_empty() => Ok(ResponseShape::Empty),
            Some(Value::String(s)) => Ok(ResponseShape::PlainAnswer(s)),
            Some(_) => Err("field `choices[0].message.content` is not a string".to_string()),
        }
    }

    fn resolve(&self, shape: ResponseShape<'_>) -> Interpretation {
        match shape {
            ResponseShape::ToolRequested(calls) => {
                let mut events = Vec::with_capacity(calls.len() * 3);
                let mut replies = Vec::with_capacity(calls.len());
                for call in &calls {
                    let server = ServerKind::classify(&call.name);
                    tracing::info!(tool = %call.name, %server, "model requested a tool call");
                    events.push(OutputEvent::Diagnostic(format!(
                        "🔧 Calling tool: {}",
                        call.name
                    )));
                    events.push(OutputEvent::Diagnostic(format!(
                        "📋 Tool call requested: {} with args: {}",
                        call.name, call.arguments
                    )));
                    let reply = placeholder_reply(call);
                    events.push(OutputEvent::Reply(reply.clone()));
                    replies.push(reply);
                }
                Interpretation {
                    outcome: Ok(replies.join("\n")),
                    events,
                }
            }
            ResponseShape::PlainAnswer(content) => Interpretation {
                outcome: Ok(content.to_string()),
                events: vec![OutputEvent::Typewriter(content.to_string())],
            },
            ResponseShape::Empty => Interpretation {
                outcome: Ok(NO_CONTENT.to_string()),
                events: vec![OutputEvent::Notice(NO_CONTENT_NOTICE.to_string())],
            },
            ResponseShape::ApiError(message) => {
                tracing::warn!(%message, "API returned an error");
                Interpretation {
                    events: vec![OutputEvent::Notice(format!("Error: {message}"))],
                    outcome: Err(QueryFailure::api(message)),
                }
            }
        }
    }
}

/// `false`, `0`, `""` and `{}` count as absent, like a missing field.
fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

fn api_error_message(response: &Value) -> String {
    match response.pointer("/error/message") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => DEFAULT_API_ERROR.to_string(),
        Some(other) => other.to_string(),
    }
}

fn parse_tool_call(index: usize, call: &Value) -> Result<ToolCall, String> {
    let function = call
        .get("function")
        .filter(|f| f.is_object())
        .ok_or_else(|| format!("missing field `tool_calls[{index}].function`"))?;
    let name = function
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| format!("missing field `tool_calls[{index}].function.name`"))?;
    let arguments = match function.get("arguments") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => {
            return Err(format!(
                "missing field `tool_calls[{index}].function.arguments`"
            ))
        }
        Some(other) => other.to_string(),
    };
    Ok(ToolCall {
        name: name.to_string(),
        arguments,
    })
}

/// Canned reply standing in for a tool result.
pub fn placeholder_reply(call: &ToolCall) -> String {
    if call.name.contains("search") {
        format!(
            "I understand you want me to search for information about '{}'. While I can't perform web searches directly right now, I can help you with general knowledge questions. What would you like to know?",
            call.arguments
        )
    } else if call.name.contains("read") || call.name.contains("list") {
        "I can see you want me to access files or directories. I can help you with general questions and provide guidance on file operations, even if I can't directly access your filesystem.".to_string()
    } else {
        format!(
            "I received a request for the {} tool. I'm here to help with your questions and provide guidance, even if I can't execute certain system operations directly.",
            call.name
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureKind;
    use serde_json::json;

    fn call(name: &str, args: &str) -> Value {
        json!({"id": "call_1", "type": "function", "function": {"name": name, "arguments": args}})
    }

    #[test]
    fn test_server_classification() {
        assert_eq!(ServerKind::classify("web_search"), ServerKind::Web);
        assert_eq!(ServerKind::classify("run_command"), ServerKind::System);
        assert_eq!(ServerKind::classify("system_info"), ServerKind::System);
        assert_eq!(ServerKind::classify("read_file"), ServerKind::Filesystem);
        // "web" wins over "command"
        assert_eq!(ServerKind::classify("web_command"), ServerKind::Web);
    }

    #[test]
    fn test_placeholder_wording() {
        let search = placeholder_reply(&ToolCall {
            name: "web_search".into(),
            arguments: r#"{"q":"rust"}"#.into(),
        });
        assert!(search.contains(r#"about '{"q":"rust"}'"#));

        let list = placeholder_reply(&ToolCall {
            name: "list_directory".into(),
            arguments: "{}".into(),
        });
        assert!(list.starts_with("I can see you want me to access files"));

        let other = placeholder_reply(&ToolCall {
            name: "run_command".into(),
            arguments: "{}".into(),
        });
        assert!(other.contains("the run_command tool"));
    }

    #[test]
    fn test_single_mode_drops_extra_calls() {
        let resp = json!({"choices": [{"message": {"tool_calls": [
            call("read_file", "{}"),
            call("web_search", "{}"),
        ]}}]});
        let shape = Interpreter::default().classify(&resp).unwrap();
        match shape {
            ResponseShape::ToolRequested(calls) => {
                assert_eq!(calls.len(), 1);
                assert_eq!(calls[0].name, "read_file");
            }
            other => panic!("Expected ToolRequested, got {:?}", other),
        }
    }

    #[test]
    fn test_all_mode_answers_every_call() {
        let resp = json!({"choices": [{"message": {"tool_calls": [
            call("read_file", "{}"),
            call("web_search", "{}"),
        ]}}]});
        let result = Interpreter::new(ToolCallMode::All).interpret(&resp);
        assert_eq!(result.diagnostics().count(), 4);
        let text = result.outcome.unwrap();
        assert_eq!(text.lines().count(), 2);
    }

    #[test]
    fn test_tool_calls_take_precedence_over_content() {
        let resp = json!({"choices": [{"message": {
            "content": "let me check",
            "tool_calls": [call("run_command", "{\"cmd\":\"ls\"}")]
        }}]});
        let result = Interpreter::default().interpret(&resp);
        assert!(result.display_text().contains("run_command"));
        assert!(!result
            .events
            .iter()
            .any(|e| matches!(e, OutputEvent::Typewriter(_))));
    }

    #[test]
    fn test_empty_tool_calls_fall_through_to_content() {
        let resp = json!({"choices": [{"message": {"content": "hello", "tool_calls": []}}]});
        let shape = Interpreter::default().classify(&resp).unwrap();
        assert_eq!(shape, ResponseShape::PlainAnswer("hello"));
    }

    #[test]
    fn test_falsy_tool_calls_fall_through_to_content() {
        for tool_calls in [json!({}), json!(false), json!(""), json!(0)] {
            let resp = json!({"choices": [{"message": {"content": "hi", "tool_calls": tool_calls}}]});
            let result = Interpreter::default().interpret(&resp);
            assert_eq!(result.outcome, Ok("hi".to_string()));
        }
    }

    #[test]
    fn test_truthy_non_array_tool_calls_is_malformed() {
        let resp = json!({"choices": [{"message": {"content": "hi", "tool_calls": {"id": "x"}}}]});
        let result = Interpreter::default().interpret(&resp);
        assert_eq!(
            result.outcome.unwrap_err().kind,
            FailureKind::MalformedResponse
        );
    }

    #[test]
    fn test_null_content_is_empty() {
        let resp = json!({"choices": [{"message": {"role": "assistant", "content": null}}]});
        let result = Interpreter::default().interpret(&resp);
        assert_eq!(result.outcome, Ok(NO_CONTENT.to_string()));
    }

    #[test]
    fn test_missing_message_is_malformed() {
        let resp = json!({"choices": [{"index": 0}]});
        let result = Interpreter::default().interpret(&resp);
        let failure = result.outcome.unwrap_err();
        assert_eq!(failure.kind, FailureKind::MalformedResponse);
        assert!(failure.detail.contains("choices[0].message"));
    }

    #[test]
    fn test_tool_call_without_arguments_is_malformed() {
        let resp = json!({"choices": [{"message": {"tool_calls": [
            {"function": {"name": "web_search"}}
        ]}}]});
        let result = Interpreter::default().interpret(&resp);
        assert_eq!(
            result.outcome.unwrap_err().kind,
            FailureKind::MalformedResponse
        );
    }

    #[test]
    fn test_object_arguments_are_rendered_as_json() {
        let resp = json!({"choices": [{"message": {"tool_calls": [
            {"function": {"name": "web_search", "arguments": {"q": "tokio"}}}
        ]}}]});
        let result = Interpreter::default().interpret(&resp);
        assert!(result.display_text().contains(r#"'{"q":"tokio"}'"#));
    }

    #[test]
    fn test_empty_choices_is_api_error() {
        let resp = json!({"choices": [], "error": {"message": "quota exceeded"}});
        let result = Interpreter::default().interpret(&resp);
        assert_eq!(result.display_text(), "Error: quota exceeded");
        assert_eq!(result.outcome.unwrap_err().kind, FailureKind::Api);
    }

    #[test]
    fn test_tool_call_mode_from_str() {
        assert_eq!("single".parse::<ToolCallMode>(), Ok(ToolCallMode::Single));
        assert_eq!("ALL".parse::<ToolCallMode>(), Ok(ToolCallMode::All));
        assert!("some".parse::<ToolCallMode>().is_err());
    }
}
