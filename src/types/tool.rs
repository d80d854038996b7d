//! Tool calling definitions for the OpenAI function-calling schema

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// A tool as advertised by an MCP server (`tools/list` entry).
///
/// Only `name` and `description` are required; anything else the server sends
/// (e.g. `inputSchema`) is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
}

impl ToolDescriptor {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Tool definition (for function calling)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    #[serde(rename = "type")]
    pub tool_type: String, // "function"
    pub function: FunctionDefinition,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDefinition {
    pub name: String,
    pub description: String,
    pub parameters: Value, // JSON Schema
}

impl ToolDefinition {
    /// Wrap a descriptor into a function definition with the shared `args` schema.
    ///
    /// The descriptor's own input schema never reaches the model: every tool
    /// takes a single opaque `args` object.
    pub fn from_descriptor(tool: &ToolDescriptor) -> Self {
        ToolDefinition {
            tool_type: "function".to_string(),
            function: FunctionDefinition {
                name: tool.name.clone(),
                description: tool.description.clone(),
                parameters: args_schema(),
            },
        }
    }
}

/// The parameter schema shared by every advertised tool.
pub fn args_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "args": {
                "type": "object",
                "description": "Arguments for the tool"
            }
        },
        "required": ["args"]
    })
}

/// Tool call (invocation requested by the model)
///
/// `arguments` holds the raw text the model produced; it is echoed back, never parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
    pub name: String,
    pub arguments: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_ignores_extra_fields() {
        let raw = r#"{"name":"read_file","description":"Read a file","inputSchema":{"type":"object"}}"#;
        let tool: ToolDescriptor = serde_json::from_str(raw).unwrap();
        assert_eq!(tool, ToolDescriptor::new("read_file", "Read a file"));
    }

    #[test]
    fn descriptor_requires_description() {
        let raw = r#"{"name":"read_file"}"#;
        assert!(serde_json::from_str::<ToolDescriptor>(raw).is_err());
    }

    #[test]
    fn definition_discards_source_schema() {
        let def = ToolDefinition::from_descriptor(&ToolDescriptor::new("web_search", "Search"));
        let v = serde_json::to_value(&def).unwrap();
        assert_eq!(v["type"], "function");
        assert_eq!(v["function"]["name"], "web_search");
        assert_eq!(v["function"]["parameters"]["required"], json!(["args"]));
        assert_eq!(
            v["function"]["parameters"]["properties"]["args"]["type"],
            "object"
        );
    }
}
