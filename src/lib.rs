//! # openai-query
//!
//! 命令行适配器：读取提示词与 MCP 工具列表，调用 chat completions 接口并渲染结果。
//!
//! Command-line adapter that reads a prompt and a list of MCP tool descriptors,
//! sends them to an OpenAI-compatible chat completions endpoint through an
//! external `curl` process, and renders the answer on stdout.
//!
//! ## Overview
//!
//! The crate is two pure components wired together by a thin session layer:
//!
//! - **Request builder** ([`builder`]): prompt + tools → [`ChatRequest`]. Every
//!   tool is advertised with the same opaque `args` object schema.
//! - **Response interpreter** ([`interpreter`]): response JSON → tagged outcome
//!   plus console output events. Tool calls are answered with a placeholder;
//!   nothing is executed.
//!
//! ## Quick Start
//!
//! ```rust
//! use openai_query::builder::build;
//! use openai_query::interpreter::Interpreter;
//! use openai_query::types::ToolDescriptor;
//!
//! let request = build("What's new in Rust?", &[ToolDescriptor::new("web_search", "Search the web")]);
//! assert_eq!(request.tool_count(), 1);
//!
//! let response = serde_json::json!({"choices": [{"message": {"content": "Lots."}}]});
//! let result = Interpreter::default().interpret(&response);
//! assert_eq!(result.display_text(), "Lots.");
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`types`] | Messages, tools, request body |
//! | [`builder`] | Request construction |
//! | [`interpreter`] | Response classification and pacing strategies |
//! | [`render`] | Console output of interpretation events |
//! | [`loader`] | Prompt / tools file loading |
//! | [`transport`] | External HTTP client invocation |
//! | [`config`] | Defaults, YAML file and environment overrides |
//! | [`session`] | One full request/response cycle |

pub mod builder;
pub mod config;
pub mod interpreter;
pub mod loader;
pub mod render;
pub mod session;
pub mod transport;
pub mod types;

pub use builder::{ChatParams, RequestBuilder};
pub use config::QueryConfig;
pub use interpreter::{Interpretation, Interpreter, OutputEvent, ToolCallMode};
pub use loader::{InputLoader, InputMode};
pub use session::{QueryArgs, QuerySession};
pub use transport::{CurlTransport, Transport, TransportError};
pub use types::{ChatRequest, Message, MessageRole, ToolCall, ToolDefinition, ToolDescriptor};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext, FailureKind, QueryFailure};
