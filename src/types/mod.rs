//! 类型系统模块：请求与工具的核心数据类型。
//!
//! # Types Module
//!
//! Strongly-typed representations of everything that crosses the API boundary.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`ToolDescriptor`] | Tool as listed by an MCP server (name + description) |
//! | [`ToolDefinition`] | Tool in the OpenAI function-calling schema |
//! | [`ToolCall`] | Function call requested by the model |
//! | [`Message`] | Chat message with role and text content |
//! | [`ChatRequest`] | Complete chat completions request body |
//!
//! ## Example
//!
//! ```rust
//! use openai_query::types::{Message, ToolDefinition, ToolDescriptor};
//!
//! let user = Message::user("What's in my home directory?");
//! let tool = ToolDefinition::from_descriptor(&ToolDescriptor::new(
//!     "list_directory",
//!     "List the entries of a directory",
//! ));
//! assert_eq!(tool.function.name, "list_directory");
//! ```

pub mod message;
pub mod request;
pub mod tool;

pub use message::{Message, MessageRole};
pub use request::ChatRequest;
pub use tool::{ToolCall, ToolDefinition, ToolDescriptor};
