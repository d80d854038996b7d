//! Transport layer: hands the serialized request to something that speaks HTTP.

pub mod curl;

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

pub use curl::CurlTransport;

pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to start HTTP client '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error talking to HTTP client: {0}")]
    Io(#[from] std::io::Error),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("HTTP client exited with {}: {stderr}", exit_label(*.code))]
    NonZeroExit { code: Option<i32>, stderr: String },
}

fn exit_label(code: Option<i32>) -> String {
    match code {
        Some(c) => format!("status {c}"),
        None => "a signal".to_string(),
    }
}

/// Sends one chat completion request body and returns the raw response text.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, body: &str, api_key: &str) -> Result<String, TransportError>;
}
