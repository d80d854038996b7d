//! One request/response cycle: load inputs, build, send, interpret.

use std::path::PathBuf;

use serde_json::Value;

use crate::builder::RequestBuilder;
use crate::config::QueryConfig;
use crate::interpreter::{Interpretation, Interpreter};
use crate::loader::InputLoader;
use crate::transport::Transport;
use crate::Result;

/// The three positional arguments of the command line.
#[derive(Debug, Clone)]
pub struct QueryArgs {
    pub prompt_file: PathBuf,
    pub tools_file: PathBuf,
    pub api_key: String,
}

impl QueryArgs {
    /// Expects exactly `<content_file> <tools_file> <api_key>`.
    pub fn from_positional(args: &[String]) -> Option<Self> {
        match args {
            [prompt, tools, key] => Some(Self {
                prompt_file: PathBuf::from(prompt),
                tools_file: PathBuf::from(tools),
                api_key: key.clone(),
            }),
            _ => None,
        }
    }
}

pub struct QuerySession<T: Transport> {
    loader: InputLoader,
    builder: RequestBuilder,
    interpreter: Interpreter,
    transport: T,
}

impl<T: Transport> QuerySession<T> {
    pub fn new(config: &QueryConfig, transport: T) -> Self {
        Self {
            loader: InputLoader::new(config.input_mode),
            builder: RequestBuilder::new(config.chat_params()),
            interpreter: Interpreter::new(config.tool_call_mode),
            transport,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Run one round trip.
    ///
    /// Only problems found before the request is sent (bad tool descriptors,
    /// strict-mode input errors) come back as `Err`. Everything after that is
    /// folded into the returned [`Interpretation`].
    pub async fn run(&self, args: &QueryArgs) -> Result<Interpretation> {
        let prompt = self.loader.load_prompt(&args.prompt_file)?;
        let tools = self.loader.load_tools(&args.tools_file)?;

        let request = self.builder.build(&prompt, &tools);
        let body = request.to_json()?;
        tracing::debug!(
            model = %request.model,
            tools = request.tool_count(),
            prompt_chars = prompt.chars().count(),
            "built chat request"
        );

        let raw = match self.transport.send(&body, &args.api_key).await {
            Ok(raw) => raw,
            Err(e) => return Ok(Interpretation::transport_failure(e.to_string())),
        };

        Ok(self.interpret_raw(&raw))
    }

    /// Decode and interpret raw response text.
    pub fn interpret_raw(&self, raw: &str) -> Interpretation {
        match serde_json::from_str::<Value>(raw) {
            Ok(response) => self.interpreter.interpret(&response),
            Err(e) => {
                tracing::warn!(error = %e, "response is not valid JSON");
                Interpretation::malformed_response(e.to_string())
            }
        }
    }
}
