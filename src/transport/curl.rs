use std::io::ErrorKind;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use super::{Transport, TransportError, DEFAULT_ENDPOINT, DEFAULT_TIMEOUT};

/// Issues the POST through an external `curl` process.
///
/// The body is piped through stdin (`--data-binary @-`) so large prompts never
/// hit argument length limits.
#[derive(Debug, Clone)]
pub struct CurlTransport {
    program: String,
    endpoint: String,
    timeout: Duration,
}

impl Default for CurlTransport {
    fn default() -> Self {
        Self {
            program: "curl".to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl CurlTransport {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }

    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn command(&self, api_key: &str) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("-s")
            .arg("-X")
            .arg("POST")
            .arg("-H")
            .arg("Content-Type: application/json")
            .arg("-H")
            .arg(format!("Authorization: Bearer {api_key}"))
            .arg("--data-binary")
            .arg("@-")
            .arg(&self.endpoint)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }

    async fn run(&self, body: &str, api_key: &str) -> Result<String, TransportError> {
        let mut child = self
            .command(api_key)
            .spawn()
            .map_err(|source| TransportError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let stdin = child.stdin.take();
        let write_body = async move {
            if let Some(mut stdin) = stdin {
                stdin.write_all(body.as_bytes()).await?;
                stdin.shutdown().await?;
            }
            Ok::<_, std::io::Error>(())
        };
        // Feed stdin while draining stdout so neither pipe can fill up and stall.
        let (written, output) = tokio::join!(write_body, child.wait_with_output());
        let output = output?;

        if !output.status.success() {
            return Err(TransportError::NonZeroExit {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        match written {
            // The child may exit successfully without consuming the whole body.
            Err(e) if e.kind() == ErrorKind::BrokenPipe => {
                tracing::debug!(error = %e, "child closed stdin before the body was written");
            }
            other => other?,
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[async_trait]
impl Transport for CurlTransport {
    async fn send(&self, body: &str, api_key: &str) -> Result<String, TransportError> {
        tracing::info!(endpoint = %self.endpoint, bytes = body.len(), "sending chat completion request");
        // Dropping the future on timeout drops the child, which kills it.
        let result = tokio::time::timeout(self.timeout, self.run(body, api_key))
            .await
            .map_err(|_| TransportError::Timeout(self.timeout))?;
        match &result {
            Ok(text) => tracing::info!(bytes = text.len(), "received response"),
            Err(e) => tracing::warn!(error = %e, "request failed"),
        }
        result
    }
}
