//! Runtime configuration.
//!
//! Defaults reproduce the fixed request parameters. A YAML file named by
//! `OPENAI_QUERY_CONFIG` may override them, and `OPENAI_QUERY_*` environment
//! variables override both.

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::builder::{ChatParams, DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_TEMPERATURE, SYSTEM_PROMPT};
use crate::interpreter::{PacingConfig, ToolCallMode};
use crate::loader::InputMode;
use crate::transport::{CurlTransport, DEFAULT_ENDPOINT, DEFAULT_TIMEOUT};
use crate::{Error, ErrorContext, Result};

pub const CONFIG_PATH_ENV: &str = "OPENAI_QUERY_CONFIG";

/// Every variable read by [`QueryConfig::apply_overrides`], with a short
/// description for usage output.
pub const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("OPENAI_QUERY_ENDPOINT", "Chat completions URL"),
    ("OPENAI_QUERY_CURL", "curl executable (default curl)"),
    ("OPENAI_QUERY_MODEL", "Model id (default gpt-4)"),
    ("OPENAI_QUERY_TIMEOUT_SECS", "Request timeout (default 30)"),
    ("OPENAI_QUERY_MAX_TOKENS", "max_tokens (default 1500)"),
    ("OPENAI_QUERY_TEMPERATURE", "temperature (default 0.3)"),
    ("OPENAI_QUERY_INPUT_MODE", "lenient | strict"),
    ("OPENAI_QUERY_TOOL_CALLS", "single | all"),
    ("OPENAI_QUERY_PACING", "none | fixed[:ms] | adaptive[:budget_ms]"),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    pub endpoint: String,
    pub curl_program: String,
    pub timeout_secs: u64,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f64,
    pub system_prompt: String,
    pub input_mode: InputMode,
    pub tool_call_mode: ToolCallMode,
    pub pacing: PacingConfig,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            curl_program: "curl".to_string(),
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            system_prompt: SYSTEM_PROMPT.to_string(),
            input_mode: InputMode::default(),
            tool_call_mode: ToolCallMode::default(),
            pacing: PacingConfig::default(),
        }
    }
}

impl QueryConfig {
    /// Defaults, then the optional config file, then environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) if !path.trim().is_empty() => Self::from_yaml_file(path.trim())?,
            _ => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::configuration_with_context(
                "cannot read config file",
                ErrorContext::new()
                    .with_field_path(path.display().to_string())
                    .with_details(e.to_string())
                    .with_source("config_file"),
            )
        })?;
        Self::from_yaml_str(&content).map_err(|e| {
            Error::configuration_with_context(
                "invalid config file",
                ErrorContext::new()
                    .with_field_path(path.display().to_string())
                    .with_details(e.to_string())
                    .with_source("config_file"),
            )
        })
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Apply `OPENAI_QUERY_*` overrides from `lookup`. Unparseable values are
    /// logged and skipped.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("OPENAI_QUERY_ENDPOINT") {
            self.endpoint = v;
        }
        if let Some(v) = lookup("OPENAI_QUERY_CURL") {
            self.curl_program = v;
        }
        if let Some(v) = lookup("OPENAI_QUERY_MODEL") {
            self.model = v;
        }
        override_parsed(&lookup, "OPENAI_QUERY_TIMEOUT_SECS", &mut self.timeout_secs);
        override_parsed(&lookup, "OPENAI_QUERY_MAX_TOKENS", &mut self.max_tokens);
        override_parsed(&lookup, "OPENAI_QUERY_TEMPERATURE", &mut self.temperature);
        override_parsed(&lookup, "OPENAI_QUERY_INPUT_MODE", &mut self.input_mode);
        override_parsed(&lookup, "OPENAI_QUERY_TOOL_CALLS", &mut self.tool_call_mode);
        override_parsed(&lookup, "OPENAI_QUERY_PACING", &mut self.pacing);
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn chat_params(&self) -> ChatParams {
        ChatParams {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            system_prompt: self.system_prompt.clone(),
        }
    }

    pub fn transport(&self) -> CurlTransport {
        CurlTransport::new(self.endpoint.clone())
            .with_program(self.curl_program.clone())
            .with_timeout(self.timeout())
    }
}

fn override_parsed<T, F>(lookup: &F, key: &str, slot: &mut T)
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else { return };
    match raw.trim().parse::<T>() {
        Ok(v) => *slot = v,
        Err(e) => tracing::warn!(key, value = %raw, error = %e, "ignoring invalid environment override"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn test_defaults_match_fixed_request_fields() {
        let cfg = QueryConfig::default();
        assert_eq!(cfg.chat_params(), ChatParams::default());
        assert_eq!(cfg.timeout(), Duration::from_secs(30));
        assert_eq!(cfg.input_mode, InputMode::Lenient);
        assert_eq!(cfg.tool_call_mode, ToolCallMode::Single);
    }

    #[test]
    fn test_env_overrides() {
        let mut cfg = QueryConfig::default();
        cfg.apply_overrides(lookup(&[
            ("OPENAI_QUERY_MODEL", "gpt-4o"),
            ("OPENAI_QUERY_TIMEOUT_SECS", "5"),
            ("OPENAI_QUERY_INPUT_MODE", "strict"),
            ("OPENAI_QUERY_TOOL_CALLS", "all"),
            ("OPENAI_QUERY_PACING", "none"),
        ]));
        assert_eq!(cfg.model, "gpt-4o");
        assert_eq!(cfg.timeout_secs, 5);
        assert_eq!(cfg.input_mode, InputMode::Strict);
        assert_eq!(cfg.tool_call_mode, ToolCallMode::All);
        assert_eq!(cfg.pacing, PacingConfig::None);
    }

    #[test]
    fn test_invalid_env_values_are_ignored() {
        let mut cfg = QueryConfig::default();
        cfg.apply_overrides(lookup(&[
            ("OPENAI_QUERY_MAX_TOKENS", "lots"),
            ("OPENAI_QUERY_TEMPERATURE", "0.9"),
        ]));
        assert_eq!(cfg.max_tokens, DEFAULT_MAX_TOKENS);
        assert_eq!(cfg.temperature, 0.9);
    }

    #[test]
    fn test_override_table_lists_every_variable_read() {
        let seen = std::cell::RefCell::new(Vec::new());
        QueryConfig::default().apply_overrides(|key| {
            seen.borrow_mut().push(key.to_string());
            None
        });
        let listed: Vec<String> = ENV_OVERRIDES.iter().map(|(k, _)| k.to_string()).collect();
        assert_eq!(seen.into_inner(), listed);
    }

    #[test]
    fn test_partial_yaml() {
        let cfg = QueryConfig::from_yaml_str(
            "model: gpt-4o-mini\ninput_mode: strict\npacing:\n  kind: adaptive\n  budget_ms: 1500\n",
        )
        .unwrap();
        assert_eq!(cfg.model, "gpt-4o-mini");
        assert_eq!(cfg.input_mode, InputMode::Strict);
        assert_eq!(
            cfg.pacing,
            PacingConfig::Adaptive {
                delay_ms: 8,
                budget_ms: 1500
            }
        );
        assert_eq!(cfg.max_tokens, DEFAULT_MAX_TOKENS);
    }
}
