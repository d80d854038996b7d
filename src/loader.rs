//! Prompt and tool-list loading.
//!
//! Unreadable inputs are downgraded to empty defaults in [`InputMode::Lenient`]
//! and rejected in [`InputMode::Strict`]. A tools file that *is* valid JSON but
//! does not describe tools is rejected in both modes.

use std::io::ErrorKind;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::ToolDescriptor;
use crate::{Error, ErrorContext, Result};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    /// Missing or unreadable inputs become an empty prompt / empty tool list.
    #[default]
    Lenient,
    /// Missing or unreadable inputs are errors.
    Strict,
}

impl std::str::FromStr for InputMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lenient" => Ok(InputMode::Lenient),
            "strict" => Ok(InputMode::Strict),
            other => Err(format!("unknown input mode: {other}")),
        }
    }
}

/// Reads the prompt file and the tools file.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputLoader {
    mode: InputMode,
}

impl InputLoader {
    pub fn new(mode: InputMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> InputMode {
        self.mode
    }

    pub fn load_prompt(&self, path: &Path) -> Result<String> {
        match std::fs::read_to_string(path) {
            Ok(text) => Ok(text),
            Err(e) => self.downgrade(path, "prompt", &e).map(|_| String::new()),
        }
    }

    pub fn load_tools(&self, path: &Path) -> Result<Vec<ToolDescriptor>> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) => return self.downgrade(path, "tools", &e).map(|_| Vec::new()),
        };

        let value: Value = match serde_json::from_str(&raw) {
            Ok(v) => v,
            Err(e) => {
                return match self.mode {
                    InputMode::Lenient => {
                        tracing::warn!(path = %path.display(), error = %e, "tools file is not valid JSON; continuing without tools");
                        Ok(Vec::new())
                    }
                    InputMode::Strict => Err(Error::input_with_context(
                        "tools file is not valid JSON",
                        ErrorContext::new()
                            .with_field_path(path.display().to_string())
                            .with_details(e.to_string())
                            .with_source("tools_loader"),
                    )),
                };
            }
        };

        parse_tools(&value)
    }

    fn downgrade(&self, path: &Path, what: &str, err: &std::io::Error) -> Result<()> {
        match self.mode {
            InputMode::Lenient => {
                if err.kind() == ErrorKind::NotFound {
                    tracing::debug!(path = %path.display(), "{what} file not found; using empty default");
                } else {
                    tracing::warn!(path = %path.display(), error = %err, "{what} file unreadable; using empty default");
                }
                Ok(())
            }
            InputMode::Strict => Err(Error::input_with_context(
                format!("cannot read {what} file"),
                ErrorContext::new()
                    .with_field_path(path.display().to_string())
                    .with_details(err.to_string())
                    .with_source(format!("{what}_loader")),
            )),
        }
    }
}

/// Convert a parsed tools document into descriptors.
///
/// Every entry must carry a string `name` and `description`; the first bad
/// entry fails the whole list.
pub fn parse_tools(value: &Value) -> Result<Vec<ToolDescriptor>> {
    let entries = value.as_array().ok_or_else(|| {
        Error::input_with_context(
            "tools file must contain a JSON array",
            ErrorContext::new()
                .with_field_path("tools")
                .with_source("tools_loader"),
        )
    })?;

    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            ToolDescriptor::deserialize(entry).map_err(|e| {
                Error::input_with_context(
                    "malformed tool descriptor",
                    ErrorContext::new()
                        .with_field_path(format!("tools[{i}]"))
                        .with_details(e.to_string())
                        .with_source("tools_loader"),
                )
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_tools_ok() {
        let tools = parse_tools(&json!([
            {"name": "read_file", "description": "Read a file", "inputSchema": {}},
            {"name": "web_search", "description": "Search"}
        ]))
        .unwrap();
        assert_eq!(tools.len(), 2);
        assert_eq!(tools[1].name, "web_search");
    }

    #[test]
    fn test_parse_tools_rejects_missing_name() {
        let err = parse_tools(&json!([
            {"name": "read_file", "description": "Read a file"},
            {"description": "nameless"}
        ]))
        .unwrap_err();
        assert!(matches!(err, Error::Input { .. }));
        assert_eq!(
            err.context().unwrap().field_path.as_deref(),
            Some("tools[1]")
        );
    }

    #[test]
    fn test_parse_tools_rejects_object() {
        let err = parse_tools(&json!({"name": "read_file"})).unwrap_err();
        assert!(err.to_string().contains("JSON array"));
    }

    #[test]
    fn test_lenient_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let garbage = dir.path().join("tools.json");
        std::fs::write(&garbage, "not json at all").unwrap();

        let loader = InputLoader::default();
        assert_eq!(loader.load_prompt(&dir.path().join("missing.txt")).unwrap(), "");
        assert!(loader.load_tools(&dir.path().join("missing.json")).unwrap().is_empty());
        assert!(loader.load_tools(&garbage).unwrap().is_empty());
    }

    #[test]
    fn test_strict_rejects_unreadable_inputs() {
        let dir = tempfile::tempdir().unwrap();
        let garbage = dir.path().join("tools.json");
        std::fs::write(&garbage, "not json at all").unwrap();

        let loader = InputLoader::new(InputMode::Strict);
        let err = loader.load_prompt(&dir.path().join("missing.txt")).unwrap_err();
        assert_eq!(err.context().unwrap().source.as_deref(), Some("prompt_loader"));
        assert!(loader.load_tools(&garbage).is_err());
    }

    #[test]
    fn test_prompt_read_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prompt.txt");
        std::fs::write(&path, "line one\nline two\n").unwrap();
        let prompt = InputLoader::new(InputMode::Strict).load_prompt(&path).unwrap();
        assert_eq!(prompt, "line one\nline two\n");
    }

    #[test]
    fn test_input_mode_from_str() {
        assert_eq!("Strict".parse::<InputMode>(), Ok(InputMode::Strict));
        assert!("loose".parse::<InputMode>().is_err());
    }
}
