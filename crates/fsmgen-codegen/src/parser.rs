//! Description file parser
//!
//! Reads JSON or YAML descriptions into [`Description`]. The format is picked
//! from the file extension.

use std::path::Path;

use fsmgen_core::Description;

use crate::error::{Error, Result};

/// Serialization format of a description
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// `.json`
    Json,
    /// `.yaml` / `.yml`
    Yaml,
}

impl Format {
    /// Pick the format from a file extension
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?;
        match ext.to_ascii_lowercase().as_str() {
            "json" => Some(Format::Json),
            "yaml" | "yml" => Some(Format::Yaml),
            _ => None,
        }
    }
}

/// Parser for description files
#[derive(Debug, Default, Clone, Copy)]
pub struct Parser;

impl Parser {
    /// Create a new parser
    pub fn new() -> Self {
        Self
    }

    /// Parse a description file
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<Description> {
        let path = path.as_ref();
        let format = Self::format_of(path)?;
        let content = std::fs::read_to_string(path)?;
        self.parse_str(&content, format)
    }

    /// Parse a description from text
    pub fn parse_str(&self, content: &str, format: Format) -> Result<Description> {
        let desc: Description = match format {
            Format::Json => serde_json::from_str(content)?,
            Format::Yaml => serde_yaml::from_str(content)?,
        };
        Ok(desc)
    }

    /// Format of `path`, or an error naming the file
    pub fn format_of(path: &Path) -> Result<Format> {
        Format::from_path(path).ok_or_else(|| Error::UnsupportedFormat {
            path: path.display().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("machine.json", Some(Format::Json))]
    #[case("machine.JSON", Some(Format::Json))]
    #[case("machine.yaml", Some(Format::Yaml))]
    #[case("dir/machine.yml", Some(Format::Yaml))]
    #[case("machine.toml", None)]
    #[case("machine", None)]
    fn test_format_from_path(#[case] path: &str, #[case] expected: Option<Format>) {
        assert_eq!(Format::from_path(path), expected);
    }

    #[test]
    fn test_parse_json_description() {
        let json = r#"{
            "name": "Runner",
            "package": "runner",
            "init": "idle",
            "states": [
                {"name": "idle", "transitions": [{"event": "start", "to": "running"}]},
                {"name": "running", "on": "onRunning"}
            ]
        }"#;
        let desc = Parser::new().parse_str(json, Format::Json).unwrap();

        assert_eq!(desc.name, "Runner");
        assert_eq!(desc.package.as_deref(), Some("runner"));
        assert_eq!(desc.states.len(), 2);
        assert_eq!(desc.states[0].transitions[0].to.as_deref(), Some("running"));
    }

    #[test]
    fn test_parse_yaml_description() {
        let yaml = r#"
name: Turnstile
init: locked
iface: TurnstileHooks
states:
  - name: locked
    transitions:
      - event: coin
        to: unlocked
        condition: coinAccepted
        action: countCoin
  - name: unlocked
    on: onUnlocked
"#;
        let desc = Parser::new().parse_str(yaml, Format::Yaml).unwrap();

        assert_eq!(desc.iface.as_deref(), Some("TurnstileHooks"));
        let transition = &desc.states[0].transitions[0];
        assert_eq!(transition.condition.as_deref(), Some("coinAccepted"));
        assert_eq!(transition.action.as_deref(), Some("countCoin"));
    }

    #[test]
    fn test_parse_invalid_json() {
        let result = Parser::new().parse_str("{\"name\": ", Format::Json);
        assert!(matches!(result, Err(Error::JsonError(_))));
    }

    #[test]
    fn test_parse_invalid_yaml() {
        let result = Parser::new().parse_str("this is not valid yaml: [", Format::Yaml);
        assert!(matches!(result, Err(Error::ParseError(_))));
    }

    #[test]
    fn test_parse_file_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("machine.toml");
        std::fs::write(&path, "name = 'x'").unwrap();

        let result = Parser::new().parse_file(&path);
        assert!(matches!(result, Err(Error::UnsupportedFormat { .. })));
    }

    #[test]
    fn test_parse_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("runner.yml");
        std::fs::write(&path, "name: Runner\ninit: idle\nstates:\n  - name: idle\n").unwrap();

        let desc = Parser::new().parse_file(&path).unwrap();
        assert_eq!(desc.name, "Runner");
    }
}
