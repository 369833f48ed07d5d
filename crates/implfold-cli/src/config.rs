use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{convert_io_error, CliError};

/// Looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "implfold.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub input: InputConfig,
    pub output: OutputConfig,
    pub diagnostics: DiagnosticsConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Lines starting with this are ignored. Empty disables comments.
    pub comment_prefix: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            comment_prefix: "#".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Caption of a collapsed toggle
    pub show_label: String,
    /// Caption of an expanded toggle
    pub hide_label: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            show_label: "Show Generated variadic implementations".to_string(),
            hide_label: "Hide Generated variadic implementations".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// The listing as a reader sees it, hidden entries behind toggles
    Text,
    /// One block per group with canonical trees
    Tree,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnosticsConfig {
    /// Render a diagnostic for every signature that fails to parse
    pub report_parse_errors: bool,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            report_parse_errors: true,
        }
    }
}

impl Config {
    /// Load `path`, or `implfold.toml` if present. An explicit path must exist.
    pub fn load(path: Option<&Path>) -> Result<Self, CliError> {
        let (path, required) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };
        if !required && !path.exists() {
            debug!("no {} found, using defaults", DEFAULT_CONFIG_FILE);
            return Ok(Self::default());
        }
        let contents =
            std::fs::read_to_string(&path).map_err(|e| convert_io_error(e, path.clone()))?;
        let config = Self::parse(&contents).map_err(|source| CliError::ConfigError {
            path: path.clone(),
            source,
        })?;
        debug!("loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn parse(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(Config::parse("").unwrap(), Config::default());
    }

    #[test]
    fn test_partial_tables_keep_other_defaults() {
        let config = Config::parse(
            r#"
            [output]
            format = "tree"

            [diagnostics]
            report_parse_errors = false
            "#,
        )
        .unwrap();
        assert_eq!(config.output.format, OutputFormat::Tree);
        assert_eq!(config.output.show_label, "Show Generated variadic implementations");
        assert!(!config.diagnostics.report_parse_errors);
        assert_eq!(config.input.comment_prefix, "#");
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        assert!(Config::parse("[output]\nformat = \"html\"").is_err());
    }

    #[test]
    fn test_missing_default_file_is_not_an_error() {
        // The test binary runs from the crate directory, which has no implfold.toml.
        assert_eq!(Config::load(None).unwrap(), Config::default());
        assert!(Config::load(Some(Path::new("does/not/exist.toml"))).is_err());
    }
}
