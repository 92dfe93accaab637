//! Parser configuration.
//!
//! Loaded from TOML or built in code. A missing field falls back to the
//! defaults in [`crate::utils::config`].
//!
//! ```toml
//! label = "Delta"
//! separator = " = "
//! policy = "skip"
//! ```

use crate::utils::config::{DEFAULT_LABEL, DEFAULT_SEPARATOR};
use crate::utils::error::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Shape of a trace line: `<label><separator><value-text>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceFormat {
    pub label: String,
    pub separator: String,
}

impl Default for TraceFormat {
    fn default() -> Self {
        Self {
            label: DEFAULT_LABEL.to_string(),
            separator: DEFAULT_SEPARATOR.to_string(),
        }
    }
}

impl TraceFormat {
    /// Format with the given label and the default separator
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Default::default()
        }
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Text stripped from the start of every trace line
    pub fn prefix(&self) -> String {
        format!("{}{}", self.label, self.separator)
    }

    /// # Errors
    /// * `ParseError::InvalidConfig` - the prefix is empty or spans lines
    pub fn validate(&self) -> Result<(), ParseError> {
        let prefix = self.prefix();

        if prefix.is_empty() {
            return Err(ParseError::InvalidConfig(
                "label and separator cannot both be empty".to_string(),
            ));
        }

        if prefix.contains('\n') || prefix.contains('\r') {
            return Err(ParseError::InvalidConfig(
                "label and separator cannot contain line breaks".to_string(),
            ));
        }

        Ok(())
    }
}

/// What to do with a line that does not match the trace shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MalformedPolicy {
    /// Fail the whole parse, reporting the offending line
    #[default]
    Abort,
    /// Log the line, leave it out of the records and keep going
    Skip,
}

impl FromStr for MalformedPolicy {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "abort" => Ok(MalformedPolicy::Abort),
            "skip" => Ok(MalformedPolicy::Skip),
            other => Err(ParseError::InvalidConfig(format!(
                "unknown malformed-line policy '{}' (expected 'abort' or 'skip')",
                other
            ))),
        }
    }
}

impl fmt::Display for MalformedPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MalformedPolicy::Abort => f.write_str("abort"),
            MalformedPolicy::Skip => f.write_str("skip"),
        }
    }
}

/// Complete parser configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    pub label: String,
    pub separator: String,
    pub policy: MalformedPolicy,
}

impl Default for ParserConfig {
    fn default() -> Self {
        let format = TraceFormat::default();
        Self {
            label: format.label,
            separator: format.separator,
            policy: MalformedPolicy::default(),
        }
    }
}

impl ParserConfig {
    pub fn format(&self) -> TraceFormat {
        TraceFormat {
            label: self.label.clone(),
            separator: self.separator.clone(),
        }
    }
}

/// Load a parser configuration from a TOML file
///
/// # Errors
/// * `ParseError::ConfigRead` - file cannot be read
/// * `ParseError::ConfigToml` - TOML is invalid
/// * `ParseError::InvalidConfig` - the resulting format is unusable
///
/// # Example
/// ```ignore
/// let config = load_parser_config("tracecap.toml")?;
/// let parser = TraceParser::from_config(&config)?;
/// ```
pub fn load_parser_config(path: impl AsRef<Path>) -> Result<ParserConfig, ParseError> {
    let contents = fs::read_to_string(path)?;
    let config: ParserConfig = toml::from_str(&contents)?;
    config.format().validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prefix() {
        assert_eq!(TraceFormat::default().prefix(), "Delta = ");
        assert_eq!(TraceFormat::new("X").with_separator(": ").prefix(), "X: ");
    }

    #[test]
    fn test_validate_rejects_empty_prefix() {
        let format = TraceFormat::new("").with_separator("");
        assert!(matches!(format.validate(), Err(ParseError::InvalidConfig(_))));
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!("skip".parse::<MalformedPolicy>().unwrap(), MalformedPolicy::Skip);
        assert_eq!("ABORT".parse::<MalformedPolicy>().unwrap(), MalformedPolicy::Abort);
        assert!("ignore".parse::<MalformedPolicy>().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: ParserConfig = toml::from_str("policy = \"skip\"").unwrap();
        assert_eq!(config.label, "Delta");
        assert_eq!(config.separator, " = ");
        assert_eq!(config.policy, MalformedPolicy::Skip);
    }
}
