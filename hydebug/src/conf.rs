//! TOML configuration for debug streams.
//!
//! ```toml
//! line_width = 80
//!
//! [streams]
//! solver = "solver.log"
//! states = "/tmp/states.log"
//! ```
//!
//! Relative stream paths in a configuration file are resolved against the directory of
//! that file.
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{DebugError, DebugResult};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DebugConfig {
    /// Column at which [`DebugStreams::write_line`](crate::DebugStreams::write_line)
    /// breaks messages.
    #[serde(default)]
    pub line_width: Option<usize>,

    /// Stream name to output file.
    #[serde(default)]
    pub streams: BTreeMap<String, PathBuf>,
}

impl DebugConfig {
    /// Parse a configuration; `file` only labels errors.
    pub fn from_toml_str(text: &str, file: &str) -> DebugResult<Self> {
        toml::from_str(text).map_err(|source| DebugError::ConfigParse {
            source,
            file: file.to_string(),
        })
    }

    pub fn from_file(path: impl AsRef<Path>) -> DebugResult<Self> {
        let path = path.as_ref();
        let file = path.display().to_string();
        let text = std::fs::read_to_string(path).map_err(|source| DebugError::ConfigRead {
            source,
            file: file.clone(),
        })?;

        let mut config = Self::from_toml_str(&text, &file)?;
        if let Some(base) = path.parent() {
            for stream_path in config.streams.values_mut() {
                if stream_path.is_relative() {
                    *stream_path = base.join(&*stream_path);
                }
            }
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_streams_and_width() {
        let config = DebugConfig::from_toml_str(
            r#"
            line_width = 72

            [streams]
            solver = "solver.log"
            states = "/tmp/states.log"
            "#,
            "inline",
        )
        .unwrap();

        assert_eq!(config.line_width, Some(72));
        assert_eq!(config.streams.len(), 2);
        assert_eq!(config.streams["solver"], PathBuf::from("solver.log"));
    }

    #[test]
    fn everything_is_optional() {
        assert_eq!(
            DebugConfig::from_toml_str("", "empty").unwrap(),
            DebugConfig::default()
        );
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = DebugConfig::from_toml_str("colour = true", "bad.toml").unwrap_err();
        assert!(matches!(&err, DebugError::ConfigParse { file, .. } if file == "bad.toml"));
    }

    #[test]
    fn missing_file_is_reported() {
        let err = DebugConfig::from_file("/nonexistent/hydebug.toml").unwrap_err();
        assert!(matches!(err, DebugError::ConfigRead { .. }));
    }
}
