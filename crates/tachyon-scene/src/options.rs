//! Parser configuration.

use std::path::Path;

use serde::Deserialize;

use crate::error::{ParseError, Result};

/// Options controlling a scene-file parse.
///
/// Every field has a default, so a TOML file only needs the keys it changes:
///
/// ```toml
/// max_include_depth = 8
/// strict_end_of_input = true
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParseOptions {
    /// Initial texture-table capacity.
    pub texture_capacity: usize,
    /// Optional ceiling on texture-table capacity.
    ///
    /// Reaching it switches the table into its degraded mode, where each new
    /// definition overwrites the last slot.
    pub texture_capacity_limit: Option<usize>,
    /// Maximum nesting depth for `INCLUDE` directives.
    pub max_include_depth: usize,
    /// Treat end of input without `END_SCENE` as an error at the top level.
    pub strict_end_of_input: bool,
    /// Output file name issued after `RESOLUTION`.
    pub default_output_file: String,
    /// Verbosity level issued after `RESOLUTION`.
    pub default_verbosity: i32,
    /// Longest token accepted by the reader, in bytes.
    pub max_token_len: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            texture_capacity: 512,
            texture_capacity_limit: None,
            max_include_depth: 64,
            strict_end_of_input: false,
            default_output_file: "outfile.tga".into(),
            default_verbosity: 0,
            max_token_len: 1024,
        }
    }
}

impl ParseOptions {
    /// Default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse options from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| ParseError::config("<string>", e.to_string()))
    }

    /// Load options from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| ParseError::config(path.display().to_string(), e.to_string()))?;
        toml::from_str(&text)
            .map_err(|e| ParseError::config(path.display().to_string(), e.to_string()))
    }

    /// Set the initial texture-table capacity.
    pub fn texture_capacity(mut self, capacity: usize) -> Self {
        self.texture_capacity = capacity;
        self
    }

    /// Set the texture-table capacity ceiling.
    pub fn texture_capacity_limit(mut self, limit: Option<usize>) -> Self {
        self.texture_capacity_limit = limit;
        self
    }

    /// Set the maximum `INCLUDE` nesting depth.
    pub fn max_include_depth(mut self, depth: usize) -> Self {
        self.max_include_depth = depth;
        self
    }

    /// Require `END_SCENE` at the top level.
    pub fn strict_end_of_input(mut self, strict: bool) -> Self {
        self.strict_end_of_input = strict;
        self
    }

    /// Set the default output file name.
    pub fn default_output_file(mut self, name: impl Into<String>) -> Self {
        self.default_output_file = name.into();
        self
    }

    /// Set the default verbosity level.
    pub fn default_verbosity(mut self, level: i32) -> Self {
        self.default_verbosity = level;
        self
    }

    /// Set the longest accepted token.
    pub fn max_token_len(mut self, len: usize) -> Self {
        self.max_token_len = len;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_defaults() {
        let opts = ParseOptions::default();
        assert_eq!(opts.texture_capacity, 512);
        assert_eq!(opts.texture_capacity_limit, None);
        assert_eq!(opts.default_output_file, "outfile.tga");
        assert!(!opts.strict_end_of_input);
    }

    #[test]
    fn test_partial_toml() {
        let opts = ParseOptions::from_toml_str(
            "max_include_depth = 4\ntexture_capacity_limit = 1024\n",
        )
        .unwrap();
        assert_eq!(opts.max_include_depth, 4);
        assert_eq!(opts.texture_capacity_limit, Some(1024));
        assert_eq!(opts.texture_capacity, 512);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = ParseOptions::from_toml_str("bogus = 1").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn test_builder() {
        let opts = ParseOptions::new()
            .strict_end_of_input(true)
            .default_output_file("frame.tga");
        assert!(opts.strict_end_of_input);
        assert_eq!(opts.default_output_file, "frame.tga");
    }
}
