//! Interpreter configuration

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Default ceiling on expression nesting, shared by the parser and evaluator
pub const DEFAULT_MAX_DEPTH: usize = 1000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Maximum nesting depth of expressions before `RecursionLimit` is raised
    pub max_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl Config {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Parse a TOML document such as `max_depth = 64`; missing keys keep their defaults
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_from_toml() {
        let config = Config::from_toml_str("max_depth = 64").unwrap();
        assert_eq!(config.max_depth, 64);
    }

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(Config::from_toml_str("").unwrap(), Config::default());
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = Config::from_toml_str("depth = 3").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }
}
