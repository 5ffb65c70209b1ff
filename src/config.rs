//! Checker configuration.

use serde::{Deserialize, Serialize};

/// Controls which checks run and whether verification runs at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckerConfig {
    /// When false, `run` returns success without visiting the graph.
    /// Defaults to on in debug builds and off in release builds.
    pub enabled: bool,
    /// Catalog entries to leave out, by name.
    pub skip_checks: Vec<String>,
    /// Whether a copy region without exactly one live input is a failure
    /// rather than a logged observation.
    pub strict_copy_regions: bool,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            enabled: cfg!(debug_assertions),
            skip_checks: Vec::new(),
            strict_copy_regions: true,
        }
    }
}

impl CheckerConfig {
    /// Default configuration with verification forced on.
    pub fn enabled() -> Self {
        Self {
            enabled: true,
            ..Self::default()
        }
    }

    /// Default configuration with verification forced off.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Adds `name` to the skipped checks.
    pub fn skip(mut self, name: impl Into<String>) -> Self {
        self.skip_checks.push(name.into());
        self
    }

    pub fn is_skipped(&self, name: &str) -> bool {
        self.skip_checks.iter().any(|skipped| skipped == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_follows_build_mode() {
        let config = CheckerConfig::default();
        assert_eq!(config.enabled, cfg!(debug_assertions));
        assert!(config.skip_checks.is_empty());
        assert!(config.strict_copy_regions);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let bytes = serde_cbor::to_vec(&serde_cbor::Value::Map(Default::default())).unwrap();
        let config: CheckerConfig = serde_cbor::from_slice(&bytes).unwrap();
        assert_eq!(config, CheckerConfig::default());
    }

    #[test]
    fn roundtrips_through_cbor() {
        let config = CheckerConfig::enabled().skip("PhiArity");
        let bytes = serde_cbor::to_vec(&config).unwrap();
        let back: CheckerConfig = serde_cbor::from_slice(&bytes).unwrap();
        assert_eq!(back, config);
        assert!(back.is_skipped("PhiArity"));
        assert!(!back.is_skipped("IfProjections"));
    }
}
