//! Reconstruction and output settings.
//!
//! A [`Config`] is attached to a [`Registry`](crate::registry::Registry) and
//! controls how flat representations are turned back into typed objects.
use crate::error::{GeostreamsError, Result};
use serde::de::Error;
use std::path::Path;

/// What to do with a nested map whose discriminator has no registered factory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UnknownTypePolicy {
    /// Keep the map as an untyped [`Value::Map`](crate::Value::Map).
    #[default]
    Preserve,
    /// Fail the whole reconstruction.
    Reject,
}

/// Registry configuration
///
/// # Example
///
/// ```rust
/// use geostreams::{Config, UnknownTypePolicy};
///
/// let json = r#"{
///     "unknown_types": "reject",
///     "max_depth": 16
/// }"#;
/// let config = Config::from_json(json).unwrap();
/// assert_eq!(config.unknown_types, UnknownTypePolicy::Reject);
/// assert!(!config.pretty_json);
/// ```
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub unknown_types: UnknownTypePolicy,

    /// Deepest nesting of maps and arrays accepted during reconstruction
    #[serde(default = "Config::default_max_depth")]
    pub max_depth: usize,

    /// Indent JSON written through [`json::to_string_with`](crate::json::to_string_with)
    #[serde(default)]
    pub pretty_json: bool,
}

impl Config {
    const fn default_max_depth() -> usize {
        128
    }

    pub fn with_unknown_types(mut self, policy: UnknownTypePolicy) -> Self {
        self.unknown_types = policy;
        self
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        assert!(depth > 0, "Max depth must be greater than zero");

        if depth > 10_000 {
            log::warn!(
                "Max depth of {} allows reconstruction recursion deep enough to exhaust the stack",
                depth
            );
        }

        self.max_depth = depth;
        self
    }

    pub fn with_pretty_json(mut self, pretty: bool) -> Self {
        self.pretty_json = pretty;
        self
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.max_depth == 0 {
            return Err("Max depth must be greater than zero".to_string());
        }

        Ok(())
    }

    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        let config: Config = serde_json::from_str(json)?;
        if let Err(e) = config.validate() {
            return Err(serde_json::Error::custom(e));
        }
        Ok(config)
    }

    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    #[cfg(feature = "toml")]
    pub fn from_toml(toml_str: &str) -> std::result::Result<Self, toml::de::Error> {
        let config: Config = toml::from_str(toml_str)?;
        if let Err(e) = config.validate() {
            return Err(toml::de::Error::custom(e));
        }
        Ok(config)
    }

    #[cfg(feature = "toml")]
    pub fn to_toml(&self) -> std::result::Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Load a configuration file, choosing the format from its extension.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Self::from_json(&contents)?),
            #[cfg(feature = "toml")]
            Some("toml") => Ok(Self::from_toml(&contents)?),
            other => Err(GeostreamsError::Config(format!(
                "unsupported configuration format: {}",
                other.unwrap_or("<none>")
            ))),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            unknown_types: UnknownTypePolicy::default(),
            max_depth: Self::default_max_depth(),
            pretty_json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.unknown_types, UnknownTypePolicy::Preserve);
        assert_eq!(config.max_depth, 128);
        assert!(!config.pretty_json);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_json_fills_defaults() {
        let config = Config::from_json("{}").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_from_json_rejects_unknown_fields_and_zero_depth() {
        assert!(Config::from_json(r#"{"bogus": 1}"#).is_err());
        assert!(Config::from_json(r#"{"max_depth": 0}"#).is_err());
    }

    #[test]
    fn test_json_roundtrip() {
        let config = Config::default()
            .with_unknown_types(UnknownTypePolicy::Reject)
            .with_max_depth(8)
            .with_pretty_json(true);
        let json = config.to_json().unwrap();
        assert_eq!(Config::from_json(&json).unwrap(), config);
    }

    #[cfg(feature = "toml")]
    #[test]
    fn test_toml_roundtrip() {
        let config = Config::default().with_max_depth(4);
        let text = config.to_toml().unwrap();
        assert_eq!(Config::from_toml(&text).unwrap(), config);
        assert!(Config::from_toml("max_depth = 0").is_err());
    }

    #[test]
    fn test_load_by_extension() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"unknown_types": "reject"}}"#).unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.unknown_types, UnknownTypePolicy::Reject);

        let other = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        assert!(matches!(
            Config::load(other.path()),
            Err(GeostreamsError::Config(_))
        ));
    }

    #[test]
    #[should_panic(expected = "Max depth must be greater than zero")]
    fn test_with_max_depth_zero_panics() {
        let _ = Config::default().with_max_depth(0);
    }
}
