//! # Router Configuration
//!
//! [`RouterConfig`] controls how a router mounts and matches its routes. It can be
//! built in code, deserialized from YAML, or loaded from environment variables.
//!
//! ## Environment Variables
//!
//! | Variable | Field | Default |
//! |----------|-------|---------|
//! | `CHAINROUTER_PREFIX` | `prefix` | `/` |
//! | `CHAINROUTER_LEGACY` | `legacy_mode` | `false` |
//! | `CHAINROUTER_SENSITIVE` | `matcher.sensitive` | `false` |
//! | `CHAINROUTER_STRICT` | `matcher.strict` | `false` |
//!
//! ## YAML
//!
//! ```yaml
//! prefix: /api
//! legacy_mode: false
//! sensitive: false
//! strict: false
//! end: true
//! ```

use std::env;
use std::path::Path;

use anyhow::{Context as _, Result};
use serde::{Deserialize, Serialize};

use crate::handler::Handler;
use crate::path::{normalize_prefix, MatchOptions};

/// Configuration of one router instance
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Namespace every route of the router is mounted under
    pub prefix: String,
    /// Whether [`Router::handler`](crate::Router::handler) hands out the
    /// suspend-style (legacy) dispatcher
    #[serde(alias = "legacy")]
    pub legacy_mode: bool,
    /// Options forwarded verbatim to the path matcher
    #[serde(flatten)]
    pub matcher: MatchOptions,
    /// Runs when no route matches; the surrounding continuation runs otherwise
    #[serde(skip)]
    pub not_found: Option<Handler>,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            prefix: "/".to_string(),
            legacy_mode: false,
            matcher: MatchOptions::default(),
            not_found: None,
        }
    }
}

fn env_flag(name: &str) -> Option<bool> {
    env::var(name).ok().and_then(|v| match v.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    })
}

impl RouterConfig {
    /// Default configuration under `prefix`
    #[must_use]
    pub fn with_prefix(prefix: impl AsRef<str>) -> Self {
        Self {
            prefix: normalize_prefix(prefix.as_ref()),
            ..Self::default()
        }
    }

    /// Set the not-found handler
    #[must_use]
    pub fn not_found(mut self, handler: Handler) -> Self {
        self.not_found = Some(handler);
        self
    }

    /// Set legacy mode
    #[must_use]
    pub fn legacy(mut self, legacy: bool) -> Self {
        self.legacy_mode = legacy;
        self
    }

    /// Load configuration from environment variables, falling back to defaults
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            prefix: env::var("CHAINROUTER_PREFIX")
                .map(|p| normalize_prefix(&p))
                .unwrap_or(defaults.prefix),
            legacy_mode: env_flag("CHAINROUTER_LEGACY").unwrap_or(defaults.legacy_mode),
            matcher: MatchOptions {
                sensitive: env_flag("CHAINROUTER_SENSITIVE")
                    .unwrap_or(defaults.matcher.sensitive),
                strict: env_flag("CHAINROUTER_STRICT").unwrap_or(defaults.matcher.strict),
                end: defaults.matcher.end,
            },
            not_found: None,
        }
    }

    /// Parse configuration from a YAML document
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not valid YAML for this type.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let mut config: Self =
            serde_yaml::from_str(yaml).context("Failed to parse router configuration")?;
        config.prefix = normalize_prefix(&config.prefix);
        Ok(config)
    }

    /// Load configuration from a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read router configuration {}", path.display()))?;
        Self::from_yaml_str(&text)
    }
}
