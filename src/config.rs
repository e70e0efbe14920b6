//! Plugin options as handed over by the host build tool or read from a TOML file.
//!
//! These are the raw, unvalidated settings. [`LocalImagesOptions`] is built
//! from them exactly once at registration time.
//!
//! [`LocalImagesOptions`]: crate::core::LocalImagesOptions

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::core::LocalImagesError;
use crate::env::EnvConfig;

/// Raw plugin options, keyed the same way as the host configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PluginOptions {
    /// Root output directory of the site build
    pub dist_path: Option<String>,
    /// Sub-path under `dist_path` for localized assets, also the public URL prefix
    pub asset_path: Option<String>,
    /// CSS selector for image-like nodes
    pub selector: Option<String>,
    /// Comma-separated, ordered list of attributes holding the image reference
    pub attribute: Option<String>,
    /// Re-use previously downloaded assets instead of fetching again
    pub use_existing: bool,
    /// Log every saved asset
    pub verbose: bool,
    /// Per-resource download timeout in seconds
    pub timeout: Option<u64>,
    /// User-Agent header for downloads
    pub user_agent: Option<String>,
}

impl PluginOptions {
    /// Parses options from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, LocalImagesError> {
        toml::from_str(content).map_err(|e| {
            LocalImagesError::Configuration(format!("unable to parse plugin options: {e}"))
        })
    }

    /// Reads options from a TOML file.
    pub fn from_path(path: &Path) -> Result<Self, LocalImagesError> {
        let content = fs::read_to_string(path).map_err(|e| {
            LocalImagesError::Configuration(format!(
                "unable to read configuration file {}: {e}",
                path.display()
            ))
        })?;
        Self::from_toml_str(&content)
    }

    /// Layers `overrides` on top of `self`; set values and enabled flags win.
    pub fn merge(self, overrides: PluginOptions) -> Self {
        Self {
            dist_path: overrides.dist_path.or(self.dist_path),
            asset_path: overrides.asset_path.or(self.asset_path),
            selector: overrides.selector.or(self.selector),
            attribute: overrides.attribute.or(self.attribute),
            use_existing: overrides.use_existing || self.use_existing,
            verbose: overrides.verbose || self.verbose,
            timeout: overrides.timeout.or(self.timeout),
            user_agent: overrides.user_agent.or(self.user_agent),
        }
    }

    /// Applies values coming from `LOCAL_IMAGES_*` environment variables.
    pub fn with_env(self, env: &EnvConfig) -> Self {
        Self {
            use_existing: env.use_existing.unwrap_or(self.use_existing),
            timeout: env.timeout.or(self.timeout),
            user_agent: env.user_agent.clone().or(self.user_agent),
            ..self
        }
    }
}

/// Splits a comma-separated attribute list, keeping order and dropping blanks
pub fn parse_attribute_list(value: &str) -> Vec<String> {
    let mut attributes: Vec<String> = Vec::new();

    for attribute in value.split(',') {
        let attribute = attribute.trim().to_ascii_lowercase();
        if !attribute.is_empty() && !attributes.contains(&attribute) {
            attributes.push(attribute);
        }
    }

    attributes
}
