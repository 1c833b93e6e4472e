//! TOML configuration.
//!
//! ```toml
//! render_manifest = "renders.json"
//!
//! [settings]
//! widgetPrefix = "Gen"
//! nullSafe = false
//! ```
//!
//! Keys under `[settings]` use the document settings names and win over the
//! values stored in the document.

use std::fs;
use std::path::Path;

use log::{debug, info};
use serde::Deserialize;

use dartboard_core::Settings;

use crate::error::{CliError, Result};

const DEFAULT_MANIFEST: &str = "render_manifest.json";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Render manifest file name, relative to the output directory.
    pub render_manifest: String,
    pub settings: toml::Table,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            render_manifest: DEFAULT_MANIFEST.to_string(),
            settings: toml::Table::new(),
        }
    }
}

impl CliConfig {
    /// Overlay the configured keys onto `settings`.
    pub fn apply(&self, settings: Settings) -> Result<Settings> {
        if self.settings.is_empty() {
            return Ok(settings);
        }
        let mut value = serde_json::to_value(settings)?;
        if let serde_json::Value::Object(map) = &mut value {
            for (key, v) in &self.settings {
                debug!("settings override {} = {}", key, v);
                map.insert(key.clone(), serde_json::to_value(v)?);
            }
        }
        Ok(serde_json::from_value(value)?)
    }
}

/// Load the configuration file, or the defaults when none is given.
pub fn load_config(path: Option<impl AsRef<Path>>) -> Result<CliConfig> {
    let Some(path) = path else {
        debug!("No configuration file given, using defaults");
        return Ok(CliConfig::default());
    };
    let path = path.as_ref();
    info!("Loading configuration from {}", path.display());
    let content = fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(toml::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = load_config(None::<&str>).unwrap();
        assert_eq!(config.render_manifest, "render_manifest.json");
        assert_eq!(config.apply(Settings::default()).unwrap(), Settings::default());
    }

    #[test]
    fn test_settings_override() {
        let config: CliConfig = toml::from_str(
            r#"
            [settings]
            widgetPrefix = "Gen"
            nullSafe = false
            fontMap = { "Helvetica Neue" = "Roboto" }
            "#,
        )
        .unwrap();
        let settings = config.apply(Settings::default()).unwrap();
        assert_eq!(settings.widget_prefix, "Gen");
        assert!(!settings.null_safe);
        assert_eq!(settings.flutter_font("Helvetica Neue"), "Roboto");
        // untouched keys keep their values
        assert!(settings.include_name_comments);
    }

    #[test]
    fn test_bad_override_type() {
        let config: CliConfig = toml::from_str("[settings]\nnullSafe = \"yes\"").unwrap();
        assert!(matches!(
            config.apply(Settings::default()),
            Err(CliError::Settings(_))
        ));
    }
}
