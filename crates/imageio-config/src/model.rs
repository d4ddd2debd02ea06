// SPDX-FileCopyrightText: 2026 ImageIO Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the ImageIO plugin catalog.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level ImageIO configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// Both sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ImageIoConfig {
    /// Plugin discovery settings.
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Log output settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ImageIoConfig {
    /// Top-level tables.
    pub const SECTIONS: &'static [&'static str] = &["catalog", "logging"];
}

/// Keys accepted in `section`; the empty string names the top level.
pub fn known_keys(section: &str) -> Option<&'static [&'static str]> {
    match section {
        "" => Some(ImageIoConfig::SECTIONS),
        "catalog" => Some(CatalogConfig::KEYS),
        "logging" => Some(LoggingConfig::KEYS),
        _ => None,
    }
}

/// Plugin discovery configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogConfig {
    /// Searchpath used when the caller does not pass one.
    #[serde(default)]
    pub searchpath: String,

    /// Environment variable whose value is searched ahead of the searchpath.
    #[serde(default = "default_library_path_env")]
    pub library_path_env: String,

    /// Walk the searchpath again on every lookup miss.
    #[serde(default = "default_rescan_on_miss")]
    pub rescan_on_miss: bool,
}

impl CatalogConfig {
    /// Keys of the `[catalog]` table.
    pub const KEYS: &'static [&'static str] = &["searchpath", "library_path_env", "rescan_on_miss"];
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            searchpath: String::new(),
            library_path_env: default_library_path_env(),
            rescan_on_miss: default_rescan_on_miss(),
        }
    }
}

fn default_library_path_env() -> String {
    "IMAGEIO_LIBRARY_PATH".to_string()
}

fn default_rescan_on_miss() -> bool {
    true
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl LoggingConfig {
    /// Keys of the `[logging]` table.
    pub const KEYS: &'static [&'static str] = &["level"];
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config: ImageIoConfig = toml::from_str("").unwrap();
        assert_eq!(config, ImageIoConfig::default());
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let config: ImageIoConfig = toml::from_str(
            r#"
[catalog]
rescan_on_miss = false
"#,
        )
        .unwrap();
        assert!(!config.catalog.rescan_on_miss);
        assert_eq!(config.catalog.library_path_env, "IMAGEIO_LIBRARY_PATH");
        assert!(config.catalog.searchpath.is_empty());
        assert_eq!(config.logging.level, "info");
    }

    fn table_keys<T: Serialize>(value: &T) -> Vec<String> {
        let mut keys: Vec<String> = toml::Value::try_from(value)
            .unwrap()
            .as_table()
            .unwrap()
            .keys()
            .cloned()
            .collect();
        keys.sort();
        keys
    }

    fn sorted(keys: &[&str]) -> Vec<String> {
        let mut keys: Vec<String> = keys.iter().map(|k| k.to_string()).collect();
        keys.sort();
        keys
    }

    #[test]
    fn key_lists_match_serialized_model() {
        assert_eq!(table_keys(&ImageIoConfig::default()), sorted(ImageIoConfig::SECTIONS));
        assert_eq!(table_keys(&CatalogConfig::default()), sorted(CatalogConfig::KEYS));
        assert_eq!(table_keys(&LoggingConfig::default()), sorted(LoggingConfig::KEYS));
    }

    #[test]
    fn known_keys_by_section() {
        assert_eq!(known_keys("logging"), Some(LoggingConfig::KEYS));
        assert_eq!(known_keys(""), Some(ImageIoConfig::SECTIONS));
        assert_eq!(known_keys("plugins"), None);
    }

    #[test]
    fn unknown_section_is_rejected() {
        let result = toml::from_str::<ImageIoConfig>("[plugins]\npath = \"/opt\"\n");
        assert!(result.is_err());
    }
}
