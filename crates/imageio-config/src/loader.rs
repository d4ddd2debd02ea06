// SPDX-FileCopyrightText: 2026 ImageIO Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./imageio.toml` > `~/.config/imageio/imageio.toml` >
//! `/etc/imageio/imageio.toml` with environment variable overrides via
//! `IMAGEIO_CATALOG_*` and `IMAGEIO_LOGGING_*`.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::ImageIoConfig;

/// System-wide configuration file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/imageio/imageio.toml";

/// Configuration file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "imageio.toml";

/// Sections that may be overridden from the environment.
const ENV_SECTIONS: [&str; 2] = ["catalog", "logging"];

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/imageio/imageio.toml` (system-wide)
/// 3. `~/.config/imageio/imageio.toml` (user XDG config)
/// 4. `./imageio.toml` (local directory)
/// 5. `IMAGEIO_CATALOG_*` / `IMAGEIO_LOGGING_*` environment variables
pub fn load_config() -> Result<ImageIoConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ImageIoConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_FILE))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<ImageIoConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ImageIoConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<ImageIoConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ImageIoConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// `~/.config/imageio/imageio.toml`, if the platform has a config dir.
pub fn user_config_path() -> Option<std::path::PathBuf> {
    dirs::config_dir().map(|d| d.join("imageio").join(LOCAL_CONFIG_FILE))
}

/// Create the environment variable provider.
///
/// Only `IMAGEIO_CATALOG_*` and `IMAGEIO_LOGGING_*` are read. The plugin
/// library path (`IMAGEIO_LIBRARY_PATH`) shares the prefix and must not reach
/// the strict model. Keys are mapped with an explicit section split so
/// `IMAGEIO_CATALOG_RESCAN_ON_MISS` becomes `catalog.rescan_on_miss`.
fn env_provider() -> Env {
    Env::prefixed("IMAGEIO_")
        .filter(|key| section_of(key.as_str()).is_some())
        .map(|key| {
            let key_str = key.as_str().to_ascii_lowercase();
            match section_of(&key_str) {
                Some(section) => {
                    format!("{section}.{}", &key_str[section.len() + 1..]).into()
                }
                None => key_str.into(),
            }
        })
}

fn section_of(key: &str) -> Option<&'static str> {
    ENV_SECTIONS.into_iter().find(|section| {
        key.len() > section.len() + 1
            && key
                .get(..section.len())
                .is_some_and(|prefix| prefix.eq_ignore_ascii_case(section))
            && key.as_bytes()[section.len()] == b'_'
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_prefix_is_recognized() {
        assert_eq!(section_of("catalog_searchpath"), Some("catalog"));
        assert_eq!(section_of("LOGGING_LEVEL"), Some("logging"));
    }

    #[test]
    fn unrelated_keys_are_filtered() {
        assert_eq!(section_of("library_path"), None);
        assert_eq!(section_of("catalog"), None);
        assert_eq!(section_of("catalog_"), None);
        assert_eq!(section_of("catalogue_x"), None);
    }
}
