// SPDX-FileCopyrightText: 2026 ImageIO Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.

use crate::diagnostic::ConfigError;
use crate::model::ImageIoConfig;

/// Accepted values for `logging.level`.
pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &ImageIoConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let env = config.catalog.library_path_env.trim();
    if env.is_empty() {
        errors.push(ConfigError::Validation {
            message: "catalog.library_path_env must not be empty".to_string(),
        });
    } else if env.contains('=') || env.contains('\0') {
        errors.push(ConfigError::Validation {
            message: format!(
                "catalog.library_path_env `{env}` is not a valid environment variable name"
            ),
        });
    }

    let level = config.logging.level.trim().to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "logging.level `{}` must be one of {}",
                config.logging.level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages(config: &ImageIoConfig) -> Vec<String> {
        validate_config(config)
            .unwrap_err()
            .into_iter()
            .map(|e| e.to_string())
            .collect()
    }

    #[test]
    fn default_config_validates() {
        assert!(validate_config(&ImageIoConfig::default()).is_ok());
    }

    #[test]
    fn empty_library_path_env_fails_validation() {
        let mut config = ImageIoConfig::default();
        config.catalog.library_path_env = "  ".to_string();
        let errors = messages(&config);
        assert!(errors.iter().any(|m| m.contains("library_path_env")));
    }

    #[test]
    fn equals_sign_in_library_path_env_fails_validation() {
        let mut config = ImageIoConfig::default();
        config.catalog.library_path_env = "A=B".to_string();
        let errors = messages(&config);
        assert!(errors.iter().any(|m| m.contains("`A=B`")));
    }

    #[test]
    fn level_is_case_insensitive() {
        let mut config = ImageIoConfig::default();
        config.logging.level = "DEBUG".to_string();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn all_errors_are_collected() {
        let mut config = ImageIoConfig::default();
        config.catalog.library_path_env = String::new();
        config.logging.level = "verbose".to_string();
        assert_eq!(messages(&config).len(), 2);
    }
}
