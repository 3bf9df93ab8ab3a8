// SPDX-FileCopyrightText: 2026 CampusFix Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as well-formed URLs, non-empty paths, and positive
//! intervals.

use crate::diagnostic::ConfigError;
use crate::model::CampusfixConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &CampusfixConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.service.name.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "service.name must not be empty".to_string(),
        });
    }

    let level = config.service.log_level.trim();
    if !matches!(level, "trace" | "debug" | "info" | "warn" | "error") {
        errors.push(ConfigError::Validation {
            message: format!(
                "service.log_level must be one of trace, debug, info, warn, error; got `{level}`"
            ),
        });
    }

    if config.storage.data_dir.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.data_dir must not be empty".to_string(),
        });
    }

    if config.storage.max_update_entries == 0 {
        errors.push(ConfigError::Validation {
            message: "storage.max_update_entries must be at least 1".to_string(),
        });
    }

    let base_url = config.remote.base_url.trim();
    if base_url.is_empty() {
        errors.push(ConfigError::Validation {
            message: "remote.base_url must not be empty".to_string(),
        });
    } else if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
        errors.push(ConfigError::Validation {
            message: format!("remote.base_url must start with http:// or https://, got `{base_url}`"),
        });
    }

    if config.remote.timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "remote.timeout_secs must be at least 1".to_string(),
        });
    }

    // A bin without a key (or the reverse) is a half-configured remote;
    // catch it at startup instead of failing the first sync.
    if config.remote.enabled {
        match (&config.remote.bin_id, &config.remote.api_key) {
            (Some(_), None) => errors.push(ConfigError::Validation {
                message: "remote.bin_id is set but remote.api_key is missing".to_string(),
            }),
            (None, Some(_)) => errors.push(ConfigError::Validation {
                message: "remote.api_key is set but remote.bin_id is missing".to_string(),
            }),
            _ => {}
        }
    }

    if config.tracker.poll_interval_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "tracker.poll_interval_secs must be at least 1".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
