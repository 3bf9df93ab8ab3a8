// SPDX-FileCopyrightText: 2026 CampusFix Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./campusfix.toml` > `~/.config/campusfix/campusfix.toml`
//! > `/etc/campusfix/campusfix.toml` with environment variable overrides via
//! the `CAMPUSFIX_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::CampusfixConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/campusfix/campusfix.toml` (system-wide)
/// 3. `~/.config/campusfix/campusfix.toml` (user XDG config)
/// 4. `./campusfix.toml` (local directory)
/// 5. `CAMPUSFIX_*` environment variables
pub fn load_config() -> Result<CampusfixConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(CampusfixConfig::default()))
        .merge(Toml::file("/etc/campusfix/campusfix.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("campusfix/campusfix.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("campusfix.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<CampusfixConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(CampusfixConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<CampusfixConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(CampusfixConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// CRITICAL: Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names. For example, `CAMPUSFIX_REMOTE_API_KEY`
/// must map to `remote.api_key`, not `remote.api.key`.
fn env_provider() -> Env {
    Env::prefixed("CAMPUSFIX_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: CAMPUSFIX_REMOTE_API_KEY -> "remote_api_key"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("service_", "service.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("remote_", "remote.", 1)
            .replacen("tracker_", "tracker.", 1);
        mapped.into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_config_overrides_defaults() {
        let config = load_config_from_str(
            r#"
[service]
name = "North Campus Repairs"

[remote]
bin_id = "64f0c1"
api_key = "$2a$10$key"
"#,
        )
        .unwrap();
        assert_eq!(config.service.name, "North Campus Repairs");
        assert_eq!(config.remote.bin_id.as_deref(), Some("64f0c1"));
        // Untouched sections keep their defaults.
        assert_eq!(config.storage.max_update_entries, 50);
    }

    #[test]
    fn env_vars_override_file_values() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "campusfix.toml",
                r#"
[tracker]
poll_interval_secs = 30
"#,
            )?;
            jail.set_env("CAMPUSFIX_TRACKER_POLL_INTERVAL_SECS", "5");
            let config = load_config()?;
            assert_eq!(config.tracker.poll_interval_secs, 5);
            Ok(())
        });
    }

    #[test]
    fn underscore_keys_map_to_the_right_section() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("CAMPUSFIX_REMOTE_API_KEY", "$2a$10$fromenv");
            jail.set_env("CAMPUSFIX_STORAGE_MAX_UPDATE_ENTRIES", "25");
            let config = load_config()?;
            assert_eq!(config.remote.api_key.as_deref(), Some("$2a$10$fromenv"));
            assert_eq!(config.storage.max_update_entries, 25);
            Ok(())
        });
    }
}
