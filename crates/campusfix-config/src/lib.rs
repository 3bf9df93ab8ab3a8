// SPDX-FileCopyrightText: 2026 CampusFix Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the CampusFix order lifecycle manager.
//!
//! Provides TOML configuration parsing with strict validation
//! (`deny_unknown_fields`), XDG file hierarchy lookup, environment variable
//! overrides, and Elm-style diagnostic error rendering with typo suggestions.
//!
//! # Usage
//!
//! ```no_run
//! use campusfix_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("Service: {}", config.service.name);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

pub use diagnostic::{render_errors, ConfigError};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::{CampusfixConfig, RemoteConfig, ServiceConfig, StorageConfig, TrackerConfig};

/// Load configuration from the XDG hierarchy and validate it.
///
/// This is the high-level entry point that:
/// 1. Loads config from TOML files + env vars via Figment
/// 2. On success: runs post-deserialization validation
/// 3. On Figment error: converts to rich miette diagnostics with typo suggestions
///
/// Returns either a valid `CampusfixConfig` or a list of diagnostic errors.
pub fn load_and_validate() -> Result<CampusfixConfig, Vec<ConfigError>> {
    match loader::load_config() {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => {
            // Read TOML source files for error source span information
            let toml_sources = collect_toml_sources();
            Err(diagnostic::figment_to_config_errors(err, &toml_sources))
        }
    }
}

/// Load configuration from a specific TOML string and validate it.
///
/// Useful for testing and explicit configuration.
pub fn load_and_validate_str(toml_content: &str) -> Result<CampusfixConfig, Vec<ConfigError>> {
    match loader::load_config_from_str(toml_content) {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => {
            let sources = vec![("<inline>".to_string(), toml_content.to_string())];
            Err(diagnostic::figment_to_config_errors(err, &sources))
        }
    }
}

/// Collect TOML source file contents for error span resolution.
fn collect_toml_sources() -> Vec<(String, String)> {
    let mut sources = Vec::new();

    // Local config
    if let Ok(content) = std::fs::read_to_string("campusfix.toml") {
        let path = std::env::current_dir()
            .map(|d| d.join("campusfix.toml").display().to_string())
            .unwrap_or_else(|_| "campusfix.toml".to_string());
        sources.push((path, content));
    }

    // XDG user config
    if let Some(config_dir) = dirs::config_dir() {
        let path = config_dir.join("campusfix/campusfix.toml");
        if let Ok(content) = std::fs::read_to_string(&path) {
            sources.push((path.display().to_string(), content));
        }
    }

    // System config
    let system_path = std::path::Path::new("/etc/campusfix/campusfix.toml");
    if let Ok(content) = std::fs::read_to_string(system_path) {
        sources.push((system_path.display().to_string(), content));
    }

    sources
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_config_with_typo_produces_suggestion() {
        let err = load_and_validate_str(
            r#"
[remote]
bin_di = "64f0c1"
"#,
        )
        .unwrap_err();
        assert!(err.iter().any(|e| matches!(
            e,
            ConfigError::UnknownKey { key, suggestion, .. }
                if key == "bin_di" && suggestion.as_deref() == Some("bin_id")
        )));
    }

    #[test]
    fn inline_config_validation_errors_surface() {
        let err = load_and_validate_str(
            r#"
[storage]
max_update_entries = 0
"#,
        )
        .unwrap_err();
        assert!(err
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("max_update_entries"))));
    }

    #[test]
    fn empty_inline_config_yields_defaults() {
        let config = load_and_validate_str("").unwrap();
        assert_eq!(config.service.name, "CampusFix UENR");
        assert!(!config.remote.is_active());
    }
}
