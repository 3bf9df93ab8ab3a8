// SPDX-FileCopyrightText: 2026 CampusFix Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the CampusFix order lifecycle manager.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level CampusFix configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CampusfixConfig {
    /// Shop identity and operator settings.
    #[serde(default)]
    pub service: ServiceConfig,

    /// Local storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Remote document store settings.
    #[serde(default)]
    pub remote: RemoteConfig,

    /// Live tracking view settings.
    #[serde(default)]
    pub tracker: TrackerConfig,
}

/// Shop identity and operator configuration.
///
/// The operator fields feed the notification composer; customer-facing
/// texts are signed with the operator's name and title.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    /// Display name of the repair service.
    #[serde(default = "default_service_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Name of the operator handling repairs.
    #[serde(default = "default_operator_name")]
    pub operator_name: String,

    /// Title the operator signs notifications with.
    #[serde(default = "default_operator_title")]
    pub operator_title: String,

    /// Phone number status notifications are addressed from.
    #[serde(default = "default_operator_phone")]
    pub operator_phone: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: default_service_name(),
            log_level: default_log_level(),
            operator_name: default_operator_name(),
            operator_title: default_operator_title(),
            operator_phone: default_operator_phone(),
        }
    }
}

fn default_service_name() -> String {
    "CampusFix UENR".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_operator_name() -> String {
    "Philip".to_string()
}

fn default_operator_title() -> String {
    "Lead Technician".to_string()
}

fn default_operator_phone() -> String {
    "233241234567".to_string()
}

/// Local storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Directory holding the order document and admin session flag.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Maximum update-log entries retained per order; oldest dropped first.
    #[serde(default = "default_max_update_entries")]
    pub max_update_entries: usize,

    /// Warn when a write is based on a stale read of the document.
    /// The write still proceeds (last write wins).
    #[serde(default = "default_optimistic_lock")]
    pub optimistic_lock: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            max_update_entries: default_max_update_entries(),
            optimistic_lock: default_optimistic_lock(),
        }
    }
}

fn default_data_dir() -> String {
    dirs::data_dir()
        .map(|p| p.join("campusfix"))
        .unwrap_or_else(|| std::path::PathBuf::from("campusfix-data"))
        .to_string_lossy()
        .into_owned()
}

fn default_max_update_entries() -> usize {
    50
}

fn default_optimistic_lock() -> bool {
    true
}

/// Remote document store configuration.
///
/// When `enabled` is false, or `bin_id`/`api_key` are absent, the shop runs
/// local-only and every write marks the document as needing sync.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RemoteConfig {
    /// Mirror writes to the remote document store.
    #[serde(default = "default_remote_enabled")]
    pub enabled: bool,

    /// Base URL of the remote document API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Identifier of the remote document bin. `None` disables the remote.
    #[serde(default)]
    pub bin_id: Option<String>,

    /// API key for the remote document store. `None` disables the remote.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            enabled: default_remote_enabled(),
            base_url: default_base_url(),
            bin_id: None,
            api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_remote_enabled() -> bool {
    true
}

fn default_base_url() -> String {
    "https://api.jsonbin.io/v3/b".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

/// Live tracking view configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TrackerConfig {
    /// Seconds between automatic refreshes while following an order.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval_secs(),
        }
    }
}

fn default_poll_interval_secs() -> u64 {
    15
}

impl RemoteConfig {
    /// Whether the remote backend is fully configured and switched on.
    pub fn is_active(&self) -> bool {
        self.enabled && self.bin_id.is_some() && self.api_key.is_some()
    }
}
