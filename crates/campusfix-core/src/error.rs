// SPDX-FileCopyrightText: 2026 CampusFix Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the CampusFix order lifecycle manager.

use thiserror::Error;

use crate::types::{OrderStatus, TransitionAction};

/// A single failed field check from intake validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Canonical (camelCase) name of the offending field.
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// The primary error type used across the CampusFix workspace.
#[derive(Debug, Error)]
pub enum CampusfixError {
    /// Configuration errors (invalid TOML, missing required fields).
    #[error("configuration error: {0}")]
    Config(String),

    /// Intake validation failed. Carries every failing field, not just the
    /// first, so a form can surface all problems in one submission.
    #[error("invalid intake: {}", format_field_errors(.fields))]
    Validation { fields: Vec<FieldError> },

    /// No order exists under the given code.
    #[error("order not found: {code}")]
    NotFound { code: String },

    /// The requested action is not legal from the order's current stage.
    /// The order is left unmodified.
    #[error("cannot apply {action} while order is in \"{status}\"")]
    IllegalTransition {
        action: TransitionAction,
        status: OrderStatus,
    },

    /// The order is already Ready for Pickup; no further transitions exist.
    #[error("order {code} is already Ready for Pickup")]
    TerminalState { code: String },

    /// A persistence backend is unreachable or timed out. Recoverable:
    /// callers fall back to the local backend and queue the write for sync.
    #[error("{backend} backend unavailable: {message}")]
    BackendUnavailable {
        backend: &'static str,
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Local storage errors (I/O, serialization, corrupt document).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl CampusfixError {
    /// Convenience constructor for intake validation failures.
    pub fn validation(fields: Vec<FieldError>) -> Self {
        CampusfixError::Validation { fields }
    }

    /// Whether the caller may retry or fall back after this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            CampusfixError::BackendUnavailable { .. } | CampusfixError::Timeout { .. }
        )
    }
}

fn format_field_errors(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(FieldError::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
