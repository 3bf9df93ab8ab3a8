// SPDX-FileCopyrightText: 2026 CampusFix Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types for the CampusFix order lifecycle: status, urgency, and
//! transition enums, step states, and update-log entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Lifecycle stage of a repair order.
///
/// The five stages form a single linear order with no branching and no
/// backward transitions. Progress percentages are fixed per stage and are
/// never derived from elapsed time or any other signal.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum OrderStatus {
    #[strum(serialize = "Order Received")]
    #[serde(rename = "Order Received")]
    OrderReceived,
    #[strum(serialize = "Diagnosis Complete")]
    #[serde(rename = "Diagnosis Complete")]
    DiagnosisComplete,
    #[strum(serialize = "Repair In Progress")]
    #[serde(rename = "Repair In Progress")]
    RepairInProgress,
    #[strum(serialize = "Repair Complete")]
    #[serde(rename = "Repair Complete")]
    RepairComplete,
    #[strum(serialize = "Ready for Pickup")]
    #[serde(rename = "Ready for Pickup")]
    ReadyForPickup,
}

impl OrderStatus {
    /// Fixed progress percentage for this stage.
    pub fn progress(self) -> u8 {
        match self {
            OrderStatus::OrderReceived => 10,
            OrderStatus::DiagnosisComplete => 30,
            OrderStatus::RepairInProgress => 50,
            OrderStatus::RepairComplete => 80,
            OrderStatus::ReadyForPickup => 100,
        }
    }

    /// The stage that follows this one in the linear order, if any.
    pub fn next(self) -> Option<OrderStatus> {
        match self {
            OrderStatus::OrderReceived => Some(OrderStatus::DiagnosisComplete),
            OrderStatus::DiagnosisComplete => Some(OrderStatus::RepairInProgress),
            OrderStatus::RepairInProgress => Some(OrderStatus::RepairComplete),
            OrderStatus::RepairComplete => Some(OrderStatus::ReadyForPickup),
            OrderStatus::ReadyForPickup => None,
        }
    }

    /// Whether this stage accepts no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::ReadyForPickup)
    }
}

/// Customer-declared priority tier. Controls the estimated-completion offset
/// computed once at order creation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize, Default,
)]
pub enum UrgencyLevel {
    #[default]
    Standard,
    Express,
    Emergency,
}

impl UrgencyLevel {
    /// Offset added to the creation time to derive `estimatedCompletion`.
    pub fn completion_offset(self) -> chrono::Duration {
        match self {
            UrgencyLevel::Standard => chrono::Duration::hours(72),
            UrgencyLevel::Express => chrono::Duration::hours(24),
            UrgencyLevel::Emergency => chrono::Duration::hours(6),
        }
    }

    /// Short human label for the expected turnaround, shown in views.
    pub fn lead_time(self) -> &'static str {
        match self {
            UrgencyLevel::Standard => "2-3 days",
            UrgencyLevel::Express => "same day",
            UrgencyLevel::Emergency => "4-6 hours",
        }
    }
}

/// A named action the admin surface can request against an order.
///
/// Each action is legal from exactly one stage (the one immediately
/// preceding its target in the linear order).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum TransitionAction {
    #[strum(serialize = "completeDiagnosis")]
    #[serde(rename = "completeDiagnosis")]
    CompleteDiagnosis,
    #[strum(serialize = "startRepair")]
    #[serde(rename = "startRepair")]
    StartRepair,
    #[strum(serialize = "completeRepair")]
    #[serde(rename = "completeRepair")]
    CompleteRepair,
    #[strum(serialize = "markReadyForPickup")]
    #[serde(rename = "markReadyForPickup")]
    MarkReadyForPickup,
}

impl TransitionAction {
    /// The only stage this action may be applied from.
    pub fn source_status(self) -> OrderStatus {
        match self {
            TransitionAction::CompleteDiagnosis => OrderStatus::OrderReceived,
            TransitionAction::StartRepair => OrderStatus::DiagnosisComplete,
            TransitionAction::CompleteRepair => OrderStatus::RepairInProgress,
            TransitionAction::MarkReadyForPickup => OrderStatus::RepairComplete,
        }
    }

    /// The stage this action moves the order into.
    pub fn target_status(self) -> OrderStatus {
        match self {
            TransitionAction::CompleteDiagnosis => OrderStatus::DiagnosisComplete,
            TransitionAction::StartRepair => OrderStatus::RepairInProgress,
            TransitionAction::CompleteRepair => OrderStatus::RepairComplete,
            TransitionAction::MarkReadyForPickup => OrderStatus::ReadyForPickup,
        }
    }

    /// Update-log message appended when this action succeeds.
    pub fn log_message(self) -> &'static str {
        match self {
            TransitionAction::CompleteDiagnosis => "Diagnosis complete, repair queued",
            TransitionAction::StartRepair => "Repair in progress",
            TransitionAction::CompleteRepair => "Repair complete, quality check underway",
            TransitionAction::MarkReadyForPickup => "Quality check passed, ready for pickup",
        }
    }
}

/// Value of a single milestone in an order's step timeline.
///
/// Persisted as a plain string: the well-known markers round-trip to their
/// display form, anything else is treated as a rendered timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum StepState {
    /// The transition that sets this milestone has not fired yet.
    #[default]
    Pending,
    /// This milestone is queued to start next.
    Next,
    /// Work on this milestone is underway.
    InProgress,
    /// The order is ready for pickup now.
    ReadyNow,
    /// Milestone completed at the rendered clock time.
    Done(String),
}

impl StepState {
    pub fn is_pending(&self) -> bool {
        matches!(self, StepState::Pending)
    }

    /// Display string, identical to the persisted form.
    pub fn as_str(&self) -> &str {
        match self {
            StepState::Pending => "Pending",
            StepState::Next => "Next",
            StepState::InProgress => "In Progress",
            StepState::ReadyNow => "Ready Now",
            StepState::Done(at) => at,
        }
    }
}

impl std::fmt::Display for StepState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for StepState {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "Pending" => StepState::Pending,
            "Next" => StepState::Next,
            "In Progress" => StepState::InProgress,
            "Ready Now" => StepState::ReadyNow,
            _ => StepState::Done(raw),
        }
    }
}

impl From<StepState> for String {
    fn from(state: StepState) -> Self {
        state.as_str().to_string()
    }
}

/// Step timeline of an order: one milestone per lifecycle stage.
///
/// Every milestone defaults to `Pending` until the transition that sets it
/// fires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct OrderSteps {
    pub received: StepState,
    pub diagnosis: StepState,
    pub repair: StepState,
    pub quality: StepState,
    pub ready: StepState,
}

/// One human-readable, timestamped record of a status change.
///
/// The `updates` log is append-only: entries are never removed or reordered
/// except for bounded retention that drops the oldest entries first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEntry {
    pub message: String,
    /// Rendered wall-clock time, e.g. "14:05".
    pub time: String,
    pub created_at: DateTime<Utc>,
}

/// Health reported by a document backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    Healthy,
    Degraded(String),
    Unhealthy(String),
}

/// Strip every non-digit character from a phone number.
///
/// Used before composing messaging links and when validating intake.
pub fn normalize_phone(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Render a timestamp to the wall-clock form used in step timelines and
/// update-log entries.
pub fn render_clock(at: DateTime<Utc>) -> String {
    at.format("%H:%M").to_string()
}
