// SPDX-FileCopyrightText: 2026 CampusFix Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The canonical Order record, intake validation, and the persisted
//! order document.
//!
//! This is the single schema for an order. Any legacy or external
//! representation is converted to this shape exactly once at ingestion by
//! [`crate::normalize`]; business logic never sees another spelling.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::FieldError;
use crate::types::{
    normalize_phone, render_clock, OrderStatus, OrderSteps, StepState, UpdateEntry, UrgencyLevel,
};

/// The order counter starts here so early codes do not look like a brand-new
/// shop. Incremented exactly once per successful creation, never reused.
pub const COUNTER_SEED: u64 = 2580;

/// Minimum digits a phone number must contain after normalization.
pub const MIN_PHONE_DIGITS: usize = 9;

/// Minimum length of the free-text issue description.
pub const MIN_ISSUE_DESCRIPTION: usize = 10;

/// Fields supplied by the intake form. Validated before any order is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerIntake {
    pub customer_name: String,
    pub customer_phone: String,
    #[serde(default)]
    pub customer_email: Option<String>,
    #[serde(default)]
    pub customer_hostel: Option<String>,
    pub device_brand: String,
    pub device_model: String,
    pub repair_type: String,
    #[serde(default)]
    pub urgency_level: UrgencyLevel,
    pub issue_description: String,
}

impl CustomerIntake {
    /// Check every required field and return the full list of failures.
    ///
    /// Does not fail fast: a form submission sees all invalid fields at
    /// once, not one per attempt.
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();

        if self.customer_name.trim().is_empty() {
            errors.push(FieldError::new("customerName", "must not be empty"));
        }

        let digits = normalize_phone(&self.customer_phone);
        if digits.len() < MIN_PHONE_DIGITS {
            errors.push(FieldError::new(
                "customerPhone",
                format!("must contain at least {MIN_PHONE_DIGITS} digits"),
            ));
        }

        if let Some(email) = &self.customer_email
            && !email.trim().is_empty()
            && !email.contains('@')
        {
            errors.push(FieldError::new("customerEmail", "is not a valid address"));
        }

        if self.device_brand.trim().is_empty() {
            errors.push(FieldError::new("deviceBrand", "must not be empty"));
        }

        if self.device_model.trim().is_empty() {
            errors.push(FieldError::new("deviceModel", "must not be empty"));
        }

        if self.issue_description.trim().len() < MIN_ISSUE_DESCRIPTION {
            errors.push(FieldError::new(
                "issueDescription",
                format!("must be at least {MIN_ISSUE_DESCRIPTION} characters"),
            ));
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// A repair order. The central entity of the system.
///
/// Customer and device facts are immutable after creation; lifecycle fields
/// (`status`, `progress`, `steps`, `updates`, `updated_at`) are mutated only
/// through the transition engine in [`crate::lifecycle`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Opaque internal identifier, stable for the order's lifetime.
    pub id: String,
    /// Human-shareable code of form `CF-YYYY-NNNN`. Assigned exactly once.
    pub order_code: String,
    pub customer_name: String,
    pub customer_phone: String,
    #[serde(default)]
    pub customer_email: Option<String>,
    #[serde(default)]
    pub customer_hostel: Option<String>,
    pub device_brand: String,
    pub device_model: String,
    pub repair_type: String,
    pub urgency_level: UrgencyLevel,
    pub issue_description: String,
    pub status: OrderStatus,
    /// Derived from `status`, never independently settable.
    pub progress: u8,
    pub steps: OrderSteps,
    pub updates: Vec<UpdateEntry>,
    /// Computed once at creation from urgency level; never recomputed.
    pub estimated_completion: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Build the initial record for a validated intake.
    ///
    /// Status starts at Order Received with progress 10, all steps Pending
    /// except `received`, and a single creation entry in the update log.
    pub fn create(intake: &CustomerIntake, order_code: String, now: DateTime<Utc>) -> Self {
        let steps = OrderSteps {
            received: StepState::Done(render_clock(now)),
            ..OrderSteps::default()
        };
        let status = OrderStatus::OrderReceived;
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            order_code,
            customer_name: intake.customer_name.trim().to_string(),
            customer_phone: intake.customer_phone.trim().to_string(),
            customer_email: intake.customer_email.clone().filter(|e| !e.trim().is_empty()),
            customer_hostel: intake
                .customer_hostel
                .clone()
                .filter(|h| !h.trim().is_empty()),
            device_brand: intake.device_brand.trim().to_string(),
            device_model: intake.device_model.trim().to_string(),
            repair_type: intake.repair_type.trim().to_string(),
            urgency_level: intake.urgency_level,
            issue_description: intake.issue_description.trim().to_string(),
            status,
            progress: status.progress(),
            steps,
            updates: vec![UpdateEntry {
                message: "Order received and queued for diagnosis".to_string(),
                time: render_clock(now),
                created_at: now,
            }],
            estimated_completion: now + intake.urgency_level.completion_offset(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Free-text filter match across code, customer name, device brand,
    /// and repair type.
    pub fn matches(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.order_code.to_lowercase().contains(&needle)
            || self.customer_name.to_lowercase().contains(&needle)
            || self.device_brand.to_lowercase().contains(&needle)
            || self.repair_type.to_lowercase().contains(&needle)
    }
}

/// Format an order code from the year and counter value.
pub fn format_code(year: i32, counter: u64) -> String {
    format!("CF-{year}-{counter:04}")
}

/// Format an order code for the current value of `now`.
pub fn code_for(now: DateTime<Utc>, counter: u64) -> String {
    format_code(now.year(), counter)
}

/// Canonical spelling of an order code for lookups: trimmed, with the
/// alphabetic segment uppercased. Lookup is case-insensitive on the prefix
/// but digits pass through unchanged.
pub fn canonical_code(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// The persisted document: all orders keyed by code, plus the code counter.
///
/// Both backends store this whole document and rewrite it whole on every
/// mutation; neither has a partial-update primitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDocument {
    #[serde(default)]
    pub orders: BTreeMap<String, Order>,
    #[serde(default = "default_counter")]
    pub counter: u64,
    /// Set when a local write could not be mirrored to the remote backend;
    /// cleared by the next successful sync. Local is the last known good
    /// source while this is set.
    #[serde(default)]
    pub needs_sync: bool,
}

fn default_counter() -> u64 {
    COUNTER_SEED
}

impl Default for OrderDocument {
    fn default() -> Self {
        Self {
            orders: BTreeMap::new(),
            counter: COUNTER_SEED,
            needs_sync: false,
        }
    }
}

/// Optional filter for order listings.
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    /// Substring match against the status display string.
    pub status: Option<String>,
    /// Free-text match across code, customer name, device brand, repair type.
    pub search: Option<String>,
}
