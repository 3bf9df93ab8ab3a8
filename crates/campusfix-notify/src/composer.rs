// SPDX-FileCopyrightText: 2026 CampusFix Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pure notification text composition.
//!
//! [`compose`] maps an order and a lifecycle event to a customer-facing
//! text, an operator-facing text, and the customer's digits-only phone
//! number for message-link construction. No network I/O and no side
//! effects; given the same order and event the output is identical, so
//! the texts are covered by golden tests.

use campusfix_config::ServiceConfig;
use campusfix_core::order::Order;
use campusfix_core::types::{normalize_phone, TransitionAction};

/// Who signs customer-facing messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperatorProfile {
    pub service_name: String,
    pub operator_name: String,
    pub operator_title: String,
    pub operator_phone: String,
}

impl OperatorProfile {
    pub fn from_config(config: &ServiceConfig) -> Self {
        Self {
            service_name: config.name.clone(),
            operator_name: config.operator_name.clone(),
            operator_title: config.operator_title.clone(),
            operator_phone: normalize_phone(&config.operator_phone),
        }
    }
}

/// The order events that produce a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    Created,
    Transition(TransitionAction),
}

/// Composed message texts for one event.
///
/// Delivery is out of scope: the contract ends at correct text plus a
/// normalized phone number. Whether a chat link is ever opened, and whether
/// the message arrives, is the caller's problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub customer_text: String,
    pub operator_text: String,
    /// Digits-only customer phone for message-link construction.
    pub customer_phone: String,
}

/// Compose the customer and operator texts for an order event.
pub fn compose(order: &Order, event: LifecycleEvent, profile: &OperatorProfile) -> Notification {
    let device = format!("{} {}", order.device_brand, order.device_model);
    let estimate = order.estimated_completion.format("%a %d %b, %H:%M");
    let signature = format!("{}, {}", profile.operator_name, profile.service_name);

    let customer_text = match event {
        LifecycleEvent::Created => format!(
            "Hi {}! Your {} order {} has been received. We'll contact you soon about \
             your {} {}. Estimated completion: {}. - {}",
            order.customer_name,
            profile.service_name,
            order.order_code,
            device,
            order.repair_type,
            estimate,
            signature
        ),
        LifecycleEvent::Transition(TransitionAction::CompleteDiagnosis) => format!(
            "Hi {}! Diagnosis of your {} is complete and the repair is queued. \
             Order {}. - {}",
            order.customer_name, device, order.order_code, signature
        ),
        LifecycleEvent::Transition(TransitionAction::StartRepair) => format!(
            "Hi {}! Repair of your {} is now in progress. Order {}. - {}",
            order.customer_name, device, order.order_code, signature
        ),
        LifecycleEvent::Transition(TransitionAction::CompleteRepair) => format!(
            "Hi {}! Repair of your {} is complete and final quality checks are \
             underway. Order {}. - {}",
            order.customer_name, device, order.order_code, signature
        ),
        LifecycleEvent::Transition(TransitionAction::MarkReadyForPickup) => format!(
            "Great news {}! Your {} is ready for pickup. Order {}. - {}, {}",
            order.customer_name,
            device,
            order.order_code,
            profile.operator_name,
            profile.operator_title
        ),
    };

    let operator_text = match event {
        LifecycleEvent::Created => format!(
            "{}: {}'s {} ({}, {}) received, est. {}",
            order.order_code,
            order.customer_name,
            device,
            order.repair_type,
            order.urgency_level,
            estimate
        ),
        LifecycleEvent::Transition(action) => format!(
            "{}: {} -> {} ({}'s {})",
            order.order_code,
            action.source_status(),
            action.target_status(),
            order.customer_name,
            device
        ),
    };

    Notification {
        customer_text,
        operator_text,
        customer_phone: normalize_phone(&order.customer_phone),
    }
}
