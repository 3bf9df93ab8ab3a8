// SPDX-FileCopyrightText: 2026 CampusFix Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared fixtures for CampusFix tests.

use campusfix_core::order::CustomerIntake;
use campusfix_core::types::UrgencyLevel;

/// A valid intake form that passes every validation rule.
pub fn sample_intake() -> CustomerIntake {
    CustomerIntake {
        customer_name: "Ama Mensah".into(),
        customer_phone: "+233 24 691 2468".into(),
        customer_email: Some("ama@example.com".into()),
        customer_hostel: Some("Block C".into()),
        device_brand: "Samsung".into(),
        device_model: "Galaxy A54".into(),
        repair_type: "Screen Replacement".into(),
        urgency_level: UrgencyLevel::Standard,
        issue_description: "Cracked screen after a fall, touch still works".into(),
    }
}
