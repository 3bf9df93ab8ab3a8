// SPDX-FileCopyrightText: 2026 CampusFix Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Notification text composition for the CampusFix order lifecycle manager.
//!
//! Composing is pure and deterministic; delivery is a one-way egress the
//! caller performs (or doesn't). The system never learns whether a message
//! arrived.

pub mod composer;

pub use composer::{compose, LifecycleEvent, Notification, OperatorProfile};
