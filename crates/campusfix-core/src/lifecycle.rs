// SPDX-FileCopyrightText: 2026 CampusFix Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The status transition engine: the single source of truth for how an
//! order's status, progress, and step timeline change.
//!
//! Transitions are applied by [`apply`] and nowhere else. Views and stores
//! never assign lifecycle fields directly. A rejected transition leaves the
//! order untouched.

use chrono::{DateTime, Utc};

use crate::error::CampusfixError;
use crate::order::Order;
use crate::types::{render_clock, StepState, TransitionAction, UpdateEntry};

/// Apply a transition action to an order.
///
/// Legal only when the order's current status is the one immediately
/// preceding the action's target in the linear order. On success the
/// status, progress, and step timeline are updated per the transition
/// table, exactly one entry is appended to the update log, and
/// `updated_at` is advanced to `now`.
///
/// # Errors
///
/// - [`CampusfixError::TerminalState`] when the order is already Ready for
///   Pickup.
/// - [`CampusfixError::IllegalTransition`] when the action is out of order.
///
/// In both cases the order is left unmodified.
pub fn apply(
    order: &mut Order,
    action: TransitionAction,
    now: DateTime<Utc>,
) -> Result<(), CampusfixError> {
    if order.status.is_terminal() {
        return Err(CampusfixError::TerminalState {
            code: order.order_code.clone(),
        });
    }
    if order.status != action.source_status() {
        return Err(CampusfixError::IllegalTransition {
            action,
            status: order.status,
        });
    }

    let clock = render_clock(now);
    match action {
        TransitionAction::CompleteDiagnosis => {
            order.steps.diagnosis = StepState::Done(clock.clone());
            order.steps.repair = StepState::Next;
        }
        TransitionAction::StartRepair => {
            order.steps.repair = StepState::InProgress;
        }
        TransitionAction::CompleteRepair => {
            order.steps.repair = StepState::Done(clock.clone());
            order.steps.quality = StepState::InProgress;
        }
        TransitionAction::MarkReadyForPickup => {
            order.steps.quality = StepState::Done(clock.clone());
            order.steps.ready = StepState::ReadyNow;
        }
    }

    order.status = action.target_status();
    order.progress = order.status.progress();
    order.updates.push(UpdateEntry {
        message: action.log_message().to_string(),
        time: clock,
        created_at: now,
    });
    order.updated_at = now;
    Ok(())
}

/// Bounded retention for the update log: keep only the most recent `max`
/// entries, dropping the oldest first. Relative order is preserved.
pub fn cap_updates(order: &mut Order, max: usize) {
    if order.updates.len() > max {
        let excess = order.updates.len() - max;
        order.updates.drain(..excess);
    }
}
