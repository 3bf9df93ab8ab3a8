// SPDX-FileCopyrightText: 2026 CampusFix Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the CampusFix order lifecycle manager.
//!
//! This crate provides the canonical order schema, intake validation, the
//! status transition engine, legacy-record normalization, and the trait
//! persistence backends implement. Everything else in the workspace builds
//! on the types defined here.

pub mod error;
pub mod lifecycle;
pub mod normalize;
pub mod order;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::{CampusfixError, FieldError};
pub use order::{CustomerIntake, Order, OrderDocument, OrderFilter};
pub use traits::DocumentBackend;
pub use types::{
    HealthStatus, OrderStatus, OrderSteps, StepState, TransitionAction, UpdateEntry, UrgencyLevel,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_has_all_variants() {
        // Verify every error variant exists and can be constructed.
        let _config = CampusfixError::Config("test".into());
        let _validation = CampusfixError::validation(vec![]);
        let _not_found = CampusfixError::NotFound {
            code: "CF-2026-0001".into(),
        };
        let _illegal = CampusfixError::IllegalTransition {
            action: TransitionAction::StartRepair,
            status: OrderStatus::OrderReceived,
        };
        let _terminal = CampusfixError::TerminalState {
            code: "CF-2026-0001".into(),
        };
        let _backend = CampusfixError::BackendUnavailable {
            backend: "remote",
            message: "test".into(),
            source: None,
        };
        let _storage = CampusfixError::Storage {
            source: Box::new(std::io::Error::other("test")),
        };
        let _timeout = CampusfixError::Timeout {
            duration: std::time::Duration::from_secs(10),
        };
        let _internal = CampusfixError::Internal("test".into());
    }

    #[test]
    fn status_and_action_round_trip_display() {
        use std::str::FromStr;

        for status in [
            OrderStatus::OrderReceived,
            OrderStatus::DiagnosisComplete,
            OrderStatus::RepairInProgress,
            OrderStatus::RepairComplete,
            OrderStatus::ReadyForPickup,
        ] {
            let parsed = OrderStatus::from_str(&status.to_string()).expect("should parse back");
            assert_eq!(status, parsed);
        }

        for action in [
            TransitionAction::CompleteDiagnosis,
            TransitionAction::StartRepair,
            TransitionAction::CompleteRepair,
            TransitionAction::MarkReadyForPickup,
        ] {
            let parsed =
                TransitionAction::from_str(&action.to_string()).expect("should parse back");
            assert_eq!(action, parsed);
        }
    }

    #[test]
    fn backend_trait_is_object_safe() {
        fn _assert_object_safe(_: &dyn DocumentBackend) {}
    }
}
