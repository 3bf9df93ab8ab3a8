// SPDX-FileCopyrightText: 2026 CampusFix Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for CampusFix integration tests.
//!
//! Provides mock backends and intake fixtures for fast, deterministic,
//! CI-runnable tests without external services.

pub mod fixtures;
pub mod mock_backend;

pub use fixtures::sample_intake;
pub use mock_backend::MockBackend;
