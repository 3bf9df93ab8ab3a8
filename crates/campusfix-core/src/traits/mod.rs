// SPDX-FileCopyrightText: 2026 CampusFix Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Backend trait definitions for order persistence.
//!
//! Backends use `#[async_trait]` for dynamic dispatch compatibility.

pub mod backend;

pub use backend::DocumentBackend;
