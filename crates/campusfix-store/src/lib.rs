// SPDX-FileCopyrightText: 2026 CampusFix Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Order persistence for the CampusFix order lifecycle manager.
//!
//! Provides the local JSON-file backend and the [`OrderStore`] front that
//! every command and view goes through. The store writes local-first and
//! mirrors to a remote document backend when one is configured.

pub mod local;
pub mod store;

pub use local::LocalStore;
pub use store::{OrderStore, ShopStats};
