// SPDX-FileCopyrightText: 2026 CampusFix Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Remote document store backend for the CampusFix order lifecycle manager.
//!
//! Mirrors the order document to a JSONBin-style bin API. The store treats
//! this backend as best-effort: an unreachable remote never blocks local
//! operation.

pub mod backend;
pub mod client;

pub use backend::RemoteStore;
pub use client::RemoteDocClient;
