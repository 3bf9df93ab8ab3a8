// SPDX-FileCopyrightText: 2026 CampusFix Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistence backend trait for the order document.

use async_trait::async_trait;

use crate::error::CampusfixError;
use crate::order::OrderDocument;
use crate::types::HealthStatus;

/// A backend that persists the whole [`OrderDocument`].
///
/// Backends have no partial-update primitive: every mutation fetches the
/// document, rewrites it in memory, and replaces it whole. Implementations
/// must hand out documents already normalized to the canonical schema.
#[async_trait]
pub trait DocumentBackend: Send + Sync {
    /// Short backend name for logs and error messages.
    fn name(&self) -> &'static str;

    /// Fetch the current document. A backend with no stored document yet
    /// returns the default (empty orders, seeded counter).
    async fn fetch(&self) -> Result<OrderDocument, CampusfixError>;

    /// Replace the stored document with `document`.
    async fn replace(&self, document: &OrderDocument) -> Result<(), CampusfixError>;

    /// Check whether the backend is reachable and serving.
    async fn health_check(&self) -> Result<HealthStatus, CampusfixError>;
}
