// SPDX-FileCopyrightText: 2026 CampusFix Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock document backend for deterministic testing.
//!
//! `MockBackend` implements `DocumentBackend` over an in-memory document,
//! with injectable failures and call counters for assertion in tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use campusfix_core::order::OrderDocument;
use campusfix_core::traits::DocumentBackend;
use campusfix_core::types::HealthStatus;
use campusfix_core::CampusfixError;

/// A mock persistence backend for testing.
///
/// Holds the document in memory and exposes switches to simulate an
/// unreachable backend:
/// - `fail_fetch()` makes every `fetch()` return `BackendUnavailable`
/// - `fail_replace()` makes every `replace()` return `BackendUnavailable`
///
/// Call counters record how often each operation was attempted, including
/// attempts that failed.
pub struct MockBackend {
    document: Arc<Mutex<OrderDocument>>,
    fail_fetch: AtomicBool,
    fail_replace: AtomicBool,
    fetch_calls: AtomicUsize,
    replace_calls: AtomicUsize,
}

impl MockBackend {
    /// Create a mock backend holding the default (empty) document.
    pub fn new() -> Self {
        Self::with_document(OrderDocument::default())
    }

    /// Create a mock backend pre-seeded with a document.
    pub fn with_document(document: OrderDocument) -> Self {
        Self {
            document: Arc::new(Mutex::new(document)),
            fail_fetch: AtomicBool::new(false),
            fail_replace: AtomicBool::new(false),
            fetch_calls: AtomicUsize::new(0),
            replace_calls: AtomicUsize::new(0),
        }
    }

    /// Make subsequent `fetch()` calls fail with `BackendUnavailable`.
    pub fn fail_fetch(&self, fail: bool) {
        self.fail_fetch.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent `replace()` calls fail with `BackendUnavailable`.
    pub fn fail_replace(&self, fail: bool) {
        self.fail_replace.store(fail, Ordering::SeqCst);
    }

    /// Number of `fetch()` attempts so far.
    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    /// Number of `replace()` attempts so far.
    pub fn replace_calls(&self) -> usize {
        self.replace_calls.load(Ordering::SeqCst)
    }

    /// Read the currently stored document.
    pub async fn stored(&self) -> OrderDocument {
        self.document.lock().await.clone()
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentBackend for MockBackend {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn fetch(&self) -> Result<OrderDocument, CampusfixError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(CampusfixError::BackendUnavailable {
                backend: "mock",
                message: "fetch failure injected".into(),
                source: None,
            });
        }
        Ok(self.document.lock().await.clone())
    }

    async fn replace(&self, document: &OrderDocument) -> Result<(), CampusfixError> {
        self.replace_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_replace.load(Ordering::SeqCst) {
            return Err(CampusfixError::BackendUnavailable {
                backend: "mock",
                message: "replace failure injected".into(),
                source: None,
            });
        }
        *self.document.lock().await = document.clone();
        Ok(())
    }

    async fn health_check(&self) -> Result<HealthStatus, CampusfixError> {
        if self.fail_fetch.load(Ordering::SeqCst) || self.fail_replace.load(Ordering::SeqCst) {
            Ok(HealthStatus::Unhealthy("failure injected".into()))
        } else {
            Ok(HealthStatus::Healthy)
        }
    }
}
