// SPDX-FileCopyrightText: 2026 CampusFix Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Local JSON document backend.
//!
//! Persists the whole [`OrderDocument`] as one pretty-printed JSON file
//! under the configured data directory. Writes go to a sibling temp file
//! first and are renamed into place so a crash mid-write never leaves a
//! truncated document behind.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use campusfix_core::normalize::document_from_value;
use campusfix_core::order::OrderDocument;
use campusfix_core::traits::DocumentBackend;
use campusfix_core::types::HealthStatus;
use campusfix_core::CampusfixError;

/// File name of the order document inside the data directory.
pub const DOCUMENT_FILE: &str = "orders.json";

/// Document backend over a single JSON file on disk.
pub struct LocalStore {
    path: PathBuf,
}

impl LocalStore {
    /// Create a local store rooted at `data_dir`. The directory is created
    /// on the first write, not here.
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            path: data_dir.as_ref().join(DOCUMENT_FILE),
        }
    }

    /// Path of the backing document file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_document(&self) -> Result<OrderDocument, CampusfixError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no local document yet, starting empty");
                return Ok(OrderDocument::default());
            }
            Err(e) => return Err(storage_err(e)),
        };
        let value: serde_json::Value = serde_json::from_str(&raw).map_err(storage_err)?;
        // Normalization happens here, once; callers only ever see the
        // canonical schema regardless of which era wrote the file.
        document_from_value(value)
    }

    async fn write_document(&self, document: &OrderDocument) -> Result<(), CampusfixError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(storage_err)?;
        }
        let json = serde_json::to_string_pretty(document).map_err(storage_err)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await.map_err(storage_err)?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(storage_err)?;
        Ok(())
    }
}

fn storage_err(e: impl std::error::Error + Send + Sync + 'static) -> CampusfixError {
    CampusfixError::Storage {
        source: Box::new(e),
    }
}

#[async_trait]
impl DocumentBackend for LocalStore {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn fetch(&self) -> Result<OrderDocument, CampusfixError> {
        self.read_document().await
    }

    async fn replace(&self, document: &OrderDocument) -> Result<(), CampusfixError> {
        self.write_document(document).await
    }

    async fn health_check(&self) -> Result<HealthStatus, CampusfixError> {
        let writable = match self.path.parent() {
            Some(parent) => tokio::fs::create_dir_all(parent).await.is_ok(),
            None => false,
        };
        if writable {
            Ok(HealthStatus::Healthy)
        } else {
            Ok(HealthStatus::Unhealthy(format!(
                "data directory for {} is not writable",
                self.path.display()
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campusfix_core::order::{code_for, Order};
    use campusfix_test_utils::sample_intake;
    use chrono::Utc;
    use tempfile::tempdir;

    #[tokio::test]
    async fn missing_file_yields_default_document() {
        let dir = tempdir().unwrap();
        let store = LocalStore::new(dir.path());

        let doc = store.fetch().await.unwrap();
        assert!(doc.orders.is_empty());
        assert_eq!(doc.counter, campusfix_core::order::COUNTER_SEED);
    }

    #[tokio::test]
    async fn document_round_trips_through_disk() {
        let dir = tempdir().unwrap();
        let store = LocalStore::new(dir.path());

        let mut doc = OrderDocument::default();
        doc.counter += 1;
        let now = Utc::now();
        let order = Order::create(&sample_intake(), code_for(now, doc.counter), now);
        doc.orders.insert(order.order_code.clone(), order);

        store.replace(&doc).await.unwrap();
        let loaded = store.fetch().await.unwrap();
        assert_eq!(loaded, doc);
    }

    #[tokio::test]
    async fn no_temp_file_remains_after_write() {
        let dir = tempdir().unwrap();
        let store = LocalStore::new(dir.path());
        store.replace(&OrderDocument::default()).await.unwrap();

        let leftovers: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .filter(|name| name.ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
        assert!(store.path().exists());
    }

    #[tokio::test]
    async fn legacy_file_is_normalized_on_read() {
        let dir = tempdir().unwrap();
        let store = LocalStore::new(dir.path());

        std::fs::write(
            store.path(),
            r#"{
                "orders": [{
                    "id": "abc",
                    "order_code": "CF-2026-2581",
                    "customer_name": "Ama Mensah",
                    "customer_phone": "0246912468",
                    "device_brand": "Samsung",
                    "device_model": "Galaxy A54",
                    "status": "Completed",
                    "created_at": "2026-03-01T09:00:00.000Z"
                }],
                "settings": {"order_counter": 2581}
            }"#,
        )
        .unwrap();

        let doc = store.fetch().await.unwrap();
        assert_eq!(doc.counter, 2581);
        let order = doc.orders.get("CF-2026-2581").unwrap();
        assert_eq!(order.status, campusfix_core::types::OrderStatus::ReadyForPickup);
    }

    #[tokio::test]
    async fn corrupt_file_is_a_storage_error() {
        let dir = tempdir().unwrap();
        let store = LocalStore::new(dir.path());
        std::fs::write(store.path(), "{not json").unwrap();

        let err = store.fetch().await.unwrap_err();
        assert!(matches!(err, CampusfixError::Storage { .. }));
    }
}
