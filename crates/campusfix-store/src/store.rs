// SPDX-FileCopyrightText: 2026 CampusFix Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The order store: the single front all views and commands go through.
//!
//! Writes are local-first. Every mutation rewrites the whole document to
//! the local backend, then mirrors it to the remote backend when one is
//! configured. A failed mirror never fails the operation; the document is
//! flagged `needs_sync` and pushed by the next [`OrderStore::sync_pending`].

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{info, warn};

use campusfix_core::lifecycle;
use campusfix_core::normalize::document_from_value;
use campusfix_core::order::{canonical_code, code_for, CustomerIntake, Order, OrderDocument, OrderFilter};
use campusfix_core::traits::DocumentBackend;
use campusfix_core::types::TransitionAction;
use campusfix_core::CampusfixError;

use crate::local::LocalStore;

/// Aggregate counts for the dashboard view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopStats {
    pub total: usize,
    /// Orders still at Order Received.
    pub pending: usize,
    /// Orders past intake but not yet Ready for Pickup.
    pub in_progress: usize,
    pub completed: usize,
    /// Orders that reached Ready for Pickup today.
    pub completed_today: usize,
}

/// Order store over the local backend with an optional remote mirror.
pub struct OrderStore {
    local: LocalStore,
    remote: Option<Arc<dyn DocumentBackend>>,
    cache: Mutex<Option<OrderDocument>>,
    max_update_entries: usize,
    optimistic_lock: bool,
}

impl OrderStore {
    pub fn new(
        local: LocalStore,
        remote: Option<Arc<dyn DocumentBackend>>,
        max_update_entries: usize,
        optimistic_lock: bool,
    ) -> Self {
        Self {
            local,
            remote,
            cache: Mutex::new(None),
            max_update_entries,
            optimistic_lock,
        }
    }

    /// Validate an intake form, allocate the next order code, and persist
    /// the new order.
    pub async fn create_order(&self, intake: &CustomerIntake) -> Result<Order, CampusfixError> {
        intake.validate().map_err(CampusfixError::validation)?;

        let now = Utc::now();
        let mut guard = self.cache.lock().await;
        let mut doc = match guard.take() {
            Some(doc) => doc,
            None => self.load_document().await?,
        };

        // The counter only moves forward. A failed write after this point
        // leaves a gap in the code sequence, never a duplicate.
        doc.counter += 1;
        let order = Order::create(intake, code_for(now, doc.counter), now);
        doc.orders.insert(canonical_code(&order.order_code), order.clone());

        self.commit(&mut doc).await?;
        info!(code = %order.order_code, urgency = %order.urgency_level, "order created");
        *guard = Some(doc);
        Ok(order)
    }

    /// Look up an order by code. Lookup is case-insensitive.
    pub async fn get_order(&self, code: &str) -> Result<Order, CampusfixError> {
        let code = canonical_code(code);
        let mut guard = self.cache.lock().await;
        let doc = match guard.take() {
            Some(doc) => doc,
            None => self.load_document().await?,
        };
        let found = doc.orders.get(&code).cloned();
        *guard = Some(doc);
        found.ok_or(CampusfixError::NotFound { code })
    }

    /// Apply a mutation to one order and persist the document.
    ///
    /// With `optimistic_lock` on, a stale in-memory copy is detected by
    /// comparing `updated_at` against the document on disk; the mutation is
    /// rebased onto the stored version with a warning (last write wins).
    pub async fn update_order<F>(&self, code: &str, mutate: F) -> Result<Order, CampusfixError>
    where
        F: FnOnce(&mut Order) -> Result<(), CampusfixError> + Send,
    {
        let code = canonical_code(code);
        let mut guard = self.cache.lock().await;
        let mut doc = match guard.take() {
            Some(doc) => doc,
            None => self.load_document().await?,
        };

        if self.optimistic_lock
            && let Ok(stored) = self.local.fetch().await
            && let (Some(current), Some(known)) = (stored.orders.get(&code), doc.orders.get(&code))
            && current.updated_at > known.updated_at
        {
            warn!(
                code = %code,
                "order changed on disk since it was read; rebasing, last write wins"
            );
            doc = stored;
        }

        let Some(order) = doc.orders.get_mut(&code) else {
            *guard = Some(doc);
            return Err(CampusfixError::NotFound { code });
        };
        mutate(order)?;
        let updated = order.clone();

        self.commit(&mut doc).await?;
        *guard = Some(doc);
        Ok(updated)
    }

    /// Apply a lifecycle transition to an order and persist it.
    pub async fn apply_transition(
        &self,
        code: &str,
        action: TransitionAction,
    ) -> Result<Order, CampusfixError> {
        let max = self.max_update_entries;
        let order = self
            .update_order(code, |order| {
                lifecycle::apply(order, action, Utc::now())?;
                lifecycle::cap_updates(order, max);
                Ok(())
            })
            .await?;
        info!(code = %order.order_code, status = %order.status, "order advanced");
        Ok(order)
    }

    /// List orders newest first, optionally filtered by status substring
    /// and free text.
    pub async fn list_orders(&self, filter: &OrderFilter) -> Result<Vec<Order>, CampusfixError> {
        let mut guard = self.cache.lock().await;
        let doc = match guard.take() {
            Some(doc) => doc,
            None => self.load_document().await?,
        };

        let mut orders: Vec<Order> = doc
            .orders
            .values()
            .filter(|order| {
                if let Some(status) = &filter.status
                    && !order
                        .status
                        .to_string()
                        .to_lowercase()
                        .contains(&status.to_lowercase())
                {
                    return false;
                }
                if let Some(search) = &filter.search
                    && !order.matches(search)
                {
                    return false;
                }
                true
            })
            .cloned()
            .collect();
        // Order codes break ties for orders created in the same instant.
        orders.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then(b.order_code.cmp(&a.order_code))
        });

        *guard = Some(doc);
        Ok(orders)
    }

    /// Aggregate counts for the dashboard.
    pub async fn stats(&self) -> Result<ShopStats, CampusfixError> {
        use campusfix_core::types::OrderStatus;

        let orders = self.list_orders(&OrderFilter::default()).await?;
        let today = Utc::now().date_naive();
        Ok(ShopStats {
            total: orders.len(),
            pending: orders
                .iter()
                .filter(|o| o.status == OrderStatus::OrderReceived)
                .count(),
            in_progress: orders
                .iter()
                .filter(|o| o.status != OrderStatus::OrderReceived && !o.status.is_terminal())
                .count(),
            completed: orders.iter().filter(|o| o.status.is_terminal()).count(),
            completed_today: orders
                .iter()
                .filter(|o| o.status.is_terminal() && o.updated_at.date_naive() == today)
                .count(),
        })
    }

    /// Push the local document to the remote backend if a previous mirror
    /// failed. Returns whether a push happened.
    pub async fn sync_pending(&self) -> Result<bool, CampusfixError> {
        let Some(remote) = &self.remote else {
            return Ok(false);
        };

        let mut guard = self.cache.lock().await;
        let mut doc = self.local.fetch().await?;
        if !doc.needs_sync {
            *guard = Some(doc);
            return Ok(false);
        }

        doc.needs_sync = false;
        remote.replace(&doc).await?;
        self.local.replace(&doc).await?;
        info!(orders = doc.orders.len(), "queued changes pushed to remote");
        *guard = Some(doc);
        Ok(true)
    }

    /// Snapshot of the current document, for export and inspection.
    pub async fn export(&self) -> Result<OrderDocument, CampusfixError> {
        let mut guard = self.cache.lock().await;
        let doc = match guard.take() {
            Some(doc) => doc,
            None => self.load_document().await?,
        };
        let snapshot = doc.clone();
        *guard = Some(doc);
        Ok(snapshot)
    }

    /// Replace the whole document with an imported one. The value may be in
    /// any schema the normalizer understands. Returns the order count.
    pub async fn import(&self, value: serde_json::Value) -> Result<usize, CampusfixError> {
        let mut doc = document_from_value(value)?;
        let count = doc.orders.len();
        let mut guard = self.cache.lock().await;
        self.commit(&mut doc).await?;
        info!(orders = count, "document imported");
        *guard = Some(doc);
        Ok(count)
    }

    /// Delete every order and reset the counter to its seed.
    pub async fn wipe(&self) -> Result<(), CampusfixError> {
        let mut guard = self.cache.lock().await;
        let mut doc = OrderDocument::default();
        self.commit(&mut doc).await?;
        warn!("all order data wiped");
        *guard = Some(doc);
        Ok(())
    }

    /// Drop the in-memory cache and reload from the backends. Used by the
    /// live tracker to pick up writes from other processes.
    pub async fn reload(&self) -> Result<OrderDocument, CampusfixError> {
        let mut guard = self.cache.lock().await;
        let doc = self.load_document().await?;
        *guard = Some(doc.clone());
        Ok(doc)
    }

    /// Initial document resolution.
    ///
    /// A local document flagged `needs_sync` holds writes the remote never
    /// saw, so it wins. Otherwise the remote copy is authoritative when it
    /// can be fetched; a recoverable failure falls back to the local copy.
    async fn load_document(&self) -> Result<OrderDocument, CampusfixError> {
        let local = self.local.fetch().await?;
        let Some(remote) = &self.remote else {
            return Ok(local);
        };
        if local.needs_sync {
            return Ok(local);
        }
        match remote.fetch().await {
            Ok(doc) => Ok(doc),
            Err(e) if e.is_recoverable() => {
                warn!(error = %e, "remote fetch failed, serving local copy");
                Ok(local)
            }
            Err(e) => Err(e),
        }
    }

    /// Persist a mutated document: local first, then mirror to the remote.
    async fn commit(&self, doc: &mut OrderDocument) -> Result<(), CampusfixError> {
        let Some(remote) = &self.remote else {
            // Local-only mode. Everything written here still awaits a sync
            // once a remote is configured.
            doc.needs_sync = true;
            return self.local.replace(doc).await;
        };

        // Assume the mirror fails until it succeeds; the local file is the
        // write-ahead copy.
        doc.needs_sync = true;
        self.local.replace(doc).await?;

        doc.needs_sync = false;
        match remote.replace(doc).await {
            Ok(()) => self.local.replace(doc).await,
            Err(e) if e.is_recoverable() => {
                doc.needs_sync = true;
                warn!(error = %e, "remote mirror failed, write queued for sync");
                Ok(())
            }
            Err(e) => {
                doc.needs_sync = true;
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campusfix_core::types::{OrderStatus, StepState};
    use campusfix_test_utils::{sample_intake, MockBackend};
    use serde_json::json;
    use tempfile::{tempdir, TempDir};

    const FULL_SEQUENCE: [TransitionAction; 4] = [
        TransitionAction::CompleteDiagnosis,
        TransitionAction::StartRepair,
        TransitionAction::CompleteRepair,
        TransitionAction::MarkReadyForPickup,
    ];

    fn mirrored_store(max_updates: usize) -> (OrderStore, Arc<MockBackend>, TempDir) {
        let dir = tempdir().unwrap();
        let remote = Arc::new(MockBackend::new());
        let store = OrderStore::new(
            LocalStore::new(dir.path()),
            Some(remote.clone() as Arc<dyn DocumentBackend>),
            max_updates,
            true,
        );
        (store, remote, dir)
    }

    fn local_only_store() -> (OrderStore, TempDir) {
        let dir = tempdir().unwrap();
        let store = OrderStore::new(LocalStore::new(dir.path()), None, 50, true);
        (store, dir)
    }

    #[tokio::test]
    async fn codes_are_sequential_and_padded() {
        let (store, remote, _dir) = mirrored_store(50);

        let first = store.create_order(&sample_intake()).await.unwrap();
        let second = store.create_order(&sample_intake()).await.unwrap();

        assert!(first.order_code.ends_with("-2581"));
        assert!(second.order_code.ends_with("-2582"));

        let mirrored = remote.stored().await;
        assert_eq!(mirrored.orders.len(), 2);
        assert_eq!(mirrored.counter, 2582);
        assert!(!mirrored.needs_sync);
    }

    #[tokio::test]
    async fn invalid_intake_is_rejected_without_a_write() {
        let (store, remote, _dir) = mirrored_store(50);

        let mut intake = sample_intake();
        intake.customer_phone = "123".into();
        let err = store.create_order(&intake).await.unwrap_err();
        assert!(matches!(err, CampusfixError::Validation { .. }));

        assert_eq!(remote.replace_calls(), 0);
        let stats = store.stats().await.unwrap();
        assert_eq!(stats.total, 0);
    }

    #[tokio::test]
    async fn lookup_is_case_insensitive() {
        let (store, _remote, _dir) = mirrored_store(50);
        let order = store.create_order(&sample_intake()).await.unwrap();

        let found = store
            .get_order(&order.order_code.to_lowercase())
            .await
            .unwrap();
        assert_eq!(found.order_code, order.order_code);

        let err = store.get_order("CF-2026-9999").await.unwrap_err();
        assert!(matches!(err, CampusfixError::NotFound { .. }));
    }

    #[tokio::test]
    async fn lookup_is_idempotent() {
        let (store, _dir) = local_only_store();
        let created = store.create_order(&sample_intake()).await.unwrap();
        store
            .apply_transition(&created.order_code, TransitionAction::CompleteDiagnosis)
            .await
            .unwrap();

        let first = store.get_order(&created.order_code).await.unwrap();
        let second = store.get_order(&created.order_code).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn transitions_persist_across_a_reload() {
        let (store, _remote, _dir) = mirrored_store(50);
        let order = store.create_order(&sample_intake()).await.unwrap();

        store
            .apply_transition(&order.order_code, TransitionAction::CompleteDiagnosis)
            .await
            .unwrap();

        store.reload().await.unwrap();
        let reloaded = store.get_order(&order.order_code).await.unwrap();
        assert_eq!(reloaded.status, OrderStatus::DiagnosisComplete);
        assert_eq!(reloaded.steps.repair, StepState::Next);
    }

    #[tokio::test]
    async fn update_log_is_capped_at_the_configured_retention() {
        let (store, _remote, _dir) = mirrored_store(3);
        let order = store.create_order(&sample_intake()).await.unwrap();

        for action in FULL_SEQUENCE {
            store.apply_transition(&order.order_code, action).await.unwrap();
        }

        let done = store.get_order(&order.order_code).await.unwrap();
        assert_eq!(done.updates.len(), 3);
        // The newest entry survives.
        assert_eq!(
            done.updates.last().map(|u| u.message.as_str()),
            Some("Quality check passed, ready for pickup")
        );
    }

    #[tokio::test]
    async fn remote_failure_flags_sync_and_sync_pending_recovers() {
        let (store, remote, _dir) = mirrored_store(50);

        remote.fail_replace(true);
        let order = store.create_order(&sample_intake()).await.unwrap();

        let snapshot = store.export().await.unwrap();
        assert!(snapshot.needs_sync);
        assert!(snapshot.orders.contains_key(&order.order_code));

        remote.fail_replace(false);
        assert!(store.sync_pending().await.unwrap());
        assert!(!store.export().await.unwrap().needs_sync);
        assert!(remote.stored().await.orders.contains_key(&order.order_code));

        // Nothing left to push.
        assert!(!store.sync_pending().await.unwrap());
    }

    #[tokio::test]
    async fn flagged_local_document_wins_over_remote_on_load() {
        let (store, remote, dir) = mirrored_store(50);

        remote.fail_replace(true);
        let order = store.create_order(&sample_intake()).await.unwrap();
        drop(store);

        // A fresh store over the same data dir must serve the unsynced
        // local copy even though the (empty) remote is reachable again.
        remote.fail_replace(false);
        let store = OrderStore::new(
            LocalStore::new(dir.path()),
            Some(remote as Arc<dyn DocumentBackend>),
            50,
            true,
        );
        let found = store.get_order(&order.order_code).await.unwrap();
        assert_eq!(found.order_code, order.order_code);
    }

    #[tokio::test]
    async fn listing_filters_by_status_and_search() {
        let (store, _dir) = local_only_store();
        let first = store.create_order(&sample_intake()).await.unwrap();

        let mut other = sample_intake();
        other.customer_name = "Kofi Boateng".into();
        other.device_brand = "iPhone".into();
        let second = store.create_order(&other).await.unwrap();

        store
            .apply_transition(&first.order_code, TransitionAction::CompleteDiagnosis)
            .await
            .unwrap();

        let all = store.list_orders(&OrderFilter::default()).await.unwrap();
        assert_eq!(all.len(), 2);

        let diagnosed = store
            .list_orders(&OrderFilter {
                status: Some("diagnosis".into()),
                search: None,
            })
            .await
            .unwrap();
        assert_eq!(diagnosed.len(), 1);
        assert_eq!(diagnosed[0].order_code, first.order_code);

        let iphones = store
            .list_orders(&OrderFilter {
                status: None,
                search: Some("iphone".into()),
            })
            .await
            .unwrap();
        assert_eq!(iphones.len(), 1);
        assert_eq!(iphones[0].order_code, second.order_code);
    }

    #[tokio::test]
    async fn stats_partition_by_lifecycle_stage() {
        let (store, _dir) = local_only_store();
        let first = store.create_order(&sample_intake()).await.unwrap();
        let second = store.create_order(&sample_intake()).await.unwrap();
        store.create_order(&sample_intake()).await.unwrap();

        for action in FULL_SEQUENCE {
            store.apply_transition(&first.order_code, action).await.unwrap();
        }
        store
            .apply_transition(&second.order_code, TransitionAction::CompleteDiagnosis)
            .await
            .unwrap();

        let stats = store.stats().await.unwrap();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.pending, 1);
        assert_eq!(stats.in_progress, 1);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.completed_today, 1);
    }

    #[tokio::test]
    async fn import_accepts_legacy_documents() {
        let (store, _dir) = local_only_store();

        let count = store
            .import(json!({
                "orders": [{
                    "id": "abc",
                    "order_code": "CF-2026-2581",
                    "customer_name": "Ama Mensah",
                    "customer_phone": "0246912468",
                    "device_brand": "Samsung",
                    "device_model": "Galaxy A54",
                    "status": "In Progress",
                    "created_at": "2026-03-01T09:00:00.000Z"
                }],
                "settings": {"order_counter": 2581}
            }))
            .await
            .unwrap();
        assert_eq!(count, 1);

        let order = store.get_order("cf-2026-2581").await.unwrap();
        assert_eq!(order.status, OrderStatus::RepairInProgress);

        // The imported counter carries forward into new codes.
        let next = store.create_order(&sample_intake()).await.unwrap();
        assert!(next.order_code.ends_with("-2582"));
    }

    #[tokio::test]
    async fn wipe_resets_orders_and_counter() {
        let (store, _dir) = local_only_store();
        store.create_order(&sample_intake()).await.unwrap();

        store.wipe().await.unwrap();
        let stats = store.stats().await.unwrap();
        assert_eq!(stats.total, 0);

        let fresh = store.create_order(&sample_intake()).await.unwrap();
        assert!(fresh.order_code.ends_with("-2581"));
    }
}
