// SPDX-FileCopyrightText: 2026 CampusFix Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Legacy-record normalization.
//!
//! The order data has been persisted under several ad-hoc schemas over
//! time: camelCase maps keyed by code, snake_case arrays with side tables
//! for updates and steps, and a counter that lives either at the top level
//! or under `settings.order_counter`. This module converts any of those
//! shapes into the canonical [`OrderDocument`] exactly once, at document
//! ingestion. Nothing downstream ever sees a legacy spelling.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::error::CampusfixError;
use crate::order::{canonical_code, Order, OrderDocument, COUNTER_SEED};
use crate::types::{
    normalize_phone, render_clock, OrderStatus, OrderSteps, StepState, UpdateEntry, UrgencyLevel,
};

/// Parse a raw JSON document into the canonical [`OrderDocument`].
///
/// Canonical-shaped documents pass straight through; anything else goes
/// through the legacy adapter. Records without an order code are dropped
/// with a warning rather than failing the whole document.
pub fn document_from_value(value: Value) -> Result<OrderDocument, CampusfixError> {
    if let Ok(doc) = serde_json::from_value::<OrderDocument>(value.clone()) {
        return Ok(doc);
    }

    let legacy: LegacyDocument =
        serde_json::from_value(value).map_err(|e| CampusfixError::Storage {
            source: Box::new(e),
        })?;
    Ok(legacy.into_document())
}

#[derive(Debug, Deserialize)]
struct LegacyDocument {
    #[serde(default)]
    orders: LegacyOrders,
    #[serde(default)]
    counter: Option<u64>,
    #[serde(default)]
    settings: Option<LegacySettings>,
    /// Side table keyed by `order_id` (snake_case array schema).
    #[serde(default)]
    order_updates: Vec<LegacyUpdateRow>,
    /// Side table keyed by `order_id` (snake_case array schema).
    #[serde(default)]
    order_steps: Vec<LegacyStepRow>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LegacyOrders {
    List(Vec<LegacyOrder>),
    Map(BTreeMap<String, LegacyOrder>),
}

impl Default for LegacyOrders {
    fn default() -> Self {
        LegacyOrders::List(Vec::new())
    }
}

#[derive(Debug, Deserialize)]
struct LegacySettings {
    #[serde(default)]
    order_counter: Option<u64>,
}

/// One order row under either field-naming convention.
#[derive(Debug, Deserialize)]
struct LegacyOrder {
    #[serde(default)]
    id: Option<String>,
    #[serde(default, alias = "orderCode", alias = "code")]
    order_code: Option<String>,
    #[serde(default, alias = "customerName")]
    customer_name: Option<String>,
    #[serde(default, alias = "customerPhone")]
    customer_phone: Option<String>,
    #[serde(default, alias = "customerEmail")]
    customer_email: Option<String>,
    #[serde(default, alias = "customerHostel")]
    customer_hostel: Option<String>,
    #[serde(default, alias = "deviceBrand")]
    device_brand: Option<String>,
    #[serde(default, alias = "deviceModel")]
    device_model: Option<String>,
    #[serde(default, alias = "repairType")]
    repair_type: Option<String>,
    #[serde(default, alias = "urgencyLevel")]
    urgency_level: Option<String>,
    #[serde(default, alias = "issueDescription")]
    issue_description: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default, alias = "estimatedCompletion")]
    estimated_completion: Option<String>,
    #[serde(default, alias = "createdAt", alias = "timestamp")]
    created_at: Option<String>,
    #[serde(default, alias = "updatedAt")]
    updated_at: Option<String>,
    /// Embedded step map (camelCase schema).
    #[serde(default)]
    steps: Option<BTreeMap<String, String>>,
    /// Embedded update log (camelCase schema).
    #[serde(default)]
    updates: Option<Vec<LegacyUpdateRow>>,
}

#[derive(Debug, Deserialize)]
struct LegacyUpdateRow {
    #[serde(default)]
    order_id: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    time: Option<String>,
    #[serde(default, alias = "createdAt")]
    created_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LegacyStepRow {
    #[serde(default)]
    order_id: Option<String>,
    #[serde(default)]
    step_name: Option<String>,
    #[serde(default)]
    step_time: Option<String>,
}

impl LegacyDocument {
    fn into_document(self) -> OrderDocument {
        let counter = self
            .counter
            .or(self.settings.and_then(|s| s.order_counter))
            .unwrap_or(COUNTER_SEED);

        let rows = match self.orders {
            LegacyOrders::List(list) => list,
            LegacyOrders::Map(map) => map.into_values().collect(),
        };

        let mut orders = BTreeMap::new();
        for row in rows {
            match row.into_order(&self.order_updates, &self.order_steps) {
                Some(order) => {
                    orders.insert(canonical_code(&order.order_code), order);
                }
                None => warn!("dropping legacy order record with no order code"),
            }
        }

        OrderDocument {
            orders,
            counter,
            needs_sync: false,
        }
    }
}

impl LegacyOrder {
    fn into_order(self, update_rows: &[LegacyUpdateRow], step_rows: &[LegacyStepRow]) -> Option<Order> {
        let order_code = canonical_code(&self.order_code?);
        let id = self
            .id
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        let created_at = parse_timestamp(self.created_at.as_deref()).unwrap_or_else(Utc::now);
        let updated_at = parse_timestamp(self.updated_at.as_deref()).unwrap_or(created_at);
        let status = self
            .status
            .as_deref()
            .map(map_legacy_status)
            .unwrap_or(OrderStatus::OrderReceived);
        let urgency_level = self
            .urgency_level
            .as_deref()
            .and_then(|u| u.parse::<UrgencyLevel>().ok())
            .unwrap_or_default();
        // Legacy records sometimes hold a locale-formatted estimate; if it
        // does not parse, recompute from creation time and urgency.
        let estimated_completion = parse_timestamp(self.estimated_completion.as_deref())
            .unwrap_or(created_at + urgency_level.completion_offset());

        let mut steps = self
            .steps
            .map(steps_from_map)
            .unwrap_or_default();
        let side_steps: Vec<&LegacyStepRow> = step_rows
            .iter()
            .filter(|s| s.order_id.as_deref() == Some(id.as_str()))
            .collect();
        if !side_steps.is_empty() {
            steps = steps_from_rows(&side_steps);
        }
        if steps.received.is_pending() {
            steps.received = StepState::Done(render_clock(created_at));
        }

        let mut updates: Vec<UpdateEntry> = self
            .updates
            .unwrap_or_default()
            .iter()
            .map(|row| row.to_entry(created_at))
            .collect();
        if updates.is_empty() {
            updates = update_rows
                .iter()
                .filter(|u| u.order_id.as_deref() == Some(id.as_str()))
                .map(|row| row.to_entry(created_at))
                .collect();
            updates.sort_by_key(|u| u.created_at);
        }

        Some(Order {
            id,
            order_code,
            customer_name: self.customer_name.unwrap_or_default(),
            customer_phone: normalize_phone(&self.customer_phone.unwrap_or_default()),
            customer_email: self.customer_email.filter(|e| !e.is_empty()),
            customer_hostel: self.customer_hostel.filter(|h| !h.is_empty()),
            device_brand: self.device_brand.unwrap_or_default(),
            device_model: self.device_model.unwrap_or_default(),
            repair_type: self.repair_type.unwrap_or_default(),
            urgency_level,
            issue_description: self.issue_description.unwrap_or_default(),
            status,
            progress: status.progress(),
            steps,
            updates,
            estimated_completion,
            created_at,
            updated_at,
        })
    }
}

impl LegacyUpdateRow {
    fn to_entry(&self, fallback: DateTime<Utc>) -> UpdateEntry {
        let created_at = parse_timestamp(self.created_at.as_deref()).unwrap_or(fallback);
        UpdateEntry {
            message: self.message.clone().unwrap_or_default(),
            time: self
                .time
                .clone()
                .unwrap_or_else(|| render_clock(created_at)),
            created_at,
        }
    }
}

fn parse_timestamp(raw: Option<&str>) -> Option<DateTime<Utc>> {
    let raw = raw?;
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

/// Explicit mapping for free-form legacy status strings. Unknown values
/// fall back to the initial stage; no substring inference.
fn map_legacy_status(raw: &str) -> OrderStatus {
    match raw {
        "Order Received" => OrderStatus::OrderReceived,
        "Diagnosis Complete" => OrderStatus::DiagnosisComplete,
        "In Progress" | "Repair In Progress" | "Repair in Progress" => {
            OrderStatus::RepairInProgress
        }
        "Quality Check" | "Repair Complete" => OrderStatus::RepairComplete,
        "Completed" | "Ready for Pickup" => OrderStatus::ReadyForPickup,
        other => {
            warn!(status = other, "unknown legacy status, treating as Order Received");
            OrderStatus::OrderReceived
        }
    }
}

/// Embedded camelCase step maps use short keys; the snake_case side table
/// derives keys from display names. Accept both spellings per milestone.
fn steps_from_map(map: BTreeMap<String, String>) -> OrderSteps {
    let mut steps = OrderSteps::default();
    for (key, value) in map {
        let state = StepState::from(value);
        match key.as_str() {
            "received" | "order_received" => steps.received = state,
            "diagnosis" => steps.diagnosis = state,
            "repair" | "repair_in_progress" => steps.repair = state,
            "quality" | "quality_check" => steps.quality = state,
            "ready" | "ready_for_pickup" => steps.ready = state,
            other => warn!(step = other, "ignoring unknown legacy step key"),
        }
    }
    steps
}

fn steps_from_rows(rows: &[&LegacyStepRow]) -> OrderSteps {
    let mut map = BTreeMap::new();
    for row in rows {
        if let (Some(name), Some(time)) = (&row.step_name, &row.step_time) {
            let key = name.to_lowercase().replace(' ', "_");
            map.insert(key, time.clone());
        }
    }
    steps_from_map(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn canonical_document_passes_through() {
        let value = json!({
            "orders": {},
            "counter": 2600,
            "needsSync": true
        });
        let doc = document_from_value(value).unwrap();
        assert_eq!(doc.counter, 2600);
        assert!(doc.needs_sync);
    }

    #[test]
    fn snake_case_array_document_normalizes() {
        let value = json!({
            "orders": [{
                "id": "abc123",
                "order_code": "cf-2026-2581",
                "customer_name": "Ama Mensah",
                "customer_phone": "+233 24 691 2468",
                "customer_email": "",
                "device_brand": "Samsung",
                "device_model": "Galaxy A54",
                "repair_type": "Screen Replacement",
                "urgency_level": "Express",
                "issue_description": "Cracked screen after a fall",
                "status": "Diagnosis Complete",
                "created_at": "2026-03-01T09:00:00.000Z",
                "updated_at": "2026-03-01T10:30:00.000Z"
            }],
            "order_updates": [
                {
                    "order_id": "abc123",
                    "message": "Order received and queued for diagnosis",
                    "created_at": "2026-03-01T09:00:00.000Z"
                },
                {
                    "order_id": "abc123",
                    "message": "Diagnosis complete, repair queued",
                    "created_at": "2026-03-01T10:30:00.000Z"
                }
            ],
            "order_steps": [
                {"order_id": "abc123", "step_name": "Order Received", "step_time": "09:00"},
                {"order_id": "abc123", "step_name": "Diagnosis", "step_time": "10:30"},
                {"order_id": "abc123", "step_name": "Repair in Progress", "step_time": "Pending"}
            ],
            "settings": {"order_counter": 2581}
        });

        let doc = document_from_value(value).unwrap();
        assert_eq!(doc.counter, 2581);
        let order = doc.orders.get("CF-2026-2581").expect("code is canonicalized");
        assert_eq!(order.customer_name, "Ama Mensah");
        assert_eq!(order.customer_phone, "233246912468");
        assert_eq!(order.customer_email, None);
        assert_eq!(order.status, OrderStatus::DiagnosisComplete);
        assert_eq!(order.progress, 30);
        assert_eq!(order.urgency_level, UrgencyLevel::Express);
        assert_eq!(order.steps.received, StepState::Done("09:00".into()));
        assert_eq!(order.steps.diagnosis, StepState::Done("10:30".into()));
        assert!(order.steps.repair.is_pending());
        assert_eq!(order.updates.len(), 2);
        assert_eq!(order.updates[0].message, "Order received and queued for diagnosis");
    }

    #[test]
    fn camel_case_map_document_normalizes() {
        let value = json!({
            "orders": {
                "CF-2026-2582": {
                    "code": "CF-2026-2582",
                    "customerName": "Kofi Boateng",
                    "customerPhone": "0246912468",
                    "deviceBrand": "iPhone",
                    "deviceModel": "13 Pro",
                    "repairType": "Battery Replacement",
                    "urgencyLevel": "Standard",
                    "issueDescription": "Battery drains fast",
                    "status": "In Progress",
                    "timestamp": "2026-03-02T08:00:00.000Z",
                    "steps": {
                        "received": "08:00",
                        "diagnosis": "08:45",
                        "repair": "In Progress",
                        "quality": "Pending",
                        "ready": "Pending"
                    },
                    "updates": [
                        {"message": "Order received and queued for diagnosis", "time": "08:00"}
                    ]
                }
            },
            "counter": 2582
        });

        let doc = document_from_value(value).unwrap();
        let order = doc.orders.get("CF-2026-2582").unwrap();
        assert_eq!(order.status, OrderStatus::RepairInProgress);
        assert_eq!(order.progress, 50);
        assert_eq!(order.steps.repair, StepState::InProgress);
        assert_eq!(order.updates.len(), 1);
        assert_eq!(order.updates[0].time, "08:00");
    }

    #[test]
    fn legacy_statuses_map_through_explicit_table() {
        assert_eq!(map_legacy_status("Completed"), OrderStatus::ReadyForPickup);
        assert_eq!(map_legacy_status("Quality Check"), OrderStatus::RepairComplete);
        assert_eq!(map_legacy_status("In Progress"), OrderStatus::RepairInProgress);
        assert_eq!(map_legacy_status("nonsense"), OrderStatus::OrderReceived);
    }

    #[test]
    fn counter_falls_back_through_settings_then_seed() {
        let doc = document_from_value(json!({"orders": []})).unwrap();
        assert_eq!(doc.counter, COUNTER_SEED);

        let doc =
            document_from_value(json!({"orders": [], "settings": {"order_counter": 3000}}))
                .unwrap();
        assert_eq!(doc.counter, 3000);
    }

    #[test]
    fn records_without_a_code_are_dropped() {
        let value = json!({
            "orders": [{"customer_name": "No Code"}],
            "counter": 2590
        });
        let doc = document_from_value(value).unwrap();
        assert!(doc.orders.is_empty());
        assert_eq!(doc.counter, 2590);
    }

    #[test]
    fn non_document_value_is_a_storage_error() {
        let err = document_from_value(json!("not a document")).unwrap_err();
        assert!(matches!(err, CampusfixError::Storage { .. }));
    }
}
