// SPDX-FileCopyrightText: 2026 CampusFix Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plain-text view renderers.
//!
//! Views are pure projections of an order record into display form. They
//! never mutate lifecycle fields and never compute status or progress
//! themselves; everything shown comes straight off the record.

use campusfix_core::order::Order;
use campusfix_core::types::StepState;
use campusfix_store::ShopStats;

const PROGRESS_BAR_WIDTH: usize = 20;

fn progress_bar(progress: u8) -> String {
    let filled = (progress as usize * PROGRESS_BAR_WIDTH) / 100;
    format!(
        "[{}{}] {}%",
        "=".repeat(filled),
        "-".repeat(PROGRESS_BAR_WIDTH - filled),
        progress
    )
}

fn step_marker(state: &StepState) -> &'static str {
    match state {
        StepState::Done(_) => "[x]",
        StepState::Next | StepState::InProgress | StepState::ReadyNow => "[>]",
        StepState::Pending => "[ ]",
    }
}

/// The customer-facing tracking view: status, timeline, and update log.
pub fn render_tracker(order: &Order) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "Order {} - {} {} ({})\n",
        order.order_code, order.device_brand, order.device_model, order.repair_type
    ));
    out.push_str(&format!(
        "Status: {} {}\n",
        order.status,
        progress_bar(order.progress)
    ));
    out.push_str(&format!(
        "Estimated completion: {}\n\n",
        order.estimated_completion.format("%a %d %b, %H:%M")
    ));

    let timeline = [
        ("Order received", &order.steps.received),
        ("Diagnosis", &order.steps.diagnosis),
        ("Repair", &order.steps.repair),
        ("Quality check", &order.steps.quality),
        ("Ready for pickup", &order.steps.ready),
    ];
    for (label, state) in timeline {
        out.push_str(&format!(
            "  {} {:<18} {}\n",
            step_marker(state),
            label,
            state.as_str()
        ));
    }

    if !order.updates.is_empty() {
        out.push_str("\nUpdates:\n");
        for update in &order.updates {
            out.push_str(&format!("  {}  {}\n", update.time, update.message));
        }
    }

    out
}

/// One-line-per-order listing for the admin view.
pub fn render_order_table(orders: &[Order]) -> String {
    if orders.is_empty() {
        return "No orders found.\n".to_string();
    }

    let mut out = format!(
        "{:<14} {:<20} {:<24} {:<20} {}\n",
        "CODE", "CUSTOMER", "DEVICE", "STATUS", "PROGRESS"
    );
    for order in orders {
        out.push_str(&format!(
            "{:<14} {:<20} {:<24} {:<20} {}%\n",
            order.order_code,
            order.customer_name,
            format!("{} {}", order.device_brand, order.device_model),
            order.status.to_string(),
            order.progress
        ));
    }
    out
}

/// Full single-order detail for the admin view.
pub fn render_detail(order: &Order) -> String {
    let mut out = String::new();
    out.push_str(&format!("Order {}\n", order.order_code));
    out.push_str(&format!(
        "  Customer:  {} ({})\n",
        order.customer_name, order.customer_phone
    ));
    if let Some(email) = &order.customer_email {
        out.push_str(&format!("  Email:     {email}\n"));
    }
    if let Some(hostel) = &order.customer_hostel {
        out.push_str(&format!("  Hostel:    {hostel}\n"));
    }
    out.push_str(&format!(
        "  Device:    {} {}\n",
        order.device_brand, order.device_model
    ));
    out.push_str(&format!("  Repair:    {}\n", order.repair_type));
    out.push_str(&format!(
        "  Urgency:   {} ({})\n",
        order.urgency_level,
        order.urgency_level.lead_time()
    ));
    out.push_str(&format!("  Issue:     {}\n", order.issue_description));
    out.push_str(&format!(
        "  Status:    {} {}\n",
        order.status,
        progress_bar(order.progress)
    ));
    out.push_str(&format!(
        "  Created:   {}\n",
        order.created_at.format("%a %d %b %Y, %H:%M")
    ));
    out.push_str(&format!(
        "  Updated:   {}\n",
        order.updated_at.format("%a %d %b %Y, %H:%M")
    ));
    out.push_str(&format!(
        "  Estimate:  {}\n",
        order.estimated_completion.format("%a %d %b %Y, %H:%M")
    ));
    out
}

/// Dashboard counters.
pub fn render_stats(stats: &ShopStats) -> String {
    format!(
        "Orders total:      {}\n\
         Awaiting intake:   {}\n\
         In the workshop:   {}\n\
         Ready for pickup:  {}\n\
         Completed today:   {}\n",
        stats.total, stats.pending, stats.in_progress, stats.completed, stats.completed_today
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use campusfix_core::lifecycle;
    use campusfix_core::order::format_code;
    use campusfix_core::types::TransitionAction;
    use campusfix_test_utils::sample_intake;
    use chrono::Utc;

    fn test_order() -> Order {
        Order::create(&sample_intake(), format_code(2026, 2581), Utc::now())
    }

    #[test]
    fn tracker_shows_all_five_milestones() {
        let rendered = render_tracker(&test_order());
        for label in [
            "Order received",
            "Diagnosis",
            "Repair",
            "Quality check",
            "Ready for pickup",
        ] {
            assert!(rendered.contains(label), "missing milestone: {label}");
        }
        assert!(rendered.contains("CF-2026-2581"));
        assert!(rendered.contains("Order Received [=="));
        assert!(rendered.contains("10%"));
    }

    #[test]
    fn tracker_reflects_step_markers() {
        let mut order = test_order();
        lifecycle::apply(&mut order, TransitionAction::CompleteDiagnosis, Utc::now()).unwrap();

        let rendered = render_tracker(&order);
        assert!(rendered.contains("[>] Repair"));
        assert!(rendered.contains("Next"));
        assert!(rendered.contains("Diagnosis complete, repair queued"));
    }

    #[test]
    fn progress_bar_is_full_at_completion() {
        assert_eq!(progress_bar(100), format!("[{}] 100%", "=".repeat(20)));
        assert_eq!(progress_bar(10), format!("[=={}] 10%", "-".repeat(18)));
    }

    #[test]
    fn table_lists_each_order_once() {
        let orders = vec![test_order(), test_order()];
        let rendered = render_order_table(&orders);
        assert_eq!(rendered.matches("CF-2026-2581").count(), 2);
        assert!(rendered.starts_with("CODE"));
    }

    #[test]
    fn empty_table_says_so() {
        assert_eq!(render_order_table(&[]), "No orders found.\n");
    }

    #[test]
    fn detail_shows_optional_fields_only_when_present() {
        let order = test_order();
        let rendered = render_detail(&order);
        assert!(rendered.contains("Email:"));
        assert!(rendered.contains("Hostel:"));

        let mut intake = sample_intake();
        intake.customer_email = None;
        intake.customer_hostel = None;
        let bare = Order::create(&intake, format_code(2026, 2582), Utc::now());
        let rendered = render_detail(&bare);
        assert!(!rendered.contains("Email:"));
        assert!(!rendered.contains("Hostel:"));
    }
}
