// SPDX-FileCopyrightText: 2026 CampusFix Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `campusfix track --follow`: the live tracking view.
//!
//! Re-reads the order store on a fixed interval so changes made by an
//! admin in another session show up without restarting. Each poll is a
//! fire-and-forget read that overwrites the previous render; there is no
//! cancellation beyond Ctrl-C.

use std::time::Duration;

use tracing::debug;

use campusfix_core::CampusfixError;
use campusfix_store::OrderStore;

use crate::views;

/// Poll the store every `interval` and re-render the tracking view until
/// the order reaches Ready for Pickup.
pub async fn follow(
    store: &OrderStore,
    code: &str,
    interval: Duration,
) -> Result<(), CampusfixError> {
    let mut ticker = tokio::time::interval(interval);
    loop {
        ticker.tick().await;
        store.reload().await?;
        let order = store.get_order(code).await?;
        debug!(code = %order.order_code, status = %order.status, "tracker poll");

        // Clear the screen and redraw from the top.
        print!("\x1B[2J\x1B[1;1H");
        println!("{}", views::render_tracker(&order));

        if order.status.is_terminal() {
            println!("Your device is ready. See you at the shop!");
            return Ok(());
        }
        println!("Refreshing every {}s. Press Ctrl-C to stop.", interval.as_secs());
    }
}
