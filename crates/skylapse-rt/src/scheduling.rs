//! ---
//! sl_section: "01-core-functionality"
//! sl_subsection: "module"
//! sl_type: "source"
//! sl_scope: "code"
//! sl_description: "Runtime helpers supporting the capture driver."
//! sl_version: "v0.0.0-prealpha"
//! sl_owner: "tbd"
//! ---
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::clock::Clock;

/// Block until `clock.now() >= deadline`, re-checking every `poll_interval`.
///
/// Precision is one poll interval; the final sleep is shortened so the wait
/// never overshoots the deadline by more than scheduler latency.
pub async fn wait_until(
    clock: &dyn Clock,
    deadline: DateTime<Utc>,
    poll_interval: Duration,
    purpose: &str,
) {
    loop {
        let now = clock.now();
        if now >= deadline {
            return;
        }
        let remaining = (deadline - now).to_std().unwrap_or_default();
        debug!(
            purpose,
            remaining_secs = remaining.as_secs(),
            "waiting for boundary"
        );
        tokio::time::sleep(poll_interval.min(remaining)).await;
    }
}

/// Sleep for a hardware settle delay after a state change.
pub async fn settle(delay: Duration, reason: &str) {
    if delay.is_zero() {
        return;
    }
    debug!(reason, delay_ms = delay.as_millis() as u64, "settling");
    tokio::time::sleep(delay).await;
}
