//! Club-level metrics.
//!
//! Recorded through the `metrics` facade alongside the store metrics; they
//! are only collected when a recorder is installed (`--metrics`).

use crate::types::{Notice, Settlement};
use computer_club_runtime::metrics::{counter, histogram};
use metrics::{describe_counter, describe_histogram};

/// Register club metric descriptions.
pub fn describe() {
    describe_counter!(
        "club_notices_total",
        "Business-rule notices emitted, by notice code"
    );
    describe_counter!(
        "club_forced_out_total",
        "Clients made to leave (full queue or closing time)"
    );
    describe_counter!(
        "club_auto_seated_total",
        "Waiting clients seated at a freed place"
    );
    describe_counter!("club_revenue_total", "Revenue settled across all places");
    describe_histogram!(
        "club_session_minutes",
        "Length of settled occupancy intervals in minutes"
    );
}

/// Club metrics recorder.
pub struct ClubMetrics;

impl ClubMetrics {
    /// Record a business-rule notice.
    pub fn record_notice(notice: Notice) {
        counter!("club_notices_total", "code" => notice.code()).increment(1);
    }

    /// Record a client made to leave.
    pub fn record_forced_out() {
        counter!("club_forced_out_total").increment(1);
    }

    /// Record a waiting client seated at a freed place.
    pub fn record_auto_seated() {
        counter!("club_auto_seated_total").increment(1);
    }

    /// Record a settled occupancy interval.
    pub fn record_settlement(settlement: &Settlement) {
        counter!("club_revenue_total").increment(settlement.revenue);
        histogram!("club_session_minutes").record(f64::from(settlement.minutes.get()));
    }
}
