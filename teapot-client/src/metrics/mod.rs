/*
    Metrics - poll and render counters

    Recorded through the `metrics` facade; nothing is exported unless the
    embedding application installs a recorder.
*/

use metrics::{counter, describe_counter, describe_histogram, histogram};
use std::time::Duration;

/// Initialize metric descriptions (call once at startup)
pub fn init_metrics() {
    describe_counter!(
        "teapot_poll_cycles_total",
        "Total number of poll cycles, labeled by endpoint kind and outcome (ok, empty, failed, unauthorized)"
    );

    describe_histogram!(
        "teapot_poll_request_duration_seconds",
        "Time from issuing a poll request until it resolved, success or failure"
    );

    describe_counter!(
        "teapot_directory_listings_total",
        "Total number of directory listings fetched, labeled by outcome (entries, empty, failed)"
    );

    describe_counter!(
        "teapot_notifications_total",
        "Total number of desktop notifications fired for new private messages"
    );
}

pub fn record_poll_cycle(endpoint: &'static str, outcome: &'static str, elapsed: Duration) {
    counter!("teapot_poll_cycles_total", "endpoint" => endpoint, "outcome" => outcome).increment(1);
    histogram!("teapot_poll_request_duration_seconds", "endpoint" => endpoint)
        .record(elapsed.as_secs_f64());
}

pub fn record_listing(outcome: &'static str) {
    counter!("teapot_directory_listings_total", "outcome" => outcome).increment(1);
}

pub fn record_notification() {
    counter!("teapot_notifications_total").increment(1);
}
