//! Prometheus metrics for outbound publishes.
//!
//! Counters are labelled by strategy (`fifo`, `standard`, `sms`) and outcome
//! (`published`, `failed`, `rejected`).

mod helpers;

pub use helpers::{encode_metrics, PublishMetrics};

use lazy_static::lazy_static;
use prometheus::{register_histogram_vec, register_int_counter_vec, HistogramVec, IntCounterVec};

/// Prefix for all metrics
const METRIC_PREFIX: &str = "sns_adapter";

lazy_static! {
    /// Total publishes by strategy and outcome
    pub static ref PUBLISH_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_publish_total", METRIC_PREFIX),
        "Total publish attempts by strategy and outcome",
        &["strategy", "outcome"]
    ).unwrap();

    /// Round trip time of calls that reached the notification service
    pub static ref PUBLISH_LATENCY: HistogramVec = register_histogram_vec!(
        format!("{}_publish_latency_seconds", METRIC_PREFIX),
        "Publish round trip latency in seconds",
        &["strategy"],
        vec![0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]
    ).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::Strategy;

    #[test]
    fn test_encode_metrics() {
        PublishMetrics::record_published(Strategy::Fifo);
        let output = encode_metrics().unwrap();
        assert!(output.contains("sns_adapter_publish_total"));
    }

    #[test]
    fn test_publish_counters() {
        let before = PUBLISH_TOTAL.with_label_values(&["sms", "rejected"]).get();
        PublishMetrics::record_rejected(Strategy::Sms);
        let after = PUBLISH_TOTAL.with_label_values(&["sms", "rejected"]).get();
        assert!(after > before);
    }
}
